use crate::config::types::{Config, CrawlerConfig, FetchConfig, ParserRuleConfig};
use crate::crawler::MatchType;
use crate::url::normalize_url;
use crate::{ConfigError, ConfigResult};
use regex::Regex;

/// Upper bound on the worker count
const MAX_WORKERS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_fetch_config(&config.fetch)?;
    validate_seeds(&config.seeds)?;
    validate_parser_rules(&config.parsers)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.max_urls == 0 {
        return Err(ConfigError::Validation("max-urls must be >= 1".to_string()));
    }

    if config.fetcher.trim().is_empty() {
        return Err(ConfigError::Validation("fetcher cannot be empty".to_string()));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetch_config(config: &FetchConfig) -> ConfigResult<()> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation("timeout-secs must be >= 1".to_string()));
    }

    if config.max_body_bytes == 0 {
        return Err(ConfigError::Validation("max-body-bytes must be >= 1".to_string()));
    }

    if let Some(agent) = &config.user_agent {
        if agent.trim().is_empty() {
            return Err(ConfigError::Validation("user-agent cannot be empty".to_string()));
        }
    }

    Ok(())
}

/// Validates that every seed normalizes
fn validate_seeds(seeds: &[String]) -> ConfigResult<()> {
    for seed in seeds {
        normalize_url(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;
    }
    Ok(())
}

/// Validates parser rule patterns
fn validate_parser_rules(rules: &[ParserRuleConfig]) -> ConfigResult<()> {
    for rule in rules {
        if rule.pattern.trim().is_empty() {
            return Err(ConfigError::InvalidPattern("Parser pattern cannot be empty".to_string()));
        }

        if rule.match_type == MatchType::Regex {
            Regex::new(&rule.pattern).map_err(|e| {
                ConfigError::InvalidPattern(format!("Invalid regex '{}': {}", rule.pattern, e))
            })?;
        }
    }
    Ok(())
}
