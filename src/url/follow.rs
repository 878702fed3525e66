use crate::url::domain::base_domain;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Policy deciding which discovered links may enter the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FollowBehavior {
    /// Never follow links
    None,
    /// Follow every link
    Any,
    /// Follow links whose host equals the page's host
    #[default]
    #[serde(alias = "same-domain")]
    SameHost,
    /// Follow links sharing the page's last two host labels
    RelatedSubdomains,
}

impl FromStr for FollowBehavior {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "none" => Ok(Self::None),
            "any" => Ok(Self::Any),
            "same-host" | "same-domain" => Ok(Self::SameHost),
            "related-subdomains" => Ok(Self::RelatedSubdomains),
            other => Err(format!(
                "unknown follow behavior '{}' (expected none, any, same-host or related-subdomains)",
                other
            )),
        }
    }
}

impl fmt::Display for FollowBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Any => "any",
            Self::SameHost => "same-host",
            Self::RelatedSubdomains => "related-subdomains",
        };
        f.write_str(name)
    }
}

/// Decides whether `candidate`, found on `page`, is eligible for admission
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webcrawl::url::{should_follow, FollowBehavior};
///
/// let page = Url::parse("https://example.com").unwrap();
/// let link = Url::parse("https://sub.example.com/c").unwrap();
/// assert!(should_follow(&page, &link, FollowBehavior::RelatedSubdomains));
/// assert!(!should_follow(&page, &link, FollowBehavior::SameHost));
/// ```
pub fn should_follow(page: &Url, candidate: &Url, behavior: FollowBehavior) -> bool {
    match behavior {
        FollowBehavior::None => false,
        FollowBehavior::Any => true,
        FollowBehavior::SameHost => {
            page.host_str() == candidate.host_str() && page.port() == candidate.port()
        }
        FollowBehavior::RelatedSubdomains => {
            match (page.host_str(), candidate.host_str()) {
                (Some(a), Some(b)) => match (base_domain(a), base_domain(b)) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                },
                _ => false,
            }
        }
    }
}

/// Applies the follow policy to a list of resolved links, preserving order
///
/// Links that fail to parse are dropped.
pub fn filter_links(page: &Url, links: &[String], behavior: FollowBehavior) -> Vec<String> {
    if behavior == FollowBehavior::None {
        return Vec::new();
    }

    links
        .iter()
        .filter(|link| {
            Url::parse(link)
                .map(|candidate| should_follow(page, &candidate, behavior))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}
