//! URL handling module
//!
//! This module provides URL normalization, relative link resolution, the link
//! follow policy, host helpers and glob matching for parser rules.

mod domain;
mod follow;
mod matcher;
mod normalize;
mod resolve;

// Re-export main functions
pub use domain::{base_domain, extract_host};
pub use follow::{filter_links, should_follow, FollowBehavior};
pub use matcher::matches_glob;
pub use normalize::{canonical_key, normalize_str, normalize_url};
pub use resolve::resolve_link;
