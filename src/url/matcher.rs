/// Checks if a host matches a glob pattern
///
/// `*` matches any run of characters (including none) and `?` matches exactly
/// one character. The whole host must match.
///
/// # Arguments
///
/// * `pattern` - The glob pattern, e.g. `*.example.com` or `shop-??.example.com`
/// * `candidate` - The host to check against the pattern
///
/// # Examples
///
/// ```
/// use webcrawl::url::matches_glob;
///
/// assert!(matches_glob("*.example.com", "blog.example.com"));
/// assert!(matches_glob("*.example.com", "api.v2.example.com"));
/// assert!(!matches_glob("*.example.com", "example.com"));
/// assert!(matches_glob("shop-??.example.com", "shop-eu.example.com"));
/// ```
pub fn matches_glob(pattern: &str, candidate: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let candidate: Vec<char> = candidate.chars().collect();

    let (mut p, mut c) = (0, 0);
    // Position of the last `*` seen and the candidate index it was tried at
    let mut backtrack: Option<(usize, usize)> = None;

    while c < candidate.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == candidate[c]) {
            p += 1;
            c += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, c));
            p += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            c = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&ch| ch == '*')
}
