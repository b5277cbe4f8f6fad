//! User agent and accept headers

use rand::seq::SliceRandom;

/// Plain desktop user agent sent when fetching result pages
pub const GENERIC_BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

const PLATFORMS: &[&str] = &[
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "X11; Linux x86_64",
];

const CHROME_VERSIONS: &[&str] = &["122.0.0.0", "124.0.0.0", "126.0.0.0", "128.0.0.0"];

/// Pick a realistic Chrome user agent for API and search-page requests
pub fn generate_user_agent() -> String {
    let mut rng = rand::thread_rng();
    let platform = PLATFORMS.choose(&mut rng).copied().unwrap_or(PLATFORMS[0]);
    let chrome = CHROME_VERSIONS
        .choose(&mut rng)
        .copied()
        .unwrap_or(CHROME_VERSIONS[0]);
    format!(
        "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
        platform, chrome
    )
}

/// Accept header for HTML requests
pub fn accept_html() -> &'static str {
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
}

/// Accept-Language header
pub fn accept_language(lang: &str) -> String {
    if lang.is_empty() {
        "en-US,en;q=0.9".to_string()
    } else {
        format!("{},en-US;q=0.9,en;q=0.8", lang)
    }
}
