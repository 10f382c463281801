// Utility functions

const SITE_ORIGIN: &str = "https://www.flipkart.com";

/// Stable FNV-1a fold over a string. Used for live listing ids and for
/// seeding the deterministic sample generator, so the same input always
/// produces the same output across runs and platforms.
pub fn stable_hash(text: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in text.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Rewrites protocol-relative (`//cdn...`) and root-relative (`/p/...`)
/// URLs against the site origin. Absolute URLs pass through untouched.
pub fn absolutize_url(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{}", url)
    } else if url.starts_with('/') {
        format!("{}{}", SITE_ORIGIN, url)
    } else {
        url.to_string()
    }
}
