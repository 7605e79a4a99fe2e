//! Request identity selection.
//!
//! In `url` mode the identity is a pure function of `(family, url)` so
//! repeated fetches of the same page present the same browser.

use super::UserAgentMode;

const DESKTOP: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_5_2) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
];

const MOBILE: &[&str] = &[
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; Android 12; SM-G991B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36",
];

const TABLET: &[&str] = &[
    "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 12; SAMSUNG SM-T865) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

const FAMILIES: &[(&str, &[&str])] = &[("desktop", DESKTOP), ("mobile", MOBILE), ("tablet", TABLET)];

/// Names of the available identity pools.
pub fn user_agent_families() -> Vec<&'static str> {
    FAMILIES.iter().map(|(name, _)| *name).collect()
}

/// The pool for `family`, or the desktop pool when the name is unknown.
pub fn user_agent_pool(family: &str) -> &'static [&'static str] {
    FAMILIES
        .iter()
        .find(|(name, _)| *name == family)
        .map(|(_, pool)| *pool)
        .unwrap_or(DESKTOP)
}

/// Choose the identity string for a fetch of `url`.
pub fn pick_user_agent(mode: UserAgentMode, url: &str, family: &str, fixed: &str) -> String {
    if mode == UserAgentMode::Fixed {
        return fixed.to_string();
    }

    let pool = user_agent_pool(family);
    if url.is_empty() {
        return pool[0].to_string();
    }

    let index = hash_key(&format!("{}:{}", family, url)) as usize % pool.len();
    pool[index].to_string()
}

/// 32-bit FNV-1a over UTF-16 code units, folded to the magnitude of the
/// signed result so the index matches across platforms and implementations.
fn hash_key(input: &str) -> u32 {
    let mut hash: u32 = 2_166_136_261;
    for unit in input.encode_utf16() {
        hash ^= u32::from(unit);
        hash = hash.wrapping_mul(16_777_619);
    }
    (hash as i32).unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_mode_returns_fixed() {
        let ua = pick_user_agent(UserAgentMode::Fixed, "https://a.com", "mobile", "Bot/1.0");
        assert_eq!(ua, "Bot/1.0");
    }

    #[test]
    fn test_url_mode_is_deterministic() {
        let a = pick_user_agent(UserAgentMode::Url, "https://example.com/x", "desktop", "");
        let b = pick_user_agent(UserAgentMode::Url, "https://example.com/x", "desktop", "");
        assert_eq!(a, b);
    }

    #[test]
    fn test_url_mode_draws_from_family_pool() {
        for i in 0..50 {
            let url = format!("https://site{}.example/page", i);
            let ua = pick_user_agent(UserAgentMode::Url, &url, "tablet", "");
            assert!(TABLET.contains(&ua.as_str()), "{} not in tablet pool", ua);
        }
    }

    #[test]
    fn test_unknown_family_falls_back_to_desktop() {
        for i in 0..20 {
            let url = format!("https://example.com/{}", i);
            let ua = pick_user_agent(UserAgentMode::Url, &url, "watch", "");
            assert!(DESKTOP.contains(&ua.as_str()));
        }
    }

    #[test]
    fn test_empty_url_returns_first_entry() {
        assert_eq!(pick_user_agent(UserAgentMode::Url, "", "mobile", ""), MOBILE[0]);
    }

    #[test]
    fn test_hash_key_known_values() {
        // FNV-1a("a") is 0xe40c292c, which is negative as i32.
        assert_eq!(hash_key("a"), (0xe40c292cu32 as i32).unsigned_abs());
        assert_ne!(hash_key("desktop:https://a"), hash_key("desktop:https://b"));
    }

    #[test]
    fn test_families_listed() {
        assert_eq!(user_agent_families(), vec!["desktop", "mobile", "tablet"]);
    }
}
