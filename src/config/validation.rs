use std::env;
use std::sync::OnceLock;

use regex::Regex;

fn env_reference() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env reference pattern is valid"))
}

/// Expand environment variables in a string using ${VAR_NAME} syntax.
/// Unknown variables are left as written.
pub fn expand_env_var_in_string(value: &str) -> String {
    env_reference()
        .replace_all(value, |cap: &regex::Captures| {
            env::var(&cap[1]).unwrap_or_else(|_| cap[0].to_string())
        })
        .into_owned()
}

/// Normalise an API base URL: trim whitespace and trailing slashes, and
/// assume https when no scheme is given.
pub fn normalize_api_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_env_var() {
        env::set_var("TALABIA_TEST_HOST", "staging.talabia.net");
        assert_eq!(
            expand_env_var_in_string("https://${TALABIA_TEST_HOST}/api"),
            "https://staging.talabia.net/api"
        );
    }

    #[test]
    fn test_unknown_env_var_left_alone() {
        assert_eq!(
            expand_env_var_in_string("https://${TALABIA_SURELY_UNSET_VAR}/api"),
            "https://${TALABIA_SURELY_UNSET_VAR}/api"
        );
    }

    #[test]
    fn test_normalize_api_url() {
        assert_eq!(normalize_api_url("api.talabia.net/api/ "), "https://api.talabia.net/api");
        assert_eq!(normalize_api_url("http://localhost:5000/"), "http://localhost:5000");
    }
}
