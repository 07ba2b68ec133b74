use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        search_endpoint: get_env_or_default("SEARCH_ENDPOINT", "http://localhost:8080/search"),
        request_timeout_secs: parse_env_or_default("SEARCH_TIMEOUT_SECS", 10),
        bind_addr: get_env_or_default("SEARCH_BIND_ADDR", "0.0.0.0:8080"),
        corpus_path: get_env_or_default("SEARCH_CORPUS", "corpus.json"),
        max_hits: parse_env_or_default("SEARCH_MAX_HITS", 10),
    }
});

pub struct Config {
    pub search_endpoint: String,
    pub request_timeout_secs: u64,
    pub bind_addr: String,
    pub corpus_path: String,
    /// Upper bound on results served by the local endpoint.
    pub max_hits: usize,
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    parse_or_default(key, env::var(key).ok().as_deref(), default)
}

fn parse_or_default<T>(key: &str, raw: Option<&str>, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring invalid {key}={raw:?}, using {default}");
            default
        }),
        None => default,
    }
}

#[test]
fn test_parse_or_default() {
    assert_eq!(parse_or_default("SEARCH_TIMEOUT_SECS", Some("42"), 7u64), 42);
    assert_eq!(parse_or_default("SEARCH_TIMEOUT_SECS", Some(" 42 "), 7u64), 42);
    assert_eq!(parse_or_default("SEARCH_TIMEOUT_SECS", Some("forty-two"), 7u64), 7);
    assert_eq!(parse_or_default("SEARCH_MAX_HITS", None, 10usize), 10);
}
