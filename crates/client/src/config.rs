//! Client configuration from the environment.

use std::path::PathBuf;

use storefront_auth::{DEFAULT_SESSION_KEY, RedirectTarget};

pub const API_URL_VAR: &str = "STOREFRONT_API_URL";
pub const SESSION_KEY_VAR: &str = "STOREFRONT_SESSION_KEY";
pub const DATA_DIR_VAR: &str = "STOREFRONT_DATA_DIR";

pub const DEFAULT_API_URL: &str = "http://localhost:9000";

/// Paths the core navigates to. The router owns the full table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    pub login: String,
    pub home: String,
    pub product_list: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            login: "/member/login".to_string(),
            home: "/".to_string(),
            product_list: "/product/list".to_string(),
        }
    }
}

impl RouteTable {
    pub fn path_for(&self, target: RedirectTarget) -> &str {
        match target {
            RedirectTarget::Login => &self.login,
            RedirectTarget::Home => &self.home,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub session_key: String,
    /// Directory for the durable session file. `None` means the OS data
    /// directory.
    pub data_dir: Option<PathBuf>,
    pub routes: RouteTable,
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
            data_dir: None,
            routes: RouteTable::default(),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new(get(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()));
        if let Some(key) = get(SESSION_KEY_VAR) {
            config.session_key = key;
        }
        config.data_dir = get(DATA_DIR_VAR).map(PathBuf::from);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.session_key, DEFAULT_SESSION_KEY);
        assert_eq!(config.data_dir, None);
        assert_eq!(config.routes.path_for(RedirectTarget::Login), "/member/login");
        assert_eq!(config.routes.path_for(RedirectTarget::Home), "/");
    }

    #[test]
    fn reads_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (API_URL_VAR, "https://shop.example.com"),
            (SESSION_KEY_VAR, "shop.session"),
            (DATA_DIR_VAR, "/tmp/shop"),
        ]);
        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "https://shop.example.com");
        assert_eq!(config.session_key, "shop.session");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/shop")));
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = ClientConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.data_dir, None);
    }
}
