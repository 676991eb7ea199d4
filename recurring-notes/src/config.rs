use std::sync::OnceLock;

use serde::Deserialize;

use crate::recurrence::AnchorPolicy;

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default)]
    pub anchor_policy: AnchorPolicy,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    /// Comma separated origins allowed to call the API. Any origin when empty.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    // logging
    #[serde(default)]
    pub log_json: bool,
    #[serde(default)]
    pub tokio_console: bool,

    // build
    pub app_version: Option<String>,
    #[serde(default = "default_local")]
    pub source: String,
    #[serde(default = "default_local")]
    pub git_commit: String,
    #[serde(default = "default_local")]
    pub pipeline_id: String,
    #[serde(default = "default_local")]
    pub version: String,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    4000
}

fn default_database_url() -> String {
    "sqlite.db".into()
}

fn default_session_ttl_hours() -> i64 {
    24 * 7
}

fn default_local() -> String {
    "local".into()
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>().unwrap_or_else(|err| panic!("invalid configuration: {err}"))
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_vars(vars: &[(&str, &str)]) -> Config {
        envy::from_iter::<_, Config>(vars.iter().map(|(k, v)| (k.to_string(), v.to_string()))).unwrap()
    }

    #[test]
    fn defaults() {
        let config = from_vars(&[]);

        assert_eq!(config.port, 4000);
        assert_eq!(config.anchor_policy, AnchorPolicy::PreviousDay);
        assert_eq!(config.session_ttl_hours, 168);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn anchor_policy_from_env() {
        let config = from_vars(&[("ANCHOR_POLICY", "start_date")]);
        assert_eq!(config.anchor_policy, AnchorPolicy::StartDate);

        assert!(envy::from_iter::<_, Config>([("ANCHOR_POLICY".to_string(), "start".to_string())]).is_err());
    }

    #[test]
    fn cors_origins_from_env() {
        let config = from_vars(&[("CORS_ORIGINS", "http://localhost:3000,https://notes.example.com")]);
        assert_eq!(config.cors_origins, ["http://localhost:3000", "https://notes.example.com"]);
    }
}
