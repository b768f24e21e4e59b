use crate::config::SyncConfig;
use crate::utils::error::{Result, SyncError};
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::OnceLock;

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid placeholder pattern"))
}

impl SyncConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content, |name| std::env::var(name).ok());

        toml::from_str(&processed).map_err(|e| SyncError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// Replaces `${VAR}` with the looked-up value. Unknown variables are left
/// as-is so validation can point at them.
pub fn substitute_env_vars<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    placeholder()
        .replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheduler::OverlapPolicy;
    use crate::utils::validation::Validate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[source]
store_url = "demo.myshopify.com"
access_token = "shpat_file"
api_version = "2024-07"

[destination]
base_url = "https://sandbox.backmarket.example/v1"
api_key = "bm_file"

[server]
port = 9100

[schedule]
cron = "*/10 * * * *"
overlap = "queue"
"#;

        let config = SyncConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(
            config.source.api_base_url(),
            "https://demo.myshopify.com/admin/api/2024-07"
        );
        assert_eq!(config.destination.api_key, "bm_file");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.schedule.cron, "*/10 * * * *");
        assert_eq!(config.schedule.overlap, OverlapPolicy::Queue);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        let toml_content = r#"
[source]
store_url = "demo.myshopify.com"
access_token = "shpat_file"

[destination]
api_key = "bm_file"
"#;

        let config = SyncConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.api_version, "2025-01");
        assert_eq!(config.destination.base_url, "https://api.backmarket.com/v1");
        assert_eq!(config.server.port, 7001);
        assert_eq!(config.schedule.overlap, OverlapPolicy::Skip);
    }

    #[test]
    fn test_env_var_substitution() {
        let content = r#"token = "${TOKEN}" other = "${NOT_SET}""#;
        let substituted = substitute_env_vars(content, |name| {
            (name == "TOKEN").then(|| "secret".to_string())
        });
        assert_eq!(substituted, r#"token = "secret" other = "${NOT_SET}""#);
    }

    #[test]
    fn test_unresolved_placeholder_fails_validation() {
        let toml_content = r#"
[source]
store_url = "${MARKET_SYNC_TEST_UNSET_STORE}"
access_token = "shpat_file"

[destination]
api_key = "bm_file"
"#;

        let config = SyncConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_overlap_policy_is_a_parse_error() {
        let toml_content = r#"
[source]
store_url = "demo.myshopify.com"
access_token = "shpat_file"

[destination]
api_key = "bm_file"

[schedule]
overlap = "sometimes"
"#;

        assert!(matches!(
            SyncConfig::from_toml_str(toml_content),
            Err(SyncError::Config { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[source]
store_url = "file.myshopify.com"
access_token = "shpat_file"

[destination]
api_key = "bm_file"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = SyncConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.source.store_url, "file.myshopify.com");
    }
}
