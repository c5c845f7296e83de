use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file, looked up in the working directory.
pub const CONFIG_FILE: &str = "saldo.toml";

/// Environment variable holding the OpenAI credential. Never read from the
/// config file; when unset the insights feature is hidden entirely.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the CSV exports.
    pub data_dir: PathBuf,
    /// Load credit card, investment, and loan exports in addition to the
    /// mandatory bank statements.
    pub include_secondary_sources: bool,
    /// Which sources feed the headline balance figure.
    pub balance: BalanceMode,
    pub llm: LlmSection,
}

/// The two historical dashboard variants disagreed on the headline number;
/// the choice is explicit here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BalanceMode {
    /// Statement total alone.
    CashOnly,
    /// Statement total plus investments minus loans.
    NetWorth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            include_secondary_sources: true,
            balance: BalanceMode::NetWorth,
            llm: LlmSection::default(),
        }
    }
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Load configuration from `path` when given, else from `./saldo.toml`
/// when present, else defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let p = PathBuf::from(CONFIG_FILE);
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// The OpenAI credential, if configured in the environment.
pub fn api_key() -> Option<String> {
    std::env::var(API_KEY_VAR).ok().filter(|k| !k.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert!(cfg.include_secondary_sources);
        assert_eq!(cfg.balance, BalanceMode::NetWorth);
        assert_eq!(cfg.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn test_partial_config_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saldo.toml");
        fs::write(&path, "data_dir = \"exports\"\nbalance = \"cash-only\"\n").unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("exports"));
        assert_eq!(cfg.balance, BalanceMode::CashOnly);
        // Untouched fields keep their defaults.
        assert!(cfg.include_secondary_sources);
        assert_eq!(cfg.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(load_config(Some(&path)).is_err());
    }
}
