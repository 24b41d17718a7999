use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_taskrank_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineSection,
    pub store: StoreSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// Used when neither `--strategy` nor the input document names one.
    pub default_strategy: String,
    pub suggest_limit: usize,
    /// IANA timezone used to decide what "today" is.
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Relative paths resolve against the taskrank home.
    pub path: PathBuf,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// `tracing` filter directive; `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            default_strategy: "balanced".to_string(),
            suggest_limit: 3,
            timezone: "UTC".to_string(),
        }
    }
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tasks.json"),
            timeout_ms: 2000,
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn store_path(&self, home: &Path) -> PathBuf {
        if self.store.path.is_absolute() {
            self.store.path.clone()
        } else {
            home.join(&self.store.path)
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_taskrank_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str("[engine]\ndefault_strategy = \"deadline\"\n").unwrap();
        assert_eq!(cfg.engine.default_strategy, "deadline");
        assert_eq!(cfg.engine.suggest_limit, 3);
        assert_eq!(cfg.store.timeout_ms, 2000);
        assert_eq!(cfg.log.filter, "warn");
    }

    #[test]
    fn default_roundtrips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, Config::default());
    }

    #[test]
    fn relative_store_path_lives_under_home() {
        let cfg = Config::default();
        assert_eq!(cfg.store_path(Path::new("/tmp/tr")), PathBuf::from("/tmp/tr/tasks.json"));
    }
}
