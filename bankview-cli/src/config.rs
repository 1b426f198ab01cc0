use anyhow::{Context, Result};
use bankview_finance::SamplingRule;
use bankview_ingest::{DEFAULT_ACCOUNT, FileType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_bankview_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub import: ImportSection,
    #[serde(default)]
    pub balance: BalanceSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSection {
    pub default_file_type: FileType,
    /// For file types that do not print the account (e.g. Generic-CSV)
    pub default_account: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSection {
    pub sampling: SamplingRule,
    /// Append a "Total" series summing every account
    pub include_total: bool,
}

impl Default for ImportSection {
    fn default() -> Self {
        Self {
            default_file_type: FileType::GenericCsv,
            default_account: DEFAULT_ACCOUNT.to_string(),
        }
    }
}

impl Default for BalanceSection {
    fn default() -> Self {
        Self {
            sampling: SamplingRule::Lowest,
            include_total: true,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_bankview_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
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
