use anyhow::{Context, Result};
use bankview_core::{AccountFilter, TransactionStore};
use std::fs;
use std::path::{Path, PathBuf};

/// `$BANKVIEW_HOME`, else `~/.bankview`
pub fn bankview_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("BANKVIEW_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".bankview"))
}

pub fn ensure_bankview_home() -> Result<PathBuf> {
    let dir = bankview_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn store_path() -> Result<PathBuf> {
    Ok(ensure_bankview_home()?.join("store.json"))
}

pub fn read_store(path: &Path) -> Result<TransactionStore> {
    if !path.exists() {
        return Ok(TransactionStore::new());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_store(path: &Path, store: &TransactionStore) -> Result<()> {
    let json = serde_json::to_string_pretty(store)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Apply a view's account selection. Returns true when the stored filter
/// changed and the store needs saving.
pub fn select_account(store: &mut TransactionStore, account: Option<String>) -> bool {
    let Some(account) = account else {
        return false;
    };
    let filter: AccountFilter = account.parse().unwrap_or_default();
    if store.account_filter() == &filter {
        return false;
    }
    store.set_account_filter(filter);
    true
}

pub fn load_store() -> Result<TransactionStore> {
    read_store(&store_path()?)
}

pub fn save_store(store: &TransactionStore) -> Result<()> {
    write_store(&store_path()?, store)
}
