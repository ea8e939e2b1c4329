pub mod fes;
pub mod sf;
pub mod tes;

use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tauid_core::{Estimate, GenMatch, JsonStore, StoreConfig};
use tracing::debug;

/// Environment variable naming the artifact directory.
pub const DATA_ENV: &str = "TAUID_DATA";

/// Artifact directory relative to a CMSSW release area.
const CMSSW_DATA: &str = "src/TauPOG/TauIDSFs/data";

/// Resolves the store configuration: `--data-dir`, then `--config`, then
/// `$TAUID_DATA`, then the CMSSW release area.
pub fn resolve_store_config(
    data_dir: Option<&Path>,
    config: Option<&Path>,
    data_env: Option<String>,
    cmssw_base: Option<String>,
) -> Result<StoreConfig, Box<dyn Error>> {
    if let Some(dir) = data_dir {
        return Ok(StoreConfig::new(dir));
    }
    if let Some(path) = config {
        return Ok(StoreConfig::from_toml_file(path)?);
    }
    if let Some(dir) = data_env.filter(|dir| !dir.is_empty()) {
        return Ok(StoreConfig::new(dir));
    }
    if let Some(base) = cmssw_base.filter(|base| !base.is_empty()) {
        return Ok(StoreConfig::new(PathBuf::from(base).join(CMSSW_DATA)));
    }
    Err(format!("no data directory: pass --data-dir or --config, or set {DATA_ENV}").into())
}

pub fn open_store(
    data_dir: Option<&Path>,
    config: Option<&Path>,
) -> Result<JsonStore, Box<dyn Error>> {
    let config = resolve_store_config(
        data_dir,
        config,
        env::var(DATA_ENV).ok(),
        env::var("CMSSW_BASE").ok(),
    )?;
    debug!(data_dir = %config.data_dir.display(), "using artifact directory");
    Ok(JsonStore::new(config))
}

pub fn genmatch(code: i32) -> Result<GenMatch, Box<dyn Error>> {
    Ok(GenMatch::try_from(code)?)
}

/// One evaluated grid point.
#[derive(Debug, Clone, Serialize)]
pub struct Row {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dm: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<f64>,
    pub result: Estimate,
}

#[derive(Debug, Serialize)]
struct Table<'a, M: Serialize> {
    meta: &'a M,
    rows: &'a [Row],
}

/// Prints rows as a plain table, or as JSON together with `meta`.
pub fn emit<M: Serialize>(
    meta: &M,
    title: &str,
    rows: &[Row],
    json: bool,
) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&Table { meta, rows })?);
        return Ok(());
    }
    println!("{title}");
    for row in rows {
        let mut keys = Vec::new();
        if let Some(pt) = row.pt {
            keys.push(format!("pt={pt:>7.2}"));
        }
        if let Some(dm) = row.dm {
            keys.push(format!("dm={dm:>2}"));
        }
        if let Some(eta) = row.eta {
            keys.push(format!("eta={eta:>5.2}"));
        }
        let value = match row.result {
            Estimate::Value(value) => format!("{value:.5}"),
            Estimate::Triple(triple) => format!(
                "{:.5} {:.5} {:.5}",
                triple.down, triple.central, triple.up
            ),
        };
        println!("  {}  {value}", keys.join("  "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_environment() {
        let config = resolve_store_config(
            Some(Path::new("/flag")),
            None,
            Some("/env".into()),
            Some("/cmssw".into()),
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/flag"));
    }

    #[test]
    fn environment_then_release_area() {
        let config = resolve_store_config(None, None, Some("/env".into()), Some("/cmssw".into()))
            .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/env"));
        let config = resolve_store_config(None, None, Some(String::new()), Some("/cmssw".into()))
            .unwrap();
        assert_eq!(
            config.data_dir,
            PathBuf::from("/cmssw/src/TauPOG/TauIDSFs/data")
        );
        assert!(resolve_store_config(None, None, None, None).is_err());
    }
}
