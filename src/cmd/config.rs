use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use toml_edit::{DocumentMut, Item, Table, value};

use crate::cli::{ConfigCommand, ConfigSetArgs};
use crate::config;

/// Keys `config set` is allowed to write.
const KNOWN_KEYS: &[&str] = &[
    "tools.aws.path",
    "tools.pip.path",
    "tools.npm.path",
    "runtimes.nodejs",
    "runtimes.python",
];

pub fn run(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Set(args) => set_value(&args),
        ConfigCommand::Path => {
            let path = default_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn default_path() -> Result<PathBuf> {
    if let Some(raw) = std::env::var_os(config::CONFIG_ENV) {
        return Ok(PathBuf::from(raw));
    }
    config::config_path()
        .ok_or_else(|| anyhow!("failed to resolve ~/.layergen/config.toml (no home directory found)"))
}

fn set_value(args: &ConfigSetArgs) -> Result<()> {
    if !KNOWN_KEYS.contains(&args.key.as_str()) {
        bail!(
            "unknown config key `{}`; expected one of: {}",
            args.key,
            KNOWN_KEYS.join(", ")
        );
    }

    let path = match &args.file {
        Some(path) => path.clone(),
        None => default_path()?,
    };

    ensure_parent(&path)?;

    let mut doc = if path.exists() {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        raw.parse::<DocumentMut>()
            .with_context(|| format!("failed to parse {}", path.display()))?
    } else {
        DocumentMut::new()
    };

    apply_key(&mut doc, &args.key, &args.value)?;

    fs::write(&path, doc.to_string())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Updated {}", path.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}

fn apply_key(doc: &mut DocumentMut, key: &str, value_str: &str) -> Result<()> {
    let segments = key.split('.').collect::<Vec<_>>();
    let Some((leaf, parents)) = segments.split_last() else {
        bail!("config key cannot be empty");
    };

    let mut current = doc.as_table_mut();
    for segment in parents {
        current = current
            .entry(segment)
            .or_insert(Item::Table(Table::new()))
            .as_table_mut()
            .ok_or_else(|| anyhow!("`{segment}` is not a table in the config"))?;
    }

    current.insert(leaf, value(value_str));
    Ok(())
}
