use std::path::{Path, PathBuf};

use crate::cli::context::CliContext;
use crate::config::Config;
use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand};
use serde_yaml::{Mapping, Value};
use tokio::fs;
use tracing::info;

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Print the effective file contents
    Show,

    /// Change one key, e.g. `timeline.px_per_second 80`
    Set {
        /// Dotted key
        key: String,

        /// New value, read as a YAML scalar
        value: String,
    },

    /// Print one key
    Get {
        /// Dotted key
        key: String,
    },

    /// Overwrite the file with defaults
    Reset,

    /// Check the file parses and its values are usable
    Validate,
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext) -> Result<()> {
    let file = ConfigFile::new(ctx.config_path());
    match args.action {
        ConfigAction::Show => {
            let config = file.load().await?;
            println!("# {}", file.path.display());
            print!("{}", serde_yaml::to_string(&config)?);
        }
        ConfigAction::Get { key } => {
            let key = KeyPath::parse(&key)?;
            let doc = serde_yaml::to_value(file.load().await?)?;
            let value = key
                .lookup(&doc)
                .ok_or_else(|| anyhow!("{key} not found in configuration"))?;
            print!("{}", serde_yaml::to_string(value)?);
        }
        ConfigAction::Set { key, value } => {
            let key = KeyPath::parse(&key)?;
            let mut doc = serde_yaml::to_value(file.load().await?)?;
            if key.lookup(&doc).is_none() {
                bail!("{key} is not a configuration key");
            }
            key.assign(&mut doc, parse_scalar(&value))?;
            let updated: Config = serde_yaml::from_value(doc)
                .with_context(|| format!("{key} cannot be set to {value:?}"))?;
            updated.validate()?;
            file.save(&updated).await?;
            info!(%key, "configuration updated");
            println!("Saved configuration to {}", file.path.display());
        }
        ConfigAction::Reset => {
            file.save(&Config::default()).await?;
            println!("Wrote default configuration to {}", file.path.display());
        }
        ConfigAction::Validate => {
            if !file.exists().await {
                println!(
                    "No configuration file at {}; defaults are valid",
                    file.path.display()
                );
                return Ok(());
            }
            file.load()
                .await?
                .validate()
                .with_context(|| format!("validating {}", file.path.display()))?;
            println!("Configuration file {} is valid", file.path.display());
        }
    }
    Ok(())
}

/// The YAML file behind `--config`; a missing file reads as defaults.
struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    async fn load(&self) -> Result<Config> {
        if !self.exists().await {
            return Ok(Config::default());
        }
        let raw = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        serde_yaml::from_str(&raw).with_context(|| format!("parsing {}", self.path.display()))
    }

    async fn save(&self, config: &Config) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        fs::write(&self.path, serde_yaml::to_string(config)?)
            .await
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

/// Dotted path into the configuration document.
#[derive(Debug, PartialEq)]
struct KeyPath(Vec<String>);

impl KeyPath {
    fn parse(raw: &str) -> Result<Self> {
        let segments: Vec<String> = raw
            .split('.')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        if segments.is_empty() {
            bail!("configuration key cannot be empty");
        }
        Ok(Self(segments))
    }

    fn lookup<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.0
            .iter()
            .try_fold(doc, |node, segment| node.as_mapping()?.get(segment.as_str()))
    }

    fn assign(&self, doc: &mut Value, value: Value) -> Result<()> {
        let (leaf, parents) = self
            .0
            .split_last()
            .ok_or_else(|| anyhow!("configuration key cannot be empty"))?;
        let mut node = doc;
        for segment in parents {
            node = section(node, segment)?
                .entry(Value::String(segment.clone()))
                .or_insert(Value::Null);
        }
        section(node, leaf)?.insert(Value::String(leaf.clone()), value);
        Ok(())
    }
}

impl std::fmt::Display for KeyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

fn section<'a>(node: &'a mut Value, segment: &str) -> Result<&'a mut Mapping> {
    if node.is_null() {
        *node = Value::Mapping(Mapping::new());
    }
    match node {
        Value::Mapping(map) => Ok(map),
        _ => bail!("cannot descend into {segment}: parent is not a section"),
    }
}

// Unparseable input is kept verbatim as a string.
fn parse_scalar(raw: &str) -> Value {
    serde_yaml::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
