//! Reading packet documents and dialect files from disk.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use bitstim::{ScriptDialect, serde::DocumentDef};
use serde::de::DeserializeOwned;

/// Serialization format of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
    Yaml,
}

impl Format {
    /// Picks the format from the file extension, if it names one.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("json") {
            Some(Format::Json)
        } else if ext.eq_ignore_ascii_case("toml") {
            Some(Format::Toml)
        } else if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
            Some(Format::Yaml)
        } else {
            None
        }
    }
}

/// Parses `text` as `format`, or as JSON, TOML then YAML when the format is
/// unknown.
pub fn parse_str<T: DeserializeOwned>(text: &str, format: Option<Format>) -> Result<T> {
    match format {
        Some(Format::Json) => Ok(serde_json::from_str(text)?),
        Some(Format::Toml) => Ok(toml::from_str(text)?),
        Some(Format::Yaml) => Ok(serde_yaml::from_str(text)?),
        None => serde_json::from_str(text).or_else(|json_err| {
            toml::from_str(text).or_else(|toml_err| {
                serde_yaml::from_str(text).map_err(|yaml_err| {
                    anyhow!(
                        "not valid JSON ({json_err}), TOML ({toml_err}) or YAML ({yaml_err})"
                    )
                })
            })
        }),
    }
}

pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_str(&text, Format::from_path(path))
        .with_context(|| format!("failed to parse {}", path.display()))
}

pub fn load_document(path: &Path) -> Result<DocumentDef> {
    let document: DocumentDef = load_file(path)?;
    log::debug!(
        "loaded {} packets from {}",
        document.packets.len(),
        path.display()
    );
    Ok(document)
}

pub fn load_dialect(path: &Path) -> Result<ScriptDialect> {
    load_file(path)
}
