//! apoc.toml configuration
//!
//! Holds defaults for the output switches so they don't have to be repeated
//! on every command line. Switches given on the command line are combined
//! with these: boolean switches can only turn an option on, while values
//! replace the configured ones.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::obj::PolygonSplit;

/// File looked for in the current directory when no config is given
pub const DEFAULT_CONFIG_FILE: &str = "apoc.toml";

/// Material library referenced by OBJ output unless configured otherwise
pub const DEFAULT_MTLLIB: &str = "sf3k.mtl";

/// apoc.toml structure
#[derive(Debug, Default, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub output: OutputSection,
}

/// Output configuration section
#[derive(Debug, Deserialize)]
pub struct OutputSection {
    /// Material library named in the OBJ header
    #[serde(default = "default_mtllib")]
    pub mtllib: String,

    /// Name materials after palette colours instead of colour numbers
    #[serde(default)]
    pub human: bool,

    /// Give each primitive its own colour
    #[serde(default)]
    pub false_colour: bool,

    /// Keep vertices no primitive refers to
    #[serde(default)]
    pub unused: bool,

    /// Keep vertices with the same coordinates as an earlier one
    #[serde(default)]
    pub duplicate: bool,

    /// Write relative (negative) vertex references
    #[serde(default)]
    pub negative: bool,

    /// Cut overlapping coplanar polygons apart
    #[serde(default)]
    pub clip: bool,

    /// Turn flats to face upwards
    #[serde(default)]
    pub flip: bool,

    /// Split polygons into triangles
    #[serde(default)]
    pub split: PolygonSplit,
}

fn default_mtllib() -> String {
    DEFAULT_MTLLIB.to_string()
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            mtllib: default_mtllib(),
            human: false,
            false_colour: false,
            unused: false,
            duplicate: false,
            negative: false,
            clip: false,
            flip: false,
            split: PolygonSplit::None,
        }
    }
}

impl ExportConfig {
    /// Load config from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Parse config from a string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse apoc.toml")
    }

    /// Load the explicitly named config, or apoc.toml from the current
    /// directory if there is one, or fall back to defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    tracing::debug!("Using {}", local.display());
                    Self::load(&local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_empty() {
        let config = ExportConfig::parse("").unwrap();
        assert_eq!(config.output.mtllib, "sf3k.mtl");
        assert!(!config.output.clip);
        assert_eq!(config.output.split, PolygonSplit::None);
    }

    #[test]
    fn test_config_output_section() {
        let config = ExportConfig::parse(
            r#"
[output]
mtllib = "apoc.mtl"
human = true
negative = true
split = "strips"
"#,
        )
        .unwrap();

        assert_eq!(config.output.mtllib, "apoc.mtl");
        assert!(config.output.human);
        assert!(config.output.negative);
        assert!(!config.output.unused);
        assert_eq!(config.output.split, PolygonSplit::Strips);
    }

    #[test]
    fn test_config_bad_split() {
        let result = ExportConfig::parse(
            r#"
[output]
split = "quads"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_config_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ExportConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_config_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apoc.toml");
        std::fs::write(&path, "[output]\nclip = true\nflip = true\n").unwrap();

        let config = ExportConfig::discover(Some(&path)).unwrap();
        assert!(config.output.clip);
        assert!(config.output.flip);
    }
}
