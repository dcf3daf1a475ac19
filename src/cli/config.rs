// config.rs - Configuration file support

use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    // Conversion
    pub query: Option<String>,
    pub split: Option<bool>,
    pub info: Option<bool>,

    // Formats
    pub fasta_line_width: Option<usize>,
    pub gff_source: Option<String>,

    // Logging
    pub log_level: Option<String>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConvertError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            ConvertError::Config(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConvertError::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content).map_err(|e| ConvertError::Create {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# seqconvert.toml - Configuration file for seqconvert
# Command line arguments will override these settings

# =============================================================================
# CONVERSION
# =============================================================================

# JMESPath query applied to the list of input records
# query = "[?!(features[?type=='source'].qualifiers.plasmid)]"

# Write each resulting item to its own file (<stem>.<index>.<ext>)
split = false

# Print a GFF3 summary line per record to stdout
info = false

# =============================================================================
# FORMATS
# =============================================================================

# Residues per line for fasta output
fasta_line_width = 60

# Source column for gff3/gtf output when a feature has no source qualifier
gff_source = "seqconvert"

# =============================================================================
# LOGGING
# =============================================================================

# Level used when RUST_LOG is unset: error, warn, info, debug, trace
log_level = "warn"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(&Config::generate_sample()).unwrap();
        assert_eq!(config.split, Some(false));
        assert_eq!(config.fasta_line_width, Some(60));
        assert_eq!(config.gff_source.as_deref(), Some("seqconvert"));
        assert!(config.query.is_none());
    }

    #[test]
    fn test_round_trip_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seqconvert.toml");
        let config = Config {
            query: Some("[0]".to_string()),
            info: Some(true),
            ..Config::default()
        };
        config.to_file(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "threads = 4\n").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConvertError::Config(_))
        ));
    }
}
