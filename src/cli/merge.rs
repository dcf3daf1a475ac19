// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};
use crate::error::Result;

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        if self.query.is_none() {
            self.query = config.query;
        }
        // switches can only be turned on by the config
        if !self.split {
            self.split = config.split.unwrap_or(false);
        }
        if !self.info {
            self.info = config.info.unwrap_or(false);
        }
        if self.line_width.is_none() {
            self.line_width = config.fasta_line_width;
        }
        if self.gff_source.is_none() {
            self.gff_source = config.gff_source;
        }
        if self.log_level.is_none() {
            self.log_level = config.log_level;
        }
        self
    }

    /// Load a config file and merge it
    pub fn with_config_file(self, config_path: &str) -> Result<Self> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_takes_precedence() {
        let args = Args {
            query: Some("[0]".to_string()),
            line_width: Some(80),
            ..Args::default()
        };
        let config = Config {
            query: Some("[1]".to_string()),
            split: Some(true),
            fasta_line_width: Some(70),
            gff_source: Some("pipeline".to_string()),
            ..Config::default()
        };
        let merged = args.merge_with_config(config);
        assert_eq!(merged.query.as_deref(), Some("[0]"));
        assert_eq!(merged.line_width, Some(80));
        assert!(merged.split);
        assert!(!merged.info);
        assert_eq!(merged.gff_source.as_deref(), Some("pipeline"));
    }
}
