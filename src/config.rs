use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Optional project-level defaults read from `pysig.toml` at the discovery
/// root. CLI flags always override values set here; values set here always
/// override the hardcoded defaults. A missing file is not an error.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub case_sensitive: Option<bool>,
}

impl Config {
    /// Load `pysig.toml` from `root`, if present.
    pub fn load(root: &Path) -> eyre::Result<Config> {
        let path = root.join("pysig.toml");
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&text)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_config_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.ignore.is_empty());
    }

    #[test]
    fn parses_ignore_and_case_sensitive() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("pysig.toml"), "ignore = [\"vendor\", \"migrations\"]\ncase_sensitive = false\n").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.ignore, vec!["vendor".to_string(), "migrations".to_string()]);
        assert_eq!(config.case_sensitive, Some(false));
    }
}
