//! YAML format parser

use crate::{error::ConfigError, Config, Result};

pub fn parse(content: &str) -> Result<Config> {
    parse_with_path(content, None)
}

/// Parse with the file path attached to any error
pub fn parse_with_path(content: &str, path: Option<&str>) -> Result<Config> {
    serde_yaml::from_str(content).map_err(|e| ConfigError::from_yaml_error(e, content, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
conformity:
  high_confidence_threshold: 0.9
  min_evidence_count: 3
"#;
        let config = parse(yaml).unwrap();
        assert_eq!(config.conformity.min_evidence_count, 3);
        assert_eq!(config.conformity.low_confidence_threshold, 0.60);
        assert_eq!(config.retrieval.top_k, 5);
    }

    #[test]
    fn test_parse_empty_yaml() {
        let config = parse("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_backend_is_parse_error() {
        let yaml = "embedding:\n  backend: olama\n";
        let err = parse(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::YamlError { .. }));
    }
}
