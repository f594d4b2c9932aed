//! Configuração do motor de identificação.
//!
//! Todos os campos têm padrão; um JSON parcial como
//! `{"highlight_mode": "replace_all"}` é válido.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlaceError, Result};
use crate::highlight::HighlightMode;
use crate::similarity::Scorer;
use crate::tokenizer::TokenizerMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub tokenizer_mode: TokenizerMode,
    pub highlight_mode: HighlightMode,
    pub scorer: Scorer,
    /// Capitaliza cada token antes do POS tagging
    pub capitalize_tokens: bool,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PlaceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tokenizer_mode, TokenizerMode::Standard);
        assert_eq!(config.highlight_mode, HighlightMode::Spans);
        assert_eq!(config.scorer, Scorer::Ratio);
        assert!(!config.capitalize_tokens);
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{"highlight_mode": "replace_all", "capitalize_tokens": true}"#;
        let config = EngineConfig::from_json_str(json).unwrap();
        assert_eq!(config.highlight_mode, HighlightMode::ReplaceAll);
        assert!(config.capitalize_tokens);
        assert_eq!(config.scorer, Scorer::Ratio);
    }

    #[test]
    fn test_invalid_json() {
        let err = EngineConfig::from_json_str(r#"{"scorer": "cosine"}"#).unwrap_err();
        assert!(matches!(err, PlaceError::Config(_)));
    }
}
