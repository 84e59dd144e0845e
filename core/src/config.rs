use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How candidate courses are selected for a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Case-insensitive substring of title or category.
    #[default]
    Containment,
    /// Exact token lookup in the inverted index.
    Token,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub match_mode: MatchMode,
    /// Query words shorter than this are not recorded for completion.
    pub min_completion_len: usize,
    pub completion_limit: usize,
    /// Tokens shorter than this are left out of the spelling vocabulary.
    pub min_vocabulary_len: usize,
    pub max_edit_distance: usize,
    pub spelling_limit: usize,
    pub ranking_page_size: usize,
    pub trending_default: usize,
    pub trending_max: usize,
    pub max_keyword_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::Containment,
            min_completion_len: 2,
            completion_limit: 10,
            min_vocabulary_len: 3,
            max_edit_distance: 2,
            spelling_limit: 5,
            ranking_page_size: 10,
            trending_default: 10,
            trending_max: 20,
            max_keyword_len: 256,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file. Missing keys fall back to defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let cfg: EngineConfig = serde_json::from_str(&raw)?;
        Ok(cfg)
    }

    /// Clamp a requested trending size into `1..=trending_max`.
    pub fn trending_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.trending_default)
            .clamp(1, self.trending_max.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"match_mode":"token","spelling_limit":3}"#).unwrap();
        assert_eq!(cfg.match_mode, MatchMode::Token);
        assert_eq!(cfg.spelling_limit, 3);
        assert_eq!(cfg.completion_limit, 10);
    }

    #[test]
    fn trending_limit_is_capped() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.trending_limit(None), 10);
        assert_eq!(cfg.trending_limit(Some(50)), 20);
        assert_eq!(cfg.trending_limit(Some(0)), 1);
    }
}
