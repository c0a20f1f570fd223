//! Error types for skill table loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading a user skill table
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read skill table {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse skill table TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("skill {skill_id} is listed more than once in {path}")]
    DuplicateSkill { path: PathBuf, skill_id: u32 },
}
