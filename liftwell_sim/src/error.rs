// Error types for the elevator system.
//
// The core itself has no error paths: lookups that miss return `None` and
// redundant inserts/removals are no-ops. Errors exist only at the edges:
// loading configuration, talking to decorative feedback collaborators, and
// loading sandbox scenarios.
//
// See also: `config.rs` for where `ConfigError` is produced, `elevator.rs`
// for how `FeedbackError` is logged and dropped, `sandbox.rs` for
// `ScenarioError`.

use crate::types::{AgentId, WorldId};
use std::path::PathBuf;
use thiserror::Error;

/// Which configured material a name was meant for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialRole {
    Center,
    Rim,
}

impl std::fmt::Display for MaterialRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialRole::Center => f.write_str("center"),
            MaterialRole::Rim => f.write_str("rim"),
        }
    }
}

/// Failure to load or interpret an `ElevatorConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown {role} material {name:?}")]
    UnknownMaterial { role: MaterialRole, name: String },

    #[error("display duration must be at least one second")]
    InvalidDisplayDuration,
}

/// A decorative collaborator could not do what it was asked.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("no display available for {agent}")]
    Unavailable { agent: AgentId },

    #[error("feedback rejected: {reason}")]
    Rejected { reason: String },
}

/// Failure to load or run a sandbox scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("scenario references unknown {0}")]
    UnknownWorld(WorldId),

    #[error("scenario references unknown {0}")]
    UnknownAgent(AgentId),

    #[error("scenario commands are not sorted by tick (tick {found} after {previous})")]
    UnsortedCommands { previous: u64, found: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_material_message_names_role_and_value() {
        let err = ConfigError::UnknownMaterial {
            role: MaterialRole::Rim,
            name: "unobtainium".into(),
        };
        assert_eq!(err.to_string(), "unknown rim material \"unobtainium\"");
    }

    #[test]
    fn parse_error_converts_from_serde() {
        let serde_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ConfigError = serde_err.into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
