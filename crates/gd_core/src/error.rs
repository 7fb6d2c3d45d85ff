use thiserror::Error;

use crate::engine::validator::Issue;
use crate::state::Side;

/// Table loading failures. Always fatal at load time.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("{file}: malformed JSON: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{file}: {path}: {message}")]
    Field { file: String, path: String, message: String },

    #[error("{file}: read failed: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

impl SchemaError {
    pub fn field(file: &str, path: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaError::Field { file: file.to_string(), path: path.into(), message: message.into() }
    }

    pub fn json(file: &str, source: serde_json::Error) -> Self {
        SchemaError::Json { file: file.to_string(), source }
    }
}

/// Caller misuse of the snap / penalty-choice protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolViolation {
    #[error("a penalty decision is pending; finalize it before the next action")]
    ChoicePending,

    #[error("no penalty decision is pending")]
    NoPendingChoice,

    #[error("penalty choice {found} does not match pending choice {expected}")]
    StaleChoice { found: u64, expected: u64 },

    #[error("chosen state does not match the {decision} candidate")]
    ChoiceMismatch { decision: String },

    #[error("a try (PAT) is pending")]
    AwaitingPat,

    #[error("no try (PAT) is pending")]
    NoPatPending,

    #[error("{0:?} must kick off before play resumes")]
    KickoffPending(Side),

    #[error("no kickoff is pending")]
    NoKickoffPending,

    #[error("{found:?} cannot kick; {expected:?} is kicking")]
    WrongKicker { expected: Side, found: Side },

    #[error("{found:?} does not have possession")]
    NotInPossession { found: Side },

    #[error("the game is over")]
    GameOver,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Table gap: no entry for sum {sum} in {offense} vs {defense}")]
    TableGap { offense: String, defense: String, sum: u8 },

    #[error("No penalty entry for slot {slot} in table '{table}'")]
    PenaltySlotMissing { table: String, slot: u8 },

    #[error("No penalty table named '{0}'")]
    MissingPenaltyTable(String),

    #[error("No matchup table for {deck}/{play} vs {defense}")]
    MissingMatchup { deck: String, play: String, defense: String },

    #[error("Illegal play: {}", format_issues(.issues))]
    IllegalPlay { issues: Vec<Issue> },

    #[error("Protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),

    #[error("Dice domain violated: {d1}+{d2} is not a tabled non-double sum")]
    DiceDomain { d1: u8, d2: u8 },

    #[error("Game did not finish within {0} actions")]
    ActionLimit(u32),
}

impl EngineError {
    /// Only play-legality issues are meant to be handled by re-prompting the caller.
    pub fn is_recoverable(&self) -> bool {
        match self {
            EngineError::IllegalPlay { .. } => true,
            EngineError::MissingMatchup { .. } => true, // Caller may opt into degraded mode
            EngineError::Schema(_) => false,
            EngineError::TableGap { .. } => false,
            EngineError::PenaltySlotMissing { .. } => false,
            EngineError::Protocol(_) => false,
            _ => false,
        }
    }
}

fn format_issues(issues: &[Issue]) -> String {
    issues.iter().map(|i| i.code.as_str()).collect::<Vec<_>>().join(", ")
}

pub type Result<T> = std::result::Result<T, EngineError>;
