use thiserror::Error;

use crate::automaton::StateId;

/// Everything that can go wrong while editing or transforming an automaton.
#[derive(Error, Debug)]
pub enum AutomatonError {
    #[error("state q{0} does not exist")]
    UnknownState(StateId),
    #[error("position ({0}, {1}) is not finite")]
    InvalidPosition(f64, f64),
    #[error("transition symbol must not be blank")]
    RejectedTransition,
    #[error("the automaton is not deterministic")]
    NotDeterministic,
    #[error("expected exactly one initial state, found {0}")]
    NoSingleInitialState(usize),
    #[error("the automaton has no initial state")]
    NoInitialState,
    #[error("symbol `{0}` is not part of the alphabet")]
    UnknownSymbol(String),
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AutomatonError>;
