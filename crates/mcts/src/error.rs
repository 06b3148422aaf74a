use hex_core::{Action, BoardError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MctsError {
    #[error("Board error: {0}")]
    Board(#[from] BoardError),

    #[error("Terminal position cannot be searched")]
    TerminalPosition,

    #[error("No search has been started")]
    NotStarted,

    #[error("Root position is already terminal")]
    TerminalRoot,

    #[error("Action {action} cannot be played from the root: {source}")]
    IllegalTransition {
        action: Action,
        #[source]
        source: BoardError,
    },
}

impl MctsError {
    /// True for engine API calls made out of sequence or with an unplayable action.
    pub fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            MctsError::NotStarted | MctsError::TerminalRoot | MctsError::IllegalTransition { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MctsError>;
