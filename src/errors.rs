//! Error types for model generation and source merging.
//!
//! Only malformed or absent required input is an error. Data-shape problems
//! (unknown field types, value conflicts, a missing companion file) never
//! abort a run; they show up as verification markers in the generated text.

use crate::merge::Side;
use crate::source::NodeId;
use thiserror::Error;

pub type DbModelResult<T> = Result<T, DbModelError>;

#[derive(Error, Debug)]
pub enum DbModelError {
    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    #[error("Configuration Error: {0}")]
    Configuration(String),

    #[error("Unresolved Anchor: {side} action #{action} refers to an insertion that was not applied")]
    UnresolvedAnchor { side: Side, action: usize },

    #[error("Unknown Node: {0}")]
    UnknownNode(NodeId),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}
