use std::io;

use thiserror::Error;

use crate::model::FormId;

#[derive(Error, Debug)]
pub enum ShuffleError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("no ingredient records available to shuffle")]
    DataUnavailable,
    #[error("effect pool is empty (during {operation})")]
    PoolExhausted { operation: &'static str },
    #[error("could not fill 4 distinct effects for {record} after {attempts} redraws")]
    PoolInsufficient { record: FormId, attempts: usize },
    #[error("effect groups exhausted: requested group {requested} of {available}")]
    GroupsExhausted { requested: usize, available: usize },
    #[error("unknown record {0}")]
    UnknownRecord(FormId),
    #[error("invalid effect slot {slot} for record {record} with {len} effects")]
    InvalidSlot { record: FormId, slot: usize, len: usize },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
