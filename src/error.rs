//! Error types for the replay harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Malformed replay: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Corrupt action stream at tick {tick}: {detail}")]
    ActionStreamCorrupt { tick: u64, detail: String },

    #[error("Simulation fault at tick {tick}: {detail}")]
    SimulationFault { tick: u64, detail: String },

    #[error("Replicas diverged: {0}")]
    Nondeterministic(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    #[error("Run cancelled at tick {0}")]
    Cancelled(u64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
