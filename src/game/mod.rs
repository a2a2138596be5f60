//! Simulation engine and headless execution

pub mod actions;
pub mod config;
pub mod context;
pub mod controller;
pub mod game_loop;
pub mod logger;
pub mod replay_controller;
pub mod simulation;
pub mod state;
pub mod state_hash;

pub use config::{ConfigBuilder, RawLevelConfig, SimulationConfig, VictoryCondition};
pub use context::ExecutionContext;
pub use controller::{ActionBatch, ActionSource, IdleActionSource};
pub use game_loop::{EndReason, ExecutionController, RunPhase, SimResult};
pub use logger::{LogEntry, OutputMode, RunLogger, VerbosityLevel};
pub use replay_controller::ReplayActionSource;
pub use state::{RunStats, SimulationState};
pub use state_hash::{compute_state_hash, format_hash, TickHash};
