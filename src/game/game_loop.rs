//! Headless execution controller
//!
//! Drives the fixed-timestep loop: each tick pulls the scheduled actions from
//! an [`ActionSource`], applies them in recorded order, advances the simulation
//! by one fixed delta, then evaluates the terminal predicates. Nothing here
//! renders, reads live input or looks at the wall clock.

use crate::core::SimEntity;
use crate::game::config::{SimulationConfig, VictoryCondition};
use crate::game::context::ExecutionContext;
use crate::game::controller::ActionSource;
use crate::game::logger::{RunLogger, VerbosityLevel};
use crate::game::simulation::{self, TickEvents};
use crate::game::state::{RunStats, SimulationState};
use crate::game::state_hash::{compute_state_hash, format_hash, TickHash};
use crate::loader::WorldInitializer;
use crate::supervisor::CancelSignal;
use crate::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-tick logging that compiles away without the `verbose-logging` feature
macro_rules! log_if_verbose {
    ($logger:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $logger.verbose(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$logger;
        }
    };
}

/// Reason the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Every creep base was destroyed
    Victory,
    /// Every colony was destroyed
    Defeat,
    /// The last colony and the last creep base fell in the same tick
    Draw,
    /// The configured tick limit was reached
    TickLimit,
}

impl EndReason {
    /// Dictionary key of the human-readable summary
    pub fn message_key(&self) -> &'static str {
        match self {
            EndReason::Victory => "outcome.victory",
            EndReason::Defeat => "outcome.defeat",
            EndReason::Draw => "outcome.draw",
            EndReason::TickLimit => "outcome.tick_limit",
        }
    }
}

/// Outcome of a run that reached a terminal state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimResult {
    pub victory: bool,
    pub end_reason: EndReason,
    /// Ticks simulated
    pub ticks: u64,
    /// Simulated (not wall-clock) time
    pub game_time_ms: u64,
    pub score: i64,
    /// Echo of the replay's level-generation checksum
    pub level_gen_checksum: i64,
    /// Hash of the final state, 16 hex digits
    pub state_hash: String,
    pub colonies_alive: u32,
    pub creep_bases_alive: u32,
    pub stats: RunStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<TickHash>>,
}

/// Lifecycle of an execution controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunPhase {
    /// World not built yet
    Initializing,
    /// Ticks are being simulated
    Running,
    /// Terminal; the result never changes
    Finished(SimResult),
    /// A tick failed; the controller cannot continue
    Aborted,
}

/// Fixed-timestep controller for one run
pub struct ExecutionController {
    ctx: ExecutionContext,
    config: Arc<SimulationConfig>,
    source: Box<dyn ActionSource + Send>,
    level_gen_checksum: i64,
    state: Option<SimulationState>,
    phase: RunPhase,
    trace: Vec<TickHash>,
}

impl ExecutionController {
    pub fn new(
        ctx: ExecutionContext,
        config: Arc<SimulationConfig>,
        source: Box<dyn ActionSource + Send>,
        level_gen_checksum: i64,
    ) -> Self {
        ExecutionController {
            ctx,
            config,
            source,
            level_gen_checksum,
            state: None,
            phase: RunPhase::Initializing,
            trace: Vec::new(),
        }
    }

    pub fn phase(&self) -> &RunPhase {
        &self.phase
    }

    /// Current state; `None` before initialization
    pub fn state(&self) -> Option<&SimulationState> {
        self.state.as_ref()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn logger(&self) -> &RunLogger {
        &self.ctx.logger
    }

    /// Build the tick-0 world; a no-op once the run has started
    pub fn initialize(&mut self) -> Result<()> {
        if self.phase != RunPhase::Initializing {
            return Ok(());
        }

        let state = WorldInitializer::new(&self.config).init_state()?;
        if self.ctx.trace_every.is_some() {
            self.trace.push(TickHash {
                tick: 0,
                hash: compute_state_hash(&state),
            });
        }

        self.ctx.logger.minimal(&format!(
            "{}: {} colonies, {} creep bases, {}x{} grid at {} Hz",
            self.ctx.text("run.started"),
            state.colonies.len(),
            state.creep_bases.len(),
            self.config.world_width,
            self.config.world_height,
            self.config.tick_rate
        ));

        self.state = Some(state);
        self.phase = RunPhase::Running;
        Ok(())
    }

    /// Simulate exactly one tick
    ///
    /// Returns `Some(result)` once the run is finished; after that every call
    /// returns the same result without advancing. An error aborts the run.
    pub fn step(&mut self) -> Result<Option<SimResult>> {
        match &self.phase {
            RunPhase::Finished(result) => return Ok(Some(result.clone())),
            RunPhase::Aborted => {
                return Err(HarnessError::SimulationFault {
                    tick: self.state.as_ref().map_or(0, |s| s.tick),
                    detail: "run was aborted by an earlier error".to_string(),
                })
            }
            RunPhase::Initializing => self.initialize()?,
            RunPhase::Running => {}
        }

        match self.advance_one() {
            Ok(finished) => Ok(finished),
            Err(e) => {
                self.phase = RunPhase::Aborted;
                Err(e)
            }
        }
    }

    /// Run to completion, checking `cancel` between ticks
    pub fn run(&mut self, cancel: &CancelSignal) -> Result<SimResult> {
        self.initialize()?;
        loop {
            if cancel.is_cancelled() {
                let tick = self.state.as_ref().map_or(0, |s| s.tick);
                self.ctx.logger.normal(&format!("Cancelled at tick {}", tick));
                return Err(HarnessError::Cancelled(tick));
            }
            if let Some(result) = self.step()? {
                return Ok(result);
            }
        }
    }

    fn advance_one(&mut self) -> Result<Option<SimResult>> {
        let config = Arc::clone(&self.config);
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| HarnessError::SimulationFault {
                tick: 0,
                detail: "controller stepped before initialization".to_string(),
            })?;
        let tick = state.tick;

        // (a) recorded actions for this tick, in recorded order
        let batch = self.source.actions_for_tick(tick)?;
        for event in &batch {
            state.apply_action(&config, event)?;
            self.ctx.logger.categorized(
                VerbosityLevel::Normal,
                "action",
                &format!("tick {}: actor {} {:?}", tick, event.actor, event.kind),
            );
        }

        // (b) one fixed delta
        let events = simulation::advance(state, &config)?;
        log_events(&self.ctx, state, tick, &events);
        log_if_verbose!(
            self.ctx.logger,
            "tick {} done: {} colonies alive, {} creep bases alive, {} creeps",
            state.tick,
            state.live_colonies(),
            state.live_creep_bases(),
            state.creeps.len()
        );

        if let Some(every) = self.ctx.trace_every {
            if state.tick % every == 0 {
                self.trace.push(TickHash {
                    tick: state.tick,
                    hash: compute_state_hash(state),
                });
            }
        }

        // (c) terminal predicates
        let Some(reason) = evaluate_end(state, &config)? else {
            return Ok(None);
        };

        let remaining = self.source.remaining();
        if remaining > 0 {
            return Err(HarnessError::ActionStreamCorrupt {
                tick: state.tick,
                detail: format!(
                    "simulation ended ({:?}) with {} recorded actions never applied",
                    reason, remaining
                ),
            });
        }

        let trace = self.ctx.trace_every.map(|_| std::mem::take(&mut self.trace));
        let result = build_result(state, &config, self.level_gen_checksum, trace, reason);

        self.ctx.logger.categorized(
            VerbosityLevel::Minimal,
            "outcome",
            &format!(
                "{} after {} ticks ({} ms game time): {} (score {}, hash {})",
                self.ctx.text("run.finished"),
                result.ticks,
                result.game_time_ms,
                self.ctx.text(reason.message_key()),
                result.score,
                result.state_hash
            ),
        );

        self.phase = RunPhase::Finished(result.clone());
        Ok(Some(result))
    }
}

/// Terminal predicates, in priority order
///
/// Draw, defeat and victory are checked before the state invariants so that a
/// run which ends this tick reports how it ended; the tick limit comes last.
pub fn evaluate_end(state: &SimulationState, config: &SimulationConfig) -> Result<Option<EndReason>> {
    let colonies = state.live_colonies();
    let bases = state.live_creep_bases();
    let victory_enabled = config.victory == VictoryCondition::DestroyCreepBases;

    if victory_enabled && colonies == 0 && bases == 0 {
        return Ok(Some(EndReason::Draw));
    }
    if colonies == 0 {
        return Ok(Some(EndReason::Defeat));
    }
    if victory_enabled && bases == 0 {
        return Ok(Some(EndReason::Victory));
    }

    state.check_invariants(config)?;

    match config.max_ticks {
        Some(limit) if state.tick >= limit => Ok(Some(EndReason::TickLimit)),
        _ => Ok(None),
    }
}

fn build_result(
    state: &SimulationState,
    config: &SimulationConfig,
    level_gen_checksum: i64,
    trace: Option<Vec<TickHash>>,
    reason: EndReason,
) -> SimResult {
    SimResult {
        victory: reason == EndReason::Victory,
        end_reason: reason,
        ticks: state.tick,
        game_time_ms: config.game_time_ms(state.tick),
        score: compute_score(state),
        level_gen_checksum,
        state_hash: format_hash(compute_state_hash(state)),
        colonies_alive: state.live_colonies() as u32,
        creep_bases_alive: state.live_creep_bases() as u32,
        stats: state.stats.clone(),
        trace,
    }
}

/// Score: resources gathered, kills, and the hit points the colonies kept
fn compute_score(state: &SimulationState) -> i64 {
    let stats = &state.stats;
    let hp_left: i64 = state
        .colonies
        .iter()
        .filter(|(_, c)| c.is_alive())
        .map(|(_, c)| c.hp as i64)
        .sum();

    stats.resources_gathered
        + 10 * stats.creeps_killed as i64
        + 250 * stats.creep_bases_destroyed as i64
        + 5 * stats.drones_built as i64
        + hp_left
}

fn log_events(ctx: &ExecutionContext, state: &SimulationState, tick: u64, events: &TickEvents) {
    for id in &events.colonies_destroyed {
        let name = state.colonies.get(*id).map(|c| c.name()).unwrap_or("?");
        ctx.logger.categorized(
            VerbosityLevel::Normal,
            "sim_event",
            &format!("tick {}: {} ({})", tick, ctx.text("colony.destroyed"), name),
        );
    }
    for id in &events.creep_bases_destroyed {
        let name = state.creep_bases.get(*id).map(|b| b.name()).unwrap_or("?");
        ctx.logger.categorized(
            VerbosityLevel::Normal,
            "sim_event",
            &format!("tick {}: {} ({})", tick, ctx.text("creep_base.destroyed"), name),
        );
    }
    if events.creeps_spawned > 0 || events.creeps_killed > 0 {
        log_if_verbose!(
            ctx.logger,
            "tick {}: {} creeps spawned, {} killed",
            tick,
            events.creeps_spawned,
            events.creeps_killed
        );
    }
}
