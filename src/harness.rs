//! The replay verification pipeline
//!
//! Decoder, integrity gate, state builder, supervised execution and outcome,
//! strictly in that order. Each stage fails fast and no stage retries or
//! repairs another's output.

use crate::determinism::ReplayJob;
use crate::game::{ConfigBuilder, OutputMode, RunLogger, VerbosityLevel};
use crate::loader::{AssetLoader, BuiltinAssets, Dictionary, EnglishDictionary};
use crate::outcome::RunOutcome;
use crate::replay::{decode, IntegrityGate, ReplayPayload, Verdict};
use crate::supervisor::TimeoutSupervisor;
use std::sync::Arc;
use std::time::Duration;

/// Default wall-clock budget for one run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options for one harness run
#[derive(Debug, Clone)]
pub struct HarnessOptions {
    /// Wall-clock budget for the simulation
    pub timeout: Duration,
    /// Accept replays whose level-gen checksum is zero (testing only)
    pub trust_override: bool,
    pub verbosity: VerbosityLevel,
    pub output_mode: OutputMode,
    /// Record a state hash every N ticks into the result
    pub trace_every: Option<u64>,
    /// Number of parallel replicas that must agree; 1 disables the check
    pub replicas: usize,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        HarnessOptions {
            timeout: DEFAULT_TIMEOUT,
            trust_override: false,
            verbosity: VerbosityLevel::default(),
            output_mode: OutputMode::default(),
            trace_every: None,
            replicas: 1,
        }
    }
}

/// Runs replays through the full verification pipeline
pub struct Harness {
    options: HarnessOptions,
    assets: Arc<dyn AssetLoader>,
    dictionary: Arc<dyn Dictionary>,
    logger: RunLogger,
}

impl Harness {
    pub fn new(options: HarnessOptions) -> Self {
        let mut logger = RunLogger::with_verbosity(options.verbosity);
        logger.set_output_mode(options.output_mode);
        Harness {
            options,
            assets: Arc::new(BuiltinAssets::new()),
            dictionary: Arc::new(EnglishDictionary::new()),
            logger,
        }
    }

    pub fn with_assets(mut self, assets: Arc<dyn AssetLoader>) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_dictionary(mut self, dictionary: Arc<dyn Dictionary>) -> Self {
        self.dictionary = dictionary;
        self
    }

    pub fn options(&self) -> &HarnessOptions {
        &self.options
    }

    /// Pipeline-stage log (the simulation thread logs separately)
    pub fn logger(&self) -> &RunLogger {
        &self.logger
    }

    /// Run raw replay bytes through every stage
    pub async fn run_bytes(&self, bytes: &[u8]) -> RunOutcome {
        match decode(bytes) {
            Ok(payload) => self.run_payload(payload).await,
            Err(err) => self.finish(RunOutcome::from_error(err)),
        }
    }

    /// Run an already decoded replay
    pub async fn run_payload(&self, payload: ReplayPayload) -> RunOutcome {
        self.logger.normal(&format!(
            "Decoded replay: {} actions, levelgen checksum {}",
            payload.actions.len(),
            payload.level_gen_checksum
        ));

        let gate = IntegrityGate::new(self.options.trust_override);
        if let Verdict::Reject(reason) = gate.check(payload.level_gen_checksum) {
            return self.finish(RunOutcome::IntegrityRejected {
                reason,
                message: reason.to_string(),
            });
        }
        if payload.level_gen_checksum == 0 {
            self.logger
                .minimal("Trust override: accepting a replay with a zero levelgen checksum");
        }

        let config = match ConfigBuilder::new(self.assets.as_ref()).build(&payload.config) {
            Ok(config) => config,
            Err(err) => return self.finish(RunOutcome::from_error(err)),
        };
        self.logger.normal(&format!(
            "Config v{} finalized: seed {}, content '{}', {} Hz",
            config.version, config.seed, config.content.name, config.tick_rate
        ));

        let job = ReplayJob {
            config: Arc::new(config),
            actions: payload.actions.into(),
            level_gen_checksum: payload.level_gen_checksum,
            dictionary: Arc::clone(&self.dictionary),
            verbosity: self.options.verbosity,
            output_mode: self.options.output_mode,
            trace_every: self.options.trace_every,
        };
        let replicas = self.options.replicas.max(1);

        let outcome = TimeoutSupervisor::new(self.options.timeout)
            .supervise(move |cancel| job.run_replicas(replicas, &cancel))
            .await;
        self.finish(outcome)
    }

    fn finish(&self, outcome: RunOutcome) -> RunOutcome {
        match &outcome {
            RunOutcome::Completed { result } => self.logger.minimal(&format!(
                "Outcome: completed ({}, {} ticks, hash {})",
                self.dictionary.text(result.end_reason.message_key()),
                result.ticks,
                result.state_hash
            )),
            RunOutcome::TimedOut { timeout_secs } => self
                .logger
                .minimal(&format!("Outcome: timed out after {}s", timeout_secs)),
            RunOutcome::IntegrityRejected { message, .. } => self
                .logger
                .minimal(&format!("Outcome: integrity rejected ({})", message)),
            RunOutcome::InternalError { kind, detail } => self
                .logger
                .minimal(&format!("Outcome: internal error {:?}: {}", kind, detail)),
            RunOutcome::DecodeError { detail } | RunOutcome::ConfigInvalid { detail } => self
                .logger
                .minimal(&format!("Outcome: {} ({})", outcome.kind(), detail)),
        }
        outcome
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(HarnessOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ContentName;
    use crate::loader::ContentPack;

    fn capturing_harness(options: HarnessOptions) -> Harness {
        Harness::new(HarnessOptions {
            verbosity: VerbosityLevel::Normal,
            output_mode: OutputMode::Memory,
            ..options
        })
    }

    #[tokio::test]
    async fn test_pipeline_stops_at_first_failure() {
        let harness = capturing_harness(HarnessOptions::default());
        let outcome = harness.run_bytes(b"{").await;
        assert_eq!(outcome.kind(), "decode_error");

        let logs = harness.logger().logs();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].message.starts_with("Outcome: decode_error"));
    }

    #[tokio::test]
    async fn test_gate_runs_before_config() {
        // Invalid config and zero checksum: the gate must win
        let harness = capturing_harness(HarnessOptions::default());
        let outcome = harness
            .run_bytes(br#"{"config": {"bogus": 1}, "levelGenChecksum": 0, "actions": []}"#)
            .await;
        assert_eq!(outcome.kind(), "integrity_rejected");
    }

    #[tokio::test]
    async fn test_trust_override_is_logged() {
        let harness = capturing_harness(HarnessOptions {
            trust_override: true,
            ..HarnessOptions::default()
        });
        let outcome = harness
            .run_bytes(br#"{"config": {"version": 1, "seed": 1, "max_ticks": 5}, "levelGenChecksum": 0, "actions": []}"#)
            .await;
        assert!(outcome.is_completed());
        assert!(harness
            .logger()
            .logs()
            .iter()
            .any(|e| e.message.starts_with("Trust override")));
    }

    struct TinyAssets;

    impl AssetLoader for TinyAssets {
        fn load_pack(&self, name: &ContentName) -> Option<ContentPack> {
            (name.as_str() == "tiny").then(|| ContentPack {
                name: ContentName::new("tiny"),
                colony_hp: 50,
                max_drones: 8,
                drone_cost: 5,
                drone_harvest: 1,
                drone_damage: 1,
                creep_base_hp: 20,
                creep_hp: 1,
                creep_damage: 1,
                resource_amount: 40,
            })
        }

        fn pack_names(&self) -> Vec<String> {
            vec!["tiny".to_string()]
        }
    }

    struct GermanDictionary;

    impl Dictionary for GermanDictionary {
        fn lang(&self) -> &str {
            "de"
        }

        fn get(&self, key: &str) -> Option<&str> {
            match key {
                "outcome.tick_limit" => Some("Tick-Limit erreicht"),
                _ => None,
            }
        }
    }

    const TINY_REPLAY: &[u8] =
        br#"{"config": {"version": 1, "seed": 3, "content": "tiny", "max_ticks": 10}, "levelGenChecksum": 3, "actions": []}"#;

    #[tokio::test]
    async fn test_custom_asset_loader() {
        let builtin = capturing_harness(HarnessOptions::default());
        assert_eq!(builtin.run_bytes(TINY_REPLAY).await.kind(), "config_invalid");

        let custom = capturing_harness(HarnessOptions::default()).with_assets(Arc::new(TinyAssets));
        let outcome = custom.run_bytes(TINY_REPLAY).await;
        assert!(outcome.is_completed(), "unexpected outcome {outcome:?}");
        assert!(custom
            .logger()
            .logs()
            .iter()
            .any(|e| e.message.contains("content 'tiny'")));
    }

    #[tokio::test]
    async fn test_outcome_line_uses_dictionary() {
        let harness = capturing_harness(HarnessOptions::default())
            .with_assets(Arc::new(TinyAssets))
            .with_dictionary(Arc::new(GermanDictionary));
        let outcome = harness.run_bytes(TINY_REPLAY).await;
        assert!(outcome.is_completed());

        let logs = harness.logger().logs();
        let last = logs.last().unwrap();
        assert!(last.message.starts_with("Outcome: completed (Tick-Limit erreicht, 10 ticks"));
    }

    #[tokio::test]
    async fn test_pipeline_can_be_spawned() {
        fn assert_send<T: Send>(_: &T) {}

        let harness = Arc::new(capturing_harness(HarnessOptions {
            trust_override: true,
            ..HarnessOptions::default()
        }));
        assert_send(&harness.run_bytes(b"{}"));

        let task = {
            let harness = Arc::clone(&harness);
            tokio::spawn(async move {
                harness
                    .run_bytes(br#"{"config": {"version": 1, "seed": 1, "max_ticks": 5}, "levelGenChecksum": 0, "actions": []}"#)
                    .await
            })
        };
        assert!(task.await.unwrap().is_completed());
    }
}
