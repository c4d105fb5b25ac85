//! Refinement orchestration
//!
//! Drives the retry loop against the generator collaborator: parse and
//! validate a draft, and while any placement is rejected, send a correction
//! request carrying the previous text plus every reject with its reason,
//! then re-validate the regenerated output.
//!
//! The loop is inherently sequential (each cycle depends on the previous
//! cycle's rejects) and bounded: after [`MAX_REFINEMENT_CYCLES`] correction
//! rounds the last draft is returned as an `Exhausted` outcome rather than
//! looping forever. Dropping the returned future cancels cleanly at any
//! await point; grid and plan are rebuilt fresh each cycle, so there is
//! nothing to unwind.

use crate::brick::RejectedBrick;
use crate::generator::{BuildGenerator, GenerationRequest};
use crate::parse::{parse_instructions, BuildPlan};
use crate::validate::{validate_placements, ValidationReport};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Correction rounds allowed after the initial draft.
pub const MAX_REFINEMENT_CYCLES: u32 = 3;

/// A finished build: the generator text as received, what it parsed to,
/// and how validation went.
#[derive(Debug, Clone, Serialize)]
pub struct FinalBuild {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Instruction text verbatim, as required by downstream consumers
    /// (display, feedback submission).
    pub instructions: String,
    pub plan: BuildPlan,
    pub report: ValidationReport,
    /// Correction cycles consumed; 0 means the first draft passed.
    pub cycles: u32,
}

impl FinalBuild {
    fn new(instructions: String, plan: BuildPlan, report: ValidationReport, cycles: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            instructions,
            plan,
            report,
            cycles,
        }
    }
}

/// Terminal result of a refinement run.
#[derive(Debug, Clone, Serialize)]
pub enum RefinementOutcome {
    /// Every placement of the final draft was accepted.
    Accepted(FinalBuild),
    /// The cycle cap was reached; the build still carries rejects.
    Exhausted(FinalBuild),
}

impl RefinementOutcome {
    pub fn build(&self) -> &FinalBuild {
        match self {
            RefinementOutcome::Accepted(build) | RefinementOutcome::Exhausted(build) => build,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, RefinementOutcome::Accepted(_))
    }
}

/// Where the loop stands between generator calls.
enum LoopState {
    /// A draft has been received and awaits parse + validation.
    Drafted(String),
    /// Rejects from the previous draft await a correction request.
    AwaitingCorrection {
        previous_text: String,
        rejected: Vec<RejectedBrick>,
    },
}

pub struct RefinementOrchestrator<G> {
    generator: G,
    max_cycles: u32,
}

impl<G: BuildGenerator> RefinementOrchestrator<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            max_cycles: MAX_REFINEMENT_CYCLES,
        }
    }

    pub fn with_max_cycles(mut self, max_cycles: u32) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    /// Run the generate → parse → validate → correct loop to a terminal
    /// outcome.
    ///
    /// Errors are whole-request failures only: the generator call failed,
    /// or a draft contained no parseable steps at all. Per-placement
    /// problems never error; they drive the next correction cycle or end
    /// up in the `Exhausted` report.
    pub async fn run(&self, request: GenerationRequest) -> anyhow::Result<RefinementOutcome> {
        let mut cycles = 0u32;
        let mut state = LoopState::Drafted(self.generator.complete(&request).await?);

        loop {
            match state {
                LoopState::Drafted(text) => {
                    let plan = parse_instructions(&text);
                    for skip in &plan.skipped {
                        eprintln!("  Skipped line {}: {}", skip.line_number, skip.reason);
                    }
                    if plan.placements.is_empty() {
                        anyhow::bail!(
                            "Generator produced no parseable build steps ({} line(s) skipped)",
                            plan.skipped.len()
                        );
                    }

                    let report = validate_placements(&plan.placements);
                    if report.all_accepted() {
                        return Ok(RefinementOutcome::Accepted(FinalBuild::new(
                            text, plan, report, cycles,
                        )));
                    }
                    if cycles >= self.max_cycles {
                        return Ok(RefinementOutcome::Exhausted(FinalBuild::new(
                            text, plan, report, cycles,
                        )));
                    }

                    state = LoopState::AwaitingCorrection {
                        previous_text: text,
                        rejected: report.rejected,
                    };
                }
                LoopState::AwaitingCorrection {
                    previous_text,
                    rejected,
                } => {
                    cycles += 1;
                    eprintln!(
                        "  {} placement(s) rejected; requesting correction (cycle {}/{})",
                        rejected.len(),
                        cycles,
                        self.max_cycles
                    );
                    let correction = GenerationRequest::correction(previous_text, rejected);
                    state = LoopState::Drafted(self.generator.complete(&correction).await?);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const GOOD: &str = "\
Step 1: Place 2x4 red brick at (0,0,0), facing horizontal
Step 2: Place 1x2 blue brick at (0,0,1), facing horizontal
Parts Used Summary:
- 1x 2x4 red brick
- 1x 1x2 blue brick
";

    const FLOATING: &str = "\
Step 1: Place 2x4 red brick at (0,0,0), facing horizontal
Step 2: Place 1x2 blue brick at (8,8,5), facing horizontal
Parts Used Summary:
- 1x 2x4 red brick
- 1x 1x2 blue brick
";

    struct ScriptedGenerator {
        responses: Mutex<VecDeque<String>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedGenerator {
        fn new(responses: &[&str]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl BuildGenerator for ScriptedGenerator {
        async fn complete(&self, request: &GenerationRequest) -> anyhow::Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("script exhausted"))
        }
    }

    #[tokio::test]
    async fn test_clean_first_draft_is_accepted() {
        let orchestrator = RefinementOrchestrator::new(ScriptedGenerator::new(&[GOOD]));
        let outcome = orchestrator
            .run(GenerationRequest::initial("parts", None))
            .await
            .unwrap();

        assert!(outcome.is_accepted());
        let build = outcome.build();
        assert_eq!(build.cycles, 0);
        assert_eq!(build.report.accepted.len(), 2);
        assert_eq!(build.instructions, GOOD);
        assert_eq!(orchestrator.generator.request_count(), 1);
    }

    #[tokio::test]
    async fn test_correction_cycle_accepts_second_draft() {
        let orchestrator = RefinementOrchestrator::new(ScriptedGenerator::new(&[FLOATING, GOOD]));
        let outcome = orchestrator
            .run(GenerationRequest::initial("parts", None))
            .await
            .unwrap();

        assert!(outcome.is_accepted());
        assert_eq!(outcome.build().cycles, 1);

        let requests = orchestrator.generator.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].is_correction());
        assert!(requests[1].is_correction());
        // The correction carries the previous text and the floating step.
        assert_eq!(requests[1].previous_instructions.as_deref(), Some(FLOATING));
        assert_eq!(requests[1].rejected_placements.len(), 1);
        assert_eq!(requests[1].rejected_placements[0].sequence_index(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_after_cycle_cap() {
        let scripts = [FLOATING, FLOATING, FLOATING, FLOATING];
        let orchestrator = RefinementOrchestrator::new(ScriptedGenerator::new(&scripts));
        let outcome = orchestrator
            .run(GenerationRequest::initial("parts", None))
            .await
            .unwrap();

        assert!(!outcome.is_accepted());
        let build = outcome.build();
        assert_eq!(build.cycles, MAX_REFINEMENT_CYCLES);
        // Initial draft plus one call per correction cycle.
        assert_eq!(
            orchestrator.generator.request_count(),
            1 + MAX_REFINEMENT_CYCLES as usize
        );
        // The exhausted build still carries its rejects for the caller.
        assert_eq!(build.report.rejected.len(), 1);
    }

    #[tokio::test]
    async fn test_custom_cycle_cap() {
        let orchestrator = RefinementOrchestrator::new(ScriptedGenerator::new(&[
            FLOATING, FLOATING,
        ]))
        .with_max_cycles(1);
        let outcome = orchestrator
            .run(GenerationRequest::initial("parts", None))
            .await
            .unwrap();
        assert!(!outcome.is_accepted());
        assert_eq!(orchestrator.generator.request_count(), 2);
    }

    #[tokio::test]
    async fn test_unparseable_draft_is_a_generation_failure() {
        let orchestrator = RefinementOrchestrator::new(ScriptedGenerator::new(&[
            "Sorry, I cannot help with that.",
        ]));
        let err = orchestrator
            .run(GenerationRequest::initial("parts", None))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no parseable build steps"));
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let orchestrator = RefinementOrchestrator::new(ScriptedGenerator::new(&[]));
        let err = orchestrator
            .run(GenerationRequest::initial("parts", None))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("script exhausted"));
    }
}
