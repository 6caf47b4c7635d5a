use serde::Serialize;
use ws_api::CreateEngineOptions;
use ws_core::{RunOutcome, WormScriptError, WsValue};

use crate::scenario::Scenario;
use crate::sim::SimWorld;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Game turns consumed, each starting with a full action point budget.
    pub turns: usize,
    pub printed: Vec<WsValue>,
    pub completed: bool,
}

/// Runs a script against the simulated world, replenishing the actor at the
/// start of every turn, until the program completes or `max_turns` is spent.
pub fn run_scenario(
    source: &str,
    scenario: &Scenario,
    max_turns: usize,
    step_limit: Option<usize>,
) -> Result<RunReport, WormScriptError> {
    let (mut world, actor) = SimWorld::from_scenario(scenario)?;
    let mut engine = ws_api::create_engine_from_source(CreateEngineOptions {
        source: source.to_string(),
        actor,
        step_limit,
    })?;
    let mut turns = 0usize;
    loop {
        turns += 1;
        world.begin_turn(actor);
        match engine.run(&mut world)? {
            RunOutcome::Completed { printed } => {
                return Ok(RunReport {
                    turns,
                    printed,
                    completed: true,
                })
            }
            RunOutcome::Suspended => {
                if turns >= max_turns {
                    return Ok(RunReport {
                        turns,
                        printed: Vec::new(),
                        completed: false,
                    });
                }
            }
        }
    }
}
