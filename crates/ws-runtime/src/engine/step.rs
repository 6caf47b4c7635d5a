use ws_core::{RunOutcome, WormScriptError};

use super::lower::StepNode;
use super::{ActionDispatch, ActionOutcome, ActionRequest, CompletionKind, WorldQuery, WormScriptEngine};

impl WormScriptEngine {
    /// Runs the program until it completes or suspends on a refused action.
    ///
    /// `Completed` carries every value printed since `start` (or since the
    /// previous completion), across however many suspensions it took. A hard
    /// error aborts the run, discards the position stack, and leaves the
    /// engine halted until `start` is called again.
    pub fn run<W: WorldQuery + ActionDispatch>(
        &mut self,
        world: &mut W,
    ) -> Result<RunOutcome, WormScriptError> {
        if self.failed {
            return Err(WormScriptError::new(
                "ENGINE_HALTED",
                "A previous run failed; call start to restart the program.",
            ));
        }
        if !self.started {
            return Err(WormScriptError::new(
                "ENGINE_NOT_STARTED",
                "The program has not been started.",
            ));
        }
        if self.ended {
            return Ok(RunOutcome::Completed {
                printed: Vec::new(),
            });
        }
        match self.step_until_blocked(world) {
            Ok(outcome) => Ok(outcome),
            Err(error) => {
                self.failed = true;
                self.frames.clear();
                Err(error)
            }
        }
    }

    fn step_until_blocked<W: WorldQuery + ActionDispatch>(
        &mut self,
        world: &mut W,
    ) -> Result<RunOutcome, WormScriptError> {
        let mut steps = 0usize;
        loop {
            if let Some(limit) = self.step_limit {
                steps += 1;
                if steps > limit {
                    return Err(WormScriptError::new(
                        "ENGINE_STEP_LIMIT",
                        format!("Execution exceeded the configured limit of {} steps.", limit),
                    ));
                }
            }

            let Some(top) = self.frames.last().cloned() else {
                self.ended = true;
                return Ok(RunOutcome::Completed {
                    printed: std::mem::take(&mut self.printed),
                });
            };

            let block = self.program.block(top.block_id);
            if top.node_index >= block.len() {
                self.finish_frame(top.frame_id);
                continue;
            }

            let node = block[top.node_index].clone();
            match node {
                StepNode::Assign { name, value } => {
                    // evaluate-then-store: an evaluation error propagates
                    // before the variable is touched
                    let value = self.eval_expression(&value, &*world)?;
                    self.write_variable(&name, value);
                    self.bump_top_node_index(1)?;
                }
                StepNode::Print { value } => {
                    let value = self.eval_expression(&value, &*world)?;
                    self.printed.push(value);
                    self.bump_top_node_index(1)?;
                }
                StepNode::If {
                    condition,
                    then_block,
                    else_block,
                } => {
                    // the guard runs once per arrival; resuming inside the
                    // chosen branch re-enters it without re-testing
                    let condition = self.eval_boolean(&condition, &*world)?;
                    self.bump_top_node_index(1)?;
                    let chosen = if condition { then_block } else { else_block };
                    self.push_child_frame(chosen, CompletionKind::ResumeAfterChild);
                }
                StepNode::While {
                    condition,
                    body_block,
                } => {
                    // the while node stays current while looping: its frame
                    // only advances when the guard turns false or a break
                    // unwinds to it
                    if self.eval_boolean(&condition, &*world)? {
                        self.push_child_frame(body_block, CompletionKind::WhileBody);
                    } else {
                        self.bump_top_node_index(1)?;
                    }
                }
                StepNode::Break { location } => {
                    self.execute_break(&location)?;
                }
                StepNode::Invoke { name, location } => {
                    let Some(block_id) = self.program.procedure(&name) else {
                        return Err(WormScriptError::with_span(
                            "ENGINE_INVOKE_TARGET",
                            format!("Procedure \"{}\" is not defined.", name),
                            location,
                        ));
                    };
                    // bump first so the caller resumes after the invoke when
                    // the procedure frame finishes
                    self.bump_top_node_index(1)?;
                    self.push_root_frame(block_id);
                }
                StepNode::Turn { angle } => {
                    let angle = self.eval_number(&angle, &*world)?;
                    if self.attempt_action(world, ActionRequest::Turn { angle })?
                        == ActionOutcome::Refused
                    {
                        return Ok(RunOutcome::Suspended);
                    }
                }
                StepNode::Move => {
                    if self.attempt_action(world, ActionRequest::Move)? == ActionOutcome::Refused {
                        return Ok(RunOutcome::Suspended);
                    }
                }
                StepNode::Jump => {
                    if self.attempt_action(world, ActionRequest::Jump)? == ActionOutcome::Refused {
                        return Ok(RunOutcome::Suspended);
                    }
                }
                StepNode::Eat => {
                    if self.attempt_action(world, ActionRequest::Eat)? == ActionOutcome::Refused {
                        return Ok(RunOutcome::Suspended);
                    }
                }
                StepNode::Fire => {
                    if self.attempt_action(world, ActionRequest::Fire)? == ActionOutcome::Refused {
                        return Ok(RunOutcome::Suspended);
                    }
                }
            }
        }
    }

    fn attempt_action<W: ActionDispatch>(
        &mut self,
        world: &mut W,
        action: ActionRequest,
    ) -> Result<ActionOutcome, WormScriptError> {
        let outcome = world.attempt(self.actor, action)?;
        if outcome == ActionOutcome::Performed {
            self.bump_top_node_index(1)?;
        }
        // on Refused the frame still points at the action node, so a later
        // run re-dispatches it with the argument re-evaluated
        Ok(outcome)
    }
}
