use ws_core::{SourceSpan, WormScriptError};

use super::{CompletionKind, WormScriptEngine};

impl WormScriptEngine {
    /// Unwinds the position stack for a `break`. The nearest enclosing while
    /// body within the current procedure invocation exits its loop; with no
    /// enclosing loop, the invocation itself (or the whole program, at top
    /// level) completes early instead.
    pub(super) fn execute_break(
        &mut self,
        location: &SourceSpan,
    ) -> Result<(), WormScriptError> {
        for index in (0..self.frames.len()).rev() {
            if self.frames[index].completion == CompletionKind::WhileBody {
                if index == 0 {
                    return Err(WormScriptError::with_span(
                        "ENGINE_BREAK_TARGET_MISSING",
                        "While body frame has no owning frame.",
                        location.clone(),
                    ));
                }
                // drop the body and everything nested inside it, then step
                // the owner past the while node
                self.frames.truncate(index);
                self.bump_top_node_index(1)?;
                return Ok(());
            }
            if self.frames[index].procedure_root {
                self.frames.truncate(index);
                return Ok(());
            }
        }
        Err(WormScriptError::with_span(
            "ENGINE_BREAK_TARGET_MISSING",
            "No enclosing loop or procedure to break out of.",
            location.clone(),
        ))
    }
}
