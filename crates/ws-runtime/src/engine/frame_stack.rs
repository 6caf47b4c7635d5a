use ws_core::WormScriptError;

use super::{BlockId, CompletionKind, RuntimeFrame, WormScriptEngine};

impl WormScriptEngine {
    pub(super) fn bump_top_node_index(&mut self, amount: usize) -> Result<(), WormScriptError> {
        let frame = self.frames.last_mut().ok_or_else(|| {
            WormScriptError::new("ENGINE_NO_FRAME", "No runtime frame available.")
        })?;
        frame.node_index += amount;
        Ok(())
    }

    pub(super) fn find_frame_index(&self, frame_id: u64) -> Option<usize> {
        self.frames
            .iter()
            .position(|frame| frame.frame_id == frame_id)
    }

    /// Pushes the body of `main` or of a procedure invocation. Root frames
    /// are the boundaries `break` cannot cross outward.
    pub(super) fn push_root_frame(&mut self, block_id: BlockId) {
        self.frames.push(RuntimeFrame {
            frame_id: self.frame_counter,
            block_id,
            node_index: 0,
            completion: CompletionKind::None,
            procedure_root: true,
        });
        self.frame_counter += 1;
    }

    pub(super) fn push_child_frame(&mut self, block_id: BlockId, completion: CompletionKind) {
        self.frames.push(RuntimeFrame {
            frame_id: self.frame_counter,
            block_id,
            node_index: 0,
            completion,
            procedure_root: false,
        });
        self.frame_counter += 1;
    }

    /// Removes a frame whose block has been executed to the end. A finished
    /// while-body frame leaves its owner pointing at the `while` node, so the
    /// guard re-evaluates; a finished procedure frame resumes the caller,
    /// whose node index was bumped at invoke time.
    pub(super) fn finish_frame(&mut self, frame_id: u64) {
        if let Some(index) = self.find_frame_index(frame_id) {
            self.frames.remove(index);
        }
    }
}
