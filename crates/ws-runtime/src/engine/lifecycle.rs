use ws_core::{EntityId, WsValue};

use super::{Environment, LoweredProgram, WormScriptEngine, WormScriptEngineOptions};

impl WormScriptEngine {
    pub fn new(options: WormScriptEngineOptions) -> Self {
        Self {
            program: LoweredProgram::lower(&options.program),
            actor: options.actor,
            step_limit: options.step_limit,
            globals: Environment::default(),
            frames: Vec::new(),
            printed: Vec::new(),
            started: false,
            ended: false,
            failed: false,
            frame_counter: 1,
        }
    }

    /// Begins (or restarts) execution at the top of `main`, discarding any
    /// saved position, accumulated output, and variable bindings.
    pub fn start(&mut self) {
        self.reset();
        self.started = true;
        let main_block = self.program.main_block();
        self.push_root_frame(main_block);
    }

    fn reset(&mut self) {
        self.frames.clear();
        self.globals.clear();
        self.printed.clear();
        self.started = false;
        self.ended = false;
        self.failed = false;
        self.frame_counter = 1;
    }

    pub fn actor(&self) -> EntityId {
        self.actor
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// True while a started program still has a position to resume from.
    pub fn in_progress(&self) -> bool {
        self.started && !self.ended && !self.failed
    }

    /// Current value of a global variable, for host-side inspection.
    pub fn variable(&self, name: &str) -> Option<WsValue> {
        self.globals.get(name).cloned()
    }
}
