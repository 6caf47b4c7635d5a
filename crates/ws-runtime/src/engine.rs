use ws_core::{EntityId, Program, WormScriptError, WsValue};

mod control_flow;
mod env;
mod eval;
mod frame_stack;
mod lifecycle;
mod lower;
mod step;

use self::lower::{BlockId, LoweredProgram};

pub use self::env::Environment;

/// Read-only world queries keyed by opaque entity references, implemented by
/// the external game-world model. Implementations must be side-effect-free.
pub trait WorldQuery {
    fn position_x(&self, entity: EntityId) -> Result<f64, WormScriptError>;
    fn position_y(&self, entity: EntityId) -> Result<f64, WormScriptError>;
    fn radius(&self, entity: EntityId) -> Result<f64, WormScriptError>;
    fn direction(&self, entity: EntityId) -> Result<f64, WormScriptError>;
    fn action_points(&self, entity: EntityId) -> Result<f64, WormScriptError>;
    fn max_action_points(&self, entity: EntityId) -> Result<f64, WormScriptError>;
    fn hit_points(&self, entity: EntityId) -> Result<f64, WormScriptError>;
    fn distance_between(&self, from: EntityId, to: EntityId) -> Result<f64, WormScriptError>;
    fn is_worm(&self, entity: EntityId) -> Result<bool, WormScriptError>;
    fn is_food(&self, entity: EntityId) -> Result<bool, WormScriptError>;
    fn is_projectile(&self, entity: EntityId) -> Result<bool, WormScriptError>;
    fn same_team(&self, actor: EntityId, other: EntityId) -> Result<bool, WormScriptError>;
    fn search_object(
        &self,
        actor: EntityId,
        angle_offset: f64,
    ) -> Result<Option<EntityId>, WormScriptError>;
}

/// A resource-consuming action requested by a running script.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionRequest {
    Turn { angle: f64 },
    Move,
    Jump,
    Eat,
    Fire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Performed,
    Refused,
}

/// Performs actions on behalf of an actor. The affordability check and the
/// world side effect are atomic: `Refused` applies no effect. Action misuse
/// (such as jumping while facing downward) is an `Err`, not a refusal.
pub trait ActionDispatch {
    fn attempt(
        &mut self,
        actor: EntityId,
        action: ActionRequest,
    ) -> Result<ActionOutcome, WormScriptError>;
}

pub struct WormScriptEngineOptions {
    pub program: Program,
    pub actor: EntityId,
    /// Upper bound on dispatch iterations per `run` call. `None` means the
    /// engine never stops on its own; a caller that cannot trust its scripts
    /// to terminate should set a limit.
    pub step_limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompletionKind {
    None,
    WhileBody,
    ResumeAfterChild,
}

/// One entry of the execution position: the block being executed, the index
/// of the next node within it, and how the frame relates to its parent.
#[derive(Debug, Clone)]
struct RuntimeFrame {
    frame_id: u64,
    block_id: BlockId,
    node_index: usize,
    completion: CompletionKind,
    procedure_root: bool,
}

/// The continuation engine: walks a lowered program with an explicit frame
/// stack so that a refused action can suspend the whole computation and a
/// later `run` call resumes it from exactly the same statement.
#[derive(Debug)]
pub struct WormScriptEngine {
    program: LoweredProgram,
    actor: EntityId,
    step_limit: Option<usize>,
    globals: Environment,
    frames: Vec<RuntimeFrame>,
    printed: Vec<WsValue>,
    started: bool,
    ended: bool,
    failed: bool,
    frame_counter: u64,
}
