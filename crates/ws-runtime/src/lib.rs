mod engine;

pub use engine::{
    ActionDispatch, ActionOutcome, ActionRequest, Environment, WormScriptEngine,
    WormScriptEngineOptions, WorldQuery,
};
