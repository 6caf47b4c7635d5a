use ws_core::{EntityId, Program, WormScriptError};
use ws_runtime::{WormScriptEngine, WormScriptEngineOptions};

#[derive(Clone)]
pub struct CreateEngineOptions {
    pub source: String,
    pub actor: EntityId,
    pub step_limit: Option<usize>,
}

pub fn compile_program(source: &str) -> Result<Program, WormScriptError> {
    ws_parser::parse_program(source)
}

/// Parses the source, builds an engine for the actor, and starts it, ready
/// for the first `run` call.
pub fn create_engine_from_source(
    options: CreateEngineOptions,
) -> Result<WormScriptEngine, WormScriptError> {
    let program = compile_program(&options.source)?;
    let mut engine = WormScriptEngine::new(WormScriptEngineOptions {
        program,
        actor: options.actor,
        step_limit: options.step_limit,
    });
    engine.start();
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ws_core::Statement;

    #[test]
    fn compile_program_wraps_main_in_a_sequence() {
        let program = compile_program("print 1;").expect("compile should pass");
        assert!(matches!(program.main, Statement::Sequence { .. }));
        assert!(program.procedures.is_empty());
    }

    #[test]
    fn compile_program_reports_parse_errors() {
        let error = compile_program("print 1").expect_err("missing semicolon should fail");
        assert_eq!(error.code, "PARSE_UNEXPECTED_EOF");
    }

    #[test]
    fn create_engine_from_source_starts_the_engine() {
        let engine = create_engine_from_source(CreateEngineOptions {
            source: "a := 1; print a;".to_string(),
            actor: EntityId::new(1),
            step_limit: None,
        })
        .expect("engine should build");
        assert!(engine.in_progress());
        assert_eq!(engine.actor(), EntityId::new(1));
    }

    #[test]
    fn create_engine_from_source_propagates_parse_failures() {
        let error = create_engine_from_source(CreateEngineOptions {
            source: "turn;".to_string(),
            actor: EntityId::new(1),
            step_limit: None,
        })
        .expect_err("bad source should fail");
        assert_eq!(error.code, "PARSE_UNEXPECTED_TOKEN");
    }
}
