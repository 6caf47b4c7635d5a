use std::collections::BTreeMap;

use ws_core::{SourceSpan, WormScriptError, WsValue};

use super::WormScriptEngine;

/// The single global name → value mapping shared by main code and every
/// procedure invocation. The language has no lexical scoping and no way to
/// remove a binding.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: BTreeMap<String, WsValue>,
}

impl Environment {
    pub fn get(&self, name: &str) -> Option<&WsValue> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: WsValue) {
        self.values.insert(name.into(), value);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl WormScriptEngine {
    pub(super) fn read_variable(
        &self,
        name: &str,
        location: &SourceSpan,
    ) -> Result<WsValue, WormScriptError> {
        self.globals.get(name).cloned().ok_or_else(|| {
            WormScriptError::with_span(
                "ENGINE_VAR_READ",
                format!("Variable \"{}\" is not defined.", name),
                location.clone(),
            )
        })
    }

    pub(super) fn write_variable(&mut self, name: &str, value: WsValue) {
        self.globals.set(name, value);
    }
}

#[cfg(test)]
mod env_tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips_and_overwrites() {
        let mut environment = Environment::default();
        assert!(environment.get("a").is_none());
        environment.set("a", WsValue::Number(1.0));
        assert_eq!(environment.get("a"), Some(&WsValue::Number(1.0)));
        environment.set("a", WsValue::Boolean(true));
        assert_eq!(environment.get("a"), Some(&WsValue::Boolean(true)));
        environment.clear();
        assert!(environment.get("a").is_none());
    }
}
