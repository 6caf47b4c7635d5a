use serde::{Deserialize, Serialize};

/// Opaque reference to a game entity. Minted by the world model; the engine
/// never interprets the raw id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntityId(u64);

impl EntityId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A runtime value held by a script computation.
///
/// Derived equality gives the language's `==` semantics directly: values of
/// the same tag compare structurally, values of different tags compare
/// unequal, and `Null == Null` holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WsValue {
    Number(f64),
    Boolean(bool),
    Entity(EntityId),
    Null,
}

impl WsValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<EntityId> {
        match self {
            Self::Entity(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Entity(_) => "entity",
            Self::Null => "null",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_structural_within_a_tag() {
        assert_eq!(WsValue::Number(2.5), WsValue::Number(2.5));
        assert_ne!(WsValue::Number(2.5), WsValue::Number(2.6));
        assert_eq!(WsValue::Boolean(true), WsValue::Boolean(true));
        assert_eq!(
            WsValue::Entity(EntityId::new(7)),
            WsValue::Entity(EntityId::new(7))
        );
        assert_ne!(
            WsValue::Entity(EntityId::new(7)),
            WsValue::Entity(EntityId::new(8))
        );
    }

    #[test]
    fn equality_across_tags_is_unequal_not_an_error() {
        assert_ne!(WsValue::Number(1.0), WsValue::Boolean(true));
        assert_ne!(WsValue::Number(0.0), WsValue::Null);
        assert_ne!(WsValue::Entity(EntityId::new(1)), WsValue::Number(1.0));
    }

    #[test]
    fn null_equals_null() {
        assert_eq!(WsValue::Null, WsValue::Null);
    }

    #[test]
    fn accessors_match_tags() {
        assert_eq!(WsValue::Number(4.0).as_number(), Some(4.0));
        assert_eq!(WsValue::Boolean(false).as_number(), None);
        assert_eq!(WsValue::Boolean(false).as_boolean(), Some(false));
        assert_eq!(
            WsValue::Entity(EntityId::new(3)).as_entity(),
            Some(EntityId::new(3))
        );
        assert!(WsValue::Null.is_null());
        assert_eq!(WsValue::Null.type_name(), "null");
        assert_eq!(WsValue::Entity(EntityId::new(3)).type_name(), "entity");
    }
}
