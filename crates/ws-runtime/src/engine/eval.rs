use ws_core::{
    BinaryOp, EntityId, Expression, QueryKind, SourceSpan, UnaryOp, WormScriptError, WsValue,
};

use super::{WorldQuery, WormScriptEngine};

fn expected_error(
    code: &str,
    expected: &str,
    found: &WsValue,
    location: &SourceSpan,
) -> WormScriptError {
    WormScriptError::with_span(
        code,
        format!("Expected a {} but found {}.", expected, found.type_name()),
        location.clone(),
    )
}

impl WormScriptEngine {
    /// Evaluates an expression against the environment and the read-only
    /// world port. Evaluation never suspends and never writes the
    /// environment; only statements consume action points.
    pub(super) fn eval_expression(
        &self,
        expression: &Expression,
        world: &dyn WorldQuery,
    ) -> Result<WsValue, WormScriptError> {
        match expression {
            Expression::NumberLiteral { value, .. } => Ok(WsValue::Number(*value)),
            Expression::BooleanLiteral { value, .. } => Ok(WsValue::Boolean(*value)),
            Expression::NullLiteral { .. } => Ok(WsValue::Null),
            Expression::SelfActor { .. } => Ok(WsValue::Entity(self.actor)),
            Expression::Variable { name, location } => self.read_variable(name, location),
            Expression::Binary {
                op, left, right, ..
            } => self.eval_binary(*op, left, right, world),
            Expression::Unary { op, operand, .. } => self.eval_unary(*op, operand, world),
            Expression::Query { query, operand, .. } => self.eval_query(*query, operand, world),
        }
    }

    pub(super) fn eval_number(
        &self,
        expression: &Expression,
        world: &dyn WorldQuery,
    ) -> Result<f64, WormScriptError> {
        let value = self.eval_expression(expression, world)?;
        value.as_number().ok_or_else(|| {
            expected_error("ENGINE_NUMBER_EXPECTED", "number", &value, expression.location())
        })
    }

    pub(super) fn eval_boolean(
        &self,
        expression: &Expression,
        world: &dyn WorldQuery,
    ) -> Result<bool, WormScriptError> {
        let value = self.eval_expression(expression, world)?;
        value.as_boolean().ok_or_else(|| {
            expected_error(
                "ENGINE_BOOLEAN_EXPECTED",
                "boolean",
                &value,
                expression.location(),
            )
        })
    }

    /// Evaluates an operand that must be an entity reference or null.
    fn eval_entity(
        &self,
        expression: &Expression,
        world: &dyn WorldQuery,
    ) -> Result<Option<EntityId>, WormScriptError> {
        let value = self.eval_expression(expression, world)?;
        match value {
            WsValue::Entity(id) => Ok(Some(id)),
            WsValue::Null => Ok(None),
            other => Err(expected_error(
                "ENGINE_ENTITY_EXPECTED",
                "entity",
                &other,
                expression.location(),
            )),
        }
    }

    /// Evaluates an operand that must be an entity reference; null is a type
    /// error here (attribute getters and `distanceto` have no null answer).
    fn require_entity(
        &self,
        expression: &Expression,
        world: &dyn WorldQuery,
    ) -> Result<EntityId, WormScriptError> {
        self.eval_entity(expression, world)?.ok_or_else(|| {
            WormScriptError::with_span(
                "ENGINE_ENTITY_EXPECTED",
                "Expected an entity but found null.",
                expression.location().clone(),
            )
        })
    }

    fn eval_binary(
        &self,
        op: BinaryOp,
        left: &Expression,
        right: &Expression,
        world: &dyn WorldQuery,
    ) -> Result<WsValue, WormScriptError> {
        match op {
            BinaryOp::Add
            | BinaryOp::Subtract
            | BinaryOp::Multiply
            | BinaryOp::Divide => {
                let lhs = self.eval_number(left, world)?;
                let rhs = self.eval_number(right, world)?;
                Ok(WsValue::Number(match op {
                    BinaryOp::Add => lhs + rhs,
                    BinaryOp::Subtract => lhs - rhs,
                    BinaryOp::Multiply => lhs * rhs,
                    _ => lhs / rhs,
                }))
            }
            BinaryOp::Less | BinaryOp::LessEq | BinaryOp::Greater | BinaryOp::GreaterEq => {
                let lhs = self.eval_number(left, world)?;
                let rhs = self.eval_number(right, world)?;
                Ok(WsValue::Boolean(match op {
                    BinaryOp::Less => lhs < rhs,
                    BinaryOp::LessEq => lhs <= rhs,
                    BinaryOp::Greater => lhs > rhs,
                    _ => lhs >= rhs,
                }))
            }
            BinaryOp::Equal | BinaryOp::NotEqual => {
                // equality never fails on mismatched tags: different tags
                // simply compare unequal, and null equals null
                let lhs = self.eval_expression(left, world)?;
                let rhs = self.eval_expression(right, world)?;
                let equal = lhs == rhs;
                Ok(WsValue::Boolean(if op == BinaryOp::Equal {
                    equal
                } else {
                    !equal
                }))
            }
            BinaryOp::And | BinaryOp::Or => {
                // both operands evaluate: expressions are side-effect-free,
                // and a type error in the right operand must not depend on
                // the left operand's value
                let lhs = self.eval_boolean(left, world)?;
                let rhs = self.eval_boolean(right, world)?;
                Ok(WsValue::Boolean(if op == BinaryOp::And {
                    lhs && rhs
                } else {
                    lhs || rhs
                }))
            }
        }
    }

    fn eval_unary(
        &self,
        op: UnaryOp,
        operand: &Expression,
        world: &dyn WorldQuery,
    ) -> Result<WsValue, WormScriptError> {
        match op {
            UnaryOp::Sqrt | UnaryOp::Sin | UnaryOp::Cos => {
                let value = self.eval_number(operand, world)?;
                Ok(WsValue::Number(match op {
                    UnaryOp::Sqrt => value.sqrt(),
                    UnaryOp::Sin => value.sin(),
                    _ => value.cos(),
                }))
            }
            UnaryOp::Not => {
                let value = self.eval_boolean(operand, world)?;
                Ok(WsValue::Boolean(!value))
            }
        }
    }

    fn eval_query(
        &self,
        query: QueryKind,
        operand: &Expression,
        world: &dyn WorldQuery,
    ) -> Result<WsValue, WormScriptError> {
        match query {
            QueryKind::PositionX => {
                let entity = self.require_entity(operand, world)?;
                Ok(WsValue::Number(world.position_x(entity)?))
            }
            QueryKind::PositionY => {
                let entity = self.require_entity(operand, world)?;
                Ok(WsValue::Number(world.position_y(entity)?))
            }
            QueryKind::Radius => {
                let entity = self.require_entity(operand, world)?;
                Ok(WsValue::Number(world.radius(entity)?))
            }
            QueryKind::Direction => {
                let entity = self.require_entity(operand, world)?;
                Ok(WsValue::Number(world.direction(entity)?))
            }
            QueryKind::ActionPoints => {
                let entity = self.require_entity(operand, world)?;
                Ok(WsValue::Number(world.action_points(entity)?))
            }
            QueryKind::MaxActionPoints => {
                let entity = self.require_entity(operand, world)?;
                Ok(WsValue::Number(world.max_action_points(entity)?))
            }
            QueryKind::HitPoints => {
                let entity = self.require_entity(operand, world)?;
                Ok(WsValue::Number(world.hit_points(entity)?))
            }
            QueryKind::DistanceTo => {
                let target = self.require_entity(operand, world)?;
                Ok(WsValue::Number(world.distance_between(self.actor, target)?))
            }
            // the type predicates accept null and answer false for it
            QueryKind::IsWorm => match self.eval_entity(operand, world)? {
                Some(entity) => Ok(WsValue::Boolean(world.is_worm(entity)?)),
                None => Ok(WsValue::Boolean(false)),
            },
            QueryKind::IsFood => match self.eval_entity(operand, world)? {
                Some(entity) => Ok(WsValue::Boolean(world.is_food(entity)?)),
                None => Ok(WsValue::Boolean(false)),
            },
            QueryKind::IsProjectile => match self.eval_entity(operand, world)? {
                Some(entity) => Ok(WsValue::Boolean(world.is_projectile(entity)?)),
                None => Ok(WsValue::Boolean(false)),
            },
            QueryKind::SameTeam => match self.eval_entity(operand, world)? {
                Some(entity) => Ok(WsValue::Boolean(world.same_team(self.actor, entity)?)),
                None => Ok(WsValue::Boolean(false)),
            },
            QueryKind::SearchObject => {
                let angle_offset = self.eval_number(operand, world)?;
                Ok(match world.search_object(self.actor, angle_offset)? {
                    Some(entity) => WsValue::Entity(entity),
                    None => WsValue::Null,
                })
            }
        }
    }
}
