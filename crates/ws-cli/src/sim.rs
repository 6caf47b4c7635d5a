use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::{PI, TAU};

use ws_core::{EntityId, WormScriptError};
use ws_runtime::{ActionDispatch, ActionOutcome, ActionRequest, WorldQuery};

use crate::scenario::Scenario;

// Placeholder action economics: the real game knows the terrain-dependent
// cost model, the batch runner only needs scarcity.
const TURN_COST_FULL_CIRCLE: f64 = 60.0;
const MOVE_COST: f64 = 3.0;
const JUMP_COST: f64 = 10.0;
const EAT_COST: f64 = 8.0;
const FIRE_COST: f64 = 12.0;
const EAT_REACH_MARGIN: f64 = 0.2;
const SEARCH_TOLERANCE: f64 = 0.1;
const GROWTH_PER_MEAL: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEntityKind {
    Worm,
    Food,
    Projectile,
}

#[derive(Debug, Clone)]
pub struct SimEntity {
    pub kind: SimEntityKind,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub direction: f64,
    pub action_points: f64,
    pub max_action_points: f64,
    pub hit_points: f64,
    pub team: Option<String>,
}

/// Self-contained implementation of both engine ports over a flat map of
/// entities. Worms move and jump along their facing direction, eat food
/// within reach, and fire inert projectiles.
#[derive(Debug)]
pub struct SimWorld {
    entities: BTreeMap<EntityId, SimEntity>,
    next_id: u64,
}

impl SimWorld {
    pub fn from_scenario(scenario: &Scenario) -> Result<(Self, EntityId), WormScriptError> {
        let mut world = Self {
            entities: BTreeMap::new(),
            next_id: 1,
        };
        let mut names = BTreeSet::new();
        let mut actor = None;
        for worm in &scenario.worms {
            if !names.insert(worm.name.clone()) {
                return Err(WormScriptError::new(
                    "SCENARIO_DUPLICATE_WORM",
                    format!("Worm \"{}\" is declared twice.", worm.name),
                ));
            }
            let id = world.mint();
            world.entities.insert(
                id,
                SimEntity {
                    kind: SimEntityKind::Worm,
                    x: worm.x,
                    y: worm.y,
                    radius: worm.radius,
                    direction: worm.direction,
                    action_points: worm.action_points.unwrap_or(worm.max_action_points),
                    max_action_points: worm.max_action_points,
                    hit_points: worm.hit_points,
                    team: worm.team.clone(),
                },
            );
            if worm.name == scenario.actor {
                actor = Some(id);
            }
        }
        for food in &scenario.food {
            let id = world.mint();
            world.entities.insert(
                id,
                SimEntity {
                    kind: SimEntityKind::Food,
                    x: food.x,
                    y: food.y,
                    radius: food.radius,
                    direction: 0.0,
                    action_points: 0.0,
                    max_action_points: 0.0,
                    hit_points: 0.0,
                    team: None,
                },
            );
        }
        let Some(actor) = actor else {
            return Err(WormScriptError::new(
                "SCENARIO_ACTOR_UNKNOWN",
                format!("Actor \"{}\" is not among the worms.", scenario.actor),
            ));
        };
        Ok((world, actor))
    }

    fn mint(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Replenishes the worm to its maximum at the start of a game turn.
    pub fn begin_turn(&mut self, worm: EntityId) {
        if let Some(entity) = self.entities.get_mut(&worm) {
            entity.action_points = entity.max_action_points;
        }
    }

    pub fn entity(&self, id: EntityId) -> Option<&SimEntity> {
        self.entities.get(&id)
    }

    fn lookup(&self, id: EntityId) -> Result<&SimEntity, WormScriptError> {
        self.entities.get(&id).ok_or_else(|| unknown_entity(id))
    }

    fn lookup_mut(&mut self, id: EntityId) -> Result<&mut SimEntity, WormScriptError> {
        self.entities.get_mut(&id).ok_or_else(|| unknown_entity(id))
    }

    fn pay(&mut self, actor: EntityId, cost: f64) -> Result<bool, WormScriptError> {
        let worm = self.lookup_mut(actor)?;
        if worm.action_points < cost {
            return Ok(false);
        }
        worm.action_points -= cost;
        Ok(true)
    }

    fn consume_reachable_food(&mut self, actor: EntityId) -> Result<(), WormScriptError> {
        let (x, y, reach) = {
            let worm = self.lookup(actor)?;
            (worm.x, worm.y, worm.radius + EAT_REACH_MARGIN)
        };
        let mut target: Option<(EntityId, f64)> = None;
        for (id, entity) in &self.entities {
            if entity.kind != SimEntityKind::Food {
                continue;
            }
            let distance = ((entity.x - x).powi(2) + (entity.y - y).powi(2)).sqrt();
            if distance > reach + entity.radius {
                continue;
            }
            if target.is_none_or(|(_, best)| distance < best) {
                target = Some((*id, distance));
            }
        }
        if let Some((id, _)) = target {
            self.entities.remove(&id);
            let worm = self.lookup_mut(actor)?;
            worm.radius *= GROWTH_PER_MEAL;
        }
        Ok(())
    }
}

fn unknown_entity(id: EntityId) -> WormScriptError {
    WormScriptError::new(
        "WORLD_UNKNOWN_ENTITY",
        format!("Entity {} does not exist.", id.raw()),
    )
}

impl WorldQuery for SimWorld {
    fn position_x(&self, entity: EntityId) -> Result<f64, WormScriptError> {
        Ok(self.lookup(entity)?.x)
    }

    fn position_y(&self, entity: EntityId) -> Result<f64, WormScriptError> {
        Ok(self.lookup(entity)?.y)
    }

    fn radius(&self, entity: EntityId) -> Result<f64, WormScriptError> {
        Ok(self.lookup(entity)?.radius)
    }

    fn direction(&self, entity: EntityId) -> Result<f64, WormScriptError> {
        Ok(self.lookup(entity)?.direction)
    }

    fn action_points(&self, entity: EntityId) -> Result<f64, WormScriptError> {
        Ok(self.lookup(entity)?.action_points)
    }

    fn max_action_points(&self, entity: EntityId) -> Result<f64, WormScriptError> {
        Ok(self.lookup(entity)?.max_action_points)
    }

    fn hit_points(&self, entity: EntityId) -> Result<f64, WormScriptError> {
        Ok(self.lookup(entity)?.hit_points)
    }

    fn distance_between(&self, from: EntityId, to: EntityId) -> Result<f64, WormScriptError> {
        let from = self.lookup(from)?;
        let to = self.lookup(to)?;
        Ok(((from.x - to.x).powi(2) + (from.y - to.y).powi(2)).sqrt())
    }

    fn is_worm(&self, entity: EntityId) -> Result<bool, WormScriptError> {
        Ok(self.lookup(entity)?.kind == SimEntityKind::Worm)
    }

    fn is_food(&self, entity: EntityId) -> Result<bool, WormScriptError> {
        Ok(self.lookup(entity)?.kind == SimEntityKind::Food)
    }

    fn is_projectile(&self, entity: EntityId) -> Result<bool, WormScriptError> {
        Ok(self.lookup(entity)?.kind == SimEntityKind::Projectile)
    }

    fn same_team(&self, actor: EntityId, other: EntityId) -> Result<bool, WormScriptError> {
        let actor = self.lookup(actor)?;
        let other = self.lookup(other)?;
        Ok(actor.team.is_some() && actor.team == other.team)
    }

    /// Nearest entity within an angular tolerance of the actor's facing
    /// direction plus `angle_offset`.
    fn search_object(
        &self,
        actor: EntityId,
        angle_offset: f64,
    ) -> Result<Option<EntityId>, WormScriptError> {
        let source = self.lookup(actor)?;
        let heading = (source.direction + angle_offset).rem_euclid(TAU);
        let mut found: Option<(EntityId, f64)> = None;
        for (id, entity) in &self.entities {
            if *id == actor {
                continue;
            }
            let dx = entity.x - source.x;
            let dy = entity.y - source.y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance == 0.0 {
                continue;
            }
            let bearing = dy.atan2(dx).rem_euclid(TAU);
            let mut deviation = (bearing - heading).abs();
            if deviation > PI {
                deviation = TAU - deviation;
            }
            if deviation > SEARCH_TOLERANCE {
                continue;
            }
            if found.is_none_or(|(_, best)| distance < best) {
                found = Some((*id, distance));
            }
        }
        Ok(found.map(|(id, _)| id))
    }
}

impl ActionDispatch for SimWorld {
    fn attempt(
        &mut self,
        actor: EntityId,
        action: ActionRequest,
    ) -> Result<ActionOutcome, WormScriptError> {
        match action {
            ActionRequest::Turn { angle } => {
                let cost = TURN_COST_FULL_CIRCLE * angle.abs() / TAU;
                if !self.pay(actor, cost)? {
                    return Ok(ActionOutcome::Refused);
                }
                let worm = self.lookup_mut(actor)?;
                worm.direction = (worm.direction + angle).rem_euclid(TAU);
            }
            ActionRequest::Move => {
                if !self.pay(actor, MOVE_COST)? {
                    return Ok(ActionOutcome::Refused);
                }
                let worm = self.lookup_mut(actor)?;
                worm.x += worm.direction.cos() * worm.radius;
                worm.y += worm.direction.sin() * worm.radius;
            }
            ActionRequest::Jump => {
                if self.lookup(actor)?.direction.sin() < 0.0 {
                    return Err(WormScriptError::new(
                        "WORLD_JUMP_DOWNWARD",
                        "Cannot jump while facing downward.",
                    ));
                }
                if !self.pay(actor, JUMP_COST)? {
                    return Ok(ActionOutcome::Refused);
                }
                let worm = self.lookup_mut(actor)?;
                worm.x += worm.direction.cos() * worm.radius * 4.0;
            }
            ActionRequest::Eat => {
                if !self.pay(actor, EAT_COST)? {
                    return Ok(ActionOutcome::Refused);
                }
                self.consume_reachable_food(actor)?;
            }
            ActionRequest::Fire => {
                if !self.pay(actor, FIRE_COST)? {
                    return Ok(ActionOutcome::Refused);
                }
                let (x, y, direction) = {
                    let worm = self.lookup(actor)?;
                    (
                        worm.x + worm.direction.cos() * worm.radius,
                        worm.y + worm.direction.sin() * worm.radius,
                        worm.direction,
                    )
                };
                let id = self.mint();
                self.entities.insert(
                    id,
                    SimEntity {
                        kind: SimEntityKind::Projectile,
                        x,
                        y,
                        radius: 0.05,
                        direction,
                        action_points: 0.0,
                        max_action_points: 0.0,
                        hit_points: 0.0,
                        team: None,
                    },
                );
            }
        }
        Ok(ActionOutcome::Performed)
    }
}
