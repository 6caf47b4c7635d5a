use serde::{Deserialize, Serialize};

/// A simulated game world loaded from JSON: the worms on the map, loose
/// food, and the name of the worm that runs the script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub actor: String,
    pub worms: Vec<WormSpec>,
    #[serde(default)]
    pub food: Vec<FoodSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WormSpec {
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub direction: f64,
    #[serde(default = "default_worm_radius")]
    pub radius: f64,
    #[serde(default = "default_max_action_points")]
    pub max_action_points: f64,
    /// Starting budget; defaults to the maximum.
    #[serde(default)]
    pub action_points: Option<f64>,
    #[serde(default = "default_hit_points")]
    pub hit_points: f64,
    #[serde(default)]
    pub team: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSpec {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_food_radius")]
    pub radius: f64,
}

fn default_worm_radius() -> f64 {
    0.5
}

fn default_max_action_points() -> f64 {
    60.0
}

fn default_hit_points() -> f64 {
    50.0
}

fn default_food_radius() -> f64 {
    0.2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_scenario_fills_in_defaults() {
        let scenario: Scenario = serde_json::from_str(
            r#"{ "actor": "alpha", "worms": [{ "name": "alpha", "x": 0, "y": 0 }] }"#,
        )
        .expect("scenario should parse");
        assert_eq!(scenario.actor, "alpha");
        assert!(scenario.food.is_empty());
        let worm = &scenario.worms[0];
        assert_eq!(worm.radius, 0.5);
        assert_eq!(worm.max_action_points, 60.0);
        assert_eq!(worm.action_points, None);
        assert_eq!(worm.hit_points, 50.0);
        assert!(worm.team.is_none());
    }

    #[test]
    fn full_scenario_round_trips() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "actor": "alpha",
                "worms": [
                    { "name": "alpha", "x": 1.0, "y": 2.0, "direction": 0.5,
                      "maxActionPoints": 40, "actionPoints": 10, "team": "red" },
                    { "name": "beta", "x": 5.0, "y": 2.0, "team": "blue" }
                ],
                "food": [{ "x": 2.0, "y": 2.0 }]
            }"#,
        )
        .expect("scenario should parse");
        assert_eq!(scenario.worms.len(), 2);
        assert_eq!(scenario.worms[0].action_points, Some(10.0));
        assert_eq!(scenario.worms[1].team.as_deref(), Some("blue"));
        assert_eq!(scenario.food[0].radius, 0.2);

        let encoded = serde_json::to_string(&scenario).expect("scenario should encode");
        let decoded: Scenario = serde_json::from_str(&encoded).expect("scenario should decode");
        assert_eq!(decoded.worms[0].max_action_points, 40.0);
    }
}
