use ws_cli::runner::run_scenario;
use ws_cli::scenario::Scenario;
use ws_core::WsValue;

fn scenario(json: &str) -> Scenario {
    serde_json::from_str(json).expect("scenario should parse")
}

#[test]
fn hunting_script_runs_to_completion_across_turns() {
    // a budget of 7 affords two moves per turn, so closing the gap takes a
    // suspension and a replenished second turn
    let scenario = scenario(
        r#"{
            "actor": "alpha",
            "worms": [
                { "name": "alpha", "x": 0.0, "y": 0.0, "maxActionPoints": 7, "team": "red" },
                { "name": "beta", "x": 6.0, "y": 0.0, "team": "red" }
            ]
        }"#,
    );
    let source = r#"
        // close in on whatever is dead ahead, then report the step count
        target := searchobj(0);
        print isworm(target);
        print sameteam(target);
        steps := 0;
        while distanceto(target) > 4 { move; steps := steps + 1; }
        print steps;
    "#;
    let report = run_scenario(source, &scenario, 50, Some(100_000)).expect("run should pass");
    assert!(report.completed);
    assert_eq!(report.turns, 2);
    assert_eq!(
        report.printed,
        vec![
            WsValue::Boolean(true),
            WsValue::Boolean(true),
            WsValue::Number(4.0),
        ]
    );
}

#[test]
fn eating_script_observes_the_world_side_effect() {
    let scenario = scenario(
        r#"{
            "actor": "alpha",
            "worms": [{ "name": "alpha", "x": 0.0, "y": 0.0 }],
            "food": [{ "x": 0.4, "y": 0.0 }]
        }"#,
    );
    let source = "print isfood(searchobj(0)); eat; print searchobj(0) == null;";
    let report = run_scenario(source, &scenario, 10, Some(100_000)).expect("run should pass");
    assert!(report.completed);
    assert_eq!(
        report.printed,
        vec![WsValue::Boolean(true), WsValue::Boolean(true)]
    );
}

#[test]
fn report_serializes_to_json() {
    let scenario = scenario(
        r#"{ "actor": "alpha", "worms": [{ "name": "alpha", "x": 0.0, "y": 0.0 }] }"#,
    );
    let report = run_scenario("print 1;", &scenario, 10, None).expect("run should pass");
    let encoded = serde_json::to_string(&report).expect("report should encode");
    assert!(encoded.contains("\"completed\":true"));
    assert!(encoded.contains("\"turns\":1"));
}
