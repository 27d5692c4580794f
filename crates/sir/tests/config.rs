#![cfg(feature = "serde")]

use contagion::{CompartmentState, Engine, EngineConfig, Parameters, SolverSettings, TimeDomain};

#[test]
fn loads_session_from_toml() {
    let config: EngineConfig = toml::from_str(include_str!("fixtures/session.toml")).unwrap();

    assert_eq!(config.initial_state, CompartmentState::new(0.95, 0.05, 0.0));
    assert_eq!(config.parameters, Parameters::new(0.3, 0.01));
    assert_eq!(config.horizon, 200.0);
    assert_eq!(config.samples, 401);
    assert_eq!(config.solver.rel_tol, 1e-9);
    assert_eq!(config.solver.abs_tol, SolverSettings::default().abs_tol);

    let mut engine = Engine::from_config(&config).unwrap();
    let trajectory = engine.run().unwrap();

    assert_eq!(trajectory.len(), 401);
    assert_eq!(trajectory.times()[1], 0.5);
    assert_eq!(trajectory.times()[400], 200.0);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let config: EngineConfig = toml::from_str("samples = 11").unwrap();

    assert_eq!(
        config,
        EngineConfig {
            samples: 11,
            ..EngineConfig::default()
        }
    );
}

#[test]
fn unknown_fields_are_rejected() {
    let result = toml::from_str::<EngineConfig>("infection_rate = 0.2");
    assert!(result.is_err());
}

#[test]
fn time_domain_round_trips_through_json() {
    let domain = TimeDomain::new(vec![0.0, 1.5, 4.0]).unwrap();

    let json = serde_json::to_string(&domain).unwrap();
    assert_eq!(json, "[0.0,1.5,4.0]");

    let parsed: TimeDomain = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, domain);

    assert!(serde_json::from_str::<TimeDomain>("[3.0, 1.0]").is_err());
}

#[test]
fn trajectory_serializes_as_columns() {
    let mut engine = Engine::new();
    engine
        .initialize(
            CompartmentState::new(1.0, 0.0, 0.0),
            Parameters::default(),
            TimeDomain::new(vec![0.0, 10.0]).unwrap(),
        )
        .unwrap();
    let trajectory = engine.run().unwrap();

    let value = serde_json::to_value(trajectory).unwrap();

    assert_eq!(value["times"], serde_json::json!([0.0, 10.0]));
    assert_eq!(value["susceptible"], serde_json::json!([1.0, 1.0]));
    assert_eq!(value["infectious"], serde_json::json!([0.0, 0.0]));
    assert_eq!(value["removed"], serde_json::json!([0.0, 0.0]));
}
