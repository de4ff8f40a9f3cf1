use dynamics::Vec3;
use scene::{BodyDef, Scene};
use std::fs;

fn load(name: &str) -> Scene {
    let json = fs::read_to_string(format!("tests/data/{name}")).unwrap();
    json.parse().unwrap()
}

#[test]
fn parse_drop_example() {
    let scene = load("drop.json");
    assert_eq!(scene.bodies.len(), 2);
    assert!(scene.springs.is_empty());
    assert!(matches!(scene.bodies[0], BodyDef::Fixed { .. }));
    assert_eq!(scene.bodies[1].id(), "cube");
}

#[test]
fn world_from_drop_runs() {
    let mut loaded = Scene::from_path("tests/data/drop.json")
        .unwrap()
        .into_world()
        .unwrap();
    let cube = loaded.handle("cube").unwrap();
    let start = loaded.world.body(cube).unwrap().position;
    loaded.world.run(0.01, 5).unwrap();
    assert!(loaded.world.body(cube).unwrap().position.y < start.y);
}

#[test]
fn config_overrides_and_velocities_are_applied() {
    let loaded = load("spring_pair.json").into_world().unwrap();
    let config = loaded.world.config();
    assert_eq!(config.gravity, Vec3::ZERO);
    assert_eq!(config.substeps, 4);
    // Untouched fields keep their defaults.
    assert!((config.restitution - 0.5).abs() < f32::EPSILON);

    let b = loaded.world.body(loaded.handle("b").unwrap()).unwrap();
    assert!(b.velocity().abs_diff_eq(Vec3::Y, 1e-6));
    let spring = &loaded.world.springs()[0];
    assert!((spring.rest_length - 2.0).abs() < f32::EPSILON);
    assert!(spring.damping.abs() < f32::EPSILON);
}

#[test]
fn missing_rest_length_uses_initial_distance() {
    let json = r#"{
        "bodies": [
            { "kind": "dynamic", "id": "a", "size": [1, 1, 1], "mass": 1, "position": [0, 0, 0] }
        ],
        "springs": [
            { "a": { "kind": "body", "id": "a", "local": [0, 0.5, 0] },
              "b": { "kind": "fixed", "point": [0, 3.5, 0] },
              "stiffness": 10 }
        ]
    }"#;
    let loaded = json.parse::<Scene>().unwrap().into_world().unwrap();
    assert!((loaded.world.springs()[0].rest_length - 3.0).abs() < 1e-6);
}

#[test]
fn unknown_body_is_an_error() {
    let err = load("unknown_body.json").into_world().unwrap_err();
    assert!(format!("{err:#}").contains("unknown body ghost"));
}

#[test]
fn duplicate_ids_are_an_error() {
    let json = r#"{
        "bodies": [
            { "kind": "fixed", "id": "x", "size": [1, 1, 1], "position": [0, 0, 0] },
            { "kind": "fixed", "id": "x", "size": [1, 1, 1], "position": [3, 0, 0] }
        ]
    }"#;
    let err = json.parse::<Scene>().unwrap().into_world().unwrap_err();
    assert!(err.to_string().contains("duplicate body id x"));
}

#[test]
fn invalid_mass_is_reported_with_body_id() {
    let json = r#"{
        "bodies": [
            { "kind": "dynamic", "id": "heavy", "size": [1, 1, 1], "mass": 0, "position": [0, 0, 0] }
        ]
    }"#;
    let err = json.parse::<Scene>().unwrap().into_world().unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("body heavy"));
    assert!(message.contains("mass"));
}

#[test]
fn unknown_shape_kind_fails_to_parse() {
    let json = r#"{ "bodies": [ { "kind": "sphere", "id": "s" } ] }"#;
    assert!(json.parse::<Scene>().is_err());
}
