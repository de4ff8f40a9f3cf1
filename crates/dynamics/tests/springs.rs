use dynamics::{Anchor, Mat3, Vec3, World, WorldConfig};

#[test]
fn stretched_spring_pulls_bodies_together() {
    let mut world = World::new(WorldConfig::default().frictionless()).unwrap();
    let a = world
        .add_box(Vec3::ONE, 1.0, Vec3::ZERO, Mat3::IDENTITY)
        .unwrap();
    let b = world
        .add_box(Vec3::ONE, 2.0, Vec3::new(3.0, 0.0, 0.0), Mat3::IDENTITY)
        .unwrap();
    let s = world
        .add_spring(
            Anchor::attached(a, Vec3::ZERO),
            Anchor::attached(b, Vec3::ZERO),
            1.0,
            5.0,
            0.0,
        )
        .unwrap();

    world.run(0.01, 20).unwrap();

    let (body_a, body_b) = (world.body(a).unwrap(), world.body(b).unwrap());
    let total = body_a.momentum + body_b.momentum;
    assert!(total.abs_diff_eq(Vec3::ZERO, 1e-5), "total={total:?}");
    assert!(body_a.position.x > 0.0);
    assert!(body_b.position.x < 3.0);
    assert!(world.spring(s).unwrap().length(world.bodies()) < 3.0);
    // Attached at the centres: no torque.
    assert!(body_a.angular_velocity().length() < 1e-6);
}

#[test]
fn hanging_box_settles_at_static_extension() {
    let mut world = World::new(WorldConfig::default()).unwrap();
    let h = world
        .add_box(Vec3::ONE, 1.0, Vec3::new(0.0, 3.5, 0.0), Mat3::IDENTITY)
        .unwrap();
    world
        .add_spring(
            Anchor::attached(h, Vec3::new(0.0, 0.5, 0.0)),
            Anchor::Fixed(Vec3::new(0.0, 5.0, 0.0)),
            1.0,
            50.0,
            2.0,
        )
        .unwrap();

    world.run(1.0 / 300.0, 6000).unwrap();

    // Anchor hangs 1 + mg/ks below the fixed point.
    let expected = 5.0 - 1.0 - 9.8 / 50.0 - 0.5;
    let body = world.body(h).unwrap();
    assert!(
        (body.position.y - expected).abs() < 0.05,
        "y={} expected={expected}",
        body.position.y
    );
    assert!(body.velocity().length() < 0.05);
}

#[test]
fn offset_attachment_swings_body() {
    let mut world = World::new(WorldConfig::default().frictionless()).unwrap();
    let h = world
        .add_box(Vec3::ONE, 1.0, Vec3::ZERO, Mat3::IDENTITY)
        .unwrap();
    world
        .add_spring(
            Anchor::attached(h, Vec3::new(0.5, 0.5, 0.0)),
            Anchor::Fixed(Vec3::new(0.5, 3.0, 0.0)),
            1.0,
            10.0,
            0.0,
        )
        .unwrap();
    world.run(0.01, 10).unwrap();
    let spin = world.body(h).unwrap().angular_velocity();
    // Upward pull at +x produces positive torque about z.
    assert!(spin.z > 0.0, "spin={spin:?}");
}
