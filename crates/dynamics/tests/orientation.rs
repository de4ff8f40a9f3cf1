use dynamics::{Mat3, Vec3, World, WorldConfig};

fn assert_rotation(r: Mat3) {
    assert!(
        (r * r.transpose()).abs_diff_eq(Mat3::IDENTITY, 1e-4),
        "not orthonormal: {r:?}"
    );
    assert!((r.determinant() - 1.0).abs() < 1e-4);
}

#[test]
fn tumbling_box_stays_a_rotation() {
    let mut world = World::new(WorldConfig::default().frictionless()).unwrap();
    let h = world
        .add_box(Vec3::new(2.0, 1.0, 0.5), 3.0, Vec3::ZERO, Mat3::IDENTITY)
        .unwrap();
    world
        .body_mut(h)
        .unwrap()
        .set_velocity(Vec3::ZERO, Vec3::new(0.5, 4.0, -1.0));

    let before = world.body(h).unwrap().angular_momentum;
    world.run(1.0 / 240.0, 2000).unwrap();

    let body = world.body(h).unwrap();
    assert_rotation(body.orientation);
    // Torque-free: angular momentum is untouched by integration.
    assert!(body.angular_momentum.abs_diff_eq(before, 1e-4));
}

#[test]
fn spin_about_z_turns_x_axis_towards_y() {
    let mut world = World::new(WorldConfig::default().frictionless()).unwrap();
    let h = world
        .add_box(Vec3::ONE, 1.0, Vec3::ZERO, Mat3::IDENTITY)
        .unwrap();
    world
        .body_mut(h)
        .unwrap()
        .set_velocity(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
    world.run(0.001, 100).unwrap();

    let x_axis = world.body(h).unwrap().orientation.x_axis;
    assert!(x_axis.y > 0.09 && x_axis.y < 0.11, "x_axis={x_axis:?}");
    assert_rotation(world.body(h).unwrap().orientation);
}

#[test]
fn angular_damping_slows_spin() {
    let mut world = World::new(WorldConfig {
        gravity: Vec3::ZERO,
        ..WorldConfig::default()
    })
    .unwrap();
    let h = world
        .add_box(Vec3::ONE, 1.0, Vec3::ZERO, Mat3::IDENTITY)
        .unwrap();
    world
        .body_mut(h)
        .unwrap()
        .set_velocity(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0));
    world.run(0.01, 100).unwrap();
    let spin = world.body(h).unwrap().angular_velocity().length();
    assert!(spin < 2.0 && spin > 0.0);
}
