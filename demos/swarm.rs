use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_swarm::prelude::*;

const NUM_UAVS: usize = 12;
const CRUISE_SPEED: f32 = 60.0;
const START_ALTITUDE: f32 = 1500.0;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(PhysicsPlugins::default())
        .add_plugins((SwarmPlugin, DebugSwarmPlugin))
        .add_systems(Startup, setup)
        .add_systems(Update, fly_to_active_waypoint)
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let parameters = SwarmParameters::default()
        .with_comm_distance(Distance::nautical_miles(2.0))
        .with_desired_separation(Distance::meters(400.0))
        .with_cohesion_factor(0.5);

    for _ in 0..NUM_UAVS {
        let north = rand::random_range(-2000.0..=2000.0);
        let east = rand::random_range(-2000.0..=2000.0);
        let heading = rand::random_range(0.0..std::f32::consts::TAU);
        let velocity = Vec3::new(heading.cos(), heading.sin(), 0.0) * CRUISE_SPEED;
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(40.0, 40.0, 10.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.8, 0.2, 0.2),
                ..default()
            })),
            Transform::from_xyz(north, east, -START_ALTITUDE),
            RigidBody::Kinematic,
            LinearVelocity(velocity),
            SwarmController::new(parameters),
            Autopilot::swarm(),
        ));
    }

    // Looking up from below the swarm, since +z points down
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.0, 8000.0).looking_at(Vec3::new(0.0, 0.0, -1500.0), Vec3::X),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 5000.0).looking_at(Vec3::ZERO, Vec3::X),
    ));
}

/// A stand-in autopilot: turn toward the active waypoint at cruise speed.
fn fly_to_active_waypoint(
    mut uavs: Query<(&GlobalTransform, &Navigation, &mut LinearVelocity)>,
    waypoints: Query<&Waypoint>,
) {
    for (transform, navigation, mut velocity) in uavs.iter_mut() {
        let Some(waypoint) = navigation
            .route()
            .and_then(Route::active)
            .and_then(|entity| waypoints.get(entity).ok())
        else {
            continue;
        };
        let mut target = waypoint.position;
        target.z = -waypoint.commanded_altitude;
        let direction = (target - transform.translation()).normalize_or_zero();
        velocity.0 = velocity.0.lerp(direction * CRUISE_SPEED, 0.05);
    }
}
