extern crate avatar_motion;
extern crate bevy;

use avatar_motion::prelude::*;
use bevy::{platform::collections::HashMap, prelude::*};
use std::f32::consts::PI;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(AvatarMotionPlugin::default())
        .insert_resource(GlobalAmbientLight {
            color: Color::WHITE,
            brightness: 300.,
            ..default()
        })
        .add_systems(Startup, setup)
        .add_systems(Update, (keyboard_control, cursor_look_at, show_face))
        .run();
}

#[derive(Component)]
struct Mannequin;

#[derive(Component)]
struct Mouth;

#[derive(Component)]
struct EyeMarker(Side);

/// Offset of a joint from its parent, for a roughly 1.7 m tall figure facing +Z.
fn joint_offset(joint: HumanoidJoint) -> Vec3 {
    use HumanoidJoint::*;
    match joint {
        Hips => Vec3::new(0., 0.95, 0.),
        Spine => Vec3::new(0., 0.1, 0.),
        Chest => Vec3::new(0., 0.12, 0.),
        UpperChest => Vec3::new(0., 0.12, 0.),
        Neck => Vec3::new(0., 0.14, 0.),
        Head => Vec3::new(0., 0.1, 0.),
        Eye(side) => Vec3::new(side.mirror(0.035), 0.07, 0.09),
        Shoulder(side) => Vec3::new(side.mirror(0.05), 0.1, 0.),
        UpperArm(side) => Vec3::new(side.mirror(0.12), 0., 0.),
        LowerArm(side) => Vec3::new(side.mirror(0.28), 0., 0.),
        Hand(side) => Vec3::new(side.mirror(0.25), 0., 0.),
        UpperLeg(side) => Vec3::new(side.mirror(0.1), -0.05, 0.),
        LowerLeg(side) => Vec3::new(0., -0.45, 0.),
        Finger(..) => Vec3::ZERO,
    }
}

fn depth(joint: HumanoidJoint) -> usize {
    std::iter::successors(joint.parent(), |parent| parent.parent()).count()
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Camera
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0., 1.5, 2.2).looking_at(Vec3::new(0., 1.3, 0.), Vec3::Y),
    ));

    // Plane
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::new(Vec3::Y, Vec2::new(3., 3.)))),
        MeshMaterial3d(materials.add(Color::from(LinearRgba::rgb(0.3, 0.5, 0.3)))),
    ));

    // Light
    commands.spawn((
        Transform::from_rotation(Quat::from_euler(EulerRot::ZYX, 0.0, 1.0, -PI / 4.)),
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
    ));

    let joint_mesh = meshes.add(Sphere::new(0.04));
    let eye_mesh = meshes.add(Sphere::new(0.015));
    let mouth_mesh = meshes.add(Cuboid::new(0.05, 0.02, 0.01));
    let body = materials.add(Color::srgb(0.8, 0.7, 0.6));
    let dark = materials.add(Color::srgb(0.1, 0.1, 0.1));

    let root = commands
        .spawn((
            Mannequin,
            AvatarMotionPlayer::new(),
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    let mut joints = HumanoidJoint::all();
    joints.retain(|joint| !matches!(joint, HumanoidJoint::Finger(..)));
    joints.sort_by_key(|joint| depth(*joint));

    let mut entities: HashMap<HumanoidJoint, Entity> = HashMap::default();
    for joint in joints {
        let parent = joint
            .parent()
            .and_then(|parent| entities.get(&parent).copied())
            .unwrap_or(root);
        let (mesh, material) = match joint {
            HumanoidJoint::Eye(_) => (eye_mesh.clone(), dark.clone()),
            _ => (joint_mesh.clone(), body.clone()),
        };
        let mut entity = commands.spawn((
            Name::new(joint.name()),
            Transform::from_translation(joint_offset(joint)),
            Mesh3d(mesh),
            MeshMaterial3d(material),
            ChildOf(parent),
        ));
        if let HumanoidJoint::Eye(side) = joint {
            entity.insert(EyeMarker(side));
        }
        entities.insert(joint, entity.id());
    }

    if let Some(&head) = entities.get(&HumanoidJoint::Head) {
        commands.spawn((
            Mouth,
            Transform::from_xyz(0., 0.02, 0.1),
            Mesh3d(mouth_mesh),
            MeshMaterial3d(dark),
            ChildOf(head),
        ));
    }

    println!("Controls:");
    println!("\t1-4: Idle, Thinking, Talking, Flirty");
    println!("\tL/S/P/A/W/B: Laugh, Surprise, Pout, Anger, Wink, Blush");
    println!("\tMouse: Look at cursor");
    println!("\tC: Stop looking at cursor");
    println!("\tSPACE: Pause/Resume");
}

fn keyboard_control(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut mannequin: Single<&mut AvatarMotionPlayer, With<Mannequin>>,
) {
    let states = [
        (KeyCode::Digit1, CharacterState::Idle),
        (KeyCode::Digit2, CharacterState::Thinking),
        (KeyCode::Digit3, CharacterState::Talking),
        (KeyCode::Digit4, CharacterState::Flirty),
    ];
    for (key, state) in states {
        if keyboard_input.just_pressed(key) {
            mannequin.set_state(state);
        }
    }

    let reactions = [
        (KeyCode::KeyL, Reaction::Laugh),
        (KeyCode::KeyS, Reaction::Surprise),
        (KeyCode::KeyP, Reaction::Pout),
        (KeyCode::KeyA, Reaction::Anger),
        (KeyCode::KeyW, Reaction::Wink),
        (KeyCode::KeyB, Reaction::Blush),
    ];
    for (key, reaction) in reactions {
        if keyboard_input.just_pressed(key) {
            mannequin.trigger_reaction(reaction);
        }
    }

    if keyboard_input.just_pressed(KeyCode::KeyC) {
        mannequin.clear_look_at_target();
    }

    if keyboard_input.just_pressed(KeyCode::Space) {
        if mannequin.is_paused() {
            mannequin.resume();
        } else {
            mannequin.pause();
        }
    }
}

fn cursor_look_at(
    window: Single<&Window>,
    camera: Single<(&Camera, &GlobalTransform)>,
    mut mannequin: Single<&mut AvatarMotionPlayer, With<Mannequin>>,
) {
    let (camera, camera_transform) = *camera;
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };
    // Plane through the mannequin's face, facing the camera
    let plane_origin = Vec3::new(0., 1.45, 0.6);
    let Some(distance) = ray.intersect_plane(plane_origin, InfinitePlane3d::new(Vec3::Z)) else {
        return;
    };
    mannequin.set_look_at_target(ray.get_point(distance));
}

fn show_face(
    mannequin: Single<&AvatarExpressions, With<Mannequin>>,
    mut mouths: Query<&mut Transform, (With<Mouth>, Without<EyeMarker>)>,
    mut eyes: Query<(&mut Transform, &EyeMarker), Without<Mouth>>,
) {
    let open = mannequin.get("aa") + mannequin.get("oh");
    for mut transform in &mut mouths {
        transform.scale = Vec3::new(1., 0.5 + 4. * open, 1.);
    }

    let blink = mannequin.get("blink");
    for (mut transform, EyeMarker(side)) in &mut eyes {
        let closed = match side {
            Side::Left => blink.max(mannequin.get("blinkLeft")),
            Side::Right => blink.max(mannequin.get("blinkRight")),
        };
        transform.scale = Vec3::new(1., (1. - closed).max(0.1), 1.);
    }
}
