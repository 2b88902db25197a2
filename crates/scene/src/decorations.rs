//! Decorations: low-poly trees around the plot and slowly drifting clouds
//!
//! Decorations are never selectable. Clicking one counts as a background
//! click and clears the selection.

use bevy::prelude::*;

use crate::SceneSystems;

/// Clouds leaving the scene past this X re-enter at the far side
pub const CLOUD_WRAP_X: f32 = 60.0;

/// A cloud drifting along +X
#[derive(Component, Debug, Clone, Copy)]
pub struct Cloud {
    /// World units per second
    pub speed: f32,
}

/// New X for a cloud after `dt` seconds, wrapped back to the far side once
/// it has drifted past [`CLOUD_WRAP_X`]
pub fn drift_x(x: f32, speed: f32, dt: f32) -> f32 {
    let next = x + speed * dt;
    if next > CLOUD_WRAP_X {
        -CLOUD_WRAP_X
    } else {
        next
    }
}

/// Tree placements as (position, uniform scale)
const TREES: [([f32; 3], f32); 6] = [
    ([-15.0, 0.0, -5.0], 1.2),
    ([-18.0, 0.0, 5.0], 1.5),
    ([-12.0, 0.0, 10.0], 0.9),
    ([20.0, 0.0, -10.0], 1.3),
    ([15.0, 0.0, -15.0], 1.1),
    ([25.0, 0.0, 5.0], 1.4),
];

/// Cloud placements as (position, drift speed)
const CLOUDS: [([f32; 3], f32); 3] = [
    ([-30.0, 25.0, -20.0], 2.0),
    ([10.0, 20.0, -30.0], 1.5),
    ([-10.0, 28.0, 20.0], 1.8),
];

/// Puffs making up one cloud as (local offset, radius)
const CLOUD_PUFFS: [([f32; 3], f32); 3] = [
    ([0.0, 0.0, 0.0], 2.5),
    ([2.5, 0.5, 0.0], 2.0),
    ([-2.5, -0.5, 0.0], 2.2),
];

/// Plugin for trees and clouds
pub struct DecorationsPlugin;

impl Plugin for DecorationsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_decorations)
            .add_systems(Update, drift_clouds.in_set(SceneSystems::Draw));
    }
}

/// Faceted sphere: few segments and flat normals
fn low_poly_ball(radius: f32) -> Mesh {
    let mut mesh = Sphere::new(radius).mesh().uv(6, 4);
    mesh.duplicate_vertices();
    mesh.compute_flat_normals();
    mesh
}

fn flat_material(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        perceptual_roughness: 1.0,
        ..default()
    }
}

fn spawn_decorations(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let trunk_mesh = meshes.add(
        ConicalFrustum {
            radius_top: 0.2,
            radius_bottom: 0.3,
            height: 2.0,
        }
        .mesh()
        .resolution(6),
    );
    let lower_foliage_mesh = meshes.add(low_poly_ball(1.2));
    let upper_foliage_mesh = meshes.add(low_poly_ball(0.9));
    let trunk_material = materials.add(flat_material(Color::srgb_u8(0x8b, 0x45, 0x13)));
    let lower_foliage_material = materials.add(flat_material(Color::srgb_u8(0x66, 0xcc, 0x88)));
    let upper_foliage_material = materials.add(flat_material(Color::srgb_u8(0x88, 0xee, 0xaa)));

    for (position, scale) in TREES {
        commands
            .spawn((
                Transform::from_translation(Vec3::from(position)).with_scale(Vec3::splat(scale)),
                Visibility::default(),
                Name::new("Tree"),
            ))
            .with_children(|tree| {
                tree.spawn((
                    Mesh3d(trunk_mesh.clone()),
                    MeshMaterial3d(trunk_material.clone()),
                    Transform::from_xyz(0.0, 1.0, 0.0),
                ));
                tree.spawn((
                    Mesh3d(lower_foliage_mesh.clone()),
                    MeshMaterial3d(lower_foliage_material.clone()),
                    Transform::from_xyz(0.0, 2.5, 0.0),
                ));
                tree.spawn((
                    Mesh3d(upper_foliage_mesh.clone()),
                    MeshMaterial3d(upper_foliage_material.clone()),
                    Transform::from_xyz(0.0, 3.5, 0.0),
                ));
            });
    }

    let cloud_material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, 0.9),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 1.0,
        ..default()
    });
    let puff_meshes: Vec<Handle<Mesh>> = CLOUD_PUFFS
        .iter()
        .map(|(_, radius)| meshes.add(low_poly_ball(*radius)))
        .collect();

    for (position, speed) in CLOUDS {
        commands
            .spawn((
                Transform::from_translation(Vec3::from(position)),
                Visibility::default(),
                Cloud { speed },
                Name::new("Cloud"),
            ))
            .with_children(|cloud| {
                for ((offset, _), mesh) in CLOUD_PUFFS.iter().zip(&puff_meshes) {
                    cloud.spawn((
                        Mesh3d(mesh.clone()),
                        MeshMaterial3d(cloud_material.clone()),
                        Transform::from_translation(Vec3::from(*offset)),
                    ));
                }
            });
    }

    debug!("Spawned {} trees and {} clouds", TREES.len(), CLOUDS.len());
}

fn drift_clouds(time: Res<Time>, mut clouds: Query<(&Cloud, &mut Transform)>) {
    let dt = time.delta_secs();
    for (cloud, mut transform) in &mut clouds {
        transform.translation.x = drift_x(transform.translation.x, cloud.speed, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloud_drifts_with_speed() {
        assert_eq!(drift_x(-30.0, 2.0, 0.5), -29.0);
        assert_eq!(drift_x(10.0, 1.5, 0.0), 10.0);
    }

    #[test]
    fn test_cloud_wraps_past_edge() {
        assert_eq!(drift_x(59.9, 2.0, 0.1), -CLOUD_WRAP_X);
        // Exactly at the edge has not passed it yet
        assert_eq!(drift_x(59.0, 1.0, 1.0), CLOUD_WRAP_X);
    }

    #[test]
    fn test_decorations_stay_off_the_buildings() {
        // Trees ring the plot outside both building footprints
        for (position, _) in TREES {
            let p = Vec3::from(position);
            assert!(p.x.abs() >= 12.0 || p.z.abs() >= 12.0, "tree at {p:?}");
        }
        for (position, speed) in CLOUDS {
            assert!(position[1] >= 20.0);
            assert!(speed > 0.0);
        }
    }
}
