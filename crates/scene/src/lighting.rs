//! Evening lighting: a warm sun with shadows, a cool fill light, ambient
//! light, a pale sky clear color and distance fog.

use bevy::light::{DirectionalLightShadowMap, GlobalAmbientLight};
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;

/// Marker component for the sun directional light
#[derive(Component)]
pub struct SunLight;

/// Resource describing the scene lighting
#[derive(Resource, Debug, Clone)]
pub struct SceneLighting {
    /// Position the sun shines from (towards the origin)
    pub sun_position: Vec3,
    pub sun_illuminance: f32,
    pub sun_color: Color,
    /// Secondary light without shadows, lifting the shaded sides
    pub fill_position: Vec3,
    pub fill_illuminance: f32,
    pub fill_color: Color,
    pub ambient_color: Color,
    pub ambient_brightness: f32,
    /// Sky color, also used for the fog so the horizon blends out
    pub sky_color: Color,
    pub fog_start: f32,
    pub fog_end: f32,
    /// Shadow map resolution for the sun
    pub shadow_map_size: usize,
}

impl Default for SceneLighting {
    fn default() -> Self {
        Self {
            sun_position: Vec3::new(50.0, 100.0, 30.0),
            sun_illuminance: 9_000.0,
            sun_color: Color::srgb(1.0, 0.96, 0.9),
            fill_position: Vec3::new(-20.0, 30.0, -20.0),
            fill_illuminance: 2_500.0,
            fill_color: Color::srgb(0.85, 0.9, 1.0),
            ambient_color: Color::WHITE,
            ambient_brightness: 400.0,
            sky_color: Color::srgb_u8(0xf0, 0xf4, 0xf8),
            fog_start: 20.0,
            fog_end: 120.0,
            shadow_map_size: 2048,
        }
    }
}

impl SceneLighting {
    /// Linear distance fog matching the sky color
    pub fn fog(&self) -> DistanceFog {
        DistanceFog {
            color: self.sky_color,
            falloff: FogFalloff::Linear {
                start: self.fog_start,
                end: self.fog_end,
            },
            ..default()
        }
    }
}

/// Plugin for scene lighting
pub struct LightingPlugin;

impl Plugin for LightingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneLighting>()
            .add_systems(Startup, setup_lighting);
    }
}

/// Spawn the sun and fill lights and set the global ambient and sky
fn setup_lighting(mut commands: Commands, lighting: Res<SceneLighting>) {
    // looking_at the origin from the light position gives the shine direction
    commands.spawn((
        DirectionalLight {
            illuminance: lighting.sun_illuminance,
            color: lighting.sun_color,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(lighting.sun_position).looking_at(Vec3::ZERO, Vec3::Y),
        SunLight,
        Name::new("Sun"),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: lighting.fill_illuminance,
            color: lighting.fill_color,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(lighting.fill_position).looking_at(Vec3::ZERO, Vec3::Y),
        Name::new("Fill light"),
    ));

    // Ambient light is a resource, not an entity
    commands.insert_resource(GlobalAmbientLight {
        color: lighting.ambient_color,
        brightness: lighting.ambient_brightness,
        ..default()
    });
    commands.insert_resource(DirectionalLightShadowMap {
        size: lighting.shadow_map_size,
    });
    commands.insert_resource(ClearColor(lighting.sky_color));

    info!("Scene lighting initialized");
}
