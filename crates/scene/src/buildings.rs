//! The two selectable buildings: the main villa and the annex
//!
//! Each building is a root entity carrying [`Selectable`] with its parts as
//! children, so a drag on the root moves the whole model. Parts are declared
//! in building-local space as plain data and turned into meshes at startup.
//! Box parts and glass panels get a thin edge outline drawn with gizmos.
//!
//! Guide lines are long dashed construction lines through the building's
//! corners. They live in building-local space too, so they follow the
//! building when it is moved or turned.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_6};

use bevy::math::Isometry3d;
use bevy::prelude::*;
use cantilever_ipc::BuildingId;

use crate::selection::Selectable;
use crate::view::ViewSettings;
use crate::SceneSystems;

/// Half-length of a guide line, far enough to vanish into the fog
pub const GUIDE_HALF_LENGTH: f32 = 1000.0;

const EDGE_COLOR: Color = Color::srgb(0.2, 0.2, 0.2);
const GLASS_EDGE_COLOR: Color = Color::srgb(0.267, 0.4, 0.533);
const GUIDE_COLOR: Color = Color::srgb(0.133, 0.133, 0.133);

/// Surface finish of a building part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    Concrete,
    /// Darker floor slabs of the living wing
    Slab,
    Stone,
    Garage,
    Glass,
    Water,
    /// Warm emissive strip standing in for interior lighting
    Lamp,
    /// Dark recess behind the upper floor window
    Void,
}

impl Finish {
    pub fn is_transparent(&self) -> bool {
        matches!(self, Finish::Glass | Finish::Water)
    }

    fn material(&self) -> StandardMaterial {
        match self {
            Finish::Concrete => StandardMaterial {
                base_color: Color::srgb_u8(0xe0, 0xe0, 0xe0),
                perceptual_roughness: 0.5,
                metallic: 0.1,
                ..default()
            },
            Finish::Slab => StandardMaterial {
                base_color: Color::srgb_u8(0x99, 0x99, 0x99),
                perceptual_roughness: 0.5,
                metallic: 0.1,
                ..default()
            },
            Finish::Stone => StandardMaterial {
                base_color: Color::srgb_u8(0x66, 0x66, 0x66),
                perceptual_roughness: 0.9,
                metallic: 0.1,
                ..default()
            },
            Finish::Garage => StandardMaterial {
                base_color: Color::srgb_u8(0x55, 0x55, 0x55),
                perceptual_roughness: 0.9,
                metallic: 0.1,
                ..default()
            },
            Finish::Glass => StandardMaterial {
                base_color: Color::srgba(0.533, 0.8, 1.0, 0.3),
                alpha_mode: AlphaMode::Blend,
                perceptual_roughness: 0.1,
                metallic: 0.9,
                double_sided: true,
                cull_mode: None,
                ..default()
            },
            Finish::Water => StandardMaterial {
                base_color: Color::srgba(0.0, 1.0, 1.0, 0.7),
                alpha_mode: AlphaMode::Blend,
                perceptual_roughness: 0.1,
                metallic: 0.5,
                ..default()
            },
            Finish::Lamp => StandardMaterial {
                base_color: Color::srgb_u8(0xff, 0xaa, 0x33),
                emissive: LinearRgba::from(Color::srgb_u8(0xff, 0xaa, 0x33)) * 2.0,
                ..default()
            },
            Finish::Void => StandardMaterial {
                base_color: Color::srgb_u8(0x11, 0x11, 0x11),
                perceptual_roughness: 1.0,
                ..default()
            },
        }
    }

    fn edge_color(&self) -> Option<Color> {
        match self {
            Finish::Glass => Some(GLASS_EDGE_COLOR),
            Finish::Lamp | Finish::Water | Finish::Void => None,
            _ => Some(EDGE_COLOR),
        }
    }
}

/// Geometry of a building part
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Block(Vec3),
    Column { radius: f32, height: f32 },
    /// Upright rectangle facing +Z before rotation
    Panel(Vec2),
    /// Flat rectangle facing up, x by z
    Floor(Vec2),
}

/// One mesh of a building, in building-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Part {
    pub shape: Shape,
    pub finish: Finish,
    pub position: Vec3,
    pub yaw: f32,
}

impl Part {
    fn new(shape: Shape, finish: Finish, position: Vec3) -> Self {
        Self {
            shape,
            finish,
            position,
            yaw: 0.0,
        }
    }

    fn turned(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    fn local_transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(Quat::from_rotation_y(self.yaw))
    }

    fn mesh(&self) -> Mesh {
        match self.shape {
            Shape::Block(size) => Cuboid::from_size(size).into(),
            Shape::Column { radius, height } => Cylinder::new(radius, height).into(),
            Shape::Panel(size) => Rectangle::from_size(size).into(),
            Shape::Floor(size) => Plane3d::default().mesh().size(size.x, size.y).into(),
        }
    }

    fn outline(&self) -> Option<EdgeOutline> {
        let color = self.finish.edge_color()?;
        let kind = match self.shape {
            Shape::Block(size) => OutlineKind::Box(size),
            Shape::Panel(size) => OutlineKind::Panel(size),
            Shape::Column { .. } | Shape::Floor(_) => return None,
        };
        Some(EdgeOutline { kind, color })
    }
}

fn block(size: [f32; 3], finish: Finish, at: [f32; 3]) -> Part {
    Part::new(Shape::Block(Vec3::from(size)), finish, Vec3::from(at))
}

fn panel(size: [f32; 2], finish: Finish, at: [f32; 3]) -> Part {
    Part::new(Shape::Panel(Vec2::from(size)), finish, Vec3::from(at))
}

fn column(radius: f32, height: f32, at: [f32; 3]) -> Part {
    Part::new(Shape::Column { radius, height }, Finish::Concrete, Vec3::from(at))
}

/// Local point light (pool glow and porch lamps)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixture {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
    pub range: f32,
}

/// Horizontal axis a guide line runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideAxis {
    X,
    Z,
}

/// Construction line through a point, along one building axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub origin: Vec3,
    pub axis: GuideAxis,
}

impl GuideLine {
    pub fn x(origin: [f32; 3]) -> Self {
        Self {
            origin: Vec3::from(origin),
            axis: GuideAxis::X,
        }
    }

    pub fn z(origin: [f32; 3]) -> Self {
        Self {
            origin: Vec3::from(origin),
            axis: GuideAxis::Z,
        }
    }

    /// World-space endpoints for a building at `building`
    pub fn endpoints(&self, building: &Transform) -> (Vec3, Vec3) {
        let direction = match self.axis {
            GuideAxis::X => Vec3::X,
            GuideAxis::Z => Vec3::Z,
        } * GUIDE_HALF_LENGTH;
        (
            building.transform_point(self.origin - direction),
            building.transform_point(self.origin + direction),
        )
    }
}

/// Guide lines owned by a building root
#[derive(Component, Debug, Clone, Default)]
pub struct GuideLines {
    pub lines: Vec<GuideLine>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum OutlineKind {
    Box(Vec3),
    Panel(Vec2),
}

/// Edge outline drawn around a part every frame
#[derive(Component, Debug, Clone, Copy)]
struct EdgeOutline {
    kind: OutlineKind,
    color: Color,
}

/// Gizmo line group for dashed guide lines
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct GuideGizmos;

/// Everything needed to spawn one building
#[derive(Debug, Clone)]
pub struct Blueprint {
    pub id: BuildingId,
    pub placement: Transform,
    pub parts: Vec<Part>,
    pub fixtures: Vec<Fixture>,
    pub guides: Vec<GuideLine>,
}

impl Blueprint {
    pub fn for_building(id: BuildingId) -> Self {
        match id {
            BuildingId::MainVilla => main_villa(),
            BuildingId::Annex => annex(),
        }
    }
}

fn main_villa() -> Blueprint {
    use Finish::*;

    // Living wing sits at (-6, 2.1, 2), the upper floor at (-2, 6.2, 4)
    // and the pool at (8, 0.1, 8); offsets below are already added in.
    let parts = vec![
        block([25.0, 0.2, 20.0], Concrete, [0.0, 0.1, 0.0]),
        // Living wing
        block([10.0, 0.2, 12.0], Slab, [-6.0, 0.2, 2.0]),
        block([10.0, 0.2, 12.0], Slab, [-6.0, 4.0, 2.0]),
        block([9.5, 3.8, 0.2], Concrete, [-6.0, 2.1, -3.9]),
        block([0.2, 3.8, 12.0], Stone, [-10.9, 2.1, 2.0]),
        panel([10.0, 3.8], Glass, [-6.0, 2.1, 7.9]),
        panel([12.0, 3.8], Glass, [-1.1, 2.1, 2.0]).turned(FRAC_PI_2),
        block([1.0, 0.1, 4.0], Lamp, [-6.0, 3.6, 2.0]),
        // Garage
        block([10.0, 4.0, 10.0], Garage, [7.0, 2.1, -2.0]),
        // Cantilevered upper floor
        block([14.0, 4.0, 10.0], Concrete, [-2.0, 6.2, 4.0]),
        panel([10.0, 2.5], Void, [-2.0, 6.2, 9.01]),
        panel([10.0, 2.5], Glass, [-2.0, 6.2, 9.02]),
        block([14.0, 0.1, 1.0], Concrete, [-2.0, 4.7, 9.5]),
        panel([14.0, 1.0], Glass, [-2.0, 5.7, 10.0]),
        // Pool
        Part::new(Shape::Floor(Vec2::new(8.0, 12.0)), Water, Vec3::new(8.0, 0.0, 8.0)),
        block([8.4, 0.1, 0.4], Concrete, [8.0, 0.05, 1.8]),
        block([8.4, 0.1, 0.4], Concrete, [8.0, 0.05, 14.2]),
        block([0.4, 0.1, 12.8], Concrete, [3.8, 0.05, 8.0]),
        block([0.4, 0.1, 12.8], Concrete, [12.2, 0.05, 8.0]),
        // Pillars under the overhang
        column(0.3, 4.0, [-10.0, 2.1, 2.0]),
        column(0.2, 4.0, [-6.0, 2.1, 8.0]),
    ];

    let pool_light = |z: f32| Fixture {
        position: Vec3::new(8.0, -0.4, 8.0 + z),
        color: Color::srgb(0.0, 1.0, 1.0),
        intensity: 20_000.0,
        range: 8.0,
    };
    let porch_light = |position: Vec3, range: f32| Fixture {
        position,
        color: Color::srgb_u8(0xff, 0xcc, 0x77),
        intensity: 10_000.0,
        range,
    };
    let fixtures = vec![
        pool_light(0.0),
        pool_light(4.0),
        pool_light(-4.0),
        porch_light(Vec3::new(-6.0, 3.8, 7.0), 8.0),
        porch_light(Vec3::new(0.0, 8.0, 9.0), 10.0),
    ];

    let guides = vec![
        GuideLine::x([0.0, 0.1, -4.0]),
        GuideLine::x([0.0, 4.0, -4.0]),
        GuideLine::x([0.0, 0.1, 8.0]),
        GuideLine::x([0.0, 4.0, 8.0]),
        GuideLine::z([-11.0, 0.1, 0.0]),
        GuideLine::z([-11.0, 4.0, 0.0]),
        GuideLine::z([-1.0, 0.1, 0.0]),
        GuideLine::z([-1.0, 4.0, 0.0]),
        GuideLine::x([0.0, 0.1, -7.0]),
        GuideLine::x([0.0, 4.0, -7.0]),
        GuideLine::x([0.0, 0.1, 3.0]),
        GuideLine::x([0.0, 4.0, 3.0]),
        GuideLine::z([2.0, 0.1, 0.0]),
        GuideLine::z([2.0, 4.0, 0.0]),
        GuideLine::z([12.0, 0.1, 0.0]),
        GuideLine::z([12.0, 4.0, 0.0]),
        GuideLine::x([0.0, 4.2, -1.0]),
        GuideLine::x([0.0, 8.2, -1.0]),
        GuideLine::x([0.0, 4.2, 9.0]),
        GuideLine::x([0.0, 8.2, 9.0]),
        GuideLine::z([-9.0, 4.2, 0.0]),
        GuideLine::z([-9.0, 8.2, 0.0]),
        GuideLine::z([5.0, 4.2, 0.0]),
        GuideLine::z([5.0, 8.2, 0.0]),
    ];

    Blueprint {
        id: BuildingId::MainVilla,
        placement: Transform::IDENTITY,
        parts,
        fixtures,
        guides,
    }
}

fn annex() -> Blueprint {
    use Finish::*;

    let parts = vec![
        block([14.0, 0.2, 14.0], Concrete, [0.0, 0.1, 0.0]),
        block([10.0, 4.0, 10.0], Stone, [0.0, 2.1, 0.0]),
        panel([8.0, 3.5], Glass, [0.0, 2.1, 5.1]),
        panel([8.0, 3.5], Glass, [5.01, 2.1, 0.0]).turned(FRAC_PI_2),
        block([12.0, 4.0, 10.0], Concrete, [0.0, 6.2, 0.0]),
        panel([10.0, 3.0], Glass, [0.0, 6.2, 5.1]),
        block([12.0, 0.2, 2.0], Concrete, [0.0, 4.2, 6.0]),
    ];

    let guides = vec![
        GuideLine::x([0.0, 0.1, -5.0]),
        GuideLine::x([0.0, 4.0, -5.0]),
        GuideLine::x([0.0, 0.1, 5.0]),
        GuideLine::x([0.0, 4.0, 5.0]),
        GuideLine::z([-5.0, 0.1, 0.0]),
        GuideLine::z([-5.0, 4.0, 0.0]),
        GuideLine::z([5.0, 0.1, 0.0]),
        GuideLine::z([5.0, 4.0, 0.0]),
        GuideLine::x([0.0, 8.2, -5.0]),
        GuideLine::x([0.0, 8.2, 5.0]),
        GuideLine::z([-6.0, 8.2, 0.0]),
        GuideLine::z([6.0, 8.2, 0.0]),
    ];

    Blueprint {
        id: BuildingId::Annex,
        placement: Transform::from_xyz(-25.0, 0.0, 5.0)
            .with_rotation(Quat::from_rotation_y(FRAC_PI_6)),
        parts,
        fixtures: Vec::new(),
        guides,
    }
}

/// Plugin that spawns the buildings and draws their outlines and guides
pub struct BuildingsPlugin;

impl Plugin for BuildingsPlugin {
    fn build(&self, app: &mut App) {
        app.init_gizmo_group::<GuideGizmos>()
            .add_systems(Startup, (spawn_buildings, configure_guide_lines))
            .add_systems(
                Update,
                (draw_edge_outlines, draw_guide_lines).in_set(SceneSystems::Draw),
            );
    }
}

fn configure_guide_lines(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<GuideGizmos>();
    config.line.style = GizmoLineStyle::Dashed {
        gap_scale: 3.0,
        line_scale: 3.0,
    };
    config.line.width = 1.0;
}

fn spawn_buildings(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for id in BuildingId::ALL {
        let blueprint = Blueprint::for_building(id);
        let part_count = blueprint.parts.len();

        commands
            .spawn((
                blueprint.placement,
                Visibility::default(),
                Selectable { id },
                GuideLines {
                    lines: blueprint.guides,
                },
                Name::new(id.label()),
            ))
            .with_children(|building| {
                for part in &blueprint.parts {
                    let mut entity = building.spawn((
                        Mesh3d(meshes.add(part.mesh())),
                        MeshMaterial3d(materials.add(part.finish.material())),
                        part.local_transform(),
                    ));
                    if let Some(outline) = part.outline() {
                        entity.insert(outline);
                    }
                }
                for fixture in &blueprint.fixtures {
                    building.spawn((
                        PointLight {
                            color: fixture.color,
                            intensity: fixture.intensity,
                            range: fixture.range,
                            shadows_enabled: false,
                            ..default()
                        },
                        Transform::from_translation(fixture.position),
                    ));
                }
            });

        info!("Spawned {} with {} parts", id.label(), part_count);
    }
}

fn draw_edge_outlines(outlines: Query<(&EdgeOutline, &GlobalTransform)>, mut gizmos: Gizmos) {
    for (outline, global) in &outlines {
        let transform = global.compute_transform();
        match outline.kind {
            OutlineKind::Box(size) => {
                gizmos.cube(transform.with_scale(transform.scale * size), outline.color);
            }
            OutlineKind::Panel(size) => {
                gizmos.rect(
                    Isometry3d::new(transform.translation, transform.rotation),
                    size,
                    outline.color,
                );
            }
        }
    }
}

fn draw_guide_lines(
    view: Res<ViewSettings>,
    buildings: Query<(&GuideLines, &Transform), With<Selectable>>,
    mut gizmos: Gizmos<GuideGizmos>,
) {
    if !view.show_guides {
        return;
    }
    for (guides, transform) in &buildings {
        for line in &guides.lines {
            let (start, end) = line.endpoints(transform);
            gizmos.line(start, end, GUIDE_COLOR);
        }
    }
}
