//! Ray-geometry intersection for gizmo handle picking.
//!
//! Handles are drawn as immediate-mode lines, which the mesh picker cannot
//! see, so they are hit-tested analytically. Arrows and the yaw ring are
//! treated as round tubes around line segments; the plane handle is a flat
//! square on the gizmo's ground plane.

use bevy::prelude::*;
use cantilever_ipc::AxisVisibility;

/// Epsilon for floating point comparisons
const EPSILON: f32 = 1e-6;

/// Which gizmo handle is being interacted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GizmoHandle {
    #[default]
    None,
    /// Arrow along world X
    TranslateX,
    /// Arrow along world Z
    TranslateZ,
    /// Square between the X and Z arrows, moves freely on the ground
    TranslatePlane,
    /// Ring around the vertical axis
    RotateY,
}

impl GizmoHandle {
    pub fn is_translate(&self) -> bool {
        matches!(
            self,
            GizmoHandle::TranslateX | GizmoHandle::TranslateZ | GizmoHandle::TranslatePlane
        )
    }

    pub fn is_rotate(&self) -> bool {
        matches!(self, GizmoHandle::RotateY)
    }

    /// World axes a translation with this handle may change: (x, z)
    pub fn translation_axes(&self) -> (bool, bool) {
        match self {
            GizmoHandle::TranslateX => (true, false),
            GizmoHandle::TranslateZ => (false, true),
            GizmoHandle::TranslatePlane => (true, true),
            GizmoHandle::RotateY | GizmoHandle::None => (false, false),
        }
    }
}

/// Result of a gizmo handle raycast
#[derive(Debug, Clone, Copy)]
pub struct GizmoRaycastHit {
    pub handle: GizmoHandle,
    pub distance: f32,
    pub hit_point: Vec3,
}

/// Geometry parameters for gizmo handles, in units of one gizmo "size"
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct GizmoGeometry {
    /// Length of translation arrows
    pub arrow_length: f32,
    /// Radius of arrow shaft (for picking)
    pub arrow_shaft_radius: f32,
    /// Length of arrow head cone
    pub arrow_head_length: f32,
    /// Base radius of arrow head cone
    pub arrow_head_radius: f32,
    /// Distance of the plane handle's center from the gizmo center along X and Z
    pub plane_offset: f32,
    /// Side length of the plane handle
    pub plane_size: f32,
    /// Radius of the yaw ring
    pub ring_radius: f32,
    /// Thickness of the yaw ring (tube radius for picking)
    pub ring_thickness: f32,
    /// Gizmo size per unit of camera distance, for constant screen size
    pub screen_scale: f32,
}

impl Default for GizmoGeometry {
    fn default() -> Self {
        Self {
            arrow_length: 1.5,
            arrow_shaft_radius: 0.06,
            arrow_head_length: 0.25,
            arrow_head_radius: 0.12,
            plane_offset: 0.45,
            plane_size: 0.3,
            ring_radius: 1.2,
            ring_thickness: 0.07,
            screen_scale: 0.08,
        }
    }
}

impl GizmoGeometry {
    /// Copy with every length multiplied by `factor`
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            arrow_length: self.arrow_length * factor,
            arrow_shaft_radius: self.arrow_shaft_radius * factor,
            arrow_head_length: self.arrow_head_length * factor,
            arrow_head_radius: self.arrow_head_radius * factor,
            plane_offset: self.plane_offset * factor,
            plane_size: self.plane_size * factor,
            ring_radius: self.ring_radius * factor,
            ring_thickness: self.ring_thickness * factor,
            screen_scale: self.screen_scale,
        }
    }

    /// Geometry sized for a camera `camera_distance` away from the gizmo
    pub fn for_camera_distance(&self, camera_distance: f32) -> Self {
        self.scaled((camera_distance * self.screen_scale).max(EPSILON))
    }

    /// Center of the plane handle square
    pub fn plane_center(&self, gizmo_center: Vec3) -> Vec3 {
        gizmo_center + Vec3::new(self.plane_offset, 0.0, self.plane_offset)
    }
}

/// Segments used to approximate the yaw ring
const RING_SEGMENTS: usize = 48;

/// Closest approach between a ray and the segment `a`..`b`.
///
/// Returns the distance along the ray and the gap between the ray and the
/// segment at that point. `dir` must be normalized.
fn ray_segment_approach(origin: Vec3, dir: Vec3, a: Vec3, b: Vec3) -> (f32, f32) {
    let span = b - a;
    let offset = origin - a;
    let along = dir.dot(span);
    let span_sq = span.length_squared();
    let d = dir.dot(offset);
    let e = span.dot(offset);
    let denom = span_sq - along * along;

    let mut s = if denom > EPSILON && span_sq > EPSILON {
        ((e - along * d) / denom).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let t = (s * along - d).max(0.0);
    if span_sq > EPSILON {
        s = ((t * along + e) / span_sq).clamp(0.0, 1.0);
    }

    let gap = (origin + dir * t).distance(a + span * s);
    (t, gap)
}

/// Hit distance for a round tube of `radius` around `a`..`b`
fn hit_tube(origin: Vec3, dir: Vec3, a: Vec3, b: Vec3, radius: f32) -> Option<f32> {
    let (t, gap) = ray_segment_approach(origin, dir, a, b);
    (gap <= radius).then_some(t)
}

/// Hit distance for a horizontal square of half-size `half` at `center`
fn hit_ground_square(origin: Vec3, dir: Vec3, center: Vec3, half: f32) -> Option<f32> {
    if dir.y.abs() < EPSILON {
        return None;
    }
    let t = (center.y - origin.y) / dir.y;
    if t <= 0.0 {
        return None;
    }
    let local = origin + dir * t - center;
    (local.x.abs() <= half && local.z.abs() <= half).then_some(t)
}

/// Hit distance for a horizontal ring around `center`, tested as a closed
/// polyline of tubes
fn hit_ring(origin: Vec3, dir: Vec3, center: Vec3, radius: f32, thickness: f32) -> Option<f32> {
    let point = |i: usize| {
        let angle = i as f32 / RING_SEGMENTS as f32 * std::f32::consts::TAU;
        center + Vec3::new(angle.sin(), 0.0, angle.cos()) * radius
    };
    (0..RING_SEGMENTS)
        .filter_map(|i| hit_tube(origin, dir, point(i), point(i + 1), thickness))
        .min_by(f32::total_cmp)
}

/// Raycast against the handles exposed by `visibility` and return the closest hit.
///
/// Handles are aligned with the world axes regardless of the building's
/// own rotation. The plane handle is exposed whenever both X and Z are.
pub fn raycast_gizmo(
    ray_origin: Vec3,
    ray_dir: Vec3,
    gizmo_center: Vec3,
    visibility: AxisVisibility,
    geometry: &GizmoGeometry,
) -> Option<GizmoRaycastHit> {
    let mut candidates: Vec<(GizmoHandle, f32)> = Vec::new();

    for (exposed, axis, handle) in [
        (visibility.x, Vec3::X, GizmoHandle::TranslateX),
        (visibility.z, Vec3::Z, GizmoHandle::TranslateZ),
    ] {
        if !exposed {
            continue;
        }
        let shaft_end = gizmo_center + axis * (geometry.arrow_length - geometry.arrow_head_length);
        let head_tip = gizmo_center + axis * geometry.arrow_length;

        let shaft = hit_tube(
            ray_origin,
            ray_dir,
            gizmo_center,
            shaft_end,
            geometry.arrow_shaft_radius,
        );
        // The head is picked as a tube as wide as the cone base
        let head = hit_tube(ray_origin, ray_dir, shaft_end, head_tip, geometry.arrow_head_radius);
        candidates.extend([shaft, head].into_iter().flatten().map(|t| (handle, t)));
    }

    if visibility.x && visibility.z {
        let plane = hit_ground_square(
            ray_origin,
            ray_dir,
            geometry.plane_center(gizmo_center),
            geometry.plane_size * 0.5,
        );
        candidates.extend(plane.map(|t| (GizmoHandle::TranslatePlane, t)));
    }

    if visibility.y {
        let ring = hit_ring(
            ray_origin,
            ray_dir,
            gizmo_center,
            geometry.ring_radius,
            geometry.ring_thickness,
        );
        candidates.extend(ring.map(|t| (GizmoHandle::RotateY, t)));
    }

    candidates
        .into_iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(handle, distance)| GizmoRaycastHit {
            handle,
            distance,
            hit_point: ray_origin + ray_dir * distance,
        })
}
