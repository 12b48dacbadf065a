//! Geometry on the planet surface
//!
//! Everything that walks or hovers on the planet lives on a sphere centred at
//! the origin. Movement is expressed as a rotation of the position vector so
//! the distance to the centre never changes, then renormalized to soak up
//! floating-point drift.

use glam::{Mat3, Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::spherical_to_cartesian;

/// A half-line used for hitscan tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }
}

/// Intersect a ray with a sphere
///
/// Returns the distance to the near intersection if it lies ahead of the
/// origin. A miss, or a sphere behind (or around) the origin, gives `None`.
pub fn ray_sphere_intersect(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let h = b * b - c;
    if h < 0.0 {
        return None;
    }
    let t = -b - h.sqrt();
    (t > 0.0).then_some(t)
}

/// Local surface normal ("up") at a position
#[inline]
pub fn surface_up(pos: Vec3) -> Vec3 {
    pos.normalize_or_zero()
}

/// Snap a position back onto the sphere of the given radius
#[inline]
pub fn project_to_surface(pos: Vec3, radius: f32) -> Vec3 {
    pos.normalize_or(Vec3::Y) * radius
}

/// Remove the component of `v` along `up`, leaving the tangent-plane part
#[inline]
pub fn tangent_component(v: Vec3, up: Vec3) -> Vec3 {
    v - up * v.dot(up)
}

/// Walk `pos` along the great circle in the direction of `delta`
///
/// `delta` is a tangent-plane displacement; its length is the arc length
/// travelled. The rotation axis is perpendicular to both `up` and `delta`.
pub fn move_along_surface(pos: Vec3, delta: Vec3, radius: f32) -> Vec3 {
    let up = surface_up(pos);
    let axis = up.cross(delta);
    if axis.length_squared() <= f32::EPSILON * f32::EPSILON {
        return project_to_surface(pos, radius);
    }
    let angle = delta.length() / radius;
    rotate_toward(pos, axis.normalize(), angle, radius)
}

/// Rotate `pos` about `axis` by `angle` and keep it on the sphere
#[inline]
pub fn rotate_toward(pos: Vec3, axis: Vec3, angle: f32, radius: f32) -> Vec3 {
    project_to_surface(Quat::from_axis_angle(axis, angle) * pos, radius)
}

/// Orientation that stands an object upright on the surface and turns it by
/// `yaw` about the local normal
///
/// The object's local +Y maps onto `up`; its local -Z is "forward".
#[inline]
pub fn upright_with_yaw(up: Vec3, yaw: f32) -> Quat {
    Quat::from_rotation_arc(Vec3::Y, up) * Quat::from_rotation_y(yaw)
}

/// Yaw for `upright_with_yaw(up, yaw)` whose forward points along `target`
///
/// `target` is projected onto the tangent plane first. A target parallel to
/// `up` gives 0.
pub fn yaw_toward(up: Vec3, target: Vec3) -> f32 {
    let base = upright_with_yaw(up, 0.0) * Vec3::NEG_Z;
    let dir = tangent_component(target, up).normalize_or(base);
    up.dot(base.cross(dir)).atan2(base.dot(dir))
}

/// Orientation that stands an object upright and faces it along `forward`
///
/// `forward` should be tangent to the surface. A degenerate `forward` falls
/// back to a plain upright orientation.
pub fn upright_facing(up: Vec3, forward: Vec3) -> Quat {
    let forward = tangent_component(forward, up).normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::from_rotation_arc(Vec3::Y, up);
    }
    let right = forward.cross(up);
    Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize()
}

/// Uniformly distributed point on a sphere
pub fn random_surface_point(rng: &mut impl Rng, radius: f32) -> Vec3 {
    let azimuth = rng.random::<f32>() * std::f32::consts::TAU;
    let polar = (rng.random::<f32>() * 2.0 - 1.0).clamp(-1.0, 1.0).acos();
    spherical_to_cartesian(radius, polar, azimuth)
}

/// Random point in a band around the equator
pub fn random_equator_point(rng: &mut impl Rng, radius: f32, jitter: f32) -> Vec3 {
    let azimuth = rng.random::<f32>() * std::f32::consts::TAU;
    let polar = std::f32::consts::FRAC_PI_2 + (rng.random::<f32>() * 2.0 - 1.0) * jitter;
    spherical_to_cartesian(radius, polar, azimuth)
}
