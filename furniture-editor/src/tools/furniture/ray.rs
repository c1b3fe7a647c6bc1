use bevy::prelude::*;

use super::catalog::ProxyDescriptor;
use super::state::PlacedItem;

/// Horizontal plane items are dragged across.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorPlane {
    pub height: f32,
}

impl FloorPlane {
    pub const GROUND: Self = Self { height: 0.0 };

    /// World-space hit point, or `None` when the ray is parallel to the plane
    /// or points away from it.
    pub fn intersect(&self, ray: Ray3d) -> Option<Vec3> {
        let distance = ray.intersect_plane(Vec3::Y * self.height, InfinitePlane3d::new(Vec3::Y))?;
        Some(ray.get_point(distance))
    }
}

/// Distance along `ray` to the proxy of `item`, testing its shape in the item's local frame.
pub fn ray_hits_proxy(ray: Ray3d, item: &PlacedItem, descriptor: &ProxyDescriptor) -> Option<f32> {
    let centre = Vec3::new(item.position.x, descriptor.vertical_offset(), item.position.y);
    let to_local = Quat::from_rotation_y(-item.rotation_y);
    let origin = to_local * (ray.origin - centre);
    let direction = to_local * ray.direction.as_vec3();
    descriptor.geometry.ray_hit(origin, direction)
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = Vec3::new(
        if ray_direction.x != 0.0 { 1.0 / ray_direction.x } else { f32::INFINITY },
        if ray_direction.y != 0.0 { 1.0 / ray_direction.y } else { f32::INFINITY },
        if ray_direction.z != 0.0 { 1.0 / ray_direction.z } else { f32::INFINITY },
    );

    let (mut tmin, mut tmax) = ((min.x - ray_origin.x) * inv.x, (max.x - ray_origin.x) * inv.x);
    if tmin > tmax {
        std::mem::swap(&mut tmin, &mut tmax);
    }

    let (mut tymin, mut tymax) = ((min.y - ray_origin.y) * inv.y, (max.y - ray_origin.y) * inv.y);
    if tymin > tymax {
        std::mem::swap(&mut tymin, &mut tymax);
    }

    if tmin > tymax || tymin > tmax {
        return None;
    }
    tmin = tmin.max(tymin);
    tmax = tmax.min(tymax);

    let (mut tzmin, mut tzmax) = ((min.z - ray_origin.z) * inv.z, (max.z - ray_origin.z) * inv.z);
    if tzmin > tzmax {
        std::mem::swap(&mut tzmin, &mut tzmax);
    }

    if tmin > tzmax || tzmin > tmax {
        return None;
    }
    tmin = tmin.max(tzmin);
    tmax = tmax.min(tzmax);

    if tmax < 0.0 {
        return None;
    }
    Some(if tmin >= 0.0 { tmin } else { tmax })
}

// Ray against an upright cylinder centred on the origin: side wall first, then the two caps.
pub fn ray_cylinder_hit_t(
    ray_origin: Vec3,
    ray_direction: Vec3,
    radius: f32,
    half_height: f32,
) -> Option<f32> {
    let mut best: Option<f32> = None;
    let mut consider = |t: f32| {
        if t >= 0.0 && best.is_none_or(|b| t < b) {
            best = Some(t);
        }
    };

    let a = ray_direction.x * ray_direction.x + ray_direction.z * ray_direction.z;
    if a > f32::EPSILON {
        let b = 2.0 * (ray_origin.x * ray_direction.x + ray_origin.z * ray_direction.z);
        let c = ray_origin.x * ray_origin.x + ray_origin.z * ray_origin.z - radius * radius;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant >= 0.0 {
            let root = discriminant.sqrt();
            for t in [(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)] {
                let y = ray_origin.y + t * ray_direction.y;
                if y.abs() <= half_height {
                    consider(t);
                }
            }
        }
    }

    if ray_direction.y.abs() > f32::EPSILON {
        for cap in [-half_height, half_height] {
            let t = (cap - ray_origin.y) / ray_direction.y;
            let x = ray_origin.x + t * ray_direction.x;
            let z = ray_origin.z + t * ray_direction.z;
            if x * x + z * z <= radius * radius {
                consider(t);
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::furniture::catalog::{FurnitureCatalog, FurnitureType};

    fn ray(origin: Vec3, direction: Vec3) -> Ray3d {
        Ray3d::new(origin, Dir3::new(direction).unwrap())
    }

    #[test]
    fn floor_hit_and_parallel_miss() {
        let down = ray(Vec3::new(3.0, 10.0, -2.0), Vec3::new(0.0, -1.0, 0.0));
        let hit = FloorPlane::GROUND.intersect(down).unwrap();
        assert!((hit - Vec3::new(3.0, 0.0, -2.0)).length() < 1e-5);

        let level = ray(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert_eq!(FloorPlane::GROUND.intersect(level), None);

        let upward = ray(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(FloorPlane::GROUND.intersect(upward), None);
    }

    #[test]
    fn aabb_hit_distance_from_outside_and_inside() {
        let half = Vec3::splat(0.5);
        let t = ray_aabb_hit_t(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, -half, half).unwrap();
        assert!((t - 4.5).abs() < 1e-5);

        let inside = ray_aabb_hit_t(Vec3::ZERO, Vec3::X, -half, half).unwrap();
        assert!((inside - 0.5).abs() < 1e-5);

        assert_eq!(ray_aabb_hit_t(Vec3::new(2.0, 5.0, 0.0), Vec3::NEG_Y, -half, half), None);
    }

    #[test]
    fn cylinder_hits_cap_and_wall() {
        let cap = ray_cylinder_hit_t(Vec3::new(0.5, 3.0, 0.0), Vec3::NEG_Y, 1.0, 0.15).unwrap();
        assert!((cap - 2.85).abs() < 1e-5);

        let wall = ray_cylinder_hit_t(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 1.0, 0.15).unwrap();
        assert!((wall - 4.0).abs() < 1e-5);

        // Passes over the top.
        assert_eq!(ray_cylinder_hit_t(Vec3::new(-5.0, 0.5, 0.0), Vec3::X, 1.0, 0.15), None);
        // Outside the radius.
        assert_eq!(ray_cylinder_hit_t(Vec3::new(1.2, 3.0, 0.0), Vec3::NEG_Y, 1.0, 0.15), None);
    }

    #[test]
    fn rotated_chair_is_tested_in_local_space() {
        let catalog = FurnitureCatalog::default();
        let descriptor = catalog.descriptor(FurnitureType::Chair);
        let mut chair = PlacedItem::new(FurnitureType::Chair, 0.0, 0.0, 0.0);

        // x = 0.6 misses the axis-aligned cube but falls inside its corner once turned 45°.
        let downward = ray(Vec3::new(0.6, 5.0, 0.0), Vec3::NEG_Y);
        assert!(ray_hits_proxy(downward, &chair, descriptor).is_none());

        chair.rotation_y = std::f32::consts::FRAC_PI_4;
        let hit = ray_hits_proxy(downward, &chair, descriptor).unwrap();
        assert!((hit - 4.0).abs() < 1e-4);
    }
}
