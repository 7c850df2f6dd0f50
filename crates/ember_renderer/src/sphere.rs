//! Sphere primitive for ray tracing.

use std::f32::consts::{PI, TAU};
use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use ember_core::Material;
use ember_math::{Aabb, Interval, Ray, Vec2, Vec3};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        let rvec = Vec3::splat(radius.abs());
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    /// UV of a world-space hit point.
    ///
    /// theta is `acos(y / radius)`, phi is `atan2(x, z)` wrapped into
    /// `[0, 2pi)`. Both use the point as given, not relative to the center,
    /// so spheres away from the origin map the texture from the world frame.
    fn sphere_uv(p: Vec3, radius: f32) -> Vec2 {
        let theta = (p.y / radius).clamp(-1.0, 1.0).acos();
        let mut phi = p.x.atan2(p.z);
        if phi < 0.0 {
            phi += TAU;
        }

        Vec2::new(phi / TAU, theta / PI)
    }
}

impl From<&ember_core::Sphere> for Sphere {
    fn from(sphere: &ember_core::Sphere) -> Self {
        Self::new(sphere.center, sphere.radius, sphere.material.clone())
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let oc = self.center - ray.origin;
        let a = ray.direction.dot(ray.direction);
        let b = -2.0 * ray.direction.dot(oc);
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return false;
        }

        // Only the near root counts; a ray starting inside the sphere sees
        // nothing of it
        let t = (-b - discriminant.sqrt()) / (2.0 * a);
        if !ray_t.surrounds(t) {
            return false;
        }

        rec.t = t;
        rec.p = ray.at(t);
        rec.normal = (rec.p - self.center).normalize_or_zero();
        rec.uv = Self::sphere_uv(rec.p, self.radius);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
