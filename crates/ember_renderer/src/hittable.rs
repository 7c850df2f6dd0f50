//! Hittable trait and HitRecord for ray-object intersection.

use ember_core::Material;
use ember_math::{Aabb, Interval, Ray, Vec2, Vec3};

/// Material referenced by a record that has not hit anything yet.
static NO_MATERIAL: Material = Material::BLACK;

/// Record of a ray-object intersection.
#[derive(Clone, Debug)]
pub struct HitRecord<'a> {
    /// Ray parameter of the hit; only ever decreases while a query runs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal (shading normal for meshes)
    pub normal: Vec3,
    /// Texture coordinates
    pub uv: Vec2,
    /// Material at the intersection point
    pub material: &'a Material,
}

impl Default for HitRecord<'_> {
    fn default() -> Self {
        Self {
            t: f32::INFINITY,
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            uv: Vec2::ZERO,
            material: &NO_MATERIAL,
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test the ray against this object within `ray_t`.
    ///
    /// Returns true and overwrites `rec` only for a hit strictly closer than
    /// `ray_t.max`, so callers narrow `ray_t.max` to `rec.t` as they go.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;

    /// Closest hit along the positive ray direction, if any.
    fn intersect(&self, ray: &Ray) -> Option<HitRecord<'_>> {
        let mut rec = HitRecord::default();
        if self.hit(ray, Interval::FORWARD, &mut rec) {
            Some(rec)
        } else {
            None
        }
    }
}

/// A flat list of hittables, tested one after another.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Hand the objects over, e.g. to build a BVH.
    pub fn into_objects(self) -> Vec<Box<dyn Hittable>> {
        self.objects
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Box<dyn Hittable>>> for HittableList {
    fn from(objects: Vec<Box<dyn Hittable>>) -> Self {
        let mut list = Self::new();
        for object in objects {
            list.add(object);
        }
        list
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if object.hit(ray, ray_t.with_max(closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sphere;
    use std::sync::Arc;

    fn sphere(z: f32, albedo: f32) -> Box<dyn Hittable> {
        Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, z),
            0.5,
            Arc::new(Material::diffuse(Vec3::splat(albedo))),
        ))
    }

    #[test]
    fn test_default_record_is_at_infinity() {
        let rec = HitRecord::default();
        assert_eq!(rec.t, f32::INFINITY);
    }

    #[test]
    fn test_list_keeps_closest() {
        let list = HittableList::from(vec![sphere(-10.0, 0.1), sphere(-3.0, 0.2), sphere(-6.0, 0.3)]);
        let hit = list.intersect(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).unwrap();

        assert!((hit.t - 2.5).abs() < 1e-5);
        assert_eq!(hit.material.albedo, Vec3::splat(0.2));
    }

    #[test]
    fn test_empty_list_misses() {
        let list = HittableList::new();
        assert!(list.is_empty());
        assert!(list.intersect(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).is_none());
    }
}
