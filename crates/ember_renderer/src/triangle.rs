//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.
//! Triangles are one-sided: a ray travelling along the geometric normal
//! (`e1 x e2`) passes through.

use std::sync::Arc;

use crate::hittable::{HitRecord, Hittable};
use ember_core::{Material, TriangleVertices};
use ember_math::{Aabb, Interval, Ray, Vec2, Vec3};

/// Determinant threshold below which the ray counts as parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A mesh triangle with per-vertex normals and UVs.
pub struct Triangle {
    vertices: [Vec3; 3],
    normals: [Vec3; 3],
    uvs: [Vec2; 3],
    edge1: Vec3,
    edge2: Vec3,
    /// Unnormalized geometric normal, `edge1 x edge2`
    face_normal: Vec3,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Triangle {
    pub fn new(
        vertices: [Vec3; 3],
        normals: [Vec3; 3],
        uvs: [Vec2; 3],
        material: Arc<Material>,
    ) -> Self {
        let edge1 = vertices[1] - vertices[0];
        let edge2 = vertices[2] - vertices[0];

        Self {
            vertices,
            normals,
            uvs,
            edge1,
            edge2,
            face_normal: edge1.cross(edge2),
            material,
            bbox: Aabb::from_triangle(vertices[0], vertices[1], vertices[2]),
        }
    }

    /// Flat-shaded triangle: every vertex normal is the face normal and
    /// every UV is zero.
    pub fn flat(vertices: [Vec3; 3], material: Arc<Material>) -> Self {
        let normal = (vertices[1] - vertices[0])
            .cross(vertices[2] - vertices[0])
            .normalize_or_zero();
        Self::new(vertices, [normal; 3], [Vec2::ZERO; 3], material)
    }

    pub fn from_mesh(tri: TriangleVertices, material: Arc<Material>) -> Self {
        Self::new(tri.positions, tri.normals, tri.uvs, material)
    }

    /// Barycentric weights of `p` for vertices (0, 1, 2), from projecting
    /// `p` onto the triangle's plane.
    fn barycentric(&self, p: Vec3) -> Option<[f32; 3]> {
        let v2 = p - self.vertices[0];

        let d00 = self.edge1.dot(self.edge1);
        let d01 = self.edge1.dot(self.edge2);
        let d11 = self.edge2.dot(self.edge2);
        let d20 = v2.dot(self.edge1);
        let d21 = v2.dot(self.edge2);

        let denom = d00 * d11 - d01 * d01;
        if denom == 0.0 {
            return None;
        }

        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        Some([1.0 - v - w, v, w])
    }
}

impl Hittable for Triangle {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let q = ray.direction.cross(self.edge2);
        let a = self.edge1.dot(q);

        if a.abs() < PARALLEL_EPSILON {
            return false;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.vertices[0];
        let u = f * s.dot(q);
        if u < 0.0 {
            return false;
        }

        let r = s.cross(self.edge1);
        let v = f * ray.direction.dot(r);
        if v < 0.0 || u + v > 1.0 {
            return false;
        }

        let t = f * self.edge2.dot(r);
        if !ray_t.contains_below_max(t) {
            return false;
        }

        // Back face
        if ray.direction.dot(self.face_normal) > 0.0 {
            return false;
        }

        let p = ray.at(t);
        let Some([bu, bv, bw]) = self.barycentric(p) else {
            return false;
        };

        let [na, nb, nc] = self.normals;
        let [ta, tb, tc] = self.uvs;

        rec.t = t;
        rec.p = p;
        rec.normal = (bu * na + bv * nb + bw * nc).normalize_or_zero();
        rec.uv = bu * ta + bv * tb + bw * tc;
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Triangle in the z = -2 plane facing +Z (toward the origin).
    fn facing_triangle() -> Triangle {
        Triangle::new(
            [
                Vec3::new(-1.0, -1.0, -2.0),
                Vec3::new(1.0, -1.0, -2.0),
                Vec3::new(0.0, 1.0, -2.0),
            ],
            [Vec3::Z, Vec3::Z, Vec3::Z],
            [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.5, 1.0)],
            Arc::new(Material::diffuse(Vec3::splat(0.5))),
        )
    }

    #[test]
    fn test_front_face_hits_centroid() {
        let tri = facing_triangle();
        let centroid = Vec3::new(0.0, -1.0 / 3.0, -2.0);
        let ray = Ray::new(Vec3::ZERO, centroid.normalize());

        let hit = tri.intersect(&ray).unwrap();
        assert!((hit.p - centroid).length() < 1e-5);
        assert!((hit.t - centroid.length()).abs() < 1e-5);
        assert!((hit.uv - Vec2::new(0.5, 1.0 / 3.0)).length() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-6);

        let bary = tri.barycentric(hit.p).unwrap();
        for w in bary {
            assert!((w - 1.0 / 3.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_back_face_is_culled() {
        let tri = facing_triangle();
        let centroid = Vec3::new(0.0, -1.0 / 3.0, -2.0);
        let behind = Vec3::new(0.0, 0.0, -4.0);

        let ray = Ray::new(behind, (centroid - behind).normalize());
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let tri = facing_triangle();
        let ray = Ray::new(Vec3::new(-5.0, 0.0, -2.0), Vec3::X);
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_outside_edges_misses() {
        let tri = facing_triangle();
        assert!(tri.intersect(&Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::NEG_Z)).is_none());
        assert!(tri.intersect(&Ray::new(Vec3::new(0.0, -2.0, 0.0), Vec3::NEG_Z)).is_none());
        assert!(tri.intersect(&Ray::new(Vec3::new(0.9, 0.9, 0.0), Vec3::NEG_Z)).is_none());
    }

    #[test]
    fn test_behind_origin_misses() {
        let tri = facing_triangle();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::NEG_Z);
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_interpolated_normal_is_unit() {
        let tri = Triangle::new(
            [
                Vec3::new(-1.0, -1.0, -2.0),
                Vec3::new(1.0, -1.0, -2.0),
                Vec3::new(0.0, 1.0, -2.0),
            ],
            [Vec3::X, Vec3::Y, Vec3::Z],
            [Vec2::ZERO; 3],
            Arc::new(Material::default()),
        );
        let hit = tri.intersect(&Ray::new(Vec3::ZERO, Vec3::new(0.0, -0.2, -1.0))).unwrap();
        assert!((hit.normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_flat_triangle_normal() {
        let tri = Triangle::flat(
            [
                Vec3::new(-1.0, -1.0, -2.0),
                Vec3::new(1.0, -1.0, -2.0),
                Vec3::new(0.0, 1.0, -2.0),
            ],
            Arc::new(Material::default()),
        );
        let hit = tri.intersect(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).unwrap();
        assert!((hit.normal - Vec3::Z).length() < 1e-6);
        assert!((hit.t - 2.0).abs() < 1e-6);
    }
}
