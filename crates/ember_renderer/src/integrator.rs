//! Unidirectional path tracing with a fixed bounce count.
//!
//! Each bounce scatters to a blend of a diffuse direction and the mirror
//! direction, weighted by the material's `specular`. Light only arrives
//! through emissive surfaces and the sky; there are no shadow rays.

use crate::shading::{background, emitted, texture_color};
use crate::Hittable;
use ember_core::Color;
use ember_math::sampling::random_unit_vector;
use ember_math::{lerp, reflect, Ray};
use rand::RngCore;

/// Radiance carried back along `ray`.
///
/// Runs `max_depth + 1` bounces at most; a path that is still inside the
/// scene after the last bounce contributes nothing more.
pub fn trace(ray: &Ray, world: &dyn Hittable, max_depth: u32, rng: &mut dyn RngCore) -> Color {
    let mut ray = *ray;
    let mut incoming = Color::ZERO;
    let mut throughput = Color::ONE;

    for _ in 0..=max_depth {
        let Some(hit) = world.intersect(&ray) else {
            incoming += throughput * background(ray.direction);
            break;
        };

        let material = hit.material;
        let diffuse_dir = hit.normal + random_unit_vector(rng);
        let specular_dir = reflect(ray.direction, hit.normal);

        // Not renormalized: the blend is only used as a direction
        ray = Ray::new(hit.p, lerp(diffuse_dir, specular_dir, material.specular));

        incoming += throughput * emitted(material);
        throughput *= texture_color(hit.uv, material);
    }

    incoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HitRecord, Sphere};
    use ember_core::Material;
    use ember_math::{Aabb, Interval, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts the intersection queries made against the wrapped object.
    struct Counting<H> {
        inner: H,
        queries: AtomicUsize,
    }

    impl<H: Hittable> Hittable for Counting<H> {
        fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
            self.queries.fetch_add(1, Ordering::Relaxed);
            self.inner.hit(ray, ray_t, rec)
        }

        fn bounding_box(&self) -> Aabb {
            self.inner.bounding_box()
        }
    }

    fn light_sphere() -> Sphere {
        Sphere::new(
            Vec3::new(0.0, 0.0, -5.0),
            1.0,
            Arc::new(Material::emissive(Color::ONE, 2.0)),
        )
    }

    #[test]
    fn test_miss_returns_background() {
        let world = crate::HittableList::new();
        let mut rng = StdRng::seed_from_u64(0);

        let up = trace(&Ray::new(Vec3::ZERO, Vec3::Y), &world, 5, &mut rng);
        let down = trace(&Ray::new(Vec3::ZERO, Vec3::NEG_Y), &world, 5, &mut rng);

        assert_eq!(up, Color::new(0.5, 0.7, 1.0));
        assert_eq!(down, Color::ONE);
    }

    #[test]
    fn test_depth_zero_makes_one_query() {
        let world = Counting {
            inner: light_sphere(),
            queries: AtomicUsize::new(0),
        };
        let mut rng = StdRng::seed_from_u64(0);

        let color = trace(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &world, 0, &mut rng);

        assert_eq!(world.queries.load(Ordering::Relaxed), 1);
        assert_eq!(color, Color::splat(2.0));
    }

    /// Reports a hit one unit along every ray.
    struct Everywhere(Material);

    impl Hittable for Everywhere {
        fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
            if !ray_t.surrounds(1.0) {
                return false;
            }
            rec.t = 1.0;
            rec.p = ray.at(1.0);
            rec.normal = -ray.direction.normalize_or_zero();
            rec.material = &self.0;
            true
        }

        fn bounding_box(&self) -> Aabb {
            Aabb::EMPTY
        }
    }

    #[test]
    fn test_bounce_count_is_bounded() {
        let world = Counting {
            inner: Everywhere(Material::diffuse(Color::splat(0.5))),
            queries: AtomicUsize::new(0),
        };
        let mut rng = StdRng::seed_from_u64(7);

        let color = trace(&Ray::new(Vec3::ZERO, Vec3::X), &world, 4, &mut rng);

        assert_eq!(world.queries.load(Ordering::Relaxed), 5);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_black_absorber_stops_light() {
        // Black albedo zeroes throughput, so the sky behind the bounce is lost
        let world = Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Arc::new(Material::diffuse(Color::ZERO)),
        );
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..20 {
            let c = trace(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &world, 3, &mut rng);
            assert_eq!(c, Color::ZERO);
        }
    }

    #[test]
    fn test_mirror_reflects_sky() {
        // A perfect white mirror facing the camera sends the ray straight back
        let world = Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Arc::new(Material::diffuse(Color::ONE).with_specular(1.0)),
        );
        let mut rng = StdRng::seed_from_u64(5);

        let c = trace(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &world, 3, &mut rng);
        let expected = background(Vec3::Z);

        assert!((c - expected).length() < 1e-4);
    }
}
