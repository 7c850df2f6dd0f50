//! The built-in demo scene: a small green mirror-ish ball on a huge ground
//! sphere, a white ball beside it and two distant spherical lights.

use ember_core::{
    Camera, Color, Material, RenderSettings, Scene, SceneResult, Sphere, Texture,
};
use ember_math::Vec3;
use std::sync::Arc;

/// Settings of the demo render: 320x240, 25 samples, up to 50 bounces.
pub fn demo_settings() -> RenderSettings {
    RenderSettings {
        max_depth: 50,
        ..RenderSettings::default()
    }
}

pub fn demo_scene(settings: RenderSettings, texture: Option<Arc<Texture>>) -> SceneResult<Scene> {
    let camera = Camera::new(
        60.0,
        Vec3::ZERO,
        Vec3::NEG_Z,
        Vec3::Y,
        settings.aspect_ratio(),
    );

    let textured = |albedo: Color| {
        let material = Material::diffuse(albedo);
        match &texture {
            Some(texture) => material.with_texture(texture.clone()),
            None => material,
        }
    };

    let green = Arc::new(Material::diffuse(Color::new(0.0, 1.0, 0.0)).with_specular(0.5));
    let ground = Arc::new(textured(Color::new(0.0, 1.0, 0.0)));
    let white = Arc::new(textured(Color::ONE));
    let light = Arc::new(Material::emissive(Color::ONE, 2.0));

    Scene::builder(camera, settings)
        .sphere(Sphere::new(0.5, Vec3::new(0.0, 0.0, -5.0), green))
        .sphere(Sphere::new(100.0, Vec3::new(0.0, -100.5, -5.0), ground))
        .sphere(Sphere::new(0.75, Vec3::new(-1.0, 0.25, -5.5), white))
        .sphere(Sphere::new(10.0, Vec3::new(7.5, 2.5, -25.0), light.clone()))
        .sphere(Sphere::new(20.0, Vec3::new(-7.5, 2.5, 25.0), light))
        .build()
}
