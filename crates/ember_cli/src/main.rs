//! `ember` - render a scene to an image file.

mod cli;
mod demo;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use demo::{demo_scene, demo_settings};
use ember_core::{RenderSettings, Scene, SceneDescription, Texture};
use ember_renderer::{RenderOptions, Renderer};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let scene = load_scene(&args)?;
    print_information(&scene);

    let options = RenderOptions {
        seed: args.seed,
        threads: args.threads,
        bucket_size: args.bucket_size,
        accelerator: args.accelerator.into(),
    };
    let renderer = Renderer::new(&scene, options).context("Failed to prepare renderer")?;

    let progress_bar = ProgressBar::new(0);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} buckets")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    log::info!("Starting path tracing");
    let start = Instant::now();
    let image = renderer.render_with(&AtomicBool::new(false), &|done, total| {
        progress_bar.set_length(total as u64);
        progress_bar.set_position(done as u64);
    })?;
    progress_bar.finish_and_clear();

    let seconds = start.elapsed().as_secs_f32();
    log::info!("Path tracing finished");
    log::info!("Time taken to render in seconds: {:.3} s", seconds);
    log::info!("Time taken to render in minutes: {:.3} min", seconds / 60.0);
    log::info!("Time taken to render in hours: {:.3} h", seconds / 3600.0);

    image
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}

/// Scene from `--scene`, or the demo scene, with command line overrides
/// applied to the render settings.
fn load_scene(args: &Args) -> Result<Scene> {
    match &args.scene {
        Some(path) => {
            let mut description = SceneDescription::from_path(path)
                .with_context(|| format!("Failed to read scene {}", path.display()))?;
            description.settings = apply_overrides(description.settings, args);

            let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
            let scene = description
                .build(base_dir)
                .with_context(|| format!("Failed to build scene {}", path.display()))?;
            log::info!("Loaded scene from {}", path.display());
            Ok(scene)
        }
        None => {
            let texture = match &args.texture {
                Some(path) => {
                    let texture = Texture::load(path)
                        .with_context(|| format!("Failed to load texture {}", path.display()))?;
                    Some(Arc::new(texture))
                }
                None => None,
            };
            let settings = apply_overrides(demo_settings(), args);
            let scene = demo_scene(settings, texture).context("Failed to build demo scene")?;
            log::info!("Using built-in demo scene");
            Ok(scene)
        }
    }
}

fn apply_overrides(mut settings: RenderSettings, args: &Args) -> RenderSettings {
    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(height) = args.height {
        settings.height = height;
    }
    if let Some(spp) = args.spp {
        settings.samples_per_pixel = spp;
    }
    if let Some(depth) = args.max_depth {
        settings.max_depth = depth;
    }
    settings
}

fn print_information(scene: &Scene) {
    let camera = scene.camera();
    let settings = scene.settings();

    log::info!(
        "Camera: vertical fov {:.3} (half {:.3}), aspect ratio {:.3}",
        camera.fov,
        camera.fov / 2.0,
        camera.aspect_ratio
    );
    log::info!(
        "Camera: position {}, target {}, up {}",
        camera.position,
        camera.target,
        camera.up
    );
    log::info!(
        "Scene: {}x{}, {} rays per pixel, max depth {}",
        settings.width,
        settings.height,
        settings.samples_per_pixel,
        settings.max_depth
    );
    log::info!(
        "Scene: {} spheres, {} models ({} triangles), ambient {}",
        scene.spheres().len(),
        scene.models().len(),
        scene.triangle_count(),
        scene.ambient()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_only_touch_given_fields() {
        let args = Args::parse_from(["ember", "--width", "10", "--max-depth", "1"]);
        let settings = apply_overrides(RenderSettings::default(), &args);

        assert_eq!(settings.width, 10);
        assert_eq!(settings.height, 240);
        assert_eq!(settings.samples_per_pixel, 25);
        assert_eq!(settings.max_depth, 1);
    }

    #[test]
    fn test_demo_scene_renders() {
        let args = Args::parse_from(["ember", "--width", "8", "--height", "6", "-s", "1"]);
        let scene = load_scene(&args).unwrap();
        let image = Renderer::new(&scene, RenderOptions::default())
            .unwrap()
            .render()
            .unwrap();

        assert_eq!((image.width(), image.height()), (8, 6));
        assert_eq!(scene.settings().max_depth, 50);
    }
}
