//! Demo binary: render a scene file to a PNG image

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use pigment::{load_scene, Renderer, Scene, Texture};

/// Render a RON scene description to a PNG image
#[derive(Parser)]
#[command(version = pigment::VERSION)]
struct Args {
    /// Scene file (RON); renders a built-in sample scene when omitted
    scene: Option<PathBuf>,

    /// Output image path
    #[arg(long, default_value = "render.png")]
    out: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value_t = 800)]
    width: usize,

    /// Image height in pixels
    #[arg(long, default_value_t = 600)]
    height: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scene = match &args.scene {
        Some(path) => load_scene(path)
            .with_context(|| format!("loading scene {}", path.display()))?,
        None => Scene::demo(),
    };

    let mut renderer = Renderer::new(args.width, args.height)?;
    let aspect = args.width as f32 / args.height as f32;
    renderer.set_mvp(scene.camera.view_projection(aspect));

    if let Some(path) = &scene.texture {
        let texture = Texture::from_file(path).map_err(|e| anyhow!(e))?;
        renderer.bind_texture(texture);
    }
    renderer.set_mode(scene.mode);

    for tri in &scene.triangles {
        renderer.draw_triangle(tri);
    }
    info!(
        "rasterized {} triangles at {}x{}",
        scene.triangles.len(),
        args.width,
        args.height
    );

    let fb = renderer.framebuffer();
    let mut img = image::RgbImage::new(fb.width() as u32, fb.height() as u32);
    for (y, row) in fb.rows().enumerate() {
        for (x, px) in row.iter().enumerate() {
            img.put_pixel(x as u32, y as u32, image::Rgb([px.r, px.g, px.b]));
        }
    }
    img.save(&args.out)
        .with_context(|| format!("writing {}", args.out.display()))?;
    info!("wrote {}", args.out.display());

    Ok(())
}
