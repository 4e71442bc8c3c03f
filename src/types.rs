//! Core value types for the rasterizer

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::math::{Vec2, Vec3};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Quantize unit-range channels, clamping anything outside [0, 1]
    pub fn from_unit(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: (r.clamp(0.0, 1.0) * 255.0) as u8,
            g: (g.clamp(0.0, 1.0) * 255.0) as u8,
            b: (b.clamp(0.0, 1.0) * 255.0) as u8,
            a: 255,
        }
    }

}

/// A vertex with position, color, and texture coordinate.
///
/// Vertices are submitted in groups of three; the order defines the winding
/// (counter-clockwise in normalized device coordinates renders, clockwise is
/// rejected).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub pos: Vec3,
    pub color: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(pos: Vec3, color: Vec3, uv: Vec2) -> Self {
        Self { pos, color, uv }
    }

    pub fn from_pos(x: f32, y: f32, z: f32) -> Self {
        Self {
            pos: Vec3::new(x, y, z),
            color: Vec3::ONE,
            uv: Vec2::default(),
        }
    }
}

/// A pixel candidate produced during scan conversion.
///
/// Lives only while one primitive is being rasterized. Screen coordinates
/// are integer pixel centers; `depth` is the viewport-mapped value in [0, 1]
/// compared against the framebuffer during the depth test.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub x: i32,
    pub y: i32,
    pub depth: f32,
    pub color: Vec3,
    pub uv: Vec2,
}

bitflags! {
    /// Fill-mode selection for fragment shading.
    ///
    /// `COLOR` fills with interpolated vertex color, `TEXTURE` samples the
    /// bound texture. `LAMBERT` and `PHONG` are accepted as states but carry
    /// no lighting computation; they fall back to the vertex-color fill.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct RenderMode: u32 {
        const COLOR = 1 << 0;
        const TEXTURE = 1 << 1;
        const LAMBERT = 1 << 2;
        const PHONG = 1 << 3;
    }
}

/// Simple texture (array of colors)
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::WHITE; width * height],
            name: String::new(),
        }
    }

    /// Load a texture from an image file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, String> {
        use image::GenericImageView;

        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;

        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        log::info!("loaded texture {} ({}x{})", name, width, height);

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        })
    }

    /// Load a texture from raw encoded image bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self, String> {
        use image::GenericImageView;

        let img = image::load_from_memory(bytes)
            .map_err(|e| format!("Failed to decode image: {}", e))?;

        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        })
    }

    /// Create a checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels, name: "checkerboard".to_string() }
    }

    /// Sample at (u, v) with repeat wrapping and no filtering.
    ///
    /// Coordinates outside [0, 1) wrap via `u - floor(u)`, then map to the
    /// nearest texel. Texture alpha is carried through but ignored by the
    /// fragment-write stage.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        if self.pixels.is_empty() {
            return Color::BLACK;
        }
        let fu = u - u.floor();
        let fv = v - v.floor();
        let x = ((fu * self.width as f32) as usize) % self.width;
        let y = ((fv * self.height as f32) as usize) % self.height;
        self.pixels[y * self.width + x]
    }
}
