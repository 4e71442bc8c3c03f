//! Renderer facade and the triangle pipeline.
//!
//! A triangle goes through: MVP transform, whole-triangle frustum
//! accept/reject, perspective divide, viewport mapping, barycentric scan
//! conversion, depth test, fragment write. There is no polygon splitting
//! against the clip planes; a triangle straddling the view volume may show
//! artifacts near the boundary, which is accepted behavior.

use log::warn;

use crate::framebuffer::{Framebuffer, FramebufferError, Pixel};
use crate::math::{Mat4, Vec2, Vec4};
use crate::types::{Color, Fragment, RenderMode, Texture, Vertex};

/// Screen coordinates are clamped to this range before integer
/// rasterization; geometry projected further out degenerates with the same
/// coarse-clip approximation as straddling triangles.
const COORD_LIMIT: f32 = i16::MAX as f32;

/// Owns the framebuffer and the per-draw state: MVP matrix, fill mode, and
/// texture binding. Submissions are synchronous; a triangle is fully
/// rasterized before the call returns.
pub struct Renderer {
    fb: Framebuffer,
    mvp: Mat4,
    mode: RenderMode,
    texture: Option<Texture>,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Result<Self, FramebufferError> {
        Ok(Self {
            fb: Framebuffer::new(width, height)?,
            mvp: Mat4::IDENTITY,
            mode: RenderMode::COLOR,
            texture: None,
        })
    }

    /// Set the composed model-view-projection matrix for subsequent draws
    pub fn set_mvp(&mut self, mvp: Mat4) {
        self.mvp = mvp;
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        if mode.contains(RenderMode::TEXTURE) && self.texture.is_none() {
            warn!("texture mode selected with no bound texture; sampling opaque black");
        }
        self.mode = mode;
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn bind_texture(&mut self, texture: Texture) {
        self.texture = Some(texture);
    }

    pub fn unbind_texture(&mut self) -> Option<Texture> {
        self.texture.take()
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    pub fn clear(&mut self) {
        self.fb.clear();
    }

    /// Rasterize one triangle through the current state.
    ///
    /// The triangle is skipped whole unless at least one vertex lands inside
    /// the view volume, and skipped as well if any vertex ends up with
    /// non-positive w (the divide is undefined there). Degenerate or
    /// clockwise-wound triangles write nothing.
    pub fn draw_triangle(&mut self, verts: &[Vertex; 3]) {
        let clip = [
            self.mvp.transform(Vec4::from_point(verts[0].pos)),
            self.mvp.transform(Vec4::from_point(verts[1].pos)),
            self.mvp.transform(Vec4::from_point(verts[2].pos)),
        ];

        if !clip.iter().any(|c| clip_inside(*c)) {
            return;
        }
        if clip.iter().any(|c| c.w <= 0.0) {
            return;
        }

        let a = self.to_fragment(clip[0], &verts[0]);
        let b = self.to_fragment(clip[1], &verts[1]);
        let c = self.to_fragment(clip[2], &verts[2]);
        self.raster_triangle(a, b, c);
    }

    /// Rasterize a vertex slice as consecutive triangles.
    ///
    /// Trailing vertices that do not fill a triangle are ignored.
    pub fn draw_triangles(&mut self, verts: &[Vertex]) {
        for tri in verts.chunks_exact(3) {
            self.draw_triangle(&[tri[0], tri[1], tri[2]]);
        }
    }

    /// Rasterize a depth-tested line segment between two vertices, with
    /// color and texture coordinates interpolated along its length. Same
    /// accept/reject policy as triangles.
    pub fn draw_line(&mut self, ends: &[Vertex; 2]) {
        let clip = [
            self.mvp.transform(Vec4::from_point(ends[0].pos)),
            self.mvp.transform(Vec4::from_point(ends[1].pos)),
        ];

        if !clip.iter().any(|c| clip_inside(*c)) {
            return;
        }
        if clip.iter().any(|c| c.w <= 0.0) {
            return;
        }

        let a = self.to_fragment(clip[0], &ends[0]);
        let b = self.to_fragment(clip[1], &ends[1]);
        self.raster_line(a, b);
    }

    /// Perspective divide plus viewport mapping.
    ///
    /// Normalized device x maps to [0, width] left to right; normalized
    /// device y maps to [0, height] with +y toward the bottom scanline.
    /// Depth maps from [-1, 1] to [0, 1] to match the far sentinel.
    fn to_fragment(&self, clip: Vec4, v: &Vertex) -> Fragment {
        let inv_w = 1.0 / clip.w;
        let ndc_x = clip.x * inv_w;
        let ndc_y = clip.y * inv_w;
        let ndc_z = clip.z * inv_w;

        let sx = self.fb.width() as f32 * (ndc_x + 1.0) / 2.0;
        let sy = self.fb.height() as f32 * (ndc_y + 1.0) / 2.0;

        Fragment {
            x: sx.clamp(-COORD_LIMIT, COORD_LIMIT) as i32,
            y: sy.clamp(-COORD_LIMIT, COORD_LIMIT) as i32,
            depth: (ndc_z + 1.0) / 2.0,
            color: v.color,
            uv: v.uv,
        }
    }

    /// Scan-convert a screen-space triangle.
    ///
    /// Walks the bounding box clipped to the framebuffer and covers pixels
    /// whose three edge functions are all non-negative. The same edge values
    /// divided by the doubled area give the barycentric weights, which
    /// interpolate depth, color, and uv linearly in screen space (affine,
    /// not perspective correct).
    fn raster_triangle(&mut self, a: Fragment, b: Fragment, c: Fragment) {
        let w = self.fb.width() as i32;
        let h = self.fb.height() as i32;

        let min_x = a.x.min(b.x).min(c.x).max(0);
        let min_y = a.y.min(b.y).min(c.y).max(0);
        let max_x = a.x.max(b.x).max(c.x).min(w - 1);
        let max_y = a.y.max(b.y).max(c.y).min(h - 1);

        // Doubled signed area. Zero is degenerate; negative means opposite
        // winding, where no pixel can pass the coverage test.
        let det = (a.x as i64 - c.x as i64) * (b.y as i64 - c.y as i64)
            - (b.x as i64 - c.x as i64) * (a.y as i64 - c.y as i64);
        if det <= 0 {
            return;
        }
        let inv_det = 1.0 / det as f32;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let w0 = orient(b.x, b.y, c.x, c.y, x, y);
                let w1 = orient(c.x, c.y, a.x, a.y, x, y);
                let w2 = orient(a.x, a.y, b.x, b.y, x, y);

                if w0 >= 0 && w1 >= 0 && w2 >= 0 {
                    let ba = w0 as f32 * inv_det;
                    let bb = w1 as f32 * inv_det;
                    let bc = w2 as f32 * inv_det;

                    let frag = Fragment {
                        x,
                        y,
                        depth: ba * a.depth + bb * b.depth + bc * c.depth,
                        color: a.color * ba + b.color * bb + c.color * bc,
                        uv: Vec2::new(
                            ba * a.uv.x + bb * b.uv.x + bc * c.uv.x,
                            ba * a.uv.y + bb * b.uv.y + bc * c.uv.y,
                        ),
                    };
                    self.emit_fragment(&frag);
                }
            }
        }
    }

    /// Bresenham line between two screen-space fragments, attributes
    /// interpolated by step fraction
    fn raster_line(&mut self, a: Fragment, b: Fragment) {
        let dx = (b.x - a.x).abs();
        let dy = (b.y - a.y).abs();
        let sx = if a.x < b.x { 1 } else { -1 };
        let sy = if a.y < b.y { 1 } else { -1 };
        let steps = dx.max(dy).max(1) as f32;

        let mut err = dx - dy;
        let mut x = a.x;
        let mut y = a.y;
        let mut step = 0.0f32;

        loop {
            let t = step / steps;
            let frag = Fragment {
                x,
                y,
                depth: lerp(a.depth, b.depth, t),
                color: a.color + (b.color - a.color) * t,
                uv: Vec2::new(lerp(a.uv.x, b.uv.x, t), lerp(a.uv.y, b.uv.y, t)),
            };
            self.emit_fragment(&frag);

            if x == b.x && y == b.y {
                break;
            }

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
            step += 1.0;
        }
    }

    /// Depth test and pixel write.
    ///
    /// Fragments outside the framebuffer or with depth outside [0, 1] are
    /// dropped. The depth test passes when the incoming fragment is at least
    /// as close as the stored pixel, so exact ties go to the last writer.
    /// Alpha keeps whatever the pixel already held.
    fn emit_fragment(&mut self, f: &Fragment) {
        if f.x < 0 || f.x >= self.fb.width() as i32 || f.y < 0 || f.y >= self.fb.height() as i32 {
            return;
        }
        if !(0.0..=1.0).contains(&f.depth) {
            return;
        }

        let (x, y) = (f.x as usize, f.y as usize);
        let prev = self.fb.get(x, y);
        if prev.depth < f.depth {
            return;
        }

        let color = if self.mode.contains(RenderMode::TEXTURE) {
            match &self.texture {
                Some(tex) => tex.sample(f.uv.x, f.uv.y),
                None => Color::BLACK,
            }
        } else {
            Color::from_unit(f.color.x, f.color.y, f.color.z)
        };

        self.fb.set(
            x,
            y,
            Pixel {
                r: color.r,
                g: color.g,
                b: color.b,
                a: prev.a,
                depth: f.depth,
            },
        );
    }
}

/// Standard frustum test against the homogeneous clip cube
fn clip_inside(c: Vec4) -> bool {
    c.w > 0.0
        && -c.w <= c.x
        && c.x <= c.w
        && -c.w <= c.y
        && c.y <= c.w
        && -c.w <= c.z
        && c.z <= c.w
}

/// Signed doubled area of the triangle (p0, p1, p)
fn orient(p0x: i32, p0y: i32, p1x: i32, p1y: i32, px: i32, py: i32) -> i64 {
    (p1x as i64 - p0x as i64) * (py as i64 - p0y as i64)
        - (p1y as i64 - p0y as i64) * (px as i64 - p0x as i64)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
