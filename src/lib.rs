//! Depth-buffered software triangle rasterizer.
//!
//! Object-space triangles go in, shaded and depth-tested pixels come out of
//! an in-memory framebuffer:
//! - 4x4 homogeneous transforms (model/view/projection, right-handed)
//! - whole-triangle frustum accept/reject, no polygon splitting
//! - barycentric scan conversion with affine attribute interpolation
//! - flat color fill or nearest-neighbor texture sampling with repeat wrap
//!
//! The pipeline is single-threaded and synchronous: submitting a triangle
//! rasterizes it completely before returning. Image encoding and CLI
//! plumbing live outside the library; the framebuffer hands encoders its
//! scanlines through [`Framebuffer::rows`].

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod framebuffer;
mod math;
mod render;
mod scene;
mod types;

pub use framebuffer::*;
pub use math::*;
pub use render::*;
pub use scene::*;
pub use types::*;
