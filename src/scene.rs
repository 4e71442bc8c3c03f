//! Scene loading and saving.
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files: a
//! camera, a fill mode, an optional texture path, and a triangle list.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::math::{Mat4, Vec2, Vec3};
use crate::types::{RenderMode, Vertex};

/// Error type for scene loading
#[derive(Debug)]
pub enum SceneError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::ParseError(e)
    }
}

impl From<ron::Error> for SceneError {
    fn from(e: ron::Error) -> Self {
        SceneError::SerializeError(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::IoError(e) => write!(f, "IO error: {}", e),
            SceneError::ParseError(e) => write!(f, "Parse error: {}", e),
            SceneError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for SceneError {}

/// Camera description: where it sits, what it looks at, and the frustum
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at(self.eye, self.target, self.up)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(self.fov_y, aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}

/// A renderable scene: camera plus triangle soup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub camera: Camera,
    #[serde(default = "default_mode")]
    pub mode: RenderMode,
    #[serde(default)]
    pub texture: Option<PathBuf>,
    pub triangles: Vec<[Vertex; 3]>,
}

fn default_mode() -> RenderMode {
    RenderMode::COLOR
}

impl Scene {
    /// Built-in sample scene: one color-filled triangle in front of the
    /// camera, wound to render
    pub fn demo() -> Self {
        Self {
            camera: Camera {
                eye: Vec3::new(0.0, 0.0, 6.0),
                target: Vec3::ZERO,
                up: Vec3::UP,
                fov_y: 45.0,
                near: 0.1,
                far: 200.0,
            },
            mode: RenderMode::COLOR,
            texture: None,
            triangles: vec![[
                Vertex::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 0.0, 0.0), Vec2::new(0.0, 0.0)),
                Vertex::new(Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0), Vec2::new(1.0, 0.0)),
                Vertex::new(Vec3::new(0.0, 3.0, 1.0), Vec3::new(0.0, 0.0, 1.0), Vec2::new(0.5, 1.0)),
            ]],
        }
    }
}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneError> {
    let contents = fs::read_to_string(path)?;
    let scene: Scene = ron::from_str(&contents)?;
    log::info!("loaded scene with {} triangles", scene.triangles.len());
    Ok(scene)
}

/// Save a scene to a RON file
pub fn save_scene<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<(), SceneError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(scene, config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Load a scene from a RON string (for embedded scenes or testing)
pub fn load_scene_from_str(s: &str) -> Result<Scene, SceneError> {
    Ok(ron::from_str(s)?)
}
