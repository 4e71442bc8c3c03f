//! Vector and matrix math for the transform pipeline

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Vectors shorter than this are left untouched by `normalize`
const NORMALIZE_EPSILON: f32 = 0.001;

/// 2D Vector (for texture coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction. Near-zero vectors are returned
    /// unchanged rather than divided into NaN territory.
    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l < NORMALIZE_EPSILON {
            return self;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

/// Homogeneous 4D vector (clip-space coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Promote a point to homogeneous coordinates (w = 1)
    pub fn from_point(p: Vec3) -> Self {
        Self { x: p.x, y: p.y, z: p.z, w: 1.0 }
    }

    pub fn truncate(self) -> Vec3 {
        Vec3 { x: self.x, y: self.y, z: self.z }
    }
}

/// 4x4 transform matrix.
///
/// Storage is column-major: element (row, col) lives at `m[col * 4 + row]`.
/// Vectors transform as columns, so a composed transform reads
/// `projection * view * model`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Right-handed perspective projection.
    ///
    /// View space looks down -z; clip-space w comes out as `-z_view`, so
    /// points in front of the camera end up with positive w. `fov_y_degrees`
    /// must be in (0, 180) and `0 < near < far`; anything else is on the
    /// caller.
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let t = (fov_y_degrees.to_radians() / 2.0).tan();
        let d = near - far;

        let mut m = [0.0; 16];
        m[0] = 1.0 / (aspect * t);
        m[5] = 1.0 / t;
        m[10] = (far + near) / d;
        m[11] = -1.0;
        m[14] = 2.0 * far * near / d;
        Mat4 { m }
    }

    /// Right-handed view matrix.
    ///
    /// `forward = normalize(target - eye)`, `side = normalize(forward x up)`,
    /// and the vertical axis is recomputed as `side x forward` so the basis
    /// stays orthonormal even for a sloppy `up`.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - eye).normalize();
        let side = forward.cross(up).normalize();
        let upward = side.cross(forward);

        let mut m = [0.0; 16];
        m[0] = side.x;
        m[4] = side.y;
        m[8] = side.z;
        m[12] = -side.dot(eye);

        m[1] = upward.x;
        m[5] = upward.y;
        m[9] = upward.z;
        m[13] = -upward.dot(eye);

        m[2] = -forward.x;
        m[6] = -forward.y;
        m[10] = -forward.z;
        m[14] = forward.dot(eye);

        m[15] = 1.0;
        Mat4 { m }
    }

    /// Apply the transform to a column vector
    pub fn transform(&self, v: Vec4) -> Vec4 {
        let m = &self.m;
        Vec4 {
            x: m[0] * v.x + m[4] * v.y + m[8] * v.z + m[12] * v.w,
            y: m[1] * v.x + m[5] * v.y + m[9] * v.z + m[13] * v.w,
            z: m[2] * v.x + m[6] * v.y + m[10] * v.z + m[14] * v.w,
            w: m[3] * v.x + m[7] * v.y + m[11] * v.z + m[15] * v.w,
        }
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut m = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                let mut acc = 0.0;
                for k in 0..4 {
                    acc += self.m[k * 4 + row] * rhs.m[col * 4 + k];
                }
                m[col * 4 + row] = acc;
            }
        }
        Mat4 { m }
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Vec4 {
        self.transform(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < 0.001);
    }

    #[test]
    fn test_vec3_cross() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!((c.z - 1.0).abs() < 0.001);
        assert!(c.x.abs() < 0.001 && c.y.abs() < 0.001);
    }

    #[test]
    fn test_normalize_unit_length() {
        let v = Vec3::new(3.0, 4.0, 0.0).normalize();
        assert!((v.len() - 1.0).abs() < 0.001);
        assert!((v.x - 0.6).abs() < 0.001);
    }

    #[test]
    fn test_normalize_degenerate_unchanged() {
        let v = Vec3::new(0.0002, -0.0003, 0.0001);
        let n = v.normalize();
        assert!((n.x - v.x).abs() < 1e-7);
        assert!((n.y - v.y).abs() < 1e-7);
        assert!((n.z - v.z).abs() < 1e-7);
        assert!(n.x.is_finite() && n.y.is_finite() && n.z.is_finite());
    }

    #[test]
    fn test_identity_transform() {
        let v = Vec4::new(1.5, -2.0, 3.25, 1.0);
        let out = Mat4::identity().transform(v);
        assert!((out.x - v.x).abs() < 0.001);
        assert!((out.y - v.y).abs() < 0.001);
        assert!((out.z - v.z).abs() < 0.001);
        assert!((out.w - v.w).abs() < 0.001);
    }

    #[test]
    fn test_look_at_faces_negative_z() {
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, Vec3::UP);
        let origin = view.transform(Vec4::from_point(Vec3::ZERO));
        assert!(origin.x.abs() < 0.001);
        assert!(origin.y.abs() < 0.001);
        assert!((origin.z + 6.0).abs() < 0.001);
        assert!((origin.w - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_look_at_sloppy_up_stays_orthonormal() {
        let view = Mat4::look_at(
            Vec3::new(1.0, 2.0, 5.0),
            Vec3::ZERO,
            Vec3::new(0.3, 1.0, 0.1),
        );
        let side = Vec3::new(view.m[0], view.m[4], view.m[8]);
        let up = Vec3::new(view.m[1], view.m[5], view.m[9]);
        let fwd = Vec3::new(view.m[2], view.m[6], view.m[10]);
        assert!(side.dot(up).abs() < 0.001);
        assert!(side.dot(fwd).abs() < 0.001);
        assert!(up.dot(fwd).abs() < 0.001);
        assert!((side.len() - 1.0).abs() < 0.001);
        assert!((up.len() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_matrix_composition_matches_sequential() {
        let proj = Mat4::perspective(60.0, 1.5, 0.5, 50.0);
        let view = Mat4::look_at(Vec3::new(2.0, 1.0, 4.0), Vec3::ZERO, Vec3::UP);
        let v = Vec4::from_point(Vec3::new(0.3, -0.7, 1.2));

        let composed = (proj * view).transform(v);
        let sequential = proj.transform(view.transform(v));

        assert!((composed.x - sequential.x).abs() < 0.0001);
        assert!((composed.y - sequential.y).abs() < 0.0001);
        assert!((composed.z - sequential.z).abs() < 0.0001);
        assert!((composed.w - sequential.w).abs() < 0.0001);
    }

    #[test]
    fn test_perspective_maps_depth_range() {
        // A point on the near plane lands at ndc z = -1, far plane at +1.
        let proj = Mat4::perspective(90.0, 1.0, 1.0, 100.0);
        let near = proj.transform(Vec4::from_point(Vec3::new(0.0, 0.0, -1.0)));
        let far = proj.transform(Vec4::from_point(Vec3::new(0.0, 0.0, -100.0)));
        assert!((near.z / near.w + 1.0).abs() < 0.001);
        assert!((far.z / far.w - 1.0).abs() < 0.001);
        assert!(near.w > 0.0 && far.w > 0.0);
    }
}
