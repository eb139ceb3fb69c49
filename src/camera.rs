//! Pinhole camera model: pose, intrinsics and the pixel↔world mappings.
//!
//! Conventions
//! - World frame is gravity aligned: x east, y up, z south.
//! - Camera frame: x right, y up, the camera looks down −z.
//! - Pixel frame: origin top-left, u to the right, v downwards.
//! - Depth values are ranges measured along the pixel ray.
//! - Normalized image points have their origin at the bottom-left corner with
//!   y pointing up; [`ImageSize::normalized_to_pixel`] converts them.
use crate::error::{EstimationError, Result};
use crate::types::{WorldPoint, UP};
use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};
use serde::{Deserialize, Serialize};

const EPS: f32 = 1e-9;

/// Image dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: usize,
    pub height: usize,
}

impl ImageSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Converts a bottom-left-origin normalized point into pixel coordinates.
    #[inline]
    pub fn normalized_to_pixel(&self, p: [f32; 2]) -> [f32; 2] {
        [
            p[0] * self.width as f32,
            (1.0 - p[1]) * self.height as f32,
        ]
    }
}

/// 3×3 intrinsic matrix together with its inverse.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CameraIntrinsics {
    k: Matrix3<f32>,
    k_inv: Matrix3<f32>,
}

impl CameraIntrinsics {
    pub fn new(k: Matrix3<f32>) -> Result<Self> {
        let k_inv = k.try_inverse().ok_or(EstimationError::SingularIntrinsics)?;
        Ok(Self { k, k_inv })
    }

    pub fn from_params(fx: f32, fy: f32, cx: f32, cy: f32) -> Result<Self> {
        Self::new(Matrix3::new(fx, 0.0, cx, 0.0, fy, cy, 0.0, 0.0, 1.0))
    }

    pub fn matrix(&self) -> &Matrix3<f32> {
        &self.k
    }

    pub fn inverse(&self) -> &Matrix3<f32> {
        &self.k_inv
    }

    #[inline]
    pub fn fx(&self) -> f32 {
        self.k[(0, 0)]
    }
    #[inline]
    pub fn fy(&self) -> f32 {
        self.k[(1, 1)]
    }
    #[inline]
    pub fn cx(&self) -> f32 {
        self.k[(0, 2)]
    }
    #[inline]
    pub fn cy(&self) -> f32 {
        self.k[(1, 2)]
    }

    /// Adapts the intrinsics of an image of size `src` to a resampled image of
    /// size `dst` (e.g. camera frame → depth map resolution).
    pub fn rescaled(&self, src: ImageSize, dst: ImageSize) -> Result<Self> {
        if src.is_empty() || dst.is_empty() {
            return Ok(self.clone());
        }
        let sx = dst.width as f32 / src.width as f32;
        let sy = dst.height as f32 / src.height as f32;
        let scale = Matrix3::new(sx, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 1.0);
        Self::new(scale * self.k)
    }

    /// Back-projects pixel `(u, v)` at range `depth` into camera space.
    #[inline]
    pub fn back_project(&self, u: f32, v: f32, depth: f32) -> Vector3<f32> {
        let ray = self.k_inv * Vector3::new(u, v, 1.0);
        let dir = ray / ray.norm().max(EPS);
        let p = dir * depth;
        Vector3::new(p.x, -p.y, -p.z)
    }

    /// Projects a camera-space point to pixel coordinates. Points with
    /// `z >= 0` lie behind the camera and yield `None`.
    #[inline]
    pub fn project(&self, pc: &Vector3<f32>) -> Option<[f32; 2]> {
        if !(pc.z < 0.0) {
            return None;
        }
        let xn = pc.x / -pc.z;
        let yn = -pc.y / -pc.z;
        let u = self.fx() * xn + self.cx();
        let v = self.fy() * yn + self.cy();
        (u.is_finite() && v.is_finite()).then_some([u, v])
    }
}

/// Rigid world←camera transform together with its inverse.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CameraPose {
    transform: Matrix4<f32>,
    inverse: Matrix4<f32>,
}

impl CameraPose {
    pub fn new(transform: Matrix4<f32>) -> Result<Self> {
        let inverse = transform
            .try_inverse()
            .ok_or(EstimationError::SingularPose)?;
        Ok(Self { transform, inverse })
    }

    /// Builds a pose from a camera→world rotation and the camera position.
    pub fn from_parts(rotation: Matrix3<f32>, position: Vector3<f32>) -> Result<Self> {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation);
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&position);
        Self::new(m)
    }

    /// Places the camera at `eye` looking towards `target`, keeping the image
    /// upright with respect to gravity. When looking straight up or down the
    /// image top points north.
    pub fn look_at(eye: Vector3<f32>, target: Vector3<f32>) -> Result<Self> {
        let back = eye - target;
        let back_len = back.norm();
        if back_len <= EPS {
            return Err(EstimationError::SingularPose);
        }
        let z = back / back_len;
        let mut x = UP.cross(&z);
        if x.norm() <= 1e-6 {
            x = Vector3::new(0.0, 0.0, -1.0).cross(&z);
        }
        let x = x.normalize();
        let y = z.cross(&x);
        Self::from_parts(Matrix3::from_columns(&[x, y, z]), eye)
    }

    pub fn matrix(&self) -> &Matrix4<f32> {
        &self.transform
    }

    /// World→camera (view) matrix.
    pub fn view_matrix(&self) -> &Matrix4<f32> {
        &self.inverse
    }

    pub fn rotation(&self) -> Matrix3<f32> {
        self.transform.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Camera centre in world coordinates.
    pub fn position(&self) -> Vector3<f32> {
        self.transform.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Forward-looking direction in world space (negated third column).
    pub fn view_direction(&self) -> Vector3<f32> {
        let back: Vector3<f32> = self.transform.fixed_view::<3, 1>(0, 2).into_owned();
        -back / back.norm().max(EPS)
    }

    #[inline]
    pub fn camera_to_world(&self, pc: &Vector3<f32>) -> WorldPoint {
        let p = self.transform * Vector4::new(pc.x, pc.y, pc.z, 1.0);
        let w = if p.w.abs() > EPS { p.w } else { 1.0 };
        Vector3::new(p.x / w, p.y / w, p.z / w)
    }

    #[inline]
    pub fn world_to_camera(&self, pw: &WorldPoint) -> Vector3<f32> {
        let p = self.inverse * Vector4::new(pw.x, pw.y, pw.z, 1.0);
        Vector3::new(p.x, p.y, p.z)
    }
}

/// Back-projects pixel `(u, v)` with range `depth` into world space.
#[inline]
pub fn back_project_pixel(
    u: f32,
    v: f32,
    depth: f32,
    pose: &CameraPose,
    intrinsics: &CameraIntrinsics,
) -> WorldPoint {
    pose.camera_to_world(&intrinsics.back_project(u, v, depth))
}

/// Projects a world point into pixel coordinates. The result may lie outside
/// the image; points behind the camera are rejected.
pub fn project_world_to_pixel(
    pw: &WorldPoint,
    pose: &CameraPose,
    intrinsics: &CameraIntrinsics,
) -> Result<[f32; 2]> {
    intrinsics
        .project(&pose.world_to_camera(pw))
        .ok_or(EstimationError::PointBehindCamera)
}
