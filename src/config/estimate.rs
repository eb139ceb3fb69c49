use crate::camera::{CameraIntrinsics, CameraPose, ImageSize};
use crate::capture::CaptureContext;
use crate::feature::AccessibilityFeature;
use crate::image::io::{load_depth_map_mm, load_label_map};
use crate::image::ImageView;
use crate::pipeline::EstimatorParams;
use crate::types::GeoCoordinate;
use nalgebra::{Matrix3, Matrix4};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct EstimateToolConfig {
    /// 16-bit PNG, millimetres.
    pub depth_png: PathBuf,
    /// 8-bit PNG of class ids, same size as the depth map.
    pub label_png: PathBuf,
    pub camera: CameraConfig,
    pub feature: AccessibilityFeature,
    #[serde(default)]
    pub device_fix: Option<GeoCoordinate>,
    #[serde(default)]
    pub estimator: EstimatorParams,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CameraConfig {
    /// World←camera transform, column-major.
    pub pose: [f32; 16],
    /// Intrinsic matrix, column-major.
    pub intrinsics: [f32; 9],
    /// `[width, height]` of the image the intrinsics were calibrated for.
    /// When set, the intrinsics are rescaled to the depth map resolution.
    #[serde(default)]
    pub intrinsics_size: Option<[usize; 2]>,
}

impl CameraConfig {
    pub fn pose(&self) -> Result<CameraPose, String> {
        CameraPose::new(Matrix4::from_column_slice(&self.pose))
            .map_err(|e| format!("Invalid camera pose: {e}"))
    }

    pub fn intrinsics(&self, map_size: ImageSize) -> Result<CameraIntrinsics, String> {
        let k = CameraIntrinsics::new(Matrix3::from_column_slice(&self.intrinsics))
            .map_err(|e| format!("Invalid intrinsics: {e}"))?;
        match self.intrinsics_size {
            Some([w, h]) => k
                .rescaled(ImageSize::new(w, h), map_size)
                .map_err(|e| format!("Failed to rescale intrinsics: {e}")),
            None => Ok(k),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    pub json_out: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<EstimateToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

/// Loads both maps and builds the capture they describe.
pub fn load_capture(config: &EstimateToolConfig) -> Result<CaptureContext, String> {
    let depth = load_depth_map_mm(&config.depth_png)?;
    let labels = load_label_map(&config.label_png)?;
    let pose = config.camera.pose()?;
    let intrinsics = config.camera.intrinsics(depth.size())?;
    CaptureContext::new(depth, labels, pose, intrinsics).map_err(|e| e.to_string())
}
