//! I/O helpers for capture maps and JSON.
//!
//! - `load_label_map`: read an 8-bit grayscale PNG of class ids.
//! - `load_depth_map_mm`: read a 16-bit grayscale PNG in millimetres.
//! - `save_label_map`: write a label map back to an 8-bit PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{DepthMap, ImageView, LabelMap};
use image::{GrayImage, ImageBuffer, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load a class-id map from an 8-bit image. Colour images are converted to
/// luma first, so only single-channel inputs round-trip exactly.
pub fn load_label_map(path: &Path) -> Result<LabelMap, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    LabelMap::from_vec(width, height, img.into_raw())
        .map_err(|e| format!("Invalid label map {}: {e}", path.display()))
}

/// Load a depth map stored as 16-bit millimetres; `0` stays "no measurement".
pub fn load_depth_map_mm(path: &Path) -> Result<DepthMap, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma16();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img
        .into_raw()
        .into_iter()
        .map(|mm| mm as f32 * 1e-3)
        .collect();
    DepthMap::from_vec(width, height, data)
        .map_err(|e| format!("Invalid depth map {}: {e}", path.display()))
}

/// Save a depth map as 16-bit millimetres, saturating at 65.535 m.
pub fn save_depth_map_mm(map: &DepthMap, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let data: Vec<u16> = map
        .data()
        .iter()
        .map(|&d| {
            if d.is_finite() {
                (d * 1e3).round().clamp(0.0, u16::MAX as f32) as u16
            } else {
                0
            }
        })
        .collect();
    let out: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_raw(map.width() as u32, map.height() as u32, data)
            .ok_or_else(|| "Failed to create depth buffer".to_string())?;
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a label map to an 8-bit grayscale PNG.
pub fn save_label_map(map: &LabelMap, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let out = GrayImage::from_raw(map.width() as u32, map.height() as u32, map.data().to_vec())
        .ok_or_else(|| "Failed to create label buffer".to_string())?;
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
