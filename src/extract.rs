//! World point extraction for one semantic class.
//!
//! Every pixel whose label equals the target class and whose depth is a valid
//! measurement is back-projected through the inverse intrinsics and the
//! camera pose. Pixels failing either test are skipped silently; an empty
//! result is a legitimate outcome that later stages reject as insufficient
//! input.
//!
//! With the `parallel` feature rows are processed by Rayon into per-thread
//! buffers that are concatenated afterwards. The output order is therefore
//! unspecified, and no consumer may depend on it.
use crate::camera::{back_project_pixel, CameraIntrinsics, CameraPose};
use crate::capture::CaptureContext;
use crate::image::ImageView;
use crate::params::{DepthRange, ParallelOptions};
use crate::types::WorldPoint;
use log::debug;

/// Back-projects every pixel of `class` with a depth inside `range`.
pub fn extract_world_points(
    capture: &CaptureContext,
    class: u8,
    range: &DepthRange,
    parallel: ParallelOptions,
) -> Vec<WorldPoint> {
    let size = capture.image_size();
    if size.is_empty() {
        return Vec::new();
    }

    let points = if parallel.should_parallelize(size.width * size.height) {
        #[cfg(feature = "parallel")]
        {
            extract_parallel(capture, class, range)
        }
        #[cfg(not(feature = "parallel"))]
        {
            extract_sequential(capture, class, range)
        }
    } else {
        extract_sequential(capture, class, range)
    };

    debug!(
        "extract: class={} points={} of {}x{} pixels",
        class,
        points.len(),
        size.width,
        size.height
    );
    points
}

fn extract_sequential(capture: &CaptureContext, class: u8, range: &DepthRange) -> Vec<WorldPoint> {
    let mut out = Vec::new();
    for y in 0..capture.image_size().height {
        extract_row(capture, y, class, range, &mut out);
    }
    out
}

#[cfg(feature = "parallel")]
fn extract_parallel(capture: &CaptureContext, class: u8, range: &DepthRange) -> Vec<WorldPoint> {
    use rayon::prelude::*;

    (0..capture.image_size().height)
        .into_par_iter()
        .fold(Vec::new, |mut acc, y| {
            extract_row(capture, y, class, range, &mut acc);
            acc
        })
        .reduce(Vec::new, |mut a, mut b| {
            if a.len() < b.len() {
                std::mem::swap(&mut a, &mut b);
            }
            a.extend(b);
            a
        })
}

#[inline]
fn extract_row(
    capture: &CaptureContext,
    y: usize,
    class: u8,
    range: &DepthRange,
    out: &mut Vec<WorldPoint>,
) {
    let labels = capture.labels().row(y);
    let depths = capture.depth().row(y);
    let pose: &CameraPose = capture.pose();
    let k: &CameraIntrinsics = capture.intrinsics();
    for (x, (&label, &depth)) in labels.iter().zip(depths).enumerate() {
        if label != class || !range.contains(depth) {
            continue;
        }
        out.push(back_project_pixel(x as f32, y as f32, depth, pose, k));
    }
}
