//! One captured frame: depth, labels and the camera that observed them.
use crate::camera::{CameraIntrinsics, CameraPose, ImageSize};
use crate::error::{EstimationError, Result};
use crate::image::{DepthMap, ImageView, LabelMap};

/// Read-only inputs of an estimation request. Intrinsics must already be
/// expressed at the resolution of the depth/label maps (see
/// [`CameraIntrinsics::rescaled`]).
#[derive(Clone, Debug)]
pub struct CaptureContext {
    depth: DepthMap,
    labels: LabelMap,
    pose: CameraPose,
    intrinsics: CameraIntrinsics,
}

impl CaptureContext {
    pub fn new(
        depth: DepthMap,
        labels: LabelMap,
        pose: CameraPose,
        intrinsics: CameraIntrinsics,
    ) -> Result<Self> {
        if depth.size() != labels.size() {
            return Err(EstimationError::DimensionMismatch {
                depth: (depth.width(), depth.height()),
                labels: (labels.width(), labels.height()),
            });
        }
        Ok(Self {
            depth,
            labels,
            pose,
            intrinsics,
        })
    }

    pub fn depth(&self) -> &DepthMap {
        &self.depth
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }

    pub fn image_size(&self) -> ImageSize {
        self.depth.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Matrix4;

    #[test]
    fn mismatched_maps_are_rejected() {
        let pose = CameraPose::new(Matrix4::identity()).unwrap();
        let k = CameraIntrinsics::from_params(10.0, 10.0, 2.0, 2.0).unwrap();
        let err = CaptureContext::new(DepthMap::new(4, 4), LabelMap::new(4, 3, 0), pose, k)
            .unwrap_err();
        assert_eq!(
            err,
            EstimationError::DimensionMismatch {
                depth: (4, 4),
                labels: (4, 3)
            }
        );
    }
}
