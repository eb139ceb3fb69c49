use attribute_estimator::camera::{project_world_to_pixel, CameraIntrinsics, CameraPose};
use attribute_estimator::image::{DepthMap, LabelMap};
use attribute_estimator::CaptureContext;
use nalgebra::Vector3;

/// Infinite plane through `point` with unit `normal`.
#[derive(Clone, Copy, Debug)]
pub struct Surface {
    pub point: Vector3<f32>,
    pub normal: Vector3<f32>,
}

impl Surface {
    pub fn ground() -> Self {
        Self {
            point: Vector3::zeros(),
            normal: Vector3::new(0.0, 1.0, 0.0),
        }
    }

    /// Rises by `deg` towards north (−z).
    pub fn ramp(deg: f32) -> Self {
        let a = deg.to_radians();
        Self {
            point: Vector3::zeros(),
            normal: Vector3::new(0.0, a.cos(), a.sin()),
        }
    }

    /// Rises by `deg` towards east (+x).
    pub fn cross_tilted(deg: f32) -> Self {
        let a = deg.to_radians();
        Self {
            point: Vector3::zeros(),
            normal: Vector3::new(-a.sin(), a.cos(), 0.0),
        }
    }
}

/// Labelled band on the surface: `|lateral| < half_width` and
/// `near <= along <= far`, where `along` runs north rotated by `heading_deg`
/// towards east.
#[derive(Clone, Copy, Debug)]
pub struct Strip {
    pub half_width: f32,
    pub near: f32,
    pub far: f32,
    pub heading_deg: f32,
}

impl Strip {
    pub fn forward(&self) -> Vector3<f32> {
        let h = self.heading_deg.to_radians();
        Vector3::new(h.sin(), 0.0, -h.cos())
    }

    pub fn right(&self) -> Vector3<f32> {
        let h = self.heading_deg.to_radians();
        Vector3::new(h.cos(), 0.0, h.sin())
    }

    fn contains(&self, p: &Vector3<f32>) -> bool {
        let along = p.dot(&self.forward());
        let lateral = p.dot(&self.right());
        lateral.abs() < self.half_width && along >= self.near && along <= self.far
    }
}

#[derive(Clone, Debug)]
pub struct SyntheticScene {
    pub width: usize,
    pub height: usize,
    pub focal: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub surface: Surface,
    pub strip: Strip,
    pub class_label: u8,
    /// Rays longer than this produce no depth.
    pub max_range: f32,
}

impl Default for SyntheticScene {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            focal: 240.0,
            eye: Vector3::new(0.0, 1.5, 0.0),
            target: Vector3::new(0.0, 0.0, -4.0),
            surface: Surface::ground(),
            strip: Strip {
                half_width: 0.75,
                near: 1.5,
                far: 6.0,
                heading_deg: 0.0,
            },
            class_label: 2,
            max_range: 4.9,
        }
    }
}

impl SyntheticScene {
    pub fn pose(&self) -> CameraPose {
        CameraPose::look_at(self.eye, self.target).expect("valid look-at")
    }

    pub fn intrinsics(&self) -> CameraIntrinsics {
        CameraIntrinsics::from_params(
            self.focal,
            self.focal,
            0.5 * self.width as f32,
            0.5 * self.height as f32,
        )
        .expect("invertible intrinsics")
    }

    /// Ray-casts every pixel against the surface.
    pub fn render(&self) -> CaptureContext {
        let pose = self.pose();
        let k = self.intrinsics();
        let rot = pose.rotation();
        let mut depth = DepthMap::new(self.width, self.height);
        let mut labels = LabelMap::new(self.width, self.height, 0);
        let n = self.surface.normal;
        let offset = n.dot(&(self.surface.point - self.eye));
        for y in 0..self.height {
            for x in 0..self.width {
                let dir = rot * k.back_project(x as f32, y as f32, 1.0);
                let denom = n.dot(&dir);
                if denom.abs() < 1e-6 {
                    continue;
                }
                let t = offset / denom;
                if t <= 0.0 || t > self.max_range {
                    continue;
                }
                depth.set(x, y, t);
                let hit = self.eye + dir * t;
                if self.strip.contains(&hit) {
                    labels.set(x, y, self.class_label);
                }
            }
        }
        CaptureContext::new(depth, labels, pose, k).expect("matching map sizes")
    }

    /// Surface point at `along` metres down the strip and `lateral` metres to
    /// its right.
    pub fn strip_point(&self, along: f32, lateral: f32) -> Vector3<f32> {
        let p = self.strip.forward() * along + self.strip.right() * lateral;
        // Lift onto the surface along y.
        let n = self.surface.normal;
        let y = (n.dot(&self.surface.point) - n.x * p.x - n.z * p.z) / n.y;
        Vector3::new(p.x, y, p.z)
    }

    /// Normalized image point (origin bottom-left) of a world point.
    pub fn normalized(&self, world: &Vector3<f32>) -> [f32; 2] {
        let [u, v] = project_world_to_pixel(world, &self.pose(), &self.intrinsics())
            .expect("point in front of the camera");
        [u / self.width as f32, 1.0 - v / self.height as f32]
    }

    /// Bottom-left, top-left, top-right, bottom-right corners of the strip
    /// section between `near` and `far`.
    pub fn trapezoid(&self, near: f32, far: f32) -> [[f32; 2]; 4] {
        let w = self.strip.half_width;
        [
            self.normalized(&self.strip_point(near, -w)),
            self.normalized(&self.strip_point(far, -w)),
            self.normalized(&self.strip_point(far, w)),
            self.normalized(&self.strip_point(near, w)),
        ]
    }
}
