//! PCA plane fit.
//!
//! The covariance of the centred cloud is accumulated in `f64` and
//! decomposed with `SymmetricEigen`. Eigenpairs are consumed in ascending
//! order of eigenvalue: smallest → normal, largest → `first`, middle →
//! `second`. The normal is oriented to point up (non-negative y) and
//! `second` is flipped if needed so that `first × second = normal`.
use super::Plane;
use crate::angle::angle_between;
use crate::error::{EstimationError, Result};
use crate::types::{WorldPoint, UP};
use log::debug;
use nalgebra::{Matrix3, SymmetricEigen, Vector3};

pub const MIN_PLANE_POINTS: usize = 3;

const EIGEN_EPS: f64 = 1e-12;
const EIGEN_MAX_ITER: usize = 128;
/// Middle/largest eigenvalue ratio below which the cloud is a line or a point.
const COLLINEAR_RATIO: f64 = 1e-9;

pub fn fit_plane_pca(points: &[WorldPoint]) -> Result<Plane> {
    if points.len() < MIN_PLANE_POINTS {
        return Err(EstimationError::InsufficientPoints {
            found: points.len(),
            minimum: MIN_PLANE_POINTS,
        });
    }

    let n = points.len() as f64;
    let centroid = points
        .iter()
        .fold(Vector3::<f64>::zeros(), |acc, p| acc + p.cast::<f64>())
        / n;

    let mut cov = Matrix3::<f64>::zeros();
    for p in points {
        let c = p.cast::<f64>() - centroid;
        cov += c * c.transpose();
    }
    cov /= n;

    let eig = SymmetricEigen::try_new(cov, EIGEN_EPS, EIGEN_MAX_ITER)
        .ok_or(EstimationError::EigenDecompositionFailed)?;

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]));
    let [small, mid, large] = order;
    let lambdas = [
        eig.eigenvalues[small],
        eig.eigenvalues[mid],
        eig.eigenvalues[large],
    ];
    if lambdas.iter().any(|l| !l.is_finite()) {
        return Err(EstimationError::EigenDecompositionFailed);
    }
    if lambdas[2] <= 0.0 || lambdas[1] <= COLLINEAR_RATIO * lambdas[2] {
        return Err(EstimationError::DegeneratePointSet {
            eigenvalues: lambdas.map(|l| l as f32),
        });
    }

    let axis = |k: usize| -> Vector3<f32> {
        let v: Vector3<f64> = eig.eigenvectors.column(k).into_owned();
        v.normalize().cast::<f32>()
    };
    let mut normal = axis(small);
    let first = axis(large);
    let mut second = axis(mid);

    if normal.dot(&UP) < 0.0 {
        normal = -normal;
    }
    if first.cross(&second).dot(&normal) < 0.0 {
        second = -second;
    }

    let plane = Plane::from_axes(centroid.cast::<f32>(), normal, first, second);
    debug!(
        "plane fit: points={} normal=({:.3},{:.3},{:.3}) tilt={:.2}deg eigenvalues=[{:.2e},{:.2e},{:.2e}]",
        points.len(),
        normal.x,
        normal.y,
        normal.z,
        angle_between(&normal, &UP).to_degrees(),
        lambdas[0],
        lambdas[1],
        lambdas[2]
    );
    Ok(plane)
}
