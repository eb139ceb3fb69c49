use super::cancel::CancellationToken;
use super::params::EstimatorParams;
use super::strategies::{
    run_chain, ChainOutcome, LocationStrategy, SlopeStrategy, Strategy, StrategyFailure,
    WidthStrategy,
};
use super::{LocationEstimate, PlaneAnalysis};
use crate::attributes::{cross_slope, estimate_width, running_slope, width_by_bin};
use crate::binning::bin_projected_points;
use crate::capture::CaptureContext;
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{
    AttributeOutcome, EstimationReport, InputDescriptor, LocationOutcome, PlaneStage,
    TimingBreakdown,
};
use crate::endpoints::resolve_endpoints;
use crate::error::{EstimationError, Result};
use crate::extract::extract_world_points;
use crate::feature::{AccessibilityFeature, AttributeKind};
use crate::localization::{
    delta_from_point, delta_from_world_point, location_from_delta, trapezoid_cross_slope,
    trapezoid_running_slope, trapezoid_width, PointWithDepth,
};
use crate::plane::{align_plane, fit_plane_pca, project_plane_to_image, project_points};
use crate::types::{GeoCoordinate, LocationDelta};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Instant;

/// Attribute and location estimator for features of one captured frame.
///
/// The capture is shared read-only, so one estimator (or several holding the
/// same `Arc`) can serve concurrent requests for different feature classes.
#[derive(Clone, Debug)]
pub struct AttributeEstimator {
    params: EstimatorParams,
    capture: Option<Arc<CaptureContext>>,
}

impl AttributeEstimator {
    pub fn new(params: EstimatorParams) -> Self {
        Self {
            params,
            capture: None,
        }
    }

    pub fn with_capture(params: EstimatorParams, capture: Arc<CaptureContext>) -> Self {
        Self {
            params,
            capture: Some(capture),
        }
    }

    /// Attach the frame every following request reads from.
    pub fn configure(&mut self, capture: Arc<CaptureContext>) {
        self.capture = Some(capture);
    }

    pub fn params(&self) -> &EstimatorParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut EstimatorParams {
        &mut self.params
    }

    pub fn capture(&self) -> Result<&Arc<CaptureContext>> {
        self.capture
            .as_ref()
            .ok_or(EstimationError::ConfigurationMissing("capture"))
    }

    /// Extraction → fit → align → project → bin for one class.
    pub fn analyze_plane(
        &self,
        class_label: u8,
        token: &CancellationToken,
    ) -> Result<PlaneAnalysis> {
        analyze(self.capture()?, &self.params, class_label, token)
    }

    /// Runs the attribute chains for every requested attribute and stores the
    /// values on `feature`. Attributes whose chain is exhausted are set to
    /// `None`; only cancellation and configuration errors fail the call.
    pub fn estimate_attributes(
        &self,
        feature: &mut AccessibilityFeature,
        token: &CancellationToken,
    ) -> Result<Vec<AttributeOutcome>> {
        let mut request = Request::new(self.capture()?, &self.params, feature.class_label, token);
        request.attributes(feature)
    }

    /// Runs the location chain for the feature's geometry against the device
    /// fix. On success the estimate is also stored on `feature`; when every
    /// strategy fails the last strategy's error is returned.
    pub fn estimate_location(
        &self,
        feature: &mut AccessibilityFeature,
        fix: GeoCoordinate,
        token: &CancellationToken,
    ) -> Result<LocationEstimate> {
        let mut request = Request::new(self.capture()?, &self.params, feature.class_label, token);
        let outcome = request.location(feature, fix)?;
        match outcome.value {
            Some((_, estimate)) => {
                feature.location = Some(estimate.clone());
                Ok(estimate)
            }
            None => Err(outcome
                .last_error
                .unwrap_or(EstimationError::ConfigurationMissing("strategy chain"))),
        }
    }

    /// Attributes plus (with a device fix) location, sharing one plane
    /// analysis, with a full report.
    pub fn estimate(
        &self,
        feature: &mut AccessibilityFeature,
        fix: Option<GeoCoordinate>,
        token: &CancellationToken,
    ) -> Result<EstimationReport> {
        let capture = self.capture()?;
        let total = Instant::now();
        let size = capture.image_size();
        debug!(
            "AttributeEstimator::estimate start w={} h={} class={} geometry={:?}",
            size.width, size.height, feature.class_label, feature.geometry
        );
        let mut request = Request::new(capture, &self.params, feature.class_label, token);

        let attr_start = Instant::now();
        let attributes = request.attributes(feature)?;
        let attributes_ms = elapsed_ms(attr_start);

        let mut location_ms = None;
        let location = match fix {
            Some(fix) => {
                let start = Instant::now();
                let outcome = request.location(feature, fix)?;
                location_ms = Some(elapsed_ms(start));
                let estimate = outcome.value.map(|(_, estimate)| estimate);
                if estimate.is_none() {
                    warn!(
                        "location of class {} unresolved after {} strategies",
                        feature.class_label,
                        outcome.failures.len()
                    );
                }
                feature.location = estimate.clone();
                Some(LocationOutcome {
                    estimate,
                    failures: outcome.failures,
                })
            }
            None => None,
        };

        let mut timings = TimingBreakdown::default();
        let (plane, plane_failure) = match request.plane.take() {
            Some(Ok(analysis)) => {
                timings.extend(&analysis.timings);
                let widths = width_by_bin(&analysis.bins, &self.params.width);
                (Some(PlaneStage::from_analysis(&analysis, widths)), None)
            }
            Some(Err(err)) => (None, Some(StrategyFailure::new("plane", &err))),
            None => (None, None),
        };
        timings.push("attributes", attributes_ms);
        if let Some(ms) = location_ms {
            timings.push("location", ms);
        }
        timings.total_ms = elapsed_ms(total);
        debug!("AttributeEstimator::estimate done total_ms={:.3}", timings.total_ms);

        Ok(EstimationReport {
            input: InputDescriptor {
                width: size.width,
                height: size.height,
                class_label: feature.class_label,
                geometry: feature.geometry,
            },
            timings,
            plane,
            plane_failure,
            attributes,
            location,
        })
    }
}

fn analyze(
    capture: &CaptureContext,
    params: &EstimatorParams,
    class_label: u8,
    token: &CancellationToken,
) -> Result<PlaneAnalysis> {
    let total = Instant::now();
    let mut timings = TimingBreakdown::default();

    token.check()?;
    let start = Instant::now();
    let points = extract_world_points(capture, class_label, &params.depth, params.parallel);
    timings.push_since("extract", start);

    token.check()?;
    let start = Instant::now();
    let fitted = fit_plane_pca(&points)?;
    timings.push_since("fit", start);

    token.check()?;
    let start = Instant::now();
    let aligned = align_plane(&fitted, capture.pose(), &params.alignment);
    timings.push_since("align", start);

    token.check()?;
    let start = Instant::now();
    let projected_points = project_points(&aligned.plane, &points);
    let projected = if params.project_plane {
        match project_plane_to_image(
            &aligned.plane,
            capture.pose(),
            capture.intrinsics(),
            capture.image_size(),
        ) {
            Ok(p) => Some(p),
            Err(err) => {
                debug!("plane overlay skipped: {err}");
                None
            }
        }
    } else {
        None
    };
    timings.push_since("project", start);

    token.check()?;
    let start = Instant::now();
    let bins = bin_projected_points(&projected_points, params.binning.bin_size, params.parallel)?;
    timings.push_since("bin", start);
    timings.total_ms = elapsed_ms(total);

    debug!(
        "plane analysis class={} points={} axis={:?} bins={} total_ms={:.3}",
        class_label,
        points.len(),
        aligned.choice,
        bins.bin_count,
        timings.total_ms
    );
    Ok(PlaneAnalysis {
        class_label,
        points_extracted: points.len(),
        fitted,
        aligned,
        bins,
        projected,
        timings,
    })
}

fn midpoint(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [0.5 * (a[0] + b[0]), 0.5 * (a[1] + b[1])]
}

/// State of one request. The plane stages run at most once, on first use.
struct Request<'a> {
    capture: &'a CaptureContext,
    params: &'a EstimatorParams,
    class_label: u8,
    token: &'a CancellationToken,
    plane: Option<Result<PlaneAnalysis>>,
}

impl<'a> Request<'a> {
    fn new(
        capture: &'a CaptureContext,
        params: &'a EstimatorParams,
        class_label: u8,
        token: &'a CancellationToken,
    ) -> Self {
        Self {
            capture,
            params,
            class_label,
            token,
            plane: None,
        }
    }

    fn plane(&mut self) -> Result<&PlaneAnalysis> {
        let (capture, params, class_label, token) =
            (self.capture, self.params, self.class_label, self.token);
        match self
            .plane
            .get_or_insert_with(|| analyze(capture, params, class_label, token))
        {
            Ok(analysis) => Ok(analysis),
            Err(err) => Err(err.clone()),
        }
    }

    fn attributes(&mut self, feature: &mut AccessibilityFeature) -> Result<Vec<AttributeOutcome>> {
        let requested = feature.requested.clone();
        let mut outcomes = Vec::with_capacity(requested.len());
        for kind in requested {
            let outcome = self.attribute(kind, feature)?;
            if outcome.value.is_none() {
                warn!(
                    "{:?} of class {} left unset after {} strategies",
                    kind,
                    feature.class_label,
                    outcome.failures.len()
                );
            }
            outcomes.push(outcome);
        }
        // Nothing is written back unless every chain ran to completion.
        for outcome in &outcomes {
            feature.attributes.set(outcome.attribute, outcome.value);
        }
        Ok(outcomes)
    }

    fn attribute(
        &mut self,
        kind: AttributeKind,
        feature: &AccessibilityFeature,
    ) -> Result<AttributeOutcome> {
        let (params, token) = (self.params, self.token);
        let chains = &params.attribute_chains;
        match kind {
            AttributeKind::Width => {
                let outcome = run_chain("width", &chains.width, token, |s| self.width(s, feature))?;
                Ok(attribute_outcome(kind, outcome))
            }
            AttributeKind::RunningSlope => {
                let outcome = run_chain("running slope", &chains.running_slope, token, |s| {
                    self.slope(s, feature, true)
                })?;
                Ok(attribute_outcome(kind, outcome))
            }
            AttributeKind::CrossSlope => {
                let outcome = run_chain("cross slope", &chains.cross_slope, token, |s| {
                    self.slope(s, feature, false)
                })?;
                Ok(attribute_outcome(kind, outcome))
            }
        }
    }

    fn width(&mut self, strategy: WidthStrategy, feature: &AccessibilityFeature) -> Result<f32> {
        let params = self.params;
        match strategy {
            WidthStrategy::PlaneBins => estimate_width(&self.plane()?.bins, &params.width),
            WidthStrategy::Trapezoid => {
                let corners = self.trapezoid_corners(feature)?;
                trapezoid_width(
                    &corners,
                    self.capture.image_size(),
                    self.capture.pose(),
                    self.capture.intrinsics(),
                )
            }
        }
    }

    fn slope(
        &mut self,
        strategy: SlopeStrategy,
        feature: &AccessibilityFeature,
        running: bool,
    ) -> Result<f32> {
        match strategy {
            SlopeStrategy::PlaneAxes => {
                let plane = &self.plane()?.aligned.plane;
                Ok(if running {
                    running_slope(plane)
                } else {
                    cross_slope(plane)
                })
            }
            SlopeStrategy::Trapezoid => {
                let corners = self.trapezoid_corners(feature)?;
                let (size, pose, k) = (
                    self.capture.image_size(),
                    self.capture.pose(),
                    self.capture.intrinsics(),
                );
                if running {
                    trapezoid_running_slope(&corners, size, pose, k)
                } else {
                    trapezoid_cross_slope(&corners, size, pose, k)
                }
            }
        }
    }

    fn trapezoid_corners(&self, feature: &AccessibilityFeature) -> Result<Vec<PointWithDepth>> {
        let corners = feature.trapezoid.ok_or(EstimationError::InvalidBounds {
            expected: 4,
            found: 0,
        })?;
        let depths = self.capture.depth().depths_at_normalized(
            &corners,
            self.params.point_radius_px,
            &self.params.depth,
        )?;
        Ok(corners
            .iter()
            .zip(depths)
            .map(|(&p, d)| PointWithDepth::new(p, d))
            .collect())
    }

    fn location(
        &mut self,
        feature: &AccessibilityFeature,
        fix: GeoCoordinate,
    ) -> Result<ChainOutcome<LocationStrategy, LocationEstimate>> {
        let (params, token) = (self.params, self.token);
        let chain = params.location_chains.for_geometry(feature.geometry);
        run_chain("location", chain, token, |s| self.locate(s, feature, fix))
    }

    fn locate(
        &mut self,
        strategy: LocationStrategy,
        feature: &AccessibilityFeature,
        fix: GeoCoordinate,
    ) -> Result<LocationEstimate> {
        let params = self.params;
        match strategy {
            LocationStrategy::Centroid => {
                let depth = self.capture.depth().mean_depth_around(
                    feature.centroid,
                    params.centroid_radius_px,
                    &params.depth,
                )?;
                self.from_image_points(strategy, &[feature.centroid], &[depth], fix)
            }
            LocationStrategy::Trapezoid => {
                let t = feature.trapezoid.ok_or(EstimationError::InvalidBounds {
                    expected: 4,
                    found: 0,
                })?;
                let points = [midpoint(t[1], t[2]), midpoint(t[0], t[3])];
                self.from_sampled_points(strategy, &points, fix)
            }
            LocationStrategy::PolygonExtremes => {
                let (left, right) = feature
                    .polygon_extremes()
                    .ok_or(EstimationError::EmptyPolygon)?;
                let points = [left, midpoint(left, right), right];
                self.from_sampled_points(strategy, &points, fix)
            }
            LocationStrategy::PlaneEndpoints => {
                let capture = self.capture;
                let pose = capture.pose();
                let analysis = self.plane()?;
                let ends = resolve_endpoints(
                    &analysis.bins,
                    &analysis.aligned.plane,
                    pose,
                    &params.endpoints,
                )?;
                let deltas: Vec<LocationDelta> = ends
                    .iter()
                    .map(|p| delta_from_world_point(p, pose))
                    .collect();
                let camera = pose.position();
                let depth = ends.iter().map(|p| (p - camera).norm()).sum::<f32>() / ends.len() as f32;
                build_estimate(strategy, &deltas, depth, fix)
            }
        }
    }

    fn from_sampled_points(
        &self,
        strategy: LocationStrategy,
        points: &[[f32; 2]],
        fix: GeoCoordinate,
    ) -> Result<LocationEstimate> {
        let depths = self.capture.depth().depths_at_normalized(
            points,
            self.params.point_radius_px,
            &self.params.depth,
        )?;
        self.from_image_points(strategy, points, &depths, fix)
    }

    fn from_image_points(
        &self,
        strategy: LocationStrategy,
        points: &[[f32; 2]],
        depths: &[f32],
        fix: GeoCoordinate,
    ) -> Result<LocationEstimate> {
        let (size, pose, k) = (
            self.capture.image_size(),
            self.capture.pose(),
            self.capture.intrinsics(),
        );
        let deltas: Vec<LocationDelta> = points
            .iter()
            .zip(depths)
            .map(|(&p, &d)| delta_from_point(p, d, size, pose, k))
            .collect();
        let depth = depths.iter().sum::<f32>() / depths.len().max(1) as f32;
        build_estimate(strategy, &deltas, depth, fix)
    }
}

fn attribute_outcome<S: Strategy>(
    kind: AttributeKind,
    outcome: ChainOutcome<S, f32>,
) -> AttributeOutcome {
    let (strategy, value) = match outcome.value {
        Some((s, v)) => (Some(s.label()), Some(v)),
        None => (None, None),
    };
    if let Some(label) = strategy {
        debug!("{:?} = {:.4} via {}", kind, value.unwrap_or(f32::NAN), label);
    }
    AttributeOutcome {
        attribute: kind,
        value,
        strategy,
        failures: outcome.failures,
    }
}

fn build_estimate(
    strategy: LocationStrategy,
    deltas: &[LocationDelta],
    depth: f32,
    fix: GeoCoordinate,
) -> Result<LocationEstimate> {
    let delta = LocationDelta::mean(deltas).ok_or(EstimationError::InsufficientPoints {
        found: 0,
        minimum: 1,
    })?;
    let coordinates = deltas.iter().map(|&d| location_from_delta(d, fix)).collect();
    Ok(LocationEstimate {
        strategy,
        coordinates: vec![coordinates],
        delta,
        depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraIntrinsics, CameraPose};
    use crate::feature::{FeatureAttributes, FeatureGeometry};
    use crate::image::{DepthMap, LabelMap};
    use nalgebra::Vector3;

    const W: usize = 160;
    const H: usize = 120;
    const CLASS: u8 = 3;

    /// Camera 1.5 m above flat ground looking ahead and down; class pixels
    /// cover a 1.2 m wide strip running away from the camera.
    fn ground_strip() -> CaptureContext {
        let pose = CameraPose::look_at(Vector3::new(0.0, 1.5, 0.0), Vector3::new(0.0, 0.0, -4.0))
            .unwrap();
        let k = CameraIntrinsics::from_params(120.0, 120.0, 80.0, 60.0).unwrap();
        let rot = pose.rotation();
        let eye = pose.position();
        let mut depth = DepthMap::new(W, H);
        let mut labels = LabelMap::new(W, H, 0);
        for y in 0..H {
            for x in 0..W {
                let dir = rot * k.back_project(x as f32, y as f32, 1.0);
                if dir.y >= -1e-6 {
                    continue;
                }
                let t = -eye.y / dir.y;
                if t > 4.9 {
                    continue;
                }
                let hit = eye + dir * t;
                depth.set(x, y, t);
                if hit.x.abs() < 0.6 && hit.z < -1.0 {
                    labels.set(x, y, CLASS);
                }
            }
        }
        CaptureContext::new(depth, labels, pose, k).unwrap()
    }

    fn estimator() -> AttributeEstimator {
        AttributeEstimator::with_capture(EstimatorParams::default(), Arc::new(ground_strip()))
    }

    fn strip_feature() -> AccessibilityFeature {
        AccessibilityFeature::new(CLASS, FeatureGeometry::LineString, [0.5, 0.3])
    }

    #[test]
    fn unconfigured_estimator_reports_missing_capture() {
        let est = AttributeEstimator::new(EstimatorParams::default());
        let token = CancellationToken::new();
        let mut feature = strip_feature();
        assert_eq!(
            est.estimate_attributes(&mut feature, &token).unwrap_err(),
            EstimationError::ConfigurationMissing("capture")
        );
        assert_eq!(
            est.analyze_plane(CLASS, &token).unwrap_err(),
            EstimationError::ConfigurationMissing("capture")
        );
    }

    #[test]
    fn ground_strip_plane_is_level() {
        let analysis = estimator()
            .analyze_plane(CLASS, &CancellationToken::new())
            .unwrap();
        assert!(analysis.points_extracted > 1000);
        assert!(analysis.fitted.normal.y > 0.999);
        assert!(analysis.bins.bin_count > 4);
        assert!(analysis.timings.stage_ms("fit").is_some());
    }

    #[test]
    fn plane_strategies_win_on_a_clean_strip() {
        let est = estimator();
        let mut feature = strip_feature();
        let outcomes = est
            .estimate_attributes(&mut feature, &CancellationToken::new())
            .unwrap();
        assert_eq!(outcomes.len(), 3);
        for o in &outcomes {
            assert_eq!(
                o.strategy,
                Some(match o.attribute {
                    AttributeKind::Width => "plane_bins",
                    _ => "plane_axes",
                })
            );
        }
        let width = feature.attributes.width.unwrap();
        assert!(width > 0.8 && width < 1.3, "width {width}");
        assert!(feature.attributes.running_slope.unwrap() < 1.0);
        assert!(feature.attributes.cross_slope.unwrap() < 1.0);
    }

    #[test]
    fn missing_class_falls_back_to_trapezoid() {
        let est = estimator();
        // Bottom-left, top-left, top-right, bottom-right.
        let mut feature = AccessibilityFeature::new(9, FeatureGeometry::LineString, [0.5, 0.3])
            .with_trapezoid([[0.4, 0.1], [0.45, 0.4], [0.55, 0.4], [0.6, 0.1]]);
        let outcomes = est
            .estimate_attributes(&mut feature, &CancellationToken::new())
            .unwrap();
        let width = &outcomes[0];
        assert_eq!(width.strategy, Some("trapezoid"));
        assert_eq!(width.failures.len(), 1);
        assert_eq!(width.failures[0].strategy, "plane_bins");
        assert!(feature.attributes.width.unwrap() > 0.0);
    }

    #[test]
    fn exhausted_chains_leave_attributes_unset() {
        let est = estimator();
        let mut feature = AccessibilityFeature::new(9, FeatureGeometry::LineString, [0.5, 0.3]);
        feature.attributes.width = Some(4.0);
        let outcomes = est
            .estimate_attributes(&mut feature, &CancellationToken::new())
            .unwrap();
        assert!(outcomes.iter().all(|o| o.value.is_none() && o.failures.len() == 2));
        assert_eq!(feature.attributes.width, None);
        assert_eq!(feature.attributes.running_slope, None);
    }

    #[test]
    fn line_string_location_uses_plane_endpoints() {
        let est = estimator();
        let mut feature = strip_feature();
        let fix = GeoCoordinate::new(47.6, -122.3);
        let loc = est
            .estimate_location(&mut feature, fix, &CancellationToken::new())
            .unwrap();
        assert_eq!(loc.strategy, LocationStrategy::PlaneEndpoints);
        assert_eq!(loc.coordinates[0].len(), 2);
        // Strip lies ahead of (north of) the device.
        assert!(loc.delta.north > 1.0);
        assert!(loc.delta.east.abs() < 0.2);
        assert!(loc.coordinates[0][0].latitude > fix.latitude);
        assert_eq!(feature.location.as_ref(), Some(&loc));
    }

    #[test]
    fn polygon_without_contour_falls_back_to_centroid() {
        let est = estimator();
        let mut feature = AccessibilityFeature::new(CLASS, FeatureGeometry::Polygon, [0.5, 0.3]);
        let loc = est
            .estimate_location(&mut feature, GeoCoordinate::new(0.0, 0.0), &CancellationToken::new())
            .unwrap();
        assert_eq!(loc.strategy, LocationStrategy::Centroid);
        assert!(loc.depth > 1.5 && loc.depth < 5.0);
    }

    #[test]
    fn exhausted_location_chain_returns_last_error() {
        let est = estimator();
        // Centroid above the horizon has no depth.
        let mut feature = AccessibilityFeature::new(CLASS, FeatureGeometry::Point, [0.5, 0.95]);
        let err = est
            .estimate_location(&mut feature, GeoCoordinate::new(0.0, 0.0), &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, EstimationError::MissingDepth { .. }));
        assert!(feature.location.is_none());
    }

    #[test]
    fn cancelled_request_fails_without_partial_results() {
        let est = estimator();
        let token = CancellationToken::new();
        token.cancel();
        let mut feature = strip_feature();
        assert_eq!(
            est.estimate(&mut feature, None, &token).unwrap_err(),
            EstimationError::Cancelled
        );
        assert_eq!(feature.attributes.width, None);
    }

    #[test]
    fn fatal_failure_midway_leaves_feature_untouched() {
        use crate::pipeline::strategies::{SlopeStrategy, WidthStrategy};

        let mut params = EstimatorParams::default();
        params.attribute_chains.width = vec![WidthStrategy::Trapezoid];
        params.attribute_chains.running_slope = vec![SlopeStrategy::PlaneAxes];
        params.binning.bin_size = 1e-9;
        let est = AttributeEstimator::with_capture(params, Arc::new(ground_strip()));
        let mut feature = strip_feature()
            .with_trapezoid([[0.4, 0.1], [0.45, 0.4], [0.55, 0.4], [0.6, 0.1]])
            .with_requested(vec![AttributeKind::Width, AttributeKind::RunningSlope]);

        // Width succeeds from the trapezoid, then the plane rejects the bin size.
        let err = est
            .estimate_attributes(&mut feature, &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(
            err,
            EstimationError::InvalidParameter {
                name: "bin_size",
                ..
            }
        ));
        assert_eq!(feature.attributes, FeatureAttributes::default());
    }

    #[test]
    fn report_carries_plane_stage_and_timings() {
        let est = estimator();
        let mut feature = strip_feature();
        let report = est
            .estimate(&mut feature, Some(GeoCoordinate::new(10.0, 20.0)), &CancellationToken::new())
            .unwrap();
        let plane = report.plane.as_ref().unwrap();
        assert!(plane.populated_bins > 0);
        assert!(!plane.bin_widths.is_empty());
        assert!(report.plane_failure.is_none());
        assert!(report.timings.stage_ms("extract").is_some());
        assert!(report.timings.stage_ms("location").is_some());
        assert!(report.location.as_ref().unwrap().estimate.is_some());
        assert!(report.summary().contains("plane_bins"));
    }
}
