use attribute_estimator::config::estimate;
use attribute_estimator::diagnostics::EstimationReport;
use attribute_estimator::feature::AccessibilityFeature;
use attribute_estimator::image::io::write_json_file;
use attribute_estimator::pipeline::{AttributeEstimator, CancellationToken};
use serde::Serialize;
use std::env;
use std::path::Path;
use std::sync::Arc;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> String {
    "Usage: estimate_attributes <config.json>".to_string()
}

#[derive(Serialize)]
struct ToolOutput<'a> {
    feature: &'a AccessibilityFeature,
    report: &'a EstimationReport,
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let mut config = estimate::load_config(Path::new(&config_path))?;
    let capture = estimate::load_capture(&config)?;

    let estimator = AttributeEstimator::with_capture(config.estimator.clone(), Arc::new(capture));
    let token = CancellationToken::new();
    let report = estimator
        .estimate(&mut config.feature, config.device_fix, &token)
        .map_err(|e| format!("Estimation failed: {e}"))?;
    let feature = &config.feature;

    print!("{}", report.summary());
    print_feature(feature);

    if let Some(path) = &config.output.json_out {
        write_json_file(
            path,
            &ToolOutput {
                feature,
                report: &report,
            },
        )?;
        println!("\nJSON report written to {}", path.display());
    }
    Ok(())
}

fn print_feature(feature: &AccessibilityFeature) {
    let fmt = |v: Option<f32>| v.map(|v| format!("{v:.3}")).unwrap_or_else(|| "-".into());
    println!("Feature");
    println!("  width_m: {}", fmt(feature.attributes.width));
    println!("  running_slope_deg: {}", fmt(feature.attributes.running_slope));
    println!("  cross_slope_deg: {}", fmt(feature.attributes.cross_slope));
    if let Some(loc) = &feature.location {
        for (i, c) in loc.coordinates.iter().flatten().enumerate() {
            println!("  point[{i}]: {:.7}, {:.7}", c.latitude, c.longitude);
        }
    }
}
