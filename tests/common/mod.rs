// Shared helpers for directable integration tests
#![allow(dead_code)]

use directable::config::AnalysisConfig;
use directable::model::UnitSource;
use directable::report::DirectableReport;
use std::path::PathBuf;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn analyze_fixture(name: &str) -> DirectableReport {
    directable::analyze_path(&fixture(name), &AnalysisConfig::default())
        .unwrap_or_else(|e| panic!("analyzing {name}: {e}"))
}

pub fn analyze_json(json: &str) -> DirectableReport {
    let model = UnitSource::from_json(json)
        .and_then(UnitSource::into_model)
        .unwrap_or_else(|e| panic!("loading inline unit: {e}"));
    directable::analyze_model(&model, &AnalysisConfig::default())
        .unwrap_or_else(|e| panic!("analyzing inline unit: {e}"))
}

pub fn directable_names(report: &DirectableReport) -> Vec<&str> {
    report.meths.iter().map(|m| m.name.as_str()).collect()
}

pub fn blocked_names(report: &DirectableReport) -> Vec<&str> {
    report.undirect_meths.iter().map(String::as_str).collect()
}
