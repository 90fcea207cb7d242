//! Process-wide counters for record mutations, validation rejections and
//! undefined calculator results.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    static ref RECORDS_CREATED: IntCounterVec = IntCounterVec::new(
        Opts::new("poultry_records_created_total", "Records created per entity"),
        &["entity"]
    )
    .expect("metric can be created");
    static ref RECORDS_DELETED: IntCounterVec = IntCounterVec::new(
        Opts::new("poultry_records_deleted_total", "Records deleted per entity"),
        &["entity"]
    )
    .expect("metric can be created");
    static ref VALIDATION_REJECTIONS: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "poultry_validation_rejections_total",
            "Form submissions rejected by validation, per entity"
        ),
        &["entity"]
    )
    .expect("metric can be created");
    static ref UNDEFINED_METRICS: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "poultry_calculator_undefined_metrics_total",
            "Calculator outputs left undefined, per reason"
        ),
        &["reason"]
    )
    .expect("metric can be created");
    static ref CALCULATIONS: IntCounter = IntCounter::new(
        "poultry_calculations_total",
        "Cost/profit calculations performed"
    )
    .expect("metric can be created");
}

/// Registers every counter with [`REGISTRY`]. Safe to call more than once.
pub fn register_metrics() {
    let collectors: [Box<dyn prometheus::core::Collector>; 5] = [
        Box::new(RECORDS_CREATED.clone()),
        Box::new(RECORDS_DELETED.clone()),
        Box::new(VALIDATION_REJECTIONS.clone()),
        Box::new(UNDEFINED_METRICS.clone()),
        Box::new(CALCULATIONS.clone()),
    ];
    for collector in collectors {
        // AlreadyReg on repeated calls
        let _ = REGISTRY.register(collector);
    }
}

pub fn record_created(entity: &str) {
    RECORDS_CREATED.with_label_values(&[entity]).inc();
}

pub fn record_deleted(entity: &str) {
    RECORDS_DELETED.with_label_values(&[entity]).inc();
}

pub fn validation_rejected(entity: &str) {
    VALIDATION_REJECTIONS.with_label_values(&[entity]).inc();
}

pub fn calculation_performed() {
    CALCULATIONS.inc();
}

pub fn undefined_metric(reason: &str) {
    UNDEFINED_METRICS.with_label_values(&[reason]).inc();
}

pub fn created_count(entity: &str) -> u64 {
    RECORDS_CREATED.with_label_values(&[entity]).get()
}

pub fn rejected_count(entity: &str) -> u64 {
    VALIDATION_REJECTIONS.with_label_values(&[entity]).get()
}

/// Prometheus text exposition of the registered counters.
pub fn export_text() -> Result<String, prometheus::Error> {
    register_metrics();
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_export() {
        record_created("metrics_test");
        validation_rejected("metrics_test");
        let text = export_text().unwrap();
        assert!(text.contains("poultry_records_created_total"));
        assert!(text.contains("entity=\"metrics_test\""));
        assert!(created_count("metrics_test") >= 1);
        assert!(rejected_count("metrics_test") >= 1);
    }
}
