//! Metrics collection and Prometheus export.
//!
//! Installs the Prometheus recorder and names the domain counters.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use service_core::error::AppError;
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics recorder.
///
/// Call once at startup before any metrics are recorded. Later calls are
/// no-ops.
pub fn init_metrics() -> Result<(), AppError> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        AppError::InternalError(anyhow::anyhow!(
            "failed to install Prometheus recorder: {}",
            e
        ))
    })?;

    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

pub fn record_user_created() {
    counter!("users_created_total").increment(1);
}

pub fn record_user_deleted(removed: bool) {
    let result = if removed { "deleted" } else { "missing" };
    counter!("users_deleted_total", "result" => result).increment(1);
}

pub fn record_user_lookup(found: bool) {
    let result = if found { "found" } else { "missing" };
    counter!("user_lookups_total", "result" => result).increment(1);
}

pub fn record_store_error(operation: &'static str) {
    counter!("store_errors_total", "operation" => operation).increment(1);
}
