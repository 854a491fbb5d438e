//! Error reporting hook.

use std::error::Error;
use std::sync::Arc;

/// Receives every failure the controller surfaces, exactly once.
///
/// Reporting is fire-and-forget: it can't fail and doesn't change what the
/// caller gets back.
pub trait Telemetry: Send + Sync + 'static {
    /// Records `error`. `operation` names the controller operation that
    /// failed (`"login"`, `"access_token"`, …).
    fn report(&self, error: &(dyn Error + 'static), operation: &'static str);
}

/// Reports errors as `tracing` events at `ERROR` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn report(&self, error: &(dyn Error + 'static), operation: &'static str) {
        tracing::error!(operation, error = %error, "operation failed");
    }
}

impl<T: Telemetry> Telemetry for Arc<T> {
    fn report(&self, error: &(dyn Error + 'static), operation: &'static str) {
        (**self).report(error, operation)
    }
}
