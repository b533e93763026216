/// Live side-channel that mirrors logged values for viewing.
///
/// Values arrive already rendered for humans; the engine calls `post` only
/// for `log` calls made with `post = true`, after the record is written.
pub trait Telemetry: Send + Sync {
    fn post(&self, name: &str, value: &str);
}

/// Discards every posted value.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetry;

impl Telemetry for NullTelemetry {
    fn post(&self, _name: &str, _value: &str) {}
}

/// Emits posted values as `tracing` events under the `telemetry` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn post(&self, name: &str, value: &str) {
        tracing::info!(target: "telemetry", name, value);
    }
}
