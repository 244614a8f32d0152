use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters describing how hover ticks turned into mirror resizes.
#[derive(Debug, Default, Clone)]
pub struct ResizeMetrics {
    hover_ticks: u64,
    targets_missed: u64,
    resizes_scheduled: u64,
    resizes_applied: u64,
    frames: u64,
    host_errors: u64,
}

impl ResizeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hover(&mut self) {
        self.hover_ticks = self.hover_ticks.saturating_add(1);
    }

    pub fn record_miss(&mut self) {
        self.targets_missed = self.targets_missed.saturating_add(1);
    }

    pub fn record_scheduled(&mut self) {
        self.resizes_scheduled = self.resizes_scheduled.saturating_add(1);
    }

    pub fn record_applied(&mut self) {
        self.resizes_applied = self.resizes_applied.saturating_add(1);
    }

    pub fn record_frame(&mut self) {
        self.frames = self.frames.saturating_add(1);
    }

    pub fn record_errors(&mut self, count: usize) {
        self.host_errors = self.host_errors.saturating_add(count as u64);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            hover_ticks: self.hover_ticks,
            targets_missed: self.targets_missed,
            resizes_scheduled: self.resizes_scheduled,
            resizes_applied: self.resizes_applied,
            frames: self.frames,
            host_errors: self.host_errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub hover_ticks: u64,
    pub targets_missed: u64,
    pub resizes_scheduled: u64,
    pub resizes_applied: u64,
    pub frames: u64,
    pub host_errors: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("hover_ticks".to_string(), json!(self.hover_ticks));
        map.insert("targets_missed".to_string(), json!(self.targets_missed));
        map.insert("resizes_scheduled".to_string(), json!(self.resizes_scheduled));
        map.insert("resizes_applied".to_string(), json!(self.resizes_applied));
        map.insert("frames".to_string(), json!(self.frames));
        map.insert("host_errors".to_string(), json!(self.host_errors));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "resize_metrics", self.as_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let mut metrics = ResizeMetrics::new();
        metrics.record_hover();
        metrics.record_hover();
        metrics.record_miss();
        metrics.record_scheduled();
        metrics.record_applied();
        metrics.record_errors(2);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.hover_ticks, 2);
        assert_eq!(snapshot.targets_missed, 1);
        assert_eq!(snapshot.host_errors, 2);

        let event = snapshot.to_log_event("mirror_resize::metrics");
        assert_eq!(event.message, "resize_metrics");
        assert_eq!(event.field("resizes_applied"), Some(&json!(1)));
    }
}
