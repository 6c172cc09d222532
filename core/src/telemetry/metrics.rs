use std::sync::Mutex;

/// Run-level counters letting callers audit how much of the output came from
/// interpolation versus extrapolation.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    windows: usize,
    interpolated: usize,
    extrapolated: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                windows: 0,
                interpolated: 0,
                extrapolated: 0,
            }),
        }
    }

    pub fn record_window(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.windows += 1;
        }
    }

    pub fn record_interpolated(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.interpolated += 1;
        }
    }

    pub fn record_extrapolated(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.extrapolated += 1;
        }
    }

    /// (windows, interpolated, extrapolated)
    pub fn snapshot(&self) -> (usize, usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (metrics.windows, metrics.interpolated, metrics.extrapolated)
        } else {
            (0, 0, 0)
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_accumulates_counts() {
        let recorder = MetricsRecorder::new();
        recorder.record_window();
        recorder.record_window();
        recorder.record_interpolated();
        recorder.record_extrapolated();
        assert_eq!(recorder.snapshot(), (2, 1, 1));
    }
}
