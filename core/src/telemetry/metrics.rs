use std::sync::Mutex;

/// Counters for exposures folded into a coadd and precondition failures.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    exposures: usize,
    errors: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                exposures: 0,
                errors: 0,
            }),
        }
    }

    pub fn record_exposure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.exposures += 1;
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.errors += 1;
        }
    }

    /// (exposures, errors) seen so far.
    pub fn snapshot(&self) -> (usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (metrics.exposures, metrics.errors)
        } else {
            (0, 0)
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
    fn counters_advance_independently() {
        let recorder = MetricsRecorder::new();
        recorder.record_exposure();
        recorder.record_exposure();
        recorder.record_error();
        assert_eq!(recorder.snapshot(), (2, 1));
    }
}
