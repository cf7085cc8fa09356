//! Metric descriptions reach the installed recorder

use metrics::{
    Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
};
use rediscloud_api::metrics::{
    describe_metrics, HTTP_REQUESTS_TOTAL, RATE_LIMIT_WAIT_SECONDS, TASK_POLLS_TOTAL,
};
use std::sync::Mutex;

#[derive(Default)]
struct DescribingRecorder {
    described: Mutex<Vec<(String, Option<Unit>)>>,
}

impl DescribingRecorder {
    fn push(&self, key: KeyName, unit: Option<Unit>) {
        self.described
            .lock()
            .unwrap()
            .push((key.as_str().to_string(), unit));
    }
}

impl Recorder for DescribingRecorder {
    fn describe_counter(&self, key: KeyName, unit: Option<Unit>, _: SharedString) {
        self.push(key, unit);
    }

    fn describe_gauge(&self, key: KeyName, unit: Option<Unit>, _: SharedString) {
        self.push(key, unit);
    }

    fn describe_histogram(&self, key: KeyName, unit: Option<Unit>, _: SharedString) {
        self.push(key, unit);
    }

    fn register_counter(&self, _: &Key, _: &Metadata<'_>) -> Counter {
        Counter::noop()
    }

    fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}

#[test]
fn test_describe_metrics_registers_all() {
    let recorder = DescribingRecorder::default();
    metrics::with_local_recorder(&recorder, describe_metrics);

    let described = recorder.described.lock().unwrap();
    assert_eq!(described.len(), 3);
    assert!(described.contains(&(HTTP_REQUESTS_TOTAL.to_string(), Some(Unit::Count))));
    assert!(described.contains(&(TASK_POLLS_TOTAL.to_string(), Some(Unit::Count))));
    assert!(described.contains(&(RATE_LIMIT_WAIT_SECONDS.to_string(), Some(Unit::Seconds))));
}
