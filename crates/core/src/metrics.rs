//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `lookey_`
//! - 모듈명: `locator_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(lookey_core::metrics::LOCATOR_SHELF_SCANS_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 탐지기 엔드포인트 레이블 키 (shelf, frame)
pub const LABEL_ENDPOINT: &str = "endpoint";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

/// 위치 안내 결과 유형 레이블 키 (DIRECTION, SINGLE_RECOGNIZED)
pub const LABEL_CASE: &str = "case";

// ─── Locator 메트릭 ────────────────────────────────────────────────

/// Locator: 완료된 매대 스캔 수 (counter)
pub const LOCATOR_SHELF_SCANS_TOTAL: &str = "lookey_locator_shelf_scans_total";

/// Locator: 쇼핑 목록과 매칭된 상품 수 (counter)
pub const LOCATOR_MATCHED_ITEMS_TOTAL: &str = "lookey_locator_matched_items_total";

/// Locator: 위치 안내 요청 수 (counter, labels: result, case)
pub const LOCATOR_LOCATE_REQUESTS_TOTAL: &str = "lookey_locator_locate_requests_total";

/// Locator: 탐지기 호출 에러 수 (counter, label: endpoint)
pub const LOCATOR_DETECTOR_ERRORS_TOTAL: &str = "lookey_locator_detector_errors_total";

/// Locator: 탐지기 호출 소요 시간 (histogram, 초, label: endpoint)
pub const LOCATOR_DETECTOR_DURATION_SECONDS: &str = "lookey_locator_detector_duration_seconds";

/// Locator: 캐시에 보관 중인 사용자 스캔 수 (gauge)
pub const LOCATOR_CACHED_SCANS: &str = "lookey_locator_cached_scans";

/// Locator: 만료되어 제거된 스캔 수 (counter)
pub const LOCATOR_SCANS_EXPIRED_TOTAL: &str = "lookey_locator_scans_expired_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 프로세스 시작 시 한 번 호출합니다. 설치된 레코더가 없으면 아무 일도 하지 않습니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_counter!(
        LOCATOR_SHELF_SCANS_TOTAL,
        "Total number of shelf scans stored"
    );
    describe_counter!(
        LOCATOR_MATCHED_ITEMS_TOTAL,
        "Total number of shopping-list items matched on scanned shelves"
    );
    describe_counter!(
        LOCATOR_LOCATE_REQUESTS_TOTAL,
        "Total number of locate requests by result and case"
    );
    describe_counter!(
        LOCATOR_DETECTOR_ERRORS_TOTAL,
        "Total number of failed detector calls per endpoint"
    );
    describe_histogram!(
        LOCATOR_DETECTOR_DURATION_SECONDS,
        "Detector call latency in seconds"
    );
    describe_gauge!(
        LOCATOR_CACHED_SCANS,
        "Number of user shelf scans currently cached"
    );
    describe_counter!(
        LOCATOR_SCANS_EXPIRED_TOTAL,
        "Total number of shelf scans dropped after their TTL"
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};

    use super::*;

    const ALL_METRIC_NAMES: &[&str] = &[
        LOCATOR_SHELF_SCANS_TOTAL,
        LOCATOR_MATCHED_ITEMS_TOTAL,
        LOCATOR_LOCATE_REQUESTS_TOTAL,
        LOCATOR_DETECTOR_ERRORS_TOTAL,
        LOCATOR_DETECTOR_DURATION_SECONDS,
        LOCATOR_CACHED_SCANS,
        LOCATOR_SCANS_EXPIRED_TOTAL,
    ];

    #[test]
    fn all_metrics_start_with_lookey_prefix() {
        for name in ALL_METRIC_NAMES {
            assert!(
                name.starts_with("lookey_"),
                "Metric '{}' does not start with 'lookey_' prefix",
                name
            );
        }
    }

    #[test]
    fn counters_end_with_total() {
        for name in [
            LOCATOR_SHELF_SCANS_TOTAL,
            LOCATOR_MATCHED_ITEMS_TOTAL,
            LOCATOR_LOCATE_REQUESTS_TOTAL,
            LOCATOR_DETECTOR_ERRORS_TOTAL,
            LOCATOR_SCANS_EXPIRED_TOTAL,
        ] {
            assert!(name.ends_with("_total"), "counter '{}'", name);
        }
    }

    #[test]
    fn describe_all_does_not_panic() {
        describe_all();
    }

    #[test]
    fn label_keys_are_lowercase() {
        for label in [LABEL_ENDPOINT, LABEL_RESULT, LABEL_CASE] {
            assert_eq!(label.to_lowercase(), label);
        }
    }

    #[derive(Default)]
    struct DescriptionRecorder {
        described: Mutex<Vec<String>>,
    }

    impl DescriptionRecorder {
        fn record(&self, key: KeyName) {
            self.described
                .lock()
                .unwrap()
                .push(key.as_str().to_owned());
        }
    }

    impl Recorder for DescriptionRecorder {
        fn describe_counter(&self, key: KeyName, _unit: Option<Unit>, _description: SharedString) {
            self.record(key);
        }

        fn describe_gauge(&self, key: KeyName, _unit: Option<Unit>, _description: SharedString) {
            self.record(key);
        }

        fn describe_histogram(&self, key: KeyName, _unit: Option<Unit>, _description: SharedString) {
            self.record(key);
        }

        fn register_counter(&self, _key: &Key, _metadata: &Metadata<'_>) -> Counter {
            Counter::noop()
        }

        fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _key: &Key, _metadata: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    #[test]
    fn describe_all_covers_every_metric() {
        let recorder = DescriptionRecorder::default();
        metrics::with_local_recorder(&recorder, describe_all);

        let described = recorder.described.lock().unwrap();
        for name in ALL_METRIC_NAMES {
            assert!(
                described.iter().any(|d| d == name),
                "metric '{}' has no description",
                name
            );
        }
        assert_eq!(described.len(), ALL_METRIC_NAMES.len());
    }
}
