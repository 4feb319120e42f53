//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 파이프라인과 데몬은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `firelog_`
//! - 접미어: `_total` (counter), `_seconds` (histogram), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(firelog_core::metrics::PARSE_FAILURES_TOTAL, "vendor" => "tplink").increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 벤더 레이블 키 (kaspersky, tplink, dlink)
pub const LABEL_VENDOR: &str = "vendor";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── 적재 메트릭 ────────────────────────────────────────────────────

/// 현재 컬렉션의 레코드 수 (gauge, label: vendor)
pub const RECORDS_LOADED: &str = "firelog_records_loaded";

/// 적재한 파일 수 (counter, label: vendor)
pub const FILES_READ_TOTAL: &str = "firelog_files_read_total";

/// 라인 파싱 실패 수 (counter, label: vendor)
pub const PARSE_FAILURES_TOTAL: &str = "firelog_parse_failures_total";

/// 리로드 수 (counter, labels: vendor, result)
pub const RELOADS_TOTAL: &str = "firelog_reloads_total";

/// 리로드 소요 시간 (histogram, 초, label: vendor)
pub const RELOAD_DURATION_SECONDS: &str = "firelog_reload_duration_seconds";

// ─── API 메트릭 ─────────────────────────────────────────────────────

/// 처리한 HTTP 요청 수 (counter, label: vendor)
pub const API_REQUESTS_TOTAL: &str = "firelog_api_requests_total";

/// 데몬 빌드 정보 (gauge, 항상 1)
pub const DAEMON_BUILD_INFO: &str = "firelog_daemon_build_info";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 리로드 소요 시간 히스토그램 버킷 (초)
///
/// 1ms ~ 60s 범위 (디렉토리 전체 재파싱)
pub const RELOAD_DURATION_BUCKETS: [f64; 9] = [0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 10.0, 60.0];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출합니다. 레코더가 없으면 아무 일도 하지 않습니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_gauge!(
        RECORDS_LOADED,
        "Number of records in the current collection of a vendor"
    );
    describe_counter!(FILES_READ_TOTAL, "Total number of log files read");
    describe_counter!(
        PARSE_FAILURES_TOTAL,
        "Total number of log lines rejected by a vendor tokenizer"
    );
    describe_counter!(RELOADS_TOTAL, "Total number of collection reloads");
    describe_histogram!(
        RELOAD_DURATION_SECONDS,
        "Time to re-parse a vendor directory in seconds"
    );
    describe_counter!(API_REQUESTS_TOTAL, "Total number of HTTP API requests");
    describe_gauge!(
        DAEMON_BUILD_INFO,
        "Build information (always 1, with version label)"
    );
}
