//! firelog 공통 크레이트
//!
//! 방화벽 로그 정규화 서비스의 모든 크레이트가 공유하는 타입, 에러, 설정을 정의합니다.
//!
//! - [`types`]: 벤더, 레코드 식별자, 벤더별 레코드와 [`NormalizedRecord`]
//! - [`error`]: 최상위 에러 [`FirelogError`]와 도메인 에러
//! - [`config`]: `firelog.toml` 설정과 환경변수 오버라이드
//! - [`metrics`]: Prometheus 메트릭 이름 상수

pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, FirelogError, IngestError, ParseError};

// 설정
pub use config::FirelogConfig;

// 도메인 타입
pub use types::{
    DLinkRecord, KasperskyRecord, NormalizedRecord, RecordId, TpLinkRecord, UnknownVendor, Vendor,
};
