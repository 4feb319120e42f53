//! firelog 로그 파이프라인
//!
//! 세 벤더(Kaspersky, TP-Link, D-Link)의 방화벽 로그 파일을 파싱하여
//! 정규화 레코드로 변환하고, 벤더별 컬렉션으로 보관합니다.
//!
//! # 모듈 구성
//!
//! - [`patterns`]: IPv4, MAC, 프로토콜, 포트 추출 패턴 (한 번만 컴파일)
//! - [`parser`]: 벤더별 [`Tokenizer`](parser::Tokenizer) 구현과 파일 단위 [`ParseContext`]
//! - [`builder`]: 필드 집합 -> [`NormalizedRecord`](firelog_core::NormalizedRecord), 전역 식별자 할당
//! - [`ingest`]: 디렉토리 열거, 파일 읽기, 라인 단위 파싱
//! - [`store`]: 원자적 교체가 가능한 벤더별 컬렉션 저장소
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! directory -> IngestPipeline -> Tokenizer (+ParseContext) -> RecordBuilder -> RecordStore
//!                  |                 |                            |               |
//!            sorted files     Kaspersky/TP-Link/D-Link    PatternLibrary +   ArcSwap per
//!                                                          IdAllocator        vendor
//! ```

pub mod builder;
pub mod error;
pub mod ingest;
pub mod parser;
pub mod patterns;
pub mod store;

// --- 주요 타입 re-export ---

// 저장소
pub use store::{RecordCollection, RecordStore, RecordStoreBuilder, ReloadSummary};

// 적재
pub use ingest::{IngestPipeline, LoadReport, ParseFailure, RawLine};

// 레코드 생성
pub use builder::{IdAllocator, RecordBuilder};

// 파서
pub use parser::{FieldSet, ParseContext, Tokenizer, tokenizer_for};

// 패턴
pub use patterns::PatternLibrary;

// 에러
pub use error::LogPipelineError;
