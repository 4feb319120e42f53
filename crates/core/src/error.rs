//! 에러 타입 — 도메인별 에러 정의

/// firelog 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum FirelogError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 라인 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// 디렉토리 적재(리로드) 에러
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 라인 파싱 에러
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 벤더 문법이 요구하는 필드 수보다 적음
    #[error("insufficient fields: expected at least {expected}, found {found}")]
    InsufficientFields { expected: usize, found: usize },
}

/// 디렉토리 적재 에러
///
/// 해당 리로드만 실패시키며, 이전 컬렉션은 그대로 유지됩니다.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// 로그 디렉토리를 열 수 없음
    #[error("directory unavailable: {path}: {reason}")]
    DirectoryUnavailable { path: String, reason: String },

    /// 로그 파일을 읽을 수 없음
    #[error("file unreadable: {path}: {reason}")]
    FileUnreadable { path: String, reason: String },

    /// 파이프라인 초기화 실패 (패턴 컴파일 등)
    #[error("init failed: {0}")]
    InitFailed(String),
}
