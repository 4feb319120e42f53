//! 로그 파이프라인 에러 타입
//!
//! [`LogPipelineError`]는 토크나이저, 패턴 컴파일, 디렉토리 적재 과정의 에러를 표현합니다.
//! `From<LogPipelineError> for FirelogError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.
//!
//! 라인 단위 에러(`InsufficientFields`)는 해당 라인만 건너뛰게 하고,
//! 디렉토리/파일 에러는 해당 리로드만 실패시킵니다.
//! 헤더, 주석, 빈 줄은 에러가 아니라 토크나이저의 `Ok(None)`으로 표현됩니다.

use firelog_core::error::{FirelogError, IngestError, ParseError};
use firelog_core::types::Vendor;

/// 로그 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LogPipelineError {
    /// 벤더 문법이 요구하는 필드 수보다 적음 (라인 건너뜀, 실패로 집계)
    #[error("{vendor}: insufficient fields in {field}: expected at least {expected}, found {found}")]
    InsufficientFields {
        /// 벤더
        vendor: Vendor,
        /// 부족한 필드 그룹 (line, timestamp, prefix 등)
        field: &'static str,
        /// 최소 필드 수
        expected: usize,
        /// 실제 필드 수
        found: usize,
    },

    /// 로그 디렉토리를 열 수 없음
    #[error("directory unavailable: {path}: {reason}")]
    DirectoryUnavailable {
        /// 디렉토리 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 로그 파일을 읽을 수 없음
    #[error("file unreadable: {path}: {reason}")]
    FileUnreadable {
        /// 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 벤더에 대한 소스 디렉토리가 설정되지 않음
    #[error("no source directory configured for {0}")]
    SourceNotConfigured(Vendor),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<LogPipelineError> for FirelogError {
    fn from(err: LogPipelineError) -> Self {
        match err {
            LogPipelineError::InsufficientFields {
                expected, found, ..
            } => FirelogError::Parse(ParseError::InsufficientFields { expected, found }),
            LogPipelineError::DirectoryUnavailable { path, reason } => {
                FirelogError::Ingest(IngestError::DirectoryUnavailable { path, reason })
            }
            LogPipelineError::FileUnreadable { path, reason } => {
                FirelogError::Ingest(IngestError::FileUnreadable { path, reason })
            }
            other => FirelogError::Ingest(IngestError::InitFailed(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_fields_display() {
        let err = LogPipelineError::InsufficientFields {
            vendor: Vendor::Kaspersky,
            field: "line",
            expected: 6,
            found: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("kaspersky"));
        assert!(msg.contains("expected at least 6"));
        assert!(msg.contains("found 5"));
    }

    #[test]
    fn directory_error_converts_to_ingest_error() {
        let err = LogPipelineError::DirectoryUnavailable {
            path: "/var/log/firewall/dlink".to_owned(),
            reason: "permission denied".to_owned(),
        };
        let firelog_err: FirelogError = err.into();
        assert!(matches!(
            firelog_err,
            FirelogError::Ingest(IngestError::DirectoryUnavailable { .. })
        ));
    }

    #[test]
    fn insufficient_fields_converts_to_parse_error() {
        let err = LogPipelineError::InsufficientFields {
            vendor: Vendor::DLink,
            field: "prefix",
            expected: 5,
            found: 2,
        };
        let firelog_err: FirelogError = err.into();
        assert!(matches!(
            firelog_err,
            FirelogError::Parse(ParseError::InsufficientFields {
                expected: 5,
                found: 2
            })
        ));
    }

    #[test]
    fn config_error_converts_to_init_failed() {
        let err = LogPipelineError::Config {
            field: "patterns.protocols".to_owned(),
            reason: "empty".to_owned(),
        };
        let firelog_err: FirelogError = err.into();
        assert!(matches!(
            firelog_err,
            FirelogError::Ingest(IngestError::InitFailed(_))
        ));
    }
}
