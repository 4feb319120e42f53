//! 디렉토리 적재 파이프라인
//!
//! [`IngestPipeline`]은 한 벤더의 로그 디렉토리를 처음부터 다시 파싱합니다.
//!
//! 1. 디렉토리의 일반 파일을 이름순으로 정렬 (숨김 파일 제외)
//! 2. 파일마다 새 [`ParseContext`] 생성
//! 3. 라인 순서대로 토크나이저 -> [`RecordBuilder`]
//!
//! 식별자는 처리 순서대로 발급되므로 정렬 순서가 곧 식별자 순서입니다.
//! 잘못된 라인은 [`ParseFailure`]로 기록되고 파일 처리는 계속됩니다.
//! 디렉토리나 파일을 읽을 수 없으면 적재 전체가 실패합니다.

use std::path::{Path, PathBuf};

use firelog_core::types::{NormalizedRecord, Vendor};
use serde::{Deserialize, Serialize};

use crate::builder::RecordBuilder;
use crate::error::LogPipelineError;
use crate::parser::{FieldSet, ParseContext, Tokenizer, tokenizer_for};

/// 단일 로그 파일 최대 크기
const MAX_LOG_FILE_SIZE: u64 = 256 * 1024 * 1024; // 256MB

/// 파일에서 읽은 원시 라인 한 줄
#[derive(Debug, Clone, Copy)]
pub struct RawLine<'a> {
    pub vendor: Vendor,
    pub file: &'a Path,
    /// 1부터 시작
    pub line_no: usize,
    pub text: &'a str,
}

/// 건너뛴 라인 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseFailure {
    pub file: String,
    pub line: usize,
    pub reason: String,
}

/// 디렉토리 적재 결과
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub vendor: Vendor,
    /// 파일 순서 -> 라인 순서
    pub records: Vec<NormalizedRecord>,
    pub failures: Vec<ParseFailure>,
    /// 처리한 파일 수
    pub files: usize,
}

/// 파일 하나를 파싱한 결과
#[derive(Debug, Clone, Default)]
pub struct FileReport {
    pub records: Vec<NormalizedRecord>,
    pub failures: Vec<ParseFailure>,
}

/// 벤더 디렉토리 적재기
#[derive(Debug, Clone)]
pub struct IngestPipeline {
    builder: RecordBuilder,
}

impl IngestPipeline {
    pub fn new(builder: RecordBuilder) -> Self {
        Self { builder }
    }

    /// 라인 하나를 벤더 토크나이저로 토큰화합니다.
    ///
    /// `Ok(None)`은 레코드가 없는 라인(빈 줄, 헤더, 주석)입니다.
    pub fn parse_line(
        &self,
        vendor: Vendor,
        line: &str,
        ctx: &mut ParseContext,
    ) -> Result<Option<FieldSet>, LogPipelineError> {
        tokenizer_for(vendor).tokenize(line, ctx)
    }

    /// 메모리에 있는 파일 내용 하나를 파싱합니다.
    ///
    /// 파일마다 새 컨텍스트를 사용하므로 다른 파일의 헤더 상태가 넘어오지 않습니다.
    pub fn parse_text(&self, vendor: Vendor, file: &Path, text: &str) -> FileReport {
        let tokenizer = tokenizer_for(vendor);
        self.parse_with(tokenizer.as_ref(), file, text)
    }

    fn parse_with(&self, tokenizer: &dyn Tokenizer, file: &Path, text: &str) -> FileReport {
        let mut ctx = ParseContext::new();
        let mut report = FileReport::default();

        for (idx, line) in text.lines().enumerate() {
            let raw = RawLine {
                vendor: tokenizer.vendor(),
                file,
                line_no: idx + 1,
                text: line,
            };
            match tokenizer.tokenize(raw.text, &mut ctx) {
                Ok(Some(fields)) => report.records.push(self.builder.build(fields)),
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(
                        vendor = %raw.vendor,
                        file = %raw.file.display(),
                        line = raw.line_no,
                        error = %e,
                        "skipping malformed line"
                    );
                    report.failures.push(ParseFailure {
                        file: raw.file.display().to_string(),
                        line: raw.line_no,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }

    /// 벤더 디렉토리 전체를 파싱합니다.
    ///
    /// # Errors
    /// - 디렉토리를 열거할 수 없는 경우 ([`LogPipelineError::DirectoryUnavailable`])
    /// - 파일을 읽을 수 없거나 너무 큰 경우 ([`LogPipelineError::FileUnreadable`])
    pub async fn load_directory(
        &self,
        vendor: Vendor,
        dir: impl AsRef<Path>,
    ) -> Result<LoadReport, LogPipelineError> {
        let dir = dir.as_ref();
        let files = list_log_files(dir).await?;
        let tokenizer = tokenizer_for(vendor);

        let mut report = LoadReport {
            vendor,
            records: Vec::new(),
            failures: Vec::new(),
            files: 0,
        };

        for path in &files {
            let text = read_log_file(path).await?;
            let file_report = self.parse_with(tokenizer.as_ref(), path, &text);

            tracing::debug!(
                vendor = %vendor,
                file = %path.display(),
                records = file_report.records.len(),
                failures = file_report.failures.len(),
                "parsed log file"
            );

            report.records.extend(file_report.records);
            report.failures.extend(file_report.failures);
            report.files += 1;
        }

        tracing::info!(
            vendor = %vendor,
            dir = %dir.display(),
            files = report.files,
            records = report.records.len(),
            failures = report.failures.len(),
            "loaded vendor directory"
        );

        Ok(report)
    }
}

/// 디렉토리의 일반 파일을 이름순으로 반환합니다. 숨김 파일과 하위 디렉토리는 제외합니다.
async fn list_log_files(dir: &Path) -> Result<Vec<PathBuf>, LogPipelineError> {
    let unavailable = |e: std::io::Error| LogPipelineError::DirectoryUnavailable {
        path: dir.display().to_string(),
        reason: e.to_string(),
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(unavailable)?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(unavailable)? {
        let path = entry.path();

        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden {
            continue;
        }

        // 심볼릭 링크는 대상 기준으로 판단
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to stat directory entry, skipping"
                );
            }
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// 로그 파일을 읽어 UTF-8로 디코딩합니다. 잘못된 바이트는 대체 문자로 바뀝니다.
async fn read_log_file(path: &Path) -> Result<String, LogPipelineError> {
    let unreadable = |reason: String| LogPipelineError::FileUnreadable {
        path: path.display().to_string(),
        reason,
    };

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| unreadable(e.to_string()))?;
    if metadata.len() > MAX_LOG_FILE_SIZE {
        return Err(unreadable(format!(
            "file too large: {} bytes (max: {MAX_LOG_FILE_SIZE})",
            metadata.len()
        )));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| unreadable(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
