//! TP-Link 라우터 시스템 로그 토크나이저
//!
//! # 파일 형식
//! ```text
//! #Time = 2018-04-13 20:46:19
//! #Type = ALL
//! #Level = ALL
//! 20:45:07	DHCP	INFO	DHCPS:Send ACK to 192.168.0.100 (aa:bb:cc:dd:ee:ff)
//! ```
//!
//! `#`으로 시작하는 헤더는 레코드가 되지 않습니다. 헤더의 `Time = <value>`는
//! 파일의 나머지 라인에 적용될 날짜를 [`ParseContext`]에 설정합니다.
//! 데이터 라인은 timestamp, event type, level, content 4개의 탭 컬럼입니다.

use firelog_core::types::Vendor;

use super::{FieldSet, ParseContext, Tokenizer, TpLinkFields, clean_line};
use crate::error::LogPipelineError;

/// 헤더 마커
const HEADER_MARKER: char = '#';

/// 날짜를 담은 헤더 키
const TIME_KEY: &str = "Time";

/// 데이터 라인 필수 탭 컬럼 수
const COLUMNS: usize = 4;

/// TP-Link 헤더 + 탭 구분 데이터 라인 토크나이저
#[derive(Debug, Clone, Copy, Default)]
pub struct TpLinkTokenizer;

impl Tokenizer for TpLinkTokenizer {
    fn vendor(&self) -> Vendor {
        Vendor::TpLink
    }

    fn tokenize(
        &self,
        line: &str,
        ctx: &mut ParseContext,
    ) -> Result<Option<FieldSet>, LogPipelineError> {
        let line = clean_line(line);
        if line.trim().is_empty() {
            return Ok(None);
        }

        if let Some(header) = line.trim_start().strip_prefix(HEADER_MARKER) {
            if let Some(date) = header_date(header) {
                tracing::trace!(date, "tplink header date");
                ctx.set_current_date(date);
            }
            return Ok(None);
        }

        let columns: Vec<&str> = line.splitn(COLUMNS, '\t').collect();
        let &[timestamp, type_event, level, content] = columns.as_slice() else {
            return Err(LogPipelineError::InsufficientFields {
                vendor: Vendor::TpLink,
                field: "line",
                expected: COLUMNS,
                found: columns.len(),
            });
        };

        let tokens: Vec<&str> = timestamp.split_whitespace().collect();
        let (Some(&first), Some(&last)) = (tokens.first(), tokens.last()) else {
            return Err(LogPipelineError::InsufficientFields {
                vendor: Vendor::TpLink,
                field: "timestamp",
                expected: 1,
                found: 0,
            });
        };

        // 토큰이 하나뿐이면 시간으로만 사용
        let date = match ctx.current_date() {
            Some(date) => date,
            None if tokens.len() > 1 => first,
            None => "",
        };

        Ok(Some(FieldSet::TpLink(TpLinkFields {
            date: date.to_owned(),
            time: last.to_owned(),
            type_event: type_event.trim().to_owned(),
            level_significance: level.trim().to_owned(),
            log_content: content.trim().to_owned(),
        })))
    }
}

/// 헤더 본문에서 `Time = <value>`를 찾아 값의 첫 토큰을 반환합니다.
///
/// `Time`은 단어 단위로만 인식합니다 (`StartTime`은 무시).
fn header_date(header: &str) -> Option<&str> {
    let mut search_from = 0;
    while let Some(offset) = header[search_from..].find(TIME_KEY) {
        let start = search_from + offset;
        let end = start + TIME_KEY.len();
        search_from = end;

        let preceded_by_word = header[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        if preceded_by_word {
            continue;
        }

        let Some(value) = header[end..].trim_start().strip_prefix('=') else {
            continue;
        };
        if let Some(date) = value.split_whitespace().next() {
            return Some(date);
        }
    }
    None
}
