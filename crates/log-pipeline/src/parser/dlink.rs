//! D-Link 게이트웨이 로그 토크나이저
//!
//! # 라인 형식
//! ```text
//! <date> <time> <category> <category id> <severity> key=value key="quoted value" ...
//! ```
//!
//! 예:
//! ```text
//! 2018-04-13 20:46:19 CONN 600004 Notice event=conn_open action=allow rule=lan_to_wan connipproto=TCP connrecvif=lan connsrcip=192.168.1.10 connsrcport=51432 conndestif=wan conndestip=93.184.216.34 conndestport=443
//! ```
//!
//! 속성 순서와 개수는 정해져 있지 않습니다. 값은 큰따옴표로 감쌀 수 있으며
//! 따옴표 안에서는 공백과 `\"` 이스케이프가 허용됩니다.
//! `=`가 없는 토큰은 무시합니다.

use std::collections::HashMap;

use firelog_core::types::Vendor;

use super::{DLinkFields, FieldSet, ParseContext, Tokenizer, clean_line};
use crate::error::LogPipelineError;

/// 주석 마커
const COMMENT_MARKER: char = '#';

/// 위치 기반 접두 필드 수
const PREFIX_FIELDS: usize = 5;

/// D-Link 위치 필드 + key=value 토크나이저 (컨텍스트 미사용)
#[derive(Debug, Clone, Copy, Default)]
pub struct DLinkTokenizer;

impl Tokenizer for DLinkTokenizer {
    fn vendor(&self) -> Vendor {
        Vendor::DLink
    }

    fn tokenize(
        &self,
        line: &str,
        _ctx: &mut ParseContext,
    ) -> Result<Option<FieldSet>, LogPipelineError> {
        let line = clean_line(line).trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            return Ok(None);
        }

        let (prefix, rest) = split_prefix(line, PREFIX_FIELDS);
        let &[date, time, category, category_id, severity] = prefix.as_slice() else {
            return Err(LogPipelineError::InsufficientFields {
                vendor: Vendor::DLink,
                field: "prefix",
                expected: PREFIX_FIELDS,
                found: prefix.len(),
            });
        };

        Ok(Some(FieldSet::DLink(DLinkFields {
            date: date.to_owned(),
            time: time.to_owned(),
            category: category.to_owned(),
            category_id: category_id.to_owned(),
            severity: severity.to_owned(),
            attributes: parse_attributes(rest),
        })))
    }
}

/// 공백으로 구분된 앞쪽 `n`개 토큰과 나머지 문자열을 분리합니다.
///
/// `=`가 들어 있는 토큰은 속성이므로 거기서 멈추고 나머지에 남깁니다.
fn split_prefix(line: &str, n: usize) -> (Vec<&str>, &str) {
    let mut tokens = Vec::with_capacity(n);
    let mut rest = line;
    while tokens.len() < n {
        rest = rest.trim_start();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let token = &rest[..end];
        if token.is_empty() || token.contains('=') {
            break;
        }
        tokens.push(token);
        rest = &rest[end..];
    }
    (tokens, rest)
}

/// `key=value` 속성 목록을 파싱합니다.
///
/// 키는 소문자로 정규화합니다. 같은 키가 반복되면 첫 번째 값을 유지합니다.
fn parse_attributes(input: &str) -> HashMap<String, String> {
    let mut attributes = HashMap::new();
    let mut chars = input.char_indices().peekable();

    loop {
        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
        let Some(&(key_start, _)) = chars.peek() else {
            break;
        };

        let mut key_end = input.len();
        let mut has_value = false;
        while let Some(&(idx, c)) = chars.peek() {
            if c == '=' {
                key_end = idx;
                has_value = true;
                chars.next();
                break;
            }
            if c.is_whitespace() {
                key_end = idx;
                break;
            }
            chars.next();
        }

        if !has_value {
            continue;
        }

        let mut value = String::new();
        if chars.next_if(|&(_, c)| c == '"').is_some() {
            while let Some((_, c)) = chars.next() {
                match c {
                    '\\' => match chars.next_if(|&(_, n)| n == '"' || n == '\\') {
                        Some((_, escaped)) => value.push(escaped),
                        None => value.push('\\'),
                    },
                    '"' => break,
                    other => value.push(other),
                }
            }
        } else {
            while let Some((_, c)) = chars.next_if(|(_, c)| !c.is_whitespace()) {
                value.push(c);
            }
        }

        let key = &input[key_start..key_end];
        if !key.is_empty() {
            attributes
                .entry(key.to_ascii_lowercase())
                .or_insert(value);
        }
    }

    attributes
}
