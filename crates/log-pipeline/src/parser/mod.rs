//! 벤더별 로그 토크나이저
//!
//! 각 벤더의 라인 문법을 [`Tokenizer`] trait 하나로 표현합니다.
//! 토크나이저는 원시 라인과 파일 단위 [`ParseContext`]를 받아 세 가지 결과 중 하나를 돌려줍니다.
//!
//! - `Ok(Some(fields))`: 레코드가 될 필드 집합
//! - `Ok(None)`: 빈 줄, 헤더, 주석 (조용히 건너뜀)
//! - `Err(_)`: 문법 위반 (건너뛰고 파싱 실패로 집계)
//!
//! 패턴 추출(IP, MAC, 프로토콜, 포트)은 토크나이저가 아니라
//! [`RecordBuilder`](crate::builder::RecordBuilder)에서 수행합니다.
//!
//! # 사용 예시
//! ```ignore
//! use firelog_core::types::Vendor;
//! use firelog_log_pipeline::parser::{tokenizer_for, ParseContext};
//!
//! let tokenizer = tokenizer_for(Vendor::TpLink);
//! let mut ctx = ParseContext::new();
//! assert!(tokenizer.tokenize("#Time = 2018-04-13 20:46:19", &mut ctx)?.is_none());
//! let fields = tokenizer.tokenize("20:46:19\tDHCP\tINFO\tDHCPS:Send ACK", &mut ctx)?;
//! ```

pub mod context;
pub mod dlink;
pub mod kaspersky;
pub mod tplink;

use std::collections::HashMap;

pub use context::ParseContext;
pub use dlink::DLinkTokenizer;
pub use kaspersky::KasperskyTokenizer;
pub use tplink::TpLinkTokenizer;

use firelog_core::types::Vendor;

use crate::error::LogPipelineError;

/// UTF-8 BOM
const BOM: char = '\u{feff}';

/// 한 라인을 벤더 문법에 따라 필드 집합으로 분해하는 토크나이저
pub trait Tokenizer: Send + Sync {
    /// 이 토크나이저가 처리하는 벤더
    fn vendor(&self) -> Vendor;

    /// 라인 하나를 토큰화합니다.
    fn tokenize(
        &self,
        line: &str,
        ctx: &mut ParseContext,
    ) -> Result<Option<FieldSet>, LogPipelineError>;
}

/// 벤더 태그로 토크나이저를 선택합니다.
pub fn tokenizer_for(vendor: Vendor) -> Box<dyn Tokenizer> {
    match vendor {
        Vendor::Kaspersky => Box::new(KasperskyTokenizer),
        Vendor::TpLink => Box::new(TpLinkTokenizer),
        Vendor::DLink => Box::new(DLinkTokenizer),
    }
}

/// 토크나이저 출력
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSet {
    Kaspersky(KasperskyFields),
    TpLink(TpLinkFields),
    DLink(DLinkFields),
}

impl FieldSet {
    pub fn vendor(&self) -> Vendor {
        match self {
            Self::Kaspersky(_) => Vendor::Kaspersky,
            Self::TpLink(_) => Vendor::TpLink,
            Self::DLink(_) => Vendor::DLink,
        }
    }
}

/// Kaspersky 6컬럼 필드
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KasperskyFields {
    pub date: String,
    pub time: String,
    pub description: String,
    pub protect_type: String,
    pub application: String,
    pub result: String,
    /// IP, 포트, 프로토콜 추출 대상
    pub object_attack: String,
}

/// TP-Link 데이터 라인 필드
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TpLinkFields {
    pub date: String,
    pub time: String,
    pub type_event: String,
    pub level_significance: String,
    /// IP, MAC, 프로토콜 추출 대상
    pub log_content: String,
}

/// D-Link 위치 필드와 key=value 속성
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DLinkFields {
    pub date: String,
    pub time: String,
    pub category: String,
    pub category_id: String,
    pub severity: String,
    /// 소문자 키 -> 값 (같은 키가 반복되면 첫 값 유지)
    pub attributes: HashMap<String, String>,
}

impl DLinkFields {
    /// 속성 값을 조회합니다. 없는 키는 빈 문자열입니다.
    pub fn attr(&self, key: &str) -> &str {
        self.attributes.get(key).map_or("", String::as_str)
    }
}

/// 선행 BOM과 줄 끝 CR/LF를 제거합니다. 빈 마지막 컬럼을 보존하기 위해 탭은 남깁니다.
pub(crate) fn clean_line(line: &str) -> &str {
    line.trim_start_matches(BOM).trim_end_matches(['\r', '\n'])
}
