//! 도메인 타입 — 벤더, 레코드 식별자, 정규화된 레코드
//!
//! 세 방화벽 벤더의 로그 라인은 각기 다른 문법을 가지지만, 파싱 결과는
//! 모두 [`NormalizedRecord`]로 통합됩니다. JSON 표현은 기존 API와 같이
//! `firewallType` 태그와 camelCase 필드명을 사용합니다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 방화벽 로그 벤더
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// 안티바이러스 내장 방화벽 (탭 구분 6컬럼)
    Kaspersky,
    /// 가정용 라우터 (헤더 + 탭 구분 데이터 라인)
    #[serde(rename = "tplink")]
    TpLink,
    /// 게이트웨이 어플라이언스 (위치 필드 + key=value)
    #[serde(rename = "dlink")]
    DLink,
}

impl Vendor {
    /// 모든 벤더 (고정 순서)
    pub const ALL: [Vendor; 3] = [Vendor::Kaspersky, Vendor::TpLink, Vendor::DLink];

    /// URL 경로, 설정 키, 메트릭 레이블에 쓰이는 소문자 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kaspersky => "kaspersky",
            Self::TpLink => "tplink",
            Self::DLink => "dlink",
        }
    }

    /// JSON `firewallType` 값
    pub fn firewall_type(&self) -> &'static str {
        match self {
            Self::Kaspersky => "Kaspersky",
            Self::TpLink => "TPLink",
            Self::DLink => "DLink",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 알 수 없는 벤더 이름
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vendor '{0}', expected one of: kaspersky, tplink, dlink")]
pub struct UnknownVendor(pub String);

impl FromStr for Vendor {
    type Err = UnknownVendor;

    /// 대소문자를 구분하지 않습니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kaspersky" => Ok(Self::Kaspersky),
            "tplink" | "tp-link" => Ok(Self::TpLink),
            "dlink" | "d-link" => Ok(Self::DLink),
            _ => Err(UnknownVendor(s.to_owned())),
        }
    }
}

/// 레코드 식별자
///
/// 프로세스 전체에서 유일하며 발급 순서대로 단조 증가합니다.
/// 리로드로 컬렉션이 교체되어도 재사용되지 않습니다.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// 내부 정수값
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Kaspersky 방화벽 레코드
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KasperskyRecord {
    pub id: RecordId,
    pub date: String,
    pub time: String,
    /// 이벤트 설명
    pub description: String,
    /// 보호 구성요소
    pub protect_type: String,
    pub application: String,
    /// 처리 결과 (차단/허용 + 탐지명)
    pub result: String,
    /// 공격 대상 원문 (프로토콜, IP, 포트 추출 원본)
    pub object_attack: String,
    pub port: String,
    pub protocol: String,
    pub ip_address: String,
}

/// TP-Link 라우터 레코드
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TpLinkRecord {
    pub id: RecordId,
    pub date: String,
    pub time: String,
    pub type_event: String,
    pub level_significance: String,
    /// 원본 로그 내용
    pub log_content: String,
    pub mac_address: String,
    pub ip_address: String,
    pub protocol: String,
    /// IP/MAC을 제거한 로그 내용
    pub event: String,
}

/// D-Link 게이트웨이 레코드
///
/// key=value 속성 중 라인에 없는 키는 빈 문자열로 남습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DLinkRecord {
    pub id: RecordId,
    pub date: String,
    pub time: String,
    pub category: String,
    pub category_id: String,
    pub severity: String,
    pub event: String,
    pub action: String,
    pub rule: String,
    pub protocol: String,
    pub src_iface: String,
    pub dst_iface: String,
    pub src_ip: String,
    pub src_port: String,
    pub dst_ip: String,
    pub dst_port: String,
    pub conn_id: String,
    pub nat_src_ip: String,
    pub nat_src_port: String,
    pub nat_dst_ip: String,
    pub nat_dst_port: String,
    pub orig_sent: String,
    pub term_sent: String,
    pub conn_time: String,
}

/// 벤더별 레코드를 감싸는 정규화 레코드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "firewallType")]
pub enum NormalizedRecord {
    #[serde(rename = "Kaspersky")]
    Kaspersky(KasperskyRecord),
    #[serde(rename = "TPLink")]
    TpLink(TpLinkRecord),
    #[serde(rename = "DLink")]
    DLink(DLinkRecord),
}

impl NormalizedRecord {
    pub fn id(&self) -> RecordId {
        match self {
            Self::Kaspersky(r) => r.id,
            Self::TpLink(r) => r.id,
            Self::DLink(r) => r.id,
        }
    }

    pub fn vendor(&self) -> Vendor {
        match self {
            Self::Kaspersky(_) => Vendor::Kaspersky,
            Self::TpLink(_) => Vendor::TpLink,
            Self::DLink(_) => Vendor::DLink,
        }
    }

    pub fn date(&self) -> &str {
        match self {
            Self::Kaspersky(r) => &r.date,
            Self::TpLink(r) => &r.date,
            Self::DLink(r) => &r.date,
        }
    }

    pub fn time(&self) -> &str {
        match self {
            Self::Kaspersky(r) => &r.time,
            Self::TpLink(r) => &r.time,
            Self::DLink(r) => &r.time,
        }
    }

    /// 식별자를 제외한 필드가 같은지 비교합니다.
    ///
    /// 같은 내용을 두 번 로드하면 필드는 같고 식별자만 달라집니다.
    pub fn same_content(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Kaspersky(a), Self::Kaspersky(b)) => {
                KasperskyRecord { id: b.id, ..a.clone() } == *b
            }
            (Self::TpLink(a), Self::TpLink(b)) => TpLinkRecord { id: b.id, ..a.clone() } == *b,
            (Self::DLink(a), Self::DLink(b)) => DLinkRecord { id: b.id, ..a.clone() } == *b,
            _ => false,
        }
    }
}

impl fmt::Display for NormalizedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}#{}] {} {}",
            self.vendor(),
            self.id(),
            self.date(),
            self.time(),
        )
    }
}
