//! 추출 패턴 라이브러리
//!
//! [`PatternLibrary`]는 모든 벤더 파서가 공유하는 정규식 추출기를 한 번만 컴파일하여 보관합니다.
//! 생성 이후에는 불변이며 `Arc`로 공유해 여러 리로드에서 동시에 읽을 수 있습니다.
//!
//! # 추출기
//! - [`ipv4`](PatternLibrary::ipv4): 옥텟 0-255 점 표기 IPv4, 가장 왼쪽 일치
//! - [`mac`](PatternLibrary::mac): `:` 또는 `-` 구분 MAC 주소, 가장 왼쪽 일치
//! - [`protocol`](PatternLibrary::protocol): 어휘 목록 기반 프로토콜 이름
//! - [`port`](PatternLibrary::port): 포트 레이블 뒤의 숫자
//!
//! 모든 추출기는 일치하지 않으면 빈 문자열을 반환합니다.
//!
//! # 프로토콜 우선순위
//! 텍스트에 여러 어휘 항목이 등장하면 **어휘 목록에서 먼저 나오는 항목**이 선택됩니다.
//! 텍스트 내 위치는 고려하지 않습니다. 기본 어휘에서 `HTTPS`가 `HTTP`보다 앞에 있으므로
//! 두 단어가 모두 있는 텍스트는 `HTTPS`가 됩니다.

use std::ops::Range;

use firelog_core::config::PatternConfig;
use regex::{Regex, RegexSet};

use crate::error::LogPipelineError;

/// 옥텟 하나 (0-255)
const OCTET: &str = r"(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])";

/// MAC 주소 (구분자는 한 주소 안에서 일관되어야 함)
const MAC_PATTERN: &str =
    r"(?i)\b(?:(?:[0-9a-f]{2}:){5}[0-9a-f]{2}|(?:[0-9a-f]{2}-){5}[0-9a-f]{2})\b";

/// 미리 컴파일된 추출 패턴 모음
#[derive(Debug)]
pub struct PatternLibrary {
    ipv4: Regex,
    mac: Regex,
    protocols: RegexSet,
    vocabulary: Vec<String>,
    /// 레이블이 하나도 없으면 `None` (항상 빈 문자열)
    port: Option<Regex>,
}

impl PatternLibrary {
    /// 설정의 어휘 목록과 포트 레이블로 패턴을 컴파일합니다.
    ///
    /// 어휘와 레이블은 정규식 이스케이프되므로 `802.1X` 같은 항목도 문자 그대로 일치합니다.
    pub fn new(config: &PatternConfig) -> Result<Self, LogPipelineError> {
        let ipv4 = Regex::new(&format!(r"\b{OCTET}(?:\.{OCTET}){{3}}\b"))?;
        let mac = Regex::new(MAC_PATTERN)?;

        let vocabulary: Vec<String> = config
            .protocols
            .iter()
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty())
            .collect();
        if vocabulary.is_empty() {
            return Err(LogPipelineError::Config {
                field: "patterns.protocols".to_owned(),
                reason: "protocol vocabulary must not be empty".to_owned(),
            });
        }
        let protocols = RegexSet::new(
            vocabulary
                .iter()
                .map(|p| format!(r"(?i)\b{}\b", regex::escape(p))),
        )?;

        let labels: Vec<String> = config
            .port_labels
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(regex::escape)
            .collect();
        let port = if labels.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(
                r"(?i)\b(?:{})\s+([0-9]+)\b",
                labels.join("|")
            ))?)
        };

        Ok(Self {
            ipv4,
            mac,
            protocols,
            vocabulary,
            port,
        })
    }

    /// 첫 번째 IPv4 주소를 반환합니다. `999.1.2.3` 같은 범위 밖 옥텟은 거부됩니다.
    pub fn ipv4<'t>(&self, text: &'t str) -> &'t str {
        self.ipv4_span(text).map_or("", |span| &text[span])
    }

    /// 첫 번째 IPv4 주소의 바이트 범위
    pub fn ipv4_span(&self, text: &str) -> Option<Range<usize>> {
        self.ipv4.find(text).map(|m| m.range())
    }

    /// 첫 번째 MAC 주소를 반환합니다.
    pub fn mac<'t>(&self, text: &'t str) -> &'t str {
        self.mac_span(text).map_or("", |span| &text[span])
    }

    /// 첫 번째 MAC 주소의 바이트 범위
    pub fn mac_span(&self, text: &str) -> Option<Range<usize>> {
        self.mac.find(text).map(|m| m.range())
    }

    /// 어휘 순서상 가장 앞선 프로토콜 이름을 어휘 표기 그대로 반환합니다.
    pub fn protocol(&self, text: &str) -> &str {
        self.protocols
            .matches(text)
            .iter()
            .next()
            .and_then(|idx| self.vocabulary.get(idx))
            .map_or("", String::as_str)
    }

    /// 포트 레이블 바로 뒤의 숫자를 반환합니다.
    ///
    /// 레이블이 없거나 뒤따르는 값이 숫자가 아니면 빈 문자열입니다.
    pub fn port<'t>(&self, text: &'t str) -> &'t str {
        self.port
            .as_ref()
            .and_then(|re| re.captures(text))
            .and_then(|caps| caps.get(1))
            .map_or("", |m| m.as_str())
    }

    /// 컴파일된 프로토콜 어휘 (우선순위 순)
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> PatternLibrary {
        PatternLibrary::new(&PatternConfig::default()).unwrap()
    }

    fn library_with(protocols: &[&str], labels: &[&str]) -> PatternLibrary {
        let config = PatternConfig {
            protocols: protocols.iter().map(|s| (*s).to_owned()).collect(),
            port_labels: labels.iter().map(|s| (*s).to_owned()).collect(),
        };
        PatternLibrary::new(&config).unwrap()
    }

    #[test]
    fn ipv4_accepts_valid_address() {
        assert_eq!(library().ipv4("from 192.168.1.10 to host"), "192.168.1.10");
    }

    #[test]
    fn ipv4_rejects_out_of_range_octet() {
        let lib = library();
        assert_eq!(lib.ipv4("999.1.2.3"), "");
        assert_eq!(lib.ipv4("10.0.0.256"), "");
    }

    #[test]
    fn ipv4_returns_leftmost_valid_match() {
        let lib = library();
        assert_eq!(lib.ipv4("999.1.2.3 then 10.0.0.1 then 10.0.0.2"), "10.0.0.1");
    }

    #[test]
    fn ipv4_boundaries() {
        let lib = library();
        assert_eq!(lib.ipv4("0.0.0.0"), "0.0.0.0");
        assert_eq!(lib.ipv4("255.255.255.255"), "255.255.255.255");
        assert_eq!(lib.ipv4("1.2.3"), "");
    }

    #[test]
    fn ipv4_inside_kaspersky_object_text() {
        let lib = library();
        assert_eq!(
            lib.ipv4("TCP от 111.231.68.208 на локальный порт 80"),
            "111.231.68.208"
        );
    }

    #[test]
    fn mac_accepts_colon_and_hyphen() {
        let lib = library();
        assert_eq!(lib.mac("client aa:bb:cc:dd:ee:ff joined"), "aa:bb:cc:dd:ee:ff");
        assert_eq!(lib.mac("client AA-BB-CC-DD-EE-FF joined"), "AA-BB-CC-DD-EE-FF");
    }

    #[test]
    fn mac_rejects_mixed_delimiters() {
        assert_eq!(library().mac("aa:bb-cc:dd-ee:ff"), "");
    }

    #[test]
    fn mac_missing_returns_empty() {
        assert_eq!(library().mac("no hardware address here"), "");
    }

    #[test]
    fn protocol_prefers_vocabulary_order_over_text_order() {
        let lib = library();
        assert_eq!(lib.protocol("GET over HTTP then HTTPS"), "HTTPS");
        assert_eq!(lib.protocol("udp packet then tcp packet"), "TCP");
    }

    #[test]
    fn protocol_is_case_insensitive_and_canonical() {
        assert_eq!(library().protocol("incoming dhcp request"), "DHCP");
    }

    #[test]
    fn protocol_requires_whole_word() {
        let lib = library();
        assert_eq!(lib.protocol("HTTPSERVER started"), "");
        assert_eq!(lib.protocol("STCP"), "");
    }

    #[test]
    fn protocol_custom_vocabulary_order() {
        let lib = library_with(&["HTTP", "HTTPS"], &["port"]);
        assert_eq!(lib.protocol("HTTPS and HTTP"), "HTTP");
        assert_eq!(lib.protocol("only HTTPS"), "HTTPS");
    }

    #[test]
    fn protocol_vocabulary_is_escaped() {
        let lib = library_with(&["802.1X"], &["port"]);
        assert_eq!(lib.protocol("802.1X auth"), "802.1X");
        assert_eq!(lib.protocol("802a1X auth"), "");
    }

    #[test]
    fn empty_vocabulary_is_rejected() {
        let config = PatternConfig {
            protocols: vec!["  ".to_owned()],
            port_labels: vec!["port".to_owned()],
        };
        assert!(matches!(
            PatternLibrary::new(&config),
            Err(LogPipelineError::Config { .. })
        ));
    }

    #[test]
    fn port_after_russian_label() {
        assert_eq!(
            library().port("TCP от 111.231.68.208 на локальный порт 80"),
            "80"
        );
    }

    #[test]
    fn port_after_english_label_case_insensitive() {
        assert_eq!(library().port("UDP to local Port 5353"), "5353");
    }

    #[test]
    fn port_non_numeric_suffix_is_empty() {
        let lib = library();
        assert_eq!(lib.port("local port http"), "");
        assert_eq!(lib.port("local port 80abc"), "");
    }

    #[test]
    fn port_missing_label_is_empty() {
        assert_eq!(library().port("TCP from 1.2.3.4 80"), "");
    }

    #[test]
    fn port_label_must_be_a_word() {
        assert_eq!(library().port("export 22"), "");
    }

    #[test]
    fn no_port_labels_always_empty() {
        let lib = library_with(&["TCP"], &[]);
        assert_eq!(lib.port("port 80"), "");
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn extractors_never_panic(text in "\\PC{0,300}") {
                let lib = library();
                let _ = lib.ipv4(&text);
                let _ = lib.mac(&text);
                let _ = lib.protocol(&text);
                let _ = lib.port(&text);
            }

            #[test]
            fn ipv4_round_trips_valid_addresses(a in 0u8..=255, b in 0u8..=255, c in 0u8..=255, d in 0u8..=255) {
                let lib = library();
                let addr = format!("{a}.{b}.{c}.{d}");
                let text = format!("src {addr} dst");
                prop_assert_eq!(lib.ipv4(&text), addr.as_str());
            }

            #[test]
            fn port_extracts_any_number(port in 0u32..1_000_000) {
                let lib = library();
                let text = format!("на локальный порт {port}");
                let expected = port.to_string();
                prop_assert_eq!(lib.port(&text), expected.as_str());
            }
        }
    }
}
