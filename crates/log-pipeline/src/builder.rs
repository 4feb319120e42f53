//! 레코드 빌더와 식별자 할당기
//!
//! [`RecordBuilder`]는 토크나이저가 만든 [`FieldSet`]에 패턴 추출 결과와
//! 새 [`RecordId`]를 합쳐 [`NormalizedRecord`]를 생성합니다.
//!
//! [`IdAllocator`]는 프로세스 전체에서 하나만 존재하며 세 벤더가 공유합니다.
//! 리로드는 컬렉션만 교체하고 카운터는 되돌리지 않으므로,
//! 한 번 발급된 식별자는 다시 사용되지 않습니다.

use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use firelog_core::types::{
    DLinkRecord, KasperskyRecord, NormalizedRecord, RecordId, TpLinkRecord,
};

use crate::parser::{DLinkFields, FieldSet, KasperskyFields, TpLinkFields};
use crate::patterns::PatternLibrary;

/// DHCP로 강제 분류되는 TP-Link 이벤트 타입
const DHCP_EVENT_TYPES: &[&str] = &["DHCP", "DHCPS", "DHCPC"];

/// 단조 증가 레코드 식별자 할당기
///
/// 첫 식별자는 1입니다. 동시에 여러 벤더가 리로드해도 중복 없이 증가합니다.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// 지정한 값부터 발급하는 할당기 (테스트용)
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// 다음 식별자를 발급합니다.
    pub fn allocate(&self) -> RecordId {
        RecordId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// 다음에 발급될 식별자 (발급하지 않음)
    pub fn peek(&self) -> RecordId {
        RecordId(self.next.load(Ordering::Relaxed))
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// 필드 집합을 정규화 레코드로 변환하는 빌더
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    patterns: Arc<PatternLibrary>,
    ids: Arc<IdAllocator>,
}

impl RecordBuilder {
    pub fn new(patterns: Arc<PatternLibrary>, ids: Arc<IdAllocator>) -> Self {
        Self { patterns, ids }
    }

    /// 레코드를 생성하고 식별자를 할당합니다.
    pub fn build(&self, fields: FieldSet) -> NormalizedRecord {
        let id = self.ids.allocate();
        match fields {
            FieldSet::Kaspersky(f) => NormalizedRecord::Kaspersky(self.kaspersky(id, f)),
            FieldSet::TpLink(f) => NormalizedRecord::TpLink(self.tplink(id, f)),
            FieldSet::DLink(f) => NormalizedRecord::DLink(dlink(id, f)),
        }
    }

    fn kaspersky(&self, id: RecordId, f: KasperskyFields) -> KasperskyRecord {
        let object = f.object_attack.as_str();
        KasperskyRecord {
            id,
            ip_address: self.patterns.ipv4(object).to_owned(),
            port: self.patterns.port(object).to_owned(),
            protocol: self.patterns.protocol(object).to_owned(),
            date: f.date,
            time: f.time,
            description: f.description,
            protect_type: f.protect_type,
            application: f.application,
            result: f.result,
            object_attack: f.object_attack,
        }
    }

    fn tplink(&self, id: RecordId, f: TpLinkFields) -> TpLinkRecord {
        let content = f.log_content.as_str();
        let ip_span = self.patterns.ipv4_span(content);
        let mac_span = self.patterns.mac_span(content);

        let protocol = if is_dhcp_event(&f.type_event) {
            "DHCP"
        } else {
            self.patterns.protocol(content)
        };

        TpLinkRecord {
            id,
            ip_address: ip_span.clone().map_or_else(String::new, |s| content[s].to_owned()),
            mac_address: mac_span
                .clone()
                .map_or_else(String::new, |s| content[s].to_owned()),
            protocol: protocol.to_owned(),
            event: remove_spans(content, [ip_span, mac_span]),
            date: f.date,
            time: f.time,
            type_event: f.type_event,
            level_significance: f.level_significance,
            log_content: f.log_content,
        }
    }
}

fn dlink(id: RecordId, fields: DLinkFields) -> DLinkRecord {
    let DLinkFields {
        date,
        time,
        category,
        category_id,
        severity,
        mut attributes,
    } = fields;
    let mut take = |key: &str| attributes.remove(key).unwrap_or_default();

    DLinkRecord {
        id,
        date,
        time,
        category,
        category_id,
        severity,
        event: take("event"),
        action: take("action"),
        rule: take("rule"),
        protocol: take("connipproto"),
        src_iface: take("connrecvif"),
        dst_iface: take("conndestif"),
        src_ip: take("connsrcip"),
        src_port: take("connsrcport"),
        dst_ip: take("conndestip"),
        dst_port: take("conndestport"),
        conn_id: take("connid"),
        nat_src_ip: take("connnewsrcip"),
        nat_src_port: take("connnewsrcport"),
        nat_dst_ip: take("connnewdestip"),
        nat_dst_port: take("connnewdestport"),
        orig_sent: take("origsent"),
        term_sent: take("termsent"),
        conn_time: take("conntime"),
    }
}

fn is_dhcp_event(type_event: &str) -> bool {
    DHCP_EVENT_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(type_event.trim()))
}

/// 겹치지 않는 바이트 범위들을 텍스트에서 제거합니다. 나머지 텍스트와 공백은 그대로입니다.
fn remove_spans<const N: usize>(text: &str, spans: [Option<Range<usize>>; N]) -> String {
    let mut spans: Vec<Range<usize>> = spans.into_iter().flatten().collect();
    spans.sort_by_key(|s| s.start);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        if span.start < cursor {
            continue;
        }
        out.push_str(&text[cursor..span.start]);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use firelog_core::config::PatternConfig;

    use super::*;

    fn builder() -> RecordBuilder {
        let patterns = PatternLibrary::new(&PatternConfig::default()).unwrap();
        RecordBuilder::new(Arc::new(patterns), Arc::new(IdAllocator::new()))
    }

    fn tplink_fields(type_event: &str, content: &str) -> FieldSet {
        FieldSet::TpLink(TpLinkFields {
            date: "2018-04-13".to_owned(),
            time: "20:45:07".to_owned(),
            type_event: type_event.to_owned(),
            level_significance: "INFO".to_owned(),
            log_content: content.to_owned(),
        })
    }

    #[test]
    fn allocator_starts_at_one_and_increments() {
        let ids = IdAllocator::new();
        assert_eq!(ids.allocate(), RecordId(1));
        assert_eq!(ids.allocate(), RecordId(2));
        assert_eq!(ids.peek(), RecordId(3));
    }

    #[test]
    fn allocator_is_unique_across_threads() {
        let ids = Arc::new(IdAllocator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..1000).map(|_| ids.allocate()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<RecordId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 4000);
    }

    #[test]
    fn kaspersky_record_extracts_object_fields() {
        let record = builder().build(FieldSet::Kaspersky(KasperskyFields {
            date: "13.04.2018".to_owned(),
            time: "20:46:19".to_owned(),
            description: "Обнаружена сетевая атака".to_owned(),
            protect_type: "Защита от сетевых атак".to_owned(),
            application: "Неизвестно".to_owned(),
            result: "Запрещено".to_owned(),
            object_attack: "TCP от 111.231.68.208 на локальный порт 80".to_owned(),
        }));

        let NormalizedRecord::Kaspersky(r) = record else {
            panic!("expected kaspersky record");
        };
        assert_eq!(r.id, RecordId(1));
        assert_eq!(r.ip_address, "111.231.68.208");
        assert_eq!(r.port, "80");
        assert_eq!(r.protocol, "TCP");
        assert_eq!(r.date, "13.04.2018");
    }

    #[test]
    fn tplink_dhcp_event_forces_protocol() {
        let record = builder().build(tplink_fields("dhcps", "Send ACK over UDP to 192.168.0.100"));
        let NormalizedRecord::TpLink(r) = record else {
            panic!("expected tplink record");
        };
        assert_eq!(r.protocol, "DHCP");
    }

    #[test]
    fn tplink_other_event_runs_protocol_extractor() {
        let record = builder().build(tplink_fields("SECURITY", "blocked tcp flood from 10.0.0.9"));
        let NormalizedRecord::TpLink(r) = record else {
            panic!("expected tplink record");
        };
        assert_eq!(r.protocol, "TCP");
        assert_eq!(r.ip_address, "10.0.0.9");
    }

    #[test]
    fn tplink_event_removes_ip_and_mac_keeping_spacing() {
        let record = builder().build(tplink_fields(
            "DHCP",
            "DHCPS:Send ACK to 192.168.0.100 (aa:bb:cc:dd:ee:ff) lease",
        ));
        let NormalizedRecord::TpLink(r) = record else {
            panic!("expected tplink record");
        };
        assert_eq!(r.ip_address, "192.168.0.100");
        assert_eq!(r.mac_address, "aa:bb:cc:dd:ee:ff");
        assert_eq!(r.event, "DHCPS:Send ACK to  () lease");
        assert_eq!(
            r.log_content,
            "DHCPS:Send ACK to 192.168.0.100 (aa:bb:cc:dd:ee:ff) lease"
        );
    }

    #[test]
    fn tplink_event_without_identifiers_is_content() {
        let record = builder().build(tplink_fields("OTHER", "system started"));
        let NormalizedRecord::TpLink(r) = record else {
            panic!("expected tplink record");
        };
        assert_eq!(r.event, "system started");
        assert_eq!(r.ip_address, "");
        assert_eq!(r.mac_address, "");
        assert_eq!(r.protocol, "");
    }

    #[test]
    fn tplink_event_removes_only_first_ip() {
        let record = builder().build(tplink_fields("OTHER", "1.1.1.1 -> 2.2.2.2"));
        let NormalizedRecord::TpLink(r) = record else {
            panic!("expected tplink record");
        };
        assert_eq!(r.event, " -> 2.2.2.2");
    }

    #[test]
    fn dlink_attributes_map_to_record_fields() {
        let attributes: HashMap<String, String> = [
            ("event", "conn_open_natsat"),
            ("connipproto", "TCP"),
            ("connsrcip", "192.168.1.10"),
            ("connnewsrcip", "203.0.113.5"),
            ("connnewsrcport", "40000"),
            ("conntime", "12"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        let record = builder().build(FieldSet::DLink(DLinkFields {
            date: "2018-04-13".to_owned(),
            time: "20:46:19".to_owned(),
            category: "CONN".to_owned(),
            category_id: "600004".to_owned(),
            severity: "Notice".to_owned(),
            attributes,
        }));

        let NormalizedRecord::DLink(r) = record else {
            panic!("expected dlink record");
        };
        assert_eq!(r.event, "conn_open_natsat");
        assert_eq!(r.protocol, "TCP");
        assert_eq!(r.src_ip, "192.168.1.10");
        assert_eq!(r.src_port, "");
        assert_eq!(r.nat_src_ip, "203.0.113.5");
        assert_eq!(r.nat_src_port, "40000");
        assert_eq!(r.conn_time, "12");
        assert_eq!(r.category_id, "600004");
    }

    #[test]
    fn ids_increase_across_vendors() {
        let b = builder();
        let first = b.build(tplink_fields("OTHER", "a"));
        let second = b.build(FieldSet::DLink(DLinkFields::default()));
        let third = b.build(FieldSet::Kaspersky(KasperskyFields::default()));
        assert!(first.id() < second.id());
        assert!(second.id() < third.id());
    }

    #[test]
    fn remove_spans_handles_out_of_order_and_missing() {
        assert_eq!(remove_spans("abcdef", [Some(4..5), Some(0..1)]), "bcdf");
        assert_eq!(remove_spans("abcdef", [None, Some(2..4)]), "abef");
        assert_eq!(remove_spans("abc", [None, None]), "abc");
    }
}
