//! Kaspersky 방화벽 로그 토크나이저
//!
//! # 라인 형식
//! ```text
//! <date> <time>\t<description>\t<protect type>\t<application>\t<result>\t<object attack>
//! ```
//!
//! 예:
//! ```text
//! 13.04.2018 20:46:19	Обнаружена сетевая атака	Защита от сетевых атак	Неизвестно	Запрещено: Intrusion.Win.CVE-2017-7269.cas.exploit	TCP от 111.231.68.208 на локальный порт 80
//! ```
//!
//! 6번째 컬럼 이후의 탭은 object attack 텍스트에 그대로 포함됩니다.

use firelog_core::types::Vendor;

use super::{FieldSet, KasperskyFields, ParseContext, Tokenizer, clean_line};
use crate::error::LogPipelineError;

/// 필수 탭 컬럼 수
const COLUMNS: usize = 6;

/// Kaspersky 탭 구분 6컬럼 토크나이저 (컨텍스트 미사용)
#[derive(Debug, Clone, Copy, Default)]
pub struct KasperskyTokenizer;

impl Tokenizer for KasperskyTokenizer {
    fn vendor(&self) -> Vendor {
        Vendor::Kaspersky
    }

    fn tokenize(
        &self,
        line: &str,
        _ctx: &mut ParseContext,
    ) -> Result<Option<FieldSet>, LogPipelineError> {
        let line = clean_line(line);
        if line.trim().is_empty() {
            return Ok(None);
        }

        let columns: Vec<&str> = line.splitn(COLUMNS, '\t').collect();
        let &[
            timestamp,
            description,
            protect_type,
            application,
            result,
            object_attack,
        ] = columns.as_slice()
        else {
            return Err(LogPipelineError::InsufficientFields {
                vendor: Vendor::Kaspersky,
                field: "line",
                expected: COLUMNS,
                found: columns.len(),
            });
        };

        let mut parts = timestamp.split_whitespace();
        let (Some(date), Some(time)) = (parts.next(), parts.next()) else {
            return Err(LogPipelineError::InsufficientFields {
                vendor: Vendor::Kaspersky,
                field: "timestamp",
                expected: 2,
                found: timestamp.split_whitespace().count(),
            });
        };

        Ok(Some(FieldSet::Kaspersky(KasperskyFields {
            date: date.to_owned(),
            time: time.to_owned(),
            description: description.trim().to_owned(),
            protect_type: protect_type.trim().to_owned(),
            application: application.trim().to_owned(),
            result: result.trim().to_owned(),
            object_attack: object_attack.trim().to_owned(),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "13.04.2018 20:46:19\tОбнаружена сетевая атака\tЗащита от сетевых атак\tНеизвестно\tЗапрещено: Intrusion.Win.CVE-2017-7269.cas.exploit\tTCP от 111.231.68.208 на локальный порт 80";

    fn tokenize(line: &str) -> Result<Option<FieldSet>, LogPipelineError> {
        KasperskyTokenizer.tokenize(line, &mut ParseContext::new())
    }

    fn fields(line: &str) -> KasperskyFields {
        match tokenize(line).unwrap() {
            Some(FieldSet::Kaspersky(f)) => f,
            other => panic!("expected kaspersky fields, got {other:?}"),
        }
    }

    #[test]
    fn tokenize_sample_line() {
        let f = fields(SAMPLE);
        assert_eq!(f.date, "13.04.2018");
        assert_eq!(f.time, "20:46:19");
        assert_eq!(f.description, "Обнаружена сетевая атака");
        assert_eq!(f.protect_type, "Защита от сетевых атак");
        assert_eq!(f.application, "Неизвестно");
        assert_eq!(
            f.result,
            "Запрещено: Intrusion.Win.CVE-2017-7269.cas.exploit"
        );
        assert_eq!(f.object_attack, "TCP от 111.231.68.208 на локальный порт 80");
    }

    #[test]
    fn five_fields_are_rejected() {
        let line = "13.04.2018 20:46:19\ta\tb\tc\td";
        let err = tokenize(line).unwrap_err();
        assert!(matches!(
            err,
            LogPipelineError::InsufficientFields {
                field: "line",
                expected: 6,
                found: 5,
                ..
            }
        ));
    }

    #[test]
    fn extra_tabs_fold_into_object_attack() {
        let f = fields("13.04.2018 20:46:19\ta\tb\tc\td\tTCP from 1.2.3.4\textra");
        assert_eq!(f.object_attack, "TCP from 1.2.3.4\textra");
    }

    #[test]
    fn empty_trailing_column_is_kept() {
        let f = fields("13.04.2018 20:46:19\ta\tb\tc\td\t");
        assert_eq!(f.object_attack, "");
    }

    #[test]
    fn timestamp_without_time_is_rejected() {
        let err = tokenize("13.04.2018\ta\tb\tc\td\te").unwrap_err();
        assert!(matches!(
            err,
            LogPipelineError::InsufficientFields {
                field: "timestamp",
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn bom_and_crlf_are_stripped() {
        let f = fields(&format!("\u{feff}{SAMPLE}\r"));
        assert_eq!(f.date, "13.04.2018");
        assert!(f.object_attack.ends_with("80"));
    }

    #[test]
    fn blank_line_is_skipped() {
        assert!(tokenize("").unwrap().is_none());
        assert!(tokenize("\t\t").unwrap().is_none());
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn tokenize_arbitrary_text_does_not_panic(line in "\\PC{0,400}") {
                let _ = tokenize(&line);
            }

            #[test]
            fn fewer_than_six_columns_always_rejected(cols in prop::collection::vec("[a-z ]{1,10}", 1..6)) {
                let line = cols.join("\t");
                prop_assume!(!line.trim().is_empty());
                let result = tokenize(&line);
                let is_insufficient = matches!(result, Err(LogPipelineError::InsufficientFields { .. }));
                prop_assert!(is_insufficient);
            }
        }
    }
}
