#![no_main]

use std::path::Path;
use std::sync::{Arc, OnceLock};

use firelog_core::config::PatternConfig;
use firelog_core::types::Vendor;
use firelog_log_pipeline::{IdAllocator, IngestPipeline, PatternLibrary, RecordBuilder};
use libfuzzer_sys::fuzz_target;

fn pipeline() -> &'static IngestPipeline {
    static PIPELINE: OnceLock<IngestPipeline> = OnceLock::new();
    PIPELINE.get_or_init(|| {
        let patterns = PatternLibrary::new(&PatternConfig::default()).expect("default patterns");
        IngestPipeline::new(RecordBuilder::new(
            Arc::new(patterns),
            Arc::new(IdAllocator::new()),
        ))
    })
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let vendor = Vendor::ALL[usize::from(selector) % Vendor::ALL.len()];
    let text = String::from_utf8_lossy(rest);

    let report = pipeline().parse_text(vendor, Path::new("fuzz.log"), &text);

    // 식별자는 파일 안에서 엄격히 증가해야 한다
    for pair in report.records.windows(2) {
        assert!(pair[0].id() < pair[1].id());
    }
    assert!(report.records.iter().all(|r| r.vendor() == vendor));
});
