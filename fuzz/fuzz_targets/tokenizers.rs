#![no_main]

use arbitrary::Arbitrary;
use firelog_core::types::Vendor;
use firelog_log_pipeline::{ParseContext, tokenizer_for};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    vendor: u8,
    lines: Vec<String>,
}

fuzz_target!(|input: Input| {
    let vendor = Vendor::ALL[usize::from(input.vendor) % Vendor::ALL.len()];
    let tokenizer = tokenizer_for(vendor);
    let mut ctx = ParseContext::new();

    // 크래시나 패닉 없이 Ok 또는 Err을 반환해야 한다
    for line in &input.lines {
        if let Ok(Some(fields)) = tokenizer.tokenize(line, &mut ctx) {
            assert_eq!(fields.vendor(), vendor);
        }
    }
});
