#![no_main]

use std::sync::OnceLock;

use firelog_core::config::PatternConfig;
use firelog_log_pipeline::PatternLibrary;
use libfuzzer_sys::fuzz_target;

fn library() -> &'static PatternLibrary {
    static LIBRARY: OnceLock<PatternLibrary> = OnceLock::new();
    LIBRARY.get_or_init(|| PatternLibrary::new(&PatternConfig::default()).expect("default patterns"))
}

fuzz_target!(|text: &str| {
    let lib = library();

    let ip = lib.ipv4(text);
    if let Some(span) = lib.ipv4_span(text) {
        assert_eq!(&text[span], ip);
    } else {
        assert!(ip.is_empty());
    }

    if let Some(span) = lib.mac_span(text) {
        assert_eq!(&text[span], lib.mac(text));
    }

    let protocol = lib.protocol(text);
    assert!(protocol.is_empty() || lib.vocabulary().iter().any(|p| p == protocol));

    assert!(lib.port(text).bytes().all(|b| b.is_ascii_digit()));
});
