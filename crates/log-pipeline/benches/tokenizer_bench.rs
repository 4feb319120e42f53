//! 토크나이저 및 레코드 빌더 벤치마크
//!
//! 벤더별 라인 토큰화, 패턴 추출, 파일 단위 파싱 처리량을 측정합니다.

use std::path::Path;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use firelog_core::config::PatternConfig;
use firelog_core::types::Vendor;
use firelog_log_pipeline::{
    IdAllocator, IngestPipeline, ParseContext, PatternLibrary, RecordBuilder, tokenizer_for,
};

const KASPERSKY_LINE: &str = "13.04.2018 20:46:19\tОбнаружена сетевая атака\tЗащита от сетевых атак\tНеизвестно\tЗапрещено: Intrusion.Win.CVE-2017-7269.cas.exploit\tTCP от 111.231.68.208 на локальный порт 80";

const TPLINK_LINE: &str =
    "20:45:07\tDHCP\tINFO\tDHCPS:Send ACK to 192.168.0.100 (aa:bb:cc:dd:ee:ff)";

const DLINK_LINE: &str = "2018-04-13 20:46:19 CONN 600004 Notice event=conn_open_natsat action=allow rule=\"lan to wan\" connipproto=TCP connrecvif=lan connsrcip=192.168.1.10 connsrcport=51432 conndestif=wan conndestip=93.184.216.34 conndestport=443 connnewsrcip=203.0.113.5 connnewsrcport=40000 connnewdestip=93.184.216.34 connnewdestport=443";

fn line_for(vendor: Vendor) -> &'static str {
    match vendor {
        Vendor::Kaspersky => KASPERSKY_LINE,
        Vendor::TpLink => TPLINK_LINE,
        Vendor::DLink => DLINK_LINE,
    }
}

fn pipeline() -> IngestPipeline {
    let patterns = PatternLibrary::new(&PatternConfig::default()).unwrap();
    IngestPipeline::new(RecordBuilder::new(
        Arc::new(patterns),
        Arc::new(IdAllocator::new()),
    ))
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    group.throughput(Throughput::Elements(1));

    for vendor in Vendor::ALL {
        let tokenizer = tokenizer_for(vendor);
        let line = line_for(vendor);
        group.bench_with_input(BenchmarkId::new("vendor", vendor), &line, |b, &line| {
            b.iter(|| {
                let mut ctx = ParseContext::new();
                tokenizer.tokenize(black_box(line), &mut ctx).unwrap()
            })
        });
    }

    group.finish();
}

fn bench_patterns(c: &mut Criterion) {
    let patterns = PatternLibrary::new(&PatternConfig::default()).unwrap();
    let text = "TCP от 111.231.68.208 на локальный порт 80 via HTTPS from aa:bb:cc:dd:ee:ff";

    let mut group = c.benchmark_group("patterns");
    group.bench_function("ipv4", |b| b.iter(|| patterns.ipv4(black_box(text)).len()));
    group.bench_function("mac", |b| b.iter(|| patterns.mac(black_box(text)).len()));
    group.bench_function("protocol", |b| {
        b.iter(|| patterns.protocol(black_box(text)).len())
    });
    group.bench_function("port", |b| b.iter(|| patterns.port(black_box(text)).len()));
    group.finish();
}

fn bench_parse_file(c: &mut Criterion) {
    let pipeline = pipeline();
    let mut group = c.benchmark_group("parse_file");

    for vendor in Vendor::ALL {
        let mut text = String::new();
        if vendor == Vendor::TpLink {
            text.push_str("#Time = 2018-04-13 20:46:19\n");
        }
        for _ in 0..1000 {
            text.push_str(line_for(vendor));
            text.push('\n');
        }

        group.throughput(Throughput::Elements(1000));
        group.bench_with_input(
            BenchmarkId::new("lines_1000", vendor),
            &text,
            |b, text| {
                b.iter(|| {
                    pipeline
                        .parse_text(vendor, Path::new("bench.log"), black_box(text))
                        .records
                        .len()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_patterns, bench_parse_file);
criterion_main!(benches);
