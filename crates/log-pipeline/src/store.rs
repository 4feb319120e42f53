//! 벤더별 레코드 저장소
//!
//! [`RecordStore`]는 벤더마다 하나의 [`RecordCollection`]을 보관합니다.
//! 컬렉션은 [`ArcSwap`]으로 감싸져 있어 읽기는 잠금 없이 스냅샷을 얻고,
//! 리로드는 새 컬렉션을 완성한 뒤 포인터 한 번으로 교체합니다.
//! 독자는 항상 교체 전 전체 또는 교체 후 전체만 보게 됩니다.
//!
//! 같은 벤더의 리로드는 벤더별 [`tokio::sync::Mutex`]로 직렬화되고,
//! 서로 다른 벤더는 동시에 리로드할 수 있습니다.
//! 리로드가 실패하면 이전 컬렉션이 그대로 유지됩니다.
//!
//! # 사용 예시
//! ```ignore
//! let store = RecordStoreBuilder::new()
//!     .sources(config.sources.clone())
//!     .patterns(config.patterns.clone())
//!     .build()?;
//!
//! let summary = store.reload(Vendor::Kaspersky).await?;
//! let all = store.get_all(Vendor::Kaspersky);
//! let one = store.get_by_id(Vendor::Kaspersky, RecordId(1));
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use firelog_core::config::{FirelogConfig, PatternConfig, SourcesConfig};
use firelog_core::metrics as m;
use firelog_core::types::{NormalizedRecord, RecordId, Vendor};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::builder::{IdAllocator, RecordBuilder};
use crate::error::LogPipelineError;
use crate::ingest::{IngestPipeline, LoadReport, ParseFailure};
use crate::patterns::PatternLibrary;

/// 리로드 요약에 포함할 최대 실패 라인 수
const MAX_REPORTED_FAILURES: usize = 100;

/// 한 벤더의 레코드 컬렉션 (불변 스냅샷)
#[derive(Debug, Clone)]
pub struct RecordCollection {
    vendor: Vendor,
    records: Vec<NormalizedRecord>,
    index: HashMap<RecordId, usize>,
    failures: Vec<ParseFailure>,
    files: usize,
    loaded_at: Option<DateTime<Utc>>,
}

impl RecordCollection {
    /// 아직 적재되지 않은 빈 컬렉션
    pub fn empty(vendor: Vendor) -> Self {
        Self {
            vendor,
            records: Vec::new(),
            index: HashMap::new(),
            failures: Vec::new(),
            files: 0,
            loaded_at: None,
        }
    }

    /// 적재 결과로 컬렉션을 만듭니다. 레코드 순서는 그대로 유지됩니다.
    pub fn from_report(report: LoadReport) -> Self {
        let index = report
            .records
            .iter()
            .enumerate()
            .map(|(pos, record)| (record.id(), pos))
            .collect();

        Self {
            vendor: report.vendor,
            records: report.records,
            index,
            failures: report.failures,
            files: report.files,
            loaded_at: Some(Utc::now()),
        }
    }

    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    /// 파일 순서 -> 라인 순서의 레코드
    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&NormalizedRecord> {
        self.index.get(&id).and_then(|&pos| self.records.get(pos))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 마지막 적재에서 건너뛴 라인
    pub fn failures(&self) -> &[ParseFailure] {
        &self.failures
    }

    pub fn files(&self) -> usize {
        self.files
    }

    /// 적재 시각 (한 번도 적재되지 않았으면 `None`)
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }
}

/// 리로드 결과 요약 (HTTP 응답 본문)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadSummary {
    pub vendor: Vendor,
    pub files: usize,
    pub records: usize,
    pub failure_count: usize,
    /// 앞쪽 일부 실패 라인
    pub failures: Vec<ParseFailure>,
    pub first_id: Option<RecordId>,
    pub last_id: Option<RecordId>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub duration_ms: u64,
}

impl ReloadSummary {
    fn from_collection(collection: &RecordCollection, duration_ms: u64) -> Self {
        Self {
            vendor: collection.vendor,
            files: collection.files,
            records: collection.len(),
            failure_count: collection.failures.len(),
            failures: collection
                .failures
                .iter()
                .take(MAX_REPORTED_FAILURES)
                .cloned()
                .collect(),
            first_id: collection.records.first().map(NormalizedRecord::id),
            last_id: collection.records.last().map(NormalizedRecord::id),
            loaded_at: collection.loaded_at,
            duration_ms,
        }
    }
}

/// 벤더 하나의 저장 슬롯
#[derive(Debug)]
struct VendorSlot {
    dir: PathBuf,
    current: ArcSwap<RecordCollection>,
    reload_lock: Mutex<()>,
}

impl VendorSlot {
    fn new(vendor: Vendor, dir: PathBuf) -> Self {
        Self {
            dir,
            current: ArcSwap::from_pointee(RecordCollection::empty(vendor)),
            reload_lock: Mutex::new(()),
        }
    }
}

/// 세 벤더의 레코드 컬렉션 저장소
#[derive(Debug)]
pub struct RecordStore {
    kaspersky: VendorSlot,
    tplink: VendorSlot,
    dlink: VendorSlot,
    ingest: IngestPipeline,
}

impl RecordStore {
    fn slot(&self, vendor: Vendor) -> &VendorSlot {
        match vendor {
            Vendor::Kaspersky => &self.kaspersky,
            Vendor::TpLink => &self.tplink,
            Vendor::DLink => &self.dlink,
        }
    }

    /// 현재 컬렉션 스냅샷을 반환합니다. 이후 리로드의 영향을 받지 않습니다.
    pub fn get_all(&self, vendor: Vendor) -> Arc<RecordCollection> {
        self.slot(vendor).current.load_full()
    }

    /// 식별자로 레코드를 조회합니다.
    pub fn get_by_id(&self, vendor: Vendor, id: RecordId) -> Option<NormalizedRecord> {
        self.slot(vendor).current.load().get(id).cloned()
    }

    /// 벤더의 소스 디렉토리
    pub fn source_dir(&self, vendor: Vendor) -> &Path {
        &self.slot(vendor).dir
    }

    /// 벤더 디렉토리를 다시 파싱하고 컬렉션을 원자적으로 교체합니다.
    ///
    /// 파싱은 어떤 읽기 잠금도 잡지 않은 채 수행됩니다.
    /// 라인 단위 실패가 있어도 유효한 레코드는 커밋됩니다.
    ///
    /// # Errors
    /// 디렉토리나 파일을 읽을 수 없으면 에러를 반환하고 이전 컬렉션을 유지합니다.
    pub async fn reload(&self, vendor: Vendor) -> Result<ReloadSummary, LogPipelineError> {
        let slot = self.slot(vendor);
        let _guard = slot.reload_lock.lock().await;
        let started = Instant::now();

        let result = self.ingest.load_directory(vendor, &slot.dir).await;
        let elapsed = started.elapsed();

        metrics::histogram!(m::RELOAD_DURATION_SECONDS, m::LABEL_VENDOR => vendor.as_str())
            .record(elapsed.as_secs_f64());

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                metrics::counter!(
                    m::RELOADS_TOTAL,
                    m::LABEL_VENDOR => vendor.as_str(),
                    m::LABEL_RESULT => "failure"
                )
                .increment(1);
                tracing::warn!(
                    vendor = %vendor,
                    dir = %slot.dir.display(),
                    error = %e,
                    "reload failed, keeping previous collection"
                );
                return Err(e);
            }
        };

        let collection = Arc::new(RecordCollection::from_report(report));
        let summary = ReloadSummary::from_collection(&collection, elapsed.as_millis() as u64);

        metrics::gauge!(m::RECORDS_LOADED, m::LABEL_VENDOR => vendor.as_str())
            .set(collection.len() as f64);
        metrics::counter!(m::FILES_READ_TOTAL, m::LABEL_VENDOR => vendor.as_str())
            .increment(collection.files() as u64);
        metrics::counter!(m::PARSE_FAILURES_TOTAL, m::LABEL_VENDOR => vendor.as_str())
            .increment(collection.failures().len() as u64);
        metrics::counter!(
            m::RELOADS_TOTAL,
            m::LABEL_VENDOR => vendor.as_str(),
            m::LABEL_RESULT => "success"
        )
        .increment(1);

        let previous = slot.current.swap(collection);

        tracing::info!(
            vendor = %vendor,
            records = summary.records,
            failures = summary.failure_count,
            replaced = previous.len(),
            duration_ms = summary.duration_ms,
            "collection replaced"
        );

        Ok(summary)
    }

    /// 세 벤더를 동시에 리로드합니다. 한 벤더의 실패는 다른 벤더에 영향을 주지 않습니다.
    pub async fn reload_all(&self) -> Vec<(Vendor, Result<ReloadSummary, LogPipelineError>)> {
        let (kaspersky, tplink, dlink) = tokio::join!(
            self.reload(Vendor::Kaspersky),
            self.reload(Vendor::TpLink),
            self.reload(Vendor::DLink),
        );
        vec![
            (Vendor::Kaspersky, kaspersky),
            (Vendor::TpLink, tplink),
            (Vendor::DLink, dlink),
        ]
    }
}

/// [`RecordStore`] 빌더
pub struct RecordStoreBuilder {
    sources: SourcesConfig,
    patterns: PatternConfig,
    ids: Option<Arc<IdAllocator>>,
}

impl RecordStoreBuilder {
    /// 기본 설정으로 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            sources: SourcesConfig::default(),
            patterns: PatternConfig::default(),
            ids: None,
        }
    }

    /// 전체 설정에서 `[sources]`와 `[patterns]`를 가져옵니다.
    pub fn from_config(config: &FirelogConfig) -> Self {
        Self::new()
            .sources(config.sources.clone())
            .patterns(config.patterns.clone())
    }

    /// 벤더별 소스 디렉토리를 설정합니다.
    pub fn sources(mut self, sources: SourcesConfig) -> Self {
        self.sources = sources;
        self
    }

    /// 추출 패턴 설정을 지정합니다.
    pub fn patterns(mut self, patterns: PatternConfig) -> Self {
        self.patterns = patterns;
        self
    }

    /// 외부에서 만든 식별자 할당기를 공유합니다.
    ///
    /// 설정하지 않으면 1부터 시작하는 새 할당기를 사용합니다.
    pub fn id_allocator(mut self, ids: Arc<IdAllocator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// 패턴을 컴파일하고 저장소를 생성합니다. 컬렉션은 비어 있는 상태로 시작합니다.
    pub fn build(self) -> Result<RecordStore, LogPipelineError> {
        for vendor in Vendor::ALL {
            if self.sources.dir_for(vendor).as_os_str().is_empty() {
                return Err(LogPipelineError::SourceNotConfigured(vendor));
            }
        }

        let patterns = Arc::new(PatternLibrary::new(&self.patterns)?);
        let ids = self.ids.unwrap_or_default();
        let ingest = IngestPipeline::new(RecordBuilder::new(patterns, ids));

        let slot = |vendor: Vendor| VendorSlot::new(vendor, self.sources.dir_for(vendor).to_path_buf());

        Ok(RecordStore {
            kaspersky: slot(Vendor::Kaspersky),
            tplink: slot(Vendor::TpLink),
            dlink: slot(Vendor::DLink),
            ingest,
        })
    }
}

impl Default for RecordStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
