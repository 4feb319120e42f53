//! 설정 관리 — firelog.toml 파싱 및 런타임 설정
//!
//! [`FirelogConfig`]는 데몬과 파이프라인의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`FIRELOG_SOURCES_KASPERSKY_DIR=/data/kav` 형식)
//! 3. 설정 파일 (`firelog.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), firelog_core::error::FirelogError> {
//! use firelog_core::config::FirelogConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = FirelogConfig::load("firelog.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = FirelogConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, FirelogError};
use crate::types::Vendor;

/// firelog 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FirelogConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// HTTP 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 벤더별 로그 디렉토리
    #[serde(default)]
    pub sources: SourcesConfig,
    /// 추출 패턴 어휘
    #[serde(default)]
    pub patterns: PatternConfig,
    /// Prometheus 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl FirelogConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, FirelogError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 읽고 파싱만 합니다.
    ///
    /// 환경변수 오버라이드와 검증은 하지 않습니다. 오버라이드로 고칠 수 있는
    /// 값이 파일에 있어도 여기서는 실패하지 않습니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, FirelogError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FirelogError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                FirelogError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, FirelogError> {
        toml::from_str(toml_str).map_err(|e| {
            FirelogError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `FIRELOG_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "FIRELOG_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "FIRELOG_GENERAL_LOG_FORMAT");

        // Server
        override_string(&mut self.server.bind_addr, "FIRELOG_SERVER_BIND_ADDR");
        override_bool(&mut self.server.load_on_start, "FIRELOG_SERVER_LOAD_ON_START");

        // Sources
        override_path(
            &mut self.sources.kaspersky_dir,
            "FIRELOG_SOURCES_KASPERSKY_DIR",
        );
        override_path(&mut self.sources.tplink_dir, "FIRELOG_SOURCES_TPLINK_DIR");
        override_path(&mut self.sources.dlink_dir, "FIRELOG_SOURCES_DLINK_DIR");

        // Patterns
        override_csv(&mut self.patterns.protocols, "FIRELOG_PATTERNS_PROTOCOLS");
        override_csv(&mut self.patterns.port_labels, "FIRELOG_PATTERNS_PORT_LABELS");

        // Metrics
        override_bool(&mut self.metrics.enabled, "FIRELOG_METRICS_ENABLED");
        override_string(&mut self.metrics.listen_addr, "FIRELOG_METRICS_LISTEN_ADDR");
        override_u16(&mut self.metrics.port, "FIRELOG_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), FirelogError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.server.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "server.bind_addr".to_owned(),
                reason: format!("'{}' is not a socket address", self.server.bind_addr),
            }
            .into());
        }

        for vendor in Vendor::ALL {
            if self.sources.dir_for(vendor).as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("sources.{}_dir", vendor),
                    reason: "directory must not be empty".to_owned(),
                }
                .into());
            }
        }

        if self.patterns.protocols.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "patterns.protocols".to_owned(),
                reason: "at least one protocol name is required".to_owned(),
            }
            .into());
        }

        if self.patterns.protocols.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "patterns.protocols".to_owned(),
                reason: "protocol names must not be empty".to_owned(),
            }
            .into());
        }

        if self.patterns.port_labels.iter().any(|l| l.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "patterns.port_labels".to_owned(),
                reason: "port labels must not be empty".to_owned(),
            }
            .into());
        }

        if self.metrics.enabled && self.metrics.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "metrics.port".to_owned(),
                reason: "port must be non-zero when metrics are enabled".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// HTTP 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 수신 주소
    pub bind_addr: String,
    /// 시작 시 세 벤더 디렉토리를 모두 적재할지 여부
    pub load_on_start: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_owned(),
            load_on_start: true,
        }
    }
}

/// 벤더별 로그 디렉토리
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub kaspersky_dir: PathBuf,
    pub tplink_dir: PathBuf,
    pub dlink_dir: PathBuf,
}

impl SourcesConfig {
    /// 벤더의 로그 디렉토리를 반환합니다.
    pub fn dir_for(&self, vendor: Vendor) -> &Path {
        match vendor {
            Vendor::Kaspersky => &self.kaspersky_dir,
            Vendor::TpLink => &self.tplink_dir,
            Vendor::DLink => &self.dlink_dir,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            kaspersky_dir: PathBuf::from("./logfiles/kaspersky"),
            tplink_dir: PathBuf::from("./logfiles/tplink"),
            dlink_dir: PathBuf::from("./logfiles/dlink"),
        }
    }
}

/// 추출 패턴 설정
///
/// `protocols`의 순서가 곧 우선순위입니다. 한 라인에 여러 프로토콜 이름이
/// 있으면 목록에서 먼저 나오는 이름이 선택됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// 프로토콜 어휘 (우선순위 순)
    pub protocols: Vec<String>,
    /// 포트 번호 앞에 오는 레이블 (로그 언어별)
    pub port_labels: Vec<String>,
}

/// 기본 프로토콜 어휘 (우선순위 순)
pub const DEFAULT_PROTOCOLS: &[&str] = &[
    "TCP", "UDP", "ICMP", "HTTPS", "HTTP", "DHCP", "DNS", "FTP", "SSH", "TELNET", "SMTP", "POP3",
    "IMAP", "NTP", "SNMP", "ARP", "IGMP",
];

/// 기본 포트 레이블
pub const DEFAULT_PORT_LABELS: &[&str] = &["порт", "port"];

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            protocols: DEFAULT_PROTOCOLS.iter().map(|s| (*s).to_owned()).collect(),
            port_labels: DEFAULT_PORT_LABELS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

/// Prometheus 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 수신 주소
    pub listen_addr: String,
    /// 수신 포트
    pub port: u16,
    /// 스크레이프 경로
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9100,
            endpoint: "/metrics".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_path(target: &mut PathBuf, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = PathBuf::from(val);
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val.split(',').map(|s| s.trim().to_owned()).collect();
    }
}
