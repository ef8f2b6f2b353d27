//! 설정 관리: lookey.toml 파싱 및 런타임 설정
//!
//! [`LookeyConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOOKEY_CACHE_TTL_SECS=600` 형식)
//! 3. 설정 파일 (`lookey.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), lookey_core::error::LookeyError> {
//! use lookey_core::config::LookeyConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LookeyConfig::load("lookey.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LookeyConfig::parse("[cache]\nttl_secs = 300")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LookeyError};

/// LooKey 통합 설정
///
/// `lookey.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookeyConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 외부 탐지기 설정
    #[serde(default)]
    pub detector: DetectorConfig,
    /// 매대 스캔 캐시 설정
    #[serde(default)]
    pub cache: CacheConfig,
    /// 요청 검증 설정
    #[serde(default)]
    pub locator: LocatorSection,
    /// 상품 카탈로그 설정
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl LookeyConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LookeyError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LookeyError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LookeyError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LookeyError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LookeyError> {
        toml::from_str(toml_str).map_err(|e| {
            LookeyError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOOKEY_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOOKEY_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOOKEY_GENERAL_LOG_FORMAT");

        // Detector
        override_string(&mut self.detector.base_url, "LOOKEY_DETECTOR_BASE_URL");
        override_string(&mut self.detector.shelf_path, "LOOKEY_DETECTOR_SHELF_PATH");
        override_string(&mut self.detector.frame_path, "LOOKEY_DETECTOR_FRAME_PATH");
        override_u64(
            &mut self.detector.timeout_secs,
            "LOOKEY_DETECTOR_TIMEOUT_SECS",
        );

        // Cache
        override_u64(&mut self.cache.ttl_secs, "LOOKEY_CACHE_TTL_SECS");
        override_usize(&mut self.cache.max_entries, "LOOKEY_CACHE_MAX_ENTRIES");

        // Locator
        override_usize(
            &mut self.locator.min_shelf_images,
            "LOOKEY_LOCATOR_MIN_SHELF_IMAGES",
        );
        override_usize(
            &mut self.locator.max_shelf_images,
            "LOOKEY_LOCATOR_MAX_SHELF_IMAGES",
        );
        override_usize(
            &mut self.locator.max_image_bytes,
            "LOOKEY_LOCATOR_MAX_IMAGE_BYTES",
        );
        override_csv(
            &mut self.locator.allowed_content_types,
            "LOOKEY_LOCATOR_ALLOWED_CONTENT_TYPES",
        );

        // Catalog
        override_string(&mut self.catalog.path, "LOOKEY_CATALOG_PATH");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LookeyError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if !(self.detector.base_url.starts_with("http://")
            || self.detector.base_url.starts_with("https://"))
        {
            return Err(invalid(
                "detector.base_url",
                "must start with http:// or https://".to_owned(),
            ));
        }

        for (field, value) in [
            ("detector.shelf_path", &self.detector.shelf_path),
            ("detector.frame_path", &self.detector.frame_path),
        ] {
            if !value.starts_with('/') {
                return Err(invalid(field, "must start with '/'".to_owned()));
            }
        }

        if self.detector.timeout_secs == 0 {
            return Err(invalid(
                "detector.timeout_secs",
                "must be greater than 0".to_owned(),
            ));
        }

        if self.cache.ttl_secs == 0 {
            return Err(invalid(
                "cache.ttl_secs",
                "must be greater than 0".to_owned(),
            ));
        }

        if self.cache.max_entries == 0 {
            return Err(invalid(
                "cache.max_entries",
                "must be greater than 0".to_owned(),
            ));
        }

        if self.locator.min_shelf_images == 0 {
            return Err(invalid(
                "locator.min_shelf_images",
                "at least one shelf image is required".to_owned(),
            ));
        }

        if self.locator.max_shelf_images < self.locator.min_shelf_images {
            return Err(invalid(
                "locator.max_shelf_images",
                "must be greater than or equal to min_shelf_images".to_owned(),
            ));
        }

        if self.locator.allowed_content_types.is_empty() {
            return Err(invalid(
                "locator.allowed_content_types",
                "must list at least one content type".to_owned(),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> LookeyError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason,
    }
    .into()
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

/// 외부 탐지기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// 탐지기 서버 주소
    pub base_url: String,
    /// 매대 전체 스캔 엔드포인트 경로
    pub shelf_path: String,
    /// 현재 화면 탐지 엔드포인트 경로
    pub frame_path: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_owned(),
            shelf_path: "/api/shelf/detect".to_owned(),
            frame_path: "/api/shelf/current".to_owned(),
            timeout_secs: 30,
        }
    }
}

/// 매대 스캔 캐시 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 스캔 유효 기간 (초)
    pub ttl_secs: u64,
    /// 최대 보관 사용자 수
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 600,
            max_entries: 10_000,
        }
    }
}

/// 요청 검증 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorSection {
    /// 매대 스캔 최소 이미지 수
    pub min_shelf_images: usize,
    /// 매대 스캔 최대 이미지 수
    pub max_shelf_images: usize,
    /// 이미지 한 장의 최대 크기 (바이트)
    pub max_image_bytes: usize,
    /// 허용 MIME 타입
    pub allowed_content_types: Vec<String>,
}

impl Default for LocatorSection {
    fn default() -> Self {
        Self {
            min_shelf_images: 1,
            max_shelf_images: 8,
            max_image_bytes: 10 * 1024 * 1024, // 10MB
            allowed_content_types: vec!["image/jpeg".to_owned()],
        }
    }
}

/// 상품 카탈로그 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// 카탈로그 TOML 파일 경로
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: "/etc/lookey/catalog.toml".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
