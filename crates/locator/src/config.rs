//! 위치 안내 엔진 설정
//!
//! [`LocatorConfig`]는 core의 [`LookeyConfig`](lookey_core::config::LookeyConfig)에서
//! `[detector]`, `[cache]`, `[locator]` 섹션을 모아 엔진 전용 설정을 제공합니다.
//!
//! # 사용 예시
//! ```ignore
//! use lookey_core::config::LookeyConfig;
//! use lookey_locator::config::LocatorConfig;
//!
//! let core_config = LookeyConfig::default();
//! let config = LocatorConfig::from_core(&core_config);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use lookey_core::config::LookeyConfig;

use crate::error::LocatorError;

/// 위치 안내 엔진 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// 탐지기 서버 주소
    pub detector_base_url: String,
    /// 매대 스캔 엔드포인트 경로
    pub shelf_path: String,
    /// 현재 화면 탐지 엔드포인트 경로
    pub frame_path: String,
    /// 탐지기 요청 타임아웃 (초)
    pub detector_timeout_secs: u64,
    /// 매대 스캔 유효 기간 (초)
    pub cache_ttl_secs: u64,
    /// 최대 보관 사용자 수
    pub cache_max_entries: usize,
    /// 매대 스캔 최소 이미지 수
    pub min_shelf_images: usize,
    /// 매대 스캔 최대 이미지 수
    pub max_shelf_images: usize,
    /// 이미지 한 장의 최대 크기 (바이트)
    pub max_image_bytes: usize,
    /// 허용 MIME 타입
    pub allowed_content_types: Vec<String>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self::from_core(&LookeyConfig::default())
    }
}

/// 설정 상한값 상수
const MAX_DETECTOR_TIMEOUT_SECS: u64 = 300;
const MAX_CACHE_TTL_SECS: u64 = 86_400;
const MAX_CACHE_ENTRIES: usize = 1_000_000;
const MAX_SHELF_IMAGES: usize = 32;
const MAX_IMAGE_BYTES: usize = 50 * 1024 * 1024;

impl LocatorConfig {
    /// core 설정에서 엔진 설정을 생성합니다.
    pub fn from_core(core: &LookeyConfig) -> Self {
        Self {
            detector_base_url: core.detector.base_url.clone(),
            shelf_path: core.detector.shelf_path.clone(),
            frame_path: core.detector.frame_path.clone(),
            detector_timeout_secs: core.detector.timeout_secs,
            cache_ttl_secs: core.cache.ttl_secs,
            cache_max_entries: core.cache.max_entries,
            min_shelf_images: core.locator.min_shelf_images,
            max_shelf_images: core.locator.max_shelf_images,
            max_image_bytes: core.locator.max_image_bytes,
            allowed_content_types: core.locator.allowed_content_types.clone(),
        }
    }

    /// 캐시 TTL을 `Duration`으로 반환합니다.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// 탐지기 타임아웃을 `Duration`으로 반환합니다.
    pub fn detector_timeout(&self) -> Duration {
        Duration::from_secs(self.detector_timeout_secs)
    }

    /// 매대 스캔 엔드포인트 전체 URL
    pub fn shelf_url(&self) -> String {
        join_url(&self.detector_base_url, &self.shelf_path)
    }

    /// 현재 화면 탐지 엔드포인트 전체 URL
    pub fn frame_url(&self) -> String {
        join_url(&self.detector_base_url, &self.frame_path)
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LocatorError> {
        if !(self.detector_base_url.starts_with("http://")
            || self.detector_base_url.starts_with("https://"))
        {
            return Err(config_err(
                "detector_base_url",
                "must start with http:// or https://".to_owned(),
            ));
        }

        if self.detector_timeout_secs == 0 || self.detector_timeout_secs > MAX_DETECTOR_TIMEOUT_SECS
        {
            return Err(config_err(
                "detector_timeout_secs",
                format!("must be 1-{MAX_DETECTOR_TIMEOUT_SECS}"),
            ));
        }

        if self.cache_ttl_secs == 0 || self.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(config_err(
                "cache_ttl_secs",
                format!("must be 1-{MAX_CACHE_TTL_SECS}"),
            ));
        }

        if self.cache_max_entries == 0 || self.cache_max_entries > MAX_CACHE_ENTRIES {
            return Err(config_err(
                "cache_max_entries",
                format!("must be 1-{MAX_CACHE_ENTRIES}"),
            ));
        }

        if self.min_shelf_images == 0 || self.min_shelf_images > MAX_SHELF_IMAGES {
            return Err(config_err(
                "min_shelf_images",
                format!("must be 1-{MAX_SHELF_IMAGES}"),
            ));
        }

        if self.max_shelf_images < self.min_shelf_images || self.max_shelf_images > MAX_SHELF_IMAGES
        {
            return Err(config_err(
                "max_shelf_images",
                format!("must be {}-{MAX_SHELF_IMAGES}", self.min_shelf_images),
            ));
        }

        if self.max_image_bytes == 0 || self.max_image_bytes > MAX_IMAGE_BYTES {
            return Err(config_err(
                "max_image_bytes",
                format!("must be 1-{MAX_IMAGE_BYTES}"),
            ));
        }

        if self.allowed_content_types.is_empty() {
            return Err(config_err(
                "allowed_content_types",
                "must list at least one content type".to_owned(),
            ));
        }

        Ok(())
    }
}

fn config_err(field: &str, reason: String) -> LocatorError {
    LocatorError::Config {
        field: field.to_owned(),
        reason,
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// 위치 안내 엔진 설정 빌더
#[derive(Default)]
pub struct LocatorConfigBuilder {
    config: LocatorConfig,
}

impl LocatorConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 탐지기 서버 주소를 설정합니다.
    pub fn detector_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.detector_base_url = url.into();
        self
    }

    /// 탐지기 요청 타임아웃(초)을 설정합니다.
    pub fn detector_timeout_secs(mut self, secs: u64) -> Self {
        self.config.detector_timeout_secs = secs;
        self
    }

    /// 캐시 TTL(초)을 설정합니다.
    pub fn cache_ttl_secs(mut self, secs: u64) -> Self {
        self.config.cache_ttl_secs = secs;
        self
    }

    /// 최대 보관 사용자 수를 설정합니다.
    pub fn cache_max_entries(mut self, max: usize) -> Self {
        self.config.cache_max_entries = max;
        self
    }

    /// 매대 스캔 이미지 수 범위를 설정합니다.
    pub fn shelf_images(mut self, min: usize, max: usize) -> Self {
        self.config.min_shelf_images = min;
        self.config.max_shelf_images = max;
        self
    }

    /// 이미지 한 장의 최대 크기(바이트)를 설정합니다.
    pub fn max_image_bytes(mut self, bytes: usize) -> Self {
        self.config.max_image_bytes = bytes;
        self
    }

    /// 허용 MIME 타입을 추가합니다.
    pub fn allow_content_type(mut self, content_type: impl Into<String>) -> Self {
        let content_type = content_type.into();
        if !self.config.allowed_content_types.contains(&content_type) {
            self.config.allowed_content_types.push(content_type);
        }
        self
    }

    /// 설정을 검증하고 `LocatorConfig`를 생성합니다.
    pub fn build(self) -> Result<LocatorConfig, LocatorError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
