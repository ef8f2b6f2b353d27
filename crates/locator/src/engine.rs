//! 위치 안내 엔진 -- 매대 스캔 등록과 상품 위치 판정을 조율합니다.
//!
//! [`LocatorEngine`]은 탐지기, 매대 스캔 캐시, 카탈로그를 묶어 두 가지 흐름을 제공합니다.
//!
//! # 쇼핑 목록 매칭 (`scan_shelf`)
//! ```text
//! 이미지 검증 -> detect_shelf -> 캐시 저장(이전 스캔 대체) -> MatchSet
//! ```
//!
//! # 위치 안내 (`locate`)
//! ```text
//! 캐시 조회 ----------------------------- 없음/만료 -> NoScanOnFile
//!  -> 목표 상품 = 스캔에서 첫 일치 ---------- 없음 -> TargetNotOnShelf
//!  -> detect_current_frame
//!  -> multiple:
//!       기준 = 화면 상품 중 하나와 일치하는 첫 스캔 상품 -- 없음 -> ViewNotRecognized
//!       -> Direction
//!  -> single (D):
//!       D가 찾는 상품이면 -> SingleRecognized (카탈로그/알레르기 보강)
//!       아니면 기준 = D와 일치하는 첫 스캔 상품 -------- 없음 -> ViewNotRecognized
//!       -> Direction
//! ```
//!
//! 판정 트리는 어느 단계든 실패하면 에러로 끝납니다. 단일 상품 인식 결과의 보강 단계만
//! 조회 실패를 무시합니다. 위치 안내 흐름은 캐시에 쓰지 않습니다.
//!
//! # 사용 예시
//! ```ignore
//! use std::sync::Arc;
//! use lookey_locator::{HttpDetectionGateway, InMemoryCatalog, LocatorConfig, LocatorEngineBuilder};
//!
//! let config = LocatorConfig::default();
//! let engine = LocatorEngineBuilder::new()
//!     .gateway(Arc::new(HttpDetectionGateway::new(&config)?))
//!     .catalog(Arc::new(InMemoryCatalog::from_file("catalog.toml").await?))
//!     .config(config)
//!     .build()?;
//!
//! let matched = engine.scan_shelf(1, &shelf_images, &["콜라".to_owned()]).await?;
//! let result = engine.locate(1, &frame, "콜라").await?;
//! ```

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info, warn};

use lookey_core::metrics as m;
use lookey_core::types::{
    CurrentFrameDetection, ImagePart, LocateResult, MatchSet, ShelfItem, ShelfScan, UserId,
};

use crate::allergy::AllergyAnnotator;
use crate::cache::ShelfScanCache;
use crate::catalog::ProductCatalog;
use crate::config::LocatorConfig;
use crate::detector::DetectionGateway;
use crate::direction;
use crate::error::LocatorError;
use crate::matcher;

/// 판정 트리의 결과
#[derive(Debug)]
enum Decision {
    /// 방향 안내로 끝남
    Resolved(LocateResult),
    /// 화면의 단일 상품이 찾는 상품임 (탐지된 이름)
    Recognized(String),
}

/// 위치 안내 엔진
///
/// `G`는 외부 탐지기, `C`는 상품/알레르기 카탈로그입니다.
pub struct LocatorEngine<G: DetectionGateway, C: ProductCatalog> {
    config: LocatorConfig,
    gateway: Arc<G>,
    catalog: Arc<C>,
    annotator: AllergyAnnotator<C>,
    cache: ShelfScanCache,
}

impl<G: DetectionGateway, C: ProductCatalog> LocatorEngine<G, C> {
    /// 엔진 설정
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// 매대 스캔 캐시 핸들
    pub fn cache(&self) -> &ShelfScanCache {
        &self.cache
    }

    /// 매대 이미지를 탐지기에 보내고 결과를 사용자의 스캔으로 저장합니다.
    ///
    /// 이전 스캔은 대체됩니다. 탐지 결과가 비어 있으면 저장하지 않습니다.
    pub async fn ingest_shelf(
        &self,
        user_id: UserId,
        images: &[ImagePart],
    ) -> Result<Arc<ShelfScan>, LocatorError> {
        self.validate_shelf_images(images)?;

        let items = self.gateway.detect_shelf(images).await?;
        let scan = self.cache.put(ShelfScan::new(user_id, items)).await?;
        counter!(m::LOCATOR_SHELF_SCANS_TOTAL).increment(1);

        info!(
            user_id,
            scan_id = %scan.scan_id,
            images = images.len(),
            items = scan.len(),
            "shelf scan ingested"
        );
        Ok(scan)
    }

    /// 매대를 스캔하고 쇼핑 목록과 매칭합니다.
    ///
    /// 결과는 스캔에 처음 등장한 순서를 따르며 중복이 없습니다.
    pub async fn scan_shelf<S: AsRef<str>>(
        &self,
        user_id: UserId,
        images: &[ImagePart],
        reference_names: &[S],
    ) -> Result<MatchSet, LocatorError> {
        let scan = self.ingest_shelf(user_id, images).await?;
        let matched = matcher::build_match_set(&scan.items, reference_names);
        counter!(m::LOCATOR_MATCHED_ITEMS_TOTAL).increment(matched.count() as u64);

        info!(
            user_id,
            scan_id = %scan.scan_id,
            references = reference_names.len(),
            matched = matched.count(),
            "shelf matched against shopping list"
        );
        Ok(matched)
    }

    /// 현재 화면을 기준으로 찾는 상품의 위치를 안내합니다.
    pub async fn locate(
        &self,
        user_id: UserId,
        frame: &ImagePart,
        product_name: &str,
    ) -> Result<LocateResult, LocatorError> {
        let result = self.locate_inner(user_id, frame, product_name).await;
        match &result {
            Ok(outcome) => {
                counter!(
                    m::LOCATOR_LOCATE_REQUESTS_TOTAL,
                    m::LABEL_RESULT => "success",
                    m::LABEL_CASE => outcome.case_name()
                )
                .increment(1);
            }
            Err(e) => {
                counter!(m::LOCATOR_LOCATE_REQUESTS_TOTAL, m::LABEL_RESULT => "failure")
                    .increment(1);
                debug!(user_id, product = product_name, error = %e, "locate failed");
            }
        }
        result
    }

    async fn locate_inner(
        &self,
        user_id: UserId,
        frame: &ImagePart,
        product_name: &str,
    ) -> Result<LocateResult, LocatorError> {
        let product_name = normalize_product_name(product_name)?;
        self.validate_image(frame)?;

        let scan = self
            .cache
            .get(user_id)
            .await
            .ok_or(LocatorError::NoScanOnFile { user_id })?;

        let target = matcher::find_first(&scan.items, product_name).ok_or_else(|| {
            LocatorError::TargetNotOnShelf {
                product: product_name.to_owned(),
            }
        })?;

        let detection = self.gateway.detect_current_frame(frame).await?;

        match decide(&scan.items, target, &detection, product_name)? {
            Decision::Resolved(result) => {
                if let LocateResult::Direction {
                    target_name,
                    direction,
                } = &result
                {
                    info!(
                        user_id,
                        scan_id = %scan.scan_id,
                        target = target_name.as_str(),
                        %direction,
                        "product direction resolved"
                    );
                }
                Ok(result)
            }
            Decision::Recognized(name) => {
                let result = self.enrich_single(user_id, name).await;
                info!(user_id, product = product_name, "single product recognized");
                Ok(result)
            }
        }
    }

    /// 단일 상품 인식 결과에 카탈로그 정보와 알레르기 충돌 여부를 붙입니다.
    ///
    /// fail-open: 카탈로그 조회가 실패하거나 상품이 없으면 이름만 담아 반환합니다.
    async fn enrich_single(&self, user_id: UserId, detected_name: String) -> LocateResult {
        let record = match self.catalog.find_by_name(&detected_name).await {
            Ok(record) => record,
            Err(e) => {
                warn!(product = detected_name.as_str(), error = %e, "product lookup failed, returning name only");
                None
            }
        };

        match record {
            Some(product) => {
                let has_allergy_conflict = self.annotator.has_conflict(product.id, user_id).await;
                LocateResult::SingleRecognized {
                    name: product.name,
                    price: product.price,
                    event: product.event,
                    has_allergy_conflict,
                }
            }
            None => LocateResult::SingleRecognized {
                name: detected_name,
                price: None,
                event: None,
                has_allergy_conflict: false,
            },
        }
    }

    fn validate_shelf_images(&self, images: &[ImagePart]) -> Result<(), LocatorError> {
        let (min, max) = (self.config.min_shelf_images, self.config.max_shelf_images);
        if images.len() < min || images.len() > max {
            let expected = if min == max {
                format!("exactly {min}")
            } else {
                format!("{min}-{max}")
            };
            return Err(LocatorError::InvalidRequest(format!(
                "expected {expected} shelf images, got {}",
                images.len()
            )));
        }
        images.iter().try_for_each(|image| self.validate_image(image))
    }

    fn validate_image(&self, image: &ImagePart) -> Result<(), LocatorError> {
        if image.is_empty() {
            return Err(LocatorError::InvalidRequest(format!(
                "image '{}' is empty",
                image.file_name
            )));
        }

        let mime = image
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        if !self
            .config
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime))
        {
            return Err(LocatorError::InvalidRequest(format!(
                "image '{}' has unsupported content type '{}'",
                image.file_name, image.content_type
            )));
        }

        if image.len() > self.config.max_image_bytes {
            return Err(LocatorError::InvalidRequest(format!(
                "image '{}' is {} bytes (max {})",
                image.file_name,
                image.len(),
                self.config.max_image_bytes
            )));
        }
        Ok(())
    }
}

/// 상품명 앞뒤 공백을 제거합니다. 빈 이름은 잘못된 요청입니다.
fn normalize_product_name(product_name: &str) -> Result<&str, LocatorError> {
    let trimmed = product_name.trim();
    if trimmed.is_empty() {
        return Err(LocatorError::InvalidRequest(
            "product name is required".to_owned(),
        ));
    }
    Ok(trimmed)
}

/// 위치 판정 트리 (fail-closed)
///
/// 기준 상품이 여럿 일치하면 스캔 순서상 첫 상품을 사용합니다.
fn decide(
    items: &[ShelfItem],
    target: &ShelfItem,
    detection: &CurrentFrameDetection,
    product_name: &str,
) -> Result<Decision, LocatorError> {
    let anchor = if detection.multiple {
        matcher::find_first_any(items, detection.items.as_slice())
    } else {
        let detected = detection
            .items
            .first()
            .ok_or(LocatorError::EmptyDetection)?;
        if matcher::matches(detected, product_name) {
            return Ok(Decision::Recognized(detected.clone()));
        }
        matcher::find_first(items, detected)
    };

    let anchor = anchor.ok_or(LocatorError::ViewNotRecognized)?;
    Ok(Decision::Resolved(LocateResult::Direction {
        target_name: target.name.clone(),
        direction: direction::resolve(target, anchor),
    }))
}

/// 위치 안내 엔진 빌더
pub struct LocatorEngineBuilder<G: DetectionGateway, C: ProductCatalog> {
    config: LocatorConfig,
    gateway: Option<Arc<G>>,
    catalog: Option<Arc<C>>,
    cache: Option<ShelfScanCache>,
}

impl<G: DetectionGateway, C: ProductCatalog> LocatorEngineBuilder<G, C> {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: LocatorConfig::default(),
            gateway: None,
            catalog: None,
            cache: None,
        }
    }

    /// 엔진 설정을 지정합니다.
    pub fn config(mut self, config: LocatorConfig) -> Self {
        self.config = config;
        self
    }

    /// 탐지기를 설정합니다.
    pub fn gateway(mut self, gateway: Arc<G>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// 카탈로그를 설정합니다.
    pub fn catalog(mut self, catalog: Arc<C>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// 외부에서 만든 캐시를 공유합니다.
    ///
    /// 설정하지 않으면 엔진 설정의 TTL/용량으로 새 캐시를 만듭니다.
    pub fn cache(mut self, cache: ShelfScanCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// 엔진을 빌드합니다.
    pub fn build(self) -> Result<LocatorEngine<G, C>, LocatorError> {
        self.config.validate()?;

        let gateway = self.gateway.ok_or_else(|| LocatorError::Config {
            field: "gateway".to_owned(),
            reason: "detection gateway must be provided".to_owned(),
        })?;
        let catalog = self.catalog.ok_or_else(|| LocatorError::Config {
            field: "catalog".to_owned(),
            reason: "product catalog must be provided".to_owned(),
        })?;
        let cache = self
            .cache
            .unwrap_or_else(|| ShelfScanCache::from_config(&self.config));

        Ok(LocatorEngine {
            annotator: AllergyAnnotator::new(Arc::clone(&catalog)),
            config: self.config,
            gateway,
            catalog,
            cache,
        })
    }
}

impl<G: DetectionGateway, C: ProductCatalog> Default for LocatorEngineBuilder<G, C> {
    fn default() -> Self {
        Self::new()
    }
}
