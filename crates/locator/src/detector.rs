//! External detector abstraction for testability.
//!
//! The [`DetectionGateway`] trait abstracts the remote image-recognition
//! service, allowing production code to use [`HttpDetectionGateway`] while
//! tests use `MockDetectionGateway`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  LocatorEngine   │
//! └────────┬─────────┘
//!          │
//!          ▼
//!  ┌────────────────┐
//!  │DetectionGateway│ (trait)
//!  └────────────────┘
//!        │      │
//!        ▼      ▼
//!   ┌──────┐ ┌──────┐
//!   │ Http │ │ Mock │
//!   └──┬───┘ └──────┘
//!      │
//!      ▼
//!   Detector service
//! ```
//!
//! # Wire Format
//!
//! - Shelf scan: `POST {base_url}{shelf_path}`, multipart parts named
//!   `shelf_images`, response `{"items": [{"name", "x", "y", "w", "h"}]}`
//! - Current frame: `POST {base_url}{frame_path}`, multipart part named
//!   `current_frame`, response `{"multiple": bool, "items": ["name", ...]}`
//!
//! # Response Validation
//!
//! - Items with a blank name are dropped (logged at warn)
//! - Negative width/height makes the whole body malformed
//! - Duplicate current-frame names collapse (first occurrence wins)
//! - `multiple = false` with several distinct names is reported as `multiple = true`
//! - No remaining items yields [`LocatorError::EmptyDetection`]

use std::future::Future;
use std::time::Instant;

use metrics::{counter, histogram};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, warn};

use lookey_core::metrics as m;
use lookey_core::types::{CurrentFrameDetection, ImagePart, ShelfItem};

use crate::config::LocatorConfig;
use crate::error::LocatorError;

/// 매대 스캔 multipart 파트 이름
pub const SHELF_IMAGES_PART: &str = "shelf_images";

/// 현재 화면 multipart 파트 이름
pub const CURRENT_FRAME_PART: &str = "current_frame";

/// 에러 메시지에 포함할 응답 본문 최대 길이
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Trait abstracting the remote detector.
///
/// Implementations are stateless and `Send + Sync + 'static`, so one instance
/// can be shared across requests behind an `Arc`.
///
/// # Errors
///
/// - `LocatorError::DetectorUnavailable`: transport failure, timeout, 5xx, malformed body
/// - `LocatorError::InvalidRequest`: the detector rejected the request (4xx)
/// - `LocatorError::EmptyDetection`: a valid response with no usable items
pub trait DetectionGateway: Send + Sync + 'static {
    /// Detects every product across a multi-image shelf scan.
    ///
    /// The detector returns one item list spanning all images, in response order.
    fn detect_shelf(
        &self,
        images: &[ImagePart],
    ) -> impl Future<Output = Result<Vec<ShelfItem>, LocatorError>> + Send;

    /// Detects product names in the shopper's current camera frame.
    fn detect_current_frame(
        &self,
        image: &ImagePart,
    ) -> impl Future<Output = Result<CurrentFrameDetection, LocatorError>> + Send;
}

/// Production detector client over HTTP multipart.
pub struct HttpDetectionGateway {
    client: reqwest::Client,
    shelf_url: String,
    frame_url: String,
}

impl HttpDetectionGateway {
    /// Creates a client from the locator configuration.
    ///
    /// # Errors
    ///
    /// Returns `LocatorError::Config` if the HTTP client cannot be constructed.
    pub fn new(config: &LocatorConfig) -> Result<Self, LocatorError> {
        let client = reqwest::Client::builder()
            .timeout(config.detector_timeout())
            .build()
            .map_err(|e| LocatorError::Config {
                field: "detector_timeout_secs".to_owned(),
                reason: format!("failed to build http client: {e}"),
            })?;

        Ok(Self {
            client,
            shelf_url: config.shelf_url(),
            frame_url: config.frame_url(),
        })
    }

    async fn post(
        &self,
        url: &str,
        endpoint: &'static str,
        form: Form,
    ) -> Result<bytes::Bytes, LocatorError> {
        let started = Instant::now();
        let result = self.send(url, form).await;
        histogram!(m::LOCATOR_DETECTOR_DURATION_SECONDS, m::LABEL_ENDPOINT => endpoint)
            .record(started.elapsed().as_secs_f64());

        if let Err(e) = &result {
            counter!(m::LOCATOR_DETECTOR_ERRORS_TOTAL, m::LABEL_ENDPOINT => endpoint).increment(1);
            warn!(endpoint, error = %e, "detector call failed");
        }
        result
    }

    async fn send(&self, url: &str, form: Form) -> Result<bytes::Bytes, LocatorError> {
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LocatorError::DetectorUnavailable(format!("request to {url} timed out"))
                } else {
                    LocatorError::DetectorUnavailable(format!("request to {url} failed: {e}"))
                }
            })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        response
            .bytes()
            .await
            .map_err(|e| LocatorError::DetectorUnavailable(format!("failed to read body: {e}")))
    }
}

impl DetectionGateway for HttpDetectionGateway {
    async fn detect_shelf(&self, images: &[ImagePart]) -> Result<Vec<ShelfItem>, LocatorError> {
        if images.is_empty() {
            return Err(LocatorError::InvalidRequest(
                "at least one shelf image is required".to_owned(),
            ));
        }

        let mut form = Form::new();
        for image in images {
            form = form.part(SHELF_IMAGES_PART, to_part(image)?);
        }

        let body = self.post(&self.shelf_url, "shelf", form).await?;
        let items = parse_shelf_response(&body)?;
        debug!(images = images.len(), items = items.len(), "shelf detected");
        Ok(items)
    }

    async fn detect_current_frame(
        &self,
        image: &ImagePart,
    ) -> Result<CurrentFrameDetection, LocatorError> {
        let form = Form::new().part(CURRENT_FRAME_PART, to_part(image)?);
        let body = self.post(&self.frame_url, "frame", form).await?;
        let detection = parse_frame_response(&body)?;
        debug!(
            multiple = detection.multiple,
            items = detection.items.len(),
            "current frame detected"
        );
        Ok(detection)
    }
}

fn to_part(image: &ImagePart) -> Result<Part, LocatorError> {
    Part::bytes(image.data.to_vec())
        .file_name(image.file_name.clone())
        .mime_str(&image.content_type)
        .map_err(|e| {
            LocatorError::InvalidRequest(format!(
                "invalid content type '{}': {e}",
                image.content_type
            ))
        })
}

/// 성공이 아닌 HTTP 상태를 에러로 분류합니다.
///
/// 4xx는 요청 자체의 문제이므로 `InvalidRequest`, 그 외는 `DetectorUnavailable`.
pub fn classify_status(status: u16, body: &str) -> LocatorError {
    let detail: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
    if (400..500).contains(&status) {
        LocatorError::InvalidRequest(format!("detector rejected request ({status}): {detail}"))
    } else {
        LocatorError::DetectorUnavailable(format!("detector returned {status}: {detail}"))
    }
}

#[derive(Debug, Deserialize)]
struct ShelfResponse {
    items: Vec<WireShelfItem>,
}

#[derive(Debug, Deserialize)]
struct WireShelfItem {
    name: String,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

#[derive(Debug, Deserialize)]
struct FrameResponse {
    #[serde(default)]
    multiple: bool,
    items: Vec<String>,
}

/// 매대 스캔 응답 본문을 검증하고 `ShelfItem` 목록으로 변환합니다.
pub fn parse_shelf_response(body: &[u8]) -> Result<Vec<ShelfItem>, LocatorError> {
    let response: ShelfResponse = serde_json::from_slice(body).map_err(|e| {
        LocatorError::DetectorUnavailable(format!("malformed shelf response: {e}"))
    })?;

    let mut items = Vec::with_capacity(response.items.len());
    for wire in response.items {
        if wire.w < 0 || wire.h < 0 {
            return Err(LocatorError::DetectorUnavailable(format!(
                "malformed shelf response: negative size {}x{} for '{}'",
                wire.w, wire.h, wire.name
            )));
        }
        let name = wire.name.trim();
        if name.is_empty() {
            warn!(x = wire.x, y = wire.y, "dropping shelf item with blank name");
            continue;
        }
        items.push(ShelfItem::new(name, wire.x, wire.y, wire.w, wire.h));
    }

    if items.is_empty() {
        return Err(LocatorError::EmptyDetection);
    }
    Ok(items)
}

/// 현재 화면 응답 본문을 검증하고 `CurrentFrameDetection`으로 변환합니다.
pub fn parse_frame_response(body: &[u8]) -> Result<CurrentFrameDetection, LocatorError> {
    let response: FrameResponse = serde_json::from_slice(body).map_err(|e| {
        LocatorError::DetectorUnavailable(format!("malformed frame response: {e}"))
    })?;

    let mut items: Vec<String> = Vec::with_capacity(response.items.len());
    for raw in response.items {
        let name = raw.trim();
        if name.is_empty() {
            warn!("dropping current-frame item with blank name");
            continue;
        }
        if !items.iter().any(|existing| existing == name) {
            items.push(name.to_owned());
        }
    }

    if items.is_empty() {
        return Err(LocatorError::EmptyDetection);
    }

    let multiple = response.multiple || items.len() > 1;
    Ok(CurrentFrameDetection { multiple, items })
}

/// 테스트용 Mock 탐지기
///
/// 미리 정해 둔 응답을 반환하며 호출 횟수를 기록합니다.
#[cfg(test)]
#[derive(Default)]
pub struct MockDetectionGateway {
    /// detect_shelf 호출 시 반환할 상품 목록
    pub shelf_items: Vec<ShelfItem>,
    /// detect_current_frame 호출 시 반환할 탐지 결과
    pub frame: Option<CurrentFrameDetection>,
    /// 탐지기 장애를 시뮬레이션할지 여부
    pub unavailable: bool,
    /// detect_shelf 호출 횟수
    pub shelf_calls: std::sync::atomic::AtomicUsize,
    /// detect_current_frame 호출 횟수
    pub frame_calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockDetectionGateway {
    /// 빈 응답으로 mock 탐지기를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 매대 스캔 응답을 설정합니다.
    pub fn with_shelf_items(mut self, items: Vec<ShelfItem>) -> Self {
        self.shelf_items = items;
        self
    }

    /// 현재 화면 응답을 설정합니다.
    pub fn with_frame(mut self, multiple: bool, names: &[&str]) -> Self {
        self.frame = Some(CurrentFrameDetection {
            multiple,
            items: names.iter().map(|n| (*n).to_owned()).collect(),
        });
        self
    }

    /// 모든 호출이 `DetectorUnavailable`로 실패하도록 설정합니다.
    pub fn with_unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// detect_shelf 호출 횟수
    pub fn shelf_call_count(&self) -> usize {
        self.shelf_calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// detect_current_frame 호출 횟수
    pub fn frame_call_count(&self) -> usize {
        self.frame_calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl DetectionGateway for MockDetectionGateway {
    async fn detect_shelf(&self, _images: &[ImagePart]) -> Result<Vec<ShelfItem>, LocatorError> {
        self.shelf_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.unavailable {
            return Err(LocatorError::DetectorUnavailable("mock failure".to_owned()));
        }
        if self.shelf_items.is_empty() {
            return Err(LocatorError::EmptyDetection);
        }
        Ok(self.shelf_items.clone())
    }

    async fn detect_current_frame(
        &self,
        _image: &ImagePart,
    ) -> Result<CurrentFrameDetection, LocatorError> {
        self.frame_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.unavailable {
            return Err(LocatorError::DetectorUnavailable("mock failure".to_owned()));
        }
        self.frame.clone().ok_or(LocatorError::EmptyDetection)
    }
}
