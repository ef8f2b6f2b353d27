//! 위치 안내 엔진 에러 타입
//!
//! [`LocatorError`]는 탐지기 호출, 캐시 조회, 위치 판정 과정에서 발생하는 모든
//! 에러를 표현합니다. `From<LocatorError> for LookeyError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use lookey_core::error::{ConfigError, DetectionError, LookeyError, LookupError};
use lookey_core::types::UserId;

/// 위치 안내 엔진 도메인 에러
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocatorError {
    /// 탐지기 연결 실패, 타임아웃, 5xx, 잘못된 응답 본문
    #[error("detector unavailable: {0}")]
    DetectorUnavailable(String),

    /// 잘못된 요청 (이미지 개수/형식, 빈 상품명, 탐지기 4xx)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// 탐지 결과에 상품이 하나도 없음
    #[error("detector returned no items")]
    EmptyDetection,

    /// 사용자의 매대 스캔이 없거나 만료됨
    #[error("no shelf scan on file for user {user_id}")]
    NoScanOnFile {
        /// 요청한 사용자
        user_id: UserId,
    },

    /// 찾는 상품이 매대 스캔에 없음
    #[error("'{product}' is not on the scanned shelf")]
    TargetNotOnShelf {
        /// 요청한 상품명
        product: String,
    },

    /// 현재 화면의 상품을 매대 스캔에서 찾을 수 없음
    #[error("current view not recognized on the scanned shelf")]
    ViewNotRecognized,

    /// 카탈로그 조회/로딩 실패
    #[error("catalog error: {0}")]
    Catalog(String),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },
}

impl LocatorError {
    /// 같은 요청을 다시 보내면 성공할 가능성이 있는지 여부
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DetectorUnavailable(_))
    }
}

impl From<LocatorError> for LookeyError {
    fn from(err: LocatorError) -> Self {
        match err {
            LocatorError::DetectorUnavailable(msg) => {
                LookeyError::Detection(DetectionError::Unavailable(msg))
            }
            LocatorError::InvalidRequest(msg) => {
                LookeyError::Detection(DetectionError::InvalidRequest(msg))
            }
            LocatorError::EmptyDetection => LookeyError::Detection(DetectionError::Empty),
            LocatorError::NoScanOnFile { user_id } => {
                LookeyError::Lookup(LookupError::NoScanOnFile { user_id })
            }
            LocatorError::TargetNotOnShelf { product } => {
                LookeyError::Lookup(LookupError::TargetNotOnShelf { product })
            }
            LocatorError::ViewNotRecognized => LookeyError::Lookup(LookupError::ViewNotRecognized),
            LocatorError::Catalog(msg) => LookeyError::Lookup(LookupError::Catalog(msg)),
            LocatorError::Config { field, reason } => {
                LookeyError::Config(ConfigError::InvalidValue { field, reason })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detector_unavailable_display() {
        let err = LocatorError::DetectorUnavailable("connection refused".to_owned());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn no_scan_on_file_display() {
        let err = LocatorError::NoScanOnFile { user_id: 7 };
        assert_eq!(err.to_string(), "no shelf scan on file for user 7");
    }

    #[test]
    fn target_not_on_shelf_display() {
        let err = LocatorError::TargetNotOnShelf {
            product: "새우깡".to_owned(),
        };
        assert!(err.to_string().contains("새우깡"));
    }

    #[test]
    fn config_error_display() {
        let err = LocatorError::Config {
            field: "cache_ttl_secs".to_owned(),
            reason: "must be greater than 0".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("cache_ttl_secs"));
        assert!(msg.contains("must be greater than 0"));
    }

    #[test]
    fn only_detector_unavailable_is_retryable() {
        assert!(LocatorError::DetectorUnavailable("timeout".to_owned()).is_retryable());
        assert!(!LocatorError::InvalidRequest("bad".to_owned()).is_retryable());
        assert!(!LocatorError::EmptyDetection.is_retryable());
        assert!(!LocatorError::ViewNotRecognized.is_retryable());
    }

    #[test]
    fn converts_detection_errors() {
        let err: LookeyError = LocatorError::EmptyDetection.into();
        assert!(matches!(err, LookeyError::Detection(DetectionError::Empty)));

        let err: LookeyError = LocatorError::InvalidRequest("4 images".to_owned()).into();
        assert!(matches!(
            err,
            LookeyError::Detection(DetectionError::InvalidRequest(_))
        ));
    }

    #[test]
    fn converts_lookup_errors() {
        let err: LookeyError = LocatorError::NoScanOnFile { user_id: 3 }.into();
        assert!(matches!(
            err,
            LookeyError::Lookup(LookupError::NoScanOnFile { user_id: 3 })
        ));

        let err: LookeyError = LocatorError::ViewNotRecognized.into();
        assert!(matches!(
            err,
            LookeyError::Lookup(LookupError::ViewNotRecognized)
        ));
    }

    #[test]
    fn converts_config_error() {
        let err: LookeyError = LocatorError::Config {
            field: "max_shelf_images".to_owned(),
            reason: "too small".to_owned(),
        }
        .into();
        assert!(matches!(
            err,
            LookeyError::Config(ConfigError::InvalidValue { .. })
        ));
    }
}
