//! 에러 타입: 도메인별 에러 정의

/// LooKey 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LookeyError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 외부 탐지기 호출 에러
    #[error("detection error: {0}")]
    Detection(#[from] DetectionError),

    /// 스캔/상품 조회 실패
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 외부 탐지기 에러
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    /// 탐지기 연결 실패, 타임아웃, 5xx, 잘못된 응답 본문 (재시도 가능)
    #[error("detector unavailable: {0}")]
    Unavailable(String),

    /// 잘못된 요청 (이미지 개수/형식 오류, 4xx)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// 탐지 결과에 상품이 없음
    #[error("detector returned no items")]
    Empty,
}

/// 스캔/상품 조회 실패
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// 저장된 매대 스캔이 없거나 만료됨
    #[error("no shelf scan on file for user {user_id}")]
    NoScanOnFile { user_id: u64 },

    /// 찾는 상품이 매대 스캔에 없음
    #[error("'{product}' is not on the scanned shelf")]
    TargetNotOnShelf { product: String },

    /// 현재 화면의 상품을 매대 스캔에서 찾을 수 없음
    #[error("current view not recognized on the scanned shelf")]
    ViewNotRecognized,

    /// 상품 카탈로그 조회 실패
    #[error("catalog error: {0}")]
    Catalog(String),
}
