//! 도메인 타입: 시스템 전역에서 사용되는 공통 타입
//!
//! 매대 스캔, 현재 화면 탐지 결과, 위치 안내 결과 등
//! 탐지기/캐시/엔진이 주고받는 데이터 구조를 정의합니다.

use std::fmt;
use std::time::SystemTime;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 사용자 ID
pub type UserId = u64;

/// 상품 ID (카탈로그 기준)
pub type ProductId = u64;

/// 알레르기 항목 ID (카탈로그 기준)
pub type AllergyId = u64;

/// 업로드된 이미지 한 장
///
/// 탐지기로 그대로 전달되는 원본 바이트와 파일 메타데이터를 담습니다.
#[derive(Debug, Clone)]
pub struct ImagePart {
    /// 원본 파일명
    pub file_name: String,
    /// MIME 타입 (예: `image/jpeg`)
    pub content_type: String,
    /// 이미지 바이트
    pub data: Bytes,
}

impl ImagePart {
    /// 새 이미지 파트를 생성합니다.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// JPEG 이미지 파트를 생성합니다.
    pub fn jpeg(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::new(file_name, "image/jpeg", data)
    }

    /// 바이트 크기를 반환합니다.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 빈 이미지인지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// 매대 스캔에서 탐지된 상품 하나
///
/// 좌표는 탐지된 이미지의 픽셀 좌표계를 따르며, 바운딩 박스의 중심과 크기로 표현합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfItem {
    /// 탐지된 상품명
    pub name: String,
    /// 중심 X 좌표
    pub center_x: i32,
    /// 중심 Y 좌표
    pub center_y: i32,
    /// 폭
    pub width: i32,
    /// 높이
    pub height: i32,
}

impl ShelfItem {
    /// 새 매대 상품을 생성합니다.
    pub fn new(name: impl Into<String>, center_x: i32, center_y: i32, width: i32, height: i32) -> Self {
        Self {
            name: name.into(),
            center_x,
            center_y,
            width,
            height,
        }
    }
}

impl fmt::Display for ShelfItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @({}, {}) {}x{}",
            self.name, self.center_x, self.center_y, self.width, self.height,
        )
    }
}

/// 사용자별 매대 스캔
///
/// 사용자당 하나만 유지되며, 새 스캔이 들어오면 이전 스캔을 통째로 대체합니다.
/// 생성 이후에는 변경되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfScan {
    /// 스캔 ID
    pub scan_id: Uuid,
    /// 스캔한 사용자
    pub user_id: UserId,
    /// 탐지된 상품 목록 (탐지기 응답 순서 유지)
    pub items: Vec<ShelfItem>,
    /// 스캔 시각
    pub captured_at: SystemTime,
}

impl ShelfScan {
    /// 탐지 결과로 새 스캔을 생성합니다.
    pub fn new(user_id: UserId, items: Vec<ShelfItem>) -> Self {
        Self {
            scan_id: Uuid::new_v4(),
            user_id,
            items,
            captured_at: SystemTime::now(),
        }
    }

    /// 스캔된 상품 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 스캔이 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 현재 화면 탐지 결과
///
/// 상품명만 담고 좌표는 없습니다. 기준 상품의 좌표는 캐시된 매대 스캔에서
/// 이름을 다시 매칭하여 얻습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentFrameDetection {
    /// 화면에 인식 가능한 상품이 둘 이상인지 여부
    pub multiple: bool,
    /// 탐지된 상품명 (중복 없음, 탐지기 응답 순서 유지)
    pub items: Vec<String>,
}

/// 상대 방향
///
/// 목표 상품이 현재 보고 있는 기준 상품에 대해 어느 쪽에 있는지 나타냅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// 두 축 모두 겹침
    Center,
    Left,
    Right,
    Up,
    Down,
    LeftUp,
    LeftDown,
    RightUp,
    RightDown,
}

impl Direction {
    /// 방향 레이블을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::LeftUp => "left-up",
            Self::LeftDown => "left-down",
            Self::RightUp => "right-up",
            Self::RightDown => "right-down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 상품 카탈로그 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// 상품 ID
    pub id: ProductId,
    /// 상품명
    pub name: String,
    /// 가격 (원)
    #[serde(default)]
    pub price: Option<i64>,
    /// 행사 정보 (예: "1+1")
    #[serde(default)]
    pub event: Option<String>,
}

/// 위치 안내 결과
///
/// "찾을 수 없음"은 변형이 아니라 에러로 전달됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "case", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocateResult {
    /// 목표 상품이 현재 화면 기준으로 어느 방향에 있는지 안내
    Direction {
        /// 목표 상품명 (매대 스캔 기준)
        target_name: String,
        /// 상대 방향
        direction: Direction,
    },
    /// 현재 화면의 단일 상품이 찾는 상품임
    SingleRecognized {
        /// 상품명
        name: String,
        /// 가격 (카탈로그에서 찾은 경우)
        price: Option<i64>,
        /// 행사 정보 (카탈로그에서 찾은 경우)
        event: Option<String>,
        /// 사용자 알레르기와 충돌하는지 여부
        has_allergy_conflict: bool,
    },
}

impl LocateResult {
    /// 결과 유형명을 반환합니다.
    pub fn case_name(&self) -> &'static str {
        match self {
            Self::Direction { .. } => "DIRECTION",
            Self::SingleRecognized { .. } => "SINGLE_RECOGNIZED",
        }
    }
}

/// 장바구니/쇼핑 목록 매칭 결과
///
/// 매대 스캔에 처음 등장한 순서대로, 중복 없이 매칭된 상품명을 담습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSet {
    names: Vec<String>,
}

impl MatchSet {
    /// 빈 매칭 결과를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 이름을 추가합니다. 이미 있으면 무시하고 `false`를 반환합니다.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.names.iter().any(|n| n == name) {
            return false;
        }
        self.names.push(name.to_owned());
        true
    }

    /// 매칭된 이름 목록을 반환합니다.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// 매칭된 상품 수를 반환합니다.
    pub fn count(&self) -> usize {
        self.names.len()
    }

    /// 매칭 결과가 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// 이름 목록으로 변환합니다.
    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_set_preserves_insertion_order_and_dedups() {
        let mut set = MatchSet::new();
        assert!(set.insert("cola"));
        assert!(set.insert("Mineral Water"));
        assert!(!set.insert("cola"));
        assert_eq!(set.names(), ["cola", "Mineral Water"]);
        assert_eq!(set.count(), 2);
    }

    #[test]
    fn match_set_is_case_sensitive_for_dedup() {
        let mut set = MatchSet::new();
        set.insert("Cola");
        set.insert("cola");
        assert_eq!(set.count(), 2);
    }

    #[test]
    fn direction_serializes_as_label() {
        let json = serde_json::to_string(&Direction::LeftUp).unwrap();
        assert_eq!(json, "\"left-up\"");
        let parsed: Direction = serde_json::from_str("\"right-down\"").unwrap();
        assert_eq!(parsed, Direction::RightDown);
    }

    #[test]
    fn direction_display_matches_as_str() {
        for dir in [
            Direction::Center,
            Direction::Left,
            Direction::Right,
            Direction::Up,
            Direction::Down,
            Direction::LeftUp,
            Direction::LeftDown,
            Direction::RightUp,
            Direction::RightDown,
        ] {
            assert_eq!(dir.to_string(), dir.as_str());
        }
    }

    #[test]
    fn locate_result_serializes_with_case_tag() {
        let result = LocateResult::Direction {
            target_name: "콜라".to_owned(),
            direction: Direction::Right,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["case"], "DIRECTION");
        assert_eq!(value["direction"], "right");
        assert_eq!(result.case_name(), "DIRECTION");

        let result = LocateResult::SingleRecognized {
            name: "콜라".to_owned(),
            price: Some(2000),
            event: None,
            has_allergy_conflict: false,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["case"], "SINGLE_RECOGNIZED");
        assert_eq!(value["price"], 2000);
    }

    #[test]
    fn shelf_scan_gets_unique_ids() {
        let a = ShelfScan::new(1, vec![ShelfItem::new("cola", 0, 0, 10, 10)]);
        let b = ShelfScan::new(1, vec![ShelfItem::new("cola", 0, 0, 10, 10)]);
        assert_ne!(a.scan_id, b.scan_id);
        assert_eq!(a.len(), 1);
        assert!(!a.is_empty());
    }

    #[test]
    fn image_part_jpeg_sets_content_type() {
        let image = ImagePart::jpeg("shelf-1.jpg", vec![0xFF_u8, 0xD8, 0xFF]);
        assert_eq!(image.content_type, "image/jpeg");
        assert_eq!(image.len(), 3);
        assert!(!image.is_empty());
    }

    #[test]
    fn shelf_item_display() {
        let item = ShelfItem::new("cola", 100, 120, 20, 40);
        assert_eq!(item.to_string(), "cola @(100, 120) 20x40");
    }
}
