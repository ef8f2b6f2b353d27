//! 바운딩 박스 기반 방향 판정
//!
//! 목표 상품과 기준 상품의 바운딩 박스를 비교해 9방향 중 하나를 돌려줍니다.
//! 각 축마다 두 박스가 겹치면 그 축의 방향은 판정하지 않습니다.
//!
//! ```text
//! left   = cx - w/2     right  = cx + w/2
//! top    = cy - h/2     bottom = cy + h/2
//! ```
//!
//! 나눗셈은 정수 절삭이며, 계산은 `i64`로 수행하여 오버플로가 없습니다.

use lookey_core::types::{Direction, ShelfItem};

/// 박스 경계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    left: i64,
    right: i64,
    top: i64,
    bottom: i64,
}

impl Bounds {
    fn of(item: &ShelfItem) -> Self {
        let cx = i64::from(item.center_x);
        let cy = i64::from(item.center_y);
        let half_w = i64::from(item.width) / 2;
        let half_h = i64::from(item.height) / 2;
        Self {
            left: cx - half_w,
            right: cx + half_w,
            top: cy - half_h,
            bottom: cy + half_h,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Horizontal {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vertical {
    Up,
    Down,
}

/// `anchor`를 기준으로 `target`이 어느 방향에 있는지 판정합니다.
pub fn resolve(target: &ShelfItem, anchor: &ShelfItem) -> Direction {
    let t = Bounds::of(target);
    let a = Bounds::of(anchor);

    let overlap_x = !(t.right < a.left || t.left > a.right);
    let overlap_y = !(t.bottom < a.top || t.top > a.bottom);

    let horizontal = if overlap_x {
        None
    } else if t.left > a.right {
        Some(Horizontal::Right)
    } else if t.right < a.left {
        Some(Horizontal::Left)
    } else {
        None
    };

    let vertical = if overlap_y {
        None
    } else if t.top > a.bottom {
        Some(Vertical::Up)
    } else if t.bottom < a.top {
        Some(Vertical::Down)
    } else {
        None
    };

    match (horizontal, vertical) {
        (None, None) => Direction::Center,
        (Some(Horizontal::Left), None) => Direction::Left,
        (Some(Horizontal::Right), None) => Direction::Right,
        (None, Some(Vertical::Up)) => Direction::Up,
        (None, Some(Vertical::Down)) => Direction::Down,
        (Some(Horizontal::Left), Some(Vertical::Up)) => Direction::LeftUp,
        (Some(Horizontal::Left), Some(Vertical::Down)) => Direction::LeftDown,
        (Some(Horizontal::Right), Some(Vertical::Up)) => Direction::RightUp,
        (Some(Horizontal::Right), Some(Vertical::Down)) => Direction::RightDown,
    }
}
