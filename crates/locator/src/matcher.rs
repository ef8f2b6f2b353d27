//! 상품명 근사 매칭
//!
//! 탐지기가 돌려주는 상품명과 사용자가 입력한 상품명은 대소문자, 공백,
//! 용량 표기 등이 다를 수 있으므로 느슨한 포함 관계로 비교합니다.
//!
//! # 매칭 규칙 (앞에서부터 순서대로 판정)
//! 1. 둘 중 하나라도 빈 문자열이면 불일치
//! 2. 완전히 같으면 일치
//! 3. 대소문자를 무시하고 같으면 일치
//! 4. 모든 공백을 제거한 뒤 한쪽이 다른 쪽을 포함하면 일치
//!    (공백 제거 후 빈 문자열이 되면 불일치)
//!
//! 규칙은 대칭적이며, 빈 문자열이 아닌 이름은 자기 자신과 항상 일치합니다.

use lookey_core::types::{MatchSet, ShelfItem};

/// 두 상품명이 같은 상품을 가리키는지 판정합니다.
pub fn matches(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }
    if a.to_lowercase() == b.to_lowercase() {
        return true;
    }

    let a = strip_whitespace(a);
    let b = strip_whitespace(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// 매대 스캔 순서대로 `name`과 일치하는 첫 상품을 찾습니다.
pub fn find_first<'a>(items: &'a [ShelfItem], name: &str) -> Option<&'a ShelfItem> {
    items.iter().find(|item| matches(&item.name, name))
}

/// 매대 스캔 순서대로 `names` 중 하나와 일치하는 첫 상품을 찾습니다.
///
/// 스캔 순서가 우선이므로, 여러 상품이 일치하면 매대에서 먼저 탐지된 상품이 선택됩니다.
pub fn find_first_any<'a, S: AsRef<str>>(
    items: &'a [ShelfItem],
    names: &[S],
) -> Option<&'a ShelfItem> {
    items
        .iter()
        .find(|item| names.iter().any(|name| matches(&item.name, name.as_ref())))
}

/// 매대 스캔과 쇼핑 목록을 매칭합니다.
///
/// 결과는 스캔에 처음 등장한 순서를 따르며 중복 이름은 한 번만 포함됩니다.
pub fn build_match_set<S: AsRef<str>>(items: &[ShelfItem], references: &[S]) -> MatchSet {
    let mut set = MatchSet::new();
    for item in items {
        if references
            .iter()
            .any(|reference| matches(&item.name, reference.as_ref()))
        {
            set.insert(&item.name);
        }
    }
    set
}
