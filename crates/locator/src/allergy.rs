//! 알레르기 충돌 확인
//!
//! 단일 상품 인식 결과에 부가 정보를 붙이는 단계입니다. 조회 실패는 위치 안내를
//! 막지 않도록 충돌 없음(`false`)으로 처리하고 warn 로그만 남깁니다.

use std::sync::Arc;

use tracing::warn;

use lookey_core::types::{ProductId, UserId};

use crate::catalog::ProductCatalog;

/// 상품과 사용자 알레르기의 교집합을 확인합니다.
pub struct AllergyAnnotator<C> {
    catalog: Arc<C>,
}

impl<C: ProductCatalog> AllergyAnnotator<C> {
    /// 카탈로그를 공유하는 annotator를 생성합니다.
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }

    /// 상품의 알레르기 항목 중 사용자 알레르기와 겹치는 것이 있으면 `true`.
    ///
    /// fail-open: 어느 쪽 조회든 실패하면 `false`.
    pub async fn has_conflict(&self, product_id: ProductId, user_id: UserId) -> bool {
        let tags = match self.catalog.find_allergy_tags(product_id).await {
            Ok(tags) => tags,
            Err(e) => {
                warn!(product_id, error = %e, "allergy tag lookup failed, assuming no conflict");
                return false;
            }
        };
        if tags.is_empty() {
            return false;
        }

        let allergies = match self.catalog.user_allergies(user_id).await {
            Ok(allergies) => allergies,
            Err(e) => {
                warn!(user_id, error = %e, "user allergy lookup failed, assuming no conflict");
                return false;
            }
        };

        !tags.is_disjoint(&allergies)
    }
}
