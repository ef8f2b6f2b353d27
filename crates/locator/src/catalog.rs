//! 상품/알레르기 카탈로그
//!
//! [`ProductCatalog`] trait은 상품 정보와 알레르기 정보를 제공하는 외부 저장소를
//! 추상화합니다. CLI와 테스트는 TOML 파일에서 읽어 들이는 [`InMemoryCatalog`]를 사용합니다.
//!
//! # 카탈로그 파일 형식
//! ```toml
//! [[products]]
//! id = 1
//! name = "코카콜라 500ml"
//! price = 2000
//! event = "1+1"
//! allergies = []
//!
//! [[users]]
//! id = 1
//! allergies = [2]
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use lookey_core::types::{AllergyId, ProductId, ProductRecord, UserId};

use crate::error::LocatorError;

/// 상품/알레르기 카탈로그
pub trait ProductCatalog: Send + Sync + 'static {
    /// 상품명으로 상품을 찾습니다.
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<ProductRecord>, LocatorError>> + Send;

    /// 상품에 포함된 알레르기 항목을 반환합니다.
    fn find_allergy_tags(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<HashSet<AllergyId>, LocatorError>> + Send;

    /// 사용자가 등록한 알레르기 항목을 반환합니다.
    fn user_allergies(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<HashSet<AllergyId>, LocatorError>> + Send;
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    products: Vec<CatalogProduct>,
    #[serde(default)]
    users: Vec<CatalogUser>,
}

#[derive(Debug, Deserialize)]
struct CatalogProduct {
    id: ProductId,
    name: String,
    #[serde(default)]
    price: Option<i64>,
    #[serde(default)]
    event: Option<String>,
    #[serde(default)]
    allergies: Vec<AllergyId>,
}

#[derive(Debug, Deserialize)]
struct CatalogUser {
    id: UserId,
    #[serde(default)]
    allergies: Vec<AllergyId>,
}

/// 메모리 기반 카탈로그
///
/// 상품은 ID 순으로 보관되며, 키워드 검색은 ID가 가장 작은 상품을 우선합니다.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: BTreeMap<ProductId, ProductRecord>,
    product_allergies: HashMap<ProductId, HashSet<AllergyId>>,
    user_allergies: HashMap<UserId, HashSet<AllergyId>>,
}

impl InMemoryCatalog {
    /// 빈 카탈로그를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 상품을 추가합니다. 같은 ID가 있으면 대체합니다.
    pub fn with_product(mut self, product: ProductRecord, allergies: &[AllergyId]) -> Self {
        self.product_allergies
            .insert(product.id, allergies.iter().copied().collect());
        self.products.insert(product.id, product);
        self
    }

    /// 사용자 알레르기를 등록합니다.
    pub fn with_user(mut self, user_id: UserId, allergies: &[AllergyId]) -> Self {
        self.user_allergies
            .insert(user_id, allergies.iter().copied().collect());
        self
    }

    /// 등록된 상품 수
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// 등록된 사용자 수
    pub fn user_count(&self) -> usize {
        self.user_allergies.len()
    }

    /// TOML 문자열에서 카탈로그를 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LocatorError> {
        let file: CatalogFile = toml::from_str(toml_str)
            .map_err(|e| LocatorError::Catalog(format!("failed to parse catalog: {e}")))?;

        let mut catalog = Self::new();
        for product in file.products {
            if product.name.trim().is_empty() {
                return Err(LocatorError::Catalog(format!(
                    "product {} has a blank name",
                    product.id
                )));
            }
            if catalog.products.contains_key(&product.id) {
                return Err(LocatorError::Catalog(format!(
                    "duplicate product id {}",
                    product.id
                )));
            }
            let record = ProductRecord {
                id: product.id,
                name: product.name.trim().to_owned(),
                price: product.price,
                event: product.event,
            };
            catalog = catalog.with_product(record, &product.allergies);
        }

        for user in file.users {
            if catalog.user_allergies.contains_key(&user.id) {
                return Err(LocatorError::Catalog(format!(
                    "duplicate user id {}",
                    user.id
                )));
            }
            catalog = catalog.with_user(user.id, &user.allergies);
        }

        Ok(catalog)
    }

    /// TOML 파일에서 카탈로그를 로드합니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LocatorError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            LocatorError::Catalog(format!("failed to read {}: {e}", path.display()))
        })?;
        let catalog = Self::parse(&content)?;
        info!(
            path = %path.display(),
            products = catalog.product_count(),
            users = catalog.user_count(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    fn lookup(&self, name: &str) -> Option<&ProductRecord> {
        let keyword = name.trim();
        if keyword.is_empty() {
            return None;
        }
        self.products
            .values()
            .find(|p| p.name == keyword)
            .or_else(|| self.products.values().find(|p| p.name.contains(keyword)))
    }
}

impl ProductCatalog for InMemoryCatalog {
    async fn find_by_name(&self, name: &str) -> Result<Option<ProductRecord>, LocatorError> {
        Ok(self.lookup(name).cloned())
    }

    async fn find_allergy_tags(
        &self,
        product_id: ProductId,
    ) -> Result<HashSet<AllergyId>, LocatorError> {
        Ok(self
            .product_allergies
            .get(&product_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn user_allergies(&self, user_id: UserId) -> Result<HashSet<AllergyId>, LocatorError> {
        Ok(self
            .user_allergies
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}
