//! 사용자별 매대 스캔 캐시
//!
//! [`ShelfScanCache`]는 사용자마다 가장 최근의 매대 스캔 하나를 TTL 동안 보관합니다.
//!
//! - 같은 사용자의 새 스캔은 이전 스캔을 통째로 대체합니다 (병합 없음, 마지막 쓰기 우선).
//! - 만료된 스캔은 조회 시 없는 것과 구분되지 않습니다.
//! - 조회는 `Arc<ShelfScan>` 스냅샷을 돌려주므로 이후의 쓰기에 영향을 받지 않습니다.
//! - 핸들은 `Clone`이며 모든 복제본이 같은 저장소를 공유합니다.
//!
//! 만료 판정은 `tokio::time::Instant`를 사용하므로 테스트에서
//! `tokio::time::pause()` / `advance()`로 시간을 제어할 수 있습니다.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, gauge};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use lookey_core::metrics as m;
use lookey_core::types::{ShelfScan, UserId};

use crate::config::LocatorConfig;
use crate::error::LocatorError;

/// TTL 상한 (약 100년). `Instant` 덧셈 오버플로를 막습니다.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

struct CacheEntry {
    scan: Arc<ShelfScan>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// 사용자별 매대 스캔 저장소
#[derive(Clone)]
pub struct ShelfScanCache {
    entries: Arc<RwLock<HashMap<UserId, CacheEntry>>>,
    ttl: Duration,
    max_entries: usize,
}

impl ShelfScanCache {
    /// 새 캐시를 생성합니다. TTL은 약 100년으로 제한됩니다.
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: ttl.min(MAX_TTL),
            max_entries: max_entries.max(1),
        }
    }

    /// 엔진 설정에서 캐시를 생성합니다.
    pub fn from_config(config: &LocatorConfig) -> Self {
        Self::new(config.cache_ttl(), config.cache_max_entries)
    }

    /// 스캔 유효 기간
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// `scan.user_id`의 스캔을 저장합니다. 기존 스캔은 대체됩니다.
    ///
    /// 이름이 비어 있는 상품은 버리고, 남은 상품이 없으면 저장하지 않고
    /// `EmptyDetection`을 반환합니다.
    /// 용량이 가득 차면 만료된 항목을 먼저 제거하고, 그래도 부족하면
    /// 만료가 가장 임박한 항목을 제거합니다.
    pub async fn put(&self, mut scan: ShelfScan) -> Result<Arc<ShelfScan>, LocatorError> {
        let before = scan.items.len();
        scan.items.retain(|item| !item.name.trim().is_empty());
        let dropped = before - scan.items.len();
        if dropped > 0 {
            warn!(user_id = scan.user_id, dropped, "dropping shelf items with blank names");
        }
        if scan.is_empty() {
            return Err(LocatorError::EmptyDetection);
        }

        let user_id = scan.user_id;
        let scan = Arc::new(scan);
        let now = Instant::now();

        let mut entries = self.entries.write().await;
        if !entries.contains_key(&user_id) && entries.len() >= self.max_entries {
            let expired = purge_locked(&mut entries, now);
            if expired > 0 {
                counter!(m::LOCATOR_SCANS_EXPIRED_TOTAL).increment(expired as u64);
            }
            if entries.len() >= self.max_entries {
                evict_soonest(&mut entries);
            }
        }

        let replaced = entries
            .insert(
                user_id,
                CacheEntry {
                    scan: Arc::clone(&scan),
                    expires_at: now + self.ttl,
                },
            )
            .is_some();
        gauge!(m::LOCATOR_CACHED_SCANS).set(entries.len() as f64);
        drop(entries);

        debug!(
            user_id,
            scan_id = %scan.scan_id,
            items = scan.len(),
            replaced,
            "shelf scan stored"
        );
        Ok(scan)
    }

    /// 사용자의 유효한 스캔 스냅샷을 반환합니다.
    pub async fn get(&self, user_id: UserId) -> Option<Arc<ShelfScan>> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .get(&user_id)
            .filter(|entry| entry.is_live(now))
            .map(|entry| Arc::clone(&entry.scan))
    }

    /// 만료된 항목을 제거하고 제거한 개수를 반환합니다.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let removed = purge_locked(&mut entries, now);
        gauge!(m::LOCATOR_CACHED_SCANS).set(entries.len() as f64);
        drop(entries);

        if removed > 0 {
            counter!(m::LOCATOR_SCANS_EXPIRED_TOTAL).increment(removed as u64);
            info!(removed, "expired shelf scans purged");
        }
        removed
    }

    /// 저장된 항목 수 (아직 제거되지 않은 만료 항목 포함)
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// 저장된 항목이 없는지 확인합니다.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn purge_locked(entries: &mut HashMap<UserId, CacheEntry>, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| entry.is_live(now));
    before - entries.len()
}

fn evict_soonest(entries: &mut HashMap<UserId, CacheEntry>) {
    let victim = entries
        .iter()
        .min_by_key(|(_, entry)| entry.expires_at)
        .map(|(user_id, _)| *user_id);
    if let Some(user_id) = victim {
        entries.remove(&user_id);
        debug!(user_id, "shelf scan cache full, evicted entry closest to expiry");
    }
}
