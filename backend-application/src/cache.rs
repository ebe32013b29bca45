// Result cache
// Memoizes risk profiles per merchant, keyed by a data-version
// fingerprint, with single-flight semantics: at most one computation
// per merchant key at a time; concurrent callers for the same key wait
// for and receive that result. Errors are never cached.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use backend_domain::{Fingerprint, MerchantId, RiskProfile, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerprintStrategy {
    /// Transaction count plus latest timestamp. Cheap; detects
    /// "something new arrived".
    CountLatest,
    /// sha256 over the sorted transaction ids, for stores where
    /// count+latest can alias.
    Digest,
}

impl FingerprintStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "count-latest" => Some(FingerprintStrategy::CountLatest),
            "digest" => Some(FingerprintStrategy::Digest),
            _ => None,
        }
    }

    pub fn fingerprint(&self, history: &[Transaction]) -> Fingerprint {
        match self {
            FingerprintStrategy::CountLatest => {
                let latest = history
                    .iter()
                    .map(|tx| tx.timestamp.timestamp_millis())
                    .max()
                    .unwrap_or(0);
                Fingerprint(format!("{}:{}", history.len(), latest))
            }
            FingerprintStrategy::Digest => {
                let mut ids: Vec<&str> =
                    history.iter().map(|tx| tx.transaction_id.as_str()).collect();
                ids.sort_unstable();
                let mut hasher = Sha256::new();
                for id in ids {
                    hasher.update(id.as_bytes());
                    hasher.update([0u8]);
                }
                Fingerprint(format!("{:x}", hasher.finalize()))
            }
        }
    }
}

#[derive(Default)]
struct Slot {
    profile: Option<RiskProfile>,
}

struct Entry {
    slot: Mutex<Slot>,
    last_used: AtomicU64,
}

pub struct RiskProfileCache {
    capacity: usize,
    entries: Mutex<HashMap<MerchantId, Arc<Entry>>>,
    clock: AtomicU64,
    computations: AtomicU64,
}

impl RiskProfileCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
            clock: AtomicU64::new(0),
            computations: AtomicU64::new(0),
        }
    }

    /// Underlying computations performed since startup.
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn invalidate(&self, merchant_id: &MerchantId) {
        self.entries.lock().await.remove(merchant_id);
    }

    /// Returns the cached profile when the fingerprint still matches,
    /// otherwise runs `compute` exactly once for this key while
    /// concurrent callers wait on the per-key lock. The second element
    /// is true when this call performed the computation.
    pub async fn get_or_compute<F, Fut>(
        &self,
        merchant_id: &MerchantId,
        fingerprint: Fingerprint,
        compute: F,
    ) -> anyhow::Result<(RiskProfile, bool)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<RiskProfile>>,
    {
        let tick = self.clock.fetch_add(1, Ordering::Relaxed) + 1;
        let entry = {
            let mut entries = self.entries.lock().await;
            let entry = entries
                .entry(merchant_id.clone())
                .or_insert_with(|| {
                    Arc::new(Entry {
                        slot: Mutex::new(Slot::default()),
                        last_used: AtomicU64::new(tick),
                    })
                })
                .clone();
            entry.last_used.store(tick, Ordering::Relaxed);
            if entries.len() > self.capacity {
                evict_lru(&mut entries, merchant_id);
            }
            entry
        };

        // Single-flight point: one computation per merchant key.
        let mut slot = entry.slot.lock().await;
        if let Some(profile) = &slot.profile {
            if profile.fingerprint == fingerprint {
                return Ok((profile.clone(), false));
            }
        }

        self.computations.fetch_add(1, Ordering::Relaxed);
        // A failed computation leaves the previous entry in place so the
        // next call retries cleanly.
        let profile = compute().await?;
        slot.profile = Some(profile.clone());
        Ok((profile, true))
    }
}

fn evict_lru(entries: &mut HashMap<MerchantId, Arc<Entry>>, keep: &MerchantId) {
    let victim = entries
        .iter()
        .filter(|(id, _)| *id != keep)
        .min_by_key(|(_, entry)| entry.last_used.load(Ordering::Relaxed))
        .map(|(id, _)| id.clone());
    if let Some(victim) = victim {
        entries.remove(&victim);
    }
}
