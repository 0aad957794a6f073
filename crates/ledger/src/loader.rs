use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

use restock_inventory::{ItemTable, MovementTable};

use crate::cache::SnapshotCache;
use crate::error::LoadError;
use crate::parse::{LoadReport, parse_items, parse_movements};
use crate::source::{LedgerSources, TableFetcher};

/// Immutable catalog + ledger pair, shared by every computation of a session.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    pub items: ItemTable,
    pub movements: MovementTable,
    pub report: LoadReport,
    pub loaded_at: DateTime<Utc>,
}

impl LedgerSnapshot {
    pub fn new(items: ItemTable, movements: MovementTable, report: LoadReport) -> Self {
        Self {
            items,
            movements,
            report,
            loaded_at: Utc::now(),
        }
    }

    /// Fetch and parse both tables. Any fetch failure fails the whole load.
    pub fn fetch<F: TableFetcher + ?Sized>(fetcher: &F, sources: &LedgerSources) -> Result<Self, LoadError> {
        let movements_text = fetcher.fetch(&sources.movements)?;
        let items_text = fetcher.fetch(&sources.items)?;

        let mut report = LoadReport::default();
        let movements = parse_movements(&movements_text, &mut report)?;
        let items = parse_items(&items_text, &mut report)?;

        tracing::info!(
            items = items.len(),
            movements = movements.len(),
            skipped_rows = report.skipped_count(),
            duplicate_items = report.duplicate_items.len(),
            "ledger snapshot loaded"
        );
        Ok(Self::new(items, movements, report))
    }
}

/// Loads snapshots once per source pair and serves them from the cache afterwards.
#[derive(Debug)]
pub struct LedgerLoader<F> {
    fetcher: F,
    cache: SnapshotCache<LedgerSources, LedgerSnapshot>,
    /// Serializes cache misses so one source pair is never fetched twice concurrently.
    load_guard: Mutex<()>,
}

impl<F: TableFetcher> LedgerLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_ttl(fetcher, None)
    }

    pub fn with_ttl(fetcher: F, ttl: Option<Duration>) -> Self {
        Self {
            fetcher,
            cache: SnapshotCache::with_ttl(ttl),
            load_guard: Mutex::new(()),
        }
    }

    pub fn load(&self, sources: &LedgerSources) -> Result<Arc<LedgerSnapshot>, LoadError> {
        if let Some(hit) = self.cache.get(sources) {
            tracing::debug!(items = %sources.items, movements = %sources.movements, "snapshot cache hit");
            return Ok(hit);
        }

        let _guard = self.load_guard.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.cache
            .get_or_try_insert_with(sources, || LedgerSnapshot::fetch(&self.fetcher, sources))
    }

    /// Drop the cached snapshot and load it again.
    pub fn reload(&self, sources: &LedgerSources) -> Result<Arc<LedgerSnapshot>, LoadError> {
        self.invalidate(sources);
        self.load(sources)
    }

    pub fn invalidate(&self, sources: &LedgerSources) -> bool {
        self.cache.invalidate(sources)
    }

    pub fn cache(&self) -> &SnapshotCache<LedgerSources, LedgerSnapshot> {
        &self.cache
    }
}
