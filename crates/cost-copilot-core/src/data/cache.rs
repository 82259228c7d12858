use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::data::loader::{DataSource, Dataset};
use crate::CostCopilotResult;

#[derive(Debug, Clone)]
struct CachedDataset {
    source: DataSource,
    dataset: Arc<Dataset>,
    loaded_at: DateTime<Utc>,
}

/// Memoizes one loaded dataset between analysis requests.
///
/// Entries only go away through `invalidate`, `reload`, or a request for a
/// different source. Failed loads leave the cache empty.
pub struct DatasetCache<F = fn(&DataSource) -> CostCopilotResult<Dataset>>
where
    F: Fn(&DataSource) -> CostCopilotResult<Dataset>,
{
    loader: F,
    entry: Option<CachedDataset>,
}

impl DatasetCache {
    /// Cache backed by the CSV loader.
    pub fn new() -> Self {
        DatasetCache {
            loader: Dataset::load,
            entry: None,
        }
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> DatasetCache<F>
where
    F: Fn(&DataSource) -> CostCopilotResult<Dataset>,
{
    /// Cache backed by a custom loader.
    pub fn with_loader(loader: F) -> Self {
        DatasetCache {
            loader,
            entry: None,
        }
    }

    /// The dataset for `source`, loading it on first use.
    pub fn get(&mut self, source: &DataSource) -> CostCopilotResult<Arc<Dataset>> {
        if let Some(ref cached) = self.entry {
            if cached.source == *source {
                return Ok(Arc::clone(&cached.dataset));
            }
            debug!("data source changed; replacing cached dataset");
        }

        let dataset = Arc::new((self.loader)(source)?);
        self.entry = Some(CachedDataset {
            source: source.clone(),
            dataset: Arc::clone(&dataset),
            loaded_at: Utc::now(),
        });
        Ok(dataset)
    }

    /// Drop the memoized dataset; the next `get` reloads.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("dataset cache invalidated");
        }
    }

    pub fn reload(&mut self, source: &DataSource) -> CostCopilotResult<Arc<Dataset>> {
        self.invalidate();
        self.get(source)
    }

    pub fn is_cached(&self) -> bool {
        self.entry.is_some()
    }

    /// When the cached dataset was loaded.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|e| e.loaded_at)
    }
}
