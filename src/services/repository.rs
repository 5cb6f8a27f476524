use crate::error::Result;
use crate::models::{Observation, ObservationCatalog};
use crate::services::csv_loader;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Backing store contract for the query service: ordered range lookup per
/// company key plus company enumeration, and the write side used by
/// ingestion. The query logic stays independent of whether the store is
/// an in-memory map, a file, or a database.
#[async_trait]
pub trait ObservationRepository: Send + Sync {
    /// All known company identifiers, sorted ascending.
    async fn list_companies(&self) -> Vec<String>;

    /// All observations for `company` whose date lies in `[from, to]`
    /// inclusive (unbounded below when `from` is `None`), ascending by
    /// date. An unknown company yields an empty vector, not an error.
    async fn records_from_to(
        &self,
        company: &str,
        from: Option<NaiveDate>,
        to: NaiveDate,
    ) -> Vec<Observation>;

    /// Insert one record for a company. An existing record with the same
    /// date is overwritten.
    async fn save(&self, company: &str, observation: Observation);

    /// Bulk refresh from the backing feed, replacing the whole catalog.
    /// Returns the number of records loaded.
    async fn update(&self) -> Result<usize>;
}

pub type SharedRepository = Arc<dyn ObservationRepository>;

/// Insert into a date-sorted series, keeping it sorted; a duplicate date
/// overwrites the existing record.
pub(crate) fn insert_sorted(series: &mut Vec<Observation>, observation: Observation) {
    let idx = series.partition_point(|o| o.date < observation.date);
    if series.get(idx).is_some_and(|o| o.date == observation.date) {
        series[idx] = observation;
    } else {
        series.insert(idx, observation);
    }
}

/// In-memory repository backed by per-company CSV files.
pub struct InMemoryRepository {
    data: RwLock<ObservationCatalog>,
    data_dir: PathBuf,
}

impl InMemoryRepository {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data: RwLock::new(BTreeMap::new()),
            data_dir,
        }
    }
}

#[async_trait]
impl ObservationRepository for InMemoryRepository {
    async fn list_companies(&self) -> Vec<String> {
        self.data.read().await.keys().cloned().collect()
    }

    async fn records_from_to(
        &self,
        company: &str,
        from: Option<NaiveDate>,
        to: NaiveDate,
    ) -> Vec<Observation> {
        let data = self.data.read().await;
        let Some(series) = data.get(company) else {
            return Vec::new();
        };

        // The series is sorted by date, so the inclusive range is a
        // partition_point-bounded slice.
        let start = match from {
            Some(from) => series.partition_point(|o| o.date < from),
            None => 0,
        };
        let end = series.partition_point(|o| o.date <= to);
        if start >= end {
            return Vec::new();
        }
        series[start..end].to_vec()
    }

    async fn save(&self, company: &str, observation: Observation) {
        let mut data = self.data.write().await;
        let series = data.entry(company.to_string()).or_default();
        insert_sorted(series, observation);
    }

    async fn update(&self) -> Result<usize> {
        // Build the new catalog off-lock, then swap in one write.
        let catalog = csv_loader::load_directory(&self.data_dir)?;
        let records: usize = catalog.values().map(Vec::len).sum();
        let companies = catalog.len();

        let mut data = self.data.write().await;
        *data = catalog;

        info!(companies, records, "Observation catalog refreshed");
        Ok(records)
    }
}
