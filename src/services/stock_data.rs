use crate::models::Observation;
use crate::services::repository::SharedRepository;
use chrono::NaiveDate;

/// Read-side facade over the observation repository. Both operations are
/// pure reads with no mutation; an unknown company is an empty result,
/// not an error.
#[derive(Clone)]
pub struct StockDataService {
    repository: SharedRepository,
}

impl StockDataService {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    /// Known company identifiers, sorted ascending
    pub async fn list_companies(&self) -> Vec<String> {
        self.repository.list_companies().await
    }

    /// Observations for `company` with date in `[from, to]` inclusive,
    /// ascending; unbounded below when `from` is `None`
    pub async fn records_from_to(
        &self,
        company: &str,
        from: Option<NaiveDate>,
        to: NaiveDate,
    ) -> Vec<Observation> {
        self.repository.records_from_to(company, from, to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{InMemoryRepository, ObservationRepository};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn observation(date: &str, price: f64) -> Observation {
        Observation::new(
            date.parse().unwrap(),
            Some(price),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        )
    }

    async fn service() -> StockDataService {
        let repository = InMemoryRepository::new(PathBuf::from("unused"));
        repository.save("ALK", observation("2023-01-01", 100.0)).await;
        repository.save("ALK", observation("2023-01-05", 102.0)).await;
        repository.save("KMB", observation("2023-01-03", 15.0)).await;
        StockDataService::new(Arc::new(repository))
    }

    #[tokio::test]
    async fn test_list_companies_delegates() {
        let service = service().await;
        assert_eq!(service.list_companies().await, vec!["ALK", "KMB"]);
    }

    #[tokio::test]
    async fn test_records_from_to_delegates() {
        let service = service().await;
        let records = service
            .records_from_to(
                "ALK",
                Some("2023-01-02".parse().unwrap()),
                "2023-01-06".parse().unwrap(),
            )
            .await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date.to_string(), "2023-01-05");
    }

    #[tokio::test]
    async fn test_company_with_no_records_yields_empty() {
        let service = service().await;
        let records = service
            .records_from_to(
                "GRNT",
                Some("2000-01-01".parse().unwrap()),
                "2030-01-01".parse().unwrap(),
            )
            .await;
        assert!(records.is_empty());
    }
}
