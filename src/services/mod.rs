pub mod csv_loader;
pub mod repository;
pub mod result_cache;
pub mod stock_data;

pub use repository::{InMemoryRepository, ObservationRepository, SharedRepository};
pub use result_cache::{ResultCache, SharedResultCache};
pub use stock_data::StockDataService;
