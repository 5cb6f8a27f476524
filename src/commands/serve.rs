use crate::constants::RESULT_CACHE_TTL_SECONDS;
use crate::server;
use crate::services::{InMemoryRepository, ObservationRepository, ResultCache, StockDataService};
use std::path::PathBuf;
use std::sync::Arc;

pub async fn run(port: u16, data_dir: PathBuf) {
    println!("🚀 Starting stockboard server on port {}", port);
    println!("📁 Observation directory: {}", data_dir.display());

    let repository = Arc::new(InMemoryRepository::new(data_dir));

    match repository.update().await {
        Ok(records) => {
            let companies = repository.list_companies().await;
            println!("✅ Observations loaded:");
            println!("   🏢 Companies: {}", companies.len());
            println!("   📅 Records:   {}", records);
        }
        Err(e) => {
            eprintln!("⚠️  Warning: failed to load observations: {}", e);
            eprintln!("   Server will start with an empty company catalog.");
        }
    }

    let service = StockDataService::new(repository);
    let results = Arc::new(ResultCache::new(RESULT_CACHE_TTL_SECONDS));

    if let Err(e) = server::serve(service, results, port).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
