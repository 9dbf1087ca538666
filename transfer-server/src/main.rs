use std::net::SocketAddr;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use transfer_server::cache::{CacheConfig, CachedStore};
use transfer_server::programs::ProgramDirectory;
use transfer_server::store::{StoreClient, StoreConfig};
use transfer_server::web::{AppState, create_router};

/// How often to refresh the program directory (24 hours).
const PROGRAM_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Get store credentials from environment
    let base_url = std::env::var("STORE_URL").unwrap_or_else(|_| {
        eprintln!("Warning: STORE_URL not set. Store calls will fail.");
        String::new()
    });
    let api_key = std::env::var("STORE_API_KEY").unwrap_or_else(|_| {
        eprintln!("Warning: STORE_API_KEY not set. Store calls will fail.");
        String::new()
    });

    // Create store client
    let store_config = StoreConfig::new(&base_url, &api_key);
    let client = StoreClient::new(store_config).expect("Failed to create store client");

    // Create cached store
    let cached_store = CachedStore::new(client.clone(), &CacheConfig::default());

    // Fetch the program directory (fail fast if unavailable)
    println!("Fetching programs...");
    let directory = ProgramDirectory::fetch(client)
        .await
        .expect("Failed to fetch programs");
    println!("Loaded {} programs", directory.len().await);

    // Warm the reference-data caches
    let (edges, programs) =
        futures::future::join(cached_store.transfer_edges(), cached_store.programs()).await;
    match edges {
        Ok(edges) => println!("Loaded {} transfer edges", edges.len()),
        Err(e) => eprintln!("Failed to prefetch transfer edges: {}", e),
    }
    if let Err(e) = programs {
        eprintln!("Failed to prefetch programs: {}", e);
    }

    // Spawn background task to refresh the program directory daily
    let directory_refresh = directory.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PROGRAM_REFRESH_INTERVAL);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match directory_refresh.refresh().await {
                Ok(count) => println!("Refreshed program directory: {} programs", count),
                Err(e) => eprintln!("Failed to refresh program directory: {}", e),
            }
        }
    });

    // Build app state
    let state = AppState::new(cached_store, directory);

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    println!("Transfer Path Server listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health                  - Health check");
    println!("  GET  /api/programs            - List loyalty programs");
    println!("  GET  /api/points/:user_id     - User point balances");
    println!("  GET  /api/itineraries         - Search itineraries");
    println!("  POST /transfer/path           - Find best transfer path");
    println!("  POST /transfer/plan           - Plan per-hop transfer amounts");
    println!("  POST /itinerary/bookability   - Resolve itinerary bookability");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
