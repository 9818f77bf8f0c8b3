use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use mongodb::{options::ClientOptions, Client};

use tokenwatch::scheduler::Scheduler;
use tokenwatch::services::{db_init, moralis::MoralisClient, notifier, tracker};
use tokenwatch::{config, routes, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();
    let timeout = Duration::from_secs(settings.http_timeout_secs);

    // Mongo connection; the handle is shared by every component
    let mut mongo_opts = ClientOptions::parse(&settings.mongodb_uri)
        .await
        .expect("Invalid MONGODB_URI");
    mongo_opts.server_selection_timeout = Some(timeout);

    let client = Client::with_options(mongo_opts).expect("Failed to build MongoDB client");
    let db = client.database(&settings.mongodb_db);

    if let Err(e) = db_init::ensure_indexes(&db).await {
        tracing::warn!("index bootstrap failed: {e}");
    }

    let price_source = Arc::new(
        MoralisClient::new(settings.moralis_api_key.clone(), timeout)
            .expect("Failed to build Moralis client"),
    );
    let notifier = notifier::from_settings(&settings);

    let state = AppState {
        db,
        settings: settings.clone(),
        price_source,
        notifier,
    };

    // Periodic fetch -> store -> detect -> match pipeline
    let tick_state = state.clone();
    let mut scheduler = Scheduler::new(
        Duration::from_secs(settings.poll_interval_secs),
        move || {
            let state = tick_state.clone();
            async move { tracker::run_cycle(&state).await }.boxed()
        },
    );
    scheduler.start();
    tracing::info!(
        interval_secs = settings.poll_interval_secs,
        "price tracker started"
    );

    let app = routes::app(state);

    let addr = SocketAddr::from((
        settings.host.parse::<std::net::IpAddr>().unwrap(),
        settings.port,
    ));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .unwrap();

    // Let the in-flight cycle finish before the process exits
    tracing::info!("shutting down");
    scheduler.stop().await;
}
