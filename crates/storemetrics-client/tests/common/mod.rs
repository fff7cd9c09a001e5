//! Live collector for client tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::time::Duration;

use storemetrics_collector::{build_router, config::CollectorConfig, AppState};
use storemetrics_core::RegistrySnapshot;

pub async fn spawn_collector() -> (String, AppState) {
    let state = AppState::new(CollectorConfig::default()).unwrap();
    let app = build_router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

/// Poll the collector's registry until `check` holds (detached sends land
/// asynchronously).
pub async fn eventually<F>(state: &AppState, check: F) -> bool
where
    F: Fn(&RegistrySnapshot) -> bool,
{
    for _ in 0..150 {
        if check(&state.registry().snapshot()) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
