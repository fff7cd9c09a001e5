//! Instrumented storefront calls against a mock product backend.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use storemetrics_client::{ClientError, MonitoringClient, Product, StorefrontClient};
use storemetrics_core::{Aggregate, LabelTuple};

use common::{eventually, spawn_collector};

type Catalog = Arc<Mutex<HashMap<u64, Product>>>;

async fn get_product(
    State(catalog): State<Catalog>,
    Path(id): Path<u64>,
) -> Result<Json<Product>, StatusCode> {
    catalog
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn purchase_product(State(catalog): State<Catalog>, Path(id): Path<u64>) -> StatusCode {
    let mut catalog = catalog.lock().unwrap();
    match catalog.get_mut(&id) {
        None => StatusCode::NOT_FOUND,
        Some(p) if p.stock <= 0 => StatusCode::BAD_REQUEST,
        Some(p) => {
            p.stock -= 1;
            StatusCode::OK
        }
    }
}

async fn spawn_backend() -> String {
    let catalog: Catalog = Arc::new(Mutex::new(
        [
            (1, "Laptop", 999.99, 10),
            (2, "Smartphone", 499.99, 20),
            (3, "Headphones", 99.99, 0),
        ]
        .into_iter()
        .map(|(id, name, price, stock)| {
            (
                id,
                Product {
                    id,
                    name: name.to_string(),
                    price,
                    stock,
                },
            )
        })
        .collect(),
    ));
    let app = Router::new()
        .route("/products/:id", get(get_product))
        .route("/products/:id/purchase", post(purchase_product))
        .with_state(catalog);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn load_products_reports_result_and_availability() {
    let (collector, state) = spawn_collector().await;
    let backend = spawn_backend().await;
    let store = StorefrontClient::new(backend, MonitoringClient::new(collector).unwrap());

    let products = store.load_products(&[1, 2, 3]).await.unwrap();
    assert_eq!(products.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3]);

    let err = store.load_products(&[1, 99]).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status, .. } if status == reqwest::StatusCode::NOT_FOUND));

    let landed = eventually(&state, |snap| {
        snap.get("frontend_api_result", &LabelTuple::from(["/products", "success"]))
            == Some(&Aggregate::Counter(1.0))
            && snap.get("frontend_api_result", &LabelTuple::from(["/products", "error"]))
                == Some(&Aggregate::Counter(1.0))
            && snap.get("frontend_product_availability", &LabelTuple::from(["1"]))
                == Some(&Aggregate::Gauge(1.0))
            && snap.get("frontend_product_availability", &LabelTuple::from(["3"]))
                == Some(&Aggregate::Gauge(0.0))
            && snap
                .get("frontend_api_latency", &LabelTuple::from(["/products"]))
                .and_then(Aggregate::as_histogram)
                .map(|h| h.count == 1)
                .unwrap_or(false)
    })
    .await;
    assert!(landed, "storefront metrics never arrived");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn purchase_reports_attempts() {
    let (collector, state) = spawn_collector().await;
    let backend = spawn_backend().await;
    let store = StorefrontClient::new(backend, MonitoringClient::new(collector).unwrap());

    let laptop = store.purchase(1).await.unwrap();
    assert_eq!(laptop.stock, 9);

    assert!(store.purchase(3).await.is_err(), "out of stock");
    assert!(store.purchase(4).await.is_err(), "unknown product");

    let landed = eventually(&state, |snap| {
        snap.get("frontend_purchase_attempt", &LabelTuple::from(["1", "success"]))
            == Some(&Aggregate::Counter(1.0))
            && snap.get("frontend_purchase_attempt", &LabelTuple::from(["3", "error"]))
                == Some(&Aggregate::Counter(1.0))
            && snap.get("frontend_purchase_attempt", &LabelTuple::from(["4", "error"]))
                == Some(&Aggregate::Counter(1.0))
            && snap
                .get("frontend_api_latency", &LabelTuple::from(["/products/1/purchase"]))
                .is_some()
    })
    .await;
    assert!(landed, "purchase metrics never arrived");
}

#[tokio::test]
async fn backend_failures_are_independent_of_telemetry() {
    // Neither backend nor collector is reachable; the backend error is the only one seen.
    let store = StorefrontClient::new(
        "http://127.0.0.1:1",
        MonitoringClient::new("http://127.0.0.1:1").unwrap(),
    );
    let err = store.load_products(&[1]).await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
}
