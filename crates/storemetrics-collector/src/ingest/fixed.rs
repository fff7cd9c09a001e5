//! Fixed-shape convenience forms. Label shape and target metric are known
//! statically, so these skip name dispatch.

use axum::{body::Bytes, extract::State, response::IntoResponse};
use serde::Deserialize;
use storemetrics_core::LabelTuple;

use super::{accepted, decode, record, ROUTE_ERROR, ROUTE_INTERACTION, ROUTE_PAGELOAD};
use crate::app_state::AppState;
use crate::catalog::{FRONTEND_ERRORS, PAGE_LOAD_TIME, USER_INTERACTIONS};

#[derive(Debug, Deserialize)]
pub struct PageLoad {
    pub page: String,
    /// Seconds.
    pub duration: f64,
}

#[derive(Debug, Deserialize)]
pub struct Interaction {
    pub action: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorReport {
    #[serde(rename = "type")]
    pub kind: String,
}

pub async fn pageload(State(app): State<AppState>, body: Bytes) -> impl IntoResponse {
    if let Some(req) = decode::<PageLoad>(&app, ROUTE_PAGELOAD, &body) {
        let outcome = app
            .registry()
            .observe(PAGE_LOAD_TIME, LabelTuple::new(vec![req.page]), req.duration);
        record(&app, ROUTE_PAGELOAD, PAGE_LOAD_TIME, outcome);
    }
    accepted()
}

pub async fn interaction(State(app): State<AppState>, body: Bytes) -> impl IntoResponse {
    if let Some(req) = decode::<Interaction>(&app, ROUTE_INTERACTION, &body) {
        let outcome = app
            .registry()
            .inc(USER_INTERACTIONS, LabelTuple::new(vec![req.action]));
        record(&app, ROUTE_INTERACTION, USER_INTERACTIONS, outcome);
    }
    accepted()
}

pub async fn error(State(app): State<AppState>, body: Bytes) -> impl IntoResponse {
    if let Some(req) = decode::<ErrorReport>(&app, ROUTE_ERROR, &body) {
        let outcome = app
            .registry()
            .inc(FRONTEND_ERRORS, LabelTuple::new(vec![req.kind]));
        record(&app, ROUTE_ERROR, FRONTEND_ERRORS, outcome);
    }
    accepted()
}
