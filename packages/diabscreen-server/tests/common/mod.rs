//! Router harness shared by the HTTP suites

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use diabscreen_core::{ScoringStrategy, ServerConfig};
use diabscreen_server::{create_router, AppState};
use diabscreen_storage::InMemoryExpertStore;

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryExpertStore,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_strategy(ScoringStrategy::RuleBased)
    }

    pub fn with_strategy(strategy: ScoringStrategy) -> Self {
        let store = InMemoryExpertStore::with_seed_data();
        let mut config = ServerConfig::default();
        config.strategy = strategy;
        let router = create_router(AppState::new(Arc::new(store.clone()), config));
        Self { router, store }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    async fn send(&self, method: Method, uri: &str, body: Option<String>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}
