#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use shopseo_api::config::{ServerConfig, StorageBackend};
use shopseo_api::router::build_app_router;
use shopseo_api::state::AppState;
use shopseo_core::generation::{DescriptionGenerator, GenerationError, GenerationRequest};
use shopseo_core::options::OptionsCatalog;
use shopseo_core::types::DbId;
use shopseo_db::models::product::{Product, UpsertProduct};
use shopseo_db::models::store::{CreateStore, Store};
use shopseo_db::{MemoryShopRepository, ShopRepository};

/// Text the stub returns when nothing else is scripted.
pub const DEFAULT_OUTPUT: &str = "Optimized copy";

// ---------------------------------------------------------------------------
// Stub generator
// ---------------------------------------------------------------------------

/// A scripted [`DescriptionGenerator`] that records every request.
#[derive(Default)]
pub struct StubGenerator {
    scripted: Mutex<VecDeque<Result<String, GenerationError>>>,
    /// Fail any request whose prompt contains the needle.
    failures: Mutex<Vec<(String, GenerationError)>>,
    requests: Mutex<Vec<GenerationRequest>>,
    delay: Option<Duration>,
}

impl StubGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator that sleeps before every answer.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Queue the outcome of the next call.
    pub fn push(&self, outcome: Result<String, GenerationError>) {
        self.scripted.lock().unwrap().push_back(outcome);
    }

    pub fn fail_when_prompt_contains(&self, needle: &str, err: GenerationError) {
        self.failures
            .lock()
            .unwrap()
            .push((needle.to_string(), err));
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> String {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|r| r.prompt.clone())
            .expect("generator was not called")
    }
}

#[async_trait]
impl DescriptionGenerator for StubGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()))
            .map(|(_, err)| err.clone());
        if let Some(err) = failure {
            return Err(err);
        }

        self.scripted
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_OUTPUT.to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }
}

// ---------------------------------------------------------------------------
// Test app
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        storage_backend: StorageBackend::Memory,
        database_url: None,
        options_catalog_path: None,
        optimize_all_concurrency: 4,
        optimize_all_timeout_secs: 60,
    }
}

pub struct TestApp {
    router: Router,
    pub repo: Arc<MemoryShopRepository>,
    pub generator: Arc<StubGenerator>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn seed_store(&self, shop_domain: &str) -> Store {
        self.repo
            .create_store(&CreateStore {
                shop_domain: shop_domain.to_string(),
                name: Some("Seeded Shop".to_string()),
            })
            .await
            .unwrap()
    }

    pub async fn seed_product(
        &self,
        store_id: DbId,
        shopify_product_id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Product {
        self.repo
            .upsert_product(
                store_id,
                &UpsertProduct {
                    shopify_product_id: shopify_product_id.to_string(),
                    title: title.to_string(),
                    description: description.map(str::to_string),
                    handle: None,
                    vendor: Some("Acme".to_string()),
                    product_type: Some("Kitchen".to_string()),
                    tags: vec!["ceramic".to_string()],
                },
            )
            .await
            .unwrap()
    }
}

/// Build the full application router over an in-memory repository and a
/// stub generator that answers immediately.
pub fn build_test_app() -> TestApp {
    build_test_app_with(StubGenerator::new(), Duration::from_secs(5))
}

pub fn build_test_app_with(generator: StubGenerator, generation_timeout: Duration) -> TestApp {
    build_test_app_with_catalog(generator, generation_timeout, OptionsCatalog::default())
}

pub fn build_test_app_with_catalog(
    generator: StubGenerator,
    generation_timeout: Duration,
    catalog: OptionsCatalog,
) -> TestApp {
    build_test_app_from_parts(generator, generation_timeout, catalog, test_config())
}

/// Like [`build_test_app_with`], with a custom server configuration.
pub fn build_test_app_with_config(
    generator: StubGenerator,
    generation_timeout: Duration,
    config: ServerConfig,
) -> TestApp {
    build_test_app_from_parts(generator, generation_timeout, OptionsCatalog::default(), config)
}

fn build_test_app_from_parts(
    generator: StubGenerator,
    generation_timeout: Duration,
    catalog: OptionsCatalog,
    config: ServerConfig,
) -> TestApp {
    let repo = Arc::new(MemoryShopRepository::new());
    let generator = Arc::new(generator);

    let state = AppState::new(
        Arc::clone(&repo) as Arc<dyn ShopRepository>,
        Arc::clone(&generator) as Arc<dyn DescriptionGenerator>,
        catalog,
        config.clone(),
        generation_timeout,
    );

    TestApp {
        router: build_app_router(state, &config),
        repo,
        generator,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, method: Method, uri: &str, body: Body) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Body::empty()).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Body::from(json.to_string())).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, Body::empty()).await
}

pub async fn put_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Body::from(json.to_string())).await
}

pub async fn put_raw(app: Router, uri: &str, raw: &'static str) -> Response<Body> {
    send(app, Method::PUT, uri, Body::from(raw)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Body::empty()).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
