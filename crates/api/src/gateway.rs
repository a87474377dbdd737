//! Optimization Gateway: merges per-request overrides with stored
//! preferences, calls the description generator under a deadline, and
//! returns the result without persisting it.
//!
//! Every generator call is logged as an optimization attempt for the
//! store's analytics. Optimize-all runs under its own batch deadline;
//! products it could not reach in time are reported as retryable timeouts.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use shopseo_core::analytics::NewOptimizationAttempt;
use shopseo_core::generation::{DescriptionGenerator, GenerationError};
use shopseo_core::merchant::MAX_PAGE_LIMIT;
use shopseo_core::optimization::{
    build_generation_request, build_prompt, normalize_output, OptimizationResult,
    OptimizeOverrides, PromptPreviewRequest,
};
use shopseo_core::preferences::PromptPreferences;
use shopseo_core::types::DbId;
use shopseo_db::models::product::Product;
use shopseo_db::ShopRepository;

use crate::error::{AppError, AppResult};
use crate::preferences::PreferenceStore;
use crate::response::{OptimizedProduct, ProductFailure};

/// Outcome of optimizing every product of a store.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub products: Vec<OptimizedProduct>,
    pub errors: Vec<ProductFailure>,
}

impl BatchOutcome {
    pub fn has_failures(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub struct OptimizationGateway {
    repo: Arc<dyn ShopRepository>,
    preferences: Arc<PreferenceStore>,
    generator: Arc<dyn DescriptionGenerator>,
    timeout: Duration,
    batch_timeout: Duration,
    concurrency: usize,
}

impl OptimizationGateway {
    pub fn new(
        repo: Arc<dyn ShopRepository>,
        preferences: Arc<PreferenceStore>,
        generator: Arc<dyn DescriptionGenerator>,
        timeout: Duration,
        batch_timeout: Duration,
        concurrency: usize,
    ) -> Self {
        Self {
            repo,
            preferences,
            generator,
            timeout,
            batch_timeout,
            concurrency: concurrency.max(1),
        }
    }

    /// Optimize one product of a store.
    pub async fn optimize(
        &self,
        store_id: DbId,
        product_id: DbId,
        overrides: &OptimizeOverrides,
    ) -> AppResult<OptimizedProduct> {
        let product = self.repo.get_product(store_id, product_id).await?;
        let effective = self.effective_preferences(store_id, overrides).await?;

        let result = self.generate_for(&product, &effective, self.timeout).await?;
        Ok(OptimizedProduct::new(product.title, result))
    }

    /// Optimize every product of a store with bounded concurrency.
    ///
    /// Per-product failures are collected rather than aborting the batch.
    /// Products not finished when the batch deadline passes fail with a
    /// retryable timeout.
    pub async fn optimize_all(
        &self,
        store_id: DbId,
        overrides: &OptimizeOverrides,
    ) -> AppResult<BatchOutcome> {
        self.repo.get_store(store_id).await?;
        let effective = self.effective_preferences(store_id, overrides).await?;
        let products = self.all_products(store_id).await?;
        let total = products.len();

        let deadline = Instant::now() + self.batch_timeout;
        let effective = &effective;
        let results: Vec<(Product, Result<OptimizationResult, GenerationError>)> =
            stream::iter(products)
                .map(|product| async move {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    let result = if remaining.is_zero() {
                        Err(GenerationError::timeout(format!(
                            "Optimize-all deadline of {}s passed before this product was started",
                            self.batch_timeout.as_secs_f32()
                        )))
                    } else {
                        self.generate_for(&product, effective, remaining.min(self.timeout))
                            .await
                    };
                    (product, result)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        let mut outcome = BatchOutcome::default();
        for (product, result) in results {
            match result {
                Ok(result) => outcome
                    .products
                    .push(OptimizedProduct::new(product.title, result)),
                Err(err) => {
                    let parts = AppError::from(err).parts();
                    outcome.errors.push(ProductFailure {
                        product_id: product.id,
                        title: product.title,
                        error: parts.message,
                        code: parts.code,
                        details: parts.details,
                    });
                }
            }
        }
        outcome.products.sort_by_key(|p| p.id);
        outcome.errors.sort_by_key(|e| e.product_id);

        tracing::info!(
            store_id,
            total,
            succeeded = outcome.products.len(),
            failed = outcome.errors.len(),
            "Optimize-all finished"
        );
        Ok(outcome)
    }

    /// Render the prompt that would be sent for `request`, without calling
    /// the generator.
    pub async fn preview(&self, store_id: DbId, request: &PromptPreviewRequest) -> AppResult<String> {
        self.repo.get_store(store_id).await?;
        let effective = self
            .effective_preferences(store_id, &request.overrides())
            .await?;
        Ok(build_prompt(&effective, &request.sample_product()))
    }

    /// Stored preferences with the request's overrides applied.
    async fn effective_preferences(
        &self,
        store_id: DbId,
        overrides: &OptimizeOverrides,
    ) -> AppResult<PromptPreferences> {
        overrides.validate(self.preferences.catalog())?;
        let stored = self.preferences.get(store_id).await?;
        Ok(overrides.apply_to(&stored))
    }

    async fn all_products(&self, store_id: DbId) -> AppResult<Vec<Product>> {
        let mut all = Vec::new();
        loop {
            let offset = i64::try_from(all.len()).unwrap_or(i64::MAX);
            let page = self
                .repo
                .list_products(store_id, MAX_PAGE_LIMIT, offset)
                .await?;
            let done = page.len() < usize::try_from(MAX_PAGE_LIMIT).unwrap_or(usize::MAX);
            all.extend(page);
            if done {
                return Ok(all);
            }
        }
    }

    /// One generator call for one product, bounded by `budget`.
    async fn generate_for(
        &self,
        product: &Product,
        prefs: &PromptPreferences,
        budget: Duration,
    ) -> Result<OptimizationResult, GenerationError> {
        let context = product.context();
        context.ensure_usable()?;

        let request = build_generation_request(prefs, &context);
        let started = Instant::now();

        let raw = match tokio::time::timeout(budget, self.generator.generate(&request)).await {
            Ok(raw) => raw,
            Err(_) => Err(GenerationError::timeout(format!(
                "{} did not answer within {}s",
                self.generator.provider_name(),
                budget.as_secs_f32()
            ))),
        };

        let outcome = raw.and_then(|text| normalize_output(&text));
        let elapsed_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
        self.record_attempt(product, outcome.as_ref().err(), elapsed_ms)
            .await;

        match outcome {
            Ok(optimized) => {
                tracing::info!(
                    store_id = product.store_id,
                    product_id = product.id,
                    provider = self.generator.provider_name(),
                    elapsed_ms,
                    "Description generated"
                );
                Ok(OptimizationResult {
                    product_id: product.id,
                    original_description: context.original_description().to_string(),
                    optimized_description: optimized,
                    generated_at: Utc::now(),
                })
            }
            Err(err) => {
                tracing::warn!(
                    store_id = product.store_id,
                    product_id = product.id,
                    provider = self.generator.provider_name(),
                    kind = %err.kind,
                    retryable = err.retryable(),
                    elapsed_ms,
                    "Description generation failed"
                );
                Err(err)
            }
        }
    }

    /// Log one generator call. Write failures are logged, not returned.
    async fn record_attempt(
        &self,
        product: &Product,
        error: Option<&GenerationError>,
        elapsed_ms: i64,
    ) {
        let attempt = NewOptimizationAttempt {
            store_id: product.store_id,
            product_id: product.id,
            error_kind: error.map(|err| err.kind),
            elapsed_ms,
        };
        if let Err(err) = self.repo.record_attempt(&attempt).await {
            tracing::warn!(
                store_id = product.store_id,
                product_id = product.id,
                error = %err,
                "Failed to record optimization attempt"
            );
        }
    }
}
