mod optimization_attempt_repo;
mod product_repo;
mod prompt_preferences_repo;
mod store_repo;

pub use optimization_attempt_repo::OptimizationAttemptRepo;
pub use product_repo::ProductRepo;
pub use prompt_preferences_repo::PromptPreferencesRepo;
pub use store_repo::StoreRepo;
