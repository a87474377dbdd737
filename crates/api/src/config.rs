use std::path::PathBuf;
use std::str::FromStr;

/// Which [`shopseo_db::ShopRepository`] implementation to run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "unknown storage backend '{other}' (expected 'postgres' or 'memory')"
            )),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. Provider
/// settings live in [`shopseo_gemini::GeminiConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`). Must exceed the
    /// generation timeout so provider timeouts surface as 504 JSON errors.
    pub request_timeout_secs: u64,
    /// Upper bound on closing storage after the server stops (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub storage_backend: StorageBackend,
    /// Required when `storage_backend` is Postgres.
    pub database_url: Option<String>,
    /// JSON file replacing the built-in options catalog.
    pub options_catalog_path: Option<PathBuf>,
    /// Maximum in-flight generations for optimize-all (default: `4`).
    pub optimize_all_concurrency: usize,
    /// Deadline for a whole optimize-all batch in seconds (default: `300`).
    /// Optimize-all is not subject to `request_timeout_secs`.
    pub optimize_all_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `60`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `30`                       |
    /// | `STORAGE_BACKEND`          | `postgres`                 |
    /// | `DATABASE_URL`             | (none)                     |
    /// | `OPTIONS_CATALOG_PATH`     | (none, built-in catalog)   |
    /// | `OPTIMIZE_ALL_CONCURRENCY` | `4`                        |
    /// | `OPTIMIZE_ALL_TIMEOUT_SECS`| `300`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let storage_backend: StorageBackend = std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".into())
            .parse()
            .unwrap_or_else(|e| panic!("STORAGE_BACKEND: {e}"));

        let database_url = std::env::var("DATABASE_URL").ok();
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            panic!("DATABASE_URL must be set when STORAGE_BACKEND=postgres");
        }

        let options_catalog_path = std::env::var("OPTIONS_CATALOG_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let optimize_all_concurrency: usize = std::env::var("OPTIMIZE_ALL_CONCURRENCY")
            .unwrap_or_else(|_| "4".into())
            .parse()
            .expect("OPTIMIZE_ALL_CONCURRENCY must be a valid usize");
        assert!(
            optimize_all_concurrency > 0,
            "OPTIMIZE_ALL_CONCURRENCY must be at least 1"
        );

        let optimize_all_timeout_secs: u64 = std::env::var("OPTIMIZE_ALL_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("OPTIMIZE_ALL_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            storage_backend,
            database_url,
            options_catalog_path,
            optimize_all_concurrency,
            optimize_all_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_backend_parses_case_insensitively() {
        assert_eq!("Memory".parse(), Ok(StorageBackend::Memory));
        assert_eq!("postgres".parse(), Ok(StorageBackend::Postgres));
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }
}
