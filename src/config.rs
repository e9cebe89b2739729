//! Runtime configuration and the catalog's named defaults

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::types::Language;

/// Page sizes the question and category lists accept
pub const PAGE_SIZES: [usize; 3] = [25, 50, 100];

/// Page size used when the requested one is not in [`PAGE_SIZES`]
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Language of the base row of every logical question; lists show only this language
pub const DEFAULT_LANGUAGE: Language = Language::English;

/// Completeness reported for a question without a status entry.
/// The base row always exists, so the floor is one language, not zero.
pub const DEFAULT_COMPLETENESS: u8 = 1;

/// Number of languages a fully translated question has
pub const SUPPORTED_LANGUAGE_COUNT: u8 = Language::ALL.len() as u8;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// How the corpus-wide missing-translations count is computed.
/// Both strategies produce the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingCountStrategy {
    /// Enumerate every English question and resolve its translation set
    #[default]
    PerQuestion,
    /// List all rows once and group them by base question in memory
    Grouped,
}

impl MissingCountStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "per_question" | "per-question" => Some(Self::PerQuestion),
            "grouped" => Some(Self::Grouped),
            _ => None,
        }
    }
}

/// What happens when a French/Japanese row fails to persist during creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationWritePolicy {
    /// Log the failure and keep the partially translated question
    #[default]
    BestEffort,
    /// Remove the rows already written and surface the failure
    AllOrNothing,
}

impl TranslationWritePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "best_effort" | "best-effort" => Some(Self::BestEffort),
            "all_or_nothing" | "all-or-nothing" => Some(Self::AllOrNothing),
            _ => None,
        }
    }
}

/// Settings that change how the catalog behaves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogConfig {
    pub missing_count_strategy: MissingCountStrategy,
    pub translation_write_policy: TranslationWritePolicy,
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub bind_addr: SocketAddr,
    pub catalog: CatalogConfig,
    /// JSON snapshot loaded at startup and written on shutdown (None = memory only)
    pub snapshot_path: Option<PathBuf>,
}

impl AdminConfig {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        let bind_addr = match std::env::var("ADMIN_BIND_ADDR") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "Invalid ADMIN_BIND_ADDR '{}', falling back to {}",
                    raw,
                    DEFAULT_BIND_ADDR
                );
                default_bind_addr()
            }),
            Err(_) => default_bind_addr(),
        };

        let missing_count_strategy = match std::env::var("MISSING_COUNT_STRATEGY") {
            Ok(raw) => MissingCountStrategy::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Unknown MISSING_COUNT_STRATEGY '{}', using per_question", raw);
                MissingCountStrategy::default()
            }),
            Err(_) => MissingCountStrategy::default(),
        };

        let translation_write_policy = match std::env::var("TRANSLATION_WRITE_POLICY") {
            Ok(raw) => TranslationWritePolicy::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Unknown TRANSLATION_WRITE_POLICY '{}', using best_effort", raw);
                TranslationWritePolicy::default()
            }),
            Err(_) => TranslationWritePolicy::default(),
        };

        let snapshot_path = std::env::var("CATALOG_SNAPSHOT_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        if snapshot_path.is_none() {
            tracing::warn!("CATALOG_SNAPSHOT_PATH not set - catalog lives in memory only");
        }

        tracing::info!(
            %bind_addr,
            ?missing_count_strategy,
            ?translation_write_policy,
            "Admin config loaded"
        );

        Self {
            bind_addr,
            catalog: CatalogConfig {
                missing_count_strategy,
                translation_write_policy,
            },
            snapshot_path,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Clamp a requested page size to the allow-list
pub fn normalize_page_size(requested: Option<usize>) -> usize {
    match requested {
        Some(size) if PAGE_SIZES.contains(&size) => size,
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// Number of pages needed for `total` rows; an empty list still has one page
pub fn total_pages(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 1;
    }
    total.div_ceil(per_page).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "ADMIN_BIND_ADDR",
            "MISSING_COUNT_STRATEGY",
            "TRANSLATION_WRITE_POLICY",
            "CATALOG_SNAPSHOT_PATH",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_page_size_allow_list() {
        assert_eq!(normalize_page_size(Some(50)), 50);
        assert_eq!(normalize_page_size(Some(100)), 100);
        assert_eq!(normalize_page_size(Some(37)), DEFAULT_PAGE_SIZE);
        assert_eq!(normalize_page_size(Some(0)), DEFAULT_PAGE_SIZE);
        assert_eq!(normalize_page_size(None), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_total_pages_floor() {
        assert_eq!(total_pages(0, 25), 1);
        assert_eq!(total_pages(25, 25), 1);
        assert_eq!(total_pages(26, 25), 2);
        assert_eq!(total_pages(100, 50), 2);
    }

    #[test]
    fn test_supported_language_count() {
        assert_eq!(SUPPORTED_LANGUAGE_COUNT, 3);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = AdminConfig::from_env();
        assert_eq!(config.bind_addr, default_bind_addr());
        assert_eq!(config.catalog, CatalogConfig::default());
        assert!(config.snapshot_path.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("ADMIN_BIND_ADDR", "127.0.0.1:9000");
        std::env::set_var("MISSING_COUNT_STRATEGY", "grouped");
        std::env::set_var("TRANSLATION_WRITE_POLICY", "all_or_nothing");
        std::env::set_var("CATALOG_SNAPSHOT_PATH", "/tmp/catalog.json");

        let config = AdminConfig::from_env();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(
            config.catalog.missing_count_strategy,
            MissingCountStrategy::Grouped
        );
        assert_eq!(
            config.catalog.translation_write_policy,
            TranslationWritePolicy::AllOrNothing
        );
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/tmp/catalog.json")));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_values_fall_back() {
        clear_env();
        std::env::set_var("ADMIN_BIND_ADDR", "not an address");
        std::env::set_var("MISSING_COUNT_STRATEGY", "magic");
        std::env::set_var("TRANSLATION_WRITE_POLICY", "sometimes");

        let config = AdminConfig::from_env();
        assert_eq!(config.bind_addr, default_bind_addr());
        assert_eq!(config.catalog, CatalogConfig::default());
        clear_env();
    }
}
