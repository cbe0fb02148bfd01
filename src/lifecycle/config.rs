use crate::catalog::promo::DEFAULT_PROMO_LIMIT;
use crate::inventory::DEFAULT_LOW_STOCK_THRESHOLD;

/// Catalog configuration.
///
/// # Environment
///
/// Every field can be overridden from the environment:
///
/// | Variable                    | Default | Meaning                                   |
/// |-----------------------------|---------|-------------------------------------------|
/// | `CATALOG_TABLE_BUFFER`      | 32      | request channel capacity of each table    |
/// | `CATALOG_PROMO_LIMIT`       | 10      | frames shown on the homepage              |
/// | `CATALOG_DEFAULT_THRESHOLD` | 5       | low-stock threshold when none is recorded |
///
/// ```ignore
/// CATALOG_PROMO_LIMIT=6 RUST_LOG=info cargo run
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub table_buffer: usize,
    pub promo_limit: usize,
    pub default_threshold: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            table_buffer: 32,
            promo_limit: DEFAULT_PROMO_LIMIT,
            default_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl CatalogConfig {
    /// Loads configuration from the environment, falling back to defaults for
    /// unset or unparsable variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            table_buffer: env_or("CATALOG_TABLE_BUFFER", defaults.table_buffer).max(1),
            promo_limit: env_or("CATALOG_PROMO_LIMIT", defaults.promo_limit),
            default_threshold: env_or("CATALOG_DEFAULT_THRESHOLD", defaults.default_threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.table_buffer, 32);
        assert_eq!(config.promo_limit, 10);
        assert_eq!(config.default_threshold, 5);
    }

    #[test]
    fn test_unparsable_value_falls_back() {
        assert_eq!(env_or("CATALOG_TEST_UNSET_VARIABLE", 7u32), 7);
    }
}
