use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::LinkError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Declarative description of one linkage pass, parsed from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkConfig {
    /// Human-readable name, echoed into reports.
    pub name: String,
    pub destination: TableConfig,
    pub source: TableConfig,
    pub merge: MergeConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    /// CSV path, resolved relative to the config file by the caller.
    pub file: String,
    pub columns: ColumnRoles,
}

/// Column roles inside one table. Only the name is required; leaving a role
/// out on either side disables that comparator tier for the whole pass.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnRoles {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MergeConfig {
    /// Source columns carried into every output row, in order. A name that
    /// already exists in the destination overlays that column instead of
    /// appending a new one.
    pub columns_to_add: Vec<String>,
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

/// What to do with source rows sharing a linkage name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Collapse same-name rows to the first occurrence.
    KeepFirst,
    /// Keep every row and let the comparators tell them apart.
    KeepAll,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        Self::KeepAll
    }
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeepFirst => write!(f, "keep_first"),
            Self::KeepAll => write!(f, "keep_all"),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Minimum normalized edit-distance similarity for plain product names.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Category name to keyword list. Empty means the built-in taxonomy.
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            categories: BTreeMap::new(),
        }
    }
}

fn default_similarity_threshold() -> f64 {
    0.8
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Merged CSV path; CLI flags override it.
    #[serde(default)]
    pub csv: Option<String>,
    /// JSON report path.
    #[serde(default)]
    pub json: Option<String>,
    /// Restrict and reorder the output columns. Unknown names are skipped
    /// with a warning.
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Parse + validate
// ---------------------------------------------------------------------------

impl LinkConfig {
    pub fn from_toml(input: &str) -> Result<Self, LinkError> {
        let config: LinkConfig =
            toml::from_str(input).map_err(|e| LinkError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LinkError> {
        if self.destination.columns.name.trim().is_empty()
            || self.source.columns.name.trim().is_empty()
        {
            return Err(LinkError::ConfigValidation(
                "both tables must map a non-empty name column".into(),
            ));
        }

        if self.merge.columns_to_add.is_empty() {
            return Err(LinkError::ConfigValidation(
                "merge.columns_to_add must list at least one source column".into(),
            ));
        }

        let threshold = self.catalog.similarity_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(LinkError::ConfigValidation(format!(
                "catalog.similarity_threshold must be in (0, 1], got {threshold}"
            )));
        }

        for (category, keywords) in &self.catalog.categories {
            if keywords.is_empty() {
                return Err(LinkError::ConfigValidation(format!(
                    "catalog category '{category}' has no keywords"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "waybill-link"

[destination]
file = "pending.csv"

[destination.columns]
name = "收件人"
phone = "电话"
address = "地址"
product = "商品"

[source]
file = "logistics.csv"

[source.columns]
name = "姓名"
phone = "手机号"
address = "收货地址"
product = "商品明细"

[merge]
columns_to_add = ["运单号", "商品明细"]
duplicate_policy = "keep_all"
"#;

    #[test]
    fn parses_valid_config() {
        let config = LinkConfig::from_toml(VALID).unwrap();
        assert_eq!(config.name, "waybill-link");
        assert_eq!(config.destination.columns.name, "收件人");
        assert_eq!(config.source.columns.phone.as_deref(), Some("手机号"));
        assert_eq!(config.merge.columns_to_add.len(), 2);
        assert_eq!(config.merge.duplicate_policy, DuplicatePolicy::KeepAll);
        assert_eq!(config.catalog.similarity_threshold, 0.8);
        assert!(config.catalog.categories.is_empty());
        assert!(config.output.csv.is_none());
    }

    #[test]
    fn optional_roles_default_to_none() {
        let minimal = r#"
name = "names-only"

[destination]
file = "a.csv"

[destination.columns]
name = "n"

[source]
file = "b.csv"

[source.columns]
name = "n"

[merge]
columns_to_add = ["c"]
"#;
        let config = LinkConfig::from_toml(minimal).unwrap();
        assert!(config.destination.columns.phone.is_none());
        assert!(config.source.columns.product.is_none());
        assert_eq!(config.merge.duplicate_policy, DuplicatePolicy::KeepAll);
    }

    #[test]
    fn rejects_empty_columns_to_add() {
        let input = VALID.replace(
            "columns_to_add = [\"运单号\", \"商品明细\"]",
            "columns_to_add = []",
        );
        let err = LinkConfig::from_toml(&input).unwrap_err();
        assert!(matches!(err, LinkError::ConfigValidation(_)));
    }

    #[test]
    fn rejects_bad_threshold() {
        let input = format!("{VALID}\n[catalog]\nsimilarity_threshold = 1.5\n");
        let err = LinkConfig::from_toml(&input).unwrap_err();
        assert!(matches!(err, LinkError::ConfigValidation(_)));

        let input = format!("{VALID}\n[catalog]\nsimilarity_threshold = 0.0\n");
        assert!(LinkConfig::from_toml(&input).is_err());
    }

    #[test]
    fn rejects_empty_category() {
        let input = format!("{VALID}\n[catalog.categories]\n\"杯子\" = []\n");
        let err = LinkConfig::from_toml(&input).unwrap_err();
        match err {
            LinkError::ConfigValidation(msg) => assert!(msg.contains("杯子")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_bad_duplicate_policy() {
        let input = VALID.replace("keep_all", "keep_some");
        assert!(matches!(
            LinkConfig::from_toml(&input),
            Err(LinkError::ConfigParse(_))
        ));
    }

    #[test]
    fn custom_catalog_parses() {
        let input = format!(
            "{VALID}\n[catalog]\nsimilarity_threshold = 0.6\n\n[catalog.categories]\n\"杯子\" = [\"保温杯\", \"水杯\"]\n"
        );
        let config = LinkConfig::from_toml(&input).unwrap();
        assert_eq!(config.catalog.similarity_threshold, 0.6);
        assert_eq!(config.catalog.categories["杯子"].len(), 2);
    }
}
