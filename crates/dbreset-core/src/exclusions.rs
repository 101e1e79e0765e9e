//! Schema exclusion set
//!
//! The fixed list of schemas that are never carried forward from the old
//! data directory and never included in the export. The same set feeds
//! both the merge walk and the dump command line.

/// Schemas excluded by default: the system schema, the bundled admin
/// tool's metadata schema, the performance metrics schema, and the
/// default test schema.
pub const DEFAULT_EXCLUSIONS: [&str; 4] = ["mysql", "phpmyadmin", "performance_schema", "test"];

/// Set of schema names deliberately left behind by the reset
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    names: Vec<String>,
}

impl ExclusionSet {
    /// The standard exclusion set for the bundled stack
    pub fn standard() -> Self {
        Self::from_names(DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()))
    }

    /// Build a set from arbitrary names, preserving first-seen order and
    /// dropping duplicates
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        let mut deduped: Vec<String> = Vec::new();
        for name in names {
            if !deduped.contains(&name) {
                deduped.push(name);
            }
        }
        Self { names: deduped }
    }

    /// Whether the given schema name is excluded
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Excluded schema names in set order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// One `--ignore-database=<name>` flag per excluded schema
    pub fn ignore_flags(&self) -> Vec<String> {
        self.names
            .iter()
            .map(|name| format!("--ignore-database={}", name))
            .collect()
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::standard()
    }
}
