//! Read-only access to the airdrop catalog that rankings refer to

use serde::{Deserialize, Serialize};

/// One catalog entry, as far as ranking display needs it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub category: String,
}

impl CatalogEntry {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        logo: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            logo: logo.into(),
            category: category.into(),
        }
    }
}

pub trait CatalogLookup: Send + Sync {
    fn get_by_ref(&self, subject_ref: &str) -> Option<CatalogEntry>;

    /// Every entry, in catalog order
    fn entries(&self) -> Vec<CatalogEntry>;
}

/// Fixed in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }
}

impl CatalogLookup for StaticCatalog {
    fn get_by_ref(&self, subject_ref: &str) -> Option<CatalogEntry> {
        self.entries.iter().find(|e| e.id == subject_ref).cloned()
    }

    fn entries(&self) -> Vec<CatalogEntry> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_lookup() {
        let catalog = StaticCatalog::new(vec![
            CatalogEntry::new("zk", "zkSync", "/zk.png", "Layer 2"),
            CatalogEntry::new("lz", "LayerZero", "/lz.png", "Bridge"),
        ]);
        assert_eq!(catalog.get_by_ref("lz").unwrap().name, "LayerZero");
        assert!(catalog.get_by_ref("nope").is_none());
        assert_eq!(catalog.entries().len(), 2);
    }
}
