//! Party Catalog
//!
//! Read-only reference dataset served by the API. The catalog is declared in
//! a data file (TOML by default, anything the `config` crate understands
//! otherwise) and indexed by id once at start-up.

use std::collections::HashMap;
use std::path::Path;

use ::config::{File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{AppError, AppResult};

/// Catalog bundled into the binary
const BUILTIN_CATALOG: &str = include_str!("../data/parties.toml");

/// One political party as served by `/api/parties`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub id: u32,
    pub name: String,
    pub color: String,
    pub logo_url: String,
    pub current_vision: String,
    pub future_vision: String,
    pub key_policies: Vec<String>,
    pub website_url: String,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    parties: Vec<Party>,
}

/// Immutable, declaration-ordered party list with an id index
#[derive(Debug, Clone)]
pub struct PartyCatalog {
    parties: Vec<Party>,
    index: HashMap<u32, usize>,
}

impl PartyCatalog {
    /// The catalog shipped with the application
    pub fn builtin() -> AppResult<Self> {
        Self::from_source(File::from_str(BUILTIN_CATALOG, FileFormat::Toml))
    }

    /// Load a catalog from a data file; the format follows the extension
    pub fn load(path: &Path) -> AppResult<Self> {
        info!(path = %path.display(), "Loading party catalog");
        Self::from_source(File::from(path))
    }

    fn from_source<S>(source: S) -> AppResult<Self>
    where
        S: ::config::Source + Send + Sync + 'static,
    {
        let file: CatalogFile = ::config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;

        Self::new(file.parties)
    }

    /// Build the catalog, rejecting empty lists and missing or duplicate ids
    pub fn new(parties: Vec<Party>) -> AppResult<Self> {
        if parties.is_empty() {
            return Err(AppError::InvalidRequest("party catalog is empty".to_string()));
        }

        let mut index = HashMap::with_capacity(parties.len());
        for (position, party) in parties.iter().enumerate() {
            if party.id == 0 {
                return Err(AppError::InvalidRequest(format!(
                    "party '{}' has id 0; ids must be positive",
                    party.name
                )));
            }
            if index.insert(party.id, position).is_some() {
                return Err(AppError::InvalidRequest(format!(
                    "duplicate party id {}",
                    party.id
                )));
            }
        }

        info!(parties = parties.len(), "Party catalog ready");
        Ok(Self { parties, index })
    }

    /// All parties in declaration order
    pub fn all(&self) -> &[Party] {
        &self.parties
    }

    pub fn get(&self, id: u32) -> Option<&Party> {
        self.index.get(&id).map(|&position| &self.parties[position])
    }

    pub fn len(&self) -> usize {
        self.parties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn party(id: u32, name: &str) -> Party {
        Party {
            id,
            name: name.to_string(),
            color: "#000000".to_string(),
            logo_url: format!("/logos/{}.png", name.to_lowercase()),
            current_vision: "Nu".to_string(),
            future_vision: "Straks".to_string(),
            key_policies: vec!["Eén".to_string(), "Twee".to_string()],
            website_url: "https://example.nl".to_string(),
        }
    }

    #[test]
    fn test_builtin_catalog_keeps_declaration_order() {
        let catalog = PartyCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 15);

        let ids: Vec<u32> = catalog.all().iter().map(|p| p.id).collect();
        assert_eq!(ids, (1..=15).collect::<Vec<_>>());
        assert_eq!(catalog.all()[0].name, "PVV");
        assert_eq!(catalog.all()[14].name, "BIJ1");
    }

    #[test]
    fn test_builtin_catalog_preserves_non_ascii() {
        let catalog = PartyCatalog::builtin().unwrap();
        let vvd = catalog.get(3).unwrap();
        assert_eq!(vvd.name, "VVD");
        assert!(vvd.future_vision.contains("efficiënt"));
        assert_eq!(vvd.key_policies.len(), 5);
    }

    #[test]
    fn test_get_by_id() {
        let catalog = PartyCatalog::new(vec![party(7, "CDA"), party(2, "SP")]).unwrap();
        assert_eq!(catalog.get(2).unwrap().name, "SP");
        assert_eq!(catalog.get(7).unwrap().name, "CDA");
        assert!(catalog.get(3).is_none());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = PartyCatalog::new(vec![party(1, "A"), party(1, "B")]).unwrap_err();
        assert!(err.to_string().contains("duplicate party id 1"));
    }

    #[test]
    fn test_rejects_zero_id_and_empty() {
        assert!(PartyCatalog::new(vec![party(0, "A")]).is_err());
        assert!(PartyCatalog::new(vec![]).is_err());
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parties.json");
        let body = serde_json::json!({ "parties": [party(4, "NSC"), party(5, "D66")] });
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", body).unwrap();

        let catalog = PartyCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(5).unwrap().key_policies, vec!["Eén", "Twee"]);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PartyCatalog::load(&dir.path().join("absent.toml")).is_err());
    }
}
