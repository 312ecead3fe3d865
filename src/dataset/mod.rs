//! Read-only access to the static directory data.
//!
//! The four collections are loaded once at startup from JSON files in the
//! data directory and shared behind an `Arc` for the lifetime of the process.
//! A missing or malformed file is fatal; there is no per-request reload.

mod enrich;
mod nearby;
mod table;

pub use enrich::{enrich, JoinKey};
pub use nearby::{Anchor, AnchorKind, NearbyCampsite, DEFAULT_LIMIT, DEFAULT_RADIUS_KM};
pub use table::Table;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Campsite, Entity, Extra, FaqItem, Trail};

/// Errors raised while loading the dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset file not found: {0}")]
    Missing(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate {field} '{value}' in {collection}")]
    Duplicate {
        collection: &'static str,
        field: &'static str,
        value: String,
    },
}

/// The named collections a dataset exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Campsites,
    Trails,
    Extras,
    Faqs,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 4] = [
        CollectionKind::Campsites,
        CollectionKind::Trails,
        CollectionKind::Extras,
        CollectionKind::Faqs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Campsites => "campsites",
            Self::Trails => "trails",
            Self::Extras => "extras",
            Self::Faqs => "faq",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "campsites" | "campsite" | "places" => Some(Self::Campsites),
            "trails" | "trail" => Some(Self::Trails),
            "extras" | "extra" | "attractions" => Some(Self::Extras),
            "faq" | "faqs" => Some(Self::Faqs),
            _ => None,
        }
    }

    /// File name inside the data directory.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

/// A record type stored in one of the dataset's collections.
pub trait Record: Entity + Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: CollectionKind;

    fn table(dataset: &Dataset) -> &Table<Self>;
}

impl Record for Campsite {
    const KIND: CollectionKind = CollectionKind::Campsites;

    fn table(dataset: &Dataset) -> &Table<Self> {
        &dataset.campsites
    }
}

impl Record for Trail {
    const KIND: CollectionKind = CollectionKind::Trails;

    fn table(dataset: &Dataset) -> &Table<Self> {
        &dataset.trails
    }
}

impl Record for Extra {
    const KIND: CollectionKind = CollectionKind::Extras;

    fn table(dataset: &Dataset) -> &Table<Self> {
        &dataset.extras
    }
}

impl Record for FaqItem {
    const KIND: CollectionKind = CollectionKind::Faqs;

    fn table(dataset: &Dataset) -> &Table<Self> {
        &dataset.faqs
    }
}

/// In-memory directory data.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    campsites: Table<Campsite>,
    trails: Table<Trail>,
    extras: Table<Extra>,
    faqs: Table<FaqItem>,
}

impl Dataset {
    /// Load every collection from `dir`.
    pub fn load(dir: &Path) -> Result<Self, DatasetError> {
        let dataset = Self::from_parts(
            read_collection(dir)?,
            read_collection(dir)?,
            read_collection(dir)?,
            read_collection(dir)?,
        )?;

        info!(
            "Loaded dataset from {}: {} campsites, {} trails, {} extras, {} faqs",
            dir.display(),
            dataset.campsites.len(),
            dataset.trails.len(),
            dataset.extras.len(),
            dataset.faqs.len()
        );
        Ok(dataset)
    }

    /// Build a dataset from already-parsed collections, checking that ids and
    /// slugs are unique.
    pub fn from_parts(
        campsites: Vec<Campsite>,
        trails: Vec<Trail>,
        extras: Vec<Extra>,
        faqs: Vec<FaqItem>,
    ) -> Result<Self, DatasetError> {
        Ok(Self {
            campsites: Table::new(campsites)?,
            trails: Table::new(trails)?,
            extras: Table::new(extras)?,
            faqs: Table::new(faqs)?,
        })
    }

    /// An empty dataset.
    pub fn empty() -> Self {
        Self {
            campsites: Table::default(),
            trails: Table::default(),
            extras: Table::default(),
            faqs: Table::default(),
        }
    }

    /// All records of one collection, in file order.
    pub fn collection<T: Record>(&self) -> &[T] {
        T::table(self).rows()
    }

    /// Look a record up by identifier.
    pub fn find<T: Record>(&self, id: &str) -> Option<&T> {
        T::table(self).get(id)
    }

    /// Look a record up by slug.
    pub fn find_by_slug<T: Record>(&self, slug: &str) -> Option<&T> {
        T::table(self).get_by_slug(slug)
    }

    pub fn campsites(&self) -> &[Campsite] {
        self.collection()
    }

    pub fn trails(&self) -> &[Trail] {
        self.collection()
    }

    pub fn extras(&self) -> &[Extra] {
        self.collection()
    }

    pub fn faqs(&self) -> &[FaqItem] {
        self.collection()
    }

    /// Number of records in a collection.
    pub fn len_of(&self, kind: CollectionKind) -> usize {
        match kind {
            CollectionKind::Campsites => self.campsites.len(),
            CollectionKind::Trails => self.trails.len(),
            CollectionKind::Extras => self.extras.len(),
            CollectionKind::Faqs => self.faqs.len(),
        }
    }

    /// A whole collection as JSON.
    pub fn collection_json(&self, kind: CollectionKind) -> serde_json::Result<serde_json::Value> {
        match kind {
            CollectionKind::Campsites => serde_json::to_value(self.campsites()),
            CollectionKind::Trails => serde_json::to_value(self.trails()),
            CollectionKind::Extras => serde_json::to_value(self.extras()),
            CollectionKind::Faqs => serde_json::to_value(self.faqs()),
        }
    }

    /// One record as JSON, by slug. `Ok(None)` when the slug is unknown.
    pub fn record_json(
        &self,
        kind: CollectionKind,
        slug: &str,
    ) -> serde_json::Result<Option<serde_json::Value>> {
        match kind {
            CollectionKind::Campsites => record_to_json(self.find_by_slug::<Campsite>(slug)),
            CollectionKind::Trails => record_to_json(self.find_by_slug::<Trail>(slug)),
            CollectionKind::Extras => record_to_json(self.find_by_slug::<Extra>(slug)),
            CollectionKind::Faqs => record_to_json(self.find_by_slug::<FaqItem>(slug)),
        }
    }
}

fn record_to_json<T: Serialize>(
    record: Option<&T>,
) -> serde_json::Result<Option<serde_json::Value>> {
    record.map(serde_json::to_value).transpose()
}

/// Read and parse one collection file.
fn read_collection<T: Record>(dir: &Path) -> Result<Vec<T>, DatasetError> {
    let path = dir.join(T::KIND.file_name());
    if !path.exists() {
        return Err(DatasetError::Missing(path));
    }

    let contents = fs::read_to_string(&path).map_err(|source| DatasetError::Io {
        path: path.clone(),
        source,
    })?;

    let records: Vec<T> =
        serde_json::from_str(&contents).map_err(|source| DatasetError::Parse {
            path: path.clone(),
            source,
        })?;

    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}
