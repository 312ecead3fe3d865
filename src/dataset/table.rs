//! Indexed, immutable collection storage.

use std::collections::HashMap;

use super::{DatasetError, Record};
use crate::models::Entity;

/// Rows in file order plus id and slug indexes.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    rows: Vec<T>,
    by_id: HashMap<String, usize>,
    by_slug: HashMap<String, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            by_id: HashMap::new(),
            by_slug: HashMap::new(),
        }
    }
}

impl<T: Record> Table<T> {
    /// Index `rows`, rejecting duplicate ids or slugs.
    pub fn new(rows: Vec<T>) -> Result<Self, DatasetError> {
        let mut by_id = HashMap::with_capacity(rows.len());
        let mut by_slug = HashMap::with_capacity(rows.len());

        for (idx, row) in rows.iter().enumerate() {
            if by_id.insert(row.id().to_string(), idx).is_some() {
                return Err(DatasetError::Duplicate {
                    collection: T::KIND.as_str(),
                    field: "id",
                    value: row.id().to_string(),
                });
            }
            if by_slug.insert(row.slug().to_string(), idx).is_some() {
                return Err(DatasetError::Duplicate {
                    collection: T::KIND.as_str(),
                    field: "slug",
                    value: row.slug().to_string(),
                });
            }
        }

        Ok(Self {
            rows,
            by_id,
            by_slug,
        })
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.by_id.get(id).map(|&idx| &self.rows[idx])
    }

    pub fn get_by_slug(&self, slug: &str) -> Option<&T> {
        self.by_slug.get(slug).map(|&idx| &self.rows[idx])
    }
}
