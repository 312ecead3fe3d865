//! Joining identifiers from a model reply back to dataset records.

use tracing::debug;

use super::{Dataset, Record};
use crate::models::Entity;

/// Which field of a record an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKey {
    Id,
    Slug,
}

/// Resolve `ids` against the dataset, preserving their order.
///
/// Identifiers that match nothing are dropped; everything else is kept,
/// repeats included. Matching is exact. The result is never padded and never
/// capped; callers truncate when they want a "top N".
pub fn enrich<'a, T, S>(dataset: &'a Dataset, ids: &[S], key: JoinKey) -> Vec<&'a T>
where
    T: Record,
    S: AsRef<str>,
{
    let mut resolved = Vec::with_capacity(ids.len());

    for id in ids {
        let id = id.as_ref();
        let record = match key {
            JoinKey::Id => dataset.find::<T>(id),
            JoinKey::Slug => dataset.find_by_slug::<T>(id),
        };

        match record {
            Some(record) => resolved.push(record),
            None => debug!(
                "Dropping unknown {} reference '{}'",
                T::KIND.as_str(),
                id
            ),
        }
    }

    resolved
}
