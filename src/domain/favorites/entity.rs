use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::domain::{DomainError, DomainResult};

/// Movie identifier used as the favorites key.
pub type FavoriteId = i64;

/// Deduplicated collection of favorited movie ids.
///
/// Iteration is ascending by id. Insertion order is not kept, which matches
/// what survives a storage round-trip anyway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: BTreeSet<FavoriteId>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: FavoriteId) -> bool {
        self.ids.contains(&id)
    }

    /// Returns true when the id was not present before.
    pub fn insert(&mut self, id: FavoriteId) -> bool {
        self.ids.insert(id)
    }

    /// Returns true when the id was present before.
    pub fn remove(&mut self, id: FavoriteId) -> bool {
        self.ids.remove(&id)
    }

    /// Flips membership of `id` and returns the new membership.
    pub fn toggle(&mut self, id: FavoriteId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Returns true when anything was removed.
    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = FavoriteId> + '_ {
        self.ids.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<FavoriteId> {
        self.ids.iter().copied().collect()
    }

    /// Encode as the persisted blob: a JSON array of integers, ascending.
    pub fn to_blob(&self) -> DomainResult<String> {
        serde_json::to_string(&self.to_vec())
            .map_err(|e| DomainError::InvariantViolation(format!("favorites not encodable: {}", e)))
    }

    /// Decode a persisted blob.
    ///
    /// Fails only when the blob is not a JSON array. Entries that are not
    /// integral numbers are skipped.
    pub fn from_blob(raw: &str) -> DomainResult<Self> {
        let parsed: Value =
            serde_json::from_str(raw).map_err(|e| DomainError::MalformedFavorites(e.to_string()))?;

        let entries = match parsed {
            Value::Array(entries) => entries,
            other => {
                return Err(DomainError::MalformedFavorites(format!(
                    "expected an array, found {}",
                    json_kind(&other)
                )))
            }
        };

        Ok(entries.iter().filter_map(entry_to_id).collect())
    }
}

impl FromIterator<FavoriteId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = FavoriteId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

fn entry_to_id(value: &Value) -> Option<FavoriteId> {
    if let Some(id) = value.as_i64() {
        return Some(id);
    }
    // 3.0 is a number in JSON just like 3
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
        .map(|f| f as i64)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read-only view of the favorites at one point in time.
///
/// `revision` increases on every effective mutation of the owning store, so
/// two snapshots with the same revision describe the same set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesSnapshot {
    pub revision: u64,
    pub ids: Vec<FavoriteId>,
}

impl FavoritesSnapshot {
    pub fn contains(&self, id: FavoriteId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }
}
