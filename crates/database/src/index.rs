use noter_common::{NoterError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Rebuildable nearest-neighbor structure over angular distance
///
/// Items occupy sequential slots `0..N-1` in insertion order. The structure
/// supports no incremental removal; the engine discards it and rebuilds from
/// scratch whenever the document set changes, and a structure is only
/// queryable after `build()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AngularIndex {
    dimension: usize,
    items: Vec<Vec<f32>>,

    #[serde(skip)]
    normalized: Vec<Vec<f32>>,
    #[serde(skip)]
    built: bool,
}

impl AngularIndex {
    /// Create an empty index sized to the embedder's dimension
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            items: Vec::new(),
            normalized: Vec::new(),
            built: false,
        }
    }

    /// Vector dimension this index was sized to
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of items in the index
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the index holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item at the next sequential slot, returning the slot
    pub fn add_item(&mut self, embedding: Vec<f32>) -> Result<usize> {
        if embedding.len() != self.dimension {
            return Err(NoterError::index(format!(
                "Expected {}-dimensional item, got {}",
                self.dimension,
                embedding.len()
            )));
        }
        self.items.push(embedding);
        self.built = false;
        Ok(self.items.len() - 1)
    }

    /// Finalize the index, making it queryable
    pub fn build(&mut self) {
        self.normalized = self.items.iter().map(|v| normalize(v)).collect();
        self.built = true;
    }

    /// The `k` nearest slots to `query` by angular distance, ascending
    ///
    /// Returns `(slot, distance)` pairs. An unbuilt or empty index yields no
    /// results.
    pub fn nearest(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if query.len() != self.dimension {
            return Err(NoterError::index(format!(
                "Expected {}-dimensional query, got {}",
                self.dimension,
                query.len()
            )));
        }
        if !self.built || self.items.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query = normalize(query);
        let mut distances: Vec<(usize, f32)> = self
            .normalized
            .iter()
            .enumerate()
            .map(|(slot, item)| (slot, angular_distance(&query, item)))
            .collect();

        // Ascending distance, slot order on ties
        distances.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        distances.truncate(k);
        Ok(distances)
    }

    /// Persist the index to a file
    ///
    /// Writes to a temp file in the same directory and renames over the
    /// target, so a crash mid-write leaves the previous index intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = bincode::serialize(self)
            .map_err(|e| NoterError::index(format!("Failed to serialize index: {}", e)))?;
        crate::write_atomic(path, &bytes)?;
        debug!("Saved index - {} items to {}", self.items.len(), path.display());
        Ok(())
    }

    /// Load a persisted index and make it queryable
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let mut index: AngularIndex = bincode::deserialize(&bytes)
            .map_err(|e| NoterError::index(format!("Failed to deserialize index: {}", e)))?;
        index.build();
        Ok(index)
    }
}

/// Angular distance between two unit vectors: `sqrt(2 - 2·cos)`
///
/// Ranges over `[0, 2]`; 0 for identical directions, `sqrt(2)` for
/// orthogonal, 2 for opposite.
fn angular_distance(a: &[f32], b: &[f32]) -> f32 {
    let cos: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    (2.0 - 2.0 * cos).max(0.0).sqrt()
}

fn normalize(v: &[f32]) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / norm).collect()
}
