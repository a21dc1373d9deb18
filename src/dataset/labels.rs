//! Label matrices for weak supervision.
//!
//! One row per relationship, one column per predicate (sorted by name):
//!
//! | value | meaning |
//! |-------|---------|
//! | `-1` | unlabeled (the whole row) |
//! | `0` | negative for this predicate |
//! | `1` | positive for this predicate |

use super::types::ImageRelationships;
use crate::{Error, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label value of an unlabeled row.
pub const LABEL_UNLABELED: i8 = -1;
/// Label value of a negative column.
pub const LABEL_NEGATIVE: i8 = 0;
/// Label value of the positive column.
pub const LABEL_POSITIVE: i8 = 1;

/// `[num_relationships, num_predicates]` label matrix with its column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMatrix {
    /// Column names, sorted
    pub predicates: Vec<String>,
    /// Label values
    pub labels: Array2<i8>,
}

impl LabelMatrix {
    /// Number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.labels.nrows()
    }

    /// Number of rows carrying a positive label.
    #[must_use]
    pub fn num_labeled(&self) -> usize {
        self.labels
            .rows()
            .into_iter()
            .filter(|row| row.iter().any(|&v| v == LABEL_POSITIVE))
            .count()
    }

    /// Column of a predicate.
    #[must_use]
    pub fn column_of(&self, predicate: &str) -> Option<usize> {
        self.predicates.binary_search_by(|p| p.as_str().cmp(predicate)).ok()
    }
}

/// Build the label matrix for a (sampled) corpus.
///
/// Columns are `predicates` sorted and deduplicated. `UNLABELED` rows are all
/// [`LABEL_UNLABELED`]. Any other predicate is lower-cased and, if not a
/// column, resolved through `syns_to_preds`; failing both it is an
/// [`Error::UnknownPredicate`].
pub fn get_labels<S: AsRef<str>>(
    relationships: &[ImageRelationships],
    predicates: &[S],
    syns_to_preds: Option<&HashMap<String, String>>,
) -> Result<LabelMatrix> {
    let mut columns: Vec<String> = predicates.iter().map(|p| p.as_ref().to_string()).collect();
    columns.sort();
    columns.dedup();
    let column_of: HashMap<&str, usize> = columns
        .iter()
        .enumerate()
        .map(|(i, p)| (p.as_str(), i))
        .collect();

    let rows: Vec<_> = relationships
        .iter()
        .flat_map(|a| a.relationships.iter())
        .collect();
    let mut labels = Array2::from_elem((rows.len(), columns.len()), LABEL_NEGATIVE);

    for (i, r) in rows.iter().enumerate() {
        if r.is_unlabeled() {
            labels.row_mut(i).fill(LABEL_UNLABELED);
            continue;
        }

        let pred = r.predicate.to_lowercase();
        let col = match column_of.get(pred.as_str()) {
            Some(&col) => col,
            None => {
                let canonical = syns_to_preds
                    .ok_or_else(|| Error::UnknownPredicate(format!("{} not found", pred)))?
                    .get(&pred)
                    .ok_or_else(|| Error::UnknownPredicate(pred.clone()))?;
                *column_of
                    .get(canonical.as_str())
                    .ok_or_else(|| Error::UnknownPredicate(canonical.clone()))?
            }
        };
        labels[[i, col]] = LABEL_POSITIVE;
    }

    Ok(LabelMatrix {
        predicates: columns,
        labels,
    })
}
