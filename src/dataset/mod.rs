//! Visual Genome relationship corpus: schema, filtering, counting, sampling,
//! labels and category extraction.
//!
//! A typical preparation run:
//!
//! ```text
//! load_relationships ─► filter_relationships ─► count_relationships
//!                                                     │
//!        get_labels ◄── sample_relationships ◄────────┘
//! ```

pub mod categories;
pub mod counts;
pub mod filter;
pub mod labels;
pub mod sampling;
pub mod types;

pub use categories::extract_obj_categories;
pub use counts::{count_relationships, PredicateCounts, TOTAL_KEY};
pub use filter::{canonicalize_predicates, filter_relationships, filter_relationships_in_place};
pub use labels::{get_labels, LabelMatrix, LABEL_NEGATIVE, LABEL_POSITIVE, LABEL_UNLABELED};
pub use sampling::{sample_indices, sample_relationships};
pub use types::{
    iter_relationships, load_relationships, object_name, parse_relationships,
    relationship_count, save_relationships, ImageRelationships, Relationship, VgObject,
    UNLABELED,
};
