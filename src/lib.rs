//! # vgrel
//!
//! Visual Genome relationship preparation for weak supervision.
//!
//! - **Synonyms**: transitive closure of category names through alias lists
//! - **Dataset**: filter, count, per-predicate sampling, label matrices
//! - **Features**: spatial and categorical primitives, optional crop embeddings
//! - **Visual**: subject/object box rendering for spot checks
//!
//! ## Pipeline
//!
//! ```text
//! relationships.json ─► filter ─► canonicalize ─► count ─► sample ─► labels
//!                                                              │
//!                       alias lists ─► synonym tables ─────────┴─► features
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use vgrel::synonyms::{AliasMap, SynonymTable};
//! use vgrel::{BBox, SpatialPrim};
//!
//! let aliases = AliasMap::parse("man,guy,person\nperson,human\n");
//! let table = SynonymTable::from_closures(&aliases, &["man"]);
//! assert_eq!(table.find_canonical("human").unwrap(), "man");
//!
//! let sub = BBox::from_vg_object(0.0, 0.0, 10.0, 20.0);
//! let obj = BBox::from_vg_object(5.0, 10.0, 5.0, 20.0);
//! let f = SpatialPrim::new(sub, obj).extract_features().unwrap();
//! assert_eq!(f.len(), 7);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Adds |
//! |---------|---------|------|
//! | `cli` | yes | `vgrel` binary, progress bars, config directory lookup |

#![warn(missing_docs)]

pub mod config;
pub mod dataset;
mod error;
pub mod export;
pub mod features;
pub mod synonyms;
pub mod visual;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::VgrelConfig;
pub use error::{Error, Result};
pub use vgrel_core::{
    BBox, CategoricalPrim, SpatialPrim, BBOX_FEATURE_DIM, DEFAULT_NUM_CATEGORIES,
    SPATIAL_FEATURE_DIM,
};
