//! # vgrel-core
//!
//! Core types for the vgrel toolbox: the geometric and categorical primitives
//! every relationship feature is built from.
//!
//! This crate provides:
//! - **Boxes**: `BBox`, stored as left/top/right/bottom edges
//! - **Primitives**: `SpatialPrim` (subject/object geometry) and
//!   `CategoricalPrim` (one-hot subject/object category pair)
//!
//! The `vgrel` crate depends on `vgrel-core` and re-exports everything here.

#![warn(missing_docs)]

pub mod error;
pub mod primitives;

pub use error::{Error, Result};
pub use primitives::{
    BBox, CategoricalPrim, SpatialPrim, BBOX_FEATURE_DIM, DEFAULT_NUM_CATEGORIES,
    SPATIAL_FEATURE_DIM,
};
