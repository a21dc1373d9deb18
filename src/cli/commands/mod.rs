//! Command implementations for the vgrel CLI
//!
//! Each command has its own module/file.

pub mod config;
pub mod dataset;
pub mod features;
pub mod labels;
pub mod pipeline;
pub mod show;
pub mod synonyms;

// Re-export argument types for parser
pub use config::ConfigArgs;
pub use dataset::{CategoriesArgs, CountArgs, FilterArgs, SampleArgs};
pub use features::{DeepArgs, FeaturesArgs};
pub use labels::LabelsArgs;
pub use pipeline::PipelineArgs;
pub use show::ShowArgs;
pub use synonyms::SynonymsArgs;
