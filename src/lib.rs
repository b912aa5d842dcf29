//! Relazioni - strength-of-relationship metrics between variables
//!
//! This library provides named association metrics (Theil's U, Matthews,
//! Cramér's V, Kendall, Spearman, point-biserial, Pearson and partial
//! correlation) over `ndarray` observation vectors, each guarded by a shared
//! input-validation contract.
//!
//! ```
//! use ndarray::arr1;
//! use relazioni::associations::pearson_corr;
//!
//! let r = pearson_corr(&arr1(&[6.0, 8.0, 10.0]), &arr1(&[12.0, 10.0, 20.0])).unwrap();
//! assert!((r - 0.755928946).abs() < 1e-7);
//! ```

pub mod associations;
pub mod catalog;
pub mod dataset;
pub mod engine;
pub mod stats_core;
pub mod utils;

pub use associations::{
    cramers_v, kendalls_corr, matthews_corr, partial_corr, pearson_corr, pointbiserial_corr,
    spearmans_corr, theils_u,
};
pub use catalog::Association;
pub use dataset::{Column, ColumnEncoding, DataPoint, Dataset};
pub use engine::AssociationEngine;
pub use utils::{check_binary_categorical, check_variables, AssociationError, ShapeViolation};

/// Result type used by the dataset and engine layers
pub type Result<T> = anyhow::Result<T>;
