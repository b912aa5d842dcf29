/// Numeric routines the association catalog delegates to
pub mod confusion;
pub mod contingency;
pub mod correlation;
pub mod rank;
pub mod regression;

// Re-export commonly used functions
pub use confusion::{confusion_matrix, matthews_corrcoef};
pub use contingency::{Categories, ChiSquareResult, ContingencyTable};
pub use correlation::{
    corrcoef, kendalltau, pearsonr, pointbiserialr, spearmanr, CorrelationResult,
};
pub use rank::rankdata;
pub use regression::{linregress, residuals, LinearFit};
