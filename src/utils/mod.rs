/// Input validation and error types shared by the catalog
pub mod consistency;
pub mod error;

// Re-export commonly used types
pub use consistency::{
    as_vector, category_key, check_binary_categorical, check_named_variables, check_variables,
    unique_values,
};
pub use error::{AssociationError, ShapeViolation};
