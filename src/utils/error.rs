use std::fmt;

/// Which structural constraint an observation vector broke
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeViolation {
    /// The two vectors do not pair up observation by observation
    LengthMismatch {
        left: String,
        right: String,
        left_len: Option<usize>,
        right_len: Option<usize>,
    },
    /// The argument is not a one-dimensional array
    Dimensionality { argument: String, ndim: usize },
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeViolation::LengthMismatch {
                left,
                right,
                left_len,
                right_len,
            } => write!(
                f,
                "length of {} = {} and {} = {} must be equal",
                left,
                display_len(*left_len),
                right,
                display_len(*right_len)
            ),
            ShapeViolation::Dimensionality { argument, ndim } => write!(
                f,
                "number of array dimensions of {} = {} must be equal to 1",
                argument, ndim
            ),
        }
    }
}

fn display_len(len: Option<usize>) -> String {
    len.map_or_else(|| "none (0-d array)".to_string(), |n| n.to_string())
}

/// Errors raised by the validators and the association catalog
#[derive(Debug, Clone, PartialEq)]
pub enum AssociationError {
    /// Length mismatch or wrong dimensionality
    InvalidShape(ShapeViolation),
    /// A binary-categorical vector does not hold exactly two distinct values
    InvalidCategoryCount { argument: String, distinct: Vec<f64> },
    /// Wrong number of vectors handed to a registry dispatch
    Arity {
        association: String,
        expected: usize,
        actual: usize,
    },
    /// A delegated numeric routine failed
    Routine(String),
    /// No catalog entry has the given name
    UnknownAssociation { name: String, known: Vec<String> },
}

impl fmt::Display for AssociationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssociationError::InvalidShape(violation) => {
                write!(f, "InvalidShape: {}", violation)
            }
            AssociationError::InvalidCategoryCount { argument, distinct } => write!(
                f,
                "InvalidCategoryCount: {} must contain exactly two unique values, found {} ({:?})",
                argument,
                distinct.len(),
                distinct
            ),
            AssociationError::Arity {
                association,
                expected,
                actual,
            } => write!(
                f,
                "Arity: {} takes {} vectors, got {}",
                association, expected, actual
            ),
            AssociationError::Routine(msg) => write!(f, "Routine: {}", msg),
            AssociationError::UnknownAssociation { name, known } => write!(
                f,
                "UnknownAssociation: '{}', expected one of: {}",
                name,
                known.join(", ")
            ),
        }
    }
}

impl std::error::Error for AssociationError {}

impl From<ShapeViolation> for AssociationError {
    fn from(violation: ShapeViolation) -> Self {
        AssociationError::InvalidShape(violation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AssociationError::InvalidShape(ShapeViolation::LengthMismatch {
            left: "v1".to_string(),
            right: "v2".to_string(),
            left_len: Some(3),
            right_len: Some(4),
        });
        assert_eq!(
            err.to_string(),
            "InvalidShape: length of v1 = 3 and v2 = 4 must be equal"
        );

        let err = AssociationError::InvalidShape(ShapeViolation::Dimensionality {
            argument: "v2".to_string(),
            ndim: 2,
        });
        assert_eq!(
            err.to_string(),
            "InvalidShape: number of array dimensions of v2 = 2 must be equal to 1"
        );

        let err = AssociationError::InvalidCategoryCount {
            argument: "v1".to_string(),
            distinct: vec![0.0, 1.0, 2.0],
        };
        assert_eq!(
            err.to_string(),
            "InvalidCategoryCount: v1 must contain exactly two unique values, found 3 ([0.0, 1.0, 2.0])"
        );

        let err = AssociationError::Routine("singular matrix".to_string());
        assert_eq!(err.to_string(), "Routine: singular matrix");

        let err = AssociationError::UnknownAssociation {
            name: "theils_v".to_string(),
            known: vec!["theils_u".to_string(), "cramers_v".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "UnknownAssociation: 'theils_v', expected one of: theils_u, cramers_v"
        );
    }

    #[test]
    fn test_zero_dim_length_display() {
        let violation = ShapeViolation::LengthMismatch {
            left: "v1".to_string(),
            right: "v2".to_string(),
            left_len: None,
            right_len: Some(2),
        };
        assert!(violation.to_string().contains("none (0-d array)"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<AssociationError>();
        assert_sync::<AssociationError>();
    }
}
