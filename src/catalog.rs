use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::associations;
use crate::utils::AssociationError;

/// Named entry of the association catalog
///
/// Lets a metric be chosen by name, e.g. from a config file or a request,
/// and dispatched over a list of observation vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Association {
    TheilsU,
    MatthewsCorr,
    CramersV,
    KendallsCorr,
    SpearmansCorr,
    PointbiserialCorr,
    PearsonCorr,
    PartialCorr,
}

impl Association {
    /// Every catalog entry, in catalog order
    pub const ALL: [Association; 8] = [
        Association::TheilsU,
        Association::MatthewsCorr,
        Association::CramersV,
        Association::KendallsCorr,
        Association::SpearmansCorr,
        Association::PointbiserialCorr,
        Association::PearsonCorr,
        Association::PartialCorr,
    ];

    /// Function name of the entry
    pub fn name(&self) -> &'static str {
        match self {
            Association::TheilsU => "theils_u",
            Association::MatthewsCorr => "matthews_corr",
            Association::CramersV => "cramers_v",
            Association::KendallsCorr => "kendalls_corr",
            Association::SpearmansCorr => "spearmans_corr",
            Association::PointbiserialCorr => "pointbiserial_corr",
            Association::PearsonCorr => "pearson_corr",
            Association::PartialCorr => "partial_corr",
        }
    }

    /// Number of observation vectors the entry takes
    pub fn arity(&self) -> usize {
        match self {
            Association::PartialCorr => 3,
            _ => 2,
        }
    }

    /// Compute this association over `vectors`
    ///
    /// # Errors
    /// * `AssociationError::Arity` if `vectors.len()` differs from [`Self::arity`]
    /// * any error of the underlying catalog function, unchanged
    pub fn compute(&self, vectors: &[ArrayView1<f64>]) -> Result<f64, AssociationError> {
        if vectors.len() != self.arity() {
            return Err(AssociationError::Arity {
                association: self.name().to_string(),
                expected: self.arity(),
                actual: vectors.len(),
            });
        }

        tracing::debug!(
            association = self.name(),
            observations = vectors[0].len(),
            "computing association"
        );

        let (v1, v2) = (&vectors[0], &vectors[1]);
        let value = match self {
            Association::TheilsU => associations::theils_u(v1, v2),
            Association::MatthewsCorr => associations::matthews_corr(v1, v2),
            Association::CramersV => associations::cramers_v(v1, v2),
            Association::KendallsCorr => associations::kendalls_corr(v1, v2),
            Association::SpearmansCorr => associations::spearmans_corr(v1, v2),
            Association::PointbiserialCorr => associations::pointbiserial_corr(v1, v2),
            Association::PearsonCorr => associations::pearson_corr(v1, v2),
            Association::PartialCorr => associations::partial_corr(v1, v2, &vectors[2]),
        };

        if let Err(ref err) = value {
            tracing::debug!(association = self.name(), error = %err, "association rejected input");
        }
        value
    }
}

impl fmt::Display for Association {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Association {
    type Err = AssociationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Association::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| AssociationError::UnknownAssociation {
                name: s.to_string(),
                known: Association::ALL.iter().map(|a| a.name().to_string()).collect(),
            })
    }
}
