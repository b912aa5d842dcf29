use anyhow::{anyhow, Context};
use ndarray::{Array2, ArrayView1};
use std::collections::HashMap;

use crate::catalog::Association;
use crate::dataset::Dataset;

/// Holds named datasets and computes associations between their fields
#[derive(Debug)]
pub struct AssociationEngine {
    datasets: HashMap<String, Dataset>,
}

impl AssociationEngine {
    /// Create a new engine
    pub fn new() -> Self {
        Self {
            datasets: HashMap::new(),
        }
    }

    /// Add a dataset to the engine
    pub fn add_dataset(&mut self, dataset: Dataset) {
        self.datasets.insert(dataset.name.clone(), dataset);
    }

    /// Get a dataset by name
    pub fn get_dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    /// Remove a dataset from the engine
    pub fn remove_dataset(&mut self, name: &str) -> Option<Dataset> {
        self.datasets.remove(name)
    }

    /// Get all dataset names
    pub fn list_datasets(&self) -> Vec<String> {
        let mut names: Vec<String> = self.datasets.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get a summary of all datasets
    pub fn summary(&self) -> Vec<DatasetSummary> {
        let mut summaries: Vec<DatasetSummary> = self
            .datasets
            .values()
            .map(|dataset| DatasetSummary {
                name: dataset.name.clone(),
                record_count: dataset.len(),
                fields: dataset.get_field_names(),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Compute `association` between fields of a dataset
    ///
    /// Fields are taken in the order of the association's arguments. Text
    /// fields are label-encoded, see [`Dataset::column`].
    ///
    /// # Errors
    /// Unknown dataset or field, or any catalog error. Catalog errors keep
    /// their type and can be recovered with
    /// `err.downcast_ref::<AssociationError>()`.
    pub fn associate(
        &self,
        dataset_name: &str,
        association: Association,
        fields: &[&str],
    ) -> crate::Result<f64> {
        let dataset = self
            .get_dataset(dataset_name)
            .ok_or_else(|| anyhow!("unknown dataset '{}'", dataset_name))?;

        let columns = fields
            .iter()
            .map(|field| dataset.column(field).map(|c| c.values))
            .collect::<crate::Result<Vec<_>>>()?;
        let views: Vec<ArrayView1<f64>> = columns.iter().map(|c| c.view()).collect();

        tracing::debug!(
            dataset = dataset_name,
            %association,
            ?fields,
            "associating dataset fields"
        );

        Ok(association.compute(&views)?)
    }

    /// Pairwise matrix of a two-variable association over `fields`
    ///
    /// Entry `[i, j]` is `association(fields[i], fields[j])`. Asymmetric
    /// metrics such as Theil's U give an asymmetric matrix.
    pub fn association_matrix(
        &self,
        dataset_name: &str,
        association: Association,
        fields: &[&str],
    ) -> crate::Result<Array2<f64>> {
        if association.arity() != 2 {
            anyhow::bail!("{} is not a pairwise association", association);
        }

        let mut matrix = Array2::zeros((fields.len(), fields.len()));
        for (i, left) in fields.iter().enumerate() {
            for (j, right) in fields.iter().enumerate() {
                matrix[[i, j]] = self
                    .associate(dataset_name, association, &[*left, *right])
                    .with_context(|| format!("{}({}, {})", association, left, right))?;
            }
        }
        Ok(matrix)
    }
}

impl Default for AssociationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary information about a dataset
#[derive(Debug, Clone, serde::Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub record_count: usize,
    pub fields: Vec<String>,
}
