use anyhow::{anyhow, bail};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Represents a single data point with named fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataPoint {
    pub fields: HashMap<String, String>,
}

impl DataPoint {
    /// Create a new data point
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Add a field to the data point
    pub fn add_field(&mut self, key: String, value: String) {
        self.fields.insert(key, value);
    }

    /// Get a field value
    pub fn get_field(&self, key: &str) -> Option<&String> {
        self.fields.get(key)
    }

    /// Parse a numeric field value
    pub fn get_numeric(&self, key: &str) -> Option<f64> {
        self.get_field(key)?.trim().parse().ok()
    }
}

impl Default for DataPoint {
    fn default() -> Self {
        Self::new()
    }
}

/// How a column's text values were turned into an observation vector
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnEncoding {
    /// Values parsed as numbers; blanks became NaN
    Numeric,
    /// Values replaced by the index of their label in `labels` (sorted)
    Categorical { labels: Vec<String> },
}

/// A dataset column ready to be fed to the association catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub values: Array1<f64>,
    pub encoding: ColumnEncoding,
}

/// A collection of data points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub data: Vec<DataPoint>,
}

impl Dataset {
    /// Create a new empty dataset
    pub fn new(name: String) -> Self {
        Self {
            name,
            data: Vec::new(),
        }
    }

    /// Add a data point to the dataset
    pub fn add_point(&mut self, point: DataPoint) {
        self.data.push(point);
    }

    /// Get the number of data points
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get all unique field names across all data points
    pub fn get_field_names(&self) -> Vec<String> {
        let fields: BTreeSet<&String> = self.data.iter().flat_map(|p| p.fields.keys()).collect();
        fields.into_iter().cloned().collect()
    }

    /// Numeric observation vector of a field, one entry per data point
    ///
    /// Missing, empty and `null` values become NaN.
    ///
    /// # Errors
    /// If no data point has the field, or a value is not a number.
    pub fn numeric_column(&self, field: &str) -> crate::Result<Array1<f64>> {
        self.ensure_field(field)?;

        self.data
            .iter()
            .enumerate()
            .map(|(row, point)| match point.get_field(field).map(|v| v.trim()) {
                None | Some("") | Some("null") => Ok(f64::NAN),
                Some(text) => text.parse::<f64>().map_err(|_| {
                    anyhow!(
                        "field '{}' in dataset '{}' has non-numeric value '{}' at row {}",
                        field,
                        self.name,
                        text,
                        row
                    )
                }),
            })
            .collect()
    }

    /// Label-encoded observation vector of a field
    ///
    /// Each distinct text value (missing values count as the empty label)
    /// is replaced by its index in the sorted list of labels.
    pub fn categorical_column(&self, field: &str) -> crate::Result<Column> {
        self.ensure_field(field)?;

        let raw: Vec<&str> = self
            .data
            .iter()
            .map(|p| p.get_field(field).map_or("", |v| v.as_str()))
            .collect();
        let labels: Vec<String> = raw
            .iter()
            .copied()
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        let codes: HashMap<&str, f64> = labels
            .iter()
            .enumerate()
            .map(|(code, label)| (label.as_str(), code as f64))
            .collect();

        let values: Array1<f64> = raw
            .iter()
            .map(|label| codes.get(label).copied().unwrap_or(f64::NAN))
            .collect();

        Ok(Column {
            values,
            encoding: ColumnEncoding::Categorical { labels },
        })
    }

    /// Observation vector of a field: numeric if every value parses,
    /// label-encoded if none does
    ///
    /// # Errors
    /// If the field is missing, or mixes numbers with other text (a typo in
    /// a numeric column is reported, not label-encoded).
    pub fn column(&self, field: &str) -> crate::Result<Column> {
        let err = match self.numeric_column(field) {
            Ok(values) => {
                return Ok(Column {
                    values,
                    encoding: ColumnEncoding::Numeric,
                })
            }
            Err(err) => err,
        };

        let any_numeric = self
            .data
            .iter()
            .any(|p| p.get_numeric(field).is_some());
        if any_numeric {
            return Err(err);
        }

        tracing::debug!(dataset = %self.name, field, "label-encoding non-numeric field");
        self.categorical_column(field)
    }

    fn ensure_field(&self, field: &str) -> crate::Result<()> {
        if !self.data.iter().any(|p| p.fields.contains_key(field)) {
            bail!("dataset '{}' has no field '{}'", self.name, field);
        }
        Ok(())
    }

    /// Load dataset from CSV
    pub fn from_csv(name: String, csv_data: &str) -> crate::Result<Self> {
        let mut dataset = Dataset::new(name);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv_data.as_bytes());

        let headers = reader.headers()?.clone();

        for result in reader.records() {
            let record = result?;
            let mut point = DataPoint::new();

            for (i, field) in record.iter().enumerate() {
                if let Some(header) = headers.get(i) {
                    point.add_field(header.to_string(), field.to_string());
                }
            }
            dataset.add_point(point);
        }

        tracing::debug!(dataset = %dataset.name, rows = dataset.len(), "loaded CSV dataset");
        Ok(dataset)
    }

    /// Load dataset from JSON array
    pub fn from_json(name: String, json_data: &str) -> crate::Result<Self> {
        let mut dataset = Dataset::new(name);
        let data: Vec<HashMap<String, serde_json::Value>> = serde_json::from_str(json_data)?;

        for item in data {
            let mut point = DataPoint::new();
            for (key, value) in item {
                let value_str = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    serde_json::Value::Null => "null".to_string(),
                    _ => value.to_string(),
                };
                point.add_field(key, value_str);
            }
            dataset.add_point(point);
        }

        tracing::debug!(dataset = %dataset.name, rows = dataset.len(), "loaded JSON dataset");
        Ok(dataset)
    }
}
