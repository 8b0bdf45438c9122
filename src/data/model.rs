use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Feature – one row of a feature table
// ---------------------------------------------------------------------------

/// A single detected LC-MS feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Opaque identifier, unique within its table.
    pub id: String,
    /// Mass-to-charge ratio.
    pub mz: f64,
    /// Retention time in minutes.
    pub rt: f64,
}

impl Feature {
    pub fn new(id: impl Into<String>, mz: f64, rt: f64) -> Self {
        Feature {
            id: id.into(),
            mz,
            rt,
        }
    }
}

// ---------------------------------------------------------------------------
// FeatureTable – the complete loaded table
// ---------------------------------------------------------------------------

/// Row-ordered collection of features, read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    features: Vec<Feature>,
}

impl FeatureTable {
    pub fn new(features: Vec<Feature>) -> Self {
        FeatureTable { features }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// `(rt, mz)` pairs in table order; the plotting coordinate system.
    pub fn rt_mz_points(&self) -> Vec<(f64, f64)> {
        self.features.iter().map(|f| (f.rt, f.mz)).collect()
    }
}

impl FromIterator<Feature> for FeatureTable {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        FeatureTable::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FeatureTable {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

// ---------------------------------------------------------------------------
// ColumnMapping – source column names for the canonical fields
// ---------------------------------------------------------------------------

/// Names of the source columns that become `id`, `mz` and `rt`.
///
/// Defaults to the column names of a GNPS / MZmine quantification table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub id: String,
    pub mz: String,
    pub rt: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        ColumnMapping {
            id: "row ID".to_string(),
            mz: "row m/z".to_string(),
            rt: "row retention time".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Required source columns in `id, mz, rt` order.
    pub fn required(&self) -> [&str; 3] {
        [self.id.as_str(), self.mz.as_str(), self.rt.as_str()]
    }

    /// Required columns that are not among `available`.
    pub fn missing<'a, I>(&self, available: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str> + Clone,
    {
        self.required()
            .into_iter()
            .filter(|req| !available.clone().into_iter().any(|have| have == *req))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_reports_absent_columns_in_order() {
        let mapping = ColumnMapping::default();
        let headers = ["row ID", "row retention time", "area"];
        assert_eq!(mapping.missing(headers), vec!["row m/z".to_string()]);
        assert!(mapping
            .missing(["row ID", "row m/z", "row retention time"])
            .is_empty());
    }

    #[test]
    fn table_preserves_insertion_order() {
        let table: FeatureTable = vec![
            Feature::new("2", 300.0, 1.0),
            Feature::new("1", 100.0, 2.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rt_mz_points(), vec![(1.0, 300.0), (2.0, 100.0)]);
        assert_eq!(table.features()[0].id, "2");
    }
}
