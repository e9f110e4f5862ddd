//! Age banding
//!
//! Ages are grouped into fixed ranges, left-inclusive and right-exclusive,
//! with an open-ended top band. Labels are derived from the edges.

use anyhow::Result;
use polars::prelude::*;

use super::schema::AGE;

/// Name of the derived column added by [`with_age_band`]
pub const AGE_BAND: &str = "age_band";

/// Lower edges of the age bands
pub const AGE_EDGES: [f64; 5] = [18.0, 31.0, 41.0, 51.0, 61.0];

/// Fixed-edge binning of a continuous attribute
#[derive(Debug, Clone)]
pub struct Bands {
    edges: Vec<f64>,
    labels: Vec<String>,
}

impl Bands {
    /// Build bands from ascending lower edges. The last edge starts an
    /// open-ended band.
    pub fn new(edges: &[f64]) -> Self {
        let labels = edges
            .iter()
            .enumerate()
            .map(|(i, lower)| match edges.get(i + 1) {
                Some(upper) => format!("{}-{}", format_edge(*lower), format_edge(upper - 1.0)),
                None => format!("{}+", format_edge(*lower)),
            })
            .collect();

        Self {
            edges: edges.to_vec(),
            labels,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Index of the band holding `value`, or `None` below the first edge or
    /// for non-finite values.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        if !value.is_finite() {
            return None;
        }
        // Number of edges <= value, minus one
        self.edges
            .partition_point(|edge| *edge <= value)
            .checked_sub(1)
    }

    pub fn label_of(&self, value: f64) -> Option<&str> {
        self.index_of(value).map(|i| self.labels[i].as_str())
    }
}

impl Default for Bands {
    fn default() -> Self {
        Self::new(&AGE_EDGES)
    }
}

fn format_edge(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Assign each age to its band label.
///
/// Ages below 18 or non-finite ages have no band.
pub fn age_bins(ages: &[f64]) -> Vec<Option<String>> {
    let bands = Bands::default();
    ages.iter()
        .map(|age| bands.label_of(*age).map(str::to_string))
        .collect()
}

/// Return a copy of `df` with an `age_band` string column derived from the
/// age column. The input frame is not modified.
pub fn with_age_band(df: &DataFrame) -> Result<DataFrame> {
    let ages = df.column(AGE)?.cast(&DataType::Float64)?;
    let bands = Bands::default();

    let labels: Vec<Option<&str>> = ages
        .f64()?
        .into_iter()
        .map(|age| age.and_then(|a| bands.label_of(a)))
        .collect();

    let mut out = df.clone();
    out.with_column(Column::new(AGE_BAND.into(), labels))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_derived_from_edges() {
        let bands = Bands::default();
        assert_eq!(bands.labels(), &["18-30", "31-40", "41-50", "51-60", "61+"]);

        let custom = Bands::new(&[0.0, 10.0, 25.0]);
        assert_eq!(custom.labels(), &["0-9", "10-24", "25+"]);
    }

    #[test]
    fn test_band_boundaries_are_left_inclusive() {
        let bands = Bands::default();
        assert_eq!(bands.label_of(18.0), Some("18-30"));
        assert_eq!(bands.label_of(30.9), Some("18-30"));
        assert_eq!(bands.label_of(31.0), Some("31-40"));
        assert_eq!(bands.label_of(60.0), Some("51-60"));
        assert_eq!(bands.label_of(61.0), Some("61+"));
        assert_eq!(bands.label_of(120.0), Some("61+"));
    }

    #[test]
    fn test_out_of_domain_ages_have_no_band() {
        let bands = Bands::default();
        assert_eq!(bands.label_of(17.0), None);
        assert_eq!(bands.label_of(f64::NAN), None);
        assert_eq!(bands.label_of(f64::INFINITY), None);
    }

    #[test]
    fn test_age_bins_example() {
        let bins = age_bins(&[18.0, 30.0, 31.0, 60.0, 61.0, 99.0]);
        let expected = ["18-30", "18-30", "31-40", "51-60", "61+", "61+"];

        assert_eq!(bins.len(), expected.len());
        for (bin, want) in bins.iter().zip(expected) {
            assert_eq!(bin.as_deref(), Some(want));
        }
    }

    #[test]
    fn test_age_bins_empty_input() {
        assert!(age_bins(&[]).is_empty());
    }
}
