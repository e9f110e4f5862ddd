//! Assemble every dashboard view for one filter state

use anyhow::Result;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::{
    correlation_matrix, cross_risk, distribution, headline_metrics, histogram, scatter_points,
    with_age_band, Aggregate, CorrelationMatrix, CrossRiskTable, Distribution, FilterSpec,
    HeadlineMetrics, Histogram, ScatterPoint, AGE, AGE_BAND, AGE_HISTOGRAM_BINS, CREDIT_AMOUNT,
    CREDIT_HISTOGRAM_BINS, DURATION, EMPLOYMENT, HOUSING, NUMERIC_COLUMNS, PERSONAL_STATUS,
    PURPOSE, RISK,
};

/// Why the whole dashboard has nothing to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoData {
    /// No risk label is selected
    EmptySelection,
    /// Labels are selected but the ranges exclude every row
    NoMatchingRows,
}

impl NoData {
    pub fn message(&self) -> &'static str {
        match self {
            NoData::EmptySelection => "Select at least one risk type to display data.",
            NoData::NoMatchingRows => "No applicants match the current filters. Widen the age or credit range.",
        }
    }
}

/// Risk overview: class distribution and risk by age band
#[derive(Debug, Clone, Serialize)]
pub struct RiskViews {
    pub risk_distribution: Aggregate<Distribution>,
    pub risk_by_age_band: Aggregate<CrossRiskTable>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DemographicViews {
    pub age_histogram: Aggregate<Histogram>,
    pub personal_status: Aggregate<Distribution>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinancialViews {
    pub credit_histogram: Aggregate<Histogram>,
    pub credit_vs_duration: Aggregate<Vec<ScatterPoint>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialViews {
    pub purpose: Aggregate<Distribution>,
    pub housing: Aggregate<Distribution>,
}

/// Crosstabs and the correlation heatmap
#[derive(Debug, Clone, Serialize)]
pub struct AdvancedViews {
    pub risk_by_purpose: Aggregate<CrossRiskTable>,
    pub risk_by_employment: Aggregate<CrossRiskTable>,
    pub correlation: Aggregate<CorrelationMatrix>,
}

/// All derived views for one filtered subset
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub filter: FilterSpec,
    pub total_rows: usize,
    pub filtered_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_data: Option<NoData>,
    pub metrics: Aggregate<HeadlineMetrics>,
    pub risk: RiskViews,
    pub demographics: DemographicViews,
    pub financial: FinancialViews,
    pub social: SocialViews,
    pub advanced: AdvancedViews,
}

impl DashboardReport {
    /// Build the report from an already-filtered subset.
    ///
    /// `total_rows` is the size of the base table, shown next to the
    /// filtered count.
    pub fn build(filtered: &DataFrame, filter: &FilterSpec, total_rows: usize) -> Result<Self> {
        let no_data = if filter.selects_nothing() {
            Some(NoData::EmptySelection)
        } else if filtered.height() == 0 {
            Some(NoData::NoMatchingRows)
        } else {
            None
        };

        let banded = with_age_band(filtered)?;

        Ok(Self {
            filter: filter.clone(),
            total_rows,
            filtered_rows: filtered.height(),
            no_data,
            metrics: headline_metrics(filtered),
            risk: RiskViews {
                risk_distribution: distribution(filtered, RISK),
                risk_by_age_band: cross_risk(&banded, AGE_BAND),
            },
            demographics: DemographicViews {
                age_histogram: histogram(filtered, AGE, AGE_HISTOGRAM_BINS),
                personal_status: distribution(filtered, PERSONAL_STATUS),
            },
            financial: FinancialViews {
                credit_histogram: histogram(filtered, CREDIT_AMOUNT, CREDIT_HISTOGRAM_BINS),
                credit_vs_duration: scatter_points(filtered, CREDIT_AMOUNT, DURATION),
            },
            social: SocialViews {
                purpose: distribution(filtered, PURPOSE),
                housing: distribution(filtered, HOUSING),
            },
            advanced: AdvancedViews {
                risk_by_purpose: cross_risk(filtered, PURPOSE),
                risk_by_employment: cross_risk(filtered, EMPLOYMENT),
                correlation: correlation_matrix(filtered, &NUMERIC_COLUMNS),
            },
        })
    }
}
