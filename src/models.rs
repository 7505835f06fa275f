//! Data models for the restaurant atlas.
//!
//! This module contains the records loaded from the source table, the
//! values derived from them by the aggregation pipeline, and the
//! `Dashboard` that bundles everything handed to the report generator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Filter choice meaning "no filter".
pub const ALL: &str = "All";

/// Top brand reported for a region without any records.
pub const NO_DATA: &str = "N/A";

/// One restaurant location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Brand (restaurant chain) name.
    pub name: Option<String>,
    /// Province or state code.
    pub province: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
}

impl Record {
    /// Number of fields on this record.
    pub const FIELD_COUNT: usize = 5;

    /// Returns the value of a categorical field, if present.
    pub fn category(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Province => self.province.as_deref(),
            Field::Address => self.address.as_deref(),
        }
    }

    /// Returns the number of null cells in this record.
    pub fn missing_cells(&self) -> usize {
        [
            self.name.is_none(),
            self.province.is_none(),
            self.latitude.is_none(),
            self.longitude.is_none(),
            self.address.is_none(),
        ]
        .iter()
        .filter(|missing| **missing)
        .count()
    }

    /// Returns the coordinates when both are present.
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

/// Categorical fields that can be grouped and ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Brand name.
    Name,
    /// Region code.
    Province,
    Address,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "Brand"),
            Field::Province => write!(f, "State"),
            Field::Address => write!(f, "Address"),
        }
    }
}

/// An ordered, immutable sequence of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Creates a dataset from records in source order.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Region and brand selected by the user. `None` means no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub region: Option<String>,
    pub brand: Option<String>,
}

impl FilterSelection {
    /// The identity selection.
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds a selection from dropdown-style choices, where `All` clears the filter.
    pub fn from_choices(region: Option<&str>, brand: Option<&str>) -> Self {
        fn choice(value: Option<&str>) -> Option<String> {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
                .map(String::from)
        }

        Self {
            region: choice(region),
            brand: choice(brand),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.region.is_none() && self.brand.is_none()
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "State: {} | Brand: {}",
            self.region.as_deref().unwrap_or(ALL),
            self.brand.as_deref().unwrap_or(ALL)
        )
    }
}

/// A single (category, count) pair of a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub category: String,
    pub count: usize,
}

/// Categories ordered by count, highest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    pub entries: Vec<RankEntry>,
}

impl Ranking {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts in the ranking.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// The highest-ranked category.
    pub fn leader(&self) -> Option<&str> {
        self.entries.first().map(|e| e.category.as_str())
    }

    /// Returns the entries as (category, count) tuples.
    pub fn pairs(&self) -> Vec<(&str, usize)> {
        self.entries
            .iter()
            .map(|e| (e.category.as_str(), e.count))
            .collect()
    }
}

/// Headline numbers for a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub count: usize,
    pub unique_brands: usize,
    pub unique_regions: usize,
    pub missing_values: usize,
}

/// Percentage of all locations held by one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareEntry {
    pub category: String,
    pub percentage: f64,
}

/// Per-region aggregate, always computed over the full dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub region: String,
    pub total_count: usize,
    pub unique_brands: usize,
    /// Leading brand, or `NO_DATA` when the region has no records.
    pub top_brand: String,
    /// Leading brands in this region.
    pub top_brands: Ranking,
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Located points for one brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub brand: String,
    pub points: Vec<GeoPoint>,
}

/// Descriptive statistics of a numeric column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

/// One equal-width histogram bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Number of values counted across all bins.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// How the session's dataset was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    /// Read from the configured source.
    Loaded,
    /// Placeholder data generated after a failed load.
    Synthetic,
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataOrigin::Loaded => write!(f, "Loaded"),
            DataOrigin::Synthetic => write!(f, "Synthetic placeholder"),
        }
    }
}

/// A titled paragraph of narrative text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightParagraph {
    pub title: String,
    pub body: String,
}

/// National-level findings, computed over the full dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub top_brand: String,
    pub top_region: String,
    pub total_brands: usize,
    pub total_regions: usize,
    pub paragraphs: Vec<InsightParagraph>,
}

/// Brand ranking and market share for the filtered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandAnalysis {
    pub top_n: usize,
    pub ranking: Ranking,
    pub market_share: Vec<ShareEntry>,
}

/// Region ranking and coordinate distributions for the filtered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographicDistribution {
    pub top_n: usize,
    pub ranking: Ranking,
    pub latitude: Histogram,
    pub longitude: Histogram,
    /// `None` when the filtered view has too many rows to plot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scatter: Option<Vec<ScatterSeries>>,
}

/// Raw-data sample and column statistics for the filtered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataExplorer {
    pub sample: Vec<Record>,
    pub latitude: ColumnStats,
    pub longitude: ColumnStats,
    pub total_brands: usize,
    pub total_regions: usize,
    pub total_records: usize,
    /// Distribution of per-brand location counts.
    pub brand_frequency: Histogram,
}

/// Metadata about the generated dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetadata {
    pub source: String,
    pub origin: DataOrigin,
    pub generated_at: DateTime<Utc>,
    pub selection: FilterSelection,
    /// Load failure notice when the data is a placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Everything the presentation layer renders for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub metadata: DashboardMetadata,
    pub overview: SummaryMetrics,
    pub brands: BrandAnalysis,
    pub geography: GeographicDistribution,
    pub comparison: Vec<ComparisonSummary>,
    pub explorer: DataExplorer,
    pub insights: Insights,
}
