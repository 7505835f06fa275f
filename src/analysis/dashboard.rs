//! Dashboard assembly.
//!
//! Runs the pipeline for one filter selection and bundles the results the
//! report generator renders. Rankings for the brand and state sections use
//! the filtered view; the regional comparison and the insights always use
//! the full dataset.

use crate::analysis::aggregator::{
    apply_filter, default_comparison_regions, distinct_count, market_share,
    region_comparison_with, summary_metrics, top_n, value_counts,
};
use crate::analysis::stats::{
    brand_frequency, coordinate_values, describe, histogram, scatter_series, Coordinate,
};
use crate::config::DashboardConfig;
use crate::models::{
    BrandAnalysis, Dashboard, DashboardMetadata, DataExplorer, Dataset, Field,
    GeographicDistribution, InsightParagraph, Insights, NO_DATA,
};
use tracing::{debug, warn};

/// Builds the complete dashboard for `metadata.selection`.
pub fn build_dashboard(
    full: &Dataset,
    settings: &DashboardConfig,
    metadata: DashboardMetadata,
) -> Dashboard {
    let filtered = apply_filter(full, &metadata.selection);
    debug!(
        "Filter '{}' kept {} of {} records",
        metadata.selection,
        filtered.len(),
        full.len()
    );
    if filtered.is_empty() && !full.is_empty() {
        warn!("No records match {}", metadata.selection);
    }

    let overview = summary_metrics(&filtered);

    let brand_ranking = top_n(&filtered, Field::Name, settings.top_brands);
    let shares = match market_share(&brand_ranking, filtered.len()) {
        Ok(shares) => shares,
        Err(e) => {
            debug!("Skipping market share: {}", e);
            Vec::new()
        }
    };

    let latitudes = coordinate_values(&filtered, Coordinate::Latitude);
    let longitudes = coordinate_values(&filtered, Coordinate::Longitude);

    let geography = GeographicDistribution {
        top_n: settings.top_states,
        ranking: top_n(&filtered, Field::Province, settings.top_states),
        latitude: histogram(&latitudes, settings.coordinate_bins),
        longitude: histogram(&longitudes, settings.coordinate_bins),
        scatter: scatter_series(&filtered, settings.scatter_brands, settings.scatter_limit),
    };

    let regions = if settings.compare_states.is_empty() {
        default_comparison_regions(full)
    } else {
        settings.compare_states.clone()
    };
    let comparison = region_comparison_with(full, &regions, settings.brands_per_state);

    let explorer = DataExplorer {
        sample: filtered
            .iter()
            .take(settings.sample_rows)
            .cloned()
            .collect(),
        latitude: describe(&latitudes),
        longitude: describe(&longitudes),
        total_brands: overview.unique_brands,
        total_regions: overview.unique_regions,
        total_records: overview.count,
        brand_frequency: brand_frequency(&filtered, settings.frequency_bins),
    };

    Dashboard {
        metadata,
        overview,
        brands: BrandAnalysis {
            top_n: settings.top_brands,
            ranking: brand_ranking,
            market_share: shares,
        },
        geography,
        comparison,
        explorer,
        insights: insights(full),
    }
}

/// National findings over the full dataset, with the narrative text.
pub fn insights(full: &Dataset) -> Insights {
    let top_brand = value_counts(full, Field::Name)
        .leader()
        .unwrap_or(NO_DATA)
        .to_string();
    let top_region = value_counts(full, Field::Province)
        .leader()
        .unwrap_or(NO_DATA)
        .to_string();
    let total_brands = distinct_count(full, Field::Name);
    let total_regions = distinct_count(full, Field::Province);

    let paragraphs = vec![
        InsightParagraph {
            title: "Brand Dominance".to_string(),
            body: format!(
                "**{}** leads with the highest number of locations nationally. \
                 Out of {} unique brands in the dataset, the top 10 brands account for a \
                 significant portion of all locations, reflecting the dominance of major \
                 franchise chains in the fast food industry.",
                top_brand, total_brands
            ),
        },
        InsightParagraph {
            title: "Geographic Concentration".to_string(),
            body: format!(
                "**{}** has the highest concentration of fast food restaurants. \
                 The distribution across {} states shows clear patterns correlating with \
                 population density and urbanization levels. Larger states with major \
                 metropolitan areas dominate the rankings.",
                top_region, total_regions
            ),
        },
        InsightParagraph {
            title: "Market Structure".to_string(),
            body: "The fast food market shows both **national consolidation** and \
                   **regional variation**. While major chains dominate nationally, different \
                   states show varying preferences, suggesting regional tastes and local \
                   competition influence market dynamics."
                .to_string(),
        },
    ];

    Insights {
        top_brand,
        top_region,
        total_brands,
        total_regions,
        paragraphs,
    }
}
