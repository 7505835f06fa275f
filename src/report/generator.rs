//! Markdown report generation.
//!
//! This module renders a `Dashboard` as a Markdown document. Bar charts and
//! histograms become tables with a text bar column.

use crate::models::{
    BrandAnalysis, ColumnStats, ComparisonSummary, Dashboard, DashboardMetadata, DataExplorer,
    GeographicDistribution, Histogram, Insights, Ranking, SummaryMetrics,
};
use anyhow::Result;
use serde_json::json;

/// Lines listed under "Top Brands by Count" and "Market Share".
const MARKET_SHARE_LINES: usize = 5;

/// Compared states that get their own brand chart.
const CHARTED_REGIONS: usize = 4;

/// Width of the longest text bar.
const BAR_WIDTH: usize = 30;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Fast Food Restaurants Across America\n\n");

    output.push_str(&generate_metadata_section(&dashboard.metadata));
    output.push_str(&generate_overview_section(&dashboard.overview));
    output.push_str(&generate_brand_section(&dashboard.brands));
    output.push_str(&generate_geography_section(&dashboard.geography));
    output.push_str(&generate_comparison_section(&dashboard.comparison));
    output.push_str(&generate_explorer_section(&dashboard.explorer));
    output.push_str(&generate_insights_section(&dashboard.insights));

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the report shown when the dataset could not be loaded.
pub fn generate_unavailable_report(source: &str, notice: &str) -> String {
    let mut output = String::new();

    output.push_str("# Fast Food Restaurants Across America\n\n");
    output.push_str(&format!("> ⚠️ **{}**\n\n", notice));
    output.push_str(&format!("- **Source:** {}\n\n", source));
    output.push_str(
        "Make sure your CSV file is accessible and the path or URL is correct, then run again.\n\n",
    );
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &DashboardMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    if let Some(ref notice) = metadata.notice {
        section.push_str(&format!("> ⚠️ {}\n>\n", notice));
        section.push_str("> Showing synthetic sample data for demonstration.\n\n");
    }
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!("- **Data:** {}\n", metadata.origin));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Filters:** {}\n", metadata.selection));
    section.push('\n');

    section
}

/// Generate the dataset overview metrics.
fn generate_overview_section(overview: &SummaryMetrics) -> String {
    let mut section = String::new();

    section.push_str("## Dataset Overview\n\n");
    section.push_str("| Total Restaurants | Unique Brands | States Covered | Missing Values |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        overview.count, overview.unique_brands, overview.unique_regions, overview.missing_values
    ));

    section
}

/// Generate the brand analysis section.
fn generate_brand_section(brands: &BrandAnalysis) -> String {
    let mut section = String::new();

    section.push_str("## Brand Analysis\n\n");
    section.push_str(&format!("### Top {} Fast Food Brands\n\n", brands.top_n));
    section.push_str(&ranking_table(&brands.ranking, "Brand"));

    section.push_str("### Market Share Analysis\n\n");
    if brands.ranking.is_empty() {
        section.push_str("No restaurants match the current filters.\n\n");
        return section;
    }

    section.push_str("**Top Brands by Count:**\n\n");
    for entry in brands.ranking.entries.iter().take(MARKET_SHARE_LINES) {
        section.push_str(&format!("- {}: {} locations\n", entry.category, entry.count));
    }
    section.push('\n');

    section.push_str("**Market Share (%):**\n\n");
    for share in brands.market_share.iter().take(MARKET_SHARE_LINES) {
        section.push_str(&format!("- {}: {}%\n", share.category, share.percentage));
    }
    section.push('\n');

    section
}

/// Generate the geographic distribution section.
fn generate_geography_section(geography: &GeographicDistribution) -> String {
    let mut section = String::new();

    section.push_str("## Geographic Distribution\n\n");
    section.push_str(&format!(
        "### Top {} States by Restaurant Count\n\n",
        geography.top_n
    ));
    section.push_str(&ranking_table(&geography.ranking, "State"));

    section.push_str("### Latitude Distribution\n\n");
    section.push_str(&histogram_table(&geography.latitude, "Latitude"));
    section.push_str("### Longitude Distribution\n\n");
    section.push_str(&histogram_table(&geography.longitude, "Longitude"));

    section.push_str("### Restaurant Locations by Brand\n\n");
    match geography.scatter {
        Some(ref series) if !series.is_empty() => {
            section.push_str("| Brand | Located Points | Latitude Range | Longitude Range |\n");
            section.push_str("|:---|:---:|:---:|:---:|\n");
            for s in series {
                let lat = range(s.points.iter().map(|p| p.latitude));
                let lon = range(s.points.iter().map(|p| p.longitude));
                section.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    cell(&s.brand),
                    s.points.len(),
                    lat,
                    lon
                ));
            }
            section.push('\n');
        }
        Some(_) => section.push_str("No located restaurants to plot.\n\n"),
        None => section.push_str("Too many locations to plot; narrow the filters.\n\n"),
    }

    section
}

/// Generate the regional comparison section.
fn generate_comparison_section(comparison: &[ComparisonSummary]) -> String {
    let mut section = String::new();

    section.push_str("## Regional Comparison\n\n");
    if comparison.is_empty() {
        section.push_str("No states selected for comparison.\n\n");
        return section;
    }

    for summary in comparison.iter().take(CHARTED_REGIONS) {
        section.push_str(&format!("### Top Brands in {}\n\n", summary.region));
        section.push_str(&ranking_table(&summary.top_brands, "Brand"));
    }

    section.push_str("### State Comparison Summary\n\n");
    section.push_str("| State | Total Restaurants | Unique Brands | Top Brand |\n");
    section.push_str("|:---|:---:|:---:|:---|\n");
    for summary in comparison {
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            cell(&summary.region),
            summary.total_count,
            summary.unique_brands,
            cell(&summary.top_brand)
        ));
    }
    section.push('\n');

    section
}

/// Generate the data explorer section.
fn generate_explorer_section(explorer: &DataExplorer) -> String {
    let mut section = String::new();

    section.push_str("## Data Explorer\n\n");
    section.push_str("### Dataset Sample\n\n");
    if explorer.sample.is_empty() {
        section.push_str("No rows to show.\n\n");
    } else {
        section.push_str("| name | province | latitude | longitude | address |\n");
        section.push_str("|:---|:---|---:|---:|:---|\n");
        for r in &explorer.sample {
            section.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                cell(r.name.as_deref().unwrap_or("")),
                cell(r.province.as_deref().unwrap_or("")),
                number(r.latitude),
                number(r.longitude),
                cell(r.address.as_deref().unwrap_or(""))
            ));
        }
        section.push('\n');
    }

    section.push_str("### Dataset Statistics\n\n");
    section.push_str(&stats_table(&explorer.latitude, &explorer.longitude));
    section.push_str(&format!("- Total Brands: {}\n", explorer.total_brands));
    section.push_str(&format!("- Total States: {}\n", explorer.total_regions));
    section.push_str(&format!("- Total Records: {}\n\n", explorer.total_records));

    section.push_str("### Brand Frequency Distribution\n\n");
    section.push_str(&histogram_table(&explorer.brand_frequency, "Locations per Brand"));

    section
}

/// Generate the key insights section.
fn generate_insights_section(insights: &Insights) -> String {
    let mut section = String::new();

    section.push_str("## Key Insights\n\n");
    for paragraph in &insights.paragraphs {
        section.push_str(&format!("### {}\n\n{}\n\n", paragraph.title, paragraph.body));
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by fastfood-atlas*\n");

    footer
}

fn ranking_table(ranking: &Ranking, label: &str) -> String {
    if ranking.is_empty() {
        return "No data.\n\n".to_string();
    }

    let max = ranking.entries.iter().map(|e| e.count).max().unwrap_or(0);
    let mut table = String::new();
    table.push_str(&format!("| {} | Locations | |\n", label));
    table.push_str("|:---|---:|:---|\n");
    for entry in &ranking.entries {
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            cell(&entry.category),
            entry.count,
            bar(entry.count, max)
        ));
    }
    table.push('\n');
    table
}

fn histogram_table(histogram: &Histogram, label: &str) -> String {
    if histogram.bins.is_empty() {
        return "No data.\n\n".to_string();
    }

    let max = histogram.bins.iter().map(|b| b.count).max().unwrap_or(0);
    let mut table = String::new();
    table.push_str(&format!(
        "{} values in {} bins.\n\n",
        histogram.total(),
        histogram.bins.len()
    ));
    table.push_str(&format!("| {} | Frequency | |\n", label));
    table.push_str("|:---|---:|:---|\n");
    for b in &histogram.bins {
        table.push_str(&format!(
            "| {:.2} to {:.2} | {} | {} |\n",
            b.lower,
            b.upper,
            b.count,
            bar(b.count, max)
        ));
    }
    table.push('\n');
    table
}

fn stats_table(latitude: &ColumnStats, longitude: &ColumnStats) -> String {
    let rows: [(&str, Option<f64>, Option<f64>); 7] = [
        ("mean", latitude.mean, longitude.mean),
        ("std", latitude.std, longitude.std),
        ("min", latitude.min, longitude.min),
        ("25%", latitude.p25, longitude.p25),
        ("50%", latitude.median, longitude.median),
        ("75%", latitude.p75, longitude.p75),
        ("max", latitude.max, longitude.max),
    ];

    let mut table = String::new();
    table.push_str("| | latitude | longitude |\n");
    table.push_str("|:---|---:|---:|\n");
    table.push_str(&format!(
        "| count | {} | {} |\n",
        latitude.count, longitude.count
    ));
    for (name, lat, lon) in rows {
        table.push_str(&format!("| {} | {} | {} |\n", name, number(lat), number(lon)));
    }
    table.push('\n');
    table
}

fn bar(count: usize, max: usize) -> String {
    if count == 0 || max == 0 {
        return String::new();
    }
    let len = ((count as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.max(1))
}

/// Escapes text for a Markdown table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn number(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "-".to_string())
}

fn range(values: impl Iterator<Item = f64>) -> String {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        "-".to_string()
    } else {
        format!("{:.2} to {:.2}", lo, hi)
    }
}

/// Generate a JSON report.
pub fn generate_json_report(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).map_err(Into::into)
}

/// Generate the JSON document written when the dataset could not be loaded.
pub fn generate_unavailable_json(source: &str, notice: &str) -> Result<String> {
    serde_json::to_string_pretty(&json!({
        "source": source,
        "available": false,
        "notice": notice,
    }))
    .map_err(Into::into)
}
