//! Filter and aggregate operations over a dataset.
//!
//! Every function here is pure: results are derived from scratch from the
//! dataset passed in, and inputs are never mutated.

use crate::error::PipelineError;
use crate::models::{
    ComparisonSummary, Dataset, Field, FilterSelection, RankEntry, Ranking, Record, ShareEntry,
    SummaryMetrics, ALL, NO_DATA,
};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Brands listed per region in a comparison summary, unless configured otherwise.
pub const DEFAULT_BRANDS_PER_REGION: usize = 8;

/// Regions compared by default when all of them are present.
pub const PREFERRED_COMPARISON_REGIONS: [&str; 4] = ["CA", "TX", "FL", "NY"];

/// Returns the records matching the selection's region and brand.
pub fn apply_filter(dataset: &Dataset, selection: &FilterSelection) -> Dataset {
    if selection.is_empty() {
        return dataset.clone();
    }

    dataset
        .iter()
        .filter(|r| matches(r, selection))
        .cloned()
        .collect()
}

fn matches(record: &Record, selection: &FilterSelection) -> bool {
    let region_ok = match &selection.region {
        Some(region) => record.province.as_deref() == Some(region.as_str()),
        None => true,
    };
    let brand_ok = match &selection.brand {
        Some(brand) => record.name.as_deref() == Some(brand.as_str()),
        None => true,
    };
    region_ok && brand_ok
}

/// Computes row count, distinct brands and regions, and null cells.
pub fn summary_metrics(dataset: &Dataset) -> SummaryMetrics {
    SummaryMetrics {
        count: dataset.len(),
        unique_brands: distinct_count(dataset, Field::Name),
        unique_regions: distinct_count(dataset, Field::Province),
        missing_values: dataset.iter().map(Record::missing_cells).sum(),
    }
}

/// Number of distinct non-null values of a field.
pub fn distinct_count(dataset: &Dataset, field: Field) -> usize {
    dataset
        .iter()
        .filter_map(|r| r.category(field))
        .collect::<HashSet<_>>()
        .len()
}

/// Counts every category of a field, in first-appearance order.
pub fn value_counts(dataset: &Dataset, field: Field) -> Ranking {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<RankEntry> = Vec::new();

    for value in dataset.iter().filter_map(|r| r.category(field)) {
        match positions.get(value) {
            Some(&idx) => entries[idx].count += 1,
            None => {
                positions.insert(value, entries.len());
                entries.push(RankEntry {
                    category: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, so ties keep first-appearance order
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    Ranking { entries }
}

/// Returns the `n` most frequent categories of a field.
pub fn top_n(dataset: &Dataset, field: Field, n: usize) -> Ranking {
    let mut ranking = value_counts(dataset, field);
    ranking.entries.truncate(n);
    ranking
}

/// Converts ranking counts to percentages of `total_count`, rounded to 2 decimals.
pub fn market_share(ranking: &Ranking, total_count: usize) -> Result<Vec<ShareEntry>, PipelineError> {
    if total_count == 0 {
        return Err(PipelineError::DivisionUndefined);
    }

    Ok(ranking
        .entries
        .iter()
        .map(|e| ShareEntry {
            category: e.category.clone(),
            percentage: round2(100.0 * e.count as f64 / total_count as f64),
        })
        .collect())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Summarizes each requested region over the given (unfiltered) dataset.
pub fn region_comparison(dataset: &Dataset, regions: &[String]) -> Vec<ComparisonSummary> {
    region_comparison_with(dataset, regions, DEFAULT_BRANDS_PER_REGION)
}

/// Like [`region_comparison`], listing up to `brands_per_region` leading brands.
pub fn region_comparison_with(
    dataset: &Dataset,
    regions: &[String],
    brands_per_region: usize,
) -> Vec<ComparisonSummary> {
    regions
        .iter()
        .map(|region| {
            let selection = FilterSelection {
                region: Some(region.clone()),
                brand: None,
            };
            let in_region = apply_filter(dataset, &selection);
            let brands = value_counts(&in_region, Field::Name);

            ComparisonSummary {
                region: region.clone(),
                total_count: in_region.len(),
                unique_brands: brands.len(),
                top_brand: brands.leader().unwrap_or(NO_DATA).to_string(),
                top_brands: Ranking {
                    entries: brands.entries.into_iter().take(brands_per_region).collect(),
                },
            }
        })
        .collect()
}

/// Dropdown choices for a field: `All` followed by the sorted distinct values.
pub fn filter_options(dataset: &Dataset, field: Field) -> Vec<String> {
    let values: BTreeSet<&str> = dataset.iter().filter_map(|r| r.category(field)).collect();

    std::iter::once(ALL.to_string())
        .chain(values.into_iter().map(String::from))
        .collect()
}

/// Regions compared when the user has not picked any.
pub fn default_comparison_regions(dataset: &Dataset) -> Vec<String> {
    let available: BTreeSet<&str> = dataset
        .iter()
        .filter_map(|r| r.category(Field::Province))
        .collect();

    if PREFERRED_COMPARISON_REGIONS
        .iter()
        .all(|r| available.contains(r))
    {
        return PREFERRED_COMPARISON_REGIONS
            .iter()
            .map(|r| r.to_string())
            .collect();
    }

    available.into_iter().take(4).map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, province: &str) -> Record {
        Record {
            name: Some(name.to_string()),
            province: Some(province.to_string()),
            latitude: Some(34.0),
            longitude: Some(-118.0),
            address: Some("1 Main St".to_string()),
        }
    }

    fn example() -> Dataset {
        Dataset::new(vec![
            record("A", "CA"),
            record("B", "CA"),
            record("A", "TX"),
        ])
    }

    fn wide() -> Dataset {
        Dataset::new(vec![
            record("Subway", "NY"),
            record("McDonald's", "CA"),
            record("Subway", "CA"),
            record("McDonald's", "TX"),
            record("KFC", "TX"),
            record("Taco Bell", "CA"),
            record("McDonald's", "CA"),
        ])
    }

    fn select(region: Option<&str>, brand: Option<&str>) -> FilterSelection {
        FilterSelection {
            region: region.map(String::from),
            brand: brand.map(String::from),
        }
    }

    #[test]
    fn test_apply_filter_identity() {
        let d = example();
        assert_eq!(apply_filter(&d, &FilterSelection::none()), d);
        assert_eq!(summary_metrics(&d).count, apply_filter(&d, &FilterSelection::none()).len());
    }

    #[test]
    fn test_apply_filter_region_and_brand() {
        let d = wide();
        let ca = apply_filter(&d, &select(Some("CA"), None));
        assert_eq!(ca.len(), 4);
        assert!(ca.iter().all(|r| r.province.as_deref() == Some("CA")));

        let ca_mcd = apply_filter(&d, &select(Some("CA"), Some("McDonald's")));
        assert_eq!(ca_mcd.len(), 2);

        let subway = apply_filter(&d, &select(None, Some("Subway")));
        assert_eq!(subway.len(), 2);
    }

    #[test]
    fn test_apply_filter_is_subset_and_idempotent() {
        let d = wide();
        for selection in [
            select(Some("CA"), None),
            select(None, Some("McDonald's")),
            select(Some("TX"), Some("KFC")),
            select(Some("ZZ"), None),
        ] {
            let once = apply_filter(&d, &selection);
            assert!(once.iter().all(|r| d.records().contains(r)));
            assert_eq!(apply_filter(&once, &selection), once);
        }
        // input untouched
        assert_eq!(d.len(), 7);
    }

    #[test]
    fn test_apply_filter_empty_selection_result() {
        let d = wide();
        let none = apply_filter(&d, &select(Some("ZZ"), None));
        assert!(none.is_empty());
        assert_eq!(summary_metrics(&none), SummaryMetrics::default());
        assert!(top_n(&none, Field::Name, 5).is_empty());
    }

    #[test]
    fn test_null_region_never_matches_filter() {
        let mut r = record("A", "CA");
        r.province = None;
        let d = Dataset::new(vec![r, record("A", "CA")]);
        assert_eq!(apply_filter(&d, &select(Some("CA"), None)).len(), 1);
    }

    #[test]
    fn test_worked_example() {
        let d = example();

        let top = top_n(&d, Field::Name, 1);
        assert_eq!(top.pairs(), vec![("A", 2)]);

        assert_eq!(
            summary_metrics(&d),
            SummaryMetrics {
                count: 3,
                unique_brands: 2,
                unique_regions: 2,
                missing_values: 0,
            }
        );

        let ranking = top_n(&d, Field::Name, 2);
        let shares = market_share(&ranking, 3).unwrap();
        assert_eq!(shares[0].category, "A");
        assert_eq!(shares[0].percentage, 66.67);
        assert_eq!(shares[1].category, "B");
        assert_eq!(shares[1].percentage, 33.33);
    }

    #[test]
    fn test_summary_metrics_missing_values() {
        let mut partial = record("A", "CA");
        partial.latitude = None;
        partial.address = None;
        let blank = Record {
            name: Some("B".to_string()),
            ..Record::default()
        };
        let d = Dataset::new(vec![partial, blank, record("A", "TX")]);

        let metrics = summary_metrics(&d);
        assert_eq!(metrics.count, 3);
        assert_eq!(metrics.unique_brands, 2);
        assert_eq!(metrics.unique_regions, 2);
        assert_eq!(metrics.missing_values, 2 + 4);
    }

    #[test]
    fn test_top_n_ties_keep_first_appearance() {
        let d = Dataset::new(vec![
            record("C", "CA"),
            record("B", "CA"),
            record("A", "CA"),
            record("B", "CA"),
            record("A", "CA"),
        ]);
        let ranking = top_n(&d, Field::Name, 10);
        assert_eq!(ranking.pairs(), vec![("B", 2), ("A", 2), ("C", 1)]);
    }

    #[test]
    fn test_top_n_counts_and_bounds() {
        let d = wide();
        let all = top_n(&d, Field::Name, 100);
        assert_eq!(all.len(), 4);
        assert_eq!(all.total(), d.len());

        let two = top_n(&d, Field::Name, 2);
        assert_eq!(two.len(), 2);
        assert_eq!(two.pairs(), vec![("McDonald's", 3), ("Subway", 2)]);

        let regions = top_n(&d, Field::Province, 1);
        assert_eq!(regions.pairs(), vec![("CA", 4)]);

        assert!(top_n(&d, Field::Name, 0).is_empty());
    }

    #[test]
    fn test_top_n_skips_null_values() {
        let mut nameless = record("X", "CA");
        nameless.name = None;
        let d = Dataset::new(vec![nameless, record("A", "CA")]);
        let ranking = top_n(&d, Field::Name, 5);
        assert_eq!(ranking.total(), 1);
    }

    #[test]
    fn test_market_share_zero_total() {
        let err = market_share(&Ranking::default(), 0).unwrap_err();
        assert!(matches!(err, PipelineError::DivisionUndefined));
    }

    #[test]
    fn test_market_share_sums_to_at_most_100() {
        let d = wide();
        let partial = market_share(&top_n(&d, Field::Name, 2), d.len()).unwrap();
        let sum: f64 = partial.iter().map(|s| s.percentage).sum();
        assert!(sum < 100.0);

        let full = market_share(&top_n(&d, Field::Name, 10), d.len()).unwrap();
        let sum: f64 = full.iter().map(|s| s.percentage).sum();
        assert!((sum - 100.0).abs() < 0.05);
    }

    #[test]
    fn test_region_comparison() {
        let d = wide();
        let summaries = region_comparison(&d, &["CA".to_string(), "TX".to_string()]);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].region, "CA");
        assert_eq!(summaries[0].total_count, 4);
        assert_eq!(summaries[0].unique_brands, 3);
        assert_eq!(summaries[0].top_brand, "McDonald's");
        assert_eq!(summaries[0].top_brands.total(), 4);

        assert_eq!(summaries[1].total_count, 2);
        assert_eq!(summaries[1].top_brand, "McDonald's");
    }

    #[test]
    fn test_region_comparison_absent_region() {
        let summaries = region_comparison(&wide(), &["ZZ".to_string()]);
        assert_eq!(summaries[0].total_count, 0);
        assert_eq!(summaries[0].unique_brands, 0);
        assert_eq!(summaries[0].top_brand, NO_DATA);
        assert!(summaries[0].top_brands.is_empty());
    }

    #[test]
    fn test_region_comparison_limits_brand_list() {
        let summaries = region_comparison_with(&wide(), &["CA".to_string()], 1);
        assert_eq!(summaries[0].top_brands.len(), 1);
        assert_eq!(summaries[0].unique_brands, 3);
    }

    #[test]
    fn test_filter_options() {
        let options = filter_options(&wide(), Field::Province);
        assert_eq!(options, vec!["All", "CA", "NY", "TX"]);
    }

    #[test]
    fn test_default_comparison_regions() {
        let d = Dataset::new(vec![
            record("A", "OH"),
            record("A", "NY"),
            record("A", "FL"),
            record("A", "TX"),
            record("A", "CA"),
        ]);
        assert_eq!(default_comparison_regions(&d), vec!["CA", "TX", "FL", "NY"]);

        assert_eq!(default_comparison_regions(&wide()), vec!["CA", "NY", "TX"]);
    }

    #[test]
    fn test_fixture_pipeline() {
        let data = crate::source::parse_csv(
            include_str!("../../fixtures/restaurants.csv").as_bytes(),
        )
        .unwrap();

        let summary = summary_metrics(&data);
        assert_eq!(summary.count, 10);
        assert_eq!(summary.unique_brands, 6);
        assert_eq!(summary.unique_regions, 6);
        assert_eq!(summary.missing_values, 3);

        let ranking = top_n(&data, Field::Name, 3);
        assert_eq!(
            ranking.pairs(),
            vec![("McDonald's", 3), ("Burger King", 2), ("Taco Bell", 2)]
        );

        let shares = market_share(&ranking, summary.count).unwrap();
        let percentages: Vec<f64> = shares.iter().map(|s| s.percentage).collect();
        assert_eq!(percentages, vec![30.0, 20.0, 20.0]);

        let ny = region_comparison(&data, &["NY".to_string()]);
        assert_eq!(ny[0].total_count, 3);
        assert_eq!(ny[0].unique_brands, 2);
        assert_eq!(ny[0].top_brand, "McDonald's");
    }
}
