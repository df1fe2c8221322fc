//! Spending analytics over an in-memory item list.
//!
//! Everything here is a pure function of the items passed in. Only
//! *valid-spend* items (price readable as a finite number strictly greater
//! than zero) contribute to totals; other items are still counted as
//! unpriced so listings can report them.
//!
//! Buckets keep first-seen order, and every "by amount" ordering is a
//! stable sort, so equal amounts stay in first-seen order and identical
//! input always yields identical output.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{Item, Price};

/// Bucket label for items without a tag.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Bucket label for items without a year.
pub const UNKNOWN_YEAR: &str = "Unknown";

/// Amount an item contributes to spend totals, if any.
pub fn spend_amount(item: &Item) -> Option<f64> {
    item.price
        .as_ref()
        .and_then(Price::as_number)
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Whether the item counts towards spend totals.
pub fn is_valid_spend(item: &Item) -> bool {
    spend_amount(item).is_some()
}

/// Display label of the tag bucket an item falls into.
pub fn tag_label(item: &Item) -> &str {
    match item.tag.as_deref().map(str::trim) {
        Some(tag) if !tag.is_empty() => tag,
        _ => UNCATEGORIZED,
    }
}

// Tags group case-insensitively.
fn tag_key(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Tag bucket key. Untagged items never share a bucket with a real tag,
/// whatever that tag is spelled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TagKey {
    Tag(String),
    Uncategorized,
}

impl TagKey {
    fn of(item: &Item) -> Self {
        match item.tag.as_deref().map(str::trim) {
            Some(tag) if !tag.is_empty() => TagKey::Tag(tag_key(tag)),
            _ => TagKey::Uncategorized,
        }
    }
}

fn round_to_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

// =============================================================================
// BUCKET TYPES
// =============================================================================

/// Year grouping key. Orders chronologically with `Unknown` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum YearBucket {
    Year(i32),
    Unknown,
}

impl YearBucket {
    pub fn of(item: &Item) -> Self {
        item.year.map(YearBucket::Year).unwrap_or(YearBucket::Unknown)
    }
}

impl std::fmt::Display for YearBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YearBucket::Year(y) => write!(f, "{}", y),
            YearBucket::Unknown => f.write_str(UNKNOWN_YEAR),
        }
    }
}

impl From<YearBucket> for String {
    fn from(bucket: YearBucket) -> Self {
        bucket.to_string()
    }
}

impl TryFrom<String> for YearBucket {
    type Error = std::num::ParseIntError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == UNKNOWN_YEAR {
            Ok(YearBucket::Unknown)
        } else {
            s.trim().parse().map(YearBucket::Year)
        }
    }
}

/// Summed spend for one tag bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TagSpend {
    /// First-seen spelling of the tag, or `Uncategorized`.
    pub tag: String,
    pub amount: f64,
}

/// Summed spend for one year bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct YearSpend {
    #[schema(value_type = String)]
    pub year: YearBucket,
    pub amount: f64,
}

/// Share of total spend for one tag, rounded to one decimal place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TagShare {
    pub tag: String,
    pub amount: f64,
    pub percentage: f64,
}

// =============================================================================
// SUMMARY
// =============================================================================

/// Totals and groupings computed in one pass over an item list.
#[derive(Debug, Clone, Default)]
pub struct SpendingSummary {
    total_spent: f64,
    priced_count: usize,
    unpriced_count: usize,
    by_tag: IndexMap<TagKey, TagSpend>,
    by_year: IndexMap<YearBucket, f64>,
}

impl SpendingSummary {
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut summary = Self::default();

        for item in items {
            let Some(amount) = spend_amount(item) else {
                summary.unpriced_count += 1;
                continue;
            };

            summary.priced_count += 1;
            summary.total_spent += amount;

            let label = tag_label(item);
            summary
                .by_tag
                .entry(TagKey::of(item))
                .or_insert_with(|| TagSpend {
                    tag: label.to_string(),
                    amount: 0.0,
                })
                .amount += amount;

            *summary.by_year.entry(YearBucket::of(item)).or_insert(0.0) += amount;
        }

        summary
    }

    /// Sum of all valid-spend prices; 0 when there are none.
    pub fn total_spent(&self) -> f64 {
        self.total_spent
    }

    /// Number of items that contributed to the totals.
    pub fn priced_count(&self) -> usize {
        self.priced_count
    }

    /// Number of items excluded for a missing, non-numeric or zero price.
    pub fn unpriced_count(&self) -> usize {
        self.unpriced_count
    }

    pub fn has_spend(&self) -> bool {
        self.priced_count > 0
    }

    /// Spend for a tag, matched case-insensitively. 0 for unknown or blank tags.
    ///
    /// The exact label `Uncategorized` also counts untagged items, so the
    /// value agrees with what the dashboard shows under that label.
    pub fn spend_for_tag(&self, tag: &str) -> f64 {
        let tag = tag.trim();
        if tag.is_empty() {
            return 0.0;
        }
        let tagged = self.bucket_amount(&TagKey::Tag(tag_key(tag)));
        if tag == UNCATEGORIZED {
            tagged + self.spend_for_uncategorized()
        } else {
            tagged
        }
    }

    /// Spend of items without a tag.
    pub fn spend_for_uncategorized(&self) -> f64 {
        self.bucket_amount(&TagKey::Uncategorized)
    }

    fn bucket_amount(&self, key: &TagKey) -> f64 {
        self.by_tag.get(key).map(|t| t.amount).unwrap_or(0.0)
    }

    /// Spend for a year. 0 if no valid-spend item carries it.
    pub fn spend_for_year(&self, year: i32) -> f64 {
        self.spend_for_bucket(YearBucket::Year(year))
    }

    /// Spend of items without a year.
    pub fn spend_for_unknown_year(&self) -> f64 {
        self.spend_for_bucket(YearBucket::Unknown)
    }

    pub fn spend_for_bucket(&self, bucket: YearBucket) -> f64 {
        self.by_year.get(&bucket).copied().unwrap_or(0.0)
    }

    /// Tag buckets in first-seen order.
    pub fn tags(&self) -> impl Iterator<Item = &TagSpend> {
        self.by_tag.values()
    }

    /// Year buckets in first-seen order.
    pub fn years(&self) -> impl Iterator<Item = YearSpend> + '_ {
        self.by_year.iter().map(|(year, amount)| YearSpend {
            year: *year,
            amount: *amount,
        })
    }

    /// Tag buckets, highest spend first.
    pub fn tags_by_amount(&self) -> Vec<TagSpend> {
        let mut tags: Vec<TagSpend> = self.tags().cloned().collect();
        tags.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        tags
    }

    pub fn top_tags(&self, n: usize) -> Vec<TagSpend> {
        let mut tags = self.tags_by_amount();
        tags.truncate(n);
        tags
    }

    /// Year buckets, highest spend first.
    pub fn years_by_amount(&self) -> Vec<YearSpend> {
        let mut years: Vec<YearSpend> = self.years().collect();
        years.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        years
    }

    pub fn top_years(&self, n: usize) -> Vec<YearSpend> {
        let mut years = self.years_by_amount();
        years.truncate(n);
        years
    }

    /// Year buckets in ascending year order, `Unknown` last.
    pub fn years_chronological(&self) -> Vec<YearSpend> {
        let mut years: Vec<YearSpend> = self.years().collect();
        years.sort_by_key(|y| y.year);
        years
    }

    /// Percentage of total spend per tag, in first-seen order.
    ///
    /// Empty when nothing has been spent, so callers never divide by zero.
    pub fn tag_shares(&self) -> Vec<TagShare> {
        if self.total_spent <= 0.0 {
            return Vec::new();
        }
        self.tags()
            .map(|t| TagShare {
                tag: t.tag.clone(),
                amount: t.amount,
                percentage: round_to_tenth(100.0 * t.amount / self.total_spent),
            })
            .collect()
    }
}

/// Distinct tags over all items (priced or not), first-seen spelling and order.
pub fn unique_tags<'a, I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut seen: IndexMap<String, String> = IndexMap::new();
    for item in items {
        if let Some(tag) = item.tag.as_deref().map(str::trim) {
            if !tag.is_empty() {
                seen.entry(tag_key(tag)).or_insert_with(|| tag.to_string());
            }
        }
    }
    seen.into_values().collect()
}

/// Distinct years over all items, ascending.
pub fn unique_years<'a, I>(items: I) -> Vec<i32>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut years: Vec<i32> = items.into_iter().filter_map(|i| i.year).collect();
    years.sort_unstable();
    years.dedup();
    years
}

// =============================================================================
// REPORT
// =============================================================================

/// Serializable snapshot of the analytics dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpendingReport {
    pub total_spent: f64,
    pub priced_count: usize,
    pub unpriced_count: usize,
    /// Highest-spend tags, limited to the requested count.
    pub top_tags: Vec<TagSpend>,
    /// Highest-spend years, limited to the requested count.
    pub top_years: Vec<YearSpend>,
    /// Every tag bucket, highest spend first.
    pub by_tag: Vec<TagSpend>,
    /// Every year bucket, chronological.
    pub by_year: Vec<YearSpend>,
    pub tag_shares: Vec<TagShare>,
    /// Distinct tags across all items.
    pub tags: Vec<String>,
    /// Distinct years across all items.
    pub years: Vec<i32>,
}

impl SpendingReport {
    pub fn build<'a, I>(items: I, top: usize) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let items: Vec<&Item> = items.into_iter().collect();
        let summary = SpendingSummary::from_items(items.iter().copied());

        Self {
            total_spent: summary.total_spent(),
            priced_count: summary.priced_count(),
            unpriced_count: summary.unpriced_count(),
            top_tags: summary.top_tags(top),
            top_years: summary.top_years(top),
            by_tag: summary.tags_by_amount(),
            by_year: summary.years_chronological(),
            tag_shares: summary.tag_shares(),
            tags: unique_tags(items.iter().copied()),
            years: unique_years(items.iter().copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateItemRequest;
    use chrono::Utc;
    use uuid::Uuid;

    fn item(name: &str, price: Option<Price>, tag: Option<&str>, year: Option<i32>) -> Item {
        let mut item = Item::from_request(
            Uuid::now_v7(),
            CreateItemRequest::new(name),
            Utc::now(),
        );
        item.price = price;
        item.tag = tag.map(String::from);
        item.year = year;
        item
    }

    fn priced(name: &str, price: f64, tag: Option<&str>, year: Option<i32>) -> Item {
        item(name, Some(Price::Amount(price)), tag, year)
    }

    fn scenario_items() -> Vec<Item> {
        vec![
            priced("Aspirin", 50.0, Some("Medicine"), Some(2023)),
            priced("Bandage", 0.0, Some("Medicine"), None),
            item("Notebook", Some(Price::from("abc")), Some("Office"), None),
        ]
    }

    #[test]
    fn test_scenario_mixed_prices() {
        let items = scenario_items();
        let summary = SpendingSummary::from_items(&items);

        assert_eq!(summary.total_spent(), 50.0);
        assert_eq!(summary.priced_count(), 1);
        assert_eq!(summary.unpriced_count(), 2);
        assert_eq!(
            summary.tags_by_amount(),
            vec![TagSpend {
                tag: "Medicine".to_string(),
                amount: 50.0
            }]
        );
        assert_eq!(summary.spend_for_tag("Office"), 0.0);
        assert_eq!(summary.spend_for_year(2023), 50.0);
        assert_eq!(summary.spend_for_unknown_year(), 0.0);
    }

    #[test]
    fn test_empty_list_totals_zero() {
        let items: Vec<Item> = Vec::new();
        let summary = SpendingSummary::from_items(&items);
        assert_eq!(summary.total_spent(), 0.0);
        assert!(!summary.has_spend());
        assert!(summary.tags_by_amount().is_empty());
        assert!(summary.tag_shares().is_empty());
    }

    #[test]
    fn test_invalid_prices_excluded() {
        let items = vec![
            item("none", None, Some("A"), None),
            item("empty", Some(Price::from("")), Some("A"), None),
            item("nan", Some(Price::from("NaN")), Some("A"), None),
            item("inf", Some(Price::from("inf")), Some("A"), None),
            priced("negative", -5.0, Some("A"), None),
            priced("zero", 0.0, Some("A"), None),
            item("numeric text", Some(Price::from("12.5")), Some("A"), None),
        ];
        let summary = SpendingSummary::from_items(&items);
        assert_eq!(summary.total_spent(), 12.5);
        assert_eq!(summary.priced_count(), 1);
        assert_eq!(summary.unpriced_count(), 6);
    }

    #[test]
    fn test_total_equals_sum_of_valid_prices() {
        let items = vec![
            priced("a", 10.25, Some("X"), Some(2020)),
            priced("b", 3.5, None, Some(2021)),
            priced("c", 0.0, Some("X"), None),
            priced("d", 99.0, Some("Y"), None),
        ];
        let expected: f64 = items.iter().filter_map(spend_amount).sum();
        let summary = SpendingSummary::from_items(&items);
        assert!((summary.total_spent() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_tag_groups_partition_total() {
        let items = vec![
            priced("a", 10.1, Some("Food"), Some(2020)),
            priced("b", 20.2, Some("Travel"), Some(2021)),
            priced("c", 30.3, None, None),
            priced("d", 40.4, Some("food"), Some(2020)),
            priced("e", 0.0, Some("Gifts"), None),
        ];
        let summary = SpendingSummary::from_items(&items);

        let tag_sum: f64 = summary.tags().map(|t| t.amount).sum();
        let year_sum: f64 = summary.years().map(|y| y.amount).sum();
        assert!((tag_sum - summary.total_spent()).abs() < 1e-9);
        assert!((year_sum - summary.total_spent()).abs() < 1e-9);
    }

    #[test]
    fn test_sentinel_buckets() {
        let items = vec![
            priced("a", 5.0, None, None),
            priced("b", 7.0, Some("   "), None),
        ];
        let summary = SpendingSummary::from_items(&items);
        assert_eq!(summary.spend_for_tag(UNCATEGORIZED), 12.0);
        assert_eq!(summary.spend_for_unknown_year(), 12.0);
        assert_eq!(
            summary.years_chronological(),
            vec![YearSpend {
                year: YearBucket::Unknown,
                amount: 12.0
            }]
        );
    }

    #[test]
    fn test_literal_uncategorized_tag_keeps_its_own_bucket() {
        let items = vec![
            priced("a", 12.0, Some("uncategorized"), None),
            priced("b", 5.0, None, None),
        ];
        let summary = SpendingSummary::from_items(&items);

        assert_eq!(
            summary.tags().cloned().collect::<Vec<_>>(),
            vec![
                TagSpend {
                    tag: "uncategorized".to_string(),
                    amount: 12.0
                },
                TagSpend {
                    tag: UNCATEGORIZED.to_string(),
                    amount: 5.0
                },
            ]
        );
        assert_eq!(summary.spend_for_uncategorized(), 5.0);
        assert_eq!(summary.spend_for_tag("uncategorized"), 12.0);
        assert_eq!(summary.spend_for_tag(UNCATEGORIZED), 17.0);
    }

    #[test]
    fn test_nonexistent_tag_and_year_are_zero() {
        let summary = SpendingSummary::from_items(&scenario_items());
        assert_eq!(summary.spend_for_tag("nonexistent"), 0.0);
        assert_eq!(summary.spend_for_tag(""), 0.0);
        assert_eq!(summary.spend_for_year(1999), 0.0);
    }

    #[test]
    fn test_tag_matching_is_case_insensitive() {
        let items = vec![
            priced("a", 10.0, Some("Medicine"), None),
            priced("b", 5.0, Some("medicine"), None),
            priced("c", 1.0, Some("MEDICINE "), None),
        ];
        let summary = SpendingSummary::from_items(&items);
        assert_eq!(summary.spend_for_tag("MeDiCiNe"), 16.0);

        let tags = summary.tags_by_amount();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].tag, "Medicine", "label keeps first-seen spelling");
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let items = vec![
            priced("a", 10.0, Some("Beta"), Some(2022)),
            priced("b", 10.0, Some("Alpha"), Some(2021)),
            priced("c", 30.0, Some("Gamma"), Some(2020)),
            priced("d", 10.0, Some("Delta"), Some(2019)),
        ];
        let summary = SpendingSummary::from_items(&items);

        let order: Vec<String> = summary.tags_by_amount().into_iter().map(|t| t.tag).collect();
        assert_eq!(order, vec!["Gamma", "Beta", "Alpha", "Delta"]);

        let years: Vec<YearBucket> = summary
            .years_by_amount()
            .into_iter()
            .map(|y| y.year)
            .collect();
        assert_eq!(
            years,
            vec![
                YearBucket::Year(2020),
                YearBucket::Year(2022),
                YearBucket::Year(2021),
                YearBucket::Year(2019)
            ]
        );
    }

    #[test]
    fn test_top_tags_truncates() {
        let items: Vec<Item> = (1..=8)
            .map(|i| priced("x", i as f64, Some(format!("T{}", i).as_str()), None))
            .collect();
        let summary = SpendingSummary::from_items(&items);
        let top = summary.top_tags(5);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].tag, "T8");
        assert_eq!(top[4].tag, "T4");
    }

    #[test]
    fn test_years_chronological_unknown_last() {
        let items = vec![
            priced("a", 1.0, None, None),
            priced("b", 2.0, None, Some(2024)),
            priced("c", 3.0, None, Some(2019)),
        ];
        let summary = SpendingSummary::from_items(&items);
        let years: Vec<String> = summary
            .years_chronological()
            .into_iter()
            .map(|y| y.year.to_string())
            .collect();
        assert_eq!(years, vec!["2019", "2024", "Unknown"]);
    }

    #[test]
    fn test_tag_shares_rounded_to_one_decimal() {
        let items = vec![
            priced("a", 1.0, Some("A"), None),
            priced("b", 2.0, Some("B"), None),
        ];
        let shares = SpendingSummary::from_items(&items).tag_shares();
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].percentage, 33.3);
        assert_eq!(shares[1].percentage, 66.7);
    }

    #[test]
    fn test_tag_shares_empty_when_nothing_spent() {
        let items = vec![priced("a", 0.0, Some("A"), None), item("b", None, None, None)];
        let shares = SpendingSummary::from_items(&items).tag_shares();
        assert!(shares.is_empty());
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let items = vec![
            priced("a", 4.0, Some("X"), Some(2020)),
            priced("b", 4.0, Some("Y"), Some(2021)),
            priced("c", 9.5, None, None),
        ];
        let first = SpendingReport::build(&items, 5);
        let second = SpendingReport::build(&items, 5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unique_tags_and_years_cover_unpriced_items() {
        let items = scenario_items();
        assert_eq!(unique_tags(&items), vec!["Medicine", "Office"]);
        assert_eq!(unique_years(&items), vec![2023]);
    }

    #[test]
    fn test_unique_tags_case_insensitive_first_seen() {
        let items = vec![
            item("a", None, Some("Office"), Some(2021)),
            item("b", None, Some("office"), Some(2019)),
            item("c", None, None, Some(2021)),
            item("d", None, Some("Books"), None),
        ];
        assert_eq!(unique_tags(&items), vec!["Office", "Books"]);
        assert_eq!(unique_years(&items), vec![2019, 2021]);
    }

    #[test]
    fn test_year_bucket_serde() {
        let json = serde_json::to_string(&YearBucket::Year(2023)).unwrap();
        assert_eq!(json, "\"2023\"");
        let unknown: YearBucket = serde_json::from_str("\"Unknown\"").unwrap();
        assert_eq!(unknown, YearBucket::Unknown);
        assert!(serde_json::from_str::<YearBucket>("\"soon\"").is_err());
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let report = SpendingReport::build(&scenario_items(), 5);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["totalSpent"], serde_json::json!(50.0));
        assert_eq!(json["byYear"][0]["year"], serde_json::json!("2023"));

        let parsed: SpendingReport = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, report);
    }
}
