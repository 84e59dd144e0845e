use crate::catalog::Course;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

pub const FREE_PRICE_RANGE: &str = "Free - Varies";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSummary {
    pub total_courses: usize,
    /// Number of distinct categories.
    pub categories: usize,
    pub average_rating: f64,
    pub price_range: String,
}

/// Parse a free-text number by keeping only digits and dots.
/// "$19.99" -> 19.99, "4.6 stars" -> 4.6, "Free" -> None.
pub fn parse_loose_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Mean of the ratings that parse; 0.0 when none do.
pub fn average_rating(courses: &[Course]) -> f64 {
    let ratings: Vec<f64> = courses
        .iter()
        .filter_map(|c| c.rating.as_deref())
        .filter_map(parse_loose_number)
        .collect();
    if ratings.is_empty() {
        return 0.0;
    }
    ratings.iter().sum::<f64>() / ratings.len() as f64
}

/// "$min - $max" over positive prices, or the free placeholder.
pub fn price_range(courses: &[Course]) -> String {
    let prices: Vec<f64> = courses
        .iter()
        .filter_map(|c| c.price.as_deref())
        .filter_map(parse_loose_number)
        .filter(|p| *p > 0.0)
        .collect();
    if prices.is_empty() {
        return FREE_PRICE_RANGE.to_string();
    }
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    format!("${min:.2} - ${max:.2}")
}

pub fn summarize(courses: &[Course]) -> PlatformSummary {
    let categories: HashSet<&str> = courses.iter().filter_map(|c| c.category.as_deref()).collect();
    PlatformSummary {
        total_courses: courses.len(),
        categories: categories.len(),
        average_rating: average_rating(courses),
        price_range: price_range(courses),
    }
}

/// Summaries keyed by the requested platform name. Names with no courses
/// still get an (empty) entry.
pub fn compare_platforms<'a, I>(courses: &[Course], names: I) -> BTreeMap<String, PlatformSummary>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|name| {
            let wanted = name.to_lowercase();
            let matching: Vec<Course> = courses
                .iter()
                .filter(|c| c.platform.trim().to_lowercase() == wanted)
                .cloned()
                .collect();
            (name.to_string(), summarize(&matching))
        })
        .collect()
}
