//! Bind selection + series cache into line-series descriptors for the chart.

use crate::catalog::SelectionKey;
use crate::selection::SelectionStore;
use crate::series::{NameSeries, SeriesCache, YEARS_LEN, YEAR_MAX, YEAR_MIN};

/// Detailed per-year statistics are only shown for names with at least 20
/// occurrences (privacy policy); `total_count > 19` drives series visibility.
pub const VISIBILITY_FLOOR: u64 = 20;

/// One chart series in legend order: display name, (year, count) points, and
/// whether it may be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundSeries {
    pub name: String,
    pub points: Vec<(f64, f64)>,
    pub visible: bool,
}

fn bind_one(series: &NameSeries) -> BoundSeries {
    let points = series
        .yearly
        .iter()
        .enumerate()
        .map(|(i, &count)| ((YEAR_MIN as usize + i) as f64, count as f64))
        .collect();
    BoundSeries {
        name: series.display_name.clone(),
        points,
        visible: series.total_count >= VISIBILITY_FLOOR,
    }
}

/// Build the chart input: one descriptor per selection entry whose series has
/// arrived, in selection insertion order. Names still being fetched are
/// omitted entirely (never rendered as empty/zero); the chart grows
/// incrementally as fetches resolve, independent of completion order.
pub fn bind_chart_series(selection: &SelectionStore, cache: &SeriesCache) -> Vec<BoundSeries> {
    selection
        .entries()
        .iter()
        .filter_map(|&key| cache.get(key))
        .map(bind_one)
        .collect()
}

/// The fixed categorical year axis, constant across all series.
pub fn year_categories() -> Vec<String> {
    (YEAR_MIN..=YEAR_MAX).map(|y| y.to_string()).collect()
}

/// Axis bounds for rendering/export: x is always the full fixed year range,
/// y spans 0 to the maximum count among visible series.
pub fn chart_bounds(series: &[BoundSeries]) -> (f64, f64, f64, f64) {
    let y_max = series
        .iter()
        .filter(|s| s.visible)
        .flat_map(|s| s.points.iter().map(|&(_, y)| y))
        .fold(0.0_f64, f64::max);
    let y_max = if y_max > 0.0 { y_max } else { 1.0 };
    (YEAR_MIN as f64, YEAR_MAX as f64, 0.0, y_max)
}

/// Czech compact count formatting used in list rows and the y axis:
/// counts of at least 1000 render as "N tis.".
pub fn format_count(count: u64) -> String {
    if count >= 1000 {
        format!("{} tis.", count / 1000)
    } else {
        count.to_string()
    }
}

/// True when no selected name still has a fetch outstanding.
pub fn all_series_settled(selection: &SelectionStore, cache: &SeriesCache) -> bool {
    selection
        .entries()
        .iter()
        .all(|&key| cache.get(key).is_some() || !cache.in_flight(key))
}
