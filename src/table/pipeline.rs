//! Search, filter, sort and pagination primitives.
//!
//! Each stage is a plain function over rows so the engine and the memory
//! repository can share them.

use std::cmp::Ordering;

use super::collate;
use super::row::{present, stringify, TableRow};
use super::types::{FilterField, FilterKind, FilterState, FilterValue, SortDirection};

/// True when `needle` is empty or any search field contains it, ignoring case.
pub fn matches_search<R: TableRow + ?Sized>(row: &R, search_fields: &[String], needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    search_fields.iter().any(|field| {
        present(row, field)
            .and_then(stringify)
            .map(|text| text.to_lowercase().contains(&needle))
            .unwrap_or(false)
    })
}

/// Filters that will actually run, paired with their current value.
/// Bypassed filters (absent or `"all"`) are dropped here.
pub fn active_filters<'a>(fields: &'a [FilterField], state: &FilterState) -> Vec<(&'a FilterField, FilterValue)> {
    fields
        .iter()
        .filter_map(|field| match state.get(&field.key) {
            Some(value) if !value.is_bypass() => Some((field, value)),
            _ => None,
        })
        .collect()
}

pub fn matches_filter<R: TableRow + ?Sized>(row: &R, field: &FilterField, value: &FilterValue) -> bool {
    if value.is_bypass() {
        return true;
    }
    match field.kind {
        FilterKind::Select { .. } => present(row, &field.key)
            .and_then(stringify)
            .map(|text| text == value.to_filter_string())
            .unwrap_or(false),
        // strict equality against the switch state
        FilterKind::Switch => row.field(&field.key) == Some(&value.to_json()),
    }
}

pub fn matches_filters<R: TableRow + ?Sized>(row: &R, active: &[(&FilterField, FilterValue)]) -> bool {
    active.iter().all(|(field, value)| matches_filter(row, field, value))
}

/// Compares two rows on `column`. Rows without a value always go last,
/// whatever the direction.
pub fn compare_rows<R: TableRow + ?Sized>(a: &R, b: &R, column: &str, direction: SortDirection) -> Ordering {
    match (present(a, column), present(b, column)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let x = stringify(x).unwrap_or_default();
            let y = stringify(y).unwrap_or_default();
            let ordering = collate::compare(&x, &y);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

/// Index range of `page` (1-based) within `len` items.
pub fn page_bounds(len: usize, page: usize, page_size: usize) -> std::ops::Range<usize> {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    &items[page_bounds(items.len(), page, page_size)]
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1))
}
