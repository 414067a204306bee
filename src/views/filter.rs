//! Filter Primitives Module
//! The "All" sentinel, filter option lists and the conjunctive equality
//! filters shared by the product and shop views.

use polars::prelude::*;

/// Sentinel option matching every row.
pub const ALL_OPTION: &str = "All";

/// Distinct non-null values of a column, lexicographically sorted, with the
/// sentinel prepended as the first selectable option.
pub fn filter_options(df: &DataFrame, column: &str) -> Vec<String> {
    let mut options = distinct_values(df, column);
    options.sort();
    options.insert(0, ALL_OPTION.to_string());
    options
}

/// Distinct non-null values of a column. Unlabeled (null) entries are not
/// offered as filter choices.
pub fn distinct_values(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .ok()
        .and_then(|col| col.unique().ok())
        .map(|unique| {
            let series = unique.as_materialized_series();
            (0..series.len())
                .filter_map(|i| {
                    let val = series.get(i).ok()?;
                    if val.is_null() {
                        None
                    } else {
                        Some(val.to_string().trim_matches('"').to_string())
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Resolve a selection against the column's current values. A stale value
/// (no longer present in the data) degrades to the sentinel instead of
/// failing.
pub fn resolve_selection(df: &DataFrame, column: &str, selected: &str) -> String {
    if selected == ALL_OPTION {
        return ALL_OPTION.to_string();
    }
    if distinct_values(df, column).iter().any(|v| v == selected) {
        selected.to_string()
    } else {
        log::warn!(
            "filter value '{selected}' no longer present in column '{column}', \
             falling back to '{ALL_OPTION}'"
        );
        ALL_OPTION.to_string()
    }
}

/// Apply conjunctive exact-match filters; sentinel selections are skipped.
/// Row order is preserved.
pub fn apply_equality_filters(
    df: &DataFrame,
    selections: &[(&str, &str)],
) -> PolarsResult<DataFrame> {
    let mut lazy = df.clone().lazy();
    for (column, value) in selections {
        if *value != ALL_OPTION {
            lazy = lazy.filter(col(*column).eq(lit(*value)));
        }
    }
    lazy.collect()
}

/// Non-missing values of a numeric column as f64.
pub fn numeric_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<f64>> {
    let values = df.column(column)?.cast(&DataType::Float64)?;
    let values = values.f64()?;
    Ok(values.into_iter().flatten().collect())
}

/// Non-missing values of a numeric column restricted to rows where
/// `key_column` equals `key`.
pub fn numeric_values_for_group(
    df: &DataFrame,
    key_column: &str,
    key: &str,
    column: &str,
) -> PolarsResult<Vec<f64>> {
    let subset = df
        .clone()
        .lazy()
        .filter(col(key_column).eq(lit(key)))
        .collect()?;
    numeric_values(&subset, column)
}
