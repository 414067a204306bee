//! Label Mapping Module
//! Fixed mapping tables for the upstream cluster and classifier outputs,
//! and the copy-on-derive relabeling applied after CSV load.

use polars::prelude::*;
use thiserror::Error;

pub const CLUSTER_COL: &str = "cluster_label";
pub const SEGMENT_COL: &str = "segment";
pub const SHOP_SIZE_ENC_COL: &str = "SHOPSIZE_ENC_PRED";
pub const SHOP_SIZE_PRED_COL: &str = "SHOPSIZE_PRED";

/// Market segment assigned by the upstream clustering run.
pub const SEGMENT_LABELS: [(i64, &str); 3] = [
    (0, "Entry Level"),
    (1, "Mid-Range"),
    (2, "Flagship"),
];

/// Shop-size category predicted by the upstream classifier.
pub const SHOP_SIZE_LABELS: [(i64, &str); 4] = [
    (0, "LARGE"),
    (1, "MEDIUM"),
    (2, "SMALL"),
    (3, "XLARGE"),
];

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("label table '{table}' has a gap: expected code {expected}, found {found}")]
    Coverage {
        table: &'static str,
        expected: i64,
        found: i64,
    },
}

/// Look up a code in a mapping table. Unknown codes map to `None`.
pub fn label_for(table: &[(i64, &'static str)], code: i64) -> Option<&'static str> {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// Check that both mapping tables cover exactly the codes `0..len`.
/// Run once at startup so a bad table edit fails before any data is shown.
pub fn validate_label_tables() -> Result<(), LabelError> {
    validate_coverage("SEGMENT_LABELS", &SEGMENT_LABELS)?;
    validate_coverage("SHOP_SIZE_LABELS", &SHOP_SIZE_LABELS)
}

fn validate_coverage(name: &'static str, table: &[(i64, &'static str)]) -> Result<(), LabelError> {
    for (i, (code, _)) in table.iter().enumerate() {
        if *code != i as i64 {
            return Err(LabelError::Coverage {
                table: name,
                expected: i as i64,
                found: *code,
            });
        }
    }
    Ok(())
}

/// Derive `segment` from `cluster_label` when the source data lacks it.
pub fn apply_segment_labels(df: &DataFrame) -> Result<DataFrame, LabelError> {
    derive_label_column(df, CLUSTER_COL, SEGMENT_COL, &SEGMENT_LABELS)
}

/// Derive `SHOPSIZE_PRED` from `SHOPSIZE_ENC_PRED` when the source data lacks it.
pub fn apply_shop_size_labels(df: &DataFrame) -> Result<DataFrame, LabelError> {
    derive_label_column(df, SHOP_SIZE_ENC_COL, SHOP_SIZE_PRED_COL, &SHOP_SIZE_LABELS)
}

/// Copy-on-derive: a frame that already carries the label column (or has no
/// code column to derive it from) passes through untouched. Codes outside the
/// table map to null, never to an error.
fn derive_label_column(
    df: &DataFrame,
    code_col: &str,
    label_col: &str,
    table: &[(i64, &'static str)],
) -> Result<DataFrame, LabelError> {
    let has_label = df
        .get_column_names()
        .iter()
        .any(|name| name.as_str() == label_col);
    if has_label || df.column(code_col).is_err() {
        return Ok(df.clone());
    }

    let codes = df.column(code_col)?.cast(&DataType::Int64)?;
    let codes = codes.i64()?;
    let labels: Vec<Option<&str>> = codes
        .into_iter()
        .map(|code| code.and_then(|c| label_for(table, c)))
        .collect();

    let mut labeled = df.clone();
    labeled.with_column(Column::new(label_col.into(), labels))?;
    Ok(labeled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn segment_at(df: &DataFrame, idx: usize) -> Option<String> {
        let val = df.column(SEGMENT_COL).unwrap().get(idx).unwrap();
        if val.is_null() {
            None
        } else {
            Some(val.to_string().trim_matches('"').to_string())
        }
    }

    #[test]
    fn tables_cover_their_code_ranges() {
        validate_label_tables().unwrap();
    }

    #[test]
    fn cluster_codes_map_to_segments() {
        assert_eq!(label_for(&SEGMENT_LABELS, 0), Some("Entry Level"));
        assert_eq!(label_for(&SEGMENT_LABELS, 1), Some("Mid-Range"));
        assert_eq!(label_for(&SEGMENT_LABELS, 2), Some("Flagship"));
        assert_eq!(label_for(&SEGMENT_LABELS, 7), None);
    }

    #[test]
    fn shop_size_codes_map_to_categories() {
        assert_eq!(label_for(&SHOP_SIZE_LABELS, 0), Some("LARGE"));
        assert_eq!(label_for(&SHOP_SIZE_LABELS, 1), Some("MEDIUM"));
        assert_eq!(label_for(&SHOP_SIZE_LABELS, 2), Some("SMALL"));
        assert_eq!(label_for(&SHOP_SIZE_LABELS, 3), Some("XLARGE"));
        assert_eq!(label_for(&SHOP_SIZE_LABELS, -1), None);
    }

    #[test]
    fn derives_segment_from_cluster_label() {
        let df = df![
            CLUSTER_COL => [0i64, 1, 2],
        ]
        .unwrap();

        let labeled = apply_segment_labels(&df).unwrap();
        assert_eq!(segment_at(&labeled, 0).as_deref(), Some("Entry Level"));
        assert_eq!(segment_at(&labeled, 1).as_deref(), Some("Mid-Range"));
        assert_eq!(segment_at(&labeled, 2).as_deref(), Some("Flagship"));
    }

    #[test]
    fn unmapped_code_becomes_null_not_error() {
        let df = df![
            CLUSTER_COL => [2i64, 9],
        ]
        .unwrap();

        let labeled = apply_segment_labels(&df).unwrap();
        assert_eq!(segment_at(&labeled, 0).as_deref(), Some("Flagship"));
        assert_eq!(segment_at(&labeled, 1), None);
    }

    #[test]
    fn existing_segment_column_is_never_overwritten() {
        let df = df![
            CLUSTER_COL => [0i64, 1],
            SEGMENT_COL => ["Custom A", "Custom B"],
        ]
        .unwrap();

        let labeled = apply_segment_labels(&df).unwrap();
        assert_eq!(segment_at(&labeled, 0).as_deref(), Some("Custom A"));
        assert_eq!(segment_at(&labeled, 1).as_deref(), Some("Custom B"));

        // Relabeling twice is a no-op as well.
        let relabeled = apply_segment_labels(&labeled).unwrap();
        assert!(labeled.equals_missing(&relabeled));
    }

    #[test]
    fn shop_size_labels_derive_from_encoded_column() {
        let df = df![
            SHOP_SIZE_ENC_COL => [3i64, 0, 5],
        ]
        .unwrap();

        let labeled = apply_shop_size_labels(&df).unwrap();
        let col = labeled.column(SHOP_SIZE_PRED_COL).unwrap();
        assert_eq!(
            col.get(0).unwrap().to_string().trim_matches('"'),
            "XLARGE"
        );
        assert_eq!(col.get(1).unwrap().to_string().trim_matches('"'), "LARGE");
        assert!(col.get(2).unwrap().is_null());
    }
}
