//! Dataset Loader Module
//! Loads the product and shop CSV tables with Polars, validates their
//! schemas and reconciles the shop-identity column between them.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::data::labels::{
    self, LabelError, CLUSTER_COL, SEGMENT_COL, SHOP_SIZE_ENC_COL, SHOP_SIZE_PRED_COL,
};

pub const SHOPNAME_COL: &str = "SHOPNAME";
pub const SHOPSIZE_COL: &str = "SHOPSIZE";

/// Columns the product table must provide.
pub const PRODUCT_REQUIRED_COLUMNS: [&str; 8] = [
    "PRODUCT", "SHOPNAME", "BRAND", "MODEL", "PRICE", "RAM", "ROM", "SALES",
];

/// Fixed display projection for the product table.
pub const PRODUCT_DISPLAY_COLUMNS: [&str; 8] = [
    "PRODUCT", "SHOPNAME", "BRAND", "MODEL", "PRICE", "RAM", "ROM", SEGMENT_COL,
];

/// Per-brand unit-count columns of the shop table, in display order.
pub const SHOP_BRAND_COLUMNS: [&str; 16] = [
    "APPLE",
    "EVERCOSS/CROSS",
    "INFINIX",
    "IQOO",
    "ITEL",
    "LUNA",
    "NUBIA",
    "OPPO",
    "POCO",
    "REALME",
    "REDMI",
    "SAMSUNG",
    "TECNO",
    "VIVO",
    "XIAOMI",
    "ZTE",
];

/// Fixed display projection for the shop table.
pub fn shop_display_columns() -> Vec<&'static str> {
    let mut columns = vec![SHOPNAME_COL, SHOPSIZE_COL];
    columns.extend(SHOP_BRAND_COLUMNS);
    columns
}

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Failed to load CSV {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: PolarsError,
    },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: &'static str, column: String },
    #[error("{table} table must carry '{label}' or '{code}'")]
    MissingLabelSource {
        table: &'static str,
        label: &'static str,
        code: &'static str,
    },
    #[error("shop names do not line up with the product table: {0}")]
    JoinMismatch(String),
    #[error(transparent)]
    Label(#[from] LabelError),
}

/// How `ShopTable.SHOPNAME` is reconciled against the product table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShopAlignment {
    /// Require a `SHOPNAME` key column whose values match the distinct
    /// product shop names exactly; fail loudly on any mismatch.
    #[default]
    Keyed,
    /// Compatibility mode: overwrite `SHOPNAME` with the first-occurrence
    /// ordered distinct product shop names, truncating or padding with null
    /// to the shop row count.
    Positional,
}

/// The two labeled tables. Immutable after load; views filter copies.
#[derive(Debug, Clone)]
pub struct LabeledTables {
    pub products: DataFrame,
    pub shops: DataFrame,
}

/// Load both CSV tables, validate their schemas, reconcile the shop-identity
/// column and backfill the two human-readable label columns.
pub fn load_and_label(
    product_path: &Path,
    shop_path: &Path,
    alignment: ShopAlignment,
) -> Result<LabeledTables, DataLoadError> {
    labels::validate_label_tables()?;

    let products = read_csv(product_path)?;
    let shops = read_csv(shop_path)?;

    validate_products(&products)?;
    validate_shops(&shops, alignment)?;

    let shops = align_shop_names(&products, &shops, alignment)?;

    let products = labels::apply_segment_labels(&products)?;
    let shops = labels::apply_shop_size_labels(&shops)?;

    // The display projections must be satisfiable once labeling has run.
    require_columns(&products, "product", &PRODUCT_DISPLAY_COLUMNS)?;
    require_columns(&shops, "shop", &shop_display_columns())?;

    log::info!(
        "loaded {} products and {} shops",
        products.height(),
        shops.height()
    );

    Ok(LabeledTables { products, shops })
}

fn read_csv(path: &Path) -> Result<DataFrame, DataLoadError> {
    let to_err = |source| DataLoadError::Csv {
        path: path.display().to_string(),
        source,
    };

    LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .finish()
        .map_err(to_err)?
        .collect()
        .map_err(to_err)
}

fn validate_products(products: &DataFrame) -> Result<(), DataLoadError> {
    require_columns(products, "product", &PRODUCT_REQUIRED_COLUMNS)?;
    if !has_column(products, SEGMENT_COL) && !has_column(products, CLUSTER_COL) {
        return Err(DataLoadError::MissingLabelSource {
            table: "product",
            label: SEGMENT_COL,
            code: CLUSTER_COL,
        });
    }
    Ok(())
}

fn validate_shops(shops: &DataFrame, alignment: ShopAlignment) -> Result<(), DataLoadError> {
    require_columns(shops, "shop", &[SHOPSIZE_COL])?;
    require_columns(shops, "shop", &SHOP_BRAND_COLUMNS)?;
    if alignment == ShopAlignment::Keyed {
        require_columns(shops, "shop", &[SHOPNAME_COL])?;
    }
    if !has_column(shops, SHOP_SIZE_PRED_COL) && !has_column(shops, SHOP_SIZE_ENC_COL) {
        return Err(DataLoadError::MissingLabelSource {
            table: "shop",
            label: SHOP_SIZE_PRED_COL,
            code: SHOP_SIZE_ENC_COL,
        });
    }
    Ok(())
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

fn require_columns(
    df: &DataFrame,
    table: &'static str,
    columns: &[&str],
) -> Result<(), DataLoadError> {
    for column in columns {
        if !has_column(df, column) {
            return Err(DataLoadError::MissingColumn {
                table,
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}

/// Distinct `SHOPNAME` values of the product table in first-occurrence order.
pub fn distinct_shop_names(products: &DataFrame) -> Result<Vec<String>, DataLoadError> {
    let names = products.column(SHOPNAME_COL)?.cast(&DataType::String)?;
    let names = names.str()?;

    let mut seen: HashSet<&str> = HashSet::new();
    let mut ordered = Vec::new();
    for name in names.into_iter().flatten() {
        if seen.insert(name) {
            ordered.push(name.to_string());
        }
    }
    Ok(ordered)
}

fn align_shop_names(
    products: &DataFrame,
    shops: &DataFrame,
    alignment: ShopAlignment,
) -> Result<DataFrame, DataLoadError> {
    let product_names = distinct_shop_names(products)?;

    match alignment {
        ShopAlignment::Keyed => {
            if shops.height() != product_names.len() {
                return Err(DataLoadError::JoinMismatch(format!(
                    "product table has {} distinct shops, shop table has {} rows",
                    product_names.len(),
                    shops.height()
                )));
            }

            let shop_names = shops.column(SHOPNAME_COL)?.cast(&DataType::String)?;
            let shop_names = shop_names.str()?;
            let product_set: HashSet<&str> =
                product_names.iter().map(|n| n.as_str()).collect();

            let mut shop_set: HashSet<&str> = HashSet::new();
            for name in shop_names.into_iter() {
                let Some(name) = name else {
                    return Err(DataLoadError::JoinMismatch(
                        "shop table has a null SHOPNAME".to_string(),
                    ));
                };
                if !shop_set.insert(name) {
                    return Err(DataLoadError::JoinMismatch(format!(
                        "shop table repeats SHOPNAME '{name}'"
                    )));
                }
                if !product_set.contains(name) {
                    return Err(DataLoadError::JoinMismatch(format!(
                        "shop '{name}' has no products in the product table"
                    )));
                }
            }

            Ok(shops.clone())
        }
        ShopAlignment::Positional => {
            log::warn!(
                "positional shop-name alignment is enabled; shop identities \
                 depend on row order matching the product table"
            );
            let values: Vec<Option<&str>> = (0..shops.height())
                .map(|i| product_names.get(i).map(|n| n.as_str()))
                .collect();

            let mut aligned = shops.clone();
            aligned.with_column(Column::new(SHOPNAME_COL.into(), values))?;
            Ok(aligned)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use std::path::PathBuf;

    fn shop_csv_header() -> String {
        let mut header = format!("{SHOPNAME_COL},{SHOPSIZE_COL},{SHOP_SIZE_ENC_COL}");
        for brand in SHOP_BRAND_COLUMNS {
            header.push(',');
            header.push_str(brand);
        }
        header
    }

    fn shop_csv_row(name: &str, size: &str, code: i64) -> String {
        let mut row = format!("{name},{size},{code}");
        for _ in SHOP_BRAND_COLUMNS {
            row.push_str(",0");
        }
        row
    }

    const PRODUCT_CSV: &str = "\
PRODUCT,SHOPNAME,BRAND,MODEL,PRICE,RAM,ROM,SALES,cluster_label
P1,Alpha,SAMSUNG,A1,1000,8,128,10,2
P2,Beta,XIAOMI,X1,200,4,64,5,0
P3,Alpha,XIAOMI,X2,300,6,64,7,1
";

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn write_shop_csv(name: &str, rows: &[(&str, &str, i64)]) -> PathBuf {
        let mut contents = shop_csv_header();
        contents.push('\n');
        for (shop, size, code) in rows {
            contents.push_str(&shop_csv_row(shop, size, *code));
            contents.push('\n');
        }
        write_temp(name, &contents)
    }

    #[test]
    fn loads_and_labels_both_tables() {
        let products = write_temp("segdash_products_ok.csv", PRODUCT_CSV);
        let shops = write_shop_csv(
            "segdash_shops_ok.csv",
            &[("Alpha", "BIG", 0), ("Beta", "TINY", 2)],
        );

        let tables = load_and_label(&products, &shops, ShopAlignment::Keyed).unwrap();
        assert_eq!(tables.products.height(), 3);
        assert_eq!(tables.shops.height(), 2);
        assert!(has_column(&tables.products, SEGMENT_COL));
        assert!(has_column(&tables.shops, SHOP_SIZE_PRED_COL));
    }

    #[test]
    fn missing_required_column_is_a_load_error() {
        let products = write_temp(
            "segdash_products_nocol.csv",
            "PRODUCT,SHOPNAME,BRAND,MODEL,PRICE,RAM,ROM\nP1,Alpha,SAMSUNG,A1,1000,8,128\n",
        );
        let shops = write_shop_csv("segdash_shops_nocol.csv", &[("Alpha", "BIG", 0)]);

        let err = load_and_label(&products, &shops, ShopAlignment::Keyed).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::MissingColumn { table: "product", .. }
        ));
    }

    #[test]
    fn error_chain_keeps_both_path_and_cause() {
        let missing = std::env::temp_dir().join("segdash_chain_missing.csv");
        let shops = write_shop_csv("segdash_shops_chain.csv", &[("Alpha", "BIG", 0)]);

        let err = load_and_label(&missing, &shops, ShopAlignment::Keyed).unwrap_err();
        // The GUI status line renders the alternate (chained) format.
        let rendered = format!("{:#}", anyhow::Error::new(err));
        assert!(rendered.contains("Failed to load CSV"));
        assert!(rendered.contains("segdash_chain_missing.csv"));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let missing = std::env::temp_dir().join("segdash_does_not_exist.csv");
        let shops = write_shop_csv("segdash_shops_unused.csv", &[("Alpha", "BIG", 0)]);

        let err = load_and_label(&missing, &shops, ShopAlignment::Keyed).unwrap_err();
        assert!(matches!(err, DataLoadError::Csv { .. }));
    }

    #[test]
    fn keyed_alignment_rejects_unknown_shop() {
        let products = write_temp("segdash_products_keyed.csv", PRODUCT_CSV);
        let shops = write_shop_csv(
            "segdash_shops_unknown.csv",
            &[("Alpha", "BIG", 0), ("Gamma", "TINY", 1)],
        );

        let err = load_and_label(&products, &shops, ShopAlignment::Keyed).unwrap_err();
        assert!(matches!(err, DataLoadError::JoinMismatch(_)));
    }

    #[test]
    fn keyed_alignment_rejects_row_count_mismatch() {
        let products = write_temp("segdash_products_count.csv", PRODUCT_CSV);
        let shops = write_shop_csv("segdash_shops_short.csv", &[("Alpha", "BIG", 0)]);

        let err = load_and_label(&products, &shops, ShopAlignment::Keyed).unwrap_err();
        assert!(matches!(err, DataLoadError::JoinMismatch(_)));
    }

    #[test]
    fn positional_alignment_overwrites_names_in_first_occurrence_order() {
        let products = write_temp("segdash_products_pos.csv", PRODUCT_CSV);
        // Names that match nothing in the product table; positional mode
        // overwrites them regardless.
        let shops = write_shop_csv(
            "segdash_shops_pos.csv",
            &[("Old1", "BIG", 0), ("Old2", "TINY", 1)],
        );

        let tables = load_and_label(&products, &shops, ShopAlignment::Positional).unwrap();
        let names = distinct_shop_names(&tables.shops).unwrap();
        assert_eq!(names, vec!["Alpha".to_string(), "Beta".to_string()]);
    }

    #[test]
    fn distinct_names_preserve_first_occurrence_order() {
        let df = df![
            SHOPNAME_COL => ["B", "A", "B", "C", "A"],
        ]
        .unwrap();
        let names = distinct_shop_names(&df).unwrap();
        assert_eq!(names, vec!["B".to_string(), "A".to_string(), "C".to_string()]);
    }
}
