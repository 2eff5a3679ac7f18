//! Output column constants.
//!
//! The allow-list mirrors the column list of the BigQuery query being
//! reproduced; its order is the output order.

/// Key column that must be present in the shop dataset.
pub const SHOP_ID: &str = "Shop_Id";

/// Deterministic name of the downloadable spreadsheet.
pub const OUTPUT_FILE_NAME: &str = "Output_Shop_SKU.xlsx";

pub const DEFAULT_ALLOWED_COLUMNS: [&str; 18] = [
    "Shop_Id",
    "Perfect_Store_Threshold",
    "Category_Heading",
    "Category_Name",
    "Shelf_Section",
    "Group_name",
    "SKU_Name",
    "NPD_Flag",
    "Regular_OSA",
    "SOS",
    "Core_Flag",
    "Ideal_OSA",
    "Overall_Ideal_OSA",
    "Ideal_SOS",
    "Overall_Ideal_SOS",
    "Ideal_OSA_NPD",
    "Overall_Ideal_OSA_NPD",
    "Shelf_Section_Image_Links",
];

/// Owned copy of the default allow-list.
pub fn default_allowed_columns() -> Vec<String> {
    DEFAULT_ALLOWED_COLUMNS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_column_leads_the_allow_list() {
        assert_eq!(DEFAULT_ALLOWED_COLUMNS[0], SHOP_ID);
        assert_eq!(default_allowed_columns().len(), 18);
    }
}
