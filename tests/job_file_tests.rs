//! Job file (YAML) parsing and config layering.

use skucross_core::config::{JobConfig, JobFile, StrategyKind};
use skucross_core::columns::DEFAULT_ALLOWED_COLUMNS;

#[test]
fn test_parse_full_job_file() {
    let yaml = r#"
key_column: Shop_Id
allowed_columns:
  - Shop_Id
  - SKU_Name
  - SOS
output_file_name: shops_by_sku.xlsx
preview_rows: 25
strategy: relational_store
store_threshold_bytes: 1048576
store_dir: /tmp/skucross
"#;

    let file = JobFile::from_yaml_str(yaml).unwrap();
    let mut cfg = JobConfig::default();
    cfg.apply_file(&file);

    assert_eq!(cfg.allowed_columns, vec!["Shop_Id", "SKU_Name", "SOS"]);
    assert_eq!(cfg.output_file_name, "shops_by_sku.xlsx");
    assert_eq!(cfg.preview_rows, 25);
    assert_eq!(cfg.strategy, StrategyKind::RelationalStore);
    assert_eq!(cfg.store_threshold_bytes, 1_048_576);
    assert_eq!(cfg.store_dir.as_deref(), Some("/tmp/skucross"));
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_partial_job_file_keeps_defaults() {
    let file = JobFile::from_yaml_str("strategy: auto\n").unwrap();
    let mut cfg = JobConfig::default();
    cfg.apply_file(&file);

    assert_eq!(cfg.strategy, StrategyKind::Auto);
    assert_eq!(cfg.key_column, "Shop_Id");
    assert_eq!(cfg.allowed_columns.len(), DEFAULT_ALLOWED_COLUMNS.len());
    assert_eq!(cfg.preview_rows, 10);
}

#[test]
fn test_unknown_keys_are_rejected() {
    assert!(JobFile::from_yaml_str("memory_cap: 10\n").is_err());
    assert!(JobFile::from_yaml_str("strategy: parquet\n").is_err());
}

#[test]
fn test_env_then_file() {
    let cfg_env = JobConfig::from_lookup(|key| match key {
        "SKUCROSS_STRATEGY" => Some("sqlite".into()),
        "SKUCROSS_PREVIEW_ROWS" => Some("4".into()),
        _ => None,
    });
    assert_eq!(cfg_env.strategy, StrategyKind::RelationalStore);

    let mut cfg = cfg_env.clone();
    cfg.apply_file(&JobFile::from_yaml_str("preview_rows: 7\n").unwrap());
    assert_eq!(cfg.preview_rows, 7);
    assert_eq!(cfg.strategy, StrategyKind::RelationalStore);
}
