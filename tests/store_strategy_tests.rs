//! The relational-store strategy must be indistinguishable from the in-memory one.

mod test_data_gen;

use skucross_core::columns::default_allowed_columns;
use skucross_core::config::{JobConfig, StrategyKind};
use skucross_core::hash::hash_batch;
use skucross_core::types::{RowBatch, Scalar};
use skucross_operators::CrossJoinProjector;
use test_data_gen::{s, shops, skus};

fn projector(strategy: StrategyKind) -> CrossJoinProjector {
    CrossJoinProjector::new(default_allowed_columns()).with_strategy(strategy)
}

#[test]
fn strategies_agree_on_generated_data() {
    let shop = shops(9);
    let sku = skus(11);
    let memory = projector(StrategyKind::InMemory).project(&shop, &sku).unwrap();
    let store = projector(StrategyKind::RelationalStore)
        .project(&shop, &sku)
        .unwrap();

    assert_eq!(memory.strategy, StrategyKind::InMemory);
    assert_eq!(store.strategy, StrategyKind::RelationalStore);
    assert_eq!(memory.batch, store.batch);
    assert_eq!(memory.missing_columns, store.missing_columns);
    assert_eq!(hash_batch(&memory.batch), hash_batch(&store.batch));
}

#[test]
fn strategies_agree_with_text_keys_and_duplicates() {
    let shop = RowBatch::from_rows(
        &["Shop_Id", "Perfect_Store_Threshold"],
        vec![
            vec![s("S-10"), Scalar::F64(0.8)],
            vec![s("S-02"), Scalar::Null],
            vec![s("S-10"), Scalar::I64(1)],
            vec![Scalar::I64(7), Scalar::Bool(false)],
        ],
    )
    .unwrap();
    let sku = skus(4);

    let memory = projector(StrategyKind::InMemory).project(&shop, &sku).unwrap();
    let store = projector(StrategyKind::RelationalStore)
        .project(&shop, &sku)
        .unwrap();
    assert_eq!(memory.batch, store.batch);
    assert_eq!(memory.batch.columns[0].values[0], Scalar::I64(7));
}

fn is_nan(v: &Scalar) -> bool {
    matches!(v, Scalar::F64(f) if f.is_nan())
}

#[test]
fn strategies_agree_on_nan_values() {
    let shop = RowBatch::from_rows(
        &["Shop_Id"],
        vec![vec![Scalar::F64(f64::NAN)], vec![Scalar::F64(1.0)]],
    )
    .unwrap();
    let sku = RowBatch::from_rows(&["SOS"], vec![vec![Scalar::F64(f64::NAN)]]).unwrap();
    let allowed = vec!["Shop_Id".to_string(), "SOS".to_string()];

    let memory = CrossJoinProjector::new(allowed.clone())
        .project(&shop, &sku)
        .unwrap();
    let store = CrossJoinProjector::new(allowed)
        .with_strategy(StrategyKind::RelationalStore)
        .project(&shop, &sku)
        .unwrap();

    // NaN != NaN, so compare digests and spot-check values.
    assert_eq!(hash_batch(&memory.batch), hash_batch(&store.batch));
    for batch in [&memory.batch, &store.batch] {
        assert!(is_nan(&batch.columns[0].values[0]));
        assert_eq!(batch.columns[0].values[1], Scalar::F64(1.0));
        assert!(batch.columns[1].values.iter().all(is_nan));
    }
}

#[test]
fn strategies_agree_on_keys_beyond_float_precision() {
    let big = 1i64 << 53;
    let shop = RowBatch::from_rows(
        &["Shop_Id"],
        vec![
            vec![Scalar::I64(big + 1)],
            vec![Scalar::F64(big as f64)],
            vec![Scalar::I64(big)],
        ],
    )
    .unwrap();
    let sku = RowBatch::from_rows(&["SKU_Name"], vec![vec![s("A")]]).unwrap();

    let memory = projector(StrategyKind::InMemory).project(&shop, &sku).unwrap();
    let store = projector(StrategyKind::RelationalStore)
        .project(&shop, &sku)
        .unwrap();
    assert_eq!(memory.batch, store.batch);
    assert_eq!(
        memory.batch.columns[0].values,
        vec![
            Scalar::F64(big as f64),
            Scalar::I64(big),
            Scalar::I64(big + 1),
        ]
    );
}

#[test]
fn auto_uses_store_above_threshold() {
    let shop = shops(4);
    let sku = skus(4);

    let small = projector(StrategyKind::Auto)
        .with_store_threshold(u64::MAX)
        .project(&shop, &sku)
        .unwrap();
    assert_eq!(small.strategy, StrategyKind::InMemory);

    let large = projector(StrategyKind::Auto)
        .with_store_threshold(1)
        .project(&shop, &sku)
        .unwrap();
    assert_eq!(large.strategy, StrategyKind::RelationalStore);
    assert_eq!(small.batch, large.batch);
}

#[test]
fn file_backed_store_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = JobConfig {
        strategy: StrategyKind::RelationalStore,
        store_dir: Some(dir.path().to_string_lossy().into_owned()),
        ..Default::default()
    };
    let out = CrossJoinProjector::from_config(&cfg)
        .project(&shops(3), &skus(3))
        .unwrap();
    assert_eq!(out.batch.num_rows(), 9);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    let out = projector(StrategyKind::RelationalStore)
        .with_store_dir(dir.path())
        .project(&shops(2), &skus(5))
        .unwrap();
    assert_eq!(out.batch.num_rows(), 10);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
