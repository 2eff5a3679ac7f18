//! Stable hashing helpers for configs, datasets and manifests.

use blake3::Hasher;
use serde::Serialize;

use crate::types::{RowBatch, Scalar};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn to_hex(&self) -> String {
        // blake3 hex(32b) is 64 hex chars
        let mut s = String::with_capacity(64);
        for b in &self.0 {
            use std::fmt::Write as _;
            let _ = write!(&mut s, "{:02x}", b);
        }
        s
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

pub fn hash_bytes(bytes: &[u8]) -> Hash256 {
    let mut h = Hasher::new();
    h.update(bytes);
    let out = h.finalize();
    Hash256(out.into())
}

/// Hash any serde-serializable value deterministically (via JSON).
pub fn hash_serde<T: Serialize>(v: &T) -> Result<Hash256, crate::error::Error> {
    let bytes = serde_json::to_vec(v).map_err(|e| crate::error::Error::Hash(e.to_string()))?;
    Ok(hash_bytes(&bytes))
}

/// Content digest of a dataset: column names, then every value column by column.
///
/// Independent of any file framing, so two runs over the same inputs can be
/// compared without diffing spreadsheet bytes.
pub fn hash_batch(batch: &RowBatch) -> Hash256 {
    let mut h = Hasher::new();
    h.update(&(batch.num_columns() as u64).to_le_bytes());
    h.update(&(batch.num_rows() as u64).to_le_bytes());
    for col in &batch.columns {
        h.update(&(col.name.len() as u64).to_le_bytes());
        h.update(col.name.as_bytes());
        for v in &col.values {
            hash_scalar(v, &mut h);
        }
    }
    Hash256(h.finalize().into())
}

fn hash_scalar(scalar: &Scalar, hasher: &mut Hasher) {
    match scalar {
        Scalar::Null => {
            hasher.update(&[0]);
        }
        Scalar::Bool(b) => {
            hasher.update(&[1, *b as u8]);
        }
        Scalar::I64(i) => {
            hasher.update(&[2]);
            hasher.update(&i.to_le_bytes());
        }
        Scalar::F64(f) => {
            hasher.update(&[3]);
            hasher.update(&f.to_bits().to_le_bytes());
        }
        Scalar::Str(s) => {
            hasher.update(&[4]);
            hasher.update(&(s.len() as u64).to_le_bytes());
            hasher.update(s.as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;

    #[test]
    fn batch_digest_tracks_values_and_order() {
        let a = RowBatch::new(vec![Column::new(
            "x",
            vec![Scalar::I64(1), Scalar::Str("1".into())],
        )])
        .unwrap();
        let b = RowBatch::new(vec![Column::new(
            "x",
            vec![Scalar::Str("1".into()), Scalar::I64(1)],
        )])
        .unwrap();
        assert_eq!(hash_batch(&a), hash_batch(&a.clone()));
        assert_ne!(hash_batch(&a), hash_batch(&b));
        assert_eq!(hash_batch(&a).to_hex().len(), 64);
    }
}
