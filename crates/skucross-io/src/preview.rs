//! Plain-text preview of the first rows of a dataset.

use std::fmt::Write as _;

use skucross_core::types::RowBatch;

/// Render up to `limit` rows as an aligned text table, followed by a row count.
pub fn render_preview(batch: &RowBatch, limit: usize) -> String {
    let shown = batch.num_rows().min(limit);
    let cells: Vec<Vec<String>> = batch
        .columns
        .iter()
        .map(|c| c.values[..shown].iter().map(|v| v.to_string()).collect())
        .collect();

    let widths: Vec<usize> = batch
        .columns
        .iter()
        .zip(&cells)
        .map(|(col, values)| {
            values
                .iter()
                .map(|v| v.chars().count())
                .chain(std::iter::once(col.name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = batch
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(&c.name, *w))
        .collect();
    let _ = writeln!(out, "{}", header.join(" | ").trim_end());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));

    for r in 0..shown {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(values, w)| pad(&values[r], *w))
            .collect();
        let _ = writeln!(out, "{}", line.join(" | ").trim_end());
    }

    let _ = write!(out, "({} of {} rows shown)", shown, batch.num_rows());
    out
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    let mut padded = String::with_capacity(width);
    padded.push_str(s);
    padded.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use skucross_core::types::{Column, Scalar};

    #[test]
    fn renders_limited_rows() {
        let batch = RowBatch::new(vec![
            Column::new("Shop_Id", vec![Scalar::I64(1), Scalar::I64(1), Scalar::I64(2)]),
            Column::new(
                "SKU_Name",
                vec![
                    Scalar::Str("A".into()),
                    Scalar::Str("Bottle".into()),
                    Scalar::Str("A".into()),
                ],
            ),
        ])
        .unwrap();
        let text = render_preview(&batch, 2);
        let expected = "\
Shop_Id | SKU_Name
--------+---------
1       | A
1       | Bottle
(2 of 3 rows shown)";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_dataset_still_has_header() {
        let batch = RowBatch::new(vec![Column::new("Shop_Id", vec![])]).unwrap();
        assert_eq!(
            render_preview(&batch, 10),
            "Shop_Id\n-------\n(0 of 0 rows shown)"
        );
    }
}
