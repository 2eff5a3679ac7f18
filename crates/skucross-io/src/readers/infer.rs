//! Per-column type inference for text cells.

use skucross_core::types::{Column, Scalar};

/// Cell texts read as null.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_na(cell: &str) -> bool {
    NA_VALUES.contains(&cell)
}

/// Build a typed column from raw cell texts.
///
/// The whole column gets one type: integers if every non-null cell parses as
/// `i64`, else floats if every cell is a finite `f64`, else booleans if every
/// cell is `true`/`false` in any case. Otherwise cells stay strings verbatim.
pub fn infer_column(name: String, raw: Vec<String>) -> Column {
    let present = || raw.iter().filter(|c| !is_na(c));

    let values = if present().all(|c| c.trim().parse::<i64>().is_ok()) {
        convert(&raw, |c| c.trim().parse::<i64>().ok().map(Scalar::I64))
    } else if present().all(|c| parse_finite(c).is_some()) {
        convert(&raw, |c| parse_finite(c).map(Scalar::F64))
    } else if present().all(|c| parse_bool(c).is_some()) {
        convert(&raw, |c| parse_bool(c).map(Scalar::Bool))
    } else {
        convert(&raw, |c| Some(Scalar::Str(c.to_string())))
    };

    Column::new(name, values)
}

fn convert<F>(raw: &[String], f: F) -> Vec<Scalar>
where
    F: Fn(&str) -> Option<Scalar>,
{
    raw.iter()
        .map(|c| {
            if is_na(c) {
                Scalar::Null
            } else {
                f(c).unwrap_or(Scalar::Null)
            }
        })
        .collect()
}

fn parse_finite(c: &str) -> Option<f64> {
    c.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

fn parse_bool(c: &str) -> Option<bool> {
    let c = c.trim();
    if c.eq_ignore_ascii_case("true") {
        Some(true)
    } else if c.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn integers_with_gaps() {
        let col = infer_column("Shop_Id".into(), cells(&["3", "", "007", "NA"]));
        assert_eq!(
            col.values,
            vec![Scalar::I64(3), Scalar::Null, Scalar::I64(7), Scalar::Null]
        );
    }

    #[test]
    fn floats_widen_integers() {
        let col = infer_column("SOS".into(), cells(&["1", "0.5"]));
        assert_eq!(col.values, vec![Scalar::F64(1.0), Scalar::F64(0.5)]);
    }

    #[test]
    fn infinity_stays_text() {
        let col = infer_column("x".into(), cells(&["1.5", "inf"]));
        assert_eq!(
            col.values,
            vec![Scalar::Str("1.5".into()), Scalar::Str("inf".into())]
        );
    }

    #[test]
    fn booleans_any_case() {
        let col = infer_column("Core_Flag".into(), cells(&["TRUE", "false", "True"]));
        assert_eq!(
            col.values,
            vec![Scalar::Bool(true), Scalar::Bool(false), Scalar::Bool(true)]
        );
    }

    #[test]
    fn mixed_text_is_verbatim() {
        let col = infer_column("SKU_Name".into(), cells(&["12", " Cola 1L ", "null"]));
        assert_eq!(
            col.values,
            vec![
                Scalar::Str("12".into()),
                Scalar::Str(" Cola 1L ".into()),
                Scalar::Null
            ]
        );
    }

    #[test]
    fn all_missing_is_null() {
        let col = infer_column("x".into(), cells(&["", "nan"]));
        assert_eq!(col.values, vec![Scalar::Null, Scalar::Null]);
    }
}
