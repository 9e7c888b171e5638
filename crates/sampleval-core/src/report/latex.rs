//! LaTeX `tabular` rendering of frames.

use super::frame::export_error;
use crate::errors::Result;
use crate::labels::format_number;
use polars::prelude::*;

const FLOAT_PRECISION: usize = 2;

/// Renders `df` as a LaTeX tabular: numbers right-aligned with thousands
/// separators, floats with two decimals, text cells escaped.
pub fn to_latex(name: &str, df: &DataFrame) -> Result<String> {
    let columns = df.get_columns();
    let align: String = columns
        .iter()
        .map(|c| {
            let dtype = c.dtype();
            if dtype.is_float() || dtype.is_integer() {
                'r'
            } else {
                'l'
            }
        })
        .collect();

    let mut out = String::new();
    out.push_str(&format!("\\begin{{tabular}}{{{align}}}\n"));
    let header: Vec<String> = columns.iter().map(|c| escape(c.name().as_str())).collect();
    out.push_str(&header.join(" & "));
    out.push_str(" \\\\\n");

    for i in 0..df.height() {
        let mut cells = Vec::with_capacity(columns.len());
        for c in columns {
            let value = c.get(i).map_err(|e| export_error(name, e))?;
            cells.push(cell(&value));
        }
        out.push_str(&cells.join(" & "));
        out.push_str(" \\\\\n");
    }
    out.push_str("\\end{tabular}\n");
    Ok(out)
}

fn cell(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Boolean(b) => if *b { "True" } else { "False" }.to_string(),
        AnyValue::String(s) => escape(s),
        AnyValue::StringOwned(s) => escape(s.as_str()),
        AnyValue::Float32(v) => format_number(*v as f64, FLOAT_PRECISION),
        AnyValue::Float64(v) => format_number(*v, FLOAT_PRECISION),
        AnyValue::Int32(v) => format_number(*v as f64, 0),
        AnyValue::Int64(v) => format_number(*v as f64, 0),
        AnyValue::UInt32(v) => format_number(*v as f64, 0),
        AnyValue::UInt64(v) => format_number(*v as f64, 0),
        other => escape(&other.to_string()),
    }
}

/// Escapes the LaTeX special characters.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash "),
            '~' => out.push_str("\\textasciitilde "),
            '^' => out.push_str("\\textasciicircum "),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_latex_specials() {
        assert_eq!(escape("Field (Random, $t=1$)"), "Field (Random, \\$t=1\\$)");
        assert_eq!(escape("a_b & 50%"), "a\\_b \\& 50\\%");
        assert_eq!(escape("x^2~\\"), "x\\textasciicircum 2\\textasciitilde \\textbackslash ");
    }

    #[test]
    fn renders_tabular_with_formatted_numbers() {
        let df = df!(
            "SampleType" => ["YASA ($t=1$)", "Field (Scoring, $t=1$)"],
            "Count" => [3i64, 12000],
            "Size" => [Some(1234.5678f64), None],
        )
        .unwrap();
        let tex = to_latex("summary", &df).unwrap();
        let lines: Vec<&str> = tex.lines().collect();
        assert_eq!(lines[0], "\\begin{tabular}{lrr}");
        assert_eq!(lines[1], "SampleType & Count & Size \\\\");
        assert_eq!(lines[2], "YASA (\\$t=1\\$) & 3 & 1,234.57 \\\\");
        assert_eq!(lines[3], "Field (Scoring, \\$t=1\\$) & 12,000 &  \\\\");
        assert_eq!(lines[4], "\\end{tabular}");
    }
}
