//! Display labels for chart legends and axes.
//!
//! All lookups are fixed tables; a key without an entry is returned as-is.

/// `CompleteType` → (short label, long label).
const SAMPLE_TYPE_LABELS: &[(&str, &str, &str)] = &[
    ("r_BitSetScoring1SampleReducer_1__f_f_0", "Field (Scoring)", "Field (Scoring, $t=1$)"),
    ("r_BitSetScoring1SampleReducer_2__f_f_0", "Field (Scoring)", "Field (Scoring, $t=2$)"),
    ("r_BitSetCounterSampleReducer_1__f_f_0", "Field (Set-Cover)", "Field (Set-Cover, $t=1$)"),
    ("r_BitSetCounterSampleReducer_2__f_f_0", "Field (Set-Cover)", "Field (Set-Cover, $t=2$)"),
    ("r_RandomSampleReducer_1__f_f_0", "Field (Random)", "Field (Random, $t=1$)"),
    ("r_RandomSampleReducer_2__f_f_0", "Field (Random)", "Field (Random, $t=2$)"),
    ("t_yasa_1__<NA>", "YASA", "YASA ($t=1$)"),
    ("t_yasa_2__<NA>", "YASA", "YASA ($t=2$)"),
    ("r_BitSetScoring1SampleReducer_1__c_c_1", "Combined (Scoring)", "Combined (Scoring, $t=1$)"),
    ("r_BitSetScoring1SampleReducer_2__c_c_2", "Combined (Scoring)", "Combined (Scoring, $t=2$)"),
    ("r_BitSetCounterSampleReducer_1__c_c_1", "Combined (Set-Cover)", "Combined (Set-Cover, $t=1$)"),
    ("r_BitSetCounterSampleReducer_2__c_c_2", "Combined (Set-Cover)", "Combined (Set-Cover, $t=2$)"),
    ("r_RandomSampleReducer_1__c_c_1", "Combined (Random)", "Combined (Random, $t=1$)"),
    ("r_RandomSampleReducer_2__c_c_2", "Combined (Random)", "Combined (Random, $t=2$)"),
];

/// Short labels shown in the sample-type charts, in legend order.
pub const MAIN_SAMPLE_TYPES: [&str; 7] = [
    "Field (Scoring)",
    "Field (Set-Cover)",
    "Field (Random)",
    "YASA",
    "Combined (Scoring)",
    "Combined (Set-Cover)",
    "Combined (Random)",
];

const METRIC_LABELS: &[(&str, &str)] = &[
    ("f_1", "$1$-Wise Fieldcoverage"),
    ("f_2", "$2$-Wise Fieldcoverage"),
    ("t_1", "$1$-Wise-Coverage"),
    ("t_2", "$2$-Wise-Coverage"),
];

/// Reducer class name → short algorithm name, in legend order.
pub const REDUCERS: [(&str, &str); 3] = [
    ("BitSetScoring1SampleReducer", "Scoring"),
    ("BitSetCounterSampleReducer", "Set-Cover"),
    ("RandomSampleReducer", "Random"),
];

fn lookup<'a>(table: &'a [(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

pub fn sample_type_short(complete_type: &str) -> String {
    SAMPLE_TYPE_LABELS
        .iter()
        .find(|(k, _, _)| *k == complete_type)
        .map(|(_, short, _)| short.to_string())
        .unwrap_or_else(|| complete_type.to_string())
}

pub fn sample_type_long(complete_type: &str) -> String {
    SAMPLE_TYPE_LABELS
        .iter()
        .find(|(k, _, _)| *k == complete_type)
        .map(|(_, _, long)| long.to_string())
        .unwrap_or_else(|| complete_type.to_string())
}

/// Position of `complete_type` in the sample-type table, used to order
/// summaries like the legends.
pub fn sample_type_rank(complete_type: &str) -> Option<usize> {
    SAMPLE_TYPE_LABELS.iter().position(|(k, _, _)| *k == complete_type)
}

pub fn metric_label(metric: &str) -> String {
    lookup(METRIC_LABELS, metric)
        .map(str::to_string)
        .unwrap_or_else(|| metric.to_string())
}

pub fn t_label(t: i32) -> String {
    match t {
        1 | 2 => format!("$t = {t}$"),
        other => other.to_string(),
    }
}

pub fn reducer_label(algorithm: &str) -> String {
    lookup(&REDUCERS, algorithm)
        .map(str::to_string)
        .unwrap_or_else(|| algorithm.to_string())
}

pub fn is_reducer(algorithm: &str) -> bool {
    REDUCERS.iter().any(|(k, _)| *k == algorithm)
}

/// Formats `value` with `precision` decimals and `,` thousands separators.
pub fn format_number(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let text = format!("{:.*}", precision, value.abs());
    let (int, frac) = match text.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + int.len() / 3 + 1);
    if value < 0.0 && text.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}
