//! Readable names for evaluation runs.

use chrono::NaiveDateTime;
use std::env;

/// `SaudiQA_<kind>[_<dataset>]_<model>_<YYYYmmdd_HHMMSS>_<context>`.
///
/// The dataset loses its `saudi-qa-` prefix and `-v1` suffix; dashes in the
/// dataset and model become underscores.
pub fn evaluation_run_name(
    kind: &str,
    dataset: Option<&str>,
    model: &str,
    now: NaiveDateTime,
    context: &str,
) -> String {
    let timestamp = now.format("%Y%m%d_%H%M%S");
    let model = model.replace('-', "_");

    match dataset {
        Some(dataset) => {
            let clean = dataset
                .replace("saudi-qa-", "")
                .replace("-v1", "")
                .replace('-', "_");
            format!("SaudiQA_{}_{}_{}_{}_{}", kind, clean, model, timestamp, context)
        }
        None => format!("SaudiQA_{}_{}_{}_{}", kind, model, timestamp, context),
    }
}

/// Who is running the evaluation: `$USER`, or `unknown`.
pub fn run_context() -> String {
    env::var("USER")
        .ok()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
