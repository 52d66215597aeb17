use crate::config::{SurveyConfig, UnmappedPolicy, VariableConfig};
use crate::model::{PipelineError, SurveyResponse, Table};
use crate::normalizer::find_column_containing;
use std::collections::HashMap;
use tracing::{info, warn};

/// Responses that passed quality control, ready for export.
#[derive(Debug, Clone)]
pub struct CleanedSurvey {
    pub columns: Vec<String>,
    pub responses: Vec<SurveyResponse>,
    pub dropped: usize,
}

impl CleanedSurvey {
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.responses
            .iter()
            .map(|r| r.values.iter().map(|v| format_value(*v)).collect())
            .collect()
    }
}

struct BoundVariable<'a> {
    config: &'a VariableConfig,
    column: usize,
}

/// Maps every located variable to numbers and keeps the rows passing the attention check.
pub fn clean_survey(table: &Table, cfg: &SurveyConfig) -> Result<CleanedSurvey, PipelineError> {
    let variables: Vec<BoundVariable> = cfg
        .variables
        .iter()
        .filter_map(|var| match find_column_containing(&table.headers, &var.keyword) {
            Some(column) => Some(BoundVariable { config: var, column }),
            None => {
                warn!(
                    "{}: {}, variable omitted",
                    var.name,
                    PipelineError::SchemaMismatch(var.keyword.clone())
                );
                None
            }
        })
        .collect();

    let check_col = find_column_containing(&table.headers, &cfg.attention_check.keyword);
    if check_col.is_none() {
        warn!(
            "{}, quality control skipped",
            PipelineError::SchemaMismatch(cfg.attention_check.keyword.clone())
        );
    }

    let responses: Vec<SurveyResponse> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| SurveyResponse {
            values: variables
                .iter()
                .map(|var| {
                    map_value(
                        table.cell(i, var.column),
                        cfg.value_map(var.config.mapping),
                        var.config.unmapped,
                    )
                })
                .collect(),
            passed_check: check_col.is_none_or(|col| {
                row.get(col)
                    .is_some_and(|text| text.contains(cfg.attention_check.required.as_str()))
            }),
        })
        .collect();

    let total = responses.len();
    let responses: Vec<SurveyResponse> = responses.into_iter().filter(|r| r.passed_check).collect();
    let dropped = total - responses.len();
    if dropped > 0 {
        info!("[QC] Removed {} failed attention checks.", dropped);
    }

    if responses.is_empty() || variables.is_empty() {
        return Err(PipelineError::EmptyResult("survey"));
    }

    Ok(CleanedSurvey {
        columns: variables.iter().map(|v| v.config.name.clone()).collect(),
        responses,
        dropped,
    })
}

/// Looks the trimmed value up in `map`; unknown values follow `policy`.
/// Values that are not numbers become missing.
pub fn map_value(raw: Option<&str>, map: &HashMap<String, i64>, policy: UnmappedPolicy) -> Option<f64> {
    let mapped = raw.and_then(|value| map.get(value.trim())).map(|&code| code as f64);
    if mapped.is_some() {
        return mapped;
    }
    match policy {
        UnmappedPolicy::Zero => Some(0.0),
        UnmappedPolicy::Passthrough => raw
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|v| !v.is_nan()),
    }
}

fn format_value(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValueMapping;

    fn survey(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn config() -> SurveyConfig {
        let mut cfg = SurveyConfig::default();
        cfg.variables = vec![
            VariableConfig {
                keyword: "您的性别".into(),
                name: "Gender".into(),
                mapping: ValueMapping::Gender,
                unmapped: UnmappedPolicy::Zero,
            },
            VariableConfig {
                keyword: "关注社交媒体".into(),
                name: "Anx_Face_1".into(),
                mapping: ValueMapping::Likert,
                unmapped: UnmappedPolicy::Passthrough,
            },
            VariableConfig {
                keyword: "速成".into(),
                name: "Hist_Know_3".into(),
                mapping: ValueMapping::Likert,
                unmapped: UnmappedPolicy::Passthrough,
            },
        ];
        cfg
    }

    const HEADERS: &[&str] = &["1.您的性别", "5.我经常关注社交媒体上的容貌话题", "6.我不是机器人，请选比较符合"];

    #[test]
    fn attention_check_filters_rows() {
        let t = survey(
            HEADERS,
            &[
                &["A.男", "比较符合", "比较符合"],
                &["B.女", " 完全符合 ", "一般"],
                &["女", "3", "B.比较符合"],
            ],
        );
        let cleaned = clean_survey(&t, &config()).unwrap();

        assert_eq!(cleaned.columns, vec!["Gender", "Anx_Face_1"]);
        assert_eq!(cleaned.dropped, 1);
        assert_eq!(cleaned.rows(), vec![vec!["1", "4"], vec!["2", "3"]]);
    }

    #[test]
    fn unmapped_values_follow_policy() {
        let t = survey(HEADERS, &[&["未知", "非常焦虑", "比较符合"], &["", "", "比较符合"]]);
        let cleaned = clean_survey(&t, &config()).unwrap();
        assert_eq!(cleaned.responses[0].values, vec![Some(0.0), None]);
        assert_eq!(cleaned.responses[1].values, vec![Some(0.0), None]);
        assert_eq!(cleaned.rows()[0], vec!["0", ""]);
    }

    #[test]
    fn numeric_passthrough() {
        let map = SurveyConfig::default().likert_map;
        assert_eq!(map_value(Some("4.5"), &map, UnmappedPolicy::Passthrough), Some(4.5));
        assert_eq!(map_value(Some("NaN"), &map, UnmappedPolicy::Passthrough), None);
        assert_eq!(map_value(Some(" 5 "), &map, UnmappedPolicy::Passthrough), Some(5.0));
        assert_eq!(format_value(Some(4.5)), "4.5");
    }

    #[test]
    fn no_passing_rows_is_an_error() {
        let t = survey(HEADERS, &[&["A.男", "一般", "完全不符合"]]);
        assert!(matches!(
            clean_survey(&t, &config()),
            Err(PipelineError::EmptyResult(_))
        ));
    }

    #[test]
    fn missing_check_column_keeps_every_row() {
        let t = survey(&["1.您的性别"], &[&["男"], &["女"]]);
        let cleaned = clean_survey(&t, &config()).unwrap();
        assert_eq!(cleaned.dropped, 0);
        assert_eq!(cleaned.rows(), vec![vec!["1"], vec!["2"]]);
    }
}
