//! Host-supplied survey metadata.
//!
//! These structures mirror what the survey host provides: question and
//! answer metadata, locale display text for fixed code sets, and the global
//! export settings. They are deserialized once and consulted read-only by
//! the fieldmap builder.

use serde::{Deserialize, Serialize};

/// Decimal separator used when responses were entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalSeparator {
    #[default]
    Point,
    Comma,
}

/// Global settings the deployment controls.
///
/// The yes/no code values are configurable so deployments can remap them
/// (e.g. yes=2/no=1 instead of the default yes=1/no=0).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub decimal_separator: DecimalSeparator,
    pub yes_code: i64,
    pub no_code: i64,
    pub locale: LocaleText,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            decimal_separator: DecimalSeparator::Point,
            yes_code: 1,
            no_code: 0,
            locale: LocaleText::default(),
        }
    }
}

/// Locale-supplied display text for the synthesized fixed-code label sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleText {
    pub female: String,
    pub male: String,
    pub yes: String,
    pub no: String,
    pub uncertain: String,
    pub increase: String,
    pub same: String,
    pub decrease: String,
    pub not_selected: String,
}

impl Default for LocaleText {
    fn default() -> Self {
        Self {
            female: "Female".to_string(),
            male: "Male".to_string(),
            yes: "Yes".to_string(),
            no: "No".to_string(),
            uncertain: "Uncertain".to_string(),
            increase: "Increase".to_string(),
            same: "Same".to_string(),
            decrease: "Decrease".to_string(),
            not_selected: "Not selected".to_string(),
        }
    }
}

/// One answer option of a question, on one scale axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOption {
    pub code: String,
    pub text: String,
    #[serde(default)]
    pub scale_id: u32,
}

/// One sub-question (array row, multi-select option).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubquestionDefinition {
    pub code: String,
    pub text: String,
    #[serde(default)]
    pub scale_id: u32,
}

/// One question as the host describes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub id: u32,
    /// Question code, the base of derived column keys.
    pub code: String,
    /// Declared one-letter question type.
    pub type_code: String,
    /// Base question text.
    pub text: String,
    /// Whether the question carries a free-text "other" slot.
    #[serde(default)]
    pub other: bool,
    #[serde(default)]
    pub subquestions: Vec<SubquestionDefinition>,
    #[serde(default)]
    pub answers: Vec<AnswerOption>,
    /// Optional display headings for multi-scale questions, indexed by
    /// scale id. Used as the bracketed scale qualifier in variable labels.
    #[serde(default)]
    pub scale_headings: Vec<String>,
}

impl QuestionDefinition {
    /// Answer options restricted to one scale axis.
    pub fn answers_for_scale(&self, scale_id: u32) -> impl Iterator<Item = &AnswerOption> {
        self.answers
            .iter()
            .filter(move |answer| answer.scale_id == scale_id)
    }

    pub fn scale_heading(&self, scale_id: u32) -> Option<&str> {
        self.scale_headings
            .get(scale_id as usize)
            .map(String::as_str)
            .filter(|heading| !heading.is_empty())
    }
}

/// The survey as supplied by the host, restricted to what the exporter
/// needs: identity, title, questions, and the global settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyDefinition {
    pub survey_id: u64,
    pub title: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub settings: ExportSettings,
    #[serde(default)]
    pub questions: Vec<QuestionDefinition>,
}

impl SurveyDefinition {
    pub fn question_by_code(&self, code: &str) -> Option<&QuestionDefinition> {
        self.questions.iter().find(|question| question.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults() {
        let settings = ExportSettings::default();
        assert_eq!(settings.decimal_separator, DecimalSeparator::Point);
        assert_eq!(settings.yes_code, 1);
        assert_eq!(settings.no_code, 0);
        assert_eq!(settings.locale.not_selected, "Not selected");
    }

    #[test]
    fn answers_for_scale_filters() {
        let question = QuestionDefinition {
            id: 5,
            code: "q5".to_string(),
            type_code: "1".to_string(),
            text: "Rate".to_string(),
            other: false,
            subquestions: vec![],
            answers: vec![
                AnswerOption {
                    code: "1".to_string(),
                    text: "Low".to_string(),
                    scale_id: 0,
                },
                AnswerOption {
                    code: "1".to_string(),
                    text: "Rarely".to_string(),
                    scale_id: 1,
                },
            ],
            scale_headings: vec![],
        };
        let scale1: Vec<&str> = question
            .answers_for_scale(1)
            .map(|a| a.text.as_str())
            .collect();
        assert_eq!(scale1, vec!["Rarely"]);
    }
}
