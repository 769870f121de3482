//! Fieldmap construction: metadata normalization for the selected columns.
//!
//! Runs once over host-supplied survey metadata, before any response is
//! processed. Each selected column resolves to a [`Column`] record with its
//! semantic kind, display label, and labeling flags; columns with no
//! matching metadata are dropped with a warning, never fatally.
//!
//! Kind derivation priority:
//!
//! 1. Known system-field names (`id`, `submitdate`, `token`, ...)
//! 2. The owning question's declared type code
//!
//! The label-eligibility decision (numeric codes only, no free-text
//! companions) is made here exactly once and stored on the record; the
//! recoder and the emitter only read it back.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use svy_model::{
    Column, LabelSet, QuestionDefinition, SemanticKind, SubquestionDefinition, SurveyDefinition,
};

use crate::labels::register_label_sets;
use crate::normalization::numeric::is_numeric;

/// A selected output column as the response source names it: the stable
/// internal key plus the sanitized variable name the host derived for it.
#[derive(Debug, Clone)]
pub struct SelectedField {
    pub key: String,
    pub name: String,
}

impl SelectedField {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

/// The normalized fieldmap: columns in selection order, the registered
/// label sets, and the resolved answer dictionaries the recoder consults
/// for non-numeric-code columns.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    pub columns: Vec<Column>,
    pub label_sets: BTreeMap<String, LabelSet>,
    answer_text: BTreeMap<(u32, u32), BTreeMap<String, String>>,
    /// Keys dropped for missing host metadata, in selection order.
    pub dropped: Vec<String>,
}

impl FieldMap {
    /// Resolved answer text for a raw code, by (question, scale) key.
    pub fn answer_text(&self, question_id: u32, scale_id: u32, code: &str) -> Option<&str> {
        self.answer_text
            .get(&(question_id, scale_id))
            .and_then(|dictionary| dictionary.get(code))
            .map(String::as_str)
    }

    pub fn column_by_key(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.key == key)
    }
}

/// Fixed system fields: (key, kind, display label).
const SYSTEM_FIELDS: &[(&str, SemanticKind, &str)] = &[
    ("id", SemanticKind::NumericId, "Response ID"),
    ("submitdate", SemanticKind::FreeDate, "Date submitted"),
    ("startdate", SemanticKind::FreeDate, "Date started"),
    ("datestamp", SemanticKind::FreeDate, "Date last action"),
    ("lastpage", SemanticKind::NumericId, "Last page"),
    ("startlanguage", SemanticKind::FreeString, "Start language"),
    ("seed", SemanticKind::NumericId, "Seed"),
    ("token", SemanticKind::SmallIdentifier, "Token"),
    ("ipaddr", SemanticKind::FreeString, "IP address"),
    ("refurl", SemanticKind::FreeString, "Referrer URL"),
];

/// Build the fieldmap for the selected columns and register label sets.
pub fn build_fieldmap(survey: &SurveyDefinition, selected: &[SelectedField]) -> FieldMap {
    let mut columns = Vec::with_capacity(selected.len());
    let mut dropped = Vec::new();
    for field in selected {
        match resolve_field(survey, field) {
            Some(column) => {
                debug!(column = %column.key, kind = ?column.kind, "resolved column");
                columns.push(column);
            }
            None => {
                warn!(column = %field.key, "no survey metadata for selected column, dropping");
                dropped.push(field.key.clone());
            }
        }
    }
    let label_sets = register_label_sets(survey, &mut columns);
    FieldMap {
        columns,
        label_sets,
        answer_text: resolve_answer_dictionaries(survey),
        dropped,
    }
}

fn resolve_field(survey: &SurveyDefinition, field: &SelectedField) -> Option<Column> {
    system_field(field).or_else(|| question_field(survey, field))
}

fn system_field(field: &SelectedField) -> Option<Column> {
    let (_, kind, label) = SYSTEM_FIELDS
        .iter()
        .find(|(key, _, _)| *key == field.key)?;
    Some(Column {
        key: field.key.clone(),
        name: field.name.clone(),
        label: (*label).to_string(),
        kind: *kind,
        question_id: 0,
        scale_id: 0,
        non_numeric_codes: false,
        other_or_comment: false,
        label_set: None,
    })
}

fn question_field(survey: &SurveyDefinition, field: &SelectedField) -> Option<Column> {
    // Flat question: the key is exactly the question code.
    if let Some(question) = survey.question_by_code(&field.key) {
        return Some(question_column(field, question, None, 0));
    }

    for question in &survey.questions {
        let Some(rest) = field
            .key
            .strip_prefix(question.code.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
        else {
            continue;
        };

        if rest == "other" && question.other {
            return Some(companion_column(field, question, "Other"));
        }
        if rest == "comment" {
            return Some(companion_column(field, question, "Comment"));
        }
        if let Some(sub) = find_subquestion(question, rest) {
            return Some(question_column(field, question, Some(sub), 0));
        }
        if let Some((sub_code, suffix)) = rest.rsplit_once('_') {
            if let Some(sub) = find_subquestion(question, sub_code) {
                if suffix == "comment" {
                    return Some(companion_column(field, question, "Comment"));
                }
                if let Ok(scale_id) = suffix.parse::<u32>() {
                    return Some(question_column(field, question, Some(sub), scale_id));
                }
            }
        }
    }
    None
}

fn find_subquestion<'a>(
    question: &'a QuestionDefinition,
    code: &str,
) -> Option<&'a SubquestionDefinition> {
    question.subquestions.iter().find(|sub| sub.code == code)
}

fn question_column(
    field: &SelectedField,
    question: &QuestionDefinition,
    sub: Option<&SubquestionDefinition>,
    scale_id: u32,
) -> Column {
    Column {
        key: field.key.clone(),
        name: field.name.clone(),
        label: variable_label(question, sub, scale_id),
        kind: SemanticKind::from_type_code(&question.type_code),
        question_id: question.id,
        scale_id,
        non_numeric_codes: has_non_numeric_codes(question, scale_id),
        other_or_comment: false,
        label_set: None,
    }
}

fn companion_column(
    field: &SelectedField,
    question: &QuestionDefinition,
    qualifier: &str,
) -> Column {
    Column {
        key: field.key.clone(),
        name: field.name.clone(),
        label: format!("[{qualifier}] {}", question.text),
        kind: SemanticKind::FreeString,
        question_id: question.id,
        scale_id: 0,
        non_numeric_codes: has_non_numeric_codes(question, 0),
        other_or_comment: true,
        label_set: None,
    }
}

/// Variable label: scale qualifier, then sub-question qualifier, each
/// bracketed, then the base question text.
fn variable_label(
    question: &QuestionDefinition,
    sub: Option<&SubquestionDefinition>,
    scale_id: u32,
) -> String {
    let mut label = String::new();
    if let Some(heading) = question.scale_heading(scale_id) {
        label.push_str(&format!("[{heading}] "));
    }
    if let Some(sub) = sub {
        label.push_str(&format!("[{}] ", sub.text));
    }
    label.push_str(&question.text);
    label
}

/// True when any answer code of the (question, scale) pair is not a
/// numeric string. The flag permanently disables label-set attachment.
fn has_non_numeric_codes(question: &QuestionDefinition, scale_id: u32) -> bool {
    question
        .answers_for_scale(scale_id)
        .any(|answer| !is_numeric(answer.code.trim()))
}

fn resolve_answer_dictionaries(
    survey: &SurveyDefinition,
) -> BTreeMap<(u32, u32), BTreeMap<String, String>> {
    let mut dictionaries: BTreeMap<(u32, u32), BTreeMap<String, String>> = BTreeMap::new();
    for question in &survey.questions {
        for answer in &question.answers {
            dictionaries
                .entry((question.id, answer.scale_id))
                .or_default()
                .insert(answer.code.trim().to_string(), answer.text.clone());
        }
    }
    dictionaries
}
