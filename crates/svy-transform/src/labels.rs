//! Value-label registry.
//!
//! Synthesizes the candidate code→text set for every label-eligible column
//! and registers it under the (question, scale) derived name. Two sources:
//! the fixed-code semantic kinds (yes/no, gender, agreement, direction,
//! multi-select), whose codes come from the configurable deployment
//! settings and whose text comes from the locale; and host-supplied answer
//! dictionaries whose codes are all integers.

use std::collections::BTreeMap;

use svy_model::{Column, LabelSet, SemanticKind, SurveyDefinition};

/// Register label sets for eligible columns and record the attachment on
/// each column. Columns sharing a (question, scale) pair share one set;
/// independent scales of one question get independent sets.
pub fn register_label_sets(
    survey: &SurveyDefinition,
    columns: &mut [Column],
) -> BTreeMap<String, LabelSet> {
    let mut sets: BTreeMap<String, LabelSet> = BTreeMap::new();
    for column in columns.iter_mut() {
        if column.question_id == 0 || !column.label_eligible() {
            continue;
        }
        let name = LabelSet::set_name(column.question_id, column.scale_id);
        if sets.contains_key(&name) {
            column.label_set = Some(name);
            continue;
        }
        if let Some(set) = candidate_set(survey, column) {
            if !set.is_empty() {
                sets.insert(name.clone(), set);
                column.label_set = Some(name);
            }
        }
    }
    sets
}

/// The candidate set for one column, or None when no consistent integer
/// code set exists.
fn candidate_set(survey: &SurveyDefinition, column: &Column) -> Option<LabelSet> {
    let settings = &survey.settings;
    let locale = &settings.locale;
    let mut set = LabelSet::new(column.question_id, column.scale_id);
    match column.kind {
        SemanticKind::GenderCode => {
            set.insert(0, locale.female.clone());
            set.insert(1, locale.male.clone());
        }
        SemanticKind::BooleanCode => {
            set.insert(settings.yes_code, locale.yes.clone());
            set.insert(settings.no_code, locale.no.clone());
        }
        SemanticKind::TriStateCode => {
            set.insert(settings.yes_code, locale.yes.clone());
            set.insert(settings.no_code, locale.no.clone());
            set.insert(9, locale.uncertain.clone());
        }
        SemanticKind::DirectionCode => {
            set.insert(1, locale.increase.clone());
            set.insert(0, locale.same.clone());
            set.insert(-1, locale.decrease.clone());
        }
        SemanticKind::MultiSelectIndicator => {
            set.insert(settings.yes_code, locale.yes.clone());
            set.insert(settings.no_code, locale.not_selected.clone());
        }
        _ => {
            let question = survey
                .questions
                .iter()
                .find(|question| question.id == column.question_id)?;
            for answer in question.answers_for_scale(column.scale_id) {
                // A single code outside integer range disqualifies the set;
                // every code in a registered set must be an integer.
                let code = answer.code.trim().parse::<i64>().ok()?;
                set.insert(code, answer.text.trim());
            }
        }
    }
    Some(set)
}
