//! End-to-end engine behavior: fieldmap → recode → infer over one matrix.

use svy_model::{
    AnswerOption, DecimalSeparator, ExportSettings, QuestionDefinition, ResponseMatrix,
    StorageType, SurveyDefinition,
};
use svy_transform::{SelectedField, build_fieldmap, infer_types, recode_matrix};

fn question(id: u32, code: &str, type_code: &str, text: &str) -> QuestionDefinition {
    QuestionDefinition {
        id,
        code: code.to_string(),
        type_code: type_code.to_string(),
        text: text.to_string(),
        other: false,
        subquestions: vec![],
        answers: vec![],
        scale_headings: vec![],
    }
}

fn selected(keys: &[&str]) -> Vec<SelectedField> {
    keys.iter().map(|key| SelectedField::new(*key, *key)).collect()
}

fn matrix_of(rows: &[&[&str]]) -> ResponseMatrix {
    let mut matrix = ResponseMatrix::new();
    for row in rows {
        matrix.push_row(row.iter().map(|cell| (*cell).to_string()).collect());
    }
    matrix
}

#[test]
fn gender_and_vote_row_recodes_and_types() {
    let survey = SurveyDefinition {
        survey_id: 42,
        title: "Election study".to_string(),
        language: "en".to_string(),
        settings: ExportSettings::default(),
        questions: vec![
            question(1, "gender", "G", "Your gender"),
            question(2, "vote", "Y", "Did you vote?"),
        ],
    };
    let fieldmap = build_fieldmap(&survey, &selected(&["gender", "vote"]));
    let mut matrix = matrix_of(&[&["F", "Y"]]);

    recode_matrix(&mut matrix, &fieldmap, &survey.settings).unwrap();
    assert_eq!(matrix.cell(0, 0), Some("0"));
    assert_eq!(matrix.cell(0, 1), Some("1"));

    let types = infer_types(&matrix, &fieldmap.columns);
    assert_eq!(types.get("gender").unwrap().storage, StorageType::Byte);
    assert_eq!(types.get("vote").unwrap().storage, StorageType::Byte);

    let gender_set = &fieldmap.label_sets["vall10"];
    assert_eq!(gender_set.text_for(0), Some("Female"));
    assert_eq!(gender_set.text_for(1), Some("Male"));
    let vote_set = &fieldmap.label_sets["vall20"];
    assert_eq!(vote_set.text_for(1), Some("Yes"));
    assert_eq!(vote_set.text_for(0), Some("No"));
}

#[test]
fn date_column_always_resolves_to_timestamp_double() {
    let survey = SurveyDefinition {
        survey_id: 42,
        title: "t".to_string(),
        language: "en".to_string(),
        settings: ExportSettings::default(),
        questions: vec![],
    };
    let fieldmap = build_fieldmap(&survey, &selected(&["submitdate"]));
    let mut matrix = matrix_of(&[&["2020-01-01 00:00:00"], &["5"], &[""]]);

    recode_matrix(&mut matrix, &fieldmap, &survey.settings).unwrap();
    assert_eq!(matrix.cell(0, 0), Some("1893456000000"));

    let types = infer_types(&matrix, &fieldmap.columns);
    let column_type = types.get("submitdate").unwrap();
    assert_eq!(column_type.storage, StorageType::Double);
    assert_eq!(column_type.format, "%tc");
}

#[test]
fn comma_decimal_classifies_float() {
    let survey = SurveyDefinition {
        survey_id: 42,
        title: "t".to_string(),
        language: "en".to_string(),
        settings: ExportSettings {
            decimal_separator: DecimalSeparator::Comma,
            ..ExportSettings::default()
        },
        questions: vec![question(3, "height", "N", "Height in meters")],
    };
    let fieldmap = build_fieldmap(&survey, &selected(&["height"]));
    let mut matrix = matrix_of(&[&["3,5"], &["2"]]);

    recode_matrix(&mut matrix, &fieldmap, &survey.settings).unwrap();
    assert_eq!(matrix.cell(0, 0), Some("3.5"));

    let types = infer_types(&matrix, &fieldmap.columns);
    assert_eq!(types.get("height").unwrap().storage, StorageType::Float);
}

#[test]
fn label_substitution_makes_string_column() {
    let mut colour = question(6, "colour", "L", "Favourite colour");
    colour.answers = vec![
        AnswerOption {
            code: "A1".to_string(),
            text: "Red".to_string(),
            scale_id: 0,
        },
        AnswerOption {
            code: "A2".to_string(),
            text: "Bright blue".to_string(),
            scale_id: 0,
        },
    ];
    let survey = SurveyDefinition {
        survey_id: 42,
        title: "t".to_string(),
        language: "en".to_string(),
        settings: ExportSettings::default(),
        questions: vec![colour],
    };
    let fieldmap = build_fieldmap(&survey, &selected(&["colour"]));
    assert!(fieldmap.columns[0].non_numeric_codes);
    assert!(fieldmap.label_sets.is_empty());

    let mut matrix = matrix_of(&[&["A1"], &["A2"]]);
    recode_matrix(&mut matrix, &fieldmap, &survey.settings).unwrap();

    let types = infer_types(&matrix, &fieldmap.columns);
    assert_eq!(
        types.get("colour").unwrap().storage,
        StorageType::Str(11) // "Bright blue"
    );
}

#[test]
fn all_empty_column_never_becomes_numeric() {
    let survey = SurveyDefinition {
        survey_id: 42,
        title: "t".to_string(),
        language: "en".to_string(),
        settings: ExportSettings::default(),
        questions: vec![question(9, "age", "N", "Your age")],
    };
    let fieldmap = build_fieldmap(&survey, &selected(&["age"]));
    let mut matrix = matrix_of(&[&[""], &["  "]]);

    recode_matrix(&mut matrix, &fieldmap, &survey.settings).unwrap();
    let types = infer_types(&matrix, &fieldmap.columns);
    assert_eq!(types.get("age").unwrap().storage, StorageType::Str(1));
}
