//! Emitted-document structure checks.

use svy_model::{
    AnswerOption, ExportError, ExportSettings, QuestionDefinition, ResponseMatrix, SurveyDefinition,
};
use svy_report::write_dataset;
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

fn survey(questions: Vec<QuestionDefinition>) -> SurveyDefinition {
    SurveyDefinition {
        survey_id: 123456,
        title: "Election study".to_string(),
        language: "en".to_string(),
        settings: ExportSettings::default(),
        questions,
    }
}

fn emit(survey: &SurveyDefinition, keys: &[&str], rows: &[&[&str]]) -> String {
    let selected: Vec<SelectedField> =
        keys.iter().map(|key| SelectedField::new(*key, *key)).collect();
    let fieldmap = build_fieldmap(survey, &selected);
    let mut matrix = ResponseMatrix::new();
    for row in rows {
        matrix.push_row(row.iter().map(|cell| (*cell).to_string()).collect());
    }
    recode_matrix(&mut matrix, &fieldmap, &survey.settings).unwrap();
    let types = infer_types(&matrix, &fieldmap.columns);
    let mut sink = Vec::new();
    write_dataset(&mut sink, survey, &fieldmap, &matrix, &types).unwrap();
    String::from_utf8(sink).unwrap()
}

#[test]
fn sections_appear_in_contract_order() {
    let survey = survey(vec![question(1, "gender", "G", "Your gender")]);
    let xml = emit(&survey, &["gender"], &[&["F"]]);

    let order = [
        "<header>",
        "<typelist>",
        "<varnamelist>",
        "<fmtlist>",
        "<lbllist>",
        "<variable_labels>",
        "<data>",
        "<value_labels>",
    ];
    let mut last = 0;
    for marker in order {
        let position = xml.find(marker).unwrap_or_else(|| panic!("missing {marker}"));
        assert!(position > last, "{marker} out of order");
        last = position;
    }
}

#[test]
fn header_carries_counts_and_markers() {
    let survey = survey(vec![
        question(1, "gender", "G", "Your gender"),
        question(2, "vote", "Y", "Did you vote?"),
    ]);
    let xml = emit(&survey, &["gender", "vote"], &[&["F", "Y"], &["M", "N"]]);

    assert!(xml.contains("<ds_format>113</ds_format>"));
    assert!(xml.contains("<byteorder>LOHI</byteorder>"));
    assert!(xml.contains("<filetype>1</filetype>"));
    assert!(xml.contains("<nvar>2</nvar>"));
    assert!(xml.contains("<nobs>2</nobs>"));
    assert!(xml.contains("<data_label>Election study (SID: 123456)</data_label>"));
    assert!(xml.contains("<time_stamp>"));
}

#[test]
fn types_labels_and_data_for_recoded_row() {
    let survey = survey(vec![
        question(1, "gender", "G", "Your gender"),
        question(2, "vote", "Y", "Did you vote?"),
    ]);
    let xml = emit(&survey, &["gender", "vote"], &[&["F", "Y"]]);

    assert!(xml.contains(r#"<type varname="gender">byte</type>"#));
    assert!(xml.contains(r#"<type varname="vote">byte</type>"#));
    assert!(xml.contains(r#"<fmt varname="gender">%10.0g</fmt>"#));
    assert!(xml.contains(r#"<lblname varname="gender">vall10</lblname>"#));
    assert!(xml.contains(r#"<lblname varname="vote">vall20</lblname>"#));
    assert!(xml.contains(r#"<vlabel varname="gender">Your gender</vlabel>"#));
    assert!(xml.contains(r#"<v varname="gender">0</v>"#));
    assert!(xml.contains(r#"<v varname="vote">1</v>"#));
    assert!(xml.contains(r#"<vallab name="vall10">"#));
    assert!(xml.contains(r#"<label value="0">Female</label>"#));
    assert!(xml.contains(r#"<label value="1">Male</label>"#));
    assert!(xml.contains(r#"<label value="1">Yes</label>"#));
}

#[test]
fn non_numeric_code_column_never_referenced_in_lbllist() {
    let mut colour = question(6, "colour", "L", "Favourite colour");
    colour.answers = vec![AnswerOption {
        code: "A1".to_string(),
        text: "Red".to_string(),
        scale_id: 0,
    }];
    let survey = survey(vec![colour]);
    let xml = emit(&survey, &["colour"], &[&["A1"]]);

    assert!(xml.contains("<lbllist>"));
    assert!(!xml.contains("lblname"));
    assert!(xml.contains(r#"<v varname="colour">Red</v>"#));
}

#[test]
fn long_string_truncates_at_emission_only() {
    let survey = survey(vec![question(3, "essay", "T", "Tell us more")]);
    let long = "x".repeat(300);
    let row: &[&str] = &[long.as_str()];
    let xml = emit(&survey, &["essay"], &[row]);

    assert!(xml.contains(r#"<type varname="essay">str244</type>"#));
    assert!(xml.contains(r#"<fmt varname="essay">%244s</fmt>"#));
    let expected = "x".repeat(244);
    assert!(xml.contains(&format!(r#"<v varname="essay">{expected}</v>"#)));
    assert!(!xml.contains(&"x".repeat(245)));
}

#[test]
fn missing_label_set_is_contract_violation() {
    let survey = survey(vec![question(1, "gender", "G", "Your gender")]);
    let selected = vec![SelectedField::new("gender", "gender")];
    let mut fieldmap = build_fieldmap(&survey, &selected);
    // Break the construction invariant on purpose.
    fieldmap.label_sets.clear();

    let mut matrix = ResponseMatrix::new();
    matrix.push_row(vec!["F".to_string()]);
    recode_matrix(&mut matrix, &fieldmap, &survey.settings).unwrap();
    let types = infer_types(&matrix, &fieldmap.columns);

    let mut sink = Vec::new();
    let error = write_dataset(&mut sink, &survey, &fieldmap, &matrix, &types).unwrap_err();
    let export_error = error.downcast_ref::<ExportError>().unwrap();
    assert!(matches!(export_error, ExportError::MissingLabelSet { .. }));
    assert!(sink.is_empty());
}
