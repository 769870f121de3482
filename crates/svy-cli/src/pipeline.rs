//! Export pipeline orchestration.
//!
//! Stage order is fixed: load survey metadata, ingest responses, build the
//! fieldmap (dropping unknown columns), project the matrix onto the
//! resolved columns, recode in place, infer types, emit the document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use svy_ingest::{ResponseTable, load_survey, read_responses, unique_var_names};
use svy_model::{ExportError, ResponseMatrix, SurveyDefinition, TypeTable};
use svy_report::write_dataset_file;
use svy_transform::{FieldMap, SelectedField, build_fieldmap, infer_types, recode_matrix};

use crate::cli::{ColumnsArgs, ExportArgs};

/// One row of the run summary.
#[derive(Debug, Clone)]
pub struct ColumnReport {
    pub name: String,
    pub kind: String,
    pub storage: String,
    pub format: String,
    pub label_set: Option<String>,
    pub label: String,
}

/// Result of an export or columns run.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub survey_id: u64,
    pub title: String,
    pub rows: usize,
    pub output: Option<PathBuf>,
    pub dropped: Vec<String>,
    pub columns: Vec<ColumnReport>,
    pub label_sets: usize,
}

pub fn run_export(args: &ExportArgs) -> Result<ExportOutcome> {
    let (survey, fieldmap, matrix, types) = analyze(&args.survey, &args.responses)?;

    let output = if args.dry_run {
        None
    } else {
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| args.responses.with_extension("xml"));
        write_dataset_file(&path, &survey, &fieldmap, &matrix, &types)
            .with_context(|| format!("write dataset: {}", path.display()))?;
        info!(path = %path.display(), "wrote dataset");
        Some(path)
    };

    Ok(outcome(&survey, &fieldmap, &matrix, &types, output))
}

pub fn run_columns(args: &ColumnsArgs) -> Result<ExportOutcome> {
    let (survey, fieldmap, matrix, types) = analyze(&args.survey, &args.responses)?;
    Ok(outcome(&survey, &fieldmap, &matrix, &types, None))
}

type Analysis = (SurveyDefinition, FieldMap, ResponseMatrix, TypeTable);

fn analyze(survey_path: &std::path::Path, responses_path: &std::path::Path) -> Result<Analysis> {
    let survey = load_survey(survey_path)?;
    let table = read_responses(responses_path)?;
    let (fieldmap, mut matrix) = normalize_and_project(&survey, &table);
    if fieldmap.columns.is_empty() {
        return Err(ExportError::Metadata(
            "no selected column matched the survey metadata".to_string(),
        )
        .into());
    }
    info!(
        columns = fieldmap.columns.len(),
        dropped = fieldmap.dropped.len(),
        label_sets = fieldmap.label_sets.len(),
        "built fieldmap"
    );

    recode_matrix(&mut matrix, &fieldmap, &survey.settings).context("recode responses")?;
    let types = infer_types(&matrix, &fieldmap.columns);
    info!(rows = matrix.len(), "recoded and classified responses");
    Ok((survey, fieldmap, matrix, types))
}

/// Build the fieldmap from the response header and cut the matrix down to
/// the columns that resolved, preserving order.
fn normalize_and_project(
    survey: &SurveyDefinition,
    table: &ResponseTable,
) -> (FieldMap, ResponseMatrix) {
    let names = unique_var_names(&table.headers);
    let selected: Vec<SelectedField> = table
        .headers
        .iter()
        .zip(names.iter())
        .map(|(key, name)| SelectedField::new(key.clone(), name.clone()))
        .collect();
    let fieldmap = build_fieldmap(survey, &selected);

    // Resolved columns are an ordered subset of the header, so a single
    // forward walk recovers each column's source index even with
    // duplicate header names.
    let mut indices = Vec::with_capacity(fieldmap.columns.len());
    let mut cursor = 0usize;
    for column in &fieldmap.columns {
        while cursor < table.headers.len() && table.headers[cursor] != column.key {
            cursor += 1;
        }
        indices.push(cursor);
        cursor += 1;
    }

    let mut matrix = ResponseMatrix::new();
    for row in table.matrix.rows() {
        matrix.push_row(
            indices
                .iter()
                .map(|&idx| row.get(idx).cloned().unwrap_or_default())
                .collect(),
        );
    }
    (fieldmap, matrix)
}

fn outcome(
    survey: &SurveyDefinition,
    fieldmap: &FieldMap,
    matrix: &ResponseMatrix,
    types: &TypeTable,
    output: Option<PathBuf>,
) -> ExportOutcome {
    let columns = fieldmap
        .columns
        .iter()
        .map(|column| {
            let column_type = types.get(&column.key);
            ColumnReport {
                name: column.name.clone(),
                kind: column.kind.to_string(),
                storage: column_type
                    .map(|t| t.storage.token())
                    .unwrap_or_default(),
                format: column_type.map(|t| t.format.clone()).unwrap_or_default(),
                label_set: column.label_set.clone(),
                label: column.label.clone(),
            }
        })
        .collect();
    ExportOutcome {
        survey_id: survey.survey_id,
        title: survey.title.clone(),
        rows: matrix.len(),
        output,
        dropped: fieldmap.dropped.clone(),
        columns,
        label_sets: fieldmap.label_sets.len(),
    }
}
