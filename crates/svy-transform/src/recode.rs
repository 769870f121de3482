//! Per-cell recoding of the buffered response matrix.
//!
//! Rewrites every cell in place, column-kind-directed, so that type
//! inference afterwards sees canonical values. Recoding must finish for a
//! cell before that cell contributes to inference: a date cell changes
//! from string-like to numeric-like here.
//!
//! All substitutions are exact-token matches against the trimmed cell, so
//! running the pass twice over already-recoded data changes nothing.

use tracing::debug;

use svy_model::{
    Column, DecimalSeparator, ExportError, ExportSettings, ResponseMatrix, Result, SemanticKind,
};

use crate::fieldmap::FieldMap;
use crate::normalization::datetime::rebase_timestamp;
use crate::normalization::numeric::{is_integer_form, normalize_decimal_comma};

/// Recode the whole matrix in place. The only fatal condition is a
/// date-kind cell that parses as neither a timestamp nor an
/// already-rebased integer.
pub fn recode_matrix(
    matrix: &mut ResponseMatrix,
    fieldmap: &FieldMap,
    settings: &ExportSettings,
) -> Result<()> {
    for (col_idx, column) in fieldmap.columns.iter().enumerate() {
        let mut rewritten = 0usize;
        for row_idx in 0..matrix.len() {
            let raw = matrix
                .cell(row_idx, col_idx)
                .unwrap_or_default()
                .to_string();
            let recoded = recode_cell(&raw, row_idx, column, fieldmap, settings)?;
            if recoded != raw {
                matrix.set_cell(row_idx, col_idx, recoded);
                rewritten += 1;
            }
        }
        if rewritten > 0 {
            debug!(column = %column.key, rewritten, "recoded column");
        }
    }
    Ok(())
}

/// Recode one cell. Row index is zero-based; errors report it one-based.
fn recode_cell(
    raw: &str,
    row_idx: usize,
    column: &Column,
    fieldmap: &FieldMap,
    settings: &ExportSettings,
) -> Result<String> {
    let mut value = raw.trim().to_string();
    if value.is_empty() {
        return Ok(value);
    }

    // Non-numeric code columns carry the label text itself; the code would
    // otherwise force the column to string with meaningless content.
    if column.non_numeric_codes && !column.other_or_comment {
        if let Some(text) = fieldmap.answer_text(column.question_id, column.scale_id, &value) {
            value = text.trim().to_string();
        }
    }

    match column.kind {
        SemanticKind::GenderCode => {
            value = substitute(&value, &[("F", "0"), ("M", "1")]);
        }
        SemanticKind::BooleanCode | SemanticKind::TriStateCode => {
            value = substitute(&value, &[("Y", "1"), ("N", "0"), ("U", "9")]);
        }
        SemanticKind::DirectionCode => {
            value = substitute(&value, &[("I", "1"), ("S", "0"), ("D", "-1")]);
        }
        SemanticKind::FreeDate => {
            // Integer form means the cell is already a rebased timestamp.
            if !is_integer_form(&value) {
                match rebase_timestamp(&value) {
                    Some(millis) => value = millis.to_string(),
                    None => {
                        return Err(ExportError::InvalidDate {
                            row: row_idx + 1,
                            column: column.name.clone(),
                            value,
                        });
                    }
                }
            }
        }
        _ => {}
    }

    if settings.decimal_separator == DecimalSeparator::Comma {
        if let Some(normalized) = normalize_decimal_comma(&value) {
            value = normalized;
        }
    }

    Ok(value)
}

fn substitute(value: &str, table: &[(&str, &str)]) -> String {
    for (token, replacement) in table {
        if value == *token {
            return (*replacement).to_string();
        }
    }
    value.to_string()
}
