//! Column storage-type inference over the fully-recoded matrix.
//!
//! Pure and side-effect-free: classifies every non-empty cell
//! independently, then promotes each column to the widest classification
//! observed. Widening is strict: byte < int < long < float < string.
//! Date-kind columns promote their integer classification straight to the
//! timestamp double type so the column stays usable as a numeric time
//! value.

use svy_model::{Column, MAX_STRING_WIDTH, ResponseMatrix, StorageType, TypeTable};

use crate::normalization::numeric::{is_integer_form, is_numeric};

/// Inclusive magnitude bounds of the small-integer storage classes.
const BYTE_MIN: i64 = -127;
const BYTE_MAX: i64 = 100;
const INT_MIN: i64 = -32_767;
const INT_MAX: i64 = 32_740;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellClass {
    Empty,
    Byte,
    Int,
    Long,
    Float,
    Str,
}

fn rank(class: CellClass) -> u8 {
    match class {
        CellClass::Empty => 0,
        CellClass::Byte => 1,
        CellClass::Int => 2,
        CellClass::Long => 3,
        CellClass::Float => 4,
        CellClass::Str => 5,
    }
}

fn classify(value: &str) -> CellClass {
    if value.is_empty() {
        return CellClass::Empty;
    }
    if is_integer_form(value) {
        return match value.parse::<i64>() {
            Ok(n) if (BYTE_MIN..=BYTE_MAX).contains(&n) => CellClass::Byte,
            Ok(n) if (INT_MIN..=INT_MAX).contains(&n) => CellClass::Int,
            Ok(_) => CellClass::Long,
            // Beyond i64 the exact integer is gone either way; store as float.
            Err(_) => CellClass::Float,
        };
    }
    if is_numeric(value) {
        return CellClass::Float;
    }
    CellClass::Str
}

/// Derive the type table for all columns. Idempotent over the same matrix.
pub fn infer_types(matrix: &ResponseMatrix, columns: &[Column]) -> TypeTable {
    let mut table = TypeTable::default();
    for (col_idx, column) in columns.iter().enumerate() {
        let storage = infer_column(matrix.column_values(col_idx), column.kind.is_date());
        table.insert(column.key.clone(), storage);
    }
    table
}

/// Widest classification across one column's cells, mapped to storage.
fn infer_column<'a>(cells: impl Iterator<Item = &'a str>, is_date: bool) -> StorageType {
    let mut widest = CellClass::Empty;
    let mut max_bytes = 0usize;
    for cell in cells {
        let class = classify(cell);
        if class == CellClass::Str {
            max_bytes = max_bytes.max(cell.len());
        }
        if rank(class) > rank(widest) {
            widest = class;
        }
    }

    match widest {
        // A column of nothing but missing values still needs a slot.
        CellClass::Empty => StorageType::Str(1),
        _ if is_date => StorageType::Double,
        CellClass::Byte => StorageType::Byte,
        CellClass::Int => StorageType::Int,
        CellClass::Long => StorageType::Long,
        CellClass::Float => StorageType::Float,
        CellClass::Str => {
            StorageType::Str(max_bytes.clamp(1, MAX_STRING_WIDTH as usize) as u16)
        }
    }
}
