use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Hard ceiling on fixed-width string storage in the target format.
/// Content beyond this many bytes is truncated at serialization time.
pub const MAX_STRING_WIDTH: u16 = 244;

/// Question-type-derived category driving recoding and label-set rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SemanticKind {
    /// Calendar timestamp answered as free text (recoded to epoch ms).
    FreeDate,
    /// Unconstrained free text.
    FreeString,
    /// Short token-like text (response tokens, language codes).
    SmallIdentifier,
    /// Numeric entry or system-assigned numeric identifier.
    NumericId,
    /// Gender choice collected as F/M.
    GenderCode,
    /// Yes/no choice collected as Y/N.
    BooleanCode,
    /// Yes/no/uncertain choice collected as Y/N/U.
    TriStateCode,
    /// Increase/same/decrease choice collected as I/S/D.
    DirectionCode,
    /// One indicator column per option of a multiple-choice question.
    MultiSelectIndicator,
    /// Everything else: list questions, rankings, equations.
    Generic,
}

impl SemanticKind {
    /// Map a question's declared one-letter type code to a kind.
    ///
    /// Used as the fallback when the column is not a known system field.
    pub fn from_type_code(code: &str) -> Self {
        match code {
            "D" => SemanticKind::FreeDate,
            "G" => SemanticKind::GenderCode,
            "Y" => SemanticKind::BooleanCode,
            "C" => SemanticKind::TriStateCode,
            "E" => SemanticKind::DirectionCode,
            "M" | "P" => SemanticKind::MultiSelectIndicator,
            "N" | "K" => SemanticKind::NumericId,
            "S" | "T" | "U" | "Q" => SemanticKind::FreeString,
            "I" => SemanticKind::SmallIdentifier,
            _ => SemanticKind::Generic,
        }
    }

    /// True for kinds whose answers come from a small fixed code set and
    /// therefore get a synthesized label set.
    pub fn has_fixed_codes(self) -> bool {
        matches!(
            self,
            SemanticKind::GenderCode
                | SemanticKind::BooleanCode
                | SemanticKind::TriStateCode
                | SemanticKind::DirectionCode
                | SemanticKind::MultiSelectIndicator
        )
    }

    /// True when cells of this kind are rebased onto the numeric time system.
    pub fn is_date(self) -> bool {
        matches!(self, SemanticKind::FreeDate)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SemanticKind::FreeDate => "date",
            SemanticKind::FreeString => "text",
            SemanticKind::SmallIdentifier => "identifier",
            SemanticKind::NumericId => "numeric",
            SemanticKind::GenderCode => "gender",
            SemanticKind::BooleanCode => "yes/no",
            SemanticKind::TriStateCode => "yes/no/uncertain",
            SemanticKind::DirectionCode => "direction",
            SemanticKind::MultiSelectIndicator => "multi-select",
            SemanticKind::Generic => "generic",
        }
    }
}

impl fmt::Display for SemanticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One output variable: a question, sub-question, or fixed system field.
///
/// Built once during metadata normalization and immutable afterwards; the
/// inferred storage type lives in the separate [`TypeTable`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Stable internal key (the source field identifier).
    pub key: String,
    /// Canonical output variable name.
    pub name: String,
    /// Display label shown in the variable-label list.
    pub label: String,
    pub kind: SemanticKind,
    /// Owning question identity; 0 for fixed system fields.
    pub question_id: u32,
    /// Scale axis within the owning question.
    pub scale_id: u32,
    /// Set when any answer code of the owning (question, scale) is not a
    /// numeric string. Once set it permanently disables label-set
    /// attachment, regardless of later recoding.
    pub non_numeric_codes: bool,
    /// Free-text companion ("other"/comment) of a choice question.
    pub other_or_comment: bool,
    /// Name of the registered label set, present only when the column is
    /// label-eligible. This is the single shared eligibility decision all
    /// downstream components consult.
    pub label_set: Option<String>,
}

impl Column {
    /// Label-set eligibility: numeric codes only, and never for free-text
    /// companion columns.
    pub fn label_eligible(&self) -> bool {
        !self.non_numeric_codes && !self.other_or_comment
    }
}

/// Narrowest scalar representation assigned to a column after inference.
///
/// Widening order is strict: `Byte < Int < Long < Float < Str`. `Double` is
/// reserved for rebased timestamps, which must stay numeric regardless of
/// magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageType {
    Byte,
    Int,
    Long,
    Float,
    /// Fixed timestamp (milliseconds since 1960-01-01, stored as double).
    Double,
    /// Fixed-width string of 1..=244 bytes.
    Str(u16),
}

impl StorageType {
    /// Storage-type token as written in the document's type list.
    pub fn token(self) -> String {
        match self {
            StorageType::Byte => "byte".to_string(),
            StorageType::Int => "int".to_string(),
            StorageType::Long => "long".to_string(),
            StorageType::Float => "float".to_string(),
            StorageType::Double => "double".to_string(),
            StorageType::Str(width) => format!("str{width}"),
        }
    }

    /// Display-format token matching this storage type.
    pub fn display_format(self) -> String {
        match self {
            StorageType::Byte | StorageType::Int | StorageType::Long | StorageType::Float => {
                "%10.0g".to_string()
            }
            StorageType::Double => "%tc".to_string(),
            StorageType::Str(width) => format!("%{width}s"),
        }
    }

    pub fn is_string(self) -> bool {
        matches!(self, StorageType::Str(_))
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Storage type plus its derived display format for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnType {
    pub storage: StorageType,
    pub format: String,
}

impl From<StorageType> for ColumnType {
    fn from(storage: StorageType) -> Self {
        Self {
            storage,
            format: storage.display_format(),
        }
    }
}

/// Mapping from column key to inferred storage type and display format,
/// derived in one pass over the fully-recoded response matrix.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    entries: BTreeMap<String, ColumnType>,
}

impl TypeTable {
    pub fn insert(&mut self, key: impl Into<String>, storage: StorageType) {
        self.entries.insert(key.into(), ColumnType::from(storage));
    }

    pub fn get(&self, key: &str) -> Option<&ColumnType> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered response rows, cells aligned to columns by position.
///
/// Rows are appended during ingestion; after ingestion closes the matrix is
/// only mutated cell-by-cell by the recoding engine and never grows or
/// shrinks.
#[derive(Debug, Clone, Default)]
pub struct ResponseMatrix {
    rows: Vec<Vec<String>>,
}

impl ResponseMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: String) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value;
        }
    }

    /// All cells of one column, top to bottom. Short rows yield "".
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(col).map(String::as_str).unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_type_code() {
        assert_eq!(SemanticKind::from_type_code("D"), SemanticKind::FreeDate);
        assert_eq!(SemanticKind::from_type_code("G"), SemanticKind::GenderCode);
        assert_eq!(SemanticKind::from_type_code("Y"), SemanticKind::BooleanCode);
        assert_eq!(SemanticKind::from_type_code("C"), SemanticKind::TriStateCode);
        assert_eq!(
            SemanticKind::from_type_code("E"),
            SemanticKind::DirectionCode
        );
        assert_eq!(
            SemanticKind::from_type_code("M"),
            SemanticKind::MultiSelectIndicator
        );
        assert_eq!(SemanticKind::from_type_code("N"), SemanticKind::NumericId);
        assert_eq!(SemanticKind::from_type_code("T"), SemanticKind::FreeString);
        assert_eq!(SemanticKind::from_type_code("L"), SemanticKind::Generic);
    }

    #[test]
    fn fixed_code_kinds() {
        assert!(SemanticKind::GenderCode.has_fixed_codes());
        assert!(SemanticKind::MultiSelectIndicator.has_fixed_codes());
        assert!(!SemanticKind::FreeString.has_fixed_codes());
        assert!(!SemanticKind::FreeDate.has_fixed_codes());
    }

    #[test]
    fn storage_type_tokens() {
        assert_eq!(StorageType::Byte.token(), "byte");
        assert_eq!(StorageType::Double.token(), "double");
        assert_eq!(StorageType::Str(12).token(), "str12");
    }

    #[test]
    fn display_formats() {
        assert_eq!(StorageType::Int.display_format(), "%10.0g");
        assert_eq!(StorageType::Double.display_format(), "%tc");
        assert_eq!(StorageType::Str(7).display_format(), "%7s");
    }

    #[test]
    fn matrix_cell_access() {
        let mut matrix = ResponseMatrix::new();
        matrix.push_row(vec!["a".to_string(), "b".to_string()]);
        matrix.push_row(vec!["c".to_string()]);
        assert_eq!(matrix.cell(0, 1), Some("b"));
        assert_eq!(matrix.cell(1, 1), None);
        let col: Vec<&str> = matrix.column_values(1).collect();
        assert_eq!(col, vec!["b", ""]);
        matrix.set_cell(0, 0, "z".to_string());
        assert_eq!(matrix.cell(0, 0), Some("z"));
    }
}
