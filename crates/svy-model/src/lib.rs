pub mod column;
pub mod error;
pub mod labels;
pub mod survey;

pub use column::{
    Column, ColumnType, MAX_STRING_WIDTH, ResponseMatrix, SemanticKind, StorageType, TypeTable,
};
pub use error::{ExportError, Result};
pub use labels::LabelSet;
pub use survey::{
    AnswerOption, DecimalSeparator, ExportSettings, LocaleText, QuestionDefinition,
    SubquestionDefinition, SurveyDefinition,
};
