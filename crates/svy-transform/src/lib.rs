pub mod fieldmap;
pub mod inference;
pub mod labels;
pub mod normalization;
pub mod recode;

pub use fieldmap::{FieldMap, SelectedField, build_fieldmap};
pub use inference::infer_types;
pub use recode::recode_matrix;
