pub mod names;
pub mod responses;
pub mod survey_file;

pub use names::{MAX_NAME_LEN, sanitize_var_name, unique_var_names};
pub use responses::{ResponseTable, read_responses};
pub use survey_file::load_survey;
