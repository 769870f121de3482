//! Survey definition loading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use svy_model::SurveyDefinition;

/// Load a survey definition from its JSON description.
pub fn load_survey(path: &Path) -> Result<SurveyDefinition> {
    let file =
        File::open(path).with_context(|| format!("open survey definition: {}", path.display()))?;
    let survey: SurveyDefinition = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parse survey definition: {}", path.display()))?;
    info!(
        survey_id = survey.survey_id,
        questions = survey.questions.len(),
        "loaded survey definition"
    );
    Ok(survey)
}
