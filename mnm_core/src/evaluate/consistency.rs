//! Consistency of a model with recorded experiment results
use log::{debug, warn};

use crate::candidate::model::CandidateModel;
use crate::evaluate::prediction::ModelPredictor;
use crate::evaluate::{ModelEvaluation, ValidationError};
use crate::experiment::result::ExperimentResult;
use crate::network::network::{Network, NetworkError};

/// How one model relates to a set of results
///
/// Results the model ignores are listed in `ignored` and nowhere else.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConsistencyReport {
    pub model_id: String,
    /// The prediction equals the outcome
    pub covered: Vec<String>,
    /// The prediction differs from the outcome
    pub inconsistent: Vec<String>,
    /// The model makes no prediction
    pub indifferent: Vec<String>,
    /// Ids of results in the model's ignored set
    pub ignored: Vec<String>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.inconsistent.is_empty()
    }
}

/// Compare the model's predictions with the (relevant) results
pub fn check_model<'r>(
    network: &Network,
    model: &CandidateModel,
    results: impl IntoIterator<Item = &'r ExperimentResult>,
) -> Result<ConsistencyReport, NetworkError> {
    let mut predictor = ModelPredictor::new(network, model);
    let mut report = ConsistencyReport {
        model_id: model.id.clone(),
        ..Default::default()
    };
    for result in results {
        if model.ignored_results.contains(&result.id) {
            report.ignored.push(result.id.clone());
            continue;
        }
        match predictor.predict(&result.description)? {
            Some(prediction) if prediction == result.outcome => {
                report.covered.push(result.id.clone())
            }
            Some(_) => report.inconsistent.push(result.id.clone()),
            None => report.indifferent.push(result.id.clone()),
        }
    }
    debug!(
        "{}: {} covered, {} inconsistent, {} indifferent, {} ignored",
        report.model_id,
        report.covered.len(),
        report.inconsistent.len(),
        report.indifferent.len(),
        report.ignored.len()
    );
    Ok(report)
}

/// Check that a model can be used as the starting point of a revision
///
/// The model has to be a valid base model and consistent with every relevant result it does not
/// ignore.
pub fn validate_revision_base<'r>(
    network: &Network,
    model: &CandidateModel,
    results: impl IntoIterator<Item = &'r ExperimentResult>,
) -> Result<ModelEvaluation, ValidationError> {
    let evaluation = ModelEvaluation::new(network, model)?;
    evaluation.validate_base(model)?;
    let report = check_model(network, model, results)?;
    if !report.is_consistent() {
        warn!(
            "Base model {} is inconsistent with {} results",
            model.id,
            report.inconsistent.len()
        );
        return Err(ValidationError::Inconsistent {
            model: model.id.clone(),
            results: report.inconsistent,
        });
    }
    Ok(evaluation)
}
