//! Experiment descriptions and recorded results
use serde::{Deserialize, Serialize};

use crate::experiment::experiment_type::ExperimentType;
use crate::network::intervention::{Intervention, ModelItem};
use crate::network::network::NetworkError;

/// An experiment: what is measured, and how the setup is changed before measuring
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExperimentDescription")]
pub struct ExperimentDescription {
    pub experiment_type: ExperimentType,
    #[serde(default)]
    interventions: Vec<Intervention>,
}

impl ExperimentDescription {
    /// Create a description of an experiment performed on the unchanged setup
    pub fn new(experiment_type: ExperimentType) -> Self {
        ExperimentDescription {
            experiment_type,
            interventions: Vec::new(),
        }
    }

    /// Attach interventions to the experiment
    ///
    /// Experiments can add or remove setup conditions (change the medium) and add activities
    /// (e.g. imports for supplemented metabolites). Removing an activity is a model revision, not
    /// an experimental intervention, and is rejected.
    ///
    /// # Examples
    /// ```rust
    /// use mnm_core::experiment::experiment_type::ExperimentType;
    /// use mnm_core::experiment::result::ExperimentDescription;
    /// use mnm_core::network::intervention::{Intervention, ModelItem};
    /// let exp = ExperimentDescription::new(ExperimentType::detection_activity("growth"))
    ///     .with_interventions(vec![Intervention::Add(ModelItem::setup("glc", "v1", "ext"))])
    ///     .unwrap();
    /// assert_eq!(exp.interventions().len(), 1);
    /// assert!(ExperimentDescription::new(ExperimentType::detection_activity("growth"))
    ///     .with_interventions(vec![Intervention::Remove(ModelItem::activity("R1"))])
    ///     .is_err());
    /// ```
    pub fn with_interventions(
        mut self,
        interventions: Vec<Intervention>,
    ) -> Result<Self, NetworkError> {
        for intervention in &interventions {
            if let Intervention::Remove(ModelItem::Activity(_)) = intervention {
                return Err(NetworkError::UnsupportedExperimentIntervention(
                    intervention.to_string(),
                ));
            }
        }
        self.interventions = interventions;
        Ok(self)
    }

    pub fn interventions(&self) -> &[Intervention] {
        &self.interventions
    }
}

/// Unchecked form read from JSON, validated through [`ExperimentDescription::with_interventions`]
#[derive(Deserialize)]
struct RawExperimentDescription {
    experiment_type: ExperimentType,
    #[serde(default)]
    interventions: Vec<Intervention>,
}

impl TryFrom<RawExperimentDescription> for ExperimentDescription {
    type Error = NetworkError;

    fn try_from(raw: RawExperimentDescription) -> Result<Self, Self::Error> {
        ExperimentDescription::new(raw.experiment_type).with_interventions(raw.interventions)
    }
}

impl From<ExperimentType> for ExperimentDescription {
    fn from(experiment_type: ExperimentType) -> Self {
        ExperimentDescription::new(experiment_type)
    }
}

/// The observed outcome of an experiment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// Used to identify the result (must be unique within an archive)
    pub id: String,
    /// The experiment that was performed
    pub description: ExperimentDescription,
    /// What was observed
    pub outcome: bool,
}

impl ExperimentResult {
    pub fn new(id: &str, description: impl Into<ExperimentDescription>, outcome: bool) -> Self {
        ExperimentResult {
            id: id.to_string(),
            description: description.into(),
            outcome,
        }
    }

    pub fn experiment_type(&self) -> &ExperimentType {
        &self.description.experiment_type
    }
}
