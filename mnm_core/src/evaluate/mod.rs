//! Evaluation of candidate models against the network: the elimination fixpoint, predictions
//! for experiments and consistency with recorded results
use std::fmt::{Display, Formatter};

use indexmap::{IndexMap, IndexSet};
use log::warn;
use thiserror::Error;

use crate::candidate::membership::Membership;
use crate::candidate::model::CandidateModel;
use crate::evaluate::elimination::{ActiveNetwork, EliminationEngine};
use crate::network::entity::Species;
use crate::network::intervention::Intervention;
use crate::network::network::{Network, NetworkError};

pub mod consistency;
pub mod elimination;
pub mod parallel;
pub mod prediction;

/// Converged state of one model, possibly extended by the interventions of an experiment
#[derive(Clone, Debug)]
pub struct ModelEvaluation {
    membership: Membership,
    active: ActiveNetwork,
    /// Entity id to the versions referenced by the in-model activities and setup
    involved: IndexMap<String, IndexSet<String>>,
}

impl ModelEvaluation {
    /// Evaluate the model as it is
    pub fn new(network: &Network, model: &CandidateModel) -> Result<Self, NetworkError> {
        Self::with_interventions(network, model, &[])
    }

    /// Evaluate the model with `extra` interventions applied after its own
    pub fn with_interventions(
        network: &Network,
        model: &CandidateModel,
        extra: &[Intervention],
    ) -> Result<Self, NetworkError> {
        let membership = Membership::resolve(network, model, extra)?;
        let active = EliminationEngine::new(network, &membership).converge();

        let mut involved: IndexMap<String, IndexSet<String>> = IndexMap::new();
        let mut involve = |species: &Species| {
            involved
                .entry(species.entity.clone())
                .or_default()
                .insert(species.version.clone());
        };
        membership.setup().for_each(&mut involve);
        for activity in membership.activities().filter_map(|id| network.activity(id)) {
            activity.substrates().for_each(&mut involve);
            activity.products().for_each(&mut involve);
        }

        Ok(ModelEvaluation {
            membership,
            active,
            involved,
        })
    }

    pub fn model_id(&self) -> &str {
        self.membership.model_id()
    }

    pub fn membership(&self) -> &Membership {
        &self.membership
    }

    pub fn active_network(&self) -> &ActiveNetwork {
        &self.active
    }

    pub fn in_model(&self, activity: &str) -> bool {
        self.membership.activity_in_model(activity)
    }

    /// In-model and not eliminated
    pub fn active(&self, activity: &str) -> bool {
        self.active.active(activity)
    }

    pub fn eliminated(&self, activity: &str) -> bool {
        self.active.eliminated(activity)
    }

    pub fn synthesizable(&self, species: &Species) -> bool {
        self.active.synthesizable(species)
    }

    /// Some version of the entity is synthesizable in the compartment
    pub fn synthesizable_in(&self, entity: &str, compartment: &str) -> bool {
        self.active
            .synthesizable_species()
            .iter()
            .any(|s| s.entity == entity && s.compartment == compartment)
    }

    /// Some version of the entity is synthesizable in some compartment
    pub fn synthesizable_anywhere(&self, entity: &str) -> bool {
        self.active
            .synthesizable_species()
            .iter()
            .any(|s| s.entity == entity)
    }

    /// Some version of the entity is part of the setup, in `compartment` if given
    pub fn in_setup(&self, entity: &str, compartment: Option<&str>) -> bool {
        self.membership
            .setup()
            .any(|s| s.entity == entity && compartment.map_or(true, |c| s.compartment == c))
    }

    /// Referenced by an in-model activity or by the setup
    pub fn involved(&self, entity: &str) -> bool {
        self.involved.contains_key(entity)
    }

    /// Versions of the entity referenced by the in-model activities or by the setup
    pub fn involved_versions(&self, entity: &str) -> impl Iterator<Item = &str> {
        self.involved
            .get(entity)
            .into_iter()
            .flat_map(|versions| versions.iter().map(|v| v.as_str()))
    }

    /// Check the conditions a base model has to satisfy
    ///
    /// Every termination condition of `model` has to be synthesizable, no entity may be involved
    /// in more than one version, and no in-model activity may be eliminated. All violations are
    /// reported together.
    pub fn validate_base(&self, model: &CandidateModel) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        for species in &model.termination_conditions {
            if !self.synthesizable(species) {
                violations.push(BaseModelViolation::UnreachableTermination(species.clone()));
            }
        }
        for (entity, versions) in &self.involved {
            if versions.len() > 1 {
                violations.push(BaseModelViolation::DuplicateVersions {
                    entity: entity.clone(),
                    versions: versions.iter().cloned().collect(),
                });
            }
        }
        for activity in self.active.eliminated_activities() {
            violations.push(BaseModelViolation::InactiveActivity(activity.clone()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            warn!(
                "Base model {} is invalid with {} violations",
                model.id,
                violations.len()
            );
            Err(ValidationError::InvalidBaseModel {
                model: model.id.clone(),
                violations,
            })
        }
    }
}

/// Evaluate the model as it is
pub fn evaluate(network: &Network, model: &CandidateModel) -> Result<ModelEvaluation, NetworkError> {
    ModelEvaluation::new(network, model)
}

/// One reason a base model is not usable as a starting point for revision
#[derive(Clone, Debug, PartialEq)]
pub enum BaseModelViolation {
    /// A termination condition is not synthesizable
    UnreachableTermination(Species),
    /// The model involves several versions of the same entity
    DuplicateVersions {
        entity: String,
        versions: Vec<String>,
    },
    /// An in-model activity is eliminated
    InactiveActivity(String),
}

impl Display for BaseModelViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BaseModelViolation::UnreachableTermination(species) => {
                write!(f, "termination condition {species} is not synthesizable")
            }
            BaseModelViolation::DuplicateVersions { entity, versions } => {
                write!(f, "entity {entity} is involved in versions {}", versions.join(", "))
            }
            BaseModelViolation::InactiveActivity(activity) => {
                write!(f, "activity {activity} is in the model but not active")
            }
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Base model {model} is invalid: {violations:?}")]
    InvalidBaseModel {
        model: String,
        violations: Vec<BaseModelViolation>,
    },
    #[error("Base model {model} is inconsistent with results {results:?}")]
    Inconsistent { model: String, results: Vec<String> },
    #[error(transparent)]
    Network(#[from] NetworkError),
}
