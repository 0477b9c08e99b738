//! The closed set of experiment types a model can make predictions for
use serde::{Deserialize, Serialize};

use crate::configuration::CONFIGURATION;

/// Reward for covering a result of an experiment, and penalty for ignoring one
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub covering_reward: f64,
    pub ignoring_penalty: f64,
}

impl Weights {
    pub fn new(covering_reward: f64, ignoring_penalty: f64) -> Self {
        Weights {
            covering_reward,
            ignoring_penalty,
        }
    }
}

impl Default for Weights {
    fn default() -> Self {
        let config = CONFIGURATION.read().unwrap();
        Weights {
            covering_reward: config.covering_reward,
            ignoring_penalty: config.ignoring_penalty,
        }
    }
}

/// Kind of experiment together with the ids it is about
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExperimentType {
    /// Is the entity detectable anywhere in the cell
    DetectionEntity {
        entity_id: String,
        #[serde(default)]
        weights: Weights,
    },
    /// Is the entity detectable in the given compartment
    LocalisationEntity {
        entity_id: String,
        compartment_id: String,
        #[serde(default)]
        weights: Weights,
    },
    /// Does the activity (e.g. growth) take place
    DetectionActivity {
        activity_id: String,
        #[serde(default)]
        weights: Weights,
    },
    /// Gene deletion combined with a metabolite supplement
    AdamTwoFactor {
        gene_id: String,
        metabolite_id: String,
        #[serde(default)]
        weights: Weights,
    },
    /// In vitro reconstruction of an activity without any cofactor
    ReconstructionActivity {
        activity_id: String,
        #[serde(default)]
        weights: Weights,
    },
    /// In vitro reconstruction of a reaction with a candidate enzyme
    ReconstructionEnzReaction {
        reaction_id: String,
        enzyme_id: String,
        #[serde(default)]
        weights: Weights,
    },
    /// In vitro reconstruction of a transport with a candidate transporter
    ReconstructionTransporterRequired {
        transport_activity_id: String,
        transporter_id: String,
        #[serde(default)]
        weights: Weights,
    },
}

impl ExperimentType {
    pub fn detection_entity(entity_id: &str) -> Self {
        ExperimentType::DetectionEntity {
            entity_id: entity_id.to_string(),
            weights: Weights::default(),
        }
    }

    pub fn localisation_entity(entity_id: &str, compartment_id: &str) -> Self {
        ExperimentType::LocalisationEntity {
            entity_id: entity_id.to_string(),
            compartment_id: compartment_id.to_string(),
            weights: Weights::default(),
        }
    }

    pub fn detection_activity(activity_id: &str) -> Self {
        ExperimentType::DetectionActivity {
            activity_id: activity_id.to_string(),
            weights: Weights::default(),
        }
    }

    pub fn adam_two_factor(gene_id: &str, metabolite_id: &str) -> Self {
        ExperimentType::AdamTwoFactor {
            gene_id: gene_id.to_string(),
            metabolite_id: metabolite_id.to_string(),
            weights: Weights::default(),
        }
    }

    pub fn reconstruction_activity(activity_id: &str) -> Self {
        ExperimentType::ReconstructionActivity {
            activity_id: activity_id.to_string(),
            weights: Weights::default(),
        }
    }

    pub fn reconstruction_enz_reaction(reaction_id: &str, enzyme_id: &str) -> Self {
        ExperimentType::ReconstructionEnzReaction {
            reaction_id: reaction_id.to_string(),
            enzyme_id: enzyme_id.to_string(),
            weights: Weights::default(),
        }
    }

    pub fn reconstruction_transporter_required(
        transport_activity_id: &str,
        transporter_id: &str,
    ) -> Self {
        ExperimentType::ReconstructionTransporterRequired {
            transport_activity_id: transport_activity_id.to_string(),
            transporter_id: transporter_id.to_string(),
            weights: Weights::default(),
        }
    }

    /// Replace the weights of the experiment type
    pub fn with_weights(mut self, new_weights: Weights) -> Self {
        match &mut self {
            ExperimentType::DetectionEntity { weights, .. }
            | ExperimentType::LocalisationEntity { weights, .. }
            | ExperimentType::DetectionActivity { weights, .. }
            | ExperimentType::AdamTwoFactor { weights, .. }
            | ExperimentType::ReconstructionActivity { weights, .. }
            | ExperimentType::ReconstructionEnzReaction { weights, .. }
            | ExperimentType::ReconstructionTransporterRequired { weights, .. } => {
                *weights = new_weights
            }
        }
        self
    }

    pub fn weights(&self) -> Weights {
        match self {
            ExperimentType::DetectionEntity { weights, .. }
            | ExperimentType::LocalisationEntity { weights, .. }
            | ExperimentType::DetectionActivity { weights, .. }
            | ExperimentType::AdamTwoFactor { weights, .. }
            | ExperimentType::ReconstructionActivity { weights, .. }
            | ExperimentType::ReconstructionEnzReaction { weights, .. }
            | ExperimentType::ReconstructionTransporterRequired { weights, .. } => *weights,
        }
    }

    pub fn covering_reward(&self) -> f64 {
        self.weights().covering_reward
    }

    pub fn ignoring_penalty(&self) -> f64 {
        self.weights().ignoring_penalty
    }

    /// Stable tag of the experiment kind, as used in the solver vocabulary
    pub fn kind_tag(&self) -> &'static str {
        match self {
            ExperimentType::DetectionEntity { .. } => "detection_entity_exp",
            ExperimentType::LocalisationEntity { .. } => "localisation_entity_exp",
            ExperimentType::DetectionActivity { .. } => "detection_activity_exp",
            ExperimentType::AdamTwoFactor { .. } => "adam_two_factor_exp",
            ExperimentType::ReconstructionActivity { .. } => "basic_reconstruction_exp",
            ExperimentType::ReconstructionEnzReaction { .. } => "enz_reconstruction_exp",
            ExperimentType::ReconstructionTransporterRequired { .. } => {
                "transp_reconstruction_exp"
            }
        }
    }

    /// Whether two experiment types describe the same experiment, ignoring the weights
    pub fn same_experiment(&self, other: &ExperimentType) -> bool {
        self.clone().with_weights(Weights::new(0., 0.))
            == other.clone().with_weights(Weights::new(0., 0.))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_replaced() {
        let exp = ExperimentType::adam_two_factor("g1", "m1").with_weights(Weights::new(3., 0.5));
        assert_eq!(exp.covering_reward(), 3.);
        assert_eq!(exp.ignoring_penalty(), 0.5);
        assert_eq!(exp.kind_tag(), "adam_two_factor_exp");
    }

    #[test]
    fn same_experiment_ignores_weights() {
        let a = ExperimentType::localisation_entity("m1", "cyt").with_weights(Weights::new(1., 1.));
        let b = ExperimentType::localisation_entity("m1", "cyt").with_weights(Weights::new(5., 2.));
        let c = ExperimentType::localisation_entity("m1", "ext");
        assert!(a.same_experiment(&b));
        assert!(!a.same_experiment(&c));
    }

    #[test]
    fn json_tagging() {
        let exp = ExperimentType::reconstruction_enz_reaction("R1", "enz")
            .with_weights(Weights::new(2., 1.));
        let text = serde_json::to_string(&exp).unwrap();
        assert!(text.contains("\"type\":\"reconstruction_enz_reaction\""));
        let back: ExperimentType = serde_json::from_str(&text).unwrap();
        assert_eq!(back, exp);
    }
}
