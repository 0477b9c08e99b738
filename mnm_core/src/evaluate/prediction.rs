//! Predictions of candidate models for experiments
//!
//! A prediction is only made once the elimination fixpoint has converged. Growth is decided
//! first: when an in-model growth activity is not active the model is not viable, and the only
//! prediction it makes is that growth does not take place.
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use indexmap::IndexSet;
use log::trace;

use crate::candidate::model::CandidateModel;
use crate::evaluate::ModelEvaluation;
use crate::experiment::experiment_type::ExperimentType;
use crate::experiment::result::ExperimentDescription;
use crate::network::activity::{Activity, ActivityKind};
use crate::network::entity::{Entity, EntityKey, EntityKind, Species};
use crate::network::intervention::Intervention;
use crate::network::network::{Network, NetworkError};

/// Number of chained reactions considered by the two factor experiment
const ADAM_DISTANCE: usize = 2;

impl ModelEvaluation {
    /// Whether every in-model growth activity is active
    pub fn growth_viable(&self, network: &Network) -> bool {
        self.membership()
            .activities()
            .filter_map(|id| network.activity(id))
            .filter(|a| a.kind == ActivityKind::Growth)
            .all(|a| self.active(&a.id))
    }

    /// Prediction for the experiment type, `None` when the model is indifferent to it
    pub fn predict(&self, network: &Network, experiment_type: &ExperimentType) -> Option<bool> {
        if !self.growth_viable(network) {
            return match experiment_type {
                ExperimentType::DetectionActivity { activity_id, .. } => network
                    .activity(activity_id)
                    .filter(|a| a.kind == ActivityKind::Growth)
                    .filter(|a| self.in_model(&a.id) && !self.active(&a.id))
                    .map(|_| false),
                _ => None,
            };
        }

        match experiment_type {
            ExperimentType::DetectionActivity { activity_id, .. } => self
                .in_model(activity_id)
                .then(|| self.active(activity_id)),
            ExperimentType::DetectionEntity { entity_id, .. } => {
                if self.synthesizable_anywhere(entity_id) || self.in_setup(entity_id, None) {
                    Some(true)
                } else {
                    self.involved(entity_id).then_some(false)
                }
            }
            ExperimentType::LocalisationEntity {
                entity_id,
                compartment_id,
                ..
            } => {
                if self.synthesizable_in(entity_id, compartment_id)
                    || self.in_setup(entity_id, Some(compartment_id))
                {
                    Some(true)
                } else {
                    self.involved(entity_id).then_some(false)
                }
            }
            ExperimentType::ReconstructionActivity { activity_id, .. } => network
                .activity(activity_id)
                .filter(|a| self.in_model(&a.id))
                .filter(|a| !a.requires_catalyst() && !a.requires_transporter())
                .map(|_| true),
            ExperimentType::ReconstructionEnzReaction {
                reaction_id,
                enzyme_id,
                ..
            } => {
                let reaction = network.activity(reaction_id)?;
                if !self.in_model(reaction_id) || !reaction.requires_catalyst() {
                    return None;
                }
                self.reconstruction(network, enzyme_id, |v| {
                    network_has(network, enzyme_id, v, |e| e.catalyses(reaction_id))
                })
            }
            ExperimentType::ReconstructionTransporterRequired {
                transport_activity_id,
                transporter_id,
                ..
            } => {
                let transport = network.activity(transport_activity_id)?;
                if !self.in_model(transport_activity_id) || !transport.requires_transporter() {
                    return None;
                }
                self.reconstruction(network, transporter_id, |v| {
                    network_has(network, transporter_id, v, |e| e.transports(transport_activity_id))
                })
            }
            ExperimentType::AdamTwoFactor {
                gene_id,
                metabolite_id,
                ..
            } => {
                if self.adam_two_factor(network, gene_id, metabolite_id) {
                    Some(true)
                } else {
                    let gene_involved = self
                        .involved_versions(gene_id)
                        .any(|v| network.entity_kind(gene_id, v) == Some(EntityKind::Gene));
                    let metabolite_involved = self
                        .involved_versions(metabolite_id)
                        .any(|v| network.entity_kind(metabolite_id, v) == Some(EntityKind::Metabolite));
                    (gene_involved && metabolite_involved).then_some(false)
                }
            }
        }
    }

    /// Shared rule of the in vitro reconstructions: true when an involved version of the entity
    /// has the property, false when an involved version lacks it but another version has it
    fn reconstruction(
        &self,
        network: &Network,
        entity: &str,
        has_property: impl Fn(&str) -> bool,
    ) -> Option<bool> {
        let mut involved = self.involved_versions(entity).peekable();
        involved.peek()?;
        let (with, without): (Vec<&str>, Vec<&str>) = involved.partition(|v| has_property(v));
        if !with.is_empty() {
            return Some(true);
        }
        let other_version_has_it = network
            .versions_of(entity)
            .any(|e| !without.contains(&e.version.as_str()) && has_property(&e.version));
        other_version_has_it.then_some(false)
    }

    /// Whether an expression of the gene leads to a catalyst of a reaction that is at most
    /// [`ADAM_DISTANCE`] active reactions away from the metabolite
    fn adam_two_factor(&self, network: &Network, gene: &str, metabolite: &str) -> bool {
        let in_model: Vec<&Activity> = self
            .membership()
            .activities()
            .filter_map(|id| network.activity(id))
            .collect();

        let expressions = in_model
            .iter()
            .filter(|a| a.kind == ActivityKind::Expression)
            .filter(|a| a.substrates().any(|s| s.entity == gene));
        for expression in expressions {
            // Catalysts made directly by the expression or by at most two more activities
            let carriers = expand(expression.products().collect(), ADAM_DISTANCE, |layer| {
                in_model
                    .iter()
                    .filter(|a| a.substrates().any(|s| layer.contains(s)))
                    .flat_map(|a| a.products())
                    .collect()
            });
            for carrier in &carriers {
                let Some(entity) = network.entity(&carrier.key()) else {
                    continue;
                };
                let catalysed = in_model.iter().filter(|r| {
                    r.kind == ActivityKind::Reaction
                        && entity.catalyses(&r.id)
                        && carrier_reaches(network, carrier, r)
                });
                for reaction in catalysed {
                    if self.within_distance(network, &in_model, reaction, metabolite) {
                        trace!(
                            "{}: {} catalyses {} near {}",
                            self.model_id(),
                            carrier,
                            reaction.id,
                            metabolite
                        );
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Whether the metabolite participates in the reaction or is produced from its products by a
    /// chain of at most [`ADAM_DISTANCE`] active reactions
    ///
    /// Substrates of the reaction match at distance 0, but the chain only continues downstream.
    fn within_distance(
        &self,
        network: &Network,
        in_model: &[&Activity],
        reaction: &Activity,
        metabolite: &str,
    ) -> bool {
        let is_target = |s: &Species| {
            s.entity == metabolite
                && network.entity_kind(&s.entity, &s.version) == Some(EntityKind::Metabolite)
        };
        if reaction.substrates().any(is_target) {
            return true;
        }
        let near = expand(reaction.products().collect(), ADAM_DISTANCE, |layer| {
            in_model
                .iter()
                .filter(|a| a.kind == ActivityKind::Reaction && self.active(&a.id))
                .filter(|a| a.substrates().any(|s| layer.contains(s)))
                .flat_map(|a| a.products())
                .collect()
        });
        near.iter().any(|s| is_target(s))
    }
}

/// Breadth first expansion of `start` by `depth` layers of `step`
fn expand<'a>(
    start: IndexSet<&'a Species>,
    depth: usize,
    step: impl Fn(&IndexSet<&'a Species>) -> Vec<&'a Species>,
) -> IndexSet<&'a Species> {
    let mut seen = start.clone();
    let mut layer = start;
    for _ in 0..depth {
        let next: IndexSet<&Species> = step(&layer)
            .into_iter()
            .filter(|s| !seen.contains(*s))
            .collect();
        if next.is_empty() {
            break;
        }
        seen.extend(next.iter().copied());
        layer = next;
    }
    seen
}

/// The reaction needs a catalyst, and the carrier sits in a compartment connected to one where
/// it is needed
fn carrier_reaches(network: &Network, carrier: &Species, reaction: &Activity) -> bool {
    reaction
        .catalyst_compartments()
        .any(|c| network.connected(&carrier.compartment, c))
}

fn network_has(
    network: &Network,
    entity: &str,
    version: &str,
    property: impl Fn(&Entity) -> bool,
) -> bool {
    network
        .entity(&EntityKey::new(entity, version))
        .is_some_and(property)
}

/// Prediction of the model for the experiment, with the experiment's interventions applied
pub fn predict(
    network: &Network,
    model: &CandidateModel,
    experiment: &ExperimentDescription,
) -> Result<Option<bool>, NetworkError> {
    let evaluation = ModelEvaluation::with_interventions(network, model, experiment.interventions())?;
    Ok(evaluation.predict(network, &experiment.experiment_type))
}

/// Whether the model makes no prediction for the experiment
pub fn indifferent(
    network: &Network,
    model: &CandidateModel,
    experiment: &ExperimentDescription,
) -> Result<bool, NetworkError> {
    Ok(predict(network, model, experiment)?.is_none())
}

/// Predicts many experiments for one model
///
/// Experiments sharing the same interventions share one evaluation of the model.
pub struct ModelPredictor<'a> {
    network: &'a Network,
    model: &'a CandidateModel,
    evaluations: HashMap<Vec<Intervention>, ModelEvaluation>,
}

impl<'a> ModelPredictor<'a> {
    pub fn new(network: &'a Network, model: &'a CandidateModel) -> Self {
        ModelPredictor {
            network,
            model,
            evaluations: HashMap::new(),
        }
    }

    pub fn model(&self) -> &CandidateModel {
        self.model
    }

    /// Evaluation of the model with the given experiment interventions
    pub fn evaluation(
        &mut self,
        interventions: &[Intervention],
    ) -> Result<&ModelEvaluation, NetworkError> {
        match self.evaluations.entry(interventions.to_vec()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(ModelEvaluation::with_interventions(
                self.network,
                self.model,
                interventions,
            )?)),
        }
    }

    pub fn predict(
        &mut self,
        experiment: &ExperimentDescription,
    ) -> Result<Option<bool>, NetworkError> {
        let network = self.network;
        let evaluation = self.evaluation(experiment.interventions())?;
        Ok(evaluation.predict(network, &experiment.experiment_type))
    }
}
