//! This module provides the CandidateModel struct, one competing hypothesis about the network
use derive_builder::Builder;
use indexmap::IndexSet;

use crate::candidate::membership::Membership;
use crate::network::entity::Species;
use crate::network::intervention::{Intervention, ModelItem};
use crate::network::network::Network;

/// A candidate model: a base network selection plus the interventions applied to it
#[derive(Builder, Clone, Debug, PartialEq)]
pub struct CandidateModel {
    /// Used to identify the model
    #[builder(setter(into))]
    pub id: String,
    /// Species present before any activity takes place
    #[builder(default = "IndexSet::new()")]
    pub setup_conditions: IndexSet<Species>,
    /// Ids of the activities contributed by the base model
    #[builder(default = "IndexSet::new()")]
    pub intermediate_activities: IndexSet<String>,
    /// Delta applied on top of the setup and intermediate activities
    #[builder(default = "Vec::new()")]
    pub interventions: Vec<Intervention>,
    /// Species that have to be synthesizable, only checked for base models
    #[builder(default = "IndexSet::new()")]
    pub termination_conditions: IndexSet<Species>,
    /// Ids of results this model is allowed to disagree with
    #[builder(default = "IndexSet::new()")]
    pub ignored_results: IndexSet<String>,
    /// Raw score, managed by the archive
    #[builder(setter(skip))]
    pub(crate) score: f64,
    /// Normalized score, managed by the archive
    #[builder(setter(skip))]
    pub(crate) quality: f64,
}

impl CandidateModel {
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn quality(&self) -> f64 {
        self.quality
    }

    /// Copy of this model under a new id with additional interventions appended
    ///
    /// # Examples
    /// ```rust
    /// use mnm_core::candidate::model::CandidateModelBuilder;
    /// use mnm_core::network::intervention::{Intervention, ModelItem};
    /// let base = CandidateModelBuilder::default().id("base").build().unwrap();
    /// let revised = base.revised("m1", [Intervention::Add(ModelItem::activity("R2"))]);
    /// assert_eq!(revised.id, "m1");
    /// assert_eq!(revised.interventions.len(), 1);
    /// ```
    pub fn revised(
        &self,
        id: &str,
        interventions: impl IntoIterator<Item = Intervention>,
    ) -> CandidateModel {
        let mut model = self.clone();
        model.id = id.to_string();
        model.interventions.extend(interventions);
        model.score = 0.;
        model.quality = 0.;
        model
    }

    /// Items added to the model before interventions: setup conditions and base activities
    pub fn base_items(&self) -> impl Iterator<Item = ModelItem> + '_ {
        self.setup_conditions
            .iter()
            .cloned()
            .map(ModelItem::Setup)
            .chain(
                self.intermediate_activities
                    .iter()
                    .cloned()
                    .map(ModelItem::Activity),
            )
    }

    /// Whether some activity of the network is in one model but not in the other
    pub fn differs_from(&self, network: &Network, other: &CandidateModel) -> bool {
        let ours = Membership::of(self);
        let theirs = Membership::of(other);
        network
            .activities()
            .any(|a| ours.activity_in_model(&a.id) != theirs.activity_in_model(&a.id))
    }
}
