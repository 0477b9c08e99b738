//! The archive of working models and experiment results
//!
//! Everything that happens to the working set is recorded as an event with a sequence number.
//! The log is append-only, and the "results after model" queries used by incremental scoring
//! depend on the order of its events, so the archive is only ever changed through `&mut self`.
use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use log::info;
use thiserror::Error;

use crate::candidate::model::CandidateModel;
use crate::configuration::CONFIGURATION;
use crate::evaluate::consistency::{check_model, ConsistencyReport};
use crate::evaluate::parallel::parallel_map;
use crate::experiment::result::ExperimentResult;
use crate::network::network::{Network, NetworkError};

pub mod quality;

#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    ModelsAdded(Vec<String>),
    ResultsAdded(Vec<String>),
    ModelsRefuted(Vec<String>),
    ModelQualityUpdated { model: String, quality: f64 },
}

/// An entry of the archive log
#[derive(Clone, Debug, PartialEq)]
pub struct ArchiveEvent {
    pub sequence: u64,
    pub kind: EventKind,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ArchiveError {
    #[error("Model {0} was never added to the archive")]
    ModelNotInLog(String),
    #[error("Model {0} is not in the working set")]
    UnknownModel(String),
    #[error("Model {0} is already in the archive")]
    DuplicateModel(String),
    #[error("Result {0} is already in the archive")]
    DuplicateResult(String),
    #[error("Result {0} is not in the archive")]
    UnknownResult(String),
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Working models, recorded results and the log of what happened to them
#[derive(Clone, Debug, Default)]
pub struct Archive {
    events: Vec<ArchiveEvent>,
    working_models: IndexMap<String, CandidateModel>,
    results: IndexMap<String, ExperimentResult>,
    /// Sequence number of the event that added the model (kept after refutation)
    model_added_at: HashMap<String, u64>,
    result_added_at: HashMap<String, u64>,
    /// Narrowed relevance: model id to the ids of the results relevant to it
    relevance: HashMap<String, IndexSet<String>>,
}

impl Archive {
    pub fn new() -> Self {
        Archive::default()
    }

    fn record(&mut self, kind: EventKind) -> u64 {
        let sequence = self.events.len() as u64;
        info!("Archive event {}: {:?}", sequence, kind);
        self.events.push(ArchiveEvent { sequence, kind });
        sequence
    }

    pub fn events(&self) -> &[ArchiveEvent] {
        &self.events
    }

    /// Add models to the working set, recorded as a single event
    ///
    /// Nothing is added if one of the ids is already known to the archive.
    pub fn add_models(
        &mut self,
        models: impl IntoIterator<Item = CandidateModel>,
    ) -> Result<(), ArchiveError> {
        let models: Vec<CandidateModel> = models.into_iter().collect();
        let mut ids = IndexSet::new();
        for model in &models {
            if self.model_added_at.contains_key(&model.id) || !ids.insert(model.id.clone()) {
                return Err(ArchiveError::DuplicateModel(model.id.clone()));
            }
        }
        if models.is_empty() {
            return Ok(());
        }
        let sequence = self.record(EventKind::ModelsAdded(ids.into_iter().collect()));
        for model in models {
            self.model_added_at.insert(model.id.clone(), sequence);
            self.working_models.insert(model.id.clone(), model);
        }
        Ok(())
    }

    /// Record new results, as a single event
    ///
    /// Nothing is added if one of the ids is already known to the archive.
    pub fn add_results(
        &mut self,
        results: impl IntoIterator<Item = ExperimentResult>,
    ) -> Result<(), ArchiveError> {
        let results: Vec<ExperimentResult> = results.into_iter().collect();
        let mut ids = IndexSet::new();
        for result in &results {
            if self.results.contains_key(&result.id) || !ids.insert(result.id.clone()) {
                return Err(ArchiveError::DuplicateResult(result.id.clone()));
            }
        }
        if results.is_empty() {
            return Ok(());
        }
        let sequence = self.record(EventKind::ResultsAdded(ids.into_iter().collect()));
        for result in results {
            self.result_added_at.insert(result.id.clone(), sequence);
            self.results.insert(result.id.clone(), result);
        }
        Ok(())
    }

    pub fn working_models(&self) -> impl Iterator<Item = &CandidateModel> {
        self.working_models.values()
    }

    pub fn model(&self, id: &str) -> Option<&CandidateModel> {
        self.working_models.get(id)
    }

    fn working_model(&self, id: &str) -> Result<&CandidateModel, ArchiveError> {
        self.working_models
            .get(id)
            .ok_or_else(|| ArchiveError::UnknownModel(id.to_string()))
    }

    pub fn results(&self) -> impl Iterator<Item = &ExperimentResult> {
        self.results.values()
    }

    pub fn result(&self, id: &str) -> Option<&ExperimentResult> {
        self.results.get(id)
    }

    /// Results recorded after the event that added the model
    pub fn results_after_model(&self, model: &str) -> Result<Vec<&ExperimentResult>, ArchiveError> {
        let added = *self
            .model_added_at
            .get(model)
            .ok_or_else(|| ArchiveError::ModelNotInLog(model.to_string()))?;
        Ok(self
            .results
            .values()
            .filter(|r| self.result_added_at.get(&r.id).is_some_and(|at| *at > added))
            .collect())
    }

    /// Restrict the results relevant to a model to the given ones
    pub fn set_relevant(
        &mut self,
        model: &str,
        results: impl IntoIterator<Item = String>,
    ) -> Result<(), ArchiveError> {
        self.working_model(model)?;
        let results: IndexSet<String> = results.into_iter().collect();
        if let Some(unknown) = results.iter().find(|r| !self.results.contains_key(*r)) {
            return Err(ArchiveError::UnknownResult(unknown.clone()));
        }
        self.relevance.insert(model.to_string(), results);
        Ok(())
    }

    /// Every result is relevant to a model unless its relevance was narrowed
    pub fn is_relevant(&self, model: &str, result: &str) -> bool {
        match self.relevance.get(model) {
            Some(relevant) => relevant.contains(result),
            None => self.results.contains_key(result),
        }
    }

    pub fn relevant_results(&self, model: &str) -> Result<Vec<&ExperimentResult>, ArchiveError> {
        self.working_model(model)?;
        Ok(self
            .results
            .values()
            .filter(|r| self.is_relevant(model, &r.id))
            .collect())
    }

    /// Compare a working model with its relevant results
    pub fn check_model(
        &self,
        network: &Network,
        model: &str,
    ) -> Result<ConsistencyReport, ArchiveError> {
        let relevant = self.relevant_results(model)?;
        Ok(check_model(
            network,
            self.working_model(model)?,
            relevant,
        )?)
    }

    /// Relevant results the model does not ignore and predicts correctly
    pub fn covered_results(
        &self,
        network: &Network,
        model: &str,
    ) -> Result<Vec<&ExperimentResult>, ArchiveError> {
        let report = self.check_model(network, model)?;
        Ok(report
            .covered
            .iter()
            .filter_map(|id| self.results.get(id))
            .collect())
    }

    /// Remove every working model that is inconsistent with one of its relevant results
    ///
    /// Returns the ids of the removed models. They stay in the log, so their
    /// `results_after_model` remains available.
    pub fn refute_inconsistent(&mut self, network: &Network) -> Result<Vec<String>, ArchiveError> {
        let processes = CONFIGURATION.read().unwrap().processes;
        let ids: Vec<&str> = self.working_models.keys().map(|id| id.as_str()).collect();
        let reports = parallel_map(&ids, processes, |id| self.check_model(network, id));
        let mut refuted = Vec::new();
        for report in reports {
            let report = report?;
            if !report.is_consistent() {
                refuted.push(report.model_id);
            }
        }
        if refuted.is_empty() {
            return Ok(refuted);
        }
        for id in &refuted {
            self.working_models.shift_remove(id);
            self.relevance.remove(id);
        }
        self.record(EventKind::ModelsRefuted(refuted.clone()));
        Ok(refuted)
    }

    pub(crate) fn set_score(&mut self, model: &str, score: f64) -> Result<(), ArchiveError> {
        self.working_models
            .get_mut(model)
            .ok_or_else(|| ArchiveError::UnknownModel(model.to_string()))?
            .score = score;
        Ok(())
    }

    /// Set the quality of a working model, recording an event when it changes
    ///
    /// Returns whether the quality changed.
    pub fn update_quality(&mut self, model: &str, quality: f64) -> Result<bool, ArchiveError> {
        let working = self
            .working_models
            .get_mut(model)
            .ok_or_else(|| ArchiveError::UnknownModel(model.to_string()))?;
        if working.quality == quality {
            return Ok(false);
        }
        working.quality = quality;
        self.record(EventKind::ModelQualityUpdated {
            model: model.to_string(),
            quality,
        });
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::experiment_type::ExperimentType;
    use crate::network::intervention::{Intervention, ModelItem};
    use crate::test_utils::small_cell;
    use pretty_assertions::assert_eq;

    fn growth(id: &str, outcome: bool) -> ExperimentResult {
        ExperimentResult::new(id, ExperimentType::detection_activity("growth"), outcome)
    }

    #[test]
    fn events_are_sequenced() {
        let (_, base) = small_cell();
        let mut archive = Archive::new();
        archive.add_results([growth("r0", true)]).unwrap();
        archive.add_models([base.clone()]).unwrap();
        archive
            .add_results([growth("r1", true), growth("r2", true)])
            .unwrap();
        assert_eq!(
            archive.events(),
            &[
                ArchiveEvent {
                    sequence: 0,
                    kind: EventKind::ResultsAdded(vec!["r0".to_string()]),
                },
                ArchiveEvent {
                    sequence: 1,
                    kind: EventKind::ModelsAdded(vec!["base".to_string()]),
                },
                ArchiveEvent {
                    sequence: 2,
                    kind: EventKind::ResultsAdded(vec!["r1".to_string(), "r2".to_string()]),
                },
            ]
        );
        let after: Vec<&str> = archive
            .results_after_model("base")
            .unwrap()
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(after, vec!["r1", "r2"]);
        assert_eq!(
            archive.results_after_model("nope"),
            Err(ArchiveError::ModelNotInLog("nope".to_string()))
        );
    }

    #[test]
    fn duplicates_are_rejected() {
        let (_, base) = small_cell();
        let mut archive = Archive::new();
        archive.add_models([base.clone()]).unwrap();
        assert_eq!(
            archive.add_models([base.revised("m1", []), base.clone()]),
            Err(ArchiveError::DuplicateModel("base".to_string()))
        );
        assert_eq!(archive.working_models().count(), 1);
        assert_eq!(
            archive.add_results([growth("r0", true), growth("r0", false)]),
            Err(ArchiveError::DuplicateResult("r0".to_string()))
        );
        assert_eq!(archive.results().count(), 0);
        assert_eq!(archive.events().len(), 1);
    }

    #[test]
    fn relevance_can_be_narrowed() {
        let (network, base) = small_cell();
        let mut archive = Archive::new();
        archive.add_models([base]).unwrap();
        archive
            .add_results([growth("r0", true), growth("r1", false)])
            .unwrap();
        assert!(archive.is_relevant("base", "r1"));
        assert_eq!(archive.relevant_results("base").unwrap().len(), 2);
        assert_eq!(archive.check_model(&network, "base").unwrap().inconsistent, vec!["r1"]);

        archive.set_relevant("base", ["r0".to_string()]).unwrap();
        assert!(!archive.is_relevant("base", "r1"));
        assert!(archive.check_model(&network, "base").unwrap().is_consistent());
        let covered: Vec<&str> = archive
            .covered_results(&network, "base")
            .unwrap()
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(covered, vec!["r0"]);
        assert_eq!(
            archive.set_relevant("base", ["r9".to_string()]),
            Err(ArchiveError::UnknownResult("r9".to_string()))
        );
        assert_eq!(
            archive.relevant_results("m9").err(),
            Some(ArchiveError::UnknownModel("m9".to_string()))
        );
    }

    #[test]
    fn inconsistent_models_are_refuted() {
        let (network, base) = small_cell();
        let starved = base.revised(
            "starved",
            [Intervention::Remove(ModelItem::setup("glc", "v1", "ext"))],
        );
        let mut ignoring = starved.revised("ignoring", []);
        ignoring.ignored_results.insert("r0".to_string());
        let mut archive = Archive::new();
        archive.add_models([base, starved, ignoring]).unwrap();
        archive.add_results([growth("r0", true)]).unwrap();

        assert_eq!(archive.refute_inconsistent(&network).unwrap(), vec!["starved"]);
        let working: Vec<&str> = archive.working_models().map(|m| m.id.as_str()).collect();
        assert_eq!(working, vec!["base", "ignoring"]);
        assert_eq!(
            archive.events().last().map(|e| &e.kind),
            Some(&EventKind::ModelsRefuted(vec!["starved".to_string()]))
        );
        assert!(archive.results_after_model("starved").is_ok());
        // Nothing left to refute, nothing recorded
        assert!(archive.refute_inconsistent(&network).unwrap().is_empty());
        assert_eq!(archive.events().len(), 3);
    }

    #[test]
    fn quality_updates_are_recorded_once() {
        let (_, base) = small_cell();
        let mut archive = Archive::new();
        archive.add_models([base]).unwrap();
        assert!(archive.update_quality("base", 2.).unwrap());
        assert!(!archive.update_quality("base", 2.).unwrap());
        assert_eq!(archive.model("base").unwrap().quality(), 2.);
        assert_eq!(archive.events().len(), 2);
        assert_eq!(
            archive.update_quality("m9", 1.),
            Err(ArchiveError::UnknownModel("m9".to_string()))
        );
    }
}
