//! Scoring of the working models and the normalized quality derived from it
//!
//! A strategy picks which results count (all of them, or only those recorded after the model
//! was added) and whether the penalties of ignored results are subtracted from the covered
//! reward.
use log::debug;
use serde::{Deserialize, Serialize};

use crate::archive::{Archive, ArchiveError};
use crate::configuration::CONFIGURATION;
use crate::evaluate::parallel::parallel_map;
use crate::network::network::Network;

/// Which results count towards the score
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultScope {
    #[default]
    All,
    /// Only results recorded after the model was added to the archive
    AfterModel,
}

/// How covered and ignored results are combined
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMeasure {
    Covered,
    #[default]
    CoveredMinusIgnored,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityStrategy {
    pub scope: ResultScope,
    pub measure: ScoreMeasure,
}

impl QualityStrategy {
    pub const NUMBER_ALL_COVERED: QualityStrategy = QualityStrategy {
        scope: ResultScope::All,
        measure: ScoreMeasure::Covered,
    };
    pub const NUMBER_ALL_COVERED_MINUS_IGNORED: QualityStrategy = QualityStrategy {
        scope: ResultScope::All,
        measure: ScoreMeasure::CoveredMinusIgnored,
    };
    pub const NUMBER_NEW_COVERED: QualityStrategy = QualityStrategy {
        scope: ResultScope::AfterModel,
        measure: ScoreMeasure::Covered,
    };
    pub const NUMBER_NEW_COVERED_MINUS_IGNORED: QualityStrategy = QualityStrategy {
        scope: ResultScope::AfterModel,
        measure: ScoreMeasure::CoveredMinusIgnored,
    };
}

/// Shift the scores so the smallest becomes 1 when any of them is below 1
///
/// # Examples
/// ```rust
/// use mnm_core::archive::quality::normalize;
/// assert_eq!(normalize(&[-2., 0., 3.]), vec![1., 3., 6.]);
/// assert_eq!(normalize(&[1., 4.]), vec![1., 4.]);
/// ```
pub fn normalize(scores: &[f64]) -> Vec<f64> {
    let smallest = scores.iter().copied().fold(f64::INFINITY, f64::min);
    if smallest < 1. {
        let shift = smallest.abs() + 1.;
        scores.iter().map(|s| s + shift).collect()
    } else {
        scores.to_vec()
    }
}

/// Computes scores and qualities of the working models of an archive
#[derive(Clone, Debug)]
pub struct QualityModule {
    pub strategy: QualityStrategy,
    /// Number of worker threads used to compute the scores
    pub processes: usize,
}

impl QualityModule {
    pub fn new(strategy: QualityStrategy, processes: usize) -> Self {
        QualityModule {
            strategy,
            processes,
        }
    }

    /// Module using the strategy and number of processes of the configuration
    pub fn from_configuration() -> Self {
        let config = CONFIGURATION.read().unwrap();
        QualityModule::new(config.quality_strategy, config.processes)
    }

    /// Raw score of a working model
    pub fn calculate_model_score(
        &self,
        archive: &Archive,
        network: &Network,
        model: &str,
    ) -> Result<f64, ArchiveError> {
        let covered = archive.covered_results(network, model)?;
        let in_scope: Vec<_> = match self.strategy.scope {
            ResultScope::All => covered,
            ResultScope::AfterModel => {
                let after = archive.results_after_model(model)?;
                covered
                    .into_iter()
                    .filter(|r| after.iter().any(|a| a.id == r.id))
                    .collect()
            }
        };
        let reward: f64 = in_scope
            .iter()
            .map(|r| r.experiment_type().covering_reward())
            .sum();
        match self.strategy.measure {
            ScoreMeasure::Covered => Ok(reward),
            ScoreMeasure::CoveredMinusIgnored => {
                let penalty: f64 = archive
                    .model(model)
                    .ok_or_else(|| ArchiveError::UnknownModel(model.to_string()))?
                    .ignored_results
                    .iter()
                    .filter_map(|id| archive.result(id))
                    .map(|r| r.experiment_type().ignoring_penalty())
                    .sum();
                Ok(reward - penalty)
            }
        }
    }

    /// Recompute every score, then write the normalized qualities
    ///
    /// Normalization applies to every strategy, including the plain `Covered` measure, whose
    /// scores are never negative but can still be 0. Scores are computed on the worker threads,
    /// the archive is only written afterwards.
    pub fn check_and_update_qualities(
        &self,
        archive: &mut Archive,
        network: &Network,
    ) -> Result<(), ArchiveError> {
        let ids: Vec<String> = archive.working_models().map(|m| m.id.clone()).collect();
        if ids.is_empty() {
            return Ok(());
        }
        let shared: &Archive = archive;
        let scores = parallel_map(&ids, self.processes, |id| {
            self.calculate_model_score(shared, network, id)
        })
        .into_iter()
        .collect::<Result<Vec<f64>, ArchiveError>>()?;

        for (id, score) in ids.iter().zip(&scores) {
            archive.set_score(id, *score)?;
        }
        let qualities = normalize(&scores);
        let mut updated = 0;
        for (id, quality) in ids.iter().zip(qualities) {
            if archive.update_quality(id, quality)? {
                updated += 1;
            }
        }
        debug!("Updated the quality of {} of {} models", updated, ids.len());
        Ok(())
    }
}
