//! Process wide defaults used by the builders and the quality module
use std::sync::{LazyLock, RwLock};

use crate::archive::quality::QualityStrategy;

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

#[derive(Clone, Debug)]
pub struct Configuration {
    /// Reward for covering a result, used when an experiment type is created without weights
    pub covering_reward: f64,
    /// Penalty for ignoring a result, used when an experiment type is created without weights
    pub ignoring_penalty: f64,
    /// Default cost of adding an activity to a model during revision
    pub add_cost: f64,
    /// Default cost of removing an activity from a model during revision
    pub remove_cost: f64,
    /// Number of worker threads used when evaluating many models
    pub processes: usize,
    /// Strategy used by [`QualityModule::from_configuration`](crate::archive::quality::QualityModule::from_configuration)
    pub quality_strategy: QualityStrategy,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            covering_reward: 1.,
            ignoring_penalty: 1.,
            add_cost: 1.,
            remove_cost: 1.,
            processes: 1,
            quality_strategy: QualityStrategy::default(),
        }
    }
}
