//! Interventions, the add/remove deltas that turn one model into another
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::network::entity::Species;

/// Something that can be part of a model: a setup presence marker or an activity
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelItem {
    /// The species is present when the experiment starts
    Setup(Species),
    /// Reference to an activity by id
    Activity(String),
}

impl ModelItem {
    pub fn setup(entity: &str, version: &str, compartment: &str) -> Self {
        ModelItem::Setup(Species::new(entity, version, compartment))
    }

    pub fn activity(id: &str) -> Self {
        ModelItem::Activity(id.to_string())
    }
}

impl Display for ModelItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelItem::Setup(s) => write!(f, "setup_present({})", s),
            ModelItem::Activity(a) => write!(f, "{}", a),
        }
    }
}

/// A single add or remove applied to a model
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intervention {
    Add(ModelItem),
    Remove(ModelItem),
}

impl Intervention {
    /// The item the intervention is applied to
    pub fn item(&self) -> &ModelItem {
        match self {
            Intervention::Add(item) | Intervention::Remove(item) => item,
        }
    }
}

impl Display for Intervention {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Intervention::Add(item) => write!(f, "add({})", item),
            Intervention::Remove(item) => write!(f, "remove({})", item),
        }
    }
}
