//! This module provides a struct for representing activities (reactions, transports, expression
//! and so on) together with their requirements and products
use std::fmt::{Display, Formatter};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::configuration::CONFIGURATION;
use crate::network::entity::Species;

/// Kind of biological process
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Growth,
    Expression,
    Reaction,
    Transport,
    ComplexFormation,
}

impl Display for ActivityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityKind::Growth => write!(f, "growth"),
            ActivityKind::Expression => write!(f, "expression"),
            ActivityKind::Reaction => write!(f, "reaction"),
            ActivityKind::Transport => write!(f, "transport"),
            ActivityKind::ComplexFormation => write!(f, "complex_formation"),
        }
    }
}

/// Condition that has to hold for an activity to take place
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// A substrate that is consumed
    PresentEntity(Species),
    /// Some catalyst of this activity must be present in (or connected to) the compartment
    PresentCatalyst(String),
    /// Some transporter for this activity must be present in (or connected to) the compartment
    PresentTransporter(String),
}

/// Represents an activity of the network
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Used to identify the activity (must be unique)
    #[builder(setter(into))]
    pub id: String,
    /// What kind of process this is
    pub kind: ActivityKind,
    /// Human readable name
    #[builder(default = "None")]
    #[serde(default)]
    pub name: Option<String>,
    /// Substrates and cofactors
    #[builder(default = "Vec::new()")]
    #[serde(default)]
    pub required_conditions: Vec<Requirement>,
    /// Species produced by the activity
    #[builder(default = "Vec::new()")]
    #[serde(default)]
    pub changes: Vec<Species>,
    /// Cost of adding the activity to a model, consumed by the revision search
    #[builder(default = "CONFIGURATION.read().unwrap().add_cost")]
    #[serde(default = "default_add_cost")]
    pub add_cost: f64,
    /// Cost of removing the activity from a model, consumed by the revision search
    #[builder(default = "CONFIGURATION.read().unwrap().remove_cost")]
    #[serde(default = "default_remove_cost")]
    pub remove_cost: f64,
}

fn default_add_cost() -> f64 {
    CONFIGURATION.read().unwrap().add_cost
}

fn default_remove_cost() -> f64 {
    CONFIGURATION.read().unwrap().remove_cost
}

impl Activity {
    /// Substrates consumed by the activity
    pub fn substrates(&self) -> impl Iterator<Item = &Species> {
        self.required_conditions.iter().filter_map(|r| match r {
            Requirement::PresentEntity(s) => Some(s),
            _ => None,
        })
    }

    /// Species produced by the activity
    pub fn products(&self) -> impl Iterator<Item = &Species> {
        self.changes.iter()
    }

    /// Compartments in which a catalyst is required
    pub fn catalyst_compartments(&self) -> impl Iterator<Item = &str> {
        self.required_conditions.iter().filter_map(|r| match r {
            Requirement::PresentCatalyst(c) => Some(c.as_str()),
            _ => None,
        })
    }

    /// Compartments in which a transporter is required
    pub fn transporter_compartments(&self) -> impl Iterator<Item = &str> {
        self.required_conditions.iter().filter_map(|r| match r {
            Requirement::PresentTransporter(c) => Some(c.as_str()),
            _ => None,
        })
    }

    pub fn requires_catalyst(&self) -> bool {
        self.catalyst_compartments().next().is_some()
    }

    pub fn requires_transporter(&self) -> bool {
        self.transporter_compartments().next().is_some()
    }

    /// Whether the species participates in the activity, either as a substrate or a product
    pub fn involves(&self, species: &Species) -> bool {
        self.substrates().any(|s| s == species) || self.products().any(|p| p == species)
    }
}
