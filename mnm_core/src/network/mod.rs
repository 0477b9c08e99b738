//! Static network definitions shared by every candidate model: compartments, versioned
//! entities, activities and the interventions that select among them.

pub mod activity;
pub mod compartment;
pub mod entity;
pub mod intervention;
pub mod network;
