//! Core rust implementation of candidate metabolic network model evaluation.
//!
//! A [`Network`](network::network::Network) registers compartments, versioned entities and
//! activities. Candidate models select part of it through setup conditions, base activities and
//! interventions. Evaluating a model converges an elimination fixpoint over its activities, from
//! which predictions for experiments are derived and compared with recorded results. The
//! [`Archive`](archive::Archive) keeps the working models and results and ranks the models by
//! quality.

pub mod archive;
pub mod candidate;
pub mod configuration;
pub mod evaluate;
pub mod experiment;
pub mod io;
pub mod network;
#[cfg(test)]
mod test_utils;
