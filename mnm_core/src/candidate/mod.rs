//! Candidate models and the resolution of what they contain

pub mod membership;
pub mod model;
