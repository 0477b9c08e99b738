//! Compartments and the connectivity relation between them
use std::collections::HashSet;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A cellular (or extracellular) compartment
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Compartment {
    /// Short identifier, e.g. `cyt`
    pub id: String,
    /// Human readable name
    #[serde(default)]
    pub name: Option<String>,
}

impl Compartment {
    pub fn new(id: &str) -> Self {
        Compartment {
            id: id.to_string(),
            name: None,
        }
    }
}

/// Symmetric and reflexive closure of the declared compartment connections
#[derive(Clone, Debug, Default)]
pub struct Connectivity {
    pairs: HashSet<(String, String)>,
}

impl Connectivity {
    /// Build the closure over `compartments` from the declared `edges`
    ///
    /// Every compartment is connected to itself and every declared edge is added in both
    /// directions. Edges naming undeclared compartments still contribute their own reflexive
    /// pairs.
    pub fn close<'a>(
        compartments: impl IntoIterator<Item = &'a str>,
        edges: &IndexSet<(String, String)>,
    ) -> Self {
        let mut pairs = HashSet::new();
        for c in compartments {
            pairs.insert((c.to_string(), c.to_string()));
        }
        for (a, b) in edges {
            pairs.insert((a.clone(), b.clone()));
            pairs.insert((b.clone(), a.clone()));
            pairs.insert((a.clone(), a.clone()));
            pairs.insert((b.clone(), b.clone()));
        }
        Connectivity { pairs }
    }

    pub fn connected(&self, a: &str, b: &str) -> bool {
        a == b || self.pairs.contains(&(a.to_string(), b.to_string()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_is_symmetric_and_reflexive() {
        let edges = IndexSet::from([("cyt".to_string(), "ext".to_string())]);
        let closure = Connectivity::close(["cyt", "ext", "mit"], &edges);
        assert!(closure.connected("cyt", "ext"));
        assert!(closure.connected("ext", "cyt"));
        assert!(closure.connected("cyt", "cyt"));
        assert!(closure.connected("ext", "ext"));
        assert!(closure.connected("mit", "mit"));
        assert!(!closure.connected("mit", "cyt"));
        // cyt-cyt, ext-ext, mit-mit, cyt-ext, ext-cyt
        assert_eq!(closure.len(), 5);
    }

    #[test]
    fn closure_is_not_transitive() {
        let edges = IndexSet::from([
            ("a".to_string(), "b".to_string()),
            ("b".to_string(), "c".to_string()),
        ]);
        let closure = Connectivity::close(["a", "b", "c"], &edges);
        assert!(closure.connected("a", "b"));
        assert!(closure.connected("c", "b"));
        assert!(!closure.connected("a", "c"));
    }
}
