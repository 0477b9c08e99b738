//! Elimination fixpoint computing the active part of a candidate model
//!
//! Every round evaluates the in-model activities that are still active against the species
//! reachable from the setup through those same activities. An activity is eliminated when one
//! of its substrates is not reachable, or when it needs a catalyst (transporter) and no
//! reachable entity version declaring `Catalyses` (`Transports`) for it sits in a compartment
//! connected to the required one. Rounds repeat until nothing new is eliminated. Eliminations
//! are never undone, so there are at most as many productive rounds as in-model activities.
use std::collections::HashMap;

use indexmap::IndexSet;
use log::{debug, trace, warn};

use crate::candidate::membership::Membership;
use crate::network::activity::Activity;
use crate::network::entity::{EntityKey, Species};
use crate::network::network::Network;

/// Outcome of a single elimination round
#[derive(Clone, Debug)]
pub struct Round {
    /// Species reachable from the setup through the activities active at the start of the round
    pub reachable: IndexSet<Species>,
    /// Activities eliminated by this round (not including earlier eliminations)
    pub newly_eliminated: IndexSet<String>,
}

/// Runs elimination rounds for one resolved model
pub struct EliminationEngine<'a> {
    network: &'a Network,
    membership: &'a Membership,
    /// In-model activities registered in the network, in model order
    activities: Vec<&'a Activity>,
}

impl<'a> EliminationEngine<'a> {
    pub fn new(network: &'a Network, membership: &'a Membership) -> Self {
        let activities = membership
            .activities()
            .filter_map(|id| network.activity(id))
            .collect();
        EliminationEngine {
            network,
            membership,
            activities,
        }
    }

    /// Species reachable from the setup through the activities not in `eliminated`
    ///
    /// A species is reachable when it is initially present, or when some active activity
    /// produces it and all of that activity's substrates are reachable. This is the least
    /// fixpoint of that definition, computed by forward chaining: each activity keeps a count
    /// of substrates not yet reached and fires once the count drops to zero. Cycles need no
    /// special treatment, a species that can only be produced from itself is never reached.
    pub fn reachable(&self, eliminated: &IndexSet<String>) -> IndexSet<Species> {
        let active: Vec<&Activity> = self
            .activities
            .iter()
            .filter(|a| !eliminated.contains(&a.id))
            .copied()
            .collect();

        let mut missing: Vec<usize> = Vec::with_capacity(active.len());
        let mut consumers: HashMap<&Species, Vec<usize>> = HashMap::new();
        for (index, activity) in active.iter().enumerate() {
            let substrates: IndexSet<&Species> = activity.substrates().collect();
            missing.push(substrates.len());
            for s in substrates {
                consumers.entry(s).or_default().push(index);
            }
        }

        let mut reached: IndexSet<Species> = self.membership.setup().cloned().collect();
        let mut frontier: Vec<Species> = reached.iter().cloned().collect();
        for (index, activity) in active.iter().enumerate() {
            if missing[index] == 0 {
                fire(activity, &mut reached, &mut frontier);
            }
        }
        while let Some(species) = frontier.pop() {
            let Some(waiting) = consumers.get(&species) else {
                continue;
            };
            for &index in waiting {
                missing[index] -= 1;
                if missing[index] == 0 {
                    fire(active[index], &mut reached, &mut frontier);
                }
            }
        }
        reached
    }

    /// Run one elimination round on top of the already `eliminated` activities
    pub fn round(&self, eliminated: &IndexSet<String>) -> Round {
        let reachable = self.reachable(eliminated);

        let mut located: HashMap<EntityKey, Vec<&str>> = HashMap::new();
        for species in &reachable {
            located
                .entry(species.key())
                .or_default()
                .push(species.compartment.as_str());
        }

        let newly_eliminated = self
            .activities
            .iter()
            .filter(|a| !eliminated.contains(&a.id))
            .filter(|a| {
                let starved = a.substrates().any(|s| !reachable.contains(s));
                if starved {
                    trace!("{}: substrate of {} is not reachable", self.membership.model_id(), a.id);
                    return true;
                }
                let missing_cofactor = !self.cofactors_available(a, &located);
                if missing_cofactor {
                    trace!("{}: no cofactor available for {}", self.membership.model_id(), a.id);
                }
                missing_cofactor
            })
            .map(|a| a.id.clone())
            .collect();

        Round {
            reachable,
            newly_eliminated,
        }
    }

    /// Whether every catalyst and transporter requirement of the activity is satisfied
    ///
    /// Cofactors are not consumed, only their own reachability matters.
    fn cofactors_available(
        &self,
        activity: &Activity,
        located: &HashMap<EntityKey, Vec<&str>>,
    ) -> bool {
        let present_near = |key: EntityKey, required: &str| {
            located.get(&key).is_some_and(|compartments| {
                compartments
                    .iter()
                    .any(|c| self.network.connected(c, required))
            })
        };
        activity.catalyst_compartments().all(|required| {
            self.network
                .catalysts_of(&activity.id)
                .any(|e| present_near(e.key(), required))
        }) && activity.transporter_compartments().all(|required| {
            self.network
                .transporters_of(&activity.id)
                .any(|e| present_near(e.key(), required))
        })
    }

    /// Repeat elimination rounds until a round eliminates nothing
    pub fn converge(&self) -> ActiveNetwork {
        let bound = self.activities.len();
        let mut eliminated: IndexSet<String> = IndexSet::new();
        let mut history: Vec<IndexSet<String>> = Vec::new();
        let mut reachable = None;

        for _ in 0..=bound {
            let round = self.round(&eliminated);
            if round.newly_eliminated.is_empty() {
                reachable = Some(round.reachable);
                break;
            }
            debug!(
                "{}: round {} eliminated {:?}",
                self.membership.model_id(),
                history.len() + 1,
                round.newly_eliminated
            );
            eliminated.extend(round.newly_eliminated.iter().cloned());
            history.push(round.newly_eliminated);
        }

        let converged = reachable.is_some();
        let synthesizable = match reachable {
            Some(reachable) => reachable,
            None => {
                warn!(
                    "{}: elimination did not stabilise within {} rounds",
                    self.membership.model_id(),
                    bound + 1
                );
                self.reachable(&eliminated)
            }
        };
        debug!(
            "{}: {} of {} activities active, {} species synthesizable",
            self.membership.model_id(),
            self.activities.len() - eliminated.len(),
            self.activities.len(),
            synthesizable.len()
        );

        ActiveNetwork {
            in_model: self.activities.iter().map(|a| a.id.clone()).collect(),
            eliminated,
            synthesizable,
            history,
            converged,
        }
    }
}

fn fire(activity: &Activity, reached: &mut IndexSet<Species>, frontier: &mut Vec<Species>) {
    for product in activity.products() {
        if reached.insert(product.clone()) {
            frontier.push(product.clone());
        }
    }
}

/// Converged state of the elimination fixpoint for one model
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveNetwork {
    in_model: IndexSet<String>,
    eliminated: IndexSet<String>,
    synthesizable: IndexSet<Species>,
    history: Vec<IndexSet<String>>,
    converged: bool,
}

impl ActiveNetwork {
    /// In-model and not eliminated
    pub fn active(&self, activity: &str) -> bool {
        self.in_model.contains(activity) && !self.eliminated.contains(activity)
    }

    pub fn eliminated(&self, activity: &str) -> bool {
        self.eliminated.contains(activity)
    }

    /// Reachable from the setup through the active activities
    pub fn synthesizable(&self, species: &Species) -> bool {
        self.synthesizable.contains(species)
    }

    pub fn active_activities(&self) -> impl Iterator<Item = &str> {
        self.in_model
            .iter()
            .filter(|a| !self.eliminated.contains(*a))
            .map(|a| a.as_str())
    }

    pub fn eliminated_activities(&self) -> &IndexSet<String> {
        &self.eliminated
    }

    pub fn synthesizable_species(&self) -> &IndexSet<Species> {
        &self.synthesizable
    }

    /// Activities eliminated by each productive round, in order
    pub fn elimination_history(&self) -> &[IndexSet<String>] {
        &self.history
    }

    /// Number of rounds evaluated, including the final round that eliminated nothing
    pub fn rounds(&self) -> usize {
        self.history.len() + usize::from(self.converged)
    }

    pub fn converged(&self) -> bool {
        self.converged
    }
}
