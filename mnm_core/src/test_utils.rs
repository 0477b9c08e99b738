//! Small networks and models shared by the unit tests
use indexmap::IndexSet;

use crate::candidate::model::{CandidateModel, CandidateModelBuilder};
use crate::network::activity::{Activity, ActivityBuilder, ActivityKind, Requirement};
use crate::network::compartment::Compartment;
use crate::network::entity::{Entity, EntityBuilder, EntityKind, Property, Species};
use crate::network::network::Network;

pub(crate) fn entity(id: &str, version: &str, kind: EntityKind, properties: &[Property]) -> Entity {
    EntityBuilder::default()
        .id(id)
        .version(version)
        .kind(kind)
        .properties(properties.iter().cloned().collect::<IndexSet<_>>())
        .build()
        .unwrap()
}

pub(crate) fn metabolite(id: &str, version: &str) -> Entity {
    entity(id, version, EntityKind::Metabolite, &[])
}

pub(crate) fn catalyst(id: &str, version: &str, activity: &str) -> Entity {
    entity(
        id,
        version,
        EntityKind::Protein,
        &[Property::Catalyses(activity.to_string())],
    )
}

/// Activity of the given kind over version `v1` species given as (entity, compartment)
pub(crate) fn activity(
    id: &str,
    kind: ActivityKind,
    substrates: &[(&str, &str)],
    products: &[(&str, &str)],
    catalyst_in: Option<&str>,
) -> Activity {
    let mut required_conditions: Vec<Requirement> = substrates
        .iter()
        .map(|(e, c)| Requirement::PresentEntity(Species::new(e, "v1", c)))
        .collect();
    if let Some(compartment) = catalyst_in {
        required_conditions.push(Requirement::PresentCatalyst(compartment.to_string()));
    }
    ActivityBuilder::default()
        .id(id)
        .kind(kind)
        .required_conditions(required_conditions)
        .changes(
            products
                .iter()
                .map(|(e, c)| Species::new(e, "v1", c))
                .collect(),
        )
        .build()
        .unwrap()
}

/// Reaction over version `v1` species, needing a catalyst in the compartment of its first
/// product when `needs_catalyst` is set
pub(crate) fn reaction(
    id: &str,
    substrates: &[(&str, &str)],
    products: &[(&str, &str)],
    needs_catalyst: bool,
) -> Activity {
    let compartment = products
        .first()
        .or(substrates.first())
        .map(|(_, c)| *c)
        .unwrap_or("cyt");
    activity(
        id,
        ActivityKind::Reaction,
        substrates,
        products,
        needs_catalyst.then_some(compartment),
    )
}

/// Model over version `v1` setup species given as (entity, compartment)
pub(crate) fn model(id: &str, setup: &[(&str, &str)], activities: &[&str]) -> CandidateModel {
    CandidateModelBuilder::default()
        .id(id)
        .setup_conditions(
            setup
                .iter()
                .map(|(e, c)| Species::new(e, "v1", c))
                .collect(),
        )
        .intermediate_activities(activities.iter().map(|a| a.to_string()).collect())
        .build()
        .unwrap()
}

/// M1 -> M2 in `cyt` through R1, with M1 in the setup
///
/// With `with_catalyst` R1 needs a catalyst in `cyt`, but no entity of the network catalyses it.
pub(crate) fn simple_chain(with_catalyst: bool) -> (Network, CandidateModel) {
    let mut network = Network::new_empty();
    network.add_compartment(Compartment::new("cyt"));
    network.add_entity(metabolite("M1", "v1")).unwrap();
    network.add_entity(metabolite("M2", "v1")).unwrap();
    network
        .add_activity(reaction("R1", &[("M1", "cyt")], &[("M2", "cyt")], with_catalyst))
        .unwrap();
    (network, model("base", &[("M1", "cyt")], &["R1"]))
}

/// M1 -> M2 through R1 and M2 -> M1 through R2, with M1 in the setup
pub(crate) fn two_cycle() -> (Network, CandidateModel) {
    let mut network = Network::new_empty();
    network.add_compartment(Compartment::new("cyt"));
    network.add_entity(metabolite("M1", "v1")).unwrap();
    network.add_entity(metabolite("M2", "v1")).unwrap();
    network
        .add_activity(reaction("R1", &[("M1", "cyt")], &[("M2", "cyt")], false))
        .unwrap();
    network
        .add_activity(reaction("R2", &[("M2", "cyt")], &[("M1", "cyt")], false))
        .unwrap();
    (network, model("cycle", &[("M1", "cyt")], &["R1", "R2"]))
}

/// A small cell with gene expression, an enzyme, an importer and growth
///
/// - `X_g1`: expression of gene `g1` into protein `E1` in `cyt`
/// - `T_glc`: import of `glc` from `ext` into `cyt`, needs a transporter in `cyt`
/// - `R1`: `glc` -> `pyr`, catalysed by `E1` (any version) in `cyt`
/// - `R2`: `pyr` -> `aa` in `cyt`
/// - `growth`: `aa` -> `biomass`
///
/// `E1:v2` is a second version of the enzyme without catalytic activity, `T1` is the glucose
/// transporter and `E2` is an alternative enzyme for `R1` outside of the model. The base model
/// has `g1`, `T1` in `cyt` and `glc` in `ext` as setup, `aa` as termination condition and every
/// activity except `R3`, an alternative `pyr` -> `aa` reaction.
pub(crate) fn small_cell() -> (Network, CandidateModel) {
    let mut network = Network::new_empty();
    for c in ["cyt", "ext"] {
        network.add_compartment(Compartment::new(c));
    }
    for m in ["glc", "pyr", "aa", "biomass"] {
        network.add_entity(metabolite(m, "v1")).unwrap();
    }
    network
        .add_entity(entity("g1", "v1", EntityKind::Gene, &[]))
        .unwrap();
    network.add_entity(catalyst("E1", "v1", "R1")).unwrap();
    network
        .add_entity(entity("E1", "v2", EntityKind::Protein, &[]))
        .unwrap();
    network.add_entity(catalyst("E2", "v1", "R1")).unwrap();
    network
        .add_entity(entity(
            "T1",
            "v1",
            EntityKind::Protein,
            &[Property::Transports("T_glc".to_string())],
        ))
        .unwrap();

    network
        .add_activity(activity(
            "X_g1",
            ActivityKind::Expression,
            &[("g1", "cyt")],
            &[("E1", "cyt")],
            None,
        ))
        .unwrap();
    network
        .add_activity(
            ActivityBuilder::default()
                .id("T_glc")
                .kind(ActivityKind::Transport)
                .required_conditions(vec![
                    Requirement::PresentEntity(Species::new("glc", "v1", "ext")),
                    Requirement::PresentTransporter("cyt".to_string()),
                ])
                .changes(vec![Species::new("glc", "v1", "cyt")])
                .build()
                .unwrap(),
        )
        .unwrap();
    network
        .add_activity(reaction("R1", &[("glc", "cyt")], &[("pyr", "cyt")], true))
        .unwrap();
    network
        .add_activity(reaction("R2", &[("pyr", "cyt")], &[("aa", "cyt")], false))
        .unwrap();
    network
        .add_activity(reaction("R3", &[("pyr", "cyt")], &[("aa", "cyt")], false))
        .unwrap();
    network
        .add_activity(activity(
            "growth",
            ActivityKind::Growth,
            &[("aa", "cyt")],
            &[("biomass", "cyt")],
            None,
        ))
        .unwrap();

    let mut base = model(
        "base",
        &[("g1", "cyt"), ("T1", "cyt"), ("glc", "ext")],
        &["X_g1", "T_glc", "R1", "R2", "growth"],
    );
    base.termination_conditions = IndexSet::from([Species::new("aa", "v1", "cyt")]);
    (network, base)
}
