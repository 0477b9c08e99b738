//! Module providing JSON IO for networks, candidate models and experiment results
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::candidate::model::{CandidateModel, CandidateModelBuilder, CandidateModelBuilderError};
use crate::configuration::CONFIGURATION;
use crate::experiment::experiment_type::ExperimentType;
use crate::experiment::result::{ExperimentDescription, ExperimentResult};
use crate::network::activity::{Activity, ActivityBuilder, ActivityBuilderError, ActivityKind, Requirement};
use crate::network::compartment::Compartment;
use crate::network::entity::{Entity, EntityBuilder, EntityBuilderError, EntityKind, Property, Species};
use crate::network::intervention::Intervention;
use crate::network::network::{Network, NetworkError};

// region JSON Network
/// Represents a JSON serialized network, used for reading and writing networks in json format
#[derive(Serialize, Deserialize)]
struct JsonNetwork {
    compartments: Vec<Compartment>,
    #[serde(default)]
    connections: Vec<(String, String)>,
    entities: Vec<JsonEntity>,
    activities: Vec<JsonActivity>,
}

#[derive(Serialize, Deserialize)]
struct JsonEntity {
    id: String,
    version: String,
    kind: EntityKind,
    name: Option<String>,
    #[serde(default)]
    properties: Vec<Property>,
}

#[derive(Serialize, Deserialize)]
struct JsonActivity {
    id: String,
    kind: ActivityKind,
    name: Option<String>,
    #[serde(default)]
    substrates: Vec<Species>,
    #[serde(default)]
    products: Vec<Species>,
    #[serde(default)]
    catalyst_compartments: Vec<String>,
    #[serde(default)]
    transporter_compartments: Vec<String>,
    add_cost: Option<f64>,
    remove_cost: Option<f64>,
}

#[derive(Serialize, Deserialize)]
struct JsonModel {
    id: String,
    #[serde(default)]
    setup: Vec<Species>,
    #[serde(default)]
    activities: Vec<String>,
    #[serde(default)]
    interventions: Vec<Intervention>,
    #[serde(default)]
    termination: Vec<Species>,
    #[serde(default)]
    ignored_results: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct JsonResult {
    id: String,
    experiment: ExperimentType,
    #[serde(default)]
    interventions: Vec<Intervention>,
    outcome: bool,
}
// endregion JSON Network

// region Conversions
impl TryFrom<JsonEntity> for Entity {
    type Error = JsonError;

    fn try_from(e: JsonEntity) -> Result<Self, Self::Error> {
        Ok(EntityBuilder::default()
            .id(e.id)
            .version(e.version)
            .kind(e.kind)
            .name(e.name)
            .properties(e.properties.into_iter().collect())
            .build()?)
    }
}

impl From<&Entity> for JsonEntity {
    fn from(e: &Entity) -> Self {
        Self {
            id: e.id.clone(),
            version: e.version.clone(),
            kind: e.kind,
            name: e.name.clone(),
            properties: e.properties.iter().cloned().collect(),
        }
    }
}

impl TryFrom<JsonActivity> for Activity {
    type Error = JsonError;

    fn try_from(a: JsonActivity) -> Result<Self, Self::Error> {
        let required_conditions = a
            .substrates
            .into_iter()
            .map(Requirement::PresentEntity)
            .chain(
                a.catalyst_compartments
                    .into_iter()
                    .map(Requirement::PresentCatalyst),
            )
            .chain(
                a.transporter_compartments
                    .into_iter()
                    .map(Requirement::PresentTransporter),
            )
            .collect();
        let (default_add, default_remove) = {
            let config = CONFIGURATION.read().unwrap();
            (config.add_cost, config.remove_cost)
        };
        Ok(ActivityBuilder::default()
            .id(a.id)
            .kind(a.kind)
            .name(a.name)
            .required_conditions(required_conditions)
            .changes(a.products)
            .add_cost(a.add_cost.unwrap_or(default_add))
            .remove_cost(a.remove_cost.unwrap_or(default_remove))
            .build()?)
    }
}

impl From<&Activity> for JsonActivity {
    fn from(a: &Activity) -> Self {
        Self {
            id: a.id.clone(),
            kind: a.kind,
            name: a.name.clone(),
            substrates: a.substrates().cloned().collect(),
            products: a.products().cloned().collect(),
            catalyst_compartments: a.catalyst_compartments().map(String::from).collect(),
            transporter_compartments: a.transporter_compartments().map(String::from).collect(),
            add_cost: Some(a.add_cost),
            remove_cost: Some(a.remove_cost),
        }
    }
}

impl TryFrom<JsonModel> for CandidateModel {
    type Error = JsonError;

    fn try_from(m: JsonModel) -> Result<Self, Self::Error> {
        Ok(CandidateModelBuilder::default()
            .id(m.id)
            .setup_conditions(m.setup.into_iter().collect())
            .intermediate_activities(m.activities.into_iter().collect())
            .interventions(m.interventions)
            .termination_conditions(m.termination.into_iter().collect())
            .ignored_results(m.ignored_results.into_iter().collect())
            .build()?)
    }
}

impl From<&CandidateModel> for JsonModel {
    fn from(m: &CandidateModel) -> Self {
        Self {
            id: m.id.clone(),
            setup: m.setup_conditions.iter().cloned().collect(),
            activities: m.intermediate_activities.iter().cloned().collect(),
            interventions: m.interventions.clone(),
            termination: m.termination_conditions.iter().cloned().collect(),
            ignored_results: m.ignored_results.iter().cloned().collect(),
        }
    }
}

impl TryFrom<JsonResult> for ExperimentResult {
    type Error = JsonError;

    fn try_from(r: JsonResult) -> Result<Self, Self::Error> {
        let description =
            ExperimentDescription::new(r.experiment).with_interventions(r.interventions)?;
        Ok(ExperimentResult::new(&r.id, description, r.outcome))
    }
}

impl From<&ExperimentResult> for JsonResult {
    fn from(r: &ExperimentResult) -> Self {
        Self {
            id: r.id.clone(),
            experiment: r.description.experiment_type.clone(),
            interventions: r.description.interventions().to_vec(),
            outcome: r.outcome,
        }
    }
}
// endregion Conversions

impl Network {
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Network, JsonError> {
        let network_str = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => return Err(JsonError::UnableToRead(format!("{:?}", err))),
        };
        Network::from_json_str(&network_str)
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), JsonError> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Parse a network, checking every cross reference
    ///
    /// # Examples
    /// ```rust
    /// use mnm_core::network::network::Network;
    /// let data = r#"{
    ///     "compartments": [{"id": "cyt"}],
    ///     "entities": [{"id": "glc", "version": "v1", "kind": "metabolite"}],
    ///     "activities": []
    /// }"#;
    /// let network = Network::from_json_str(data).unwrap();
    /// assert_eq!(network.entities().count(), 1);
    /// ```
    pub fn from_json_str(data: &str) -> Result<Network, JsonError> {
        let json_network = match serde_json::from_str::<JsonNetwork>(data) {
            Ok(network) => network,
            Err(err) => return Err(JsonError::UnableToParse(format!("{:?}", err))),
        };
        Network::from_json(json_network)
    }

    pub fn to_json_string(&self) -> Result<String, JsonError> {
        Ok(serde_json::to_string_pretty(&self.to_json())?)
    }

    fn from_json(json_network: JsonNetwork) -> Result<Self, JsonError> {
        let mut network = Network::new_empty();
        for compartment in json_network.compartments {
            network.add_compartment(compartment);
        }
        for (a, b) in &json_network.connections {
            network.connect_compartments(a, b);
        }
        for entity in json_network.entities {
            network.add_entity(entity.try_into()?)?;
        }
        for activity in json_network.activities {
            network.add_activity(activity.try_into()?)?;
        }
        network.check_references()?;
        Ok(network)
    }

    fn to_json(&self) -> JsonNetwork {
        JsonNetwork {
            compartments: self.compartments().cloned().collect(),
            connections: self.connections().cloned().collect(),
            entities: self.entities().map(JsonEntity::from).collect(),
            activities: self.activities().map(JsonActivity::from).collect(),
        }
    }
}

/// Parse a JSON array of candidate models
pub fn models_from_json_str(data: &str) -> Result<Vec<CandidateModel>, JsonError> {
    let json_models = match serde_json::from_str::<Vec<JsonModel>>(data) {
        Ok(models) => models,
        Err(err) => return Err(JsonError::UnableToParse(format!("{:?}", err))),
    };
    json_models.into_iter().map(CandidateModel::try_from).collect()
}

pub fn read_models<P: AsRef<Path>>(path: P) -> Result<Vec<CandidateModel>, JsonError> {
    match fs::read_to_string(path) {
        Ok(data) => models_from_json_str(&data),
        Err(err) => Err(JsonError::UnableToRead(format!("{:?}", err))),
    }
}

pub fn write_models<P: AsRef<Path>>(path: P, models: &[CandidateModel]) -> Result<(), JsonError> {
    let json_models: Vec<JsonModel> = models.iter().map(JsonModel::from).collect();
    fs::write(path, serde_json::to_string_pretty(&json_models)?)?;
    Ok(())
}

/// Parse a JSON array of experiment results
pub fn results_from_json_str(data: &str) -> Result<Vec<ExperimentResult>, JsonError> {
    let json_results = match serde_json::from_str::<Vec<JsonResult>>(data) {
        Ok(results) => results,
        Err(err) => return Err(JsonError::UnableToParse(format!("{:?}", err))),
    };
    json_results
        .into_iter()
        .map(ExperimentResult::try_from)
        .collect()
}

pub fn read_results<P: AsRef<Path>>(path: P) -> Result<Vec<ExperimentResult>, JsonError> {
    match fs::read_to_string(path) {
        Ok(data) => results_from_json_str(&data),
        Err(err) => Err(JsonError::UnableToRead(format!("{:?}", err))),
    }
}

pub fn write_results<P: AsRef<Path>>(
    path: P,
    results: &[ExperimentResult],
) -> Result<(), JsonError> {
    let json_results: Vec<JsonResult> = results.iter().map(JsonResult::from).collect();
    fs::write(path, serde_json::to_string_pretty(&json_results)?)?;
    Ok(())
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to read file due to {0}")]
    UnableToRead(String),
    #[error("Unable to parse json due to {0}")]
    UnableToParse(String),
    #[error("Invalid network")]
    InvalidNetwork(#[from] NetworkError),
    #[error("Unable to build entity")]
    UnableToBuildEntity(#[from] EntityBuilderError),
    #[error("Unable to build activity")]
    UnableToBuildActivity(#[from] ActivityBuilderError),
    #[error("Unable to build model")]
    UnableToBuildModel(#[from] CandidateModelBuilderError),
    #[error("Serde json parse error")]
    SerdeJsonParseError(#[from] serde_json::Error),
    #[error("Unable to write to file")]
    UnableToWrite(#[from] std::io::Error),
}

#[cfg(test)]
mod json_tests {
    use crate::io::json::{JsonActivity, JsonEntity, JsonNetwork};

    #[test]
    fn json_entity() {
        let data = r#"{
"id":"E1",
"version":"v2",
"kind":"protein",
"name":"Hexokinase",
"properties":[{"catalyses":"R1"},{"transports":"T_glc"}]
}"#;
        let entity: JsonEntity = serde_json::from_str(data).unwrap();
        assert_eq!(entity.id, "E1");
        assert_eq!(entity.version, "v2");
        assert_eq!(entity.name.unwrap(), "Hexokinase");
        assert_eq!(entity.properties.len(), 2);
    }

    #[test]
    fn json_activity() {
        let data = r#"{
"id":"T_glc",
"kind":"transport",
"substrates":[{"entity":"glc","version":"v1","compartment":"ext"}],
"products":[{"entity":"glc","version":"v1","compartment":"cyt"}],
"transporter_compartments":["cyt"]
}"#;
        let activity: JsonActivity = serde_json::from_str(data).unwrap();
        assert_eq!(activity.id, "T_glc");
        assert!(activity.name.is_none());
        assert_eq!(activity.substrates.len(), 1);
        assert_eq!(activity.products[0].compartment, "cyt");
        assert!(activity.catalyst_compartments.is_empty());
        assert_eq!(activity.transporter_compartments, vec!["cyt"]);
        assert!(activity.add_cost.is_none());
    }

    #[test]
    fn json_network_without_connections() {
        let data = r#"{"compartments":[{"id":"cyt"}],"entities":[],"activities":[]}"#;
        let network: JsonNetwork = serde_json::from_str(data).unwrap();
        assert!(network.connections.is_empty());
    }
}

#[cfg(test)]
mod network_tests {
    use super::*;
    use crate::network::entity::EntityKey;
    use crate::network::intervention::ModelItem;
    use crate::test_utils::small_cell;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn toy_network_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_data")
            .join("networks")
            .join("toy_network.json")
    }

    #[test]
    fn read_toy_network() {
        let network = Network::read_json(toy_network_path()).unwrap();
        assert_eq!(network.compartments().count(), 2);
        assert!(network.connected("ext", "cyt"));
        assert_eq!(
            network.entity_kind("g1", "v1"),
            Some(EntityKind::Gene)
        );
        let enzyme = network.entity(&EntityKey::new("E1", "v1")).unwrap();
        assert!(enzyme.catalyses("R1"));
        let import = network.activity("T_glc").unwrap();
        assert!(import.requires_transporter());
        assert_eq!(import.add_cost, 2.);
        assert_eq!(network.activity("R1").unwrap().remove_cost, 1.);
        assert_eq!(network.catalysts_of("R1").count(), 1);
    }

    #[test]
    fn network_roundtrip_keeps_requirements() {
        let (network, _) = small_cell();
        let read_back = Network::from_json_str(&network.to_json_string().unwrap()).unwrap();
        for activity in network.activities() {
            let other = read_back.activity(&activity.id).unwrap();
            assert_eq!(
                other.substrates().collect::<Vec<_>>(),
                activity.substrates().collect::<Vec<_>>()
            );
            assert_eq!(other.requires_catalyst(), activity.requires_catalyst());
            assert_eq!(other.requires_transporter(), activity.requires_transporter());
        }
        assert_eq!(read_back.entities().count(), network.entities().count());
    }

    #[test]
    fn dangling_references_are_rejected() {
        let data = r#"{
"compartments":[{"id":"cyt"}],
"entities":[{"id":"glc","version":"v1","kind":"metabolite"}],
"activities":[{"id":"R1","kind":"reaction",
"substrates":[{"entity":"glc","version":"v1","compartment":"cyt"}],
"products":[{"entity":"pyr","version":"v1","compartment":"cyt"}]}]
}"#;
        assert!(matches!(
            Network::from_json_str(data),
            Err(JsonError::InvalidNetwork(NetworkError::UnknownEntity(_)))
        ));
        assert!(matches!(
            Network::from_json_str("{"),
            Err(JsonError::UnableToParse(_))
        ));
    }

    #[test]
    fn models_and_results() {
        let models = models_from_json_str(
            r#"[{"id":"base","setup":[{"entity":"glc","version":"v1","compartment":"ext"}],
"activities":["T_glc","R1"],
"interventions":[{"add":{"activity":"R2"}}],
"ignored_results":["r0"]}]"#,
        )
        .unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(
            models[0].interventions,
            vec![Intervention::Add(ModelItem::activity("R2"))]
        );
        assert!(models[0].ignored_results.contains("r0"));

        let results = results_from_json_str(
            r#"[{"id":"r0","experiment":{"type":"detection_activity","activity_id":"growth"},
"interventions":[{"remove":{"setup":{"entity":"glc","version":"v1","compartment":"ext"}}}],
"outcome":false}]"#,
        )
        .unwrap();
        assert_eq!(results[0].experiment_type().kind_tag(), "detection_activity_exp");
        assert_eq!(results[0].description.interventions().len(), 1);
        assert_eq!(results[0].experiment_type().covering_reward(), 1.);

        let removing_activity = results_from_json_str(
            r#"[{"id":"r1","experiment":{"type":"detection_activity","activity_id":"growth"},
"interventions":[{"remove":{"activity":"R1"}}],"outcome":false}]"#,
        );
        assert!(matches!(
            removing_activity,
            Err(JsonError::InvalidNetwork(NetworkError::UnsupportedExperimentIntervention(_)))
        ));
    }
}
