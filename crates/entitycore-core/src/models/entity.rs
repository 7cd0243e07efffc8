use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::asset::Asset;
use crate::types::Id;

/// Closed set of entity kinds known to this client.
///
/// Each kind maps to its API route segment and a capability flag telling
/// whether the kind carries assets. The mapping is resolved at compile time;
/// there is no runtime route registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    CellMorphology,
    IonChannelModel,
    Simulation,
    Species,
}

impl EntityType {
    /// API route segment for this entity kind.
    pub fn route(&self) -> &'static str {
        match self {
            EntityType::CellMorphology => "cell-morphology",
            EntityType::IonChannelModel => "ion-channel-model",
            EntityType::Simulation => "simulation",
            EntityType::Species => "species",
        }
    }

    /// Whether entities of this kind own assets.
    pub fn has_assets(&self) -> bool {
        !matches!(self, EntityType::Species)
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.route())
    }
}

/// A typed catalog record.
///
/// Implementations are plain serde structs; the trait only ties a record to
/// its [`EntityType`] and exposes the identity and embedded assets the
/// generic operations need.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const TYPE: EntityType;

    fn id(&self) -> Option<Id>;

    /// Assets embedded in the record, if the entity kind carries any.
    fn assets(&self) -> &[Asset] {
        &[]
    }
}

/// Reconstructed neuronal morphology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellMorphology {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<Asset>,
    /// Server-defined extras not modeled as fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for CellMorphology {
    const TYPE: EntityType = EntityType::CellMorphology;

    fn id(&self) -> Option<Id> {
        self.id
    }

    fn assets(&self) -> &[Asset] {
        &self.assets
    }
}

/// Ion channel model with its mechanism files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IonChannelModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<Asset>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for IonChannelModel {
    const TYPE: EntityType = EntityType::IonChannelModel;

    fn id(&self) -> Option<Id> {
        self.id
    }

    fn assets(&self) -> &[Asset] {
        &self.assets
    }
}

/// Simulation campaign member, whose assets include the SONATA simulation
/// config and replay/report files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<Asset>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Simulation {
    const TYPE: EntityType = EntityType::Simulation;

    fn id(&self) -> Option<Id> {
        self.id
    }

    fn assets(&self) -> &[Asset] {
        &self.assets
    }
}

/// Species taxonomy record; carries no assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Species {
    const TYPE: EntityType = EntityType::Species;

    fn id(&self) -> Option<Id> {
        self.id
    }
}
