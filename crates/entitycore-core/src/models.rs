pub use self::asset::{Asset, AssetStatus, DetailedFileList, DirectoryFile, LocalAssetMetadata};
pub use self::entity::{CellMorphology, Entity, EntityType, IonChannelModel, Simulation, Species};

mod asset;
mod entity;
