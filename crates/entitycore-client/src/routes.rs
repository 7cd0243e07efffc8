use entitycore_core::Id;
use entitycore_core::models::EntityType;

/// `{api_url}/{entity_route}` or `{api_url}/{entity_route}/{entity_id}`.
pub fn entity_endpoint(api_url: &str, entity_type: EntityType, entity_id: Option<Id>) -> String {
    match entity_id {
        Some(id) => format!("{api_url}/{}/{id}", entity_type.route()),
        None => format!("{api_url}/{}", entity_type.route()),
    }
}

/// `{entity}/assets` or `{entity}/assets/{asset_id}`.
pub fn assets_endpoint(
    api_url: &str,
    entity_type: EntityType,
    entity_id: Id,
    asset_id: Option<Id>,
) -> String {
    let base = entity_endpoint(api_url, entity_type, Some(entity_id));
    match asset_id {
        Some(asset_id) => format!("{base}/assets/{asset_id}"),
        None => format!("{base}/assets"),
    }
}

pub fn asset_download_endpoint(
    api_url: &str,
    entity_type: EntityType,
    entity_id: Id,
    asset_id: Id,
) -> String {
    format!(
        "{}/download",
        assets_endpoint(api_url, entity_type, entity_id, Some(asset_id))
    )
}

/// Listing endpoint for directory assets; sub-paths are only discoverable
/// here, never embedded in the asset record.
pub fn asset_list_endpoint(
    api_url: &str,
    entity_type: EntityType,
    entity_id: Id,
    asset_id: Id,
) -> String {
    format!(
        "{}/list",
        assets_endpoint(api_url, entity_type, entity_id, Some(asset_id))
    )
}
