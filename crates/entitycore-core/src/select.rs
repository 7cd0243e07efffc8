use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::Asset;

/// Filter assets by exact attribute equality.
///
/// Every selection key must name an [`Asset`] field; unknown keys fail fast
/// with an error listing both the offending keys and the valid field set. An
/// empty asset list yields nothing and skips key validation, since there is
/// nothing to validate against.
pub fn filter_assets(
    assets: Vec<Asset>,
    selection: Map<String, Value>,
) -> Result<impl Iterator<Item = Asset>> {
    if !assets.is_empty() {
        let invalid: Vec<&str> = selection
            .keys()
            .map(String::as_str)
            .filter(|key| !Asset::FIELD_NAMES.contains(key))
            .collect();

        if !invalid.is_empty() {
            return Err(Error::Validation(format!(
                "selection keys {invalid:?} do not match asset fields; valid fields: {:?}",
                Asset::FIELD_NAMES
            )));
        }
    }

    Ok(assets
        .into_iter()
        .filter(move |asset| matches_selection(asset, &selection)))
}

fn matches_selection(asset: &Asset, selection: &Map<String, Value>) -> bool {
    let Ok(Value::Object(fields)) = serde_json::to_value(asset) else {
        return false;
    };

    selection
        .iter()
        .all(|(key, expected)| fields.get(key).unwrap_or(&Value::Null) == expected)
}
