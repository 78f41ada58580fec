use anyhow::Result;

use crate::model::AssembledModel;

/// The assembled model (ids and resolved references included) as pretty JSON
pub fn to_json(model: &AssembledModel) -> Result<String> {
    Ok(serde_json::to_string_pretty(model)?)
}
