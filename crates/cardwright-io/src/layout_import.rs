use std::collections::HashMap;

use thiserror::Error;

use cardwright_core::LayoutDef;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result of a bulk layout import.
///
/// Entries that failed conversion are never silently dropped: their names are
/// collected in `skipped` (and logged), while conversion of the remaining
/// entries continues.
#[derive(Debug, Default)]
pub struct LayoutImport {
    pub layouts: HashMap<String, LayoutDef>,
    /// Names of entries with missing or unknown keys.
    pub skipped: Vec<String>,
}

impl LayoutImport {
    fn convert<V, E: std::fmt::Display>(
        &mut self,
        name: String,
        value: V,
        deserialize: impl FnOnce(V) -> Result<LayoutDef, E>,
    ) {
        match deserialize(value) {
            Ok(layoutdef) => {
                self.layouts.insert(name, layoutdef);
            }
            Err(err) => {
                log::warn!("layout entry '{name}' is not convertible: {err}");
                self.skipped.push(name);
            }
        }
    }
}

/// Load layout definitions from a JSON object of `name → entry`, where each
/// entry carries `x`, `y`, `width`, `height` and optional `h_align`,
/// `v_align`, `scale` keys.
pub fn layouts_from_json(source: &str) -> Result<LayoutImport, ImportError> {
    let entries: serde_json::Map<String, serde_json::Value> = serde_json::from_str(source)?;
    let mut import = LayoutImport::default();
    for (name, value) in entries {
        import.convert(name, value, serde_json::from_value);
    }
    Ok(import)
}

/// Load layout definitions from a TOML table of `name → entry`; same keys as
/// the JSON form.
pub fn layouts_from_toml(source: &str) -> Result<LayoutImport, ImportError> {
    let entries: toml::Table = toml::from_str(source)?;
    let mut import = LayoutImport::default();
    for (name, value) in entries {
        import.convert(name, value, toml::Value::try_into);
    }
    Ok(import)
}
