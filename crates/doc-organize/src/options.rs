use crate::constants::PIXEL_GRID_SIZES;
use crate::date::{STOCK_FORMAT_A, STOCK_FORMAT_B};
use crate::layout::PackOptions;
use crate::{OrganizeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Glyph placed between a section number and its title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashType {
    #[serde(rename = "-", alias = "hyphen")]
    Hyphen,
    #[default]
    #[serde(rename = "\u{2013}", alias = "en-dash")]
    EnDash,
    #[serde(rename = "\u{2014}", alias = "em-dash")]
    EmDash,
}

impl DashType {
    pub fn glyph(self) -> &'static str {
        match self {
            DashType::Hyphen => "-",
            DashType::EnDash => "\u{2013}",
            DashType::EmDash => "\u{2014}",
        }
    }
}

/// Which date format `<currentDate>` slots use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DateFormatChoice {
    /// `[ww], [mmmm] [ddd], [yyyy]`
    #[default]
    StockA,
    /// `[mm]/[dd]/[yyyy]`
    StockB,
    /// The user's own `dateFormatTemplate`
    Custom,
}

impl TryFrom<u8> for DateFormatChoice {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(DateFormatChoice::StockA),
            1 => Ok(DateFormatChoice::StockB),
            2 => Ok(DateFormatChoice::Custom),
            other => Err(format!("unknown date format choice {other}")),
        }
    }
}

impl From<DateFormatChoice> for u8 {
    fn from(choice: DateFormatChoice) -> Self {
        match choice {
            DateFormatChoice::StockA => 0,
            DateFormatChoice::StockB => 1,
            DateFormatChoice::Custom => 2,
        }
    }
}

/// Configuration snapshot for one invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    // Table of contents
    #[serde(rename = "useTOC")]
    pub use_toc: bool,
    pub toc_column_spacing: f64,
    pub toc_show_sections_only: bool,

    // Numbering
    pub dash_type: DashType,
    pub use_sections: bool,
    pub doc_title: String,

    // Dates
    pub date_format_choice: DateFormatChoice,
    pub date_format_template: String,

    // Pixel rounding
    pub round_to_nearest_pixel: bool,
    pub nearest_pixel_to_round_to: f64,

    // Artboard packing
    #[serde(rename = "artboardSpacingH")]
    pub artboard_spacing_h: f64,
    #[serde(rename = "artboardSpacingV")]
    pub artboard_spacing_v: f64,
    pub move_artboards: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_toc: true,
            toc_column_spacing: 50.0,
            toc_show_sections_only: false,
            dash_type: DashType::EnDash,
            use_sections: true,
            doc_title: String::new(),
            date_format_choice: DateFormatChoice::StockA,
            date_format_template: STOCK_FORMAT_A.to_string(),
            round_to_nearest_pixel: false,
            nearest_pixel_to_round_to: 1.0,
            artboard_spacing_h: 100.0,
            artboard_spacing_v: 100.0,
            move_artboards: false,
        }
    }
}

/// Every key a [`Settings`] record reads from a [`SettingsStore`]
pub const SETTINGS_KEYS: [&str; 13] = [
    "useTOC",
    "tocColumnSpacing",
    "tocShowSectionsOnly",
    "dashType",
    "useSections",
    "docTitle",
    "dateFormatChoice",
    "dateFormatTemplate",
    "roundToNearestPixel",
    "nearestPixelToRoundTo",
    "artboardSpacingH",
    "artboardSpacingV",
    "moveArtboards",
];

impl Settings {
    /// Snapshot the settings held by `store`, defaulting missing keys
    pub fn from_store<S: SettingsStore + ?Sized>(store: &S) -> Result<Self> {
        let map: Map<String, Value> = SETTINGS_KEYS
            .iter()
            .filter_map(|key| store.setting_for_key(key).map(|v| (key.to_string(), v)))
            .collect();
        let settings: Settings = serde_json::from_value(Value::Object(map))
            .map_err(|e| OrganizeError::Config(format!("Failed to read settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Persist every key of this record into `store`
    pub fn write_to<S: SettingsStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        self.validate()?;
        if let Value::Object(map) = serde_json::to_value(self)? {
            for (key, value) in map {
                store.set_setting_for_key(&key, value);
            }
        }
        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if !(self.toc_column_spacing >= 0.0) {
            return Err(OrganizeError::Config(
                "TOC column spacing must be zero or more".to_string(),
            ));
        }
        if !(self.artboard_spacing_h >= 0.0 && self.artboard_spacing_v >= 0.0) {
            return Err(OrganizeError::Config(
                "Artboard spacing must be zero or more".to_string(),
            ));
        }
        if !PIXEL_GRID_SIZES.contains(&self.nearest_pixel_to_round_to) {
            return Err(OrganizeError::Config(format!(
                "Cannot round to nearest {} pixels. Use 0.1, 0.5 or 1.0.",
                self.nearest_pixel_to_round_to
            )));
        }
        Ok(())
    }

    /// Template used for `<currentDate>` slots
    pub fn date_template(&self) -> &str {
        match self.date_format_choice {
            DateFormatChoice::StockA => STOCK_FORMAT_A,
            DateFormatChoice::StockB => STOCK_FORMAT_B,
            DateFormatChoice::Custom => &self.date_format_template,
        }
    }

    pub fn pack_options(&self) -> PackOptions {
        PackOptions {
            h_spacing: self.artboard_spacing_h,
            v_spacing: self.artboard_spacing_v,
            move_artboards: self.move_artboards,
        }
    }

    pub fn dash(&self) -> &'static str {
        self.dash_type.glyph()
    }
}

// =============================================================================
// Settings Storage
// =============================================================================

/// Persistent key/value settings provided by the host
pub trait SettingsStore {
    fn setting_for_key(&self, key: &str) -> Option<Value>;

    fn set_setting_for_key(&mut self, key: &str, value: Value);
}

/// Settings store backed by a JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonSettingsStore {
    values: Map<String, Value>,
}

impl JsonSettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load stored settings from a JSON file; a missing file is an empty store
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice::<Value>(&bytes)? {
            Value::Object(values) => Ok(Self { values }),
            _ => Err(OrganizeError::Config(
                "Settings file must contain a JSON object".to_string(),
            )),
        }
    }

    /// Save stored settings to a JSON file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.values)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

impl SettingsStore for JsonSettingsStore {
    fn setting_for_key(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_setting_for_key(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_empty_store() {
        let store = JsonSettingsStore::new();
        let settings = Settings::from_store(&store).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.dash(), "\u{2013}");
        assert_eq!(settings.toc_column_spacing, 50.0);
    }

    #[test]
    fn test_store_values_override_defaults() {
        let mut store = JsonSettingsStore::new();
        store.set_setting_for_key("useTOC", json!(false));
        store.set_setting_for_key("dashType", json!("-"));
        store.set_setting_for_key("dateFormatChoice", json!(2));
        store.set_setting_for_key("dateFormatTemplate", json!("[yyyy]"));
        store.set_setting_for_key("nearestPixelToRoundTo", json!(0.5));
        store.set_setting_for_key("unrelatedKey", json!("ignored"));

        let settings = Settings::from_store(&store).unwrap();
        assert!(!settings.use_toc);
        assert_eq!(settings.dash_type, DashType::Hyphen);
        assert_eq!(settings.date_template(), "[yyyy]");
        assert_eq!(settings.nearest_pixel_to_round_to, 0.5);
    }

    #[test]
    fn test_dash_aliases() {
        let mut store = JsonSettingsStore::new();
        store.set_setting_for_key("dashType", json!("em-dash"));
        let settings = Settings::from_store(&store).unwrap();
        assert_eq!(settings.dash(), "\u{2014}");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut store = JsonSettingsStore::new();
        store.set_setting_for_key("nearestPixelToRoundTo", json!(0.3));
        assert!(matches!(
            Settings::from_store(&store),
            Err(OrganizeError::Config(_))
        ));

        let mut store = JsonSettingsStore::new();
        store.set_setting_for_key("dateFormatChoice", json!(7));
        assert!(Settings::from_store(&store).is_err());

        let settings = Settings {
            toc_column_spacing: -1.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_write_to_store_round_trips() {
        let settings = Settings {
            use_sections: false,
            doc_title: "Spec Book".to_string(),
            move_artboards: true,
            ..Default::default()
        };
        let mut store = JsonSettingsStore::new();
        settings.write_to(&mut store).unwrap();

        assert_eq!(store.setting_for_key("useSections"), Some(json!(false)));
        assert_eq!(store.setting_for_key("useTOC"), Some(json!(true)));
        assert_eq!(Settings::from_store(&store).unwrap(), settings);
    }

    #[tokio::test]
    async fn test_save_and_load_store() {
        use tempfile::NamedTempFile;

        let mut store = JsonSettingsStore::new();
        Settings {
            toc_column_spacing: 24.0,
            ..Default::default()
        }
        .write_to(&mut store)
        .unwrap();

        let temp_file = NamedTempFile::new().unwrap();
        store.save(temp_file.path()).await.unwrap();
        let loaded = JsonSettingsStore::load(temp_file.path()).await.unwrap();

        assert_eq!(loaded, store);
        assert_eq!(Settings::from_store(&loaded).unwrap().toc_column_spacing, 24.0);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::load(dir.path().join("absent.json"))
            .await
            .unwrap();
        assert_eq!(store, JsonSettingsStore::new());
    }
}
