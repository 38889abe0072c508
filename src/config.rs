//! Compiler configuration.
//!
//! The compiler context carries everything translators read from the caller:
//! - the table mapping abstract field types to engine type names
//! - timezone settings used by date extraction and truncation
//! - the name of the collection being queried, for column paths
//!
//! `Settings` is the on-disk form, loaded from JSON and turned into a
//! `CompilerContext`.

use crate::expression::FieldType;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Mapping from abstract field type to the engine's type name.
///
/// Every field type resolves: overrides are consulted first, then the
/// built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeTable {
    overrides: HashMap<FieldType, String>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the engine type name for a field type
    pub fn set(&mut self, field_type: FieldType, engine_type: impl Into<String>) {
        self.overrides.insert(field_type, engine_type.into());
    }

    /// Builder form of [`TypeTable::set`]
    pub fn with(mut self, field_type: FieldType, engine_type: impl Into<String>) -> Self {
        self.set(field_type, engine_type);
        self
    }

    /// Engine type name for a field type
    pub fn engine_type(&self, field_type: FieldType) -> &str {
        self.overrides
            .get(&field_type)
            .map(String::as_str)
            .unwrap_or_else(|| field_type.default_engine_type())
    }
}

/// State passed through compilation untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerContext {
    /// Engine type names used by casts
    pub data_types: TypeTable,
    /// Whether date/time values are timezone aware
    pub use_tz: bool,
    /// Timezone used when a node carries none of its own
    pub time_zone: Option<String>,
    /// Collection the query runs against; columns of other collections are prefixed
    pub collection: Option<String>,
}

impl CompilerContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable timezone support with the given current timezone
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.use_tz = true;
        self.time_zone = Some(time_zone.into());
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn with_data_types(mut self, data_types: TypeTable) -> Self {
        self.data_types = data_types;
        self
    }

    /// Effective timezone for a node with the given explicit timezone.
    ///
    /// Without timezone support nothing is returned, whatever the node asks for.
    pub fn resolve_timezone<'a>(&'a self, tzinfo: Option<&'a str>) -> Option<&'a str> {
        if !self.use_tz {
            return None;
        }
        tzinfo.or(self.time_zone.as_deref())
    }
}

/// Settings file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub use_tz: bool,
    pub time_zone: Option<String>,
    pub collection: Option<String>,
    pub data_types: HashMap<FieldType, String>,
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid settings")
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }

    /// Build the compiler context described by these settings
    pub fn into_context(self) -> CompilerContext {
        let mut data_types = TypeTable::new();
        for (field_type, engine_type) in self.data_types {
            data_types.set(field_type, engine_type);
        }
        CompilerContext {
            data_types,
            use_tz: self.use_tz,
            time_zone: self.time_zone,
            collection: self.collection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_type_table_defaults_are_total() {
        let table = TypeTable::new();
        for field_type in FieldType::ALL {
            assert_eq!(
                table.engine_type(field_type),
                field_type.default_engine_type()
            );
        }
    }

    #[test]
    fn test_type_table_override() {
        let table = TypeTable::new().with(FieldType::DecimalField, "double");
        assert_eq!(table.engine_type(FieldType::DecimalField), "double");
        assert_eq!(table.engine_type(FieldType::CharField), "string");
    }

    #[test]
    fn test_resolve_timezone() {
        let ctx = CompilerContext::new();
        assert_eq!(ctx.resolve_timezone(None), None);
        assert_eq!(ctx.resolve_timezone(Some("UTC")), None);

        let ctx = CompilerContext::new().with_time_zone("America/Chicago");
        assert_eq!(ctx.resolve_timezone(None), Some("America/Chicago"));
        assert_eq!(ctx.resolve_timezone(Some("UTC")), Some("UTC"));

        let ctx = CompilerContext {
            use_tz: true,
            ..CompilerContext::default()
        };
        assert_eq!(ctx.resolve_timezone(None), None);
        assert_eq!(ctx.resolve_timezone(Some("UTC")), Some("UTC"));
    }

    #[test]
    fn test_settings_from_json() {
        let settings = Settings::from_json(
            r#"{
                "use_tz": true,
                "time_zone": "UTC",
                "collection": "orders",
                "data_types": {"DecimalField": "double"}
            }"#,
        )
        .unwrap();
        let ctx = settings.into_context();
        assert!(ctx.use_tz);
        assert_eq!(ctx.time_zone.as_deref(), Some("UTC"));
        assert_eq!(ctx.collection.as_deref(), Some("orders"));
        assert_eq!(ctx.data_types.engine_type(FieldType::DecimalField), "double");
        assert_eq!(ctx.data_types.engine_type(FieldType::FloatField), "double");
        assert_eq!(ctx.data_types.engine_type(FieldType::CharField), "string");
    }

    #[test]
    fn test_settings_empty_object() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.into_context(), CompilerContext::default());
    }

    #[test]
    fn test_settings_rejects_unknown_keys() {
        assert!(Settings::from_json(r#"{"timezone": "UTC"}"#).is_err());
        assert!(Settings::from_json(r#"{"data_types": {"NoSuchField": "int"}}"#).is_err());
    }

    #[test]
    fn test_settings_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"use_tz": true, "time_zone": "Asia/Tokyo"}}"#).unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert!(settings.use_tz);
        assert_eq!(settings.time_zone.as_deref(), Some("Asia/Tokyo"));
    }

    #[test]
    fn test_settings_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read settings file"));
    }
}
