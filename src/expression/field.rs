//! Output field descriptions used by casts.

use serde::{Deserialize, Serialize};

/// Abstract field types a value can be cast to.
///
/// Names follow the relational model's field classes so a type table written
/// for that layer can be loaded unchanged.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    AutoField,
    BigAutoField,
    BigIntegerField,
    BinaryField,
    BooleanField,
    CharField,
    DateField,
    DateTimeField,
    DecimalField,
    DurationField,
    FileField,
    FilePathField,
    FloatField,
    GenericIPAddressField,
    IntegerField,
    JSONField,
    PositiveBigIntegerField,
    PositiveIntegerField,
    PositiveSmallIntegerField,
    SlugField,
    SmallAutoField,
    SmallIntegerField,
    TextField,
    TimeField,
    UUIDField,
}

impl FieldType {
    pub const ALL: [FieldType; 25] = [
        FieldType::AutoField,
        FieldType::BigAutoField,
        FieldType::BigIntegerField,
        FieldType::BinaryField,
        FieldType::BooleanField,
        FieldType::CharField,
        FieldType::DateField,
        FieldType::DateTimeField,
        FieldType::DecimalField,
        FieldType::DurationField,
        FieldType::FileField,
        FieldType::FilePathField,
        FieldType::FloatField,
        FieldType::GenericIPAddressField,
        FieldType::IntegerField,
        FieldType::JSONField,
        FieldType::PositiveBigIntegerField,
        FieldType::PositiveIntegerField,
        FieldType::PositiveSmallIntegerField,
        FieldType::SlugField,
        FieldType::SmallAutoField,
        FieldType::SmallIntegerField,
        FieldType::TextField,
        FieldType::TimeField,
        FieldType::UUIDField,
    ];

    /// Engine type name used when no override is configured
    pub fn default_engine_type(&self) -> &'static str {
        match self {
            FieldType::AutoField
            | FieldType::IntegerField
            | FieldType::PositiveSmallIntegerField
            | FieldType::SmallAutoField
            | FieldType::SmallIntegerField => "int",
            FieldType::BigAutoField
            | FieldType::BigIntegerField
            | FieldType::DurationField
            | FieldType::PositiveBigIntegerField
            | FieldType::PositiveIntegerField => "long",
            FieldType::BinaryField => "binData",
            FieldType::BooleanField => "bool",
            FieldType::CharField
            | FieldType::FileField
            | FieldType::FilePathField
            | FieldType::GenericIPAddressField
            | FieldType::SlugField
            | FieldType::TextField
            | FieldType::UUIDField => "string",
            FieldType::DateField | FieldType::DateTimeField | FieldType::TimeField => "date",
            FieldType::DecimalField => "decimal",
            FieldType::FloatField => "double",
            FieldType::JSONField => "object",
        }
    }
}

/// Target of a cast: the field type plus optional storage constraints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputField {
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<u32>,
}

impl OutputField {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            max_length: None,
            decimal_places: None,
        }
    }

    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_decimal_places(mut self, decimal_places: u32) -> Self {
        self.decimal_places = Some(decimal_places);
        self
    }

    /// CharField(max_length=n)
    pub fn char(max_length: u32) -> Self {
        Self::new(FieldType::CharField).with_max_length(max_length)
    }

    /// DecimalField(decimal_places=n)
    pub fn decimal(decimal_places: u32) -> Self {
        Self::new(FieldType::DecimalField).with_decimal_places(decimal_places)
    }
}

impl From<FieldType> for OutputField {
    fn from(field_type: FieldType) -> Self {
        OutputField::new(field_type)
    }
}
