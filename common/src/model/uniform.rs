//! The uniform record persisted in the backing JSON file.
//!
//! A record is kept as the JSON value it was stored as. Known keys are read
//! and written through accessors, everything else (unknown keys, `null`s,
//! non-string values written by other tools) passes through untouched, so a
//! list or a read-modify-write cycle never reshapes data it did not change.
//!
//! Keys are camelCase. New records carry every image key, `null` when no file
//! is attached, and omit optional text fields that were not submitted.

use crate::model::image_slot::ImageSlot;
use crate::requests::UniformFields;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uniform(Value);

impl Uniform {
    /// Builds a new record from submitted fields.
    ///
    /// Returns `None` when `school` or `uniformCombo` is missing or empty.
    pub fn from_fields(id: String, fields: UniformFields) -> Option<Self> {
        let school = fields.school.filter(|s| !s.is_empty())?;
        let uniform_combo = fields.uniform_combo.filter(|s| !s.is_empty())?;

        let mut record = Map::new();
        record.insert("id".into(), Value::String(id));
        record.insert("school".into(), Value::String(school));
        if let Some(school_type) = fields.school_type {
            record.insert("schoolType".into(), Value::String(school_type));
        }
        record.insert("uniformCombo".into(), Value::String(uniform_combo));
        record.insert(ImageSlot::UniformImage.field_name().into(), Value::Null);
        if let Some(compound_wear) = fields.compound_wear {
            record.insert("compoundWear".into(), Value::String(compound_wear));
        }
        record.insert(ImageSlot::CompoundImage.field_name().into(), Value::Null);
        if let Some(church_wear) = fields.church_wear {
            record.insert("churchWear".into(), Value::String(church_wear));
        }
        record.insert(ImageSlot::ChurchImage.field_name().into(), Value::Null);
        Some(Uniform(Value::Object(record)))
    }

    /// Raw value of `key`, whatever its JSON type.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// The record id. Records whose id is missing or not a string match no path id.
    pub fn id(&self) -> Option<&str> {
        self.text("id")
    }

    pub fn school(&self) -> Option<&str> {
        self.text("school")
    }

    pub fn school_type(&self) -> Option<&str> {
        self.text("schoolType")
    }

    pub fn uniform_combo(&self) -> Option<&str> {
        self.text("uniformCombo")
    }

    pub fn compound_wear(&self) -> Option<&str> {
        self.text("compoundWear")
    }

    pub fn church_wear(&self) -> Option<&str> {
        self.text("churchWear")
    }

    pub fn set_id(&mut self, id: String) {
        self.insert("id", Value::String(id));
    }

    /// Returns the previous value. Records that are not JSON objects are left alone.
    fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        self.0.as_object_mut()?.insert(key.to_string(), value)
    }

    /// Shallow merge: every field present in `fields` overwrites, even when empty.
    pub fn merge_fields(&mut self, fields: UniformFields) {
        let UniformFields {
            school,
            school_type,
            uniform_combo,
            compound_wear,
            church_wear,
        } = fields;
        let present = [
            ("school", school),
            ("schoolType", school_type),
            ("uniformCombo", uniform_combo),
            ("compoundWear", compound_wear),
            ("churchWear", church_wear),
        ];
        for (key, value) in present {
            if let Some(value) = value {
                self.insert(key, Value::String(value));
            }
        }
    }

    pub fn image(&self, slot: ImageSlot) -> Option<&str> {
        self.text(slot.field_name())
    }

    /// Points `slot` at `path`, returning the upload path it replaced.
    pub fn set_image(&mut self, slot: ImageSlot, path: String) -> Option<String> {
        match self.insert(slot.field_name(), Value::String(path))? {
            Value::String(previous) => Some(previous),
            _ => None,
        }
    }

    /// All image paths currently attached, in slot order.
    pub fn images(&self) -> impl Iterator<Item = &str> {
        ImageSlot::ALL.into_iter().filter_map(|slot| self.image(slot))
    }
}
