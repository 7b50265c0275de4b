use serde::{Deserialize, Serialize};

/// One of the three named file attachment points on a uniform record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSlot {
    UniformImage,
    CompoundImage,
    ChurchImage,
}

impl ImageSlot {
    pub const ALL: [ImageSlot; 3] = [
        ImageSlot::UniformImage,
        ImageSlot::CompoundImage,
        ImageSlot::ChurchImage,
    ];

    /// Form field name used for uploads and the JSON key on the record.
    pub fn field_name(self) -> &'static str {
        match self {
            ImageSlot::UniformImage => "uniformImage",
            ImageSlot::CompoundImage => "compoundImage",
            ImageSlot::ChurchImage => "churchImage",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.field_name() == name)
    }
}
