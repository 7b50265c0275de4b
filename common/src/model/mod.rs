pub mod image_slot;
pub mod uniform;
