pub mod pixel_mapping;
pub mod view_transform;
