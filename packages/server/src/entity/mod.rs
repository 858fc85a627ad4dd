pub mod category;
pub mod image;
pub mod image_category;
