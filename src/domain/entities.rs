pub mod image;
pub mod review;
pub mod saree;
