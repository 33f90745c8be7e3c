pub mod home;
pub mod reviews;
pub mod sarees;
pub mod system;
