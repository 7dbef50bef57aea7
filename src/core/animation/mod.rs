pub mod driver;
pub mod errors;
pub mod oscillation;
pub mod rotation;
