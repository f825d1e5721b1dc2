pub mod lenient;
pub mod profile;
pub mod result;
