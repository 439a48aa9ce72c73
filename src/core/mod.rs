pub mod dict;
pub mod engine;
pub mod types;
