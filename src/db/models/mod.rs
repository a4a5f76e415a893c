// Database Models Module
// Re-exports all database model types

pub mod observation;

pub use observation::Observation;
