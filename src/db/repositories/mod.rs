// Repositories Module
// Re-exports all repository implementations

pub mod observation_repository;

pub use observation_repository::ObservationRepositoryImpl;
