// API Routes Module

pub mod health;
pub mod observations;
pub mod search;
pub mod stats;
