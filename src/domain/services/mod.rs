// Stateless validation services. Each exposes one pure entry point.

pub mod batch;
pub mod classifier;
pub mod email;
pub mod identifier;
pub mod phone;
