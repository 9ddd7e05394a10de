// Domain layer: record model, ports, and the pure validation services.

pub mod model;
pub mod ports;

pub mod services;
