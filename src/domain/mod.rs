// Domain layer: request-scoped models and the ports the workflows call through.

pub mod model;
pub mod ports;
