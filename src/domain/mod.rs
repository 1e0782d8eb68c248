// Domain layer: period/duration models and the ports the pipeline is built on.

pub mod model;
pub mod ports;
