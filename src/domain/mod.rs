// Domain layer: wire models and the ports the sync routines depend on.

pub mod model;
pub mod ports;
