// Domain layer: API shapes and the ports the client and pages talk through.

pub mod model;
pub mod ports;
