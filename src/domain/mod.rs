// Domain layer: records, session state and the ports the controller talks through.

pub mod model;
pub mod ports;
