// Domain layer: models, tunable policies and ports (interfaces).

pub mod model;
pub mod policy;
pub mod ports;
