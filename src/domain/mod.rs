// Domain layer: core models and ports (interfaces) the resolver is written against.

pub mod model;
pub mod ports;
