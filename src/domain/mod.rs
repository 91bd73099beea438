// Domain layer: request model, parameter builders and the dispatch port.

pub mod model;
pub mod params;
pub mod ports;
