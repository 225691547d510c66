// Domain layer: the capability interface and the types that cross it. No vendor types here.

pub mod model;
pub mod ports;
