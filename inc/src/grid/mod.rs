pub mod info;
pub mod liveness;
pub mod neighbour;
