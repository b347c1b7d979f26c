pub mod reductions;
pub mod transports;
