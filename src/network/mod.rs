//! Network boundary: the Discord gateway event handler.

mod gateway;

pub use gateway::Gateway;
