mod core;
mod gateway;
mod session;

pub use core::{Config, ReliabilityConfig};
pub use gateway::GatewayConfig;
pub use session::SessionConfig;
