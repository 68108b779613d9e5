// thinqlink-api: Async Rust client for the LG ThinQ appliance cloud API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{CommandKind, DEFAULT_BASE_URL, Session, ThinqClient};
pub use error::Error;
pub use models::{DashboardDevice, DeviceData, FilterStatus};
pub use transport::{TlsMode, TransportConfig};
