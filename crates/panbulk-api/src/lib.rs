// panbulk-api: Async Rust client for the PAN-OS XML management API

pub mod client;
pub mod element;
pub mod error;
pub mod multi_config;
pub mod response;
pub mod transport;
pub mod xpath;

pub use client::XmlApiClient;
pub use element::Element;
pub use error::Error;
pub use multi_config::{MultiConfig, SetOperation};
pub use response::{ApiResponse, ResponseStatus, XmlNode};
pub use transport::{TlsMode, TransportConfig};
