// panbulk-core: Bulk subinterface provisioning on top of panbulk-api.

pub mod config;
pub mod device;
pub mod error;
pub mod model;
pub mod plan;
pub mod provision;
pub mod select;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DeviceTarget, ProvisionConfig, TlsVerification};
pub use device::{XmlApiConnector, XmlApiSession};
pub use error::CoreError;
pub use plan::ProvisionPlan;
pub use provision::{ProvisionReport, provision};
pub use select::{NamedSelector, RandomSelector, VsysSelector, selector_for};
pub use session::{Connector, DeviceSession};

pub use model::{
    EthernetInterface, InterfaceMode, Layer3Subinterface, SubinterfaceSettings, SystemInfo, Vsys,
    VirtualRouterAssignment, ZoneAssignment,
};
