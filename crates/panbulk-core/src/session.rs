// ── Device session seam ──
//
// The workflow only talks to a device through these two traits, so it can
// run against the XML API (`device.rs`) or an in-memory recorder in tests.

use crate::config::DeviceTarget;
use crate::error::CoreError;
use crate::model::{
    EthernetInterface, Layer3Subinterface, SystemInfo, VirtualRouterAssignment, Vsys,
    ZoneAssignment,
};

/// Opens authenticated sessions.
#[allow(async_fn_in_trait)]
pub trait Connector {
    type Session: DeviceSession;

    /// Authenticate against `target`. No configuration is read or written.
    async fn open(&self, target: &DeviceTarget) -> Result<Self::Session, CoreError>;
}

/// An authenticated management session on one device.
///
/// Every `create_*` call is a single write against the candidate config.
#[allow(async_fn_in_trait)]
pub trait DeviceSession {
    async fn system_info(&self) -> Result<SystemInfo, CoreError>;

    /// Virtual systems configured on the device, in device order.
    async fn list_vsys(&self) -> Result<Vec<Vsys>, CoreError>;

    /// Names of configured physical ethernet interfaces.
    async fn list_ethernet_interfaces(&self) -> Result<Vec<String>, CoreError>;

    /// Declare `interface` and import it into `vsys`.
    async fn create_interface(
        &self,
        vsys: &Vsys,
        interface: &EthernetInterface,
    ) -> Result<(), CoreError>;

    /// Create every subinterface in `batch` in one request and import them
    /// into `vsys`.
    async fn create_subinterfaces(
        &self,
        vsys: &Vsys,
        batch: &[Layer3Subinterface],
    ) -> Result<(), CoreError>;

    async fn create_virtual_router(
        &self,
        vsys: &Vsys,
        assignment: &VirtualRouterAssignment,
    ) -> Result<(), CoreError>;

    async fn create_zone(&self, vsys: &Vsys, assignment: &ZoneAssignment)
    -> Result<(), CoreError>;
}
