// ── Provisioning workflow ──
//
// One sequential pass: validate locally, open a session, pick a vsys,
// create the base interface, bulk-create the subinterfaces, then bind
// them to the virtual router and zone. Any failure aborts the pass.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ProvisionConfig;
use crate::error::CoreError;
use crate::model::{Layer3Subinterface, SystemInfo, Vsys};
use crate::plan::ProvisionPlan;
use crate::select::VsysSelector;
use crate::session::{Connector, DeviceSession};

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub device: String,
    pub system: SystemInfo,
    pub vsys: Vsys,
    pub base_interface: String,
    pub subinterfaces: Vec<Layer3Subinterface>,
    pub virtual_router: String,
    pub zone: String,
    pub started_at: DateTime<Utc>,
    /// Wall time from the batch create through both associations.
    pub bulk_elapsed_ms: u64,
}

impl ProvisionReport {
    pub fn bulk_elapsed(&self) -> Duration {
        Duration::from_millis(self.bulk_elapsed_ms)
    }
}

/// Run the provisioning workflow once.
///
/// Nothing is sent to the device unless `config` validates. Changes land
/// in the candidate configuration; no commit is issued. There is no
/// rollback: if a step after the base interface fails, the base interface
/// stays on the device.
pub async fn provision<C, S>(
    config: &ProvisionConfig,
    connector: &C,
    selector: &S,
) -> Result<ProvisionReport, CoreError>
where
    C: Connector,
    S: VsysSelector + ?Sized,
{
    let plan = ProvisionPlan::from_config(config)?;
    let target = config.target()?;
    let started_at = Utc::now();
    debug!(tags = plan.tag_count(), interface = %plan.base.name, "plan validated");

    let session = connector.open(&target).await?;
    info!(url = %target.url, user = %target.username, "logged in");

    let system = session.system_info().await?;
    info!(%system, "connected to firewall");

    let available = session.list_vsys().await?;
    debug!(count = available.len(), "virtual systems listed");
    let vsys = selector.select(&available)?;
    info!(%vsys, "selected vsys");

    let existing = session.list_ethernet_interfaces().await?;
    if existing.iter().any(|name| *name == plan.base.name) {
        return Err(CoreError::InterfaceExists {
            name: plan.base.name.clone(),
        });
    }

    session.create_interface(&vsys, &plan.base).await?;
    info!(interface = %plan.base.name, mode = %plan.base.mode, "base interface created");

    let batch = plan.subinterfaces();
    let router = plan.virtual_router_assignment(&batch);
    let zone = plan.zone_assignment(&batch);

    let bulk_start = Instant::now();
    let remaining = async {
        session.create_subinterfaces(&vsys, &batch).await?;
        info!(count = batch.len(), "subinterfaces created");

        session.create_virtual_router(&vsys, &router).await?;
        info!(router = %router.router, "virtual router assigned");

        session.create_zone(&vsys, &zone).await?;
        info!(zone = %zone.zone, "security zone assigned");
        Ok::<_, CoreError>(())
    }
    .await;

    if let Err(e) = remaining {
        warn!(
            interface = %plan.base.name,
            "aborted after creating the base interface; it remains in the candidate config"
        );
        return Err(e);
    }

    let elapsed = bulk_start.elapsed();
    info!(elapsed_ms = elapsed.as_millis(), "bulk provisioning finished");

    Ok(ProvisionReport {
        device: target.url.to_string(),
        system,
        vsys,
        base_interface: plan.base.name.clone(),
        subinterfaces: batch,
        virtual_router: router.router,
        zone: zone.zone,
        started_at,
        bulk_elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    })
}
