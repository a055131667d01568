// ── Vsys selection ──

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::config::ProvisionConfig;
use crate::error::CoreError;
use crate::model::Vsys;

/// Picks the virtual system a batch is provisioned into.
///
/// Implementations must return a member of `available` or an error.
pub trait VsysSelector {
    fn select(&self, available: &[Vsys]) -> Result<Vsys, CoreError>;
}

/// Uniform random choice. A fixed seed makes the choice reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector {
    seed: Option<u64>,
}

impl RandomSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

impl VsysSelector for RandomSelector {
    fn select(&self, available: &[Vsys]) -> Result<Vsys, CoreError> {
        let picked = match self.seed {
            Some(seed) => available.choose(&mut StdRng::seed_from_u64(seed)),
            None => available.choose(&mut rand::thread_rng()),
        };
        picked.cloned().ok_or(CoreError::NoVsys)
    }
}

/// Always the named vsys, which must exist on the device.
#[derive(Debug, Clone)]
pub struct NamedSelector(pub String);

impl VsysSelector for NamedSelector {
    fn select(&self, available: &[Vsys]) -> Result<Vsys, CoreError> {
        if available.is_empty() {
            return Err(CoreError::NoVsys);
        }
        available
            .iter()
            .find(|v| v.name() == self.0)
            .cloned()
            .ok_or_else(|| CoreError::VsysNotFound {
                name: self.0.clone(),
                available: available
                    .iter()
                    .map(Vsys::name)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// The selector implied by `config.vsys`.
pub fn selector_for(config: &ProvisionConfig) -> Box<dyn VsysSelector> {
    match config.vsys {
        Some(ref name) => Box::new(NamedSelector(name.clone())),
        None => Box::new(RandomSelector::new()),
    }
}
