mod categorical_actor;
mod gaussian_actor;

pub use categorical_actor::CategoricalActor;
pub use gaussian_actor::GaussianActor;

use crate::{distributions::DistributionKind, tensors::Logp};
use anyhow::Result;
use candle_core::Tensor;
use enum_dispatch::enum_dispatch;

pub struct ActorOutput {
    pub distribution: DistributionKind,
    pub logp: Option<Logp>,
}

/// Maps observations `[B, ..obs_shape]` to an action distribution.
#[enum_dispatch]
pub trait Actor {
    fn distribution(&self, observation: &Tensor) -> Result<DistributionKind>;

    /// One log-probability per sample for `action` under `distribution`.
    fn log_prob(&self, distribution: &DistributionKind, action: &Tensor) -> Result<Logp>;

    fn apply(&self, observation: &Tensor, action: Option<&Tensor>) -> Result<ActorOutput> {
        let distribution = self.distribution(observation)?;
        let logp = match action {
            Some(action) => Some(self.log_prob(&distribution, action)?),
            None => None,
        };
        Ok(ActorOutput { distribution, logp })
    }
}

#[enum_dispatch(Actor)]
#[derive(Debug, Clone)]
pub enum ActorKind {
    Gaussian(GaussianActor),
    Categorical(CategoricalActor),
}
