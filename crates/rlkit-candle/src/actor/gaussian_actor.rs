use super::Actor;
use crate::{
    distributions::{Distribution, DistributionKind, normal::Normal},
    mlp::{Activation, Mlp, build_mlp},
    tensors::Logp,
};
use anyhow::{Result, bail};
use candle_core::{D, Tensor};
use candle_nn::{Init, Module, VarBuilder};

pub const LOG_STD_INIT: f64 = -0.5;

/// Gaussian policy with a state independent, diagonal covariance. The log std is a trainable
/// parameter registered as `log_std` under the actor's VarBuilder prefix. Distributions and
/// actions are shaped `[B, ..action_shape]`.
#[derive(Debug, Clone)]
pub struct GaussianActor {
    mu_net: Mlp,
    log_std: Tensor,
    action_shape: Vec<usize>,
    act_dim: usize,
}

impl GaussianActor {
    pub fn build(
        observation_shape: &[usize],
        action_shape: &[usize],
        hidden_sizes: &[usize],
        activation: Activation,
        vb: &VarBuilder,
    ) -> Result<Self> {
        let act_dim: usize = action_shape.iter().product();
        let mu_net = build_mlp(observation_shape, hidden_sizes, act_dim, activation, vb, "mu")?;
        let log_std = vb.get_with_hints(act_dim, "log_std", Init::Const(LOG_STD_INIT))?;
        Ok(Self {
            mu_net,
            log_std,
            action_shape: action_shape.to_vec(),
            act_dim,
        })
    }

    pub fn log_std(&self) -> &Tensor {
        &self.log_std
    }

    pub fn action_shape(&self) -> &[usize] {
        &self.action_shape
    }

    pub fn act_dim(&self) -> usize {
        self.act_dim
    }
}

impl Actor for GaussianActor {
    fn distribution(&self, observation: &Tensor) -> Result<DistributionKind> {
        let mu = self.mu_net.forward(observation)?;
        let batch_size = mu.dim(0)?;
        let dims = [&[batch_size][..], &self.action_shape].concat();
        let std = self
            .log_std
            .exp()?
            .unsqueeze(0)?
            .broadcast_as((batch_size, self.act_dim))?
            .reshape(dims.as_slice())?;
        Ok(Normal::new(mu.reshape(dims.as_slice())?, std)?.into())
    }

    /// Sums the per-element log-density over every action axis.
    fn log_prob(&self, distribution: &DistributionKind, action: &Tensor) -> Result<Logp> {
        let DistributionKind::Normal(normal) = distribution else {
            bail!("gaussian actor expects a normal distribution");
        };
        let log_prob = normal.log_prob(action)?;
        let batch_size = log_prob.dim(0)?;
        Ok(Logp(log_prob.reshape((batch_size, self.act_dim))?.sum(D::Minus1)?))
    }
}
