use super::Actor;
use crate::{
    distributions::{Distribution, DistributionKind, categorical::Categorical},
    mlp::{Activation, Mlp, build_mlp},
    tensors::Logp,
};
use anyhow::{Result, bail};
use candle_core::Tensor;
use candle_nn::{Module, VarBuilder};

#[derive(Debug, Clone)]
pub struct CategoricalActor {
    logits_net: Mlp,
    action_size: usize,
}

impl CategoricalActor {
    pub fn build(
        observation_shape: &[usize],
        action_size: usize,
        hidden_sizes: &[usize],
        activation: Activation,
        vb: &VarBuilder,
    ) -> Result<Self> {
        let logits_net = build_mlp(
            observation_shape,
            hidden_sizes,
            action_size,
            activation,
            vb,
            "logits",
        )?;
        Ok(Self {
            logits_net,
            action_size,
        })
    }

    pub fn action_size(&self) -> usize {
        self.action_size
    }
}

impl Actor for CategoricalActor {
    fn distribution(&self, observation: &Tensor) -> Result<DistributionKind> {
        let logits = self.logits_net.forward(observation)?;
        Ok(Categorical::new(logits).into())
    }

    fn log_prob(&self, distribution: &DistributionKind, action: &Tensor) -> Result<Logp> {
        let DistributionKind::Categorical(categorical) = distribution else {
            bail!("categorical actor expects a categorical distribution");
        };
        Ok(Logp(categorical.log_prob(action)?))
    }
}
