use crate::{
    mlp::{Activation, Mlp, build_mlp},
    tensors::ValuesPred,
};
use anyhow::Result;
use candle_core::Tensor;
use candle_nn::{Module, VarBuilder};

#[derive(Debug, Clone)]
pub struct Critic {
    v_net: Mlp,
}

impl Critic {
    pub fn build(
        observation_shape: &[usize],
        hidden_sizes: &[usize],
        activation: Activation,
        vb: &VarBuilder,
    ) -> Result<Self> {
        let v_net = build_mlp(observation_shape, hidden_sizes, 1, activation, vb, "value")?;
        Ok(Self { v_net })
    }

    /// Value estimates shaped `[B, 1]`.
    pub fn apply(&self, observation: &Tensor) -> Result<ValuesPred> {
        Ok(ValuesPred(self.v_net.forward(observation)?))
    }

    /// Same as `apply` with the trailing dimension squeezed: `[B]`.
    pub fn values(&self, observation: &Tensor) -> Result<Tensor> {
        Ok(self.v_net.forward(observation)?.squeeze(1)?)
    }
}
