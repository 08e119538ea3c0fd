pub mod categorical;
pub mod normal;

use anyhow::Result;
use candle_core::Tensor;
use categorical::Categorical;
use enum_dispatch::enum_dispatch;
use normal::Normal;

/// Batched action distribution. Instances are built per forward pass and are not meant to outlive
/// it.
#[enum_dispatch]
pub trait Distribution {
    fn sample(&self) -> Result<Tensor>;

    /// Log-density of `action`, elementwise for continuous distributions and one value per sample
    /// for categorical ones.
    fn log_prob(&self, action: &Tensor) -> Result<Tensor>;

    fn entropy(&self) -> Result<Tensor>;
}

#[enum_dispatch(Distribution)]
#[derive(Debug, Clone)]
pub enum DistributionKind {
    Normal(Normal),
    Categorical(Categorical),
}
