use candle_core::Tensor;
use derive_more::{Deref, DerefMut, Display};

/// Log-probabilities, one per sample: `[B]`.
#[derive(Deref, DerefMut, Debug, Display, Clone)]
pub struct Logp(pub Tensor);

/// Critic outputs: `[B, 1]`.
#[derive(Deref, DerefMut, Debug, Display, Clone)]
pub struct ValuesPred(pub Tensor);
