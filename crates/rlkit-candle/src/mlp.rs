use anyhow::Result;
use candle_core::Tensor;
use candle_nn::{Linear, Module, VarBuilder, linear};
use rlkit_core::Error;

/// Hidden-layer nonlinearity. Everything except tanh is delegated to `candle_nn::Activation`,
/// which has no tanh variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    Tanh,
    Nn(candle_nn::Activation),
}

impl From<candle_nn::Activation> for Activation {
    fn from(activation: candle_nn::Activation) -> Self {
        Self::Nn(activation)
    }
}

impl Module for Activation {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        match self {
            Self::Tanh => xs.tanh(),
            Self::Nn(activation) => activation.forward(xs),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Layer {
    /// Collapses everything after the batch dimension into `in_dim` features.
    Flatten { in_dim: usize },
    Linear(Linear),
    Activation(Activation),
}

impl Module for Layer {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        match self {
            Self::Flatten { in_dim } => {
                let batch_size = xs.dim(0)?;
                xs.reshape((batch_size, *in_dim))
            }
            Self::Linear(linear) => linear.forward(xs),
            Self::Activation(activation) => activation.forward(xs),
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct Mlp {
    layers: Vec<Layer>,
}

impl Module for Mlp {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let mut xs = xs.clone();
        for layer in self.layers.iter() {
            xs = layer.forward(&xs)?
        }
        Ok(xs)
    }
}

impl Mlp {
    pub fn add_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

/// Builds `[B, ..input_shape] -> [B, out_dim]`: one linear layer followed by `activation` per
/// entry of `hidden_sizes`, then a linear projection. Inputs that are not already `[B, features]`
/// get flattened first. Layer parameters are registered as `{prefix}{layer_idx}`.
pub fn build_mlp(
    input_shape: &[usize],
    hidden_sizes: &[usize],
    out_dim: usize,
    activation: Activation,
    vb: &VarBuilder,
    prefix: &str,
) -> Result<Mlp> {
    if hidden_sizes.is_empty() {
        return Err(Error::EmptyHiddenSizes.into());
    }
    if let Some(index) = hidden_sizes.iter().position(|size| *size == 0) {
        return Err(Error::InvalidLayerSize { index }.into());
    }
    let in_dim: usize = input_shape.iter().product();
    let mut nn = Mlp::default();
    if input_shape.len() != 1 {
        nn = nn.add_layer(Layer::Flatten { in_dim });
    }
    let mut last_dim = in_dim;
    for (layer_idx, layer_size) in hidden_sizes.iter().enumerate() {
        let layer = linear(last_dim, *layer_size, vb.pp(format!("{prefix}{layer_idx}")))?;
        nn = nn
            .add_layer(Layer::Linear(layer))
            .add_layer(Layer::Activation(activation));
        last_dim = *layer_size;
    }
    let output_layer = linear(
        last_dim,
        out_dim,
        vb.pp(format!("{prefix}{}", hidden_sizes.len())),
    )?;
    Ok(nn.add_layer(Layer::Linear(output_layer)))
}
