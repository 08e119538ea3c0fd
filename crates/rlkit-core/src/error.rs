use crate::space::SpaceKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The action space kind has no actor variant.
    #[error("unsupported action space kind: {kind:?}")]
    UnsupportedActionSpace { kind: SpaceKind },

    /// A successor state produced by the environment is missing from the state enumeration.
    #[error("state {state} is not part of the state enumeration")]
    StateNotEnumerated { state: String },

    #[error("function approximator needs at least one hidden layer")]
    EmptyHiddenSizes,

    #[error("hidden layer {index} has size zero")]
    InvalidLayerSize { index: usize },

    #[error("discount factor must lie in [0, 1], got {0}")]
    InvalidDiscount(f64),

    #[error("invalid space: {0}")]
    InvalidSpace(String),

    #[error("box element {0} has no canonical encoding")]
    NonFiniteElement(f32),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
