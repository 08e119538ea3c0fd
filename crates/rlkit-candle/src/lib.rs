pub mod actor;
pub mod actor_critic;
pub mod critic;
pub mod distributions;
pub mod mlp;
pub mod tensors;
