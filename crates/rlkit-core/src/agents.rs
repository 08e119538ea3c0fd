use crate::env::{ActionOf, Env, ObservationOf};
use anyhow::Result;

/// Anything that can pick an action for an observation of environment `E`.
pub trait Agent<E: Env> {
    fn action(&self, observation: &ObservationOf<E>) -> Result<ActionOf<E>>;
}
