use crate::{
    actor::{Actor, ActorKind, CategoricalActor, GaussianActor},
    critic::Critic,
    distributions::Distribution,
    mlp::Activation,
    tensors::{Logp, ValuesPred},
};
use anyhow::Result;
use candle_core::Tensor;
use candle_nn::VarBuilder;
use log::debug;
use rlkit_core::{
    Error,
    env::EnvironmentDescription,
    space::{Space, SpaceKind},
};

/// Topology shared by the actor and the critic.
#[derive(Debug, Clone)]
pub struct ActorCriticConfig {
    pub hidden_sizes: Vec<usize>,
    pub activation: Activation,
}

impl Default for ActorCriticConfig {
    fn default() -> Self {
        Self {
            hidden_sizes: vec![64, 64],
            activation: Activation::Tanh,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActorCriticStep {
    pub action: Tensor,
    pub logp: Logp,
    pub value: ValuesPred,
}

#[derive(Debug, Clone)]
pub struct ActorCritic {
    pi: ActorKind,
    v: Critic,
}

impl ActorCritic {
    /// Picks the actor from the action space kind: a box gets a Gaussian actor, a discrete space a
    /// categorical one. Actor parameters live under `pi`, critic parameters under `v`.
    pub fn new<O: Space, A: Space>(
        env_description: &EnvironmentDescription<O, A>,
        config: &ActorCriticConfig,
        vb: &VarBuilder,
    ) -> Result<Self> {
        let observation_shape = env_description.observation_space.shape();
        let ActorCriticConfig {
            hidden_sizes,
            activation,
        } = config;
        let pi_vb = vb.pp("pi");
        let pi: ActorKind = match env_description.action_space.kind() {
            SpaceKind::Box => {
                let action_shape = env_description.action_space.shape();
                debug!(
                    "gaussian actor, observation shape {observation_shape:?}, action shape {action_shape:?}"
                );
                GaussianActor::build(
                    &observation_shape,
                    &action_shape,
                    hidden_sizes,
                    *activation,
                    &pi_vb,
                )?
                .into()
            }
            SpaceKind::Discrete => {
                let action_size = env_description.action_size();
                debug!(
                    "categorical actor, observation shape {observation_shape:?}, {action_size} actions"
                );
                CategoricalActor::build(
                    &observation_shape,
                    action_size,
                    hidden_sizes,
                    *activation,
                    &pi_vb,
                )?
                .into()
            }
            kind => return Err(Error::UnsupportedActionSpace { kind }.into()),
        };
        let v = Critic::build(&observation_shape, hidden_sizes, *activation, &vb.pp("v"))?;
        Ok(Self { pi, v })
    }

    pub fn pi(&self) -> &ActorKind {
        &self.pi
    }

    pub fn v(&self) -> &Critic {
        &self.v
    }

    /// Samples an action, scores it under the same distribution and evaluates the critic.
    pub fn step(&self, observation: &Tensor) -> Result<ActorCriticStep> {
        let pi = self.pi.distribution(observation)?;
        let action = pi.sample()?;
        let logp = self.pi.log_prob(&pi, &action)?;
        let value = self.v.apply(observation)?;
        Ok(ActorCriticStep {
            action,
            logp,
            value,
        })
    }

    pub fn act(&self, observation: &Tensor) -> Result<Tensor> {
        Ok(self.step(observation)?.action)
    }
}
