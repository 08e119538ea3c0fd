use crate::space::Space;
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct EnvironmentDescription<O, A> {
    pub observation_space: O,
    pub action_space: A,
}

impl<O: Space, A: Space> EnvironmentDescription<O, A> {
    pub fn new(observation_space: O, action_space: A) -> Self {
        Self {
            observation_space,
            action_space,
        }
    }

    pub fn action_size(&self) -> usize {
        self.action_space.flat_dim()
    }

    pub fn observation_size(&self) -> usize {
        self.observation_space.shape().iter().product()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapShot<T> {
    pub state: T,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
}

impl<T> SnapShot<T> {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

pub type ObservationOf<E> = <<E as Env>::ObservationSpace as Space>::Element;
pub type ActionOf<E> = <<E as Env>::ActionSpace as Space>::Element;

pub trait Env {
    type ObservationSpace: Space;
    type ActionSpace: Space;

    fn reset(&mut self) -> Result<<Self::ObservationSpace as Space>::Element>;
    fn step(
        &mut self,
        action: &<Self::ActionSpace as Space>::Element,
    ) -> Result<SnapShot<<Self::ObservationSpace as Space>::Element>>;
    fn env_description(&self) -> &EnvironmentDescription<Self::ObservationSpace, Self::ActionSpace>;
}
