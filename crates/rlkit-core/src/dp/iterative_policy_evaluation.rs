use crate::{
    Error,
    agents::Agent,
    env::{ActionOf, Env, ObservationOf},
    space::Space,
};
use anyhow::Result;
use log::{debug, info};
use std::{collections::HashMap, fmt::Debug, hash::Hash};

type EnvToStateRep<E, K> = Box<dyn Fn(&E) -> K>;
type EnvFromStateRep<E, K> = Box<dyn Fn(&K) -> Result<E>>;
type PolicyFn<E> = Box<dyn Fn(&ActionOf<E>, &ObservationOf<E>) -> f64>;
type DynamicsFn<E> = Box<dyn Fn(&ObservationOf<E>, f64, &ObservationOf<E>, &ActionOf<E>) -> f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct ValueAction<A> {
    pub value: f64,
    pub action: A,
}

/// Evaluates a fixed stochastic policy on a finite MDP with a known model by synchronous
/// Bellman expectation sweeps.
///
/// Each (state, action) pair is backed up with the single successor obtained by rebuilding the
/// environment in that state, resetting it and stepping once with the action. The values are
/// therefore exact only when transitions are deterministic. The state enumeration must be
/// exhaustive: every successor the environment can reach has to be listed, otherwise a sweep fails
/// with [`Error::StateNotEnumerated`].
pub struct IterativePolicyEvaluation<E: Env, K> {
    env: E,
    env_to_state_rep: EnvToStateRep<E, K>,
    env_from_state_rep: EnvFromStateRep<E, K>,
    all_state_reps: Vec<K>,
    policy: PolicyFn<E>,
    dynamics: DynamicsFn<E>,
    all_possible_actions: Vec<ActionOf<E>>,
    discount: f64,
    value_function: HashMap<K, f64>,
    // Never written to: there is no policy improvement step yet, so `action` always falls back to
    // sampling the action space.
    value_action_function: HashMap<String, ValueAction<ActionOf<E>>>,
}

impl<E, K> IterativePolicyEvaluation<E, K>
where
    E: Env,
    K: Eq + Hash + Clone + Debug,
{
    /// `policy(a, s)` is the probability of picking `a` in `s`. `dynamics(s', r, s, a)` is
    /// `p(s', r | s, a)`.
    pub fn new(
        env: E,
        env_to_state_rep: impl Fn(&E) -> K + 'static,
        env_from_state_rep: impl Fn(&K) -> Result<E> + 'static,
        all_state_reps: Vec<K>,
        policy: impl Fn(&ActionOf<E>, &ObservationOf<E>) -> f64 + 'static,
        dynamics: impl Fn(&ObservationOf<E>, f64, &ObservationOf<E>, &ActionOf<E>) -> f64 + 'static,
        all_possible_actions: Vec<ActionOf<E>>,
    ) -> Self {
        let value_function = all_state_reps.iter().map(|s| (s.clone(), 0.)).collect();
        Self {
            env,
            env_to_state_rep: Box::new(env_to_state_rep),
            env_from_state_rep: Box::new(env_from_state_rep),
            all_state_reps,
            policy: Box::new(policy),
            dynamics: Box::new(dynamics),
            all_possible_actions,
            discount: 1.,
            value_function,
            value_action_function: HashMap::new(),
        }
    }

    /// Sets the discount applied to successor values. Defaults to 1.
    pub fn with_discount(mut self, discount: f64) -> Result<Self> {
        if !(0. ..=1.).contains(&discount) {
            return Err(Error::InvalidDiscount(discount).into());
        }
        self.discount = discount;
        Ok(self)
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn value_function(&self) -> &HashMap<K, f64> {
        &self.value_function
    }

    pub fn value_action_function(&self) -> &HashMap<String, ValueAction<ActionOf<E>>> {
        &self.value_action_function
    }

    pub fn value(&self, state_rep: &K) -> Option<f64> {
        self.value_function.get(state_rep).copied()
    }

    /// Runs exactly `steps` sweeps and returns the largest absolute value change of the last one.
    pub fn train(&mut self, steps: usize, verbose: bool) -> Result<f64> {
        let mut max_delta = 0.;
        for step in 1..=steps {
            let updated_values = self.sweep()?;
            max_delta = updated_values
                .iter()
                .map(|(state_rep, value)| {
                    let old = self.value_function.get(state_rep).copied().unwrap_or(0.);
                    (value - old).abs()
                })
                .fold(0., f64::max);
            self.value_function.extend(updated_values);
            if verbose {
                info!("sweep {step}/{steps}, max value change {max_delta}");
            } else {
                debug!("sweep {step}/{steps}, max value change {max_delta}");
            }
        }
        Ok(max_delta)
    }

    // Reads only from `value_function`; the caller commits the result once the sweep is complete.
    fn sweep(&self) -> Result<Vec<(K, f64)>> {
        let mut updated_values = Vec::with_capacity(self.all_state_reps.len());
        for state_rep in &self.all_state_reps {
            let mut v_pi_s = 0.;
            for action in &self.all_possible_actions {
                let mut env = (self.env_from_state_rep)(state_rep)?;
                let observation = env.reset()?;
                let snapshot = env.step(action)?;
                let p_action = (self.policy)(action, &observation);
                let successor_rep = (self.env_to_state_rep)(&env);
                let v_pi_successor = self.value_function.get(&successor_rep).copied().ok_or_else(
                    || Error::StateNotEnumerated {
                        state: format!("{successor_rep:?}"),
                    },
                )?;
                let p_transition =
                    (self.dynamics)(&snapshot.state, snapshot.reward, &observation, action);
                v_pi_s +=
                    p_action * p_transition * (snapshot.reward + self.discount * v_pi_successor);
            }
            updated_values.push((state_rep.clone(), v_pi_s));
        }
        Ok(updated_values)
    }

    /// Looks the observation up in the value-action table and samples the action space when it
    /// is missing, which is currently always the case.
    pub fn action(&self, observation: &ObservationOf<E>) -> Result<ActionOf<E>> {
        let hash = self.hash_state(observation)?;
        match self.value_action_function.get(&hash) {
            Some(choice) => Ok(choice.action.clone()),
            None => Ok(self.env.env_description().action_space.sample()),
        }
    }

    /// Canonical key of an observation: the JSON text of its encoding by the observation space.
    pub fn hash_state(&self, observation: &ObservationOf<E>) -> Result<String> {
        let encoded = self
            .env
            .env_description()
            .observation_space
            .to_jsonable(std::slice::from_ref(observation))?;
        let encoded = encoded.into_iter().next().ok_or_else(|| {
            Error::InvalidSpace("observation space returned an empty encoding".into())
        })?;
        Ok(serde_json::to_string(&encoded).map_err(Error::from)?)
    }
}

impl<E, K> Agent<E> for IterativePolicyEvaluation<E, K>
where
    E: Env,
    K: Eq + Hash + Clone + Debug,
{
    fn action(&self, observation: &ObservationOf<E>) -> Result<ActionOf<E>> {
        IterativePolicyEvaluation::action(self, observation)
    }
}
