//! Tabular dynamic programming over explicitly enumerated MDPs.

mod iterative_policy_evaluation;

pub use iterative_policy_evaluation::{IterativePolicyEvaluation, ValueAction};
