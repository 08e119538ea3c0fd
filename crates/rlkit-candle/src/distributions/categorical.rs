use super::Distribution;
use anyhow::Result;
use candle_core::{D, DType, Tensor};
use candle_nn::ops::{log_softmax, softmax};
use rand::distr::Distribution as RandDistribution;
use rand::distr::weighted::WeightedIndex;
use rlkit_core::rng::with_rng;

/// Categorical distribution over `n` classes parameterized by unnormalized logits `[B, n]`.
/// Actions are class indices `[B]` of dtype u32.
#[derive(Debug, Clone)]
pub struct Categorical {
    logits: Tensor,
}

impl Categorical {
    pub fn new(logits: Tensor) -> Self {
        Self { logits }
    }

    pub fn logits(&self) -> &Tensor {
        &self.logits
    }

    pub fn probs(&self) -> Result<Tensor> {
        Ok(softmax(&self.logits, D::Minus1)?)
    }
}

impl Distribution for Categorical {
    fn sample(&self) -> Result<Tensor> {
        let probs: Vec<Vec<f32>> = self.probs()?.to_dtype(DType::F32)?.to_vec2()?;
        let mut actions = Vec::with_capacity(probs.len());
        for row in probs.iter() {
            let distribution = WeightedIndex::new(row)?;
            actions.push(with_rng(|rng| distribution.sample(rng)) as u32);
        }
        let batch_size = actions.len();
        Ok(Tensor::from_vec(actions, batch_size, self.logits.device())?)
    }

    fn log_prob(&self, action: &Tensor) -> Result<Tensor> {
        let log_probs = log_softmax(&self.logits, D::Minus1)?;
        let index = action.to_dtype(DType::U32)?.unsqueeze(1)?.contiguous()?;
        Ok(log_probs.gather(&index, 1)?.squeeze(1)?)
    }

    fn entropy(&self) -> Result<Tensor> {
        let log_probs = log_softmax(&self.logits, D::Minus1)?;
        let probs = log_probs.exp()?;
        Ok((probs * log_probs)?.sum(D::Minus1)?.neg()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    #[test]
    fn uniform_logits_give_uniform_log_probs() -> Result<()> {
        let device = Device::Cpu;
        let logits = Tensor::zeros((3, 4), DType::F32, &device)?;
        let categorical = Categorical::new(logits);
        let actions = Tensor::new(&[0u32, 2, 3], &device)?;
        let log_probs: Vec<f32> = categorical.log_prob(&actions)?.to_vec1()?;
        for value in log_probs {
            assert!((value + 4f32.ln()).abs() < 1e-6);
        }
        let entropy: Vec<f32> = categorical.entropy()?.to_vec1()?;
        assert!((entropy[0] - 4f32.ln()).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn log_prob_picks_the_requested_class() -> Result<()> {
        let device = Device::Cpu;
        let logits = Tensor::new(&[[0f32, 1f32.ln()], [2f32.ln(), 0.]], &device)?;
        let categorical = Categorical::new(logits);
        let actions = Tensor::new(&[1u32, 0], &device)?;
        let log_probs: Vec<f32> = categorical.log_prob(&actions)?.to_vec1()?;
        assert!((log_probs[0] - 0.5f32.ln()).abs() < 1e-6);
        assert!((log_probs[1] - (2f32 / 3.).ln()).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn samples_follow_dominant_logits() -> Result<()> {
        let device = Device::Cpu;
        let logits = Tensor::new(&[[-50f32, 50., -50.], [50., -50., -50.]], &device)?;
        let categorical = Categorical::new(logits);
        for _ in 0..20 {
            let actions: Vec<u32> = categorical.sample()?.to_vec1()?;
            assert_eq!(actions, vec![1, 0]);
        }
        Ok(())
    }
}
