use super::Distribution;
use anyhow::{Result, bail};
use candle_core::Tensor;
use std::f64::consts::PI;

/// Diagonal normal distribution, `mean` and `std` share one shape. All operations are
/// elementwise.
#[derive(Debug, Clone)]
pub struct Normal {
    mean: Tensor,
    std: Tensor,
}

impl Normal {
    pub fn new(mean: Tensor, std: Tensor) -> Result<Self> {
        if mean.dims() != std.dims() {
            bail!(
                "mean {:?} and std {:?} must have the same shape",
                mean.dims(),
                std.dims()
            );
        }
        Ok(Self { mean, std })
    }

    pub fn mean(&self) -> &Tensor {
        &self.mean
    }

    pub fn std(&self) -> &Tensor {
        &self.std
    }
}

impl Distribution for Normal {
    fn sample(&self) -> Result<Tensor> {
        let noise = Tensor::randn(0f32, 1., self.mean.shape(), self.mean.device())?
            .to_dtype(self.mean.dtype())?;
        let action = (&self.mean + self.std.mul(&noise)?)?.detach();
        Ok(action)
    }

    fn log_prob(&self, action: &Tensor) -> Result<Tensor> {
        let var = self.std.sqr()?;
        let log_sqrt_2pi = (2. * PI).sqrt().ln();
        let log_probs = ((((action - &self.mean)?.sqr()? / (2. * var)?)?.neg()?
            - self.std.log()?)?
            - log_sqrt_2pi)?;
        Ok(log_probs)
    }

    fn entropy(&self) -> Result<Tensor> {
        let entropy = self.std.log()?.affine(1., 0.5 * ((2. * PI).ln() + 1.))?;
        Ok(entropy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    #[test]
    fn standard_normal_density_at_the_mean() -> Result<()> {
        let device = Device::Cpu;
        let mean = Tensor::zeros((1, 2), candle_core::DType::F32, &device)?;
        let std = Tensor::ones((1, 2), candle_core::DType::F32, &device)?;
        let normal = Normal::new(mean.clone(), std)?;
        let log_probs: Vec<Vec<f32>> = normal.log_prob(&mean)?.to_vec2()?;
        let expected = -0.5 * (2. * std::f32::consts::PI).ln();
        for value in log_probs[0].iter() {
            assert!((value - expected).abs() < 1e-6);
        }
        Ok(())
    }

    #[test]
    fn log_prob_accounts_for_std() -> Result<()> {
        let device = Device::Cpu;
        let mean = Tensor::new(&[[1f32]], &device)?;
        let std = Tensor::new(&[[2f32]], &device)?;
        let normal = Normal::new(mean, std)?;
        let action = Tensor::new(&[[3f32]], &device)?;
        let log_prob: Vec<Vec<f32>> = normal.log_prob(&action)?.to_vec2()?;
        // z = 1, so log p = -0.5 - ln 2 - ln sqrt(2 pi)
        let expected = -0.5 - 2f32.ln() - (2. * std::f32::consts::PI).sqrt().ln();
        assert!((log_prob[0][0] - expected).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn samples_keep_the_parameter_shape() -> Result<()> {
        let device = Device::Cpu;
        let mean = Tensor::zeros((5, 3), candle_core::DType::F32, &device)?;
        let std = Tensor::full(0.1f32, (5, 3), &device)?;
        let normal = Normal::new(mean, std)?;
        assert_eq!(normal.sample()?.dims(), &[5, 3]);
        assert_eq!(normal.entropy()?.dims(), &[5, 3]);
        Ok(())
    }

    #[test]
    fn mismatched_parameters_are_rejected() -> Result<()> {
        let device = Device::Cpu;
        let mean = Tensor::zeros((2, 3), candle_core::DType::F32, &device)?;
        let std = Tensor::ones(3, candle_core::DType::F32, &device)?;
        assert!(Normal::new(mean, std).is_err());
        Ok(())
    }
}
