use crate::{Error, rng::with_rng};
use anyhow::Result;
use rand::Rng;
use serde_json::Value;

/// Tag carried by every space. Consumers branch on this instead of on the concrete space type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpaceKind {
    Discrete,
    /// Continuous, bounded n-dimensional box.
    Box,
    MultiDiscrete,
}

pub trait Space {
    type Element: Clone;

    fn kind(&self) -> SpaceKind;

    /// Shape of a single element.
    fn shape(&self) -> Vec<usize>;

    /// Width of an element once laid out flat: the number of classes for a discrete space, the
    /// number of scalars otherwise.
    fn flat_dim(&self) -> usize;

    /// Returns a uniformly drawn element of the space.
    fn sample(&self) -> Self::Element;

    fn contains(&self, x: &Self::Element) -> bool;

    /// Canonical JSON encoding of the elements. Elements the space treats as equal must encode to
    /// equal values.
    fn to_jsonable(&self, elements: &[Self::Element]) -> Result<Vec<Value>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discrete {
    n: usize,
}

impl Discrete {
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidSpace("discrete space needs at least one value".into()).into());
        }
        Ok(Self { n })
    }

    pub fn n(&self) -> usize {
        self.n
    }
}

impl Space for Discrete {
    type Element = usize;

    fn kind(&self) -> SpaceKind {
        SpaceKind::Discrete
    }

    fn shape(&self) -> Vec<usize> {
        vec![]
    }

    fn flat_dim(&self) -> usize {
        self.n
    }

    fn sample(&self) -> usize {
        with_rng(|rng| rng.random_range(0..self.n))
    }

    fn contains(&self, x: &usize) -> bool {
        *x < self.n
    }

    fn to_jsonable(&self, elements: &[usize]) -> Result<Vec<Value>> {
        Ok(elements.iter().map(|x| Value::from(*x)).collect())
    }
}

/// A bounded, n-dimensional box defined by element-wise `low` and `high` bounds, stored flat in
/// row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpace {
    low: Vec<f32>,
    high: Vec<f32>,
    shape: Vec<usize>,
}

impl BoxSpace {
    pub fn new(low: Vec<f32>, high: Vec<f32>, shape: Vec<usize>) -> Result<Self> {
        let size: usize = shape.iter().product();
        if low.len() != size || high.len() != size {
            return Err(Error::InvalidSpace(format!(
                "bounds of length {}/{} do not match shape {shape:?}",
                low.len(),
                high.len()
            ))
            .into());
        }
        if low.iter().zip(&high).any(|(l, h)| l > h) {
            return Err(Error::InvalidSpace("low bound exceeds high bound".into()).into());
        }
        Ok(Self { low, high, shape })
    }

    pub fn new_with_universal_bounds(shape: Vec<usize>, low: f32, high: f32) -> Result<Self> {
        let size = shape.iter().product();
        Self::new(vec![low; size], vec![high; size], shape)
    }

    pub fn low(&self) -> &[f32] {
        &self.low
    }

    pub fn high(&self) -> &[f32] {
        &self.high
    }
}

impl Space for BoxSpace {
    type Element = Vec<f32>;

    fn kind(&self) -> SpaceKind {
        SpaceKind::Box
    }

    fn shape(&self) -> Vec<usize> {
        self.shape.clone()
    }

    fn flat_dim(&self) -> usize {
        self.low.len()
    }

    fn sample(&self) -> Vec<f32> {
        with_rng(|rng| {
            self.low
                .iter()
                .zip(&self.high)
                .map(|(low, high)| {
                    let (low, high) = (finitize(*low), finitize(*high));
                    low + (high - low) * rng.random::<f32>()
                })
                .collect()
        })
    }

    fn contains(&self, x: &Vec<f32>) -> bool {
        x.len() == self.low.len()
            && x
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(v, (low, high))| v >= low && v <= high)
    }

    /// Signed zeros share one encoding. NaN and infinities have none and are rejected.
    fn to_jsonable(&self, elements: &[Vec<f32>]) -> Result<Vec<Value>> {
        elements
            .iter()
            .map(|x| {
                let values = x
                    .iter()
                    .map(|v| match *v {
                        v if !v.is_finite() => Err(Error::NonFiniteElement(v).into()),
                        v if v == 0.0 => Ok(Value::from(0f32)),
                        v => Ok(Value::from(v)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Array(values))
            })
            .collect()
    }
}

// Infinite bounds are pulled in to half the representable range so that `high - low` stays finite.
fn finitize(value: f32) -> f32 {
    if value == f32::INFINITY {
        return f32::MAX / 2.0;
    }
    if value == f32::NEG_INFINITY {
        return f32::MIN / 2.0;
    }
    value
}

/// Cartesian product of discrete spaces, `nvec[i]` values on axis `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiDiscrete {
    nvec: Vec<usize>,
}

impl MultiDiscrete {
    pub fn new(nvec: Vec<usize>) -> Result<Self> {
        if nvec.is_empty() || nvec.contains(&0) {
            return Err(Error::InvalidSpace(format!("invalid multi discrete sizes {nvec:?}")).into());
        }
        Ok(Self { nvec })
    }

    pub fn nvec(&self) -> &[usize] {
        &self.nvec
    }
}

impl Space for MultiDiscrete {
    type Element = Vec<usize>;

    fn kind(&self) -> SpaceKind {
        SpaceKind::MultiDiscrete
    }

    fn shape(&self) -> Vec<usize> {
        vec![self.nvec.len()]
    }

    fn flat_dim(&self) -> usize {
        self.nvec.iter().sum()
    }

    fn sample(&self) -> Vec<usize> {
        with_rng(|rng| self.nvec.iter().map(|n| rng.random_range(0..*n)).collect())
    }

    fn contains(&self, x: &Vec<usize>) -> bool {
        x.len() == self.nvec.len() && x.iter().zip(&self.nvec).all(|(v, n)| v < n)
    }

    fn to_jsonable(&self, elements: &[Vec<usize>]) -> Result<Vec<Value>> {
        Ok(elements
            .iter()
            .map(|x| Value::Array(x.iter().map(|v| Value::from(*v)).collect()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrete_samples_stay_in_range() -> Result<()> {
        let space = Discrete::new(3)?;
        for _ in 0..100 {
            assert!(space.contains(&space.sample()));
        }
        assert_eq!(space.kind(), SpaceKind::Discrete);
        assert_eq!(space.flat_dim(), 3);
        Ok(())
    }

    #[test]
    fn empty_discrete_is_rejected() {
        let err = Discrete::new(0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidSpace(_))
        ));
    }

    #[test]
    fn unbounded_box_samples_are_finite() -> Result<()> {
        let space = BoxSpace::new_with_universal_bounds(vec![2], f32::NEG_INFINITY, f32::INFINITY)?;
        for _ in 0..100 {
            let x = space.sample();
            assert_eq!(x.len(), 2);
            assert!(x.iter().all(|v| v.is_finite()));
            assert!(space.contains(&x));
        }
        Ok(())
    }

    #[test]
    fn box_rejects_mismatched_bounds() {
        assert!(BoxSpace::new(vec![0.], vec![1., 1.], vec![2]).is_err());
        assert!(BoxSpace::new(vec![1., 0.], vec![0., 1.], vec![2]).is_err());
    }

    #[test]
    fn box_encoding_is_canonical() -> Result<()> {
        let space = BoxSpace::new_with_universal_bounds(vec![1], -1., 1.)?;
        let encoded = space.to_jsonable(&[vec![0.0], vec![-0.0]])?;
        assert_eq!(encoded[0], encoded[1]);
        assert_eq!(serde_json::to_string(&encoded[1])?, "[0.0]");
        let err = space.to_jsonable(&[vec![f32::NAN]]).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NonFiniteElement(_))));
        Ok(())
    }

    #[test]
    fn multi_discrete_encodes_elements_as_arrays() -> Result<()> {
        let space = MultiDiscrete::new(vec![4, 4])?;
        let encoded = space.to_jsonable(&[vec![1, 2], vec![3, 0]])?;
        assert_eq!(encoded[0].to_string(), "[1,2]");
        assert_eq!(encoded[1].to_string(), "[3,0]");
        assert!(!space.contains(&vec![4, 0]));
        Ok(())
    }
}
