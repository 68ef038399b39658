// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Brushlink-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Brushlink and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

const CHAIN_AXIS: &str = "chain";
const DRAW_AXIS: &str = "draw";

/// Samples of one variable in one space, row-major, indexed `[dim0, dim1, ..., draw]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleArray {
    shape: Vec<usize>,
    data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    ShapeMismatch { expected: usize, actual: usize },
    RankMismatch { axes: usize, shape: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch { expected, actual } => write!(
                f,
                "shape holds {expected} values but data holds {actual}"
            ),
            Self::RankMismatch { axes, shape } => {
                write!(f, "{axes} axis names for a shape of rank {shape}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

impl SampleArray {
    /// Wraps data already laid out with the draw axis last.
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Result<Self, LayoutError> {
        let expected = shape.iter().product::<usize>();
        if shape.is_empty() || expected != data.len() {
            return Err(LayoutError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Builds an array from storage order: the `chain` axis is averaged away, the `draw` axis
    /// moves last, and a missing `draw` axis becomes a trailing axis of length 1.
    pub fn from_stored(axes: &[String], shape: &[usize], data: Vec<f64>) -> Result<Self, LayoutError> {
        if axes.len() != shape.len() {
            return Err(LayoutError::RankMismatch {
                axes: axes.len(),
                shape: shape.len(),
            });
        }
        let expected = shape.iter().product::<usize>();
        if expected != data.len() {
            return Err(LayoutError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }

        let chain = axes.iter().position(|axis| axis == CHAIN_AXIS);
        let draw = axes.iter().position(|axis| axis == DRAW_AXIS);
        if chain.is_none() && draw.map_or(true, |at| at + 1 == axes.len()) {
            let mut shape = shape.to_vec();
            if draw.is_none() {
                shape.push(1);
            }
            return Ok(Self { shape, data });
        }

        let kept: Vec<usize> = (0..axes.len())
            .filter(|axis| Some(*axis) != chain && Some(*axis) != draw)
            .collect();
        let draws = draw.map_or(1, |at| shape[at]);
        let mut out_shape: Vec<usize> = kept.iter().map(|axis| shape[*axis]).collect();
        out_shape.push(draws);

        let mut out_strides = vec![0usize; axes.len()];
        let mut stride = draws;
        for axis in kept.iter().rev() {
            out_strides[*axis] = stride;
            stride *= shape[*axis];
        }
        if let Some(at) = draw {
            out_strides[at] = 1;
        }

        let chains = chain.map_or(1, |at| shape[at]).max(1);
        let mut out = vec![0.0; out_shape.iter().product()];
        let mut index = vec![0usize; axes.len()];
        for value in data {
            let target: usize = index
                .iter()
                .zip(&out_strides)
                .map(|(position, stride)| position * stride)
                .sum();
            out[target] += value;
            for axis in (0..index.len()).rev() {
                index[axis] += 1;
                if index[axis] < shape[axis] {
                    break;
                }
                index[axis] = 0;
            }
        }
        if chains > 1 {
            let scale = 1.0 / chains as f64;
            out.iter_mut().for_each(|value| *value *= scale);
        }

        Ok(Self {
            shape: out_shape,
            data: out,
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Shape of the coordinate axes, draw axis excluded.
    pub fn index_shape(&self) -> &[usize] {
        &self.shape[..self.shape.len() - 1]
    }

    pub fn draws(&self) -> usize {
        self.shape.last().copied().unwrap_or(0)
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Every draw of the slice at `positions` (one position per coordinate axis).
    pub fn draw_slice(&self, positions: &[usize]) -> Option<&[f64]> {
        let index_shape = self.index_shape();
        if positions.len() != index_shape.len() {
            return None;
        }
        let mut offset = 0usize;
        for (position, len) in positions.iter().zip(index_shape) {
            if position >= len {
                return None;
            }
            offset = offset * len + position;
        }
        let draws = self.draws();
        let start = offset * draws;
        self.data.get(start..start + draws)
    }

    /// Values of one draw across every coordinate position.
    pub fn draw_values(&self, draw: usize) -> impl Iterator<Item = f64> + '_ {
        let stride = self.draws().max(1);
        let skip = if draw < self.draws() { draw } else { self.data.len() };
        self.data.iter().copied().skip(skip).step_by(stride)
    }
}

/// Plot range of a sample set: finite extremes padded by a tenth of the span.
pub fn padded_range(values: &[f64]) -> Option<(f64, f64)> {
    let (min, max) = values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, value| match acc {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })?;
    let span = max - min;
    let pad = if span > 0.0 { 0.1 * span } else { 0.5 };
    Some((min - pad, max + pad))
}

#[cfg(test)]
mod tests {
    use super::{padded_range, LayoutError, SampleArray};

    fn axes(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_owned()).collect()
    }

    #[test]
    fn chain_axis_is_averaged_and_draw_moves_last() {
        // [chain=2, draw=3, county=2]
        let data = vec![
            1.0, 10.0, 2.0, 20.0, 3.0, 30.0, // chain 0
            3.0, 30.0, 4.0, 40.0, 5.0, 50.0, // chain 1
        ];
        let array =
            SampleArray::from_stored(&axes(&["chain", "draw", "county"]), &[2, 3, 2], data)
                .expect("layout");
        assert_eq!(array.shape(), &[2, 3]);
        assert_eq!(array.draw_slice(&[0]), Some(&[2.0, 3.0, 4.0][..]));
        assert_eq!(array.draw_slice(&[1]), Some(&[20.0, 30.0, 40.0][..]));
        assert_eq!(array.draw_slice(&[2]), None);
    }

    #[test]
    fn observed_arrays_gain_a_single_draw() {
        let array =
            SampleArray::from_stored(&axes(&["obs"]), &[3], vec![1.0, 2.0, 3.0]).expect("layout");
        assert_eq!(array.shape(), &[3, 1]);
        assert_eq!(array.draws(), 1);
        assert_eq!(array.draw_values(0).collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn draw_values_stride_across_positions() {
        let array = SampleArray::new(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .expect("array");
        assert_eq!(array.draw_values(1).collect::<Vec<_>>(), vec![2.0, 5.0]);
        assert_eq!(array.draw_values(9).count(), 0);
    }

    #[test]
    fn rejects_inconsistent_shapes() {
        assert_eq!(
            SampleArray::new(vec![2, 2], vec![1.0]),
            Err(LayoutError::ShapeMismatch {
                expected: 4,
                actual: 1
            })
        );
        assert!(matches!(
            SampleArray::from_stored(&axes(&["draw"]), &[2, 1], vec![1.0, 2.0]),
            Err(LayoutError::RankMismatch { .. })
        ));
    }

    #[test]
    fn padded_range_ignores_non_finite_values() {
        assert_eq!(
            padded_range(&[f64::NAN, 0.0, 10.0, f64::INFINITY]),
            Some((-1.0, 11.0))
        );
        assert_eq!(padded_range(&[2.0, 2.0]), Some((1.5, 2.5)));
        assert_eq!(padded_range(&[f64::NAN]), None);
    }
}
