//! Integral evaluation over lists of shell ranges.

use crate::prelude::*;
use itertools::Itertools;

/// Shell ranges of one tensor axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellSlices {
    /// A single `[start, end)` shell range.
    Range([usize; 2]),
    /// Several shell ranges, concatenated in the given order.
    List(Vec<[usize; 2]>),
}

impl ShellSlices {
    pub fn ranges(&self) -> &[[usize; 2]] {
        match self {
            ShellSlices::Range(range) => std::slice::from_ref(range),
            ShellSlices::List(ranges) => ranges,
        }
    }
}

impl From<[usize; 2]> for ShellSlices {
    fn from(range: [usize; 2]) -> Self {
        ShellSlices::Range(range)
    }
}

impl From<Vec<[usize; 2]>> for ShellSlices {
    fn from(ranges: Vec<[usize; 2]>) -> Self {
        ShellSlices::List(ranges)
    }
}

impl<E: IntegralEngine + ?Sized> IntegralProvider<'_, E> {
    /// Integral `intor` with a list of shell ranges per tensor axis.
    ///
    /// Axes holding several ranges are evaluated range by range and concatenated along that axis, so one query
    /// may cover shells that are not contiguous in the molecule. Output is row-major.
    pub fn intor(&self, intor: &str, shells: &[ShellSlices]) -> Result<Tsr> {
        let device = DeviceTsr::default();
        let ao_loc = self.engine.ao_loc();
        let range_lists = shells.iter().map(ShellSlices::ranges).collect_vec();

        // basis-function span of each range, laid end to end along its axis
        let ao_spans = range_lists
            .iter()
            .map(|ranges| {
                let mut offset = 0;
                ranges
                    .iter()
                    .map(|&[start, end]| {
                        let size = ao_loc[end] - ao_loc[start];
                        offset += size;
                        offset - size..offset
                    })
                    .collect_vec()
            })
            .collect_vec();
        let shape = ao_spans.iter().map(|spans| spans.last().map_or(0, |span| span.end)).collect_vec();

        // empty atom subsets give zero-sized tensors without touching the engine
        if range_lists.iter().any(|ranges| ranges.is_empty()) {
            return Ok(rt::zeros((shape, &device)));
        }

        // every axis resolved to a single range: one engine call
        if range_lists.iter().all(|ranges| ranges.len() == 1) {
            let shls_slice = range_lists.iter().map(|ranges| ranges[0]).collect_vec();
            let out = self.integrate_checked(intor, &shls_slice, &shape)?;
            return Ok(rt::asarray((out, shape.c(), &device)));
        }

        let mut result: Tsr = rt::zeros((shape, &device));
        for choice in range_lists.iter().map(|ranges| 0..ranges.len()).multi_cartesian_product() {
            let shls_slice = choice.iter().zip(&range_lists).map(|(&k, ranges)| ranges[k]).collect_vec();
            let spans = choice.iter().zip(&ao_spans).map(|(&k, spans)| spans[k].clone()).collect_vec();
            let sub_shape = spans.iter().map(|span| span.len()).collect_vec();
            let sub = self.integrate_checked(intor, &shls_slice, &sub_shape)?;
            result.i_mut(spans).assign(&rt::asarray((sub, sub_shape.c(), &device)));
        }
        Ok(result)
    }

    fn integrate_checked(&self, intor: &str, shls_slice: &[[usize; 2]], shape: &[usize]) -> Result<Vec<f64>> {
        log::debug!("{intor} over shells {shls_slice:?}, shape {shape:?}");
        let out = self.engine.integrate_slice(intor, shls_slice)?;
        let size = shape.iter().product::<usize>();
        if out.len() != size {
            return Err(AtomIntError::Engine(format!(
                "{intor} returned {} values for shells {shls_slice:?}, expected {size}",
                out.len()
            )));
        }
        Ok(out)
    }
}
