//! Basis transformation of tensors along selected axes.
//!
//! Each selected axis `a` of `o` is contracted with the first axis of `psi`:
//!
//! ```text
//! out[.., j, ..] = sum_i o[.., i, ..] * psi[i, j]
//! ```
//!
//! so for a matrix and [`TransformAxes::All`], the result is `psi.T @ o @ psi`.

use crate::prelude::*;
use std::str::FromStr;

/* #region axes and mode */

/// Axes of a tensor to be transformed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransformAxes {
    /// Every axis (`"all"`).
    #[default]
    All,
    /// The first two axes (`"f2"`).
    First2,
    /// The last two axes (`"l2"`).
    Last2,
    Single(usize),
    /// Explicit ordered list of axes.
    List(Vec<usize>),
}

impl TransformAxes {
    /// Resolve to concrete axis indices for a tensor of rank `ndim`.
    ///
    /// Axes out of range are rejected, and so is an axis given more than once, in either mode. Transforming an
    /// axis twice with a square `psi` is done by passing `psi @ psi` instead.
    pub fn resolve(&self, ndim: usize) -> Result<Vec<usize>> {
        let axes = match self {
            TransformAxes::All => (0..ndim).collect(),
            TransformAxes::First2 => vec![0, 1],
            TransformAxes::Last2 => match ndim {
                0 | 1 => return Err(AtomIntError::InvalidAxes(format!("last two axes of a tensor of rank {ndim}"))),
                _ => vec![ndim - 2, ndim - 1],
            },
            TransformAxes::Single(axis) => vec![*axis],
            TransformAxes::List(axes) => axes.clone(),
        };
        if let Some(&axis) = axes.iter().find(|&&axis| axis >= ndim) {
            return Err(AtomIntError::InvalidAxes(format!("axis {axis} out of range for tensor of rank {ndim}")));
        }
        for (n, axis) in axes.iter().enumerate() {
            if axes[..n].contains(axis) {
                return Err(AtomIntError::InvalidAxes(format!("axis {axis} given more than once")));
            }
        }
        Ok(axes)
    }
}

impl From<usize> for TransformAxes {
    fn from(axis: usize) -> Self {
        TransformAxes::Single(axis)
    }
}

impl From<Vec<usize>> for TransformAxes {
    fn from(axes: Vec<usize>) -> Self {
        TransformAxes::List(axes)
    }
}

impl From<&[usize]> for TransformAxes {
    fn from(axes: &[usize]) -> Self {
        TransformAxes::List(axes.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for TransformAxes {
    fn from(axes: [usize; N]) -> Self {
        TransformAxes::List(axes.to_vec())
    }
}

impl FromStr for TransformAxes {
    type Err = AtomIntError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "all" => Ok(TransformAxes::All),
            "f2" => Ok(TransformAxes::First2),
            "l2" => Ok(TransformAxes::Last2),
            list => {
                let axes = list
                    .split(',')
                    .map(|axis| axis.trim().parse::<usize>())
                    .collect::<std::result::Result<Vec<usize>, _>>()
                    .map_err(|err| AtomIntError::InvalidAxes(format!("{list}: {err}")))?;
                match axes.as_slice() {
                    [axis] => Ok(TransformAxes::Single(*axis)),
                    _ => Ok(TransformAxes::List(axes)),
                }
            },
        }
    }
}

/// How the contraction over several axes is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformMode {
    /// All selected axes contracted from one permuted layout (`"onecall"`).
    OneCall,
    /// One axis at a time (`"fast"`).
    #[default]
    Fast,
}

impl FromStr for TransformMode {
    type Err = AtomIntError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "onecall" => Ok(TransformMode::OneCall),
            "fast" => Ok(TransformMode::Fast),
            mode => Err(AtomIntError::UnknownTransformMode(mode.to_string())),
        }
    }
}

/* #endregion */

/* #region transform */

/// Transform tensor `o` by matrix `psi` along the given axes.
///
/// # Usage
///
/// ```norun
/// let mo_eri = transform(eri.view(), mo_coeff.view(), "all".parse()?, TransformMode::Fast)?;
/// ```
pub fn transform(o: TsrView, psi: TsrView, axes: impl Into<TransformAxes>, mode: TransformMode) -> Result<Tsr> {
    let shape = o.shape().to_vec();
    let axes = axes.into().resolve(shape.len())?;

    let psi_shape = psi.shape().to_vec();
    if psi_shape.len() != 2 {
        return Err(AtomIntError::InvalidAxes(format!("transformation matrix of rank {}", psi_shape.len())));
    }
    if let Some(&axis) = axes.iter().find(|&&axis| shape[axis] != psi_shape[0]) {
        return Err(AtomIntError::InvalidAxes(format!(
            "axis {axis} has length {}, transformation matrix has {} rows",
            shape[axis], psi_shape[0]
        )));
    }

    let result = match mode {
        TransformMode::Fast => {
            let mut result = o.to_owned();
            for &axis in &axes {
                result = transform_axis(result.view(), psi.view(), axis);
            }
            result
        },
        TransformMode::OneCall => transform_fused(o, psi, &axes),
    };
    Ok(result)
}

/// Contract a single axis with `psi`.
fn transform_axis(o: TsrView, psi: TsrView, axis: usize) -> Tsr {
    let n_in = psi.shape()[0];
    let n_out = psi.shape()[1];

    // move the axis to the end, then the contraction is a plain matmul
    let moved = o.swapaxes(axis as isize, -1);
    let nrow = moved.shape().iter().rev().skip(1).product::<usize>();
    let mut shape_out = moved.shape().to_vec();
    let ndim = shape_out.len();
    shape_out[ndim - 1] = n_out;

    let scr: Tsr = moved.reshape([nrow, n_in]).view() % psi;
    scr.into_shape(shape_out).swapaxes(axis as isize, -1).to_owned()
}

/// Contract all selected axes in one pass over a single permuted layout.
///
/// The selected axes are moved to the end once; each step then contracts the last axis and rotates the result to
/// the front of the selected block, so after `k` steps the selected block is back in order. Intermediates never
/// exceed the larger of `o` and the result.
fn transform_fused(o: TsrView, psi: TsrView, axes: &[usize]) -> Tsr {
    if axes.is_empty() {
        return o.to_owned();
    }
    let ndim = o.shape().len();
    let nfix = ndim - axes.len();
    let n_in = psi.shape()[0];
    let n_out = psi.shape()[1];

    // untouched axes first, selected axes last (in the given order)
    let perm = (0..ndim).filter(|axis| !axes.contains(axis)).chain(axes.iter().copied()).collect::<Vec<usize>>();
    let mut perm_inv = vec![0; ndim];
    for (n, &axis) in perm.iter().enumerate() {
        perm_inv[axis] = n;
    }
    let rotate = (0..nfix).chain([ndim - 1]).chain(nfix..ndim - 1).collect::<Vec<usize>>();

    let mut scr = o.permute_dims(perm).into_contig(RowMajor);
    for _ in axes {
        let mut shape = scr.shape().to_vec();
        let nrow = shape[..ndim - 1].iter().product::<usize>();
        shape[ndim - 1] = n_out;
        let contracted: Tsr = (scr.reshape([nrow, n_in]).view() % psi.view()).into_shape(shape);
        scr = contracted.permute_dims(rotate.as_slice()).into_contig(RowMajor);
    }
    scr.permute_dims(perm_inv).into_contig(RowMajor)
}

/* #endregion */
