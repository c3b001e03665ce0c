#![allow(unused)]

/* #region for API callers */

pub use crate::atoms::{Atoms, BlockIndex};
pub use crate::engine::IntegralEngine;
pub use crate::error::AtomIntError;
pub use crate::intor::ShellSlices;
pub use crate::provider::IntegralProvider;
pub use crate::structs::IntorNames;
pub use crate::transform::{TransformAxes, TransformMode, transform};

pub type Tsr<D = IxD> = Tensor<f64, DeviceTsr, D>;
pub type TsrView<'a, D = IxD> = TensorView<'a, f64, DeviceTsr, D>;

/* #endregion */

/* #region for developers */

// RSTSR backend specification
pub type DeviceTsr = DeviceFaer;

pub(crate) use libcint::prelude::*;
pub(crate) use rstsr::prelude::*;

pub(crate) use crate::*;

pub(crate) type Result<T> = std::result::Result<T, AtomIntError>;

/* #endregion */
