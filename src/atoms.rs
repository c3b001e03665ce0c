//! Atom selections, and their resolution to basis functions and shell ranges.

use crate::prelude::*;
use itertools::Itertools;
use std::str::FromStr;

/* #region atom selection */

/// A subset of atoms; [`Atoms::All`] selects the whole molecule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Atoms {
    #[default]
    All,
    Subset(Vec<usize>),
}

impl Atoms {
    pub fn contains(&self, atom: usize) -> bool {
        match self {
            Atoms::All => true,
            Atoms::Subset(atoms) => atoms.contains(&atom),
        }
    }
}

impl From<usize> for Atoms {
    fn from(atom: usize) -> Self {
        Atoms::Subset(vec![atom])
    }
}

impl From<Vec<usize>> for Atoms {
    fn from(atoms: Vec<usize>) -> Self {
        Atoms::Subset(atoms)
    }
}

impl From<&[usize]> for Atoms {
    fn from(atoms: &[usize]) -> Self {
        Atoms::Subset(atoms.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Atoms {
    fn from(atoms: [usize; N]) -> Self {
        Atoms::Subset(atoms.to_vec())
    }
}

impl From<Option<Vec<usize>>> for Atoms {
    fn from(atoms: Option<Vec<usize>>) -> Self {
        atoms.map_or(Atoms::All, Atoms::Subset)
    }
}

impl FromStr for Atoms {
    type Err = AtomIntError;

    /// `all`, or comma-separated atom ids; an empty string is the empty subset.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "all" => Ok(Atoms::All),
            "" => Ok(Atoms::Subset(vec![])),
            list => list
                .split(',')
                .map(|atom| atom.trim().parse::<usize>())
                .collect::<std::result::Result<Vec<usize>, _>>()
                .map(Atoms::Subset)
                .map_err(|err| AtomIntError::InvalidAtoms(format!("{list}: {err}"))),
        }
    }
}

/* #endregion */

/* #region block index */

/// Open-mesh index of a tensor block: one list of basis-function indices per axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockIndex {
    pub indices: Vec<Vec<usize>>,
}

impl BlockIndex {
    pub fn shape(&self) -> Vec<usize> {
        self.indices.iter().map(|idx| idx.len()).collect()
    }

    /// Gather the block out of a dense tensor spanning all basis functions.
    pub fn take(&self, tensor: TsrView) -> Result<Tsr> {
        let ndim = tensor.shape().len();
        if ndim != self.indices.len() {
            return Err(AtomIntError::InvalidAxes(format!(
                "block of rank {} applied to tensor of rank {ndim}",
                self.indices.len()
            )));
        }
        for (axis, (idx, &len)) in self.indices.iter().zip(tensor.shape().iter()).enumerate() {
            if let Some(&bad) = idx.iter().find(|&&i| i >= len) {
                return Err(AtomIntError::InvalidAxes(format!("index {bad} out of range for axis {axis} of length {len}")));
            }
        }

        let Some(first) = self.indices.first() else {
            return Ok(tensor.to_owned());
        };
        // one gather per axis
        let mut block = tensor.index_select(0, first.as_slice());
        for (axis, idx) in self.indices.iter().enumerate().skip(1) {
            block = block.index_select(axis as isize, idx.as_slice());
        }
        Ok(block)
    }
}

/* #endregion */

/* #region atom/shell resolution */

impl<E: IntegralEngine + ?Sized> IntegralProvider<'_, E> {
    /// Owning atom of every basis function, in global basis order.
    pub fn ao_atom_labels(&self) -> Vec<usize> {
        let ao_loc = self.engine.ao_loc();
        (0..self.engine.nbas())
            .flat_map(|shl| std::iter::repeat_n(self.engine.shell_atom(shl), ao_loc[shl + 1] - ao_loc[shl]))
            .collect()
    }

    /// Basis-function indices of `atoms`.
    ///
    /// The candidate pool is first narrowed to basis functions owned by `domain`; `atoms` then filters that pool,
    /// and the returned indices are positions within it. With [`Atoms::All`] as domain the positions are global.
    pub fn get_atom_basis(&self, atoms: impl Into<Atoms>, domain: impl Into<Atoms>) -> Vec<usize> {
        let atoms = atoms.into();
        let domain = domain.into();
        let pool = self.ao_atom_labels().into_iter().filter(|&atom| domain.contains(atom)).collect_vec();
        pool.into_iter().enumerate().filter(|&(_, atom)| atoms.contains(atom)).map(|(idx, _)| idx).collect()
    }

    /// Block index for the given per-axis atom subsets.
    pub fn get_block<A: Into<Atoms>>(&self, atoms: impl IntoIterator<Item = A>) -> BlockIndex {
        let indices = atoms.into_iter().map(|atoms| self.get_atom_basis(atoms, Atoms::All)).collect();
        BlockIndex { indices }
    }

    /// Maximal contiguous `[start, end)` shell ranges owned by `atoms`, in shell order.
    pub fn shell_ranges(&self, atoms: impl Into<Atoms>) -> Vec<[usize; 2]> {
        let nbas = self.engine.nbas();
        let atoms = match atoms.into() {
            Atoms::All => return vec![[0, nbas]],
            atoms => atoms,
        };

        let mut ranges: Vec<[usize; 2]> = vec![];
        for shl in (0..nbas).filter(|&shl| atoms.contains(self.engine.shell_atom(shl))) {
            match ranges.last_mut() {
                Some(last) if last[1] == shl => last[1] += 1,
                _ => ranges.push([shl, shl + 1]),
            }
        }
        log::trace!("shell ranges of atoms {atoms:?}: {ranges:?}");
        ranges
    }

    pub fn atom_shell_ids(&self, atom: usize) -> Vec<usize> {
        self.engine.atom_shell_ids(atom)
    }

    /// Number of basis functions owned by `atom`.
    pub fn atomic_basis_size(&self, atom: usize) -> usize {
        let ao_loc = self.engine.ao_loc();
        self.atom_shell_ids(atom).into_iter().map(|shl| ao_loc[shl + 1] - ao_loc[shl]).sum()
    }
}

/* #endregion */
