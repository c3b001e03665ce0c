//! The seam between atom-indexed queries and the integral engine.

use crate::prelude::*;

/// What the atom-indexed layer needs from a molecule and its integral engine.
///
/// Shells are numbered `0..nbas()` in the molecule's own order; basis functions are numbered by walking the
/// shells in that order.
pub trait IntegralEngine {
    fn natm(&self) -> usize;

    fn nbas(&self) -> usize;

    /// Atom owning shell `shl`.
    fn shell_atom(&self, shl: usize) -> usize;

    /// Number of basis functions in shell `shl`.
    fn shell_size(&self, shl: usize) -> usize;

    /// Evaluate integral `intor` over the given shell slice, one `[start, end)` pair per tensor axis.
    ///
    /// The returned buffer is row-major (same to PySCF), with each axis sized by the basis functions of its
    /// shell range.
    fn integrate_slice(&self, intor: &str, shls_slice: &[[usize; 2]]) -> Result<Vec<f64>>;

    /// Cumulative shell-to-basis offsets, of length `nbas() + 1`.
    fn ao_loc(&self) -> Vec<usize> {
        let mut ao_loc = vec![0];
        for shl in 0..self.nbas() {
            ao_loc.push(ao_loc[shl] + self.shell_size(shl));
        }
        ao_loc
    }

    /// Shells owned by `atom`, in shell order.
    fn atom_shell_ids(&self, atom: usize) -> Vec<usize> {
        (0..self.nbas()).filter(|&shl| self.shell_atom(shl) == atom).collect()
    }

    /// Number of basis functions spanned by a shell range.
    fn range_size(&self, range: [usize; 2]) -> usize {
        (range[0]..range[1]).map(|shl| self.shell_size(shl)).sum()
    }

    fn nao(&self) -> usize {
        self.range_size([0, self.nbas()])
    }
}

/// Shell metadata comes from libcint itself, so sizes follow the molecule's `cint_type` (sph, cart or spinor).
impl IntegralEngine for CInt {
    fn natm(&self) -> usize {
        CInt::natm(self)
    }

    fn nbas(&self) -> usize {
        CInt::nbas(self)
    }

    fn shell_atom(&self, shl: usize) -> usize {
        self.bas_atom(shl)
    }

    fn shell_size(&self, shl: usize) -> usize {
        let ao_loc = CInt::ao_loc(self);
        ao_loc[shl + 1] - ao_loc[shl]
    }

    fn ao_loc(&self) -> Vec<usize> {
        CInt::ao_loc(self)
    }

    fn atom_shell_ids(&self, atom: usize) -> Vec<usize> {
        CInt::atom_shell_ids(self, atom)
    }

    fn range_size(&self, range: [usize; 2]) -> usize {
        let ao_loc = CInt::ao_loc(self);
        ao_loc[range[1]] - ao_loc[range[0]]
    }

    fn nao(&self) -> usize {
        CInt::nao(self)
    }

    fn integrate_slice(&self, intor: &str, shls_slice: &[[usize; 2]]) -> Result<Vec<f64>> {
        // intor, "s1", partial shls_slice
        let (out, _shape): (Vec<f64>, Vec<usize>) = self
            .integrate_row_major_f(intor, None, shls_slice)
            .map_err(|err| AtomIntError::Engine(format!("{err:?}")))?
            .into();
        Ok(out)
    }
}

/// Deterministic engine with hand-made shell ownership, used in tests.
#[cfg(test)]
pub(crate) mod toy {
    use super::*;
    use itertools::Itertools;

    pub struct ToyEngine {
        /// (owning atom, number of basis functions) per shell
        pub shells: Vec<(usize, usize)>,
    }

    impl ToyEngine {
        /// Two atoms, atom 0 owning 3 basis functions (s + p) and atom 1 owning 2 (s + s).
        pub fn two_atoms() -> Self {
            Self { shells: vec![(0, 1), (0, 2), (1, 1), (1, 1)] }
        }

        /// Three atoms whose shells interleave, so atoms 0 and 2 own non-contiguous shells.
        pub fn interleaved() -> Self {
            Self { shells: vec![(0, 1), (1, 3), (0, 3), (2, 1), (2, 5), (1, 1), (0, 1), (2, 3)] }
        }

        fn ao_offset(&self, shl: usize) -> usize {
            self.shells[..shl].iter().map(|(_, n)| n).sum()
        }

        pub fn value(intor: &str, idx: &[usize]) -> Option<f64> {
            let (rank, seed) = match intor {
                "int1e_ovlp" => (2, 1.0),
                "int1e_kin" => (2, 2.0),
                "int1e_nuc" => (2, -3.0),
                "int2e" => (4, 0.5),
                _ => return None,
            };
            if idx.len() != rank {
                return None;
            }
            let mut val = seed;
            for (k, &i) in idx.iter().enumerate() {
                val = val * 1.25 + (i as f64 + 1.0) * (k as f64 + 0.5);
            }
            Some(val)
        }
    }

    impl IntegralEngine for ToyEngine {
        fn natm(&self) -> usize {
            self.shells.iter().map(|(atm, _)| atm + 1).max().unwrap_or(0)
        }

        fn nbas(&self) -> usize {
            self.shells.len()
        }

        fn shell_atom(&self, shl: usize) -> usize {
            self.shells[shl].0
        }

        fn shell_size(&self, shl: usize) -> usize {
            self.shells[shl].1
        }

        fn integrate_slice(&self, intor: &str, shls_slice: &[[usize; 2]]) -> Result<Vec<f64>> {
            let ao_ranges = shls_slice
                .iter()
                .map(|&[start, end]| self.ao_offset(start)..self.ao_offset(end))
                .collect_vec();
            ao_ranges
                .into_iter()
                .multi_cartesian_product()
                .map(|idx| {
                    Self::value(intor, &idx)
                        .ok_or_else(|| AtomIntError::Engine(format!("unknown integral {intor} of rank {}", idx.len())))
                })
                .collect()
        }
    }
}
