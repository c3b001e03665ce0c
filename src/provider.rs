use crate::prelude::*;

/// Atom-indexed integral provider.
///
/// Holds a borrowed molecule (anything implementing [`IntegralEngine`], by default libcint's [`CInt`]) and
/// serves integral blocks addressed by atom subsets rather than shell indices.
///
/// # Usage
///
/// ```norun
/// let cint_data = CInt::from_json("h2o.json");
/// let provider = IntegralProvider::new(&cint_data);
/// let ovlp_oh = provider.get_ovlp(0, [1, 2])?;
/// ```
pub struct IntegralProvider<'a, E: ?Sized = CInt> {
    pub(crate) engine: &'a E,
    pub(crate) names: IntorNames,
}

impl<'a, E: IntegralEngine + ?Sized> IntegralProvider<'a, E> {
    pub fn new(engine: &'a E) -> Self {
        Self::with_names(engine, IntorNames::default())
    }

    pub fn with_names(engine: &'a E, names: IntorNames) -> Self {
        Self { engine, names }
    }

    pub fn engine(&self) -> &'a E {
        self.engine
    }

    pub fn names(&self) -> &IntorNames {
        &self.names
    }

    /// Integral `intor` with one atom subset per tensor axis.
    pub fn intor_atoms<A: Into<Atoms>>(&self, intor: &str, atoms: impl IntoIterator<Item = A>) -> Result<Tsr> {
        let shells = atoms.into_iter().map(|atoms| ShellSlices::List(self.shell_ranges(atoms))).collect::<Vec<_>>();
        self.intor(intor, &shells)
    }

    /// Overlap matrix between basis functions of `atoms1` (rows) and `atoms2` (columns).
    pub fn get_ovlp(&self, atoms1: impl Into<Atoms>, atoms2: impl Into<Atoms>) -> Result<Tsr> {
        self.intor_atoms(&self.names.ovlp, [atoms1.into(), atoms2.into()])
    }

    /// Kinetic energy matrix between basis functions of `atoms1` (rows) and `atoms2` (columns).
    pub fn get_kin(&self, atoms1: impl Into<Atoms>, atoms2: impl Into<Atoms>) -> Result<Tsr> {
        self.intor_atoms(&self.names.kin, [atoms1.into(), atoms2.into()])
    }

    /// External (nuclear attraction) potential matrix.
    pub fn get_ext_pot(&self, atoms1: impl Into<Atoms>, atoms2: impl Into<Atoms>) -> Result<Tsr> {
        self.intor_atoms(&self.names.nuc, [atoms1.into(), atoms2.into()])
    }

    /// Core Hamiltonian, kinetic plus external potential.
    pub fn get_hcore(&self, atoms1: impl Into<Atoms>, atoms2: impl Into<Atoms>) -> Result<Tsr> {
        let atoms1 = atoms1.into();
        let atoms2 = atoms2.into();
        let kin = self.get_kin(atoms1.clone(), atoms2.clone())?;
        let ext_pot = self.get_ext_pot(atoms1, atoms2)?;
        Ok(kin + ext_pot)
    }

    /// Electron repulsion integrals `(ij|kl)`, one atom subset per index.
    pub fn get_eri(
        &self,
        atoms1: impl Into<Atoms>,
        atoms2: impl Into<Atoms>,
        atoms3: impl Into<Atoms>,
        atoms4: impl Into<Atoms>,
    ) -> Result<Tsr> {
        self.intor_atoms(&self.names.eri, [atoms1.into(), atoms2.into(), atoms3.into(), atoms4.into()])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::engine::toy::ToyEngine;
    use approx::assert_abs_diff_eq;

    fn diff(a: &Tsr, b: &Tsr) -> f64 {
        assert_eq!(a.shape(), b.shape());
        (a - b).abs().sum()
    }

    #[test]
    fn test_two_atom_ovlp_shapes() {
        let engine = ToyEngine::two_atoms();
        let provider = IntegralProvider::new(&engine);

        let ovlp_01 = provider.get_ovlp(0, 1).unwrap();
        assert_eq!(ovlp_01.shape(), &vec![3, 2]);

        let ovlp = provider.get_ovlp(Atoms::All, Atoms::All).unwrap();
        assert_eq!(ovlp.shape(), &vec![5, 5]);
        let full = provider.intor("int1e_ovlp", &[ShellSlices::Range([0, 4]), ShellSlices::Range([0, 4])]).unwrap();
        assert_abs_diff_eq!(diff(&ovlp, &full), 0.0, epsilon = 1e-14);

        // off-diagonal block is a slice of the full matrix
        let block = provider.get_block([0, 1]);
        assert_abs_diff_eq!(diff(&ovlp_01, &block.take(ovlp.view()).unwrap()), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_hcore_is_kin_plus_ext_pot() {
        let engine = ToyEngine::interleaved();
        let provider = IntegralProvider::new(&engine);
        let pairs = [(Atoms::from(0), Atoms::from(2)), (Atoms::from([0, 2]), Atoms::All), (Atoms::from(1), Atoms::from(1))];
        for (atoms1, atoms2) in pairs {
            let hcore = provider.get_hcore(atoms1.clone(), atoms2.clone()).unwrap();
            let kin = provider.get_kin(atoms1.clone(), atoms2.clone()).unwrap();
            let ext_pot = provider.get_ext_pot(atoms1, atoms2).unwrap();
            assert_abs_diff_eq!(diff(&hcore, &(&kin + &ext_pot)), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_noncontiguous_atoms_match_full_slice() {
        let engine = ToyEngine::interleaved();
        let provider = IntegralProvider::new(&engine);
        let ovlp = provider.get_ovlp(Atoms::All, Atoms::All).unwrap();
        let kin = provider.get_kin(Atoms::All, Atoms::All).unwrap();

        for (atoms1, atoms2) in [(Atoms::from(0), Atoms::from(2)), (Atoms::from([2, 0]), Atoms::from([1]))] {
            let block = provider.get_block([atoms1.clone(), atoms2.clone()]);
            let ovlp_sub = provider.get_ovlp(atoms1.clone(), atoms2.clone()).unwrap();
            let kin_sub = provider.get_kin(atoms1, atoms2).unwrap();
            assert_eq!(ovlp_sub.shape(), &block.shape());
            assert_abs_diff_eq!(diff(&ovlp_sub, &block.take(ovlp.view()).unwrap()), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(diff(&kin_sub, &block.take(kin.view()).unwrap()), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_eri_diagonal_block() {
        let engine = ToyEngine::interleaved();
        let provider = IntegralProvider::new(&engine);
        let eri = provider.get_eri(Atoms::All, Atoms::All, Atoms::All, Atoms::All).unwrap();
        assert_eq!(eri.shape(), &vec![18; 4]);

        for atoms in [Atoms::from(0), Atoms::from(2), Atoms::from([1, 2])] {
            let eri_sub = provider.get_eri(atoms.clone(), atoms.clone(), atoms.clone(), atoms.clone()).unwrap();
            let block = provider.get_block([atoms.clone(), atoms.clone(), atoms.clone(), atoms]);
            assert_abs_diff_eq!(diff(&eri_sub, &block.take(eri.view()).unwrap()), 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_empty_subset_gives_empty_tensor() {
        let engine = ToyEngine::two_atoms();
        let provider = IntegralProvider::new(&engine);
        let ovlp = provider.get_ovlp(Atoms::Subset(vec![]), 1).unwrap();
        assert_eq!(ovlp.shape(), &vec![0, 2]);
        // atom ids without shells select nothing as well
        let ovlp = provider.get_ovlp(0, 7).unwrap();
        assert_eq!(ovlp.shape(), &vec![3, 0]);
    }

    #[test]
    fn test_unknown_intor_is_engine_error() {
        let engine = ToyEngine::two_atoms();
        let provider = IntegralProvider::new(&engine);
        let err = provider.intor_atoms("int1e_unknown", [0, 1]).unwrap_err();
        assert!(matches!(err, AtomIntError::Engine(_)));
    }

    #[test]
    fn test_custom_names() {
        let engine = ToyEngine::two_atoms();
        let names = IntorNames { ovlp: "int1e_kin".to_string(), ..Default::default() };
        let provider = IntegralProvider::with_names(&engine, names);
        let ovlp = provider.get_ovlp(0, 1).unwrap();
        let kin = provider.get_kin(0, 1).unwrap();
        assert_abs_diff_eq!(diff(&ovlp, &kin), 0.0, epsilon = 1e-14);
    }
}
