/* #region integral names */

/// Integral names used by the named accessors of [`IntegralProvider`](crate::provider::IntegralProvider).
///
/// Names follow libcint conventions; the spherical/cartesian variant is decided by the molecule data.
#[derive(Debug, Clone)]
pub struct IntorNames {
    pub ovlp: String,
    pub kin: String,
    pub nuc: String,
    pub eri: String,
}

impl Default for IntorNames {
    fn default() -> Self {
        Self {
            ovlp: "int1e_ovlp".to_string(),
            kin: "int1e_kin".to_string(),
            nuc: "int1e_nuc".to_string(),
            eri: "int2e".to_string(),
        }
    }
}

/* #endregion */
