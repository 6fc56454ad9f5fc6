//! Tridiagonal systems and the Thomas algorithm.
//!
//! Row `i` of the system reads
//!
//! ```text
//! lower[i] * x[i-1] + diag[i] * x[i] + upper[i] * x[i+1] = rhs[i]
//! ```
//!
//! with `lower[0]` and `upper[n-1]` ignored. The Thomas algorithm is a
//! forward elimination followed by back substitution, O(n) in time and
//! scratch. It does not pivot, so it is only used on diagonally dominant
//! systems such as the implicit diffusion operators assembled here.

/// A tridiagonal matrix stored as three diagonals of equal length.
#[derive(Clone, Debug, PartialEq)]
pub struct TridiagonalSystem {
    /// Sub-diagonal; `lower[0]` is unused.
    pub lower: Vec<f64>,
    /// Main diagonal.
    pub diag: Vec<f64>,
    /// Super-diagonal; `upper[n-1]` is unused.
    pub upper: Vec<f64>,
}

impl TridiagonalSystem {
    /// Identity system of size `n`.
    pub fn identity(n: usize) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![1.0; n],
            upper: vec![0.0; n],
        }
    }

    /// Implicit diffusion of interior interfaces between fixed end points.
    ///
    /// `kappa` holds one non-dimensional diffusivity per layer (length nk).
    /// The unknowns are the nk - 1 interior interfaces; interface `K`
    /// couples to its neighbors through the layers above (`kappa[K-1]`) and
    /// below (`kappa[K]`):
    ///
    /// ```text
    /// -κ[K-1] z[K-1] + (1 + κ[K-1] + κ[K]) z[K] - κ[K] z[K+1] = rhs[K]
    /// ```
    ///
    /// The boundary couplings `-κ[0] z[0]` and `-κ[nk-1] z[nk]` are not part
    /// of the matrix; use [`fold_boundaries`] to move them to the right-hand side.
    pub fn interface_diffusion(kappa: &[f64]) -> Self {
        let n = kappa.len().saturating_sub(1);
        let mut system = Self::identity(n);
        for i in 0..n {
            // Unknown i is interface K = i + 1
            let k_above = kappa[i];
            let k_below = kappa[i + 1];
            system.lower[i] = -k_above;
            system.diag[i] = 1.0 + k_above + k_below;
            system.upper[i] = -k_below;
        }
        system
    }

    /// Number of unknowns.
    #[inline]
    pub fn len(&self) -> usize {
        self.diag.len()
    }

    /// True for a system without unknowns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.diag.is_empty()
    }

    /// Matrix-vector product `A x`.
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        let n = self.len();
        (0..n)
            .map(|i| {
                let mut y = self.diag[i] * x[i];
                if i > 0 {
                    y += self.lower[i] * x[i - 1];
                }
                if i + 1 < n {
                    y += self.upper[i] * x[i + 1];
                }
                y
            })
            .collect()
    }

    /// Solve `A x = rhs` in place; on return `rhs` holds `x`.
    pub fn solve(&self, rhs: &mut [f64]) {
        solve_tridiagonal(&self.lower, &self.diag, &self.upper, rhs);
    }
}

/// Move the fixed end-point couplings of [`TridiagonalSystem::interface_diffusion`]
/// into the right-hand side.
///
/// `rhs` has nk - 1 entries, `kappa` nk entries.
pub fn fold_boundaries(rhs: &mut [f64], kappa: &[f64], top: f64, bottom: f64) {
    let n = rhs.len();
    if n == 0 {
        return;
    }
    rhs[0] += kappa[0] * top;
    rhs[n - 1] += kappa[n] * bottom;
}

/// Thomas algorithm: solve a tridiagonal system in place.
///
/// On return `rhs` holds the solution. The matrix is assumed to be
/// non-singular without pivoting (strict diagonal dominance is sufficient).
pub fn solve_tridiagonal(lower: &[f64], diag: &[f64], upper: &[f64], rhs: &mut [f64]) {
    let n = rhs.len();
    if n == 0 {
        return;
    }

    let mut c_prime = vec![0.0; n];

    let denom = diag[0];
    c_prime[0] = upper[0] / denom;
    rhs[0] /= denom;

    // Forward elimination
    for i in 1..n {
        let denom = diag[i] - lower[i] * c_prime[i - 1];
        if i < n - 1 {
            c_prime[i] = upper[i] / denom;
        }
        rhs[i] = (rhs[i] - lower[i] * rhs[i - 1]) / denom;
    }

    // Back substitution
    for i in (0..n - 1).rev() {
        rhs[i] -= c_prime[i] * rhs[i + 1];
    }
}
