// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Prolate spheroidal angular functions of the first kind, S_mn(c, x).
//!
//! S_mn is expanded in associated Legendre functions,
//!
//! S_mn(c, x) = Σ_r d_r P_{m+r}^m(x),
//!
//! where r runs over the integers with the same parity as n - m. The d_r
//! satisfy a three-term recurrence (Abramowitz & Stegun 21.7.3), so they are
//! an eigenvector of a tridiagonal matrix whose eigenvalue is the
//! characteristic value λ_mn(c). The matrix is symmetrised with a diagonal
//! similarity transform, λ is found by Sturm-sequence bisection and the vector
//! by inverse iteration.
//!
//! Normalisation follows Flammer (1957): S_mn(c, 0) = P_n^m(0) for even n - m,
//! and S'_mn(c, 0) = P_n^m'(0) for odd n - m. No Condon-Shortley phase is used
//! for the Legendre functions.

use log::trace;
use ndarray::prelude::*;

use super::SpheroidalError;

/// Recurrence terms kept beyond the wanted one, in addition to `ceil(c)`.
const EXTRA_TERMS: usize = 30;

/// Bisection stops after this many halvings, even if the bracket hasn't
/// collapsed.
const MAX_BISECTIONS: usize = 200;

const INVERSE_ITERATIONS: usize = 3;

/// The last expansion coefficient must be this small relative to the largest
/// one.
const CONVERGENCE_TOLERANCE: f64 = 1e-12;

/// Evaluate the prolate spheroidal angular function of the first kind,
/// S_mn(c, x), at every x in `xs`. Every x must be in [-1, 1].
pub fn prolate_spheroidal_angular(
    m: u32,
    n: u32,
    c: f64,
    xs: ArrayView1<f64>,
) -> Result<Array1<f64>, SpheroidalError> {
    if let Some(&x) = xs.iter().find(|x| !(-1.0..=1.0).contains(*x)) {
        return Err(SpheroidalError::OutOfDomain(x));
    }
    let expansion = Expansion::new(m, n, c)?;
    trace!(
        "S_{m}{n}(c = {c}): λ = {}, {} expansion terms",
        expansion.eigenvalue,
        expansion.coeffs.len()
    );

    xs.iter()
        .map(|&x| {
            let s = expansion.evaluate(x);
            if s.is_finite() {
                Ok(s)
            } else {
                Err(SpheroidalError::NotFinite { m, n, c, x })
            }
        })
        .collect()
}

/// The characteristic value λ_mn(c) of the prolate spheroidal wave equation.
pub fn prolate_characteristic_value(m: u32, n: u32, c: f64) -> Result<f64, SpheroidalError> {
    Expansion::new(m, n, c).map(|e| e.eigenvalue)
}

/// Flammer-normalised Legendre expansion coefficients of S_mn(c, x).
struct Expansion {
    m: u32,
    /// `r` for each coefficient; r = 2k + (n - m) % 2.
    rs: Vec<u32>,
    coeffs: Vec<f64>,
    eigenvalue: f64,
}

impl Expansion {
    fn new(m: u32, n: u32, c: f64) -> Result<Expansion, SpheroidalError> {
        if n < m {
            return Err(SpheroidalError::DegreeBelowOrder { m, n });
        }
        if !c.is_finite() || c < 0.0 {
            return Err(SpheroidalError::InvalidBandwidth(c));
        }

        let parity = (n - m) % 2;
        let wanted = ((n - m) / 2) as usize;
        let num_terms = wanted + c.ceil() as usize + EXTRA_TERMS;
        let rs: Vec<u32> = (0..num_terms as u32).map(|k| 2 * k + parity).collect();
        let recurrence = Recurrence::new(m, &rs, c * c);

        let (eigenvalue, mut coeffs) = if c == 0.0 {
            // The matrix is diagonal and the functions are Legendre functions.
            let mut coeffs = vec![0.0; num_terms];
            coeffs[wanted] = 1.0;
            (recurrence.diag[wanted], coeffs)
        } else {
            let eigenvalue = recurrence.eigenvalue(wanted);
            let y = recurrence.eigenvector(eigenvalue);
            (eigenvalue, recurrence.unsymmetrise(&y))
        };

        let largest = coeffs.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));
        let last = coeffs.last().map(|d| d.abs()).unwrap_or(0.0);
        if largest == 0.0 || !largest.is_finite() || last > CONVERGENCE_TOLERANCE * largest {
            return Err(SpheroidalError::NoConvergence { m, n, c });
        }

        // Flammer's normalisation.
        let max_degree = m + rs[rs.len() - 1];
        let p0 = associated_legendre(m, max_degree, 0.0);
        let (target, actual) = if parity == 0 {
            let actual: f64 = rs
                .iter()
                .zip(coeffs.iter())
                .map(|(&r, d)| d * p0[r as usize])
                .sum();
            (p0[(n - m) as usize], actual)
        } else {
            // P_l^m'(0) = (l + m) P_{l-1}^m(0).
            let actual: f64 = rs
                .iter()
                .zip(coeffs.iter())
                .map(|(&r, d)| d * f64::from(r + 2 * m) * p0[r as usize - 1])
                .sum();
            (f64::from(n + m) * p0[(n - m) as usize - 1], actual)
        };
        if actual == 0.0 || !actual.is_finite() {
            return Err(SpheroidalError::NoConvergence { m, n, c });
        }
        let scale = target / actual;
        coeffs.iter_mut().for_each(|d| *d *= scale);

        Ok(Expansion {
            m,
            rs,
            coeffs,
            eigenvalue,
        })
    }

    fn evaluate(&self, x: f64) -> f64 {
        let max_degree = self.m + self.rs[self.rs.len() - 1];
        let p = associated_legendre(self.m, max_degree, x);
        self.rs
            .iter()
            .zip(self.coeffs.iter())
            .map(|(&r, d)| d * p[r as usize])
            .sum()
    }
}

/// The symmetrised tridiagonal form of the coefficient recurrence.
struct Recurrence {
    alphas: Vec<f64>,
    gammas: Vec<f64>,
    diag: Vec<f64>,
    off_diag: Vec<f64>,
}

impl Recurrence {
    fn new(m: u32, rs: &[u32], c2: f64) -> Recurrence {
        let m = f64::from(m);
        let alphas: Vec<f64> = rs
            .iter()
            .map(|&r| {
                let r = f64::from(r);
                (2.0 * m + r + 2.0) * (2.0 * m + r + 1.0) * c2
                    / ((2.0 * m + 2.0 * r + 3.0) * (2.0 * m + 2.0 * r + 5.0))
            })
            .collect();
        let gammas: Vec<f64> = rs
            .iter()
            .map(|&r| {
                let r = f64::from(r);
                r * (r - 1.0) * c2 / ((2.0 * m + 2.0 * r - 3.0) * (2.0 * m + 2.0 * r - 1.0))
            })
            .collect();
        let diag = rs
            .iter()
            .map(|&r| {
                let mr = m + f64::from(r);
                mr * (mr + 1.0)
                    + (2.0 * mr * (mr + 1.0) - 2.0 * m * m - 1.0) * c2
                        / ((2.0 * mr - 1.0) * (2.0 * mr + 3.0))
            })
            .collect();
        let off_diag = alphas
            .iter()
            .zip(gammas.iter().skip(1))
            .map(|(a, g)| (a * g).sqrt())
            .collect();

        Recurrence {
            alphas,
            gammas,
            diag,
            off_diag,
        }
    }

    /// The number of eigenvalues less than `x`.
    fn count_below(&self, x: f64) -> usize {
        let mut count = 0;
        let mut q = 1.0;
        for (i, d) in self.diag.iter().enumerate() {
            let coupling = if i == 0 {
                0.0
            } else {
                self.off_diag[i - 1] * self.off_diag[i - 1] / q
            };
            q = d - x - coupling;
            if q == 0.0 {
                q = f64::MIN_POSITIVE;
            }
            if q < 0.0 {
                count += 1;
            }
        }
        count
    }

    /// The `index`th smallest eigenvalue.
    fn eigenvalue(&self, index: usize) -> f64 {
        // Gershgorin bounds.
        let n = self.diag.len();
        let radius = |i: usize| {
            let below = if i > 0 { self.off_diag[i - 1] } else { 0.0 };
            let above = if i + 1 < n { self.off_diag[i] } else { 0.0 };
            below + above
        };
        let mut lo = (0..n)
            .map(|i| self.diag[i] - radius(i))
            .fold(f64::INFINITY, f64::min);
        let mut hi = (0..n)
            .map(|i| self.diag[i] + radius(i))
            .fold(f64::NEG_INFINITY, f64::max);

        for _ in 0..MAX_BISECTIONS {
            let mid = 0.5 * (lo + hi);
            if mid <= lo || mid >= hi {
                break;
            }
            if self.count_below(mid) > index {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        0.5 * (lo + hi)
    }

    /// The (symmetrised) eigenvector for the eigenvalue `lambda`, scaled so
    /// that its largest element has magnitude 1.
    fn eigenvector(&self, lambda: f64) -> Vec<f64> {
        let shifted: Vec<f64> = self.diag.iter().map(|d| d - lambda).collect();
        let mut y = vec![1.0; self.diag.len()];
        for _ in 0..INVERSE_ITERATIONS {
            y = solve_tridiagonal(&self.off_diag, &shifted, &self.off_diag, y);
            let largest = y.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
            if largest > 0.0 && largest.is_finite() {
                y.iter_mut().for_each(|v| *v /= largest);
            }
        }
        y
    }

    /// Undo the similarity transform that symmetrised the recurrence.
    fn unsymmetrise(&self, y: &[f64]) -> Vec<f64> {
        let mut scale = 1.0;
        y.iter()
            .enumerate()
            .map(|(k, v)| {
                let d = scale * v;
                if k + 1 < y.len() {
                    scale *= (self.gammas[k + 1] / self.alphas[k]).sqrt();
                }
                d
            })
            .collect()
    }
}

/// Solve a tridiagonal system with Gaussian elimination and partial pivoting
/// (as LAPACK's dgtsv). `sub` and `sup` are the sub- and super-diagonals.
/// Zero pivots are replaced by a tiny number; during inverse iteration they
/// mean the shift is an exact eigenvalue.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], mut b: Vec<f64>) -> Vec<f64> {
    let n = diag.len();
    let mut dl = sub.to_vec();
    let mut d = diag.to_vec();
    let mut du = sup.to_vec();
    let tiny = f64::MIN_POSITIVE.sqrt();

    for i in 0..n.saturating_sub(1) {
        if d[i].abs() >= dl[i].abs() {
            if d[i] == 0.0 {
                d[i] = tiny;
            }
            let fact = dl[i] / d[i];
            d[i + 1] -= fact * du[i];
            b[i + 1] -= fact * b[i];
            // dl now holds the second super-diagonal of U.
            dl[i] = 0.0;
        } else {
            let fact = d[i] / dl[i];
            d[i] = dl[i];
            let temp = d[i + 1];
            d[i + 1] = du[i] - fact * temp;
            if i + 2 < n {
                dl[i] = du[i + 1];
                du[i + 1] = -fact * dl[i];
            } else {
                dl[i] = 0.0;
            }
            du[i] = temp;
            b.swap(i, i + 1);
            b[i + 1] = b[i + 1] - fact * b[i];
        }
    }
    if n > 0 && d[n - 1] == 0.0 {
        d[n - 1] = tiny;
    }

    for i in (0..n).rev() {
        let mut v = b[i];
        if i + 1 < n {
            v -= du[i] * b[i + 1];
        }
        if i + 2 < n {
            v -= dl[i] * b[i + 2];
        }
        b[i] = v / d[i];
    }
    b
}

/// The associated Legendre functions P_l^m(x) for l = m..=max_degree, without
/// the Condon-Shortley phase. Element `l - m` holds P_l^m(x).
pub(super) fn associated_legendre(m: u32, max_degree: u32, x: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity((max_degree - m + 1) as usize);
    let somx2 = ((1.0 - x) * (1.0 + x)).sqrt();
    let mut pmm = 1.0;
    let mut fact = 1.0;
    for _ in 0..m {
        pmm *= fact * somx2;
        fact += 2.0;
    }
    out.push(pmm);
    if max_degree > m {
        out.push(x * f64::from(2 * m + 1) * pmm);
    }
    for l in m + 2..=max_degree {
        let i = (l - m) as usize;
        let p = (x * f64::from(2 * l - 1) * out[i - 1] - f64::from(l + m - 1) * out[i - 2])
            / f64::from(l - m);
        out.push(p);
    }
    out
}
