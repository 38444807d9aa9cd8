//! The general second-degree equation shared by every surface.
//!
//! ```text
//! f(x, y, z) = Ax² + By² + Cz² + Dxy + Exz + Fyz + Gx + Hy + Jz + K
//! ```
//!
//! Written in matrix form as `f(x) = xᵀMx + g·x + K` with `M` symmetric.
//! The region `f < 0` is the inside of the surface.

use std::fmt;

use quadcsg_math::{solve_quadratic, Matrix3, Point3, Vec3};

/// Coefficients `[A, B, C, D, E, F, G, H, J, K]` of a quadric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadricEqn {
    coeffs: [f64; 10],
}

impl QuadricEqn {
    /// Build from the ten coefficients in `A..K` order.
    pub const fn new(coeffs: [f64; 10]) -> Self {
        Self { coeffs }
    }

    /// Build from the symmetric quadratic part `m`, linear part `g` and constant `k`.
    pub fn from_parts(m: &Matrix3, g: &Vec3, k: f64) -> Self {
        Self {
            coeffs: [
                m[(0, 0)],
                m[(1, 1)],
                m[(2, 2)],
                m[(0, 1)] + m[(1, 0)],
                m[(0, 2)] + m[(2, 0)],
                m[(1, 2)] + m[(2, 1)],
                g.x,
                g.y,
                g.z,
                k,
            ],
        }
    }

    /// The ten coefficients in `A..K` order.
    pub fn coefficients(&self) -> &[f64; 10] {
        &self.coeffs
    }

    /// Symmetric matrix `M` of the quadratic terms.
    pub fn quadratic_part(&self) -> Matrix3 {
        let [a, b, c, d, e, f, ..] = self.coeffs;
        Matrix3::new(
            a,
            d / 2.0,
            e / 2.0,
            d / 2.0,
            b,
            f / 2.0,
            e / 2.0,
            f / 2.0,
            c,
        )
    }

    /// Vector `(G, H, J)` of the linear terms.
    pub fn linear_part(&self) -> Vec3 {
        Vec3::new(self.coeffs[6], self.coeffs[7], self.coeffs[8])
    }

    /// Constant term `K`.
    pub fn constant(&self) -> f64 {
        self.coeffs[9]
    }

    /// True if every second-order coefficient vanishes.
    pub fn is_planar(&self) -> bool {
        self.coeffs[..6].iter().all(|c| c.abs() < 1e-15)
    }

    /// Evaluate `f(p)`.
    pub fn value(&self, p: &Point3) -> f64 {
        let [a, b, c, d, e, f, g, h, j, k] = self.coeffs;
        let (x, y, z) = (p.x, p.y, p.z);
        a * x * x
            + b * y * y
            + c * z * z
            + d * x * y
            + e * x * z
            + f * y * z
            + g * x
            + h * y
            + j * z
            + k
    }

    /// Gradient `∇f(p)`, pointing from inside to outside.
    pub fn gradient(&self, p: &Point3) -> Vec3 {
        let [a, b, c, d, e, f, g, h, j, _] = self.coeffs;
        let (x, y, z) = (p.x, p.y, p.z);
        Vec3::new(
            2.0 * a * x + d * y + e * z + g,
            2.0 * b * y + d * x + f * z + h,
            2.0 * c * z + e * x + f * y + j,
        )
    }

    /// Coefficients `(a, b, c)` of `f(origin + t·direction) = a t² + b t + c`.
    pub fn ray_coefficients(&self, origin: &Point3, direction: &Vec3) -> (f64, f64, f64) {
        let m = self.quadratic_part();
        let md = m * direction;
        let a = direction.dot(&md);
        let b = 2.0 * origin.coords.dot(&md) + self.linear_part().dot(direction);
        let c = self.value(origin);
        (a, b, c)
    }

    /// Ray parameters where the ray meets the surface, ascending, both signs.
    pub fn intersect_ray(&self, origin: &Point3, direction: &Vec3) -> Vec<f64> {
        let (a, b, c) = self.ray_coefficients(origin, direction);
        solve_quadratic(a, b, c)
    }

    /// The equation of the surface moved by the rigid motion `x → r·x + t`.
    ///
    /// `r` must be orthonormal; its transpose is used as the inverse.
    pub fn transformed(&self, r: &Matrix3, t: &Vec3) -> Self {
        let m = r * self.quadratic_part() * r.transpose();
        let h = r * self.linear_part();
        let g = h - 2.0 * (m * t);
        let k = t.dot(&(m * t)) - h.dot(t) + self.constant();
        Self::from_parts(&m, &g, k)
    }
}

impl fmt::Display for QuadricEqn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.coeffs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
