//! Text form of surfaces: a keyword followed by numeric parameters.
//!
//! | keyword | parameters |
//! |---|---|
//! | `px` `py` `pz` | `d` |
//! | `p` | `a b c d` or `x y z nx ny nz` |
//! | `so` | `r` |
//! | `s` | `x y z r` |
//! | `sx` `sy` `sz` | `c r` |
//! | `cx` `cy` `cz` | `r` |
//! | `c/x` `c/y` `c/z` | `u v r` |
//! | `c` | `x y z ax ay az r` |
//! | `kx` `ky` `kz` | `c t2` |
//! | `k/x` `k/y` `k/z` | `x y z t2` |
//! | `k` | `x y z ax ay az angle_deg` |
//! | `gq` | `A B C D E F G H J K` |

use std::str::FromStr;

use quadcsg_math::{Dir3, Point3, Vec3};

use crate::error::{Result, SurfaceError};
use crate::shape::{other_axes, unit_axis};
use crate::{Cone, Cylinder, GeneralQuadric, Plane, QuadricEqn, Shape, Sphere};

impl FromStr for Shape {
    type Err = SurfaceError;

    fn from_str(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace();
        let keyword = tokens
            .next()
            .ok_or_else(|| SurfaceError::parse(text, "empty definition"))?;
        let params = tokens
            .map(|t| {
                t.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| SurfaceError::parse(text, format!("`{t}` is not a number")))
            })
            .collect::<Result<Vec<f64>>>()?;
        let args = Args { text, params };

        let shape: Shape = match keyword {
            "px" | "py" | "pz" => {
                let [d] = args.take()?;
                Plane::new(unit_axis(axis_index(keyword, 1)), d).into()
            }
            "p" => match args.params.len() {
                4 => {
                    let [a, b, c, d] = args.take()?;
                    let n = Vec3::new(a, b, c);
                    let len = n.norm();
                    let normal = args.direction(n, "plane normal")?;
                    Plane::new(normal, d / len).into()
                }
                _ => {
                    let [x, y, z, nx, ny, nz] = args.take()?;
                    let normal = args.direction(Vec3::new(nx, ny, nz), "plane normal")?;
                    Plane::from_point_normal(&Point3::new(x, y, z), normal).into()
                }
            },
            "so" => {
                let [r] = args.take()?;
                Sphere::at_origin(args.positive(r, "radius")?).into()
            }
            "s" => {
                let [x, y, z, r] = args.take()?;
                Sphere::new(Point3::new(x, y, z), args.positive(r, "radius")?).into()
            }
            "sx" | "sy" | "sz" => {
                let [c, r] = args.take()?;
                let i = axis_index(keyword, 1);
                let mut center = Point3::origin();
                center[i] = c;
                Sphere::new(center, args.positive(r, "radius")?).into()
            }
            "cx" | "cy" | "cz" => {
                let [r] = args.take()?;
                let i = axis_index(keyword, 1);
                Cylinder::new(Point3::origin(), unit_axis(i), args.positive(r, "radius")?).into()
            }
            "c/x" | "c/y" | "c/z" => {
                let [u, v, r] = args.take()?;
                let i = axis_index(keyword, 2);
                let (iu, iv) = other_axes(i);
                let mut center = Point3::origin();
                center[iu] = u;
                center[iv] = v;
                Cylinder::new(center, unit_axis(i), args.positive(r, "radius")?).into()
            }
            "c" => {
                let [x, y, z, ax, ay, az, r] = args.take()?;
                let axis = args.direction(Vec3::new(ax, ay, az), "cylinder axis")?;
                Cylinder::new(Point3::new(x, y, z), axis, args.positive(r, "radius")?).into()
            }
            "kx" | "ky" | "kz" => {
                let [c, t2] = args.take()?;
                let i = axis_index(keyword, 1);
                let mut apex = Point3::origin();
                apex[i] = c;
                Cone::from_tan_squared(apex, unit_axis(i), args.positive(t2, "t2")?).into()
            }
            "k/x" | "k/y" | "k/z" => {
                let [x, y, z, t2] = args.take()?;
                let i = axis_index(keyword, 2);
                let apex = Point3::new(x, y, z);
                Cone::from_tan_squared(apex, unit_axis(i), args.positive(t2, "t2")?).into()
            }
            "k" => {
                let [x, y, z, ax, ay, az, angle] = args.take()?;
                let axis = args.direction(Vec3::new(ax, ay, az), "cone axis")?;
                if !(angle > 0.0 && angle < 90.0) {
                    return Err(SurfaceError::parse(
                        text,
                        format!("cone angle {angle} must lie strictly between 0 and 90 degrees"),
                    ));
                }
                Cone::new(Point3::new(x, y, z), axis, angle.to_radians()).into()
            }
            "gq" => {
                let coeffs: [f64; 10] = args.take()?;
                if coeffs[..9].iter().all(|c| *c == 0.0) {
                    return Err(SurfaceError::parse(text, "all non-constant coefficients are zero"));
                }
                GeneralQuadric::new(QuadricEqn::new(coeffs)).into()
            }
            other => return Err(SurfaceError::UnknownKeyword(other.to_string())),
        };
        Ok(shape)
    }
}

/// Coordinate index named by the character at `pos` of an axis keyword.
fn axis_index(keyword: &str, pos: usize) -> usize {
    match keyword.as_bytes().get(pos) {
        Some(b'x') => 0,
        Some(b'y') => 1,
        _ => 2,
    }
}

struct Args<'a> {
    text: &'a str,
    params: Vec<f64>,
}

impl Args<'_> {
    /// The parameters as a fixed-size array, if there are exactly `N` of them.
    fn take<const N: usize>(&self) -> Result<[f64; N]> {
        <[f64; N]>::try_from(self.params.as_slice()).map_err(|_| {
            SurfaceError::parse(
                self.text,
                format!("expected {N} parameters, found {}", self.params.len()),
            )
        })
    }

    fn positive(&self, v: f64, what: &str) -> Result<f64> {
        if v > 0.0 {
            Ok(v)
        } else {
            Err(SurfaceError::parse(
                self.text,
                format!("{what} must be positive, got {v}"),
            ))
        }
    }

    fn direction(&self, v: Vec3, what: &str) -> Result<Dir3> {
        Dir3::try_new(v, 1e-12)
            .ok_or_else(|| SurfaceError::parse(self.text, format!("{what} is zero")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{QuadricSurface, SurfaceKind};
    use approx::assert_relative_eq;

    fn parse(text: &str) -> Shape {
        text.parse().unwrap()
    }

    #[test]
    fn test_plane_forms() {
        let Shape::Plane(p) = parse("pz 3") else {
            panic!("expected plane")
        };
        assert_relative_eq!(p.distance, 3.0);
        assert_relative_eq!(p.normal.z, 1.0);

        // 2x = 4 normalizes to x = 2
        let Shape::Plane(p) = parse("p 2 0 0 4") else {
            panic!("expected plane")
        };
        assert_relative_eq!(p.distance, 2.0);

        let Shape::Plane(p) = parse("p 1 1 1 0 0 -1") else {
            panic!("expected plane")
        };
        assert_relative_eq!(p.signed_distance(&Point3::new(0.0, 0.0, 0.0)), 1.0);
    }

    #[test]
    fn test_axis_shapes() {
        assert_eq!(parse("sy 2 1").kind(), SurfaceKind::Sphere);
        let Shape::Cylinder(c) = parse("c/x 1 2 0.5") else {
            panic!("expected cylinder")
        };
        assert_eq!(c.center, Point3::new(0.0, 1.0, 2.0));
        assert_relative_eq!(c.axis.x, 1.0);

        let Shape::Cone(k) = parse("k/y 1 2 3 1") else {
            panic!("expected cone")
        };
        assert_relative_eq!(k.half_angle, std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
        assert_eq!(k.apex, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_general_cone_degrees() {
        let Shape::Cone(k) = parse("k 0 0 0 0 0 2 30") else {
            panic!("expected cone")
        };
        assert_relative_eq!(k.half_angle, 30.0_f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(k.axis.z, 1.0);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            "torus 1 2".parse::<Shape>(),
            Err(SurfaceError::UnknownKeyword(_))
        ));
        assert!(matches!("so".parse::<Shape>(), Err(SurfaceError::Parse { .. })));
        assert!(matches!("so 1 2".parse::<Shape>(), Err(SurfaceError::Parse { .. })));
        assert!(matches!("so abc".parse::<Shape>(), Err(SurfaceError::Parse { .. })));
        assert!(matches!("so -1".parse::<Shape>(), Err(SurfaceError::Parse { .. })));
        assert!(matches!("p 0 0 0 1".parse::<Shape>(), Err(SurfaceError::Parse { .. })));
        assert!(matches!("c 0 0 0 0 0 0 1".parse::<Shape>(), Err(SurfaceError::Parse { .. })));
        assert!(matches!("k 0 0 0 0 0 1 90".parse::<Shape>(), Err(SurfaceError::Parse { .. })));
        assert!(matches!("kx 0 0".parse::<Shape>(), Err(SurfaceError::Parse { .. })));
        assert!(matches!("".parse::<Shape>(), Err(SurfaceError::Parse { .. })));
    }

    #[test]
    fn test_display_parses_back() {
        for text in [
            "px -2.5",
            "p 0 0.6 0.8 1",
            "so 4",
            "sz -3 2",
            "s 1 2 3 4",
            "cy 1.5",
            "c/z 1 -1 2",
            "c 1 2 3 0 0.6 0.8 2",
            "kx 2 0.25",
            "k/x 1 2 3 0.25",
            "gq 1 2 0 0 0 0 0 0 1 -4",
        ] {
            let shape = parse(text);
            let again = parse(&shape.to_string());
            assert_eq!(shape.kind(), again.kind(), "{text}");
            let probe = Point3::new(0.3, -0.7, 1.1);
            assert_relative_eq!(
                shape.as_quadric().signed_distance(&probe),
                again.as_quadric().signed_distance(&probe),
                epsilon = 1e-9
            );
        }
    }
}
