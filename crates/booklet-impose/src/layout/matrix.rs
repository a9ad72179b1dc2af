//! Affine coordinate matrices
//!
//! Matrices use the PDF convention `[a b c d e f]`, mapping a row vector
//! `[x y 1]` to `[a*x + c*y + e, b*x + d*y + f]`. Composition reads left to
//! right: `m1.then(m2)` applies `m1` first.

use crate::constants::MATRIX_SNAP_EPSILON;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// Counter-clockwise rotation in a y-up space
    pub fn rotate_degrees(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Apply `self`, then `next`
    pub fn then(&self, next: &Matrix) -> Matrix {
        Matrix {
            a: self.a * next.a + self.b * next.c,
            b: self.a * next.b + self.b * next.d,
            c: self.c * next.a + self.d * next.c,
            d: self.c * next.b + self.d * next.d,
            e: self.e * next.a + self.f * next.c + next.e,
            f: self.e * next.b + self.f * next.d + next.f,
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Snap coefficients that are within rounding noise of -1, 0 or 1.
    ///
    /// Idempotent: snapping an already snapped matrix changes nothing.
    pub fn snapped(&self) -> Matrix {
        Matrix {
            a: snap(self.a),
            b: snap(self.b),
            c: snap(self.c),
            d: snap(self.d),
            e: snap(self.e),
            f: snap(self.f),
        }
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// The six operands of a `cm` operator
    pub fn to_operands(&self) -> String {
        self.to_array()
            .iter()
            .map(|v| format_number(*v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn snap(value: f64) -> f64 {
    for target in [0.0, 1.0, -1.0] {
        if (value - target).abs() < MATRIX_SNAP_EPSILON {
            return target;
        }
    }
    value
}

/// Format a number for a content stream: no exponent, no trailing zeros.
pub fn format_number(value: f64) -> String {
    let text = format!("{:.6}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}
