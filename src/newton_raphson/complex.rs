// Complex arithmetic on a pair of doubles
//
// Thin layer over num's Complex so the rest of the fractal code only has
// to deal with one number type. Division is the only operation that can
// fail, it reports a near zero divisor instead of producing infinities.

use num::complex::Complex;

pub type Complex64 = Complex<f64>;

// Divisors with a squared magnitude under this are treated as zero
pub const DEFAULT_DIVISION_EPSILON : f64 = 1e-20;

pub fn complex(re : f64, im : f64) -> Complex64 {
    Complex::new(re, im)
}

pub fn add(a : Complex64, b : Complex64) -> Complex64 {
    Complex::new(a.re + b.re, a.im + b.im)
}

pub fn sub(a : Complex64, b : Complex64) -> Complex64 {
    Complex::new(a.re - b.re, a.im - b.im)
}

pub fn mul(a : Complex64, b : Complex64) -> Complex64 {
    Complex::new(
        a.re * b.re - a.im * b.im,
        a.re * b.im + a.im * b.re
    )
}

// a / b computed as a * conj(b) / |b|^2.
//
// Returns `None` when |b|^2 is below `epsilon`.
pub fn div(a : Complex64, b : Complex64, epsilon : f64) -> Option<Complex64> {
    let denom = b.norm_sqr();
    if denom < epsilon {
        return None;
    }
    let num = mul(a, b.conj());
    Some(Complex::new(num.re / denom, num.im / denom))
}

pub fn magnitude(z : Complex64) -> f64 {
    z.re.hypot(z.im)
}

pub fn angle(z : Complex64) -> f64 {
    z.im.atan2(z.re)
}

pub fn is_finite(z : Complex64) -> bool {
    z.re.is_finite() && z.im.is_finite()
}
