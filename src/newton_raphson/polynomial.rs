// Polynomial given in factored form by its roots
//
// f(z) = (z - r0)(z - r1)...(z - rn)
//
// The derivative is the sum of the products leaving out one factor each.
// That is quadratic in the number of roots but with at most 16 roots it's
// cheaper than expanding into coefficients every time a root moves.

use super::complex::{complex, mul, add, sub, Complex64};

// A complex-valued function with its derivative (slope).
pub trait ComplexFunctionWithSlope {
    // f(z)
    fn value(&self, z : Complex64) -> Complex64;

    // f'(z)
    fn slope(&self, z : Complex64) -> Complex64;
}

pub fn evaluate(z : Complex64, roots : &[Complex64]) -> Complex64 {
    roots.iter().fold(
        complex(1.0, 0.0),
        |acc, root| mul(acc, sub(z, *root))
    )
}

pub fn evaluate_derivative(z : Complex64, roots : &[Complex64]) -> Complex64 {
    let mut acc = complex(0.0, 0.0);
    for skip in 0..roots.len() {
        let mut term = complex(1.0, 0.0);
        for (j, root) in roots.iter().enumerate() {
            if j != skip {
                term = mul(term, sub(z, *root));
            }
        }
        acc = add(acc, term);
    }
    acc
}

// Borrowed view of one root snapshot - the roots can't change underneath
// a classification while this is alive
pub struct RootPolynomial<'a> {
    roots : &'a [Complex64]
}

impl<'a> RootPolynomial<'a> {
    pub fn new(roots : &'a [Complex64]) -> RootPolynomial<'a> {
        RootPolynomial { roots }
    }

    pub fn roots(&self) -> &'a [Complex64] {
        self.roots
    }
}

impl<'a> ComplexFunctionWithSlope for RootPolynomial<'a> {
    fn value(&self, z : Complex64) -> Complex64 {
        evaluate(z, self.roots)
    }

    fn slope(&self, z : Complex64) -> Complex64 {
        evaluate_derivative(z, self.roots)
    }
}
