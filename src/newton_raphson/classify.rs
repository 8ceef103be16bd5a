// Newton iteration classifier
//
// Follows z <- z - f(z)/f'(z) from a seed and reports which root it lands
// on, after how many steps and how close it was when it got there. Running
// into a flat spot or running out of iterations is a normal outcome and is
// reported as "no root" rather than an error.

use json::JsonValue;

use super::complex::{div, sub, magnitude, Complex64};
use super::polynomial::{ComplexFunctionWithSlope, RootPolynomial};

pub const MAX_ITERATIONS : usize = 30;
pub const CONVERGENCE_EPSILON : f64 = 1e-4;
pub const DERIVATIVE_FLOOR : f64 = 1e-10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifierSettings {
    pub max_iterations : usize,
    pub convergence_epsilon : f64,
    pub derivative_floor : f64
}

impl Default for ClassifierSettings {
    fn default() -> ClassifierSettings {
        ClassifierSettings {
            max_iterations : MAX_ITERATIONS,
            convergence_epsilon : CONVERGENCE_EPSILON,
            derivative_floor : DERIVATIVE_FLOOR
        }
    }
}

impl ClassifierSettings {
    pub fn from_json(input : &JsonValue) -> ClassifierSettings {
        let defaults = ClassifierSettings::default();
        ClassifierSettings {
            max_iterations : input["max_iterations"].as_usize().unwrap_or(defaults.max_iterations),
            convergence_epsilon : input["convergence"].as_f64().unwrap_or(defaults.convergence_epsilon),
            derivative_floor : input["derivative_floor"].as_f64().unwrap_or(defaults.derivative_floor)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub root : Option<usize>,
    pub iterations : usize,
    pub residual : f64
}

impl Classification {
    fn non_convergent(iterations : usize) -> Classification {
        Classification { root: None, iterations, residual: 0.0 }
    }

    // -1 for points which never reach a root
    pub fn root_index(&self) -> i32 {
        self.root.map(|index| index as i32).unwrap_or(-1)
    }
}

// The roots matched against are always the ones the polynomial was built from
pub fn classify(
    seed : Complex64,
    polynomial : &RootPolynomial,
    settings : &ClassifierSettings
) -> Classification {
    let roots = polynomial.roots();
    let floor_sqr = settings.derivative_floor * settings.derivative_floor;
    let mut z = seed;
    for i in 0..settings.max_iterations {
        let value = polynomial.value(z);
        let slope = polynomial.slope(z);
        if magnitude(slope) < settings.derivative_floor {
            return Classification::non_convergent(i);
        }
        let step = match div(value, slope, floor_sqr) {
            Some(step) => step,
            None => return Classification::non_convergent(i)
        };
        z = sub(z, step);
        // First root within range wins so overlapping roots resolve the same way every time
        for (index, root) in roots.iter().enumerate() {
            let distance = magnitude(sub(z, *root));
            if distance < settings.convergence_epsilon {
                return Classification { root: Some(index), iterations: i, residual: distance };
            }
        }
    }
    Classification::non_convergent(settings.max_iterations)
}
