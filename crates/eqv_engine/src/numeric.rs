//! Floating-point evaluation over the complex plane.
//!
//! The last cascade stage evaluates the simplified difference; the
//! verdict is "equal" when both components are below tolerance. Free
//! variables, infinities and unevaluated calculus operators are not
//! concrete numbers and evaluate to an error, which the caller treats
//! as "stage did not establish equality".

use eqv_ast::{Constant, Expr};
use num_complex::Complex;
use num_traits::ToPrimitive;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum NumericError {
    #[error("expression contains the free variable `{0}`")]
    FreeVariable(String),
    #[error("expression is not a concrete number: {0}")]
    NotANumber(String),
    #[error("unsupported function `{0}` in numeric evaluation")]
    UnsupportedFunction(String),
}

/// Evaluate a variable-free expression to a complex double.
pub fn eval_complex(expr: &Expr) -> Result<Complex<f64>, NumericError> {
    match expr {
        Expr::Number(n) => {
            let value = n
                .to_f64()
                .ok_or_else(|| NumericError::NotANumber(n.to_string()))?;
            Ok(Complex::new(value, 0.0))
        }
        Expr::Variable(name) => Err(NumericError::FreeVariable(name.clone())),
        Expr::Constant(Constant::Pi) => Ok(Complex::new(std::f64::consts::PI, 0.0)),
        Expr::Constant(Constant::E) => Ok(Complex::new(std::f64::consts::E, 0.0)),
        Expr::Constant(Constant::I) => Ok(Complex::new(0.0, 1.0)),
        Expr::Constant(Constant::Infinity) => {
            Err(NumericError::NotANumber("oo".to_string()))
        }
        Expr::Add(l, r) => Ok(eval_complex(l)? + eval_complex(r)?),
        Expr::Sub(l, r) => Ok(eval_complex(l)? - eval_complex(r)?),
        Expr::Mul(l, r) => Ok(eval_complex(l)? * eval_complex(r)?),
        Expr::Div(l, r) => Ok(eval_complex(l)? / eval_complex(r)?),
        Expr::Pow(b, e) => Ok(eval_complex(b)?.powc(eval_complex(e)?)),
        Expr::Neg(inner) => Ok(-eval_complex(inner)?),
        Expr::Function(name, args) => {
            if args.len() != 1 {
                return Err(NumericError::UnsupportedFunction(name.clone()));
            }
            let arg = eval_complex(&args[0])?;
            match name.as_str() {
                "sin" => Ok(arg.sin()),
                "cos" => Ok(arg.cos()),
                "tan" => Ok(arg.tan()),
                "exp" => Ok(arg.exp()),
                "log" => Ok(arg.ln()),
                "sqrt" => Ok(arg.sqrt()),
                _ => Err(NumericError::UnsupportedFunction(name.clone())),
            }
        }
        Expr::Derivative { .. } | Expr::Integral { .. } | Expr::Limit { .. } => {
            Err(NumericError::NotANumber(expr.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplify::simplify;
    use std::sync::Arc;

    fn eval(latex: &str) -> Result<Complex<f64>, NumericError> {
        let e: Arc<Expr> = simplify(&eqv_parser::parse_latex(latex).unwrap());
        eval_complex(&e)
    }

    #[test]
    fn evaluates_rationals_exactly() {
        assert_eq!(eval("\\frac{1}{2}").unwrap(), Complex::new(0.5, 0.0));
    }

    #[test]
    fn evaluates_transcendental_identity() {
        // log(2) + log(3) - log(6) is zero only numerically.
        let v = eval("\\ln(2)+\\ln(3)-\\ln(6)").unwrap();
        assert!(v.norm() < 1e-10);
    }

    #[test]
    fn evaluates_eulers_identity() {
        let v = eval("e^{i\\pi}+1").unwrap();
        assert!(v.re.abs() < 1e-10 && v.im.abs() < 1e-10);
    }

    #[test]
    fn free_variable_is_an_error() {
        assert_eq!(
            eval("x+1"),
            Err(NumericError::FreeVariable("x".to_string()))
        );
    }

    #[test]
    fn infinity_is_not_a_number() {
        assert!(matches!(eval("\\infty"), Err(NumericError::NotANumber(_))));
    }
}
