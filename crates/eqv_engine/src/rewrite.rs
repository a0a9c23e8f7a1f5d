//! Euler rewrite: exp(i*t) as cos(t) + i*sin(t).
//!
//! Only exponentials with a purely imaginary argument are rewritten;
//! dividing the argument by i must leave no i behind. Anything else
//! stays an exponential so real-valued inputs are untouched.

use crate::simplify::simplify;
use eqv_ast::{contains_constant, Constant, Expr};
use std::sync::Arc;

pub fn rewrite_exp_as_trig(expr: &Arc<Expr>) -> Arc<Expr> {
    match expr.as_ref() {
        Expr::Number(_) | Expr::Variable(_) | Expr::Constant(_) => expr.clone(),
        Expr::Add(l, r) => Expr::add(rewrite_exp_as_trig(l), rewrite_exp_as_trig(r)),
        Expr::Sub(l, r) => Expr::sub(rewrite_exp_as_trig(l), rewrite_exp_as_trig(r)),
        Expr::Mul(l, r) => Expr::mul(rewrite_exp_as_trig(l), rewrite_exp_as_trig(r)),
        Expr::Div(l, r) => Expr::div(rewrite_exp_as_trig(l), rewrite_exp_as_trig(r)),
        Expr::Pow(b, e) => Expr::pow(rewrite_exp_as_trig(b), rewrite_exp_as_trig(e)),
        Expr::Neg(inner) => Expr::neg(rewrite_exp_as_trig(inner)),
        Expr::Function(name, args) if name == "exp" && args.len() == 1 => {
            let arg = rewrite_exp_as_trig(&args[0]);
            match imaginary_part(&arg) {
                Some(t) => Expr::add(
                    Expr::func("cos", vec![t.clone()]),
                    Expr::mul(Expr::constant(Constant::I), Expr::func("sin", vec![t])),
                ),
                None => Expr::func("exp", vec![arg]),
            }
        }
        Expr::Function(name, args) => Arc::new(Expr::Function(
            name.clone(),
            args.iter().map(rewrite_exp_as_trig).collect(),
        )),
        Expr::Derivative { inner, var } => Arc::new(Expr::Derivative {
            inner: rewrite_exp_as_trig(inner),
            var: var.clone(),
        }),
        Expr::Integral { inner, var, bounds } => Arc::new(Expr::Integral {
            inner: rewrite_exp_as_trig(inner),
            var: var.clone(),
            bounds: bounds.clone(),
        }),
        Expr::Limit { inner, var, to } => Arc::new(Expr::Limit {
            inner: rewrite_exp_as_trig(inner),
            var: var.clone(),
            to: rewrite_exp_as_trig(to),
        }),
    }
}

/// `t` such that the argument equals i*t. The quotient arg/i comes
/// back i-free exactly when the argument was purely imaginary, since
/// product normalization sums the exponents of i to zero.
fn imaginary_part(arg: &Arc<Expr>) -> Option<Arc<Expr>> {
    if !contains_constant(arg, Constant::I) {
        return None;
    }
    let quotient = simplify(&Expr::mul(
        arg.clone(),
        Expr::pow(Expr::constant(Constant::I), Expr::int(-1)),
    ));
    if contains_constant(&quotient, Constant::I) {
        None
    } else {
        Some(quotient)
    }
}
