//! Trigonometric contraction.
//!
//! One identity carries the whole stage: a*sin(u)^2 + a*cos(u)^2
//! contracts to the constant a. Applied bottom-up at every sum node,
//! it covers the Pythagorean cases the algebraic stage cannot see
//! (including the forms produced by the Euler rewrite).

use crate::simplify::{build_sum, sum_parts};
use eqv_ast::Expr;
use num_rational::BigRational;
use std::sync::Arc;

/// Apply Pythagorean contraction throughout the tree. The input is
/// expected to be normalized; the output is normalized again by the
/// caller re-running `simplify`.
pub fn trig_simplify(expr: &Arc<Expr>) -> Arc<Expr> {
    let expr = map_children(expr);
    match expr.as_ref() {
        Expr::Add(_, _) | Expr::Sub(_, _) => contract_sum(&expr),
        _ => expr,
    }
}

fn map_children(expr: &Arc<Expr>) -> Arc<Expr> {
    match expr.as_ref() {
        Expr::Number(_) | Expr::Variable(_) | Expr::Constant(_) => expr.clone(),
        Expr::Add(l, r) => Expr::add(trig_simplify(l), trig_simplify(r)),
        Expr::Sub(l, r) => Expr::sub(trig_simplify(l), trig_simplify(r)),
        Expr::Mul(l, r) => Expr::mul(trig_simplify(l), trig_simplify(r)),
        Expr::Div(l, r) => Expr::div(trig_simplify(l), trig_simplify(r)),
        Expr::Pow(b, e) => Expr::pow(trig_simplify(b), trig_simplify(e)),
        Expr::Neg(inner) => Expr::neg(trig_simplify(inner)),
        Expr::Function(name, args) => Arc::new(Expr::Function(
            name.clone(),
            args.iter().map(trig_simplify).collect(),
        )),
        _ => expr.clone(),
    }
}

/// The argument of `name`(u)^2, if the part is exactly that shape.
fn squared_trig_arg<'a>(part: &'a Expr, name: &str) -> Option<&'a Arc<Expr>> {
    if let Expr::Pow(base, exp) = part {
        if exp.is_int(2) {
            if let Expr::Function(f, args) = base.as_ref() {
                if f == name && args.len() == 1 {
                    return Some(&args[0]);
                }
            }
        }
    }
    None
}

fn contract_sum(expr: &Arc<Expr>) -> Arc<Expr> {
    let (mut constant, mut terms) = sum_parts(expr);

    loop {
        let mut matched: Option<(usize, usize, BigRational)> = None;
        'search: for (i, (ci, pi)) in terms.iter().enumerate() {
            let Some(u) = squared_trig_arg(pi, "sin") else {
                continue;
            };
            for (j, (cj, pj)) in terms.iter().enumerate() {
                if i == j {
                    continue;
                }
                if ci == cj && squared_trig_arg(pj, "cos") == Some(u) {
                    matched = Some((i, j, ci.clone()));
                    break 'search;
                }
            }
        }

        match matched {
            Some((i, j, coeff)) => {
                tracing::trace!(target: "equivalence", "pythagorean contraction applied");
                let (first, second) = if i > j { (i, j) } else { (j, i) };
                terms.remove(first);
                terms.remove(second);
                constant += coeff;
            }
            None => break,
        }
    }

    build_sum(constant, terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplify::simplify;

    fn prepared(latex: &str) -> Arc<Expr> {
        simplify(&eqv_parser::parse_latex(latex).unwrap())
    }

    #[test]
    fn pythagorean_identity_contracts_to_one() {
        let e = prepared("\\sin^2(x)+\\cos^2(x)");
        assert_eq!(simplify(&trig_simplify(&e)), Expr::int(1));
    }

    #[test]
    fn pythagorean_identity_minus_one_is_zero() {
        let e = prepared("\\sin^2(x)+\\cos^2(x)-1");
        assert!(simplify(&trig_simplify(&e)).is_int(0));
    }

    #[test]
    fn scaled_identity_contracts() {
        let e = prepared("3\\sin^2(y)+3\\cos^2(y)");
        assert_eq!(simplify(&trig_simplify(&e)), Expr::int(3));
    }

    #[test]
    fn mismatched_arguments_do_not_contract() {
        let e = prepared("\\sin^2(x)+\\cos^2(y)");
        let out = simplify(&trig_simplify(&e));
        assert!(!out.is_int(1));
    }

    #[test]
    fn mismatched_coefficients_do_not_contract() {
        let e = prepared("2\\sin^2(x)+\\cos^2(x)");
        let out = simplify(&trig_simplify(&e));
        assert!(!out.is_int(2));
    }

    #[test]
    fn contraction_applies_inside_factors() {
        let e = prepared("y(\\sin^2(x)+\\cos^2(x))-y");
        assert!(simplify(&trig_simplify(&e)).is_int(0));
    }
}
