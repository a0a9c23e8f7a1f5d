//! Distribution of products and small integer powers over sums.
//!
//! `expand` only distributes; apart from the like-term collection
//! inside power expansion it leaves the result un-normalized so the
//! caller decides when to pay for `simplify`.

use eqv_ast::Expr;
use num_traits::ToPrimitive;
use std::sync::Arc;

/// Powers of sums are only expanded up to this exponent.
const MAX_POW_EXPAND: i64 = 16;

/// Distribute multiplication over addition throughout the tree.
pub fn expand(expr: &Arc<Expr>) -> Arc<Expr> {
    match expr.as_ref() {
        Expr::Number(_) | Expr::Variable(_) | Expr::Constant(_) => expr.clone(),
        Expr::Add(l, r) => Expr::add(expand(l), expand(r)),
        Expr::Sub(l, r) => Expr::sub(expand(l), expand(r)),
        Expr::Neg(inner) => Expr::neg(expand(inner)),
        Expr::Mul(l, r) => distribute(&expand(l), &expand(r)),
        Expr::Div(l, r) => {
            // Distribute the numerator only; the denominator stays.
            let denom = expand(r);
            let terms = additive_terms(&expand(l));
            join_terms(
                terms
                    .into_iter()
                    .map(|t| Expr::div(t, denom.clone()))
                    .collect(),
            )
        }
        Expr::Pow(base, exp) => {
            let base = expand(base);
            if let Expr::Number(n) = exp.as_ref() {
                if n.is_integer() {
                    if let Some(k) = n.to_integer().to_i64() {
                        if (2..=MAX_POW_EXPAND).contains(&k) && additive_terms(&base).len() > 1 {
                            // Collect like terms between rounds; otherwise a
                            // t-term base grows to t^k raw products.
                            let mut acc = base.clone();
                            for _ in 1..k {
                                acc = crate::simplify::simplify(&distribute(&acc, &base));
                            }
                            return acc;
                        }
                    }
                }
            }
            Expr::pow(base, exp.clone())
        }
        Expr::Function(name, args) => Arc::new(Expr::Function(
            name.clone(),
            args.iter().map(expand).collect(),
        )),
        Expr::Derivative { inner, var } => Arc::new(Expr::Derivative {
            inner: expand(inner),
            var: var.clone(),
        }),
        Expr::Integral { inner, var, bounds } => Arc::new(Expr::Integral {
            inner: expand(inner),
            var: var.clone(),
            bounds: bounds.clone(),
        }),
        Expr::Limit { inner, var, to } => Arc::new(Expr::Limit {
            inner: expand(inner),
            var: var.clone(),
            to: to.clone(),
        }),
    }
}

/// Cross-multiply the additive terms of two expanded expressions.
fn distribute(lhs: &Arc<Expr>, rhs: &Arc<Expr>) -> Arc<Expr> {
    let left_terms = additive_terms(lhs);
    let right_terms = additive_terms(rhs);
    if left_terms.len() == 1 && right_terms.len() == 1 {
        return Expr::mul(lhs.clone(), rhs.clone());
    }
    let mut products = Vec::with_capacity(left_terms.len() * right_terms.len());
    for l in &left_terms {
        for r in &right_terms {
            products.push(Expr::mul(l.clone(), r.clone()));
        }
    }
    join_terms(products)
}

/// Split an expression into its top-level additive terms, folding
/// subtraction and negation into the terms themselves.
fn additive_terms(expr: &Arc<Expr>) -> Vec<Arc<Expr>> {
    let mut out = Vec::new();
    fn walk(e: &Arc<Expr>, negate: bool, out: &mut Vec<Arc<Expr>>) {
        match e.as_ref() {
            Expr::Add(l, r) => {
                walk(l, negate, out);
                walk(r, negate, out);
            }
            Expr::Sub(l, r) => {
                walk(l, negate, out);
                walk(r, !negate, out);
            }
            Expr::Neg(inner) => walk(inner, !negate, out),
            _ => out.push(if negate {
                Expr::mul(Expr::int(-1), e.clone())
            } else {
                e.clone()
            }),
        }
    }
    walk(expr, false, &mut out);
    out
}

fn join_terms(terms: Vec<Arc<Expr>>) -> Arc<Expr> {
    let mut iter = terms.into_iter();
    let first = iter.next().unwrap_or_else(|| Expr::int(0));
    iter.fold(first, Expr::add)
}
