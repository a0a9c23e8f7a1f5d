//! Forced evaluation of calculus operators.
//!
//! `doit` walks the tree bottom-up and replaces every `Derivative`,
//! `Integral` and `Limit` node whose closed form the rule tables can
//! produce. A node the rules cannot close stays in the tree; the
//! caller carries it forward, and the comparison can still succeed
//! when both sides contain the same unevaluated operator.

use crate::simplify::{apply_coeff, build_sum, product_factors, simplify, sum_parts};
use eqv_ast::{contains_constant, contains_var, substitute, Constant, Expr};
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::sync::Arc;

// ============================================================================
// Differentiation
// ============================================================================

/// Symbolic derivative with respect to `var`. Total: shapes without a
/// rule differentiate to an unevaluated `Derivative` node.
pub fn differentiate(expr: &Arc<Expr>, var: &str) -> Arc<Expr> {
    match expr.as_ref() {
        Expr::Number(_) | Expr::Constant(_) => Expr::int(0),
        Expr::Variable(name) => {
            if name == var {
                Expr::int(1)
            } else {
                Expr::int(0)
            }
        }
        Expr::Add(l, r) => Expr::add(differentiate(l, var), differentiate(r, var)),
        Expr::Sub(l, r) => Expr::sub(differentiate(l, var), differentiate(r, var)),
        Expr::Neg(inner) => Expr::neg(differentiate(inner, var)),
        Expr::Mul(l, r) => Expr::add(
            Expr::mul(differentiate(l, var), r.clone()),
            Expr::mul(l.clone(), differentiate(r, var)),
        ),
        Expr::Div(l, r) => Expr::div(
            Expr::sub(
                Expr::mul(differentiate(l, var), r.clone()),
                Expr::mul(l.clone(), differentiate(r, var)),
            ),
            Expr::pow(r.clone(), Expr::int(2)),
        ),
        Expr::Pow(base, exp) => diff_pow(base, exp, var),
        Expr::Function(name, args) if args.len() == 1 => {
            match outer_derivative(name, &args[0]) {
                Some(outer) => Expr::mul(outer, differentiate(&args[0], var)),
                None => Arc::new(Expr::Derivative {
                    inner: expr.clone(),
                    var: var.to_string(),
                }),
            }
        }
        _ => Arc::new(Expr::Derivative {
            inner: expr.clone(),
            var: var.to_string(),
        }),
    }
}

fn diff_pow(base: &Arc<Expr>, exp: &Arc<Expr>, var: &str) -> Arc<Expr> {
    let exp_is_const = !contains_var(exp, var);
    if exp_is_const {
        // d(u^c) = c * u^(c-1) * u'
        return Expr::mul(
            Expr::mul(
                exp.clone(),
                Expr::pow(base.clone(), Expr::sub(exp.clone(), Expr::int(1))),
            ),
            differentiate(base, var),
        );
    }
    if !contains_var(base, var) {
        // d(c^u) = c^u * log(c) * u'
        return Expr::mul(
            Expr::mul(
                Expr::pow(base.clone(), exp.clone()),
                Expr::func("log", vec![base.clone()]),
            ),
            differentiate(exp, var),
        );
    }
    // d(u^v) = u^v * (v' log(u) + v u'/u)
    Expr::mul(
        Expr::pow(base.clone(), exp.clone()),
        Expr::add(
            Expr::mul(
                differentiate(exp, var),
                Expr::func("log", vec![base.clone()]),
            ),
            Expr::div(
                Expr::mul(exp.clone(), differentiate(base, var)),
                base.clone(),
            ),
        ),
    )
}

/// d f(u)/du for the known one-argument functions.
fn outer_derivative(name: &str, arg: &Arc<Expr>) -> Option<Arc<Expr>> {
    let out = match name {
        "sin" => Expr::func("cos", vec![arg.clone()]),
        "cos" => Expr::neg(Expr::func("sin", vec![arg.clone()])),
        "tan" => Expr::pow(Expr::func("cos", vec![arg.clone()]), Expr::int(-2)),
        "exp" => Expr::func("exp", vec![arg.clone()]),
        "log" => Expr::pow(arg.clone(), Expr::int(-1)),
        "sqrt" => Expr::mul(
            Expr::rational(1, 2),
            Expr::pow(arg.clone(), Expr::rational(-1, 2)),
        ),
        _ => return None,
    };
    Some(out)
}

// ============================================================================
// Integration
// ============================================================================

/// Antiderivative with respect to `var`, for the shapes the rule table
/// covers. `None` means no closed form was found.
pub fn integrate(expr: &Arc<Expr>, var: &str) -> Option<Arc<Expr>> {
    let expr = simplify(expr);
    let (constant, terms) = sum_parts(&expr);

    let mut parts: Vec<(BigRational, Arc<Expr>)> = Vec::new();
    if !constant.is_zero() {
        parts.push((constant, Expr::var(var)));
    }
    for (coeff, part) in terms {
        let anti = integrate_term(&part, var)?;
        parts.push((coeff, anti));
    }
    Some(simplify(&build_sum(BigRational::zero(), parts)))
}

fn integrate_term(part: &Arc<Expr>, var: &str) -> Option<Arc<Expr>> {
    if !contains_var(part, var) {
        return Some(Expr::mul(part.clone(), Expr::var(var)));
    }

    // Pull out factors that do not depend on the variable.
    let factors = product_factors(part);
    let (free, dependent): (Vec<_>, Vec<_>) = factors
        .into_iter()
        .partition(|(b, x)| !contains_var(b, var) && !contains_var(x, var));
    if dependent.len() != 1 {
        return None;
    }
    let (base, exp) = &dependent[0];
    let anti = integrate_factor(base, exp, var)?;

    if free.is_empty() {
        return Some(anti);
    }
    let prefix = free
        .into_iter()
        .map(|(b, x)| simplify(&Expr::pow(b, x)))
        .reduce(Expr::mul)?;
    Some(Expr::mul(prefix, anti))
}

fn integrate_factor(base: &Arc<Expr>, exp: &Arc<Expr>, var: &str) -> Option<Arc<Expr>> {
    // Power rule over var^n, including n = 1 and the log case n = -1.
    if matches!(base.as_ref(), Expr::Variable(name) if name == var) {
        if let Expr::Number(n) = exp.as_ref() {
            if *n == -BigRational::one() {
                return Some(Expr::func("log", vec![base.clone()]));
            }
            let next = n + BigRational::one();
            return Some(apply_coeff(
                next.recip(),
                Expr::pow(base.clone(), Expr::num(next.clone())),
            ));
        }
        return None;
    }

    // f(x)^1 for the directly integrable functions of the bare variable.
    if !exp.is_int(1) {
        return None;
    }
    if let Expr::Function(name, args) = base.as_ref() {
        if args.len() == 1 && matches!(args[0].as_ref(), Expr::Variable(n) if n == var) {
            let x = args[0].clone();
            return match name.as_str() {
                "sin" => Some(Expr::neg(Expr::func("cos", vec![x]))),
                "cos" => Some(Expr::func("sin", vec![x])),
                "exp" => Some(Expr::func("exp", vec![x])),
                "log" => Some(Expr::sub(
                    Expr::mul(x.clone(), Expr::func("log", vec![x.clone()])),
                    x,
                )),
                _ => None,
            };
        }
    }
    None
}

// ============================================================================
// Limits
// ============================================================================

/// Limit of `inner` as `var` approaches `to`. `None` keeps the node
/// unevaluated (undefined form at the point, or a shape outside the
/// rules).
fn limit(inner: &Arc<Expr>, var: &str, to: &Arc<Expr>) -> Option<Arc<Expr>> {
    if matches!(to.as_ref(), Expr::Constant(Constant::Infinity)) {
        return limit_at_infinity(inner, var);
    }
    let substituted = simplify(&substitute(&simplify(inner), var, to));
    if has_undefined_form(&substituted) {
        return None;
    }
    Some(substituted)
}

/// At infinity the rule table only covers sums whose variable-dependent
/// terms all vanish: every such term must be a pure negative power of
/// the variable. The remaining constant is the limit.
fn limit_at_infinity(inner: &Arc<Expr>, var: &str) -> Option<Arc<Expr>> {
    let (constant, terms) = sum_parts(&simplify(inner));
    for (_, part) in &terms {
        if !vanishes_at_infinity(part, var) {
            return None;
        }
    }
    Some(Expr::num(constant))
}

fn vanishes_at_infinity(part: &Arc<Expr>, var: &str) -> bool {
    if !contains_var(part, var) {
        // A var-free non-numeric term (pi, log(2), ...) does not vanish,
        // but it also was not folded into the constant; give up on it.
        return false;
    }
    product_factors(part).iter().all(|(base, exp)| {
        if !contains_var(base, var) {
            return !contains_var(exp, var);
        }
        matches!(base.as_ref(), Expr::Variable(name) if name == var)
            && matches!(exp.as_ref(), Expr::Number(n) if n.is_negative())
    })
}

/// An expression that normalized to an undefined or infinite form and
/// must not be read as a concrete value.
fn has_undefined_form(expr: &Arc<Expr>) -> bool {
    if contains_constant(expr, Constant::Infinity) {
        return true;
    }
    match expr.as_ref() {
        Expr::Pow(base, exp) => {
            if base.is_int(0) {
                if let Expr::Number(n) = exp.as_ref() {
                    if n.is_negative() {
                        return true;
                    }
                }
            }
            has_undefined_form(base) || has_undefined_form(exp)
        }
        Expr::Add(l, r) | Expr::Sub(l, r) | Expr::Mul(l, r) | Expr::Div(l, r) => {
            has_undefined_form(l) || has_undefined_form(r)
        }
        Expr::Neg(inner) => has_undefined_form(inner),
        Expr::Function(_, args) => args.iter().any(has_undefined_form),
        _ => false,
    }
}

// ============================================================================
// Forced evaluation
// ============================================================================

/// Replace every calculus operator the rule tables can close with its
/// closed form, innermost first.
pub fn doit(expr: &Arc<Expr>) -> Arc<Expr> {
    match expr.as_ref() {
        Expr::Number(_) | Expr::Variable(_) | Expr::Constant(_) => expr.clone(),
        Expr::Add(l, r) => Expr::add(doit(l), doit(r)),
        Expr::Sub(l, r) => Expr::sub(doit(l), doit(r)),
        Expr::Mul(l, r) => Expr::mul(doit(l), doit(r)),
        Expr::Div(l, r) => Expr::div(doit(l), doit(r)),
        Expr::Pow(b, e) => Expr::pow(doit(b), doit(e)),
        Expr::Neg(inner) => Expr::neg(doit(inner)),
        Expr::Function(name, args) => Arc::new(Expr::Function(
            name.clone(),
            args.iter().map(doit).collect(),
        )),
        Expr::Derivative { inner, var } => {
            let inner = doit(inner);
            tracing::debug!(target: "calculus", %inner, %var, "forcing derivative");
            simplify(&differentiate(&simplify(&inner), var))
        }
        Expr::Integral { inner, var, bounds } => {
            let inner = doit(inner);
            tracing::debug!(target: "calculus", %inner, %var, "forcing integral");
            match integrate(&inner, var) {
                Some(anti) => match bounds {
                    None => anti,
                    Some((lo, hi)) => {
                        let lo = doit(lo);
                        let hi = doit(hi);
                        simplify(&Expr::sub(
                            substitute(&anti, var, &hi),
                            substitute(&anti, var, &lo),
                        ))
                    }
                },
                None => Arc::new(Expr::Integral {
                    inner,
                    var: var.clone(),
                    bounds: bounds
                        .as_ref()
                        .map(|(lo, hi)| (doit(lo), doit(hi))),
                }),
            }
        }
        Expr::Limit { inner, var, to } => {
            let inner = doit(inner);
            let to = doit(to);
            tracing::debug!(target: "calculus", %inner, %var, %to, "forcing limit");
            match limit(&inner, var, &to) {
                Some(value) => value,
                None => Arc::new(Expr::Limit {
                    inner,
                    var: var.clone(),
                    to,
                }),
            }
        }
    }
}
