use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Signed;
use std::fmt;
use std::sync::Arc;

/// Named mathematical constants recognized by the parser and engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    /// Euler's number.
    E,
    /// Imaginary unit.
    I,
    Infinity,
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Pi => write!(f, "pi"),
            Constant::E => write!(f, "E"),
            Constant::I => write!(f, "I"),
            Constant::Infinity => write!(f, "oo"),
        }
    }
}

/// An immutable symbolic expression tree.
///
/// Trees are built once by the parser, optionally rewritten by the
/// calculus evaluator (`doit`), then consumed read-only by the
/// equivalence cascade. Children are shared via `Arc` so subtrees can
/// be reused freely across rewrites.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Number(BigRational),
    Variable(String),
    Constant(Constant),
    Add(Arc<Expr>, Arc<Expr>),
    Sub(Arc<Expr>, Arc<Expr>),
    Mul(Arc<Expr>, Arc<Expr>),
    Div(Arc<Expr>, Arc<Expr>),
    Pow(Arc<Expr>, Arc<Expr>),
    Neg(Arc<Expr>),
    /// Named function application: sin, cos, tan, log, exp, sqrt.
    Function(String, Vec<Arc<Expr>>),
    /// Unevaluated derivative d/d`var` of `inner`.
    Derivative { inner: Arc<Expr>, var: String },
    /// Unevaluated integral. `bounds` is `Some((lo, hi))` for a
    /// definite integral, `None` for an indefinite one.
    Integral {
        inner: Arc<Expr>,
        var: String,
        bounds: Option<(Arc<Expr>, Arc<Expr>)>,
    },
    /// Unevaluated limit of `inner` as `var` approaches `to`.
    Limit {
        inner: Arc<Expr>,
        var: String,
        to: Arc<Expr>,
    },
}

impl Expr {
    pub fn int(n: i64) -> Arc<Self> {
        Arc::new(Expr::Number(BigRational::from_integer(BigInt::from(n))))
    }

    pub fn num(n: BigRational) -> Arc<Self> {
        Arc::new(Expr::Number(n))
    }

    pub fn rational(num: i64, den: i64) -> Arc<Self> {
        Arc::new(Expr::Number(BigRational::new(
            BigInt::from(num),
            BigInt::from(den),
        )))
    }

    pub fn var(name: &str) -> Arc<Self> {
        Arc::new(Expr::Variable(name.to_string()))
    }

    pub fn constant(c: Constant) -> Arc<Self> {
        Arc::new(Expr::Constant(c))
    }

    pub fn add(lhs: Arc<Expr>, rhs: Arc<Expr>) -> Arc<Self> {
        Arc::new(Expr::Add(lhs, rhs))
    }

    pub fn sub(lhs: Arc<Expr>, rhs: Arc<Expr>) -> Arc<Self> {
        Arc::new(Expr::Sub(lhs, rhs))
    }

    pub fn mul(lhs: Arc<Expr>, rhs: Arc<Expr>) -> Arc<Self> {
        Arc::new(Expr::Mul(lhs, rhs))
    }

    pub fn div(lhs: Arc<Expr>, rhs: Arc<Expr>) -> Arc<Self> {
        Arc::new(Expr::Div(lhs, rhs))
    }

    pub fn pow(base: Arc<Expr>, exp: Arc<Expr>) -> Arc<Self> {
        Arc::new(Expr::Pow(base, exp))
    }

    pub fn neg(inner: Arc<Expr>) -> Arc<Self> {
        Arc::new(Expr::Neg(inner))
    }

    pub fn func(name: &str, args: Vec<Arc<Expr>>) -> Arc<Self> {
        Arc::new(Expr::Function(name.to_string(), args))
    }

    /// True when this node is the exact rational `n`.
    pub fn is_int(&self, n: i64) -> bool {
        matches!(self, Expr::Number(r) if *r == BigRational::from_integer(BigInt::from(n)))
    }

    pub fn as_number(&self) -> Option<&BigRational> {
        match self {
            Expr::Number(n) => Some(n),
            _ => None,
        }
    }
}

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(_, _) | Expr::Sub(_, _) => 1,
            Expr::Mul(_, _) | Expr::Div(_, _) => 2,
            Expr::Pow(_, _) => 3,
            Expr::Neg(_) => 4,
            Expr::Number(n) => {
                // Negative and fractional literals print with an operator.
                if n.is_negative() || !n.is_integer() {
                    1
                } else {
                    5
                }
            }
            _ => 5,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = self.precedence();
        let paren = |f: &mut fmt::Formatter<'_>, e: &Expr, min: u8| -> fmt::Result {
            if e.precedence() < min {
                write!(f, "({})", e)
            } else {
                write!(f, "{}", e)
            }
        };
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Variable(s) => write!(f, "{}", s),
            Expr::Constant(c) => write!(f, "{}", c),
            Expr::Add(l, r) => {
                paren(f, l, prec)?;
                write!(f, " + ")?;
                paren(f, r, prec)
            }
            Expr::Sub(l, r) => {
                paren(f, l, prec)?;
                write!(f, " - ")?;
                paren(f, r, prec + 1)
            }
            Expr::Mul(l, r) => {
                paren(f, l, prec)?;
                write!(f, "*")?;
                paren(f, r, prec)
            }
            Expr::Div(l, r) => {
                paren(f, l, prec)?;
                write!(f, "/")?;
                paren(f, r, prec + 1)
            }
            Expr::Pow(b, e) => {
                paren(f, b, prec + 1)?;
                write!(f, "^")?;
                paren(f, e, prec + 1)
            }
            Expr::Neg(e) => {
                write!(f, "-")?;
                paren(f, e, prec)
            }
            Expr::Function(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Derivative { inner, var } => {
                write!(f, "Derivative({}, {})", inner, var)
            }
            Expr::Integral {
                inner,
                var,
                bounds: None,
            } => write!(f, "Integral({}, {})", inner, var),
            Expr::Integral {
                inner,
                var,
                bounds: Some((lo, hi)),
            } => write!(f, "Integral({}, ({}, {}, {}))", inner, var, lo, hi),
            Expr::Limit { inner, var, to } => {
                write!(f, "Limit({}, {}, {})", inner, var, to)
            }
        }
    }
}
