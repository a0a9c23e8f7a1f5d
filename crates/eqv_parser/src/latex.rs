//! LaTeX to expression parser.
//!
//! Recursive descent over the token stream from [`crate::token`].
//! Four calculus forms are detected against the raw token stream
//! before the generic grammar runs, in this order: limit, definite
//! integral, indefinite integral, derivative. Everything else goes
//! through the generic expression grammar, which supports implicit
//! multiplication ("2x" parses as 2*x).

use crate::error::ParseError;
use crate::token::{tokenize, Token};
use eqv_ast::{Constant, Expr};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Pow;
use std::sync::Arc;

/// Parse a LaTeX string into an expression tree.
pub fn parse_latex(latex: &str) -> Result<Arc<Expr>, ParseError> {
    let tokens = tokenize(latex)?;
    if tokens.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    parse_tokens(&tokens)
}

fn parse_tokens(tokens: &[Token]) -> Result<Arc<Expr>, ParseError> {
    // Detection order matters: a definite integral starts like an
    // indefinite one, and \frac{d}{dx} looks like an ordinary fraction.
    if let Some(expr) = try_limit(tokens)? {
        return Ok(expr);
    }
    if let Some(expr) = try_definite_integral(tokens)? {
        return Ok(expr);
    }
    if let Some(expr) = try_indefinite_integral(tokens)? {
        return Ok(expr);
    }
    if let Some(expr) = try_derivative(tokens)? {
        return Ok(expr);
    }

    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expr()?;
    if parser.pos < tokens.len() {
        return Err(ParseError::UnconsumedInput(format!(
            "{:?}",
            &tokens[parser.pos..]
        )));
    }
    Ok(expr)
}

// ============================================================================
// Calculus special forms
// ============================================================================

/// Find the index of the `}` matching the `{` at `open`.
fn matching_rbrace(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate().skip(open) {
        match tok {
            Token::LBrace => depth += 1,
            Token::RBrace => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// `\lim_{v \to L} EXPR`
fn try_limit(tokens: &[Token]) -> Result<Option<Arc<Expr>>, ParseError> {
    if tokens.first() != Some(&Token::Lim) {
        return Ok(None);
    }
    if tokens.get(1) != Some(&Token::Underscore) || tokens.get(2) != Some(&Token::LBrace) {
        return Err(ParseError::UnexpectedToken(
            "\\lim requires a _{v \\to L} subscript".to_string(),
        ));
    }
    let var = match tokens.get(3) {
        Some(Token::Ident(name)) => name.clone(),
        other => {
            return Err(ParseError::UnexpectedToken(format!(
                "expected limit variable, got {:?}",
                other
            )))
        }
    };
    if tokens.get(4) != Some(&Token::To) {
        return Err(ParseError::UnexpectedToken(
            "\\lim subscript is missing \\to".to_string(),
        ));
    }
    let close = matching_rbrace(tokens, 2).ok_or(ParseError::UnmatchedBrace)?;
    if close <= 5 {
        return Err(ParseError::UnexpectedEnd);
    }
    let to = parse_tokens(&tokens[5..close])?;
    let body = &tokens[close + 1..];
    if body.is_empty() {
        return Err(ParseError::UnexpectedEnd);
    }
    let inner = parse_tokens(body)?;
    Ok(Some(Arc::new(Expr::Limit { inner, var, to })))
}

/// Split a trailing differential (`... d x` or `... dx`) off an
/// integral body, returning the body tokens and the variable name.
fn split_differential(tokens: &[Token]) -> Result<(&[Token], String), ParseError> {
    match tokens {
        [body @ .., Token::Ident(d), Token::Ident(v)] if d == "d" && v.len() == 1 => {
            Ok((body, v.clone()))
        }
        [body @ .., Token::Ident(dv)] if dv.len() == 2 && dv.starts_with('d') => {
            Ok((body, dv[1..].to_string()))
        }
        _ => Err(ParseError::MissingDifferential),
    }
}

/// Parse an integral bound starting at `idx`: either a braced group or
/// a single (possibly negated) atom token. Returns the bound and the
/// index just past it.
fn parse_bound(tokens: &[Token], idx: usize) -> Result<(Arc<Expr>, usize), ParseError> {
    match tokens.get(idx) {
        Some(Token::LBrace) => {
            let close = matching_rbrace(tokens, idx).ok_or(ParseError::UnmatchedBrace)?;
            let bound = parse_tokens(&tokens[idx + 1..close])?;
            Ok((bound, close + 1))
        }
        Some(Token::Minus) => {
            let (inner, next) = parse_bound(tokens, idx + 1)?;
            Ok((Expr::neg(inner), next))
        }
        Some(Token::Number(s)) => Ok((number_expr(s)?, idx + 1)),
        Some(Token::Ident(name)) => Ok((ident_atom(name), idx + 1)),
        Some(Token::Pi) => Ok((Expr::constant(Constant::Pi), idx + 1)),
        Some(Token::Infty) => Ok((Expr::constant(Constant::Infinity), idx + 1)),
        other => Err(ParseError::UnexpectedToken(format!(
            "expected integral bound, got {:?}",
            other
        ))),
    }
}

/// `\int_{lo}^{hi} EXPR dv`
fn try_definite_integral(tokens: &[Token]) -> Result<Option<Arc<Expr>>, ParseError> {
    if tokens.first() != Some(&Token::Int) || tokens.get(1) != Some(&Token::Underscore) {
        return Ok(None);
    }
    let (lo, next) = parse_bound(tokens, 2)?;
    if tokens.get(next) != Some(&Token::Caret) {
        return Err(ParseError::UnexpectedToken(
            "definite integral is missing its upper bound".to_string(),
        ));
    }
    let (hi, next) = parse_bound(tokens, next + 1)?;
    let (body, var) = split_differential(&tokens[next..])?;
    if body.is_empty() {
        return Err(ParseError::UnexpectedEnd);
    }
    let inner = parse_tokens(body)?;
    Ok(Some(Arc::new(Expr::Integral {
        inner,
        var,
        bounds: Some((lo, hi)),
    })))
}

/// `\int EXPR dv`
fn try_indefinite_integral(tokens: &[Token]) -> Result<Option<Arc<Expr>>, ParseError> {
    if tokens.first() != Some(&Token::Int) {
        return Ok(None);
    }
    let (body, var) = split_differential(&tokens[1..])?;
    if body.is_empty() {
        return Err(ParseError::UnexpectedEnd);
    }
    let inner = parse_tokens(body)?;
    Ok(Some(Arc::new(Expr::Integral {
        inner,
        var,
        bounds: None,
    })))
}

/// `\frac{d}{dv} EXPR`
///
/// Returns `None` (falling back to the ordinary fraction grammar) when
/// the header does not match exactly, e.g. `\frac{d}{2}`.
fn try_derivative(tokens: &[Token]) -> Result<Option<Arc<Expr>>, ParseError> {
    let header = match tokens {
        [Token::Frac, Token::LBrace, Token::Ident(d), Token::RBrace, Token::LBrace, rest @ ..]
            if d == "d" =>
        {
            match rest {
                [Token::Ident(dv), Token::RBrace, body @ ..]
                    if dv.len() == 2 && dv.starts_with('d') =>
                {
                    Some((dv[1..].to_string(), body))
                }
                [Token::Ident(d2), Token::Ident(v), Token::RBrace, body @ ..]
                    if d2 == "d" && v.len() == 1 =>
                {
                    Some((v.clone(), body))
                }
                _ => None,
            }
        }
        _ => None,
    };

    match header {
        Some((var, body)) => {
            if body.is_empty() {
                return Err(ParseError::UnexpectedEnd);
            }
            let inner = parse_tokens(body)?;
            Ok(Some(Arc::new(Expr::Derivative { inner, var })))
        }
        None => Ok(None),
    }
}

// ============================================================================
// Generic expression grammar
// ============================================================================

fn number_expr(text: &str) -> Result<Arc<Expr>, ParseError> {
    let value = match text.split_once('.') {
        None => {
            let n: BigInt = text
                .parse()
                .map_err(|_| ParseError::UnexpectedToken(format!("invalid number: {}", text)))?;
            BigRational::from_integer(n)
        }
        Some((int_part, frac_part)) => {
            let scale: BigInt = BigInt::from(10).pow(frac_part.len() as u32);
            let int: BigInt = int_part
                .parse()
                .map_err(|_| ParseError::UnexpectedToken(format!("invalid number: {}", text)))?;
            let frac: BigInt = frac_part
                .parse()
                .map_err(|_| ParseError::UnexpectedToken(format!("invalid number: {}", text)))?;
            BigRational::new(int * &scale + frac, scale)
        }
    };
    Ok(Expr::num(value))
}

/// A bare identifier. The standalone "i" heuristic lives here: a
/// one-letter "i" always becomes the imaginary unit, even when the
/// author meant a real variable named i.
fn ident_atom(name: &str) -> Arc<Expr> {
    if name == "i" {
        Expr::constant(Constant::I)
    } else {
        Expr::var(name)
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek2(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ParseError> {
        match self.advance() {
            Some(tok) if tok == expected => Ok(()),
            Some(tok) => Err(ParseError::UnexpectedToken(format!(
                "expected {:?}, got {:?}",
                expected, tok
            ))),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    /// Lowest precedence: addition and subtraction, with a leading
    /// unary minus binding to the first term.
    fn parse_expr(&mut self) -> Result<Arc<Expr>, ParseError> {
        let mut left = if self.peek() == Some(&Token::Minus) {
            self.advance();
            Expr::neg(self.parse_term()?)
        } else {
            self.parse_term()?
        };

        while let Some(tok) = self.peek() {
            match tok {
                Token::Plus => {
                    self.advance();
                    let right = self.parse_term()?;
                    left = Expr::add(left, right);
                }
                Token::Minus => {
                    self.advance();
                    let right = self.parse_term()?;
                    left = Expr::sub(left, right);
                }
                _ => break,
            }
        }

        Ok(left)
    }

    /// Multiplication and division, explicit (`\cdot`, `*`, `/`) or
    /// implicit (adjacent atoms).
    fn parse_term(&mut self) -> Result<Arc<Expr>, ParseError> {
        let mut left = self.parse_power()?;

        while let Some(tok) = self.peek() {
            match tok {
                Token::Cdot | Token::Star => {
                    self.advance();
                    let right = self.parse_power()?;
                    left = Expr::mul(left, right);
                }
                Token::Slash => {
                    self.advance();
                    let right = self.parse_power()?;
                    left = Expr::div(left, right);
                }
                Token::Ident(_)
                | Token::Number(_)
                | Token::Pi
                | Token::Infty
                | Token::Frac
                | Token::Sqrt
                | Token::Sin
                | Token::Cos
                | Token::Tan
                | Token::Ln
                | Token::Log
                | Token::Exp
                | Token::LParen
                | Token::LBrace => {
                    let right = self.parse_power()?;
                    left = Expr::mul(left, right);
                }
                _ => break,
            }
        }

        Ok(left)
    }

    fn parse_power(&mut self) -> Result<Arc<Expr>, ParseError> {
        let base = self.parse_atom()?;

        if self.peek() == Some(&Token::Caret) {
            self.advance();
            let exp = self.parse_exponent()?;
            Ok(Expr::pow(base, exp))
        } else {
            Ok(base)
        }
    }

    /// An exponent: braced group, or a single (possibly negated) atom.
    fn parse_exponent(&mut self) -> Result<Arc<Expr>, ParseError> {
        match self.peek() {
            Some(Token::LBrace) => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&Token::RBrace)?;
                Ok(expr)
            }
            Some(Token::Minus) => {
                self.advance();
                Ok(Expr::neg(self.parse_atom()?))
            }
            _ => self.parse_atom(),
        }
    }

    fn parse_atom(&mut self) -> Result<Arc<Expr>, ParseError> {
        match self.peek().cloned() {
            Some(Token::Number(s)) => {
                self.advance();
                number_expr(&s)
            }
            Some(Token::Ident(name)) => {
                self.advance();
                // e^{X} is Euler shorthand for exp(X); a bare e (or
                // e^2 without braces) stays an ordinary variable.
                if name == "e"
                    && self.peek() == Some(&Token::Caret)
                    && self.peek2() == Some(&Token::LBrace)
                {
                    self.advance(); // ^
                    self.advance(); // {
                    let arg = self.parse_expr()?;
                    self.expect(&Token::RBrace)?;
                    return Ok(Expr::func("exp", vec![arg]));
                }
                Ok(ident_atom(&name))
            }
            Some(Token::Pi) => {
                self.advance();
                Ok(Expr::constant(Constant::Pi))
            }
            Some(Token::Infty) => {
                self.advance();
                Ok(Expr::constant(Constant::Infinity))
            }
            Some(Token::LParen) => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            Some(Token::LBrace) => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&Token::RBrace)?;
                Ok(expr)
            }
            Some(Token::Frac) => {
                self.advance();
                self.expect(&Token::LBrace)?;
                let numer = self.parse_expr()?;
                self.expect(&Token::RBrace)?;
                self.expect(&Token::LBrace)?;
                let denom = self.parse_expr()?;
                self.expect(&Token::RBrace)?;
                Ok(Expr::div(numer, denom))
            }
            Some(Token::Sqrt) => {
                self.advance();
                // Optional index: \sqrt[n]{...} becomes an n-th root.
                if self.peek() == Some(&Token::LBracket) {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(&Token::RBracket)?;
                    self.expect(&Token::LBrace)?;
                    let radicand = self.parse_expr()?;
                    self.expect(&Token::RBrace)?;
                    Ok(Expr::pow(radicand, Expr::div(Expr::int(1), index)))
                } else {
                    self.expect(&Token::LBrace)?;
                    let radicand = self.parse_expr()?;
                    self.expect(&Token::RBrace)?;
                    Ok(Expr::func("sqrt", vec![radicand]))
                }
            }
            Some(
                tok @ (Token::Sin | Token::Cos | Token::Tan | Token::Ln | Token::Log | Token::Exp),
            ) => {
                self.advance();
                let name = match tok {
                    Token::Sin => "sin",
                    Token::Cos => "cos",
                    Token::Tan => "tan",
                    // Both \ln and \log map to the natural logarithm.
                    Token::Ln | Token::Log => "log",
                    Token::Exp => "exp",
                    _ => unreachable!(),
                };
                self.parse_function_call(name)
            }
            Some(tok) => Err(ParseError::UnexpectedToken(format!("{:?}", tok))),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    /// A named function with an optional power shorthand:
    /// `\sin^2(x)` parses as `sin(x)^2`.
    fn parse_function_call(&mut self, name: &str) -> Result<Arc<Expr>, ParseError> {
        let exponent = if self.peek() == Some(&Token::Caret) {
            self.advance();
            Some(self.parse_exponent()?)
        } else {
            None
        };

        let arg = match self.peek() {
            Some(Token::LParen) => {
                self.advance();
                let arg = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                arg
            }
            Some(Token::LBrace) => {
                self.advance();
                let arg = self.parse_expr()?;
                self.expect(&Token::RBrace)?;
                arg
            }
            other => {
                return Err(ParseError::UnexpectedToken(format!(
                    "expected argument of {}, got {:?}",
                    name, other
                )))
            }
        };

        let call = Expr::func(name, vec![arg]);
        Ok(match exponent {
            Some(exp) => Expr::pow(call, exp),
            None => call,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(latex: &str) -> Arc<Expr> {
        parse_latex(latex).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", latex, e))
    }

    #[test]
    fn parse_half_fraction() {
        assert_eq!(parse("\\frac{1}{2}"), Expr::div(Expr::int(1), Expr::int(2)));
    }

    #[test]
    fn parse_sum_with_literal() {
        assert_eq!(parse("x+1"), Expr::add(Expr::var("x"), Expr::int(1)));
    }

    #[test]
    fn parse_implicit_multiplication() {
        assert_eq!(parse("2x"), Expr::mul(Expr::int(2), Expr::var("x")));
        assert_eq!(
            parse("2\\pi x"),
            Expr::mul(
                Expr::mul(Expr::int(2), Expr::constant(Constant::Pi)),
                Expr::var("x")
            )
        );
    }

    #[test]
    fn parse_braced_and_bare_exponents() {
        assert_eq!(
            parse("x^{n+1}"),
            Expr::pow(Expr::var("x"), Expr::add(Expr::var("n"), Expr::int(1)))
        );
        assert_eq!(parse("x^9"), Expr::pow(Expr::var("x"), Expr::int(9)));
    }

    #[test]
    fn parse_trig_power_shorthand() {
        assert_eq!(
            parse("\\sin^2(x)"),
            Expr::pow(Expr::func("sin", vec![Expr::var("x")]), Expr::int(2))
        );
        assert_eq!(
            parse("\\cos^{2}(x)"),
            Expr::pow(Expr::func("cos", vec![Expr::var("x")]), Expr::int(2))
        );
    }

    #[test]
    fn parse_euler_shorthand() {
        // e^{...} is exp; bare e stays a variable.
        assert_eq!(
            parse("e^{i\\pi}"),
            Expr::func(
                "exp",
                vec![Expr::mul(
                    Expr::constant(Constant::I),
                    Expr::constant(Constant::Pi)
                )]
            )
        );
        assert_eq!(parse("e"), Expr::var("e"));
        assert_eq!(parse("e^2"), Expr::pow(Expr::var("e"), Expr::int(2)));
    }

    #[test]
    fn parse_ln_and_log_both_natural() {
        assert_eq!(parse("\\ln(x)"), Expr::func("log", vec![Expr::var("x")]));
        assert_eq!(parse("\\log(x)"), Expr::func("log", vec![Expr::var("x")]));
    }

    #[test]
    fn standalone_i_is_imaginary_unit() {
        // Known ambiguity: a real variable literally named i cannot
        // be expressed.
        assert_eq!(
            parse("i+1"),
            Expr::add(Expr::constant(Constant::I), Expr::int(1))
        );
        // Multi-letter identifiers are unaffected.
        assert_eq!(parse("si"), Expr::var("si"));
    }

    #[test]
    fn parse_limit() {
        let e = parse("\\lim_{x\\to 0}\\frac{\\sin(x)}{x}");
        match e.as_ref() {
            Expr::Limit { var, to, .. } => {
                assert_eq!(var, "x");
                assert_eq!(*to, Expr::int(0));
            }
            other => panic!("expected limit, got {:?}", other),
        }
    }

    #[test]
    fn parse_limit_to_infinity() {
        let e = parse("\\lim_{x\\to\\infty}\\frac{1}{x}");
        match e.as_ref() {
            Expr::Limit { to, .. } => {
                assert_eq!(*to, Expr::constant(Constant::Infinity));
            }
            other => panic!("expected limit, got {:?}", other),
        }
    }

    #[test]
    fn parse_definite_integral() {
        let e = parse("\\int_0^1 x^2 dx");
        match e.as_ref() {
            Expr::Integral {
                var,
                bounds: Some((lo, hi)),
                inner,
            } => {
                assert_eq!(var, "x");
                assert_eq!(*lo, Expr::int(0));
                assert_eq!(*hi, Expr::int(1));
                assert_eq!(*inner, Expr::pow(Expr::var("x"), Expr::int(2)));
            }
            other => panic!("expected definite integral, got {:?}", other),
        }
    }

    #[test]
    fn parse_definite_integral_braced_bounds() {
        let e = parse("\\int_{0}^{\\pi} \\sin(x) \\, dx");
        match e.as_ref() {
            Expr::Integral {
                bounds: Some((lo, hi)),
                ..
            } => {
                assert_eq!(*lo, Expr::int(0));
                assert_eq!(*hi, Expr::constant(Constant::Pi));
            }
            other => panic!("expected definite integral, got {:?}", other),
        }
    }

    #[test]
    fn parse_indefinite_integral() {
        let e = parse("\\int x^2 \\, d x");
        match e.as_ref() {
            Expr::Integral {
                var, bounds: None, ..
            } => assert_eq!(var, "x"),
            other => panic!("expected indefinite integral, got {:?}", other),
        }
    }

    #[test]
    fn parse_derivative() {
        let e = parse("\\frac{d}{dx}(x^2+3x)");
        match e.as_ref() {
            Expr::Derivative { var, inner } => {
                assert_eq!(var, "x");
                assert_eq!(
                    *inner,
                    Expr::add(
                        Expr::pow(Expr::var("x"), Expr::int(2)),
                        Expr::mul(Expr::int(3), Expr::var("x"))
                    )
                );
            }
            other => panic!("expected derivative, got {:?}", other),
        }
    }

    #[test]
    fn frac_d_over_number_is_plain_fraction() {
        // Header almost matches a derivative but is not one.
        assert_eq!(
            parse("\\frac{d}{2}"),
            Expr::div(Expr::var("d"), Expr::int(2))
        );
    }

    #[test]
    fn parse_nth_root() {
        assert_eq!(
            parse("\\sqrt[3]{x}"),
            Expr::pow(Expr::var("x"), Expr::div(Expr::int(1), Expr::int(3)))
        );
    }

    #[test]
    fn parse_leading_minus() {
        assert_eq!(parse("-x"), Expr::neg(Expr::var("x")));
        assert_eq!(
            parse("-x+y"),
            Expr::add(Expr::neg(Expr::var("x")), Expr::var("y"))
        );
    }

    #[test]
    fn parse_decimal_number() {
        assert_eq!(parse("0.5"), Expr::rational(1, 2));
    }

    #[test]
    fn malformed_inputs_fail() {
        assert!(parse_latex("\\frac{1}{").is_err());
        assert!(parse_latex("").is_err());
        assert!(parse_latex("x+").is_err());
        assert!(parse_latex("\\int x^2").is_err()); // no differential
        assert!(parse_latex("\\sin").is_err()); // no argument
    }

    #[test]
    fn unknown_command_becomes_variable() {
        assert_eq!(parse("\\alpha+1"), Expr::add(Expr::var("alpha"), Expr::int(1)));
    }
}
