//! LaTeX tokenizer (nom-based).
//!
//! Produces a flat token stream for the recursive-descent parser in
//! [`crate::latex`]. Layout commands (`\,`, `\left`, `\right`) are
//! dropped here; unknown commands become plain identifiers so the
//! parser can reject them with a useful message.

use crate::error::ParseError;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1},
    combinator::{map, opt},
    sequence::preceded,
    IResult,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Number(String), // "123", "0.5"
    Ident(String),  // "x", "dx", unknown commands

    // Operators
    Plus,       // +
    Minus,      // -
    Star,       // * (math-widget output)
    Slash,      // /
    Caret,      // ^
    Underscore, // _ (subscripts on \lim / \int)

    // Grouping
    LBrace,   // {
    RBrace,   // }
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]

    // LaTeX commands
    Frac,  // \frac
    Sqrt,  // \sqrt
    Sin,   // \sin
    Cos,   // \cos
    Tan,   // \tan
    Ln,    // \ln
    Log,   // \log
    Exp,   // \exp
    Pi,    // \pi
    Infty, // \infty
    Cdot,  // \cdot
    To,    // \to
    Lim,   // \lim
    Int,   // \int

    // Dropped before parsing (thin space, \left, \right)
    Ignored,
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Parse a LaTeX command like \frac, \sin, \, etc.
fn latex_command(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('\\')(input)?;
    let (input, cmd) = alt((take_while1(is_alpha), tag(",")))(input)?;

    let token = match cmd {
        "frac" => Token::Frac,
        "sqrt" => Token::Sqrt,
        "sin" => Token::Sin,
        "cos" => Token::Cos,
        "tan" => Token::Tan,
        "ln" => Token::Ln,
        "log" => Token::Log,
        "exp" => Token::Exp,
        "pi" => Token::Pi,
        "infty" => Token::Infty,
        "cdot" => Token::Cdot,
        "to" | "rightarrow" => Token::To,
        "lim" => Token::Lim,
        "int" => Token::Int,
        "," | "left" | "right" => Token::Ignored,
        _ => Token::Ident(cmd.to_string()), // Unknown commands become identifiers
    };

    Ok((input, token))
}

/// Parse a number: integer or simple decimal.
fn number(input: &str) -> IResult<&str, Token> {
    let (input, int_part) = digit1(input)?;
    let (input, frac_part) = opt(preceded(char('.'), digit1))(input)?;
    let text = match frac_part {
        Some(frac) => format!("{}.{}", int_part, frac),
        None => int_part.to_string(),
    };
    Ok((input, Token::Number(text)))
}

/// Parse an identifier (alphabetic run).
fn ident(input: &str) -> IResult<&str, Token> {
    let (input, name) = take_while1(is_alpha)(input)?;
    Ok((input, Token::Ident(name.to_string())))
}

fn operator_or_grouping(input: &str) -> IResult<&str, Token> {
    alt((
        map(char('+'), |_| Token::Plus),
        map(char('-'), |_| Token::Minus),
        map(char('*'), |_| Token::Star),
        map(char('/'), |_| Token::Slash),
        map(char('^'), |_| Token::Caret),
        map(char('_'), |_| Token::Underscore),
        map(char('{'), |_| Token::LBrace),
        map(char('}'), |_| Token::RBrace),
        map(char('('), |_| Token::LParen),
        map(char(')'), |_| Token::RParen),
        map(char('['), |_| Token::LBracket),
        map(char(']'), |_| Token::RBracket),
    ))(input)
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((latex_command, number, operator_or_grouping, ident))(input)
}

/// Tokenize an entire LaTeX string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() {
        let trimmed = remaining.trim_start();
        if trimmed.is_empty() {
            break;
        }
        remaining = trimmed;

        match token(remaining) {
            Ok((rest, tok)) => {
                if tok != Token::Ignored {
                    tokens.push(tok);
                }
                remaining = rest;
            }
            Err(_) => {
                // Truncate on a char boundary; the input may be
                // multibyte (math widgets emit characters like ±, €).
                return Err(ParseError::Tokenize(
                    remaining.chars().take(20).collect::<String>(),
                ));
            }
        }
    }

    Ok(tokens)
}
