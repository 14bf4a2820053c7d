//! Predicate expression parser using nom.
//!
//! Parses a textual predicate into an [`Expr`] tree, for callers that do
//! not build trees through an editor.
//!
//! # Syntax Overview
//!
//! ```text
//! "First Name" BEGINSWITH "Jo" AND NOT (zipcode = "02139" OR zipcode = "02140")
//! ─────┬────── ─────┬──── ─┬── ─┬─ ─┬─ ──────────────────┬──────────────────────
//!      │            │      │    │   │                    └── Parenthesized group
//!      │            │      │    │   └── Negation
//!      │            │      │    └── Connective (AND binds tighter than OR)
//!      │            │      └── Value (always quoted)
//!      │            └── Operator (=, ==, !=, <>, CONTAINS, BEGINSWITH, ENDSWITH)
//!      └── Criteria display name (quoted, or a bare identifier)
//! ```
//!
//! Keywords are case-insensitive. A chain of the same connective becomes
//! one compound: `a AND b AND c` is a single AND with three children.
//! Groups and negations may nest at most [`MAX_NESTING`] deep.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while1},
    character::complete::{char, multispace0, satisfy},
    combinator::{map, not, value},
    error::ErrorKind,
    multi::many0,
    sequence::{delimited, preceded, terminated},
    IResult,
};

use crate::ast::*;
use crate::error::{PredicateError, PredicateResult};

/// Parse a complete predicate expression.
pub fn parse(input: &str) -> PredicateResult<Expr> {
    let input = input.trim();

    match parse_or(input, 0) {
        Ok(("", expr)) => Ok(expr),
        Ok((remaining, _)) => Err(PredicateError::parse(
            input.len() - remaining.len(),
            format!("Unexpected trailing content: '{}'", remaining),
        )),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(PredicateError::parse(
            input.len() - e.input.len(),
            describe(e.input, e.code),
        )),
        Err(nom::Err::Incomplete(_)) => {
            Err(PredicateError::parse(input.len(), "Unexpected end of input"))
        }
    }
}

/// Human-readable message for the point where parsing stopped.
fn describe(at: &str, code: ErrorKind) -> String {
    if code == ErrorKind::TooLarge {
        return format!("Expression nested deeper than {} levels", MAX_NESTING);
    }
    if at.trim().is_empty() {
        return "Unexpected end of input".to_string();
    }
    let msg = match code {
        ErrorKind::Escaped => "Unterminated string",
        ErrorKind::Char => "Expected a quoted value",
        ErrorKind::Tag => {
            "Expected an operator (=, !=, CONTAINS, BEGINSWITH, ENDSWITH)"
        }
        ErrorKind::TakeWhile1 => "Expected a criteria name, quoted name or '('",
        _ => "Invalid expression",
    };
    let near: String = at.chars().take(20).collect();
    format!("{} near '{}'", msg, near)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Case-insensitive keyword not followed by an identifier character.
fn word<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag_no_case(kw), not(satisfy(is_ident_char)))
}

fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(multispace0, word(kw))
}

fn symbol<'a>(c: char) -> impl FnMut(&'a str) -> IResult<&'a str, char> {
    preceded(multispace0, char(c))
}

/// Collapse a connective chain into one compound.
fn chain(kind: CompoundKind, first: Expr, rest: Vec<Expr>) -> Expr {
    if rest.is_empty() {
        return first;
    }
    let mut children = Vec::with_capacity(rest.len() + 1);
    children.push(first);
    children.extend(rest);
    Expr::compound(kind, children)
}

/// or_expr := and_expr ( OR and_expr )*
fn parse_or(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, first) = parse_and(input, depth)?;
    let (input, rest) = many0(preceded(keyword("OR"), |i| parse_and(i, depth)))(input)?;
    Ok((input, chain(CompoundKind::Or, first, rest)))
}

/// and_expr := not_expr ( AND not_expr )*
fn parse_and(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, first) = parse_not(input, depth)?;
    let (input, rest) = many0(preceded(keyword("AND"), |i| parse_not(i, depth)))(input)?;
    Ok((input, chain(CompoundKind::And, first, rest)))
}

/// not_expr := NOT not_expr | primary
fn parse_not(input: &str, depth: usize) -> IResult<&str, Expr> {
    if depth > MAX_NESTING {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            ErrorKind::TooLarge,
        )));
    }
    alt((
        map(preceded(keyword("NOT"), |i| parse_not(i, depth + 1)), Expr::not),
        |i| parse_primary(i, depth),
    ))(input)
}

/// primary := "(" or_expr ")" | comparison
fn parse_primary(input: &str, depth: usize) -> IResult<&str, Expr> {
    alt((
        delimited(symbol('('), |i| parse_or(i, depth + 1), symbol(')')),
        parse_comparison,
    ))(input)
}

/// comparison := name operator string
fn parse_comparison(input: &str) -> IResult<&str, Expr> {
    let (input, _) = multispace0(input)?;
    let (input, criteria) = alt((
        parse_quoted_string,
        map(take_while1(is_ident_char), |s: &str| s.to_string()),
    ))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, operator) = parse_operator(input)?;
    let (input, _) = multispace0(input)?;
    let (input, value) = parse_quoted_string(input)?;

    Ok((input, Expr::compare(criteria, operator, value)))
}

/// Parse an operator symbol or keyword.
fn parse_operator(input: &str) -> IResult<&str, OperatorTag> {
    alt((
        value(OperatorTag::Equal, tag("==")),
        value(OperatorTag::NotEqual, tag("!=")),
        value(OperatorTag::NotEqual, tag("<>")),
        value(OperatorTag::Equal, tag("=")),
        value(OperatorTag::Contains, word("CONTAINS")),
        value(OperatorTag::BeginsWith, word("BEGINSWITH")),
        value(OperatorTag::EndsWith, word("ENDSWITH")),
    ))(input)
}

/// Parse a single- or double-quoted string with backslash escapes.
fn parse_quoted_string(input: &str) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, c)) if c == '"' || c == '\'' => c,
        _ => {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Char,
            )));
        }
    };

    let mut content = String::new();
    let mut escaped = false;
    for (i, c) in chars {
        if escaped {
            content.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Ok((&input[i + c.len_utf8()..], content));
        } else {
            content.push(c);
        }
    }

    // Unterminated: no other branch can make sense of the rest.
    Err(nom::Err::Failure(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Escaped,
    )))
}
