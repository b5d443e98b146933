//! Lexer/tokenizer for declaration files.
//!
//! Ordinary comments are dropped. A `/** ... */` comment is attached to the
//! token that follows it so the grammar can pick up documentation tags.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, multispace1, not_line_ending, one_of, satisfy},
    combinator::{opt, recognize},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use pattern_core::{ParseError, Span};

/// Kind of a lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifiers and keywords
    Ident(String),
    /// String and template literals, unescaped
    Str(String),
    Num(f64),
    Punct(&'static str),
}

/// A token with its location and attached documentation.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Body of the doc comment directly before this token
    pub doc: Option<String>,
    /// Whether a line break separates this token from the previous one
    pub newline_before: bool,
}

impl Token {
    /// Source-like rendering for error messages.
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Ident(s) => s.clone(),
            TokenKind::Str(s) => format!("{s:?}"),
            TokenKind::Num(n) => n.to_string(),
            TokenKind::Punct(p) => (*p).to_string(),
        }
    }
}

/// Multi-character punctuators first so they win over their prefixes.
const PUNCTUATORS: &[&str] = &[
    "=>", "...", "{", "}", "(", ")", "[", "]", "<", ">", ";", ",", ":", "?", "=", "|", "&", ".",
    "*", "@", "!", "+", "-", "/", "%", "^", "~", "#",
];

/// Parse an identifier (letters, digits, `_` and `$`, not starting with a digit).
pub fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_' || c == '$'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '$'),
    ))(input)
}

/// Parse a numeric literal (decimal, hex, exponent, `_` separators, bigint suffix).
pub fn number(input: &str) -> IResult<&str, f64> {
    alt((hex_number, decimal_number))(input)
}

fn hex_number(input: &str) -> IResult<&str, f64> {
    let (rest, digits) = preceded(
        alt((tag("0x"), tag("0X"))),
        take_while1(|c: char| c.is_ascii_hexdigit() || c == '_'),
    )(input)?;
    let (rest, _) = opt(char('n'))(rest)?;
    let value = i64::from_str_radix(&digits.replace('_', ""), 16).unwrap_or(0);
    Ok((rest, value as f64))
}

/// Digits with `_` separators; the first character must be a digit.
fn digits(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_digit()),
        take_while(|c: char| c.is_ascii_digit() || c == '_'),
    ))(input)
}

fn decimal_number(input: &str) -> IResult<&str, f64> {
    let (rest, text) = recognize(tuple((
        digits,
        opt(pair(char('.'), opt(digits))),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digits))),
    )))(input)?;
    let (rest, _) = opt(char('n'))(rest)?;
    Ok((rest, text.replace('_', "").parse().unwrap_or(0.0)))
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("//"), not_line_ending))(input)
}

/// Parse a doc comment, returning its body.
pub fn doc_comment(input: &str) -> IResult<&str, &str> {
    let (rest, body) = delimited(tag("/**"), take_until("*/"), tag("*/"))(input)?;
    // `/**/` is an empty block comment, not documentation
    if input.starts_with("/**/") {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        )));
    }
    Ok((rest, body))
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize(tuple((tag("/*"), take_until("*/"), tag("*/"))))(input)
}

fn punctuator(input: &str) -> IResult<&str, &'static str> {
    for &p in PUNCTUATORS {
        if let Some(rest) = input.strip_prefix(p) {
            return Ok((rest, p));
        }
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Tag,
    )))
}

/// Parse a quoted literal, handling the common escape sequences.
///
/// Returns `None` when the closing quote is missing.
fn quoted(input: &str, quote: char) -> Option<(&str, String)> {
    let mut result = String::new();
    let mut chars = input.char_indices().skip(1);

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, escaped) = chars.next()?;
                match escaped {
                    'n' => result.push('\n'),
                    't' => result.push('\t'),
                    'r' => result.push('\r'),
                    '0' => result.push('\0'),
                    '\n' => {}
                    other => result.push(other),
                }
            }
            '\n' if quote != '`' => return None,
            c if c == quote => return Some((&input[i + c.len_utf8()..], result)),
            c => result.push(c),
        }
    }

    None
}

/// Maps byte offsets to line/column positions.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(input: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(input.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    fn position(&self, offset: usize) -> (u32, u32) {
        let line = match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        (line as u32 + 1, (offset - self.starts[line]) as u32 + 1)
    }

    fn span(&self, start: usize, end: usize) -> Span {
        let (line, column) = self.position(start);
        Span {
            start,
            end,
            line,
            column,
        }
    }
}

/// Split input into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let index = LineIndex::new(input);
    let mut tokens = Vec::new();
    let mut rest = input;
    let mut doc: Option<String> = None;
    let mut newline = true;

    while !rest.is_empty() {
        let offset = input.len() - rest.len();

        if let Ok((next, ws)) = multispace1::<&str, nom::error::Error<&str>>(rest) {
            newline |= ws.contains('\n');
            rest = next;
            continue;
        }
        if let Ok((next, _)) = line_comment(rest) {
            rest = next;
            continue;
        }
        if let Ok((next, body)) = doc_comment(rest) {
            newline |= body.contains('\n');
            doc = Some(body.to_string());
            rest = next;
            continue;
        }
        if let Ok((next, text)) = block_comment(rest) {
            newline |= text.contains('\n');
            rest = next;
            continue;
        }
        if rest.starts_with("/*") {
            let (line, _) = index.position(offset);
            return Err(ParseError::UnterminatedComment { line });
        }

        let (next, kind) = if let Some(quote) = rest.chars().next().filter(|c| "'\"`".contains(*c)) {
            match quoted(rest, quote) {
                Some((next, value)) => (next, TokenKind::Str(value)),
                None => {
                    let (line, column) = index.position(offset);
                    return Err(ParseError::UnterminatedString { line, column });
                }
            }
        } else if let Ok((next, value)) = number(rest) {
            (next, TokenKind::Num(value))
        } else if let Ok((next, word)) = identifier(rest) {
            (next, TokenKind::Ident(word.to_string()))
        } else if let Ok((next, p)) = punctuator(rest) {
            (next, TokenKind::Punct(p))
        } else {
            let (line, column) = index.position(offset);
            let found = rest.chars().next().unwrap_or_default();
            return Err(ParseError::UnexpectedCharacter {
                found,
                line,
                column,
            });
        };

        let end = input.len() - next.len();
        tokens.push(Token {
            kind,
            span: index.span(offset, end),
            doc: doc.take(),
            newline_before: newline,
        });
        newline = false;
        rest = next;
    }

    Ok(tokens)
}
