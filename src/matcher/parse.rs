use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::{tag,take_while,take_while1};
use nom::character::complete::anychar;
use nom::combinator::{all_consuming,value,opt,cut,peek,verify};
use nom::error::ErrorKind;
use nom::sequence::{preceded,delimited,terminated};
use crate::matcher::pattern::Pattern;

/// `pos` counts the bytes left unparsed when the error happened.
#[derive(Debug,PartialEq,Eq)]
pub struct ParseError {
    pub pos: usize
}

impl ParseError {
    /// Zero-based column into the text that was parsed.
    pub fn column(&self, text: &str) -> usize {
        text.len().saturating_sub(self.pos)
    }
}

impl<'a> nom::error::ParseError<&'a str> for ParseError {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        ParseError { pos: input.len() }
    }
    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

const KEYWORDS: [&str; 3] = ["Int", "Mem", "Move"];

fn eof(input: &str) -> IResult<&str, (), ParseError> {
    if input.is_empty() {
        Ok((input,()))
    } else {
        Err(nom::Err::Error(ParseError {pos: input.len() }))
    }
}

/// Zero or more whitespace
fn ws0(input: &str) -> IResult<&str, (), ParseError> {
    value((),take_while(|c|c==' ' || c=='\t' || c=='\r' || c=='\n'))(input)
}
/// Consume whitespace after a word
fn ws1(input: &str) -> IResult<&str, (), ParseError> {
    preceded(word_gap, ws0)(input)
}

fn symbol(sym:&'static str) -> impl Fn(&str) -> IResult<&str, (), ParseError> {
    move|input| {
        preceded(tag(sym), ws0)(input)
    }
}

fn keyword(kw:&'static str) -> impl Fn(&str) -> IResult<&str, (), ParseError> {
    move|input| {
        preceded(tag(kw), ws1)(input)
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn not_word_char(input: &str) -> IResult<&str, char, ParseError> {
    verify(anychar, |c|!is_word_char(*c))(input)
}
fn word_gap(input: &str) -> IResult<&str, (), ParseError> {
    alt((eof, value((), peek(not_word_char))))(input)
}

fn word(input: &str) -> IResult<&str, &str, ParseError> {
    terminated(take_while1(is_word_char),ws1)(input)
}

/// Stands for "whatever kind is here", like a type parameter. Uppercase, and not a node kind.
fn var_name(input: &str) -> IResult<&str, &str, ParseError> {
    verify(word, |w: &str| w.starts_with(|c: char| c.is_ascii_uppercase()) && !KEYWORDS.contains(&w))(input)
}

/////////////
//
// Patterns
//
/////////////

fn any_pattern(input: &str) -> IResult<&str, Pattern, ParseError> {
    value(Pattern::Any, keyword("_"))(input)
}

fn int_pattern(input: &str) -> IResult<&str, Pattern, ParseError> {
    value(Pattern::Int, keyword("Int"))(input)
}

/// `Mem` on its own means `Mem(_)`
fn mem_pattern(input: &str) -> IResult<&str, Pattern, ParseError> {
    let (input,_) = keyword("Mem")(input)?;
    let (input,exp) = opt(delimited(symbol("("), cut(pattern), cut(symbol(")"))))(input)?;
    Ok((input,Pattern::mem(exp.unwrap_or(Pattern::Any))))
}

/// Move(T,T) asks for both sides to have the same shape. Two different names constrain nothing.
fn move_vars(input: &str) -> IResult<&str, Pattern, ParseError> {
    let (input,a) = var_name(input)?;
    let (input,_) = symbol(",")(input)?;
    let (input,b) = var_name(input)?;
    if a == b {
        Ok((input,Pattern::MoveAlike))
    } else {
        Ok((input,Pattern::mov(Pattern::Any, Pattern::Any)))
    }
}

fn move_args(input: &str) -> IResult<&str, Pattern, ParseError> {
    let (input,dst) = pattern(input)?;
    let (input,_) = symbol(",")(input)?;
    let (input,src) = cut(pattern)(input)?;
    Ok((input,Pattern::mov(dst, src)))
}

/// `Move` on its own means `Move(_,_)`
fn move_pattern(input: &str) -> IResult<&str, Pattern, ParseError> {
    let (input,_) = keyword("Move")(input)?;
    let (input,p) = opt(delimited(symbol("("), cut(alt((move_vars, move_args))), cut(symbol(")"))))(input)?;
    Ok((input,p.unwrap_or_else(|| Pattern::mov(Pattern::Any, Pattern::Any))))
}

fn pattern(input: &str) -> IResult<&str, Pattern, ParseError> {
    alt((
        any_pattern,
        int_pattern,
        mem_pattern,
        move_pattern,
    ))(input)
}

fn label(input: &str) -> IResult<&str, &str, ParseError> {
    Ok(("", input.trim_end()))
}

fn rule(input: &str) -> IResult<&str, (Pattern,String), ParseError> {
    let (input,_) = ws0(input)?;
    let (input,p) = pattern(input)?;
    let (input,_) = symbol("=")(input)?;
    let (input,l) = label(input)?;
    Ok((input,(p,l.to_string())))
}

fn finish<T>(result: IResult<&str, T, ParseError>) -> Result<T, ParseError> {
    match result {
        Ok((_,x)) => Ok(x),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e),
        Err(nom::Err::Incomplete(_)) => Err(ParseError{pos:0})
    }
}

pub fn parse_pattern(input: &str) -> Result<Pattern, ParseError> {
    finish(all_consuming(preceded(ws0, pattern))(input))
}

/// Parses `PATTERN=LABEL`. The label is everything after the `=`, minus surrounding whitespace.
pub fn parse_rule(input: &str) -> Result<(Pattern,String), ParseError> {
    finish(rule(input))
}
