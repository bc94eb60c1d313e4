//! # Parser Combinators
//!
//! This module implements the parser combinators the expression grammar is
//! built from. Each combinator is a small struct implementing [`Parser`];
//! [`super::prelude`] has a constructor function for each one.
//!
//! ## Combinator Types
//!
//! * **Basic Combinators**: `Equal`, `Satisfy`
//! * **Sequential Combinators**: `Tuple2`, `Tuple3`, `Preceded`, `Delimited`
//! * **Alternative Combinators**: `Choice`
//! * **Repetition Combinators**: `Many`, `Optional`
//! * **Transformation Combinators**: `Map`, `TryMap`, `AsUnit`, `WithPosition`
//! * **Error Handling Combinators**: `WithContext`, `Cut`
//! * **Recursion**: `Lazy`
//!
//! ## Committed errors
//!
//! `Choice`, `Many` and `Optional` normally recover from a failing inner
//! parser. A committed error (see [`ParseError::is_committed`]) is passed
//! through instead, so a half-parsed construct is reported where it broke.

use std::fmt;
use std::marker::PhantomData;

use super::core::{ParseError, ParseResult, Parser};
use super::error::SyntaxError;

/// Equal: Matches a specific value in the input
///
/// This parser succeeds if the current input token equals the specified value.
/// It consumes one token from the input on success.
#[derive(Clone)]
pub struct Equal<I> {
    value: I,
}

impl<I> Equal<I> {
    pub fn new(value: I) -> Self {
        Self { value }
    }
}

impl<I: Clone + PartialEq + fmt::Display> Parser<I, I> for Equal<I> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<I> {
        match input.get(pos) {
            Some(found) if *found == self.value => Ok((pos + 1, found.clone())),
            Some(found) => Err(ParseError::Unexpected {
                expected: self.value.to_string(),
                parsed: found.to_string(),
                position: pos,
                context: None,
            }),
            None => Err(ParseError::UnexpectedEOF {
                message: self.value.to_string(),
                position: pos,
                context: None,
            }),
        }
    }
}

/// Satisfy: Consumes one token if `f` maps it to a value
///
/// `label` names what the parser looks for in error messages.
#[derive(Clone)]
pub struct Satisfy<I, O, F> {
    label: &'static str,
    f: F,
    _phantom: PhantomData<(I, O)>,
}

impl<I, O, F> Satisfy<I, O, F> {
    pub fn new(label: &'static str, f: F) -> Self {
        Self {
            label,
            f,
            _phantom: PhantomData,
        }
    }
}

impl<I, O, F> Parser<I, O> for Satisfy<I, O, F>
where
    I: fmt::Display,
    F: Fn(&I) -> Option<O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        match input.get(pos) {
            Some(token) => match (self.f)(token) {
                Some(result) => Ok((pos + 1, result)),
                None => Err(ParseError::Unexpected {
                    expected: self.label.to_string(),
                    parsed: token.to_string(),
                    position: pos,
                    context: None,
                }),
            },
            None => Err(ParseError::UnexpectedEOF {
                message: self.label.to_string(),
                position: pos,
                context: None,
            }),
        }
    }
}

/// Choice: Tries multiple parsers and succeeds with the first successful one
///
/// This parser tries each of its child parsers in order and returns the result of
/// the first one that succeeds. A committed error from any child ends the
/// search immediately. If every child fails normally, the error that got
/// furthest into the input is returned, or `NoAlternative` if none got past
/// the starting position.
pub struct Choice<I, O> {
    parsers: Vec<Box<dyn Parser<I, O>>>,
}

impl<I, O> Choice<I, O> {
    pub fn new(parsers: Vec<Box<dyn Parser<I, O>>>) -> Self {
        Self { parsers }
    }
}

impl<I, O> Parser<I, O> for Choice<I, O> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        let mut furthest: Option<ParseError> = None;
        for parser in &self.parsers {
            match parser.parse(input, pos) {
                Ok(result) => return Ok(result),
                Err(e) if e.is_committed() => return Err(e),
                Err(e) => {
                    if e.get_position() > furthest.as_ref().map_or(pos, ParseError::get_position) {
                        furthest = Some(e);
                    }
                }
            }
        }
        Err(furthest.unwrap_or(ParseError::NoAlternative {
            position: pos,
            context: None,
        }))
    }
}

#[derive(Clone)]
pub struct Preceded<P1, P2, O1> {
    parser1: P1,
    parser2: P2,
    _phantom: PhantomData<O1>,
}

impl<P1, P2, O1> Preceded<P1, P2, O1> {
    pub fn new(parser1: P1, parser2: P2) -> Self {
        Self {
            parser1,
            parser2,
            _phantom: PhantomData,
        }
    }
}

impl<I, O1, O2, P1, P2> Parser<I, O2> for Preceded<P1, P2, O1>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O2> {
        let (pos, _) = self.parser1.parse(input, pos)?;
        self.parser2.parse(input, pos)
    }
}

/// Map: Transforms the output of a parser using a function
#[derive(Clone)]
pub struct Map<P, F, A, B> {
    parser: P,
    f: F,
    _phantom: PhantomData<(A, B)>,
}

impl<P, F, A, B> Map<P, F, A, B> {
    pub fn new(parser: P, f: F) -> Self {
        Self {
            parser,
            f,
            _phantom: PhantomData,
        }
    }
}

impl<I, A, B, P, F> Parser<I, B> for Map<P, F, A, B>
where
    P: Parser<I, A>,
    F: Fn(A) -> B,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<B> {
        self.parser
            .parse(input, pos)
            .map(|(pos, value)| (pos, (self.f)(value)))
    }
}

/// TryMap: Like `Map`, but the function may reject the parsed value
///
/// A rejection becomes a committed `Validation` error: the input was
/// syntactically fine, so no other alternative should be tried.
#[derive(Clone)]
pub struct TryMap<P, F, A, B> {
    parser: P,
    f: F,
    _phantom: PhantomData<(A, B)>,
}

impl<P, F, A, B> TryMap<P, F, A, B> {
    pub fn new(parser: P, f: F) -> Self {
        Self {
            parser,
            f,
            _phantom: PhantomData,
        }
    }
}

impl<I, A, B, P, F> Parser<I, B> for TryMap<P, F, A, B>
where
    P: Parser<I, A>,
    F: Fn(A) -> Result<B, SyntaxError>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<B> {
        let (new_pos, value) = self.parser.parse(input, pos)?;
        match (self.f)(value) {
            Ok(mapped) => Ok((new_pos, mapped)),
            Err(error) => Err(ParseError::Validation {
                position: error.position().unwrap_or(pos),
                error,
            }),
        }
    }
}

#[derive(Clone)]
pub struct AsUnit<P, O> {
    parser: P,
    _phantom: PhantomData<O>,
}

impl<P, O> AsUnit<P, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<I, P, O> Parser<I, ()> for AsUnit<P, O>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<()> {
        self.parser.parse(input, pos).map(|(pos, _)| (pos, ()))
    }
}

/// WithPosition: Pairs the parsed value with the position it started at
#[derive(Clone)]
pub struct WithPosition<P> {
    parser: P,
}

impl<P> WithPosition<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<I, O, P> Parser<I, (usize, O)> for WithPosition<P>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<(usize, O)> {
        self.parser
            .parse(input, pos)
            .map(|(new_pos, value)| (new_pos, (pos, value)))
    }
}

/// Many: Applies a parser zero or more times
///
/// This parser repeatedly applies the inner parser until it fails,
/// collecting all successful results into a vector. A normal failure of the
/// inner parser ends the repetition; a committed one is returned.
#[derive(Clone)]
pub struct Many<P, I, O> {
    parser: P,
    _phantom: PhantomData<(I, O)>,
}

impl<P, I, O> Many<P, I, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<P, I, O> Parser<I, Vec<O>> for Many<P, I, O>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], mut pos: usize) -> ParseResult<Vec<O>> {
        let mut results = Vec::new();
        loop {
            match self.parser.parse(input, pos) {
                Ok((next_pos, value)) => {
                    if next_pos == pos {
                        // no progress; stop rather than loop forever
                        break;
                    }
                    results.push(value);
                    pos = next_pos;
                }
                Err(e) if e.is_committed() => return Err(e),
                Err(_) => break,
            }
        }
        Ok((pos, results))
    }
}

#[derive(Clone)]
pub struct Optional<P, I, O> {
    parser: P,
    _phantom: PhantomData<(I, O)>,
}

impl<P, I, O> Optional<P, I, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<P, I, O> Parser<I, Option<O>> for Optional<P, I, O>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<Option<O>> {
        match self.parser.parse(input, pos) {
            Ok((next_pos, value)) => Ok((next_pos, Some(value))),
            Err(e) if e.is_committed() => Err(e),
            Err(_) => Ok((pos, None)),
        }
    }
}

#[derive(Clone)]
pub struct Delimited<L, P, R> {
    left: L,
    parser: P,
    right: R,
}

impl<L, P, R> Delimited<L, P, R> {
    pub fn new(left: L, parser: P, right: R) -> Self {
        Self {
            left,
            parser,
            right,
        }
    }
}

impl<I, O, L, P, R> Parser<I, O> for Delimited<L, P, R>
where
    L: Parser<I, ()>,
    P: Parser<I, O>,
    R: Parser<I, ()>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        let (pos, _) = self.left.parse(input, pos)?;
        let (pos, value) = self.parser.parse(input, pos)?;
        let (pos, _) = self.right.parse(input, pos)?;
        Ok((pos, value))
    }
}

#[derive(Clone)]
pub struct Tuple2<P1, P2> {
    parser1: P1,
    parser2: P2,
}

impl<P1, P2> Tuple2<P1, P2> {
    pub fn new(parser1: P1, parser2: P2) -> Self {
        Self { parser1, parser2 }
    }
}

impl<I, O1, O2, P1, P2> Parser<I, (O1, O2)> for Tuple2<P1, P2>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<(O1, O2)> {
        let (pos, v1) = self.parser1.parse(input, pos)?;
        let (pos, v2) = self.parser2.parse(input, pos)?;
        Ok((pos, (v1, v2)))
    }
}

#[derive(Clone)]
pub struct Tuple3<P1, P2, P3> {
    parser1: P1,
    parser2: P2,
    parser3: P3,
}

impl<P1, P2, P3> Tuple3<P1, P2, P3> {
    pub fn new(parser1: P1, parser2: P2, parser3: P3) -> Self {
        Self {
            parser1,
            parser2,
            parser3,
        }
    }
}

impl<I, O1, O2, O3, P1, P2, P3> Parser<I, (O1, O2, O3)> for Tuple3<P1, P2, P3>
where
    P1: Parser<I, O1>,
    P2: Parser<I, O2>,
    P3: Parser<I, O3>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<(O1, O2, O3)> {
        let (pos, v1) = self.parser1.parse(input, pos)?;
        let (pos, v2) = self.parser2.parse(input, pos)?;
        let (pos, v3) = self.parser3.parse(input, pos)?;
        Ok((pos, (v1, v2, v3)))
    }
}

/// WithContext: Labels errors from the inner parser
#[derive(Clone)]
pub struct WithContext<P, C> {
    parser: P,
    context: C,
}

impl<P, C> WithContext<P, C> {
    pub fn new(parser: P, context: C) -> Self {
        Self { parser, context }
    }
}

impl<I, O, P, C: AsRef<str>> Parser<I, O> for WithContext<P, C>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        self.parser
            .parse(input, pos)
            .map_err(|e| e.with_context(self.context.as_ref()))
    }
}

/// Cut: Makes any failure of the inner parser committed
#[derive(Clone)]
pub struct Cut<P> {
    parser: P,
}

impl<P> Cut<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<I, O, P> Parser<I, O> for Cut<P>
where
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        self.parser.parse(input, pos).map_err(ParseError::commit)
    }
}

/// Lazy: Builds the inner parser on each use, for recursive grammars
#[derive(Clone)]
pub struct Lazy<F> {
    f: F,
}

impl<F> Lazy<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<I, O, F, P> Parser<I, O> for Lazy<F>
where
    F: Fn() -> P,
    P: Parser<I, O>,
{
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O> {
        (self.f)().parse(input, pos)
    }
}
