//! Parser for the rendering of [`LinComb`], e.g. `x + 2 y + ? z`.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1},
    character::complete::{char, digit1 as digit, space0, space1},
    combinator::{all_consuming, map, map_res, opt, value},
    error::{convert_error, ParseError as NomParseError, VerboseError},
    multi::separated_list1,
    sequence::{delimited, pair, terminated},
    IResult as IResultBase, Parser,
};

use crate::{Coefficient, LinComb, ParseError};

type IResult<I, O> = IResultBase<I, O, VerboseError<I>>;

/// Pad both ends with whitespace
fn space<'a, O, E: NomParseError<&'a str>, F: Parser<&'a str, O, E>>(
    f: F,
) -> impl FnMut(&'a str) -> IResultBase<&'a str, O, E> {
    delimited(space0, f, space0)
}

/// A generator name runs until whitespace or the term separator.
fn generator(i: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace() || c == '+')(i)
}

/// `None` is a coefficient that vanishes mod 3.
fn coefficient(i: &str) -> IResult<&str, Option<Coefficient>> {
    alt((
        value(Some(Coefficient::Unknown), char('?')),
        map(map_res(digit, str::parse::<i64>), Coefficient::from_int),
    ))(i)
}

fn term(i: &str) -> IResult<&str, Option<(&str, Coefficient)>> {
    map(
        pair(opt(terminated(coefficient, space1)), generator),
        |(c, name)| match c {
            None => Some((name, Coefficient::ONE)),
            Some(c) => c.map(|c| (name, c)),
        },
    )(i)
}

fn lincomb(i: &str) -> IResult<&str, LinComb> {
    alt((
        value(LinComb::zero(), all_consuming(space(tag("0")))),
        map(
            all_consuming(space(separated_list1(space(char('+')), term))),
            |terms| terms.into_iter().flatten().collect(),
        ),
    ))(i)
}

pub fn parse_lincomb(i: &str) -> Result<LinComb, ParseError> {
    lincomb(i).map(|(_, v)| v).map_err(|err| ParseError {
        input: i.to_string(),
        message: match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => convert_error(i, e),
            nom::Err::Incomplete(_) => format!("{err:#}"),
        },
    })
}
