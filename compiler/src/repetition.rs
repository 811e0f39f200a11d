//! Parses the `{m}`, `{m,}` and `{m,n}` bounds of a repetition.
use parcel::parsers::character::{digit, expect_character};
use parcel::prelude::v1::*;

use crate::CompileError;

/// The validated bounds of a repetition. An absent `max` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Bounds {
    pub(crate) min: usize,
    pub(crate) max: Option<usize>,
}

/// Bounds as written, before their values are interpreted.
#[derive(Debug, PartialEq)]
struct RawBounds {
    min: Option<String>,
    /// `None` without a comma, `Some(None)` for a comma without an upper
    /// bound.
    max: Option<Option<String>>,
}

/// Parses a repetition starting with its opening `{`, returning the bounds
/// and the number of characters consumed.
pub(crate) fn parse(
    input: &[(usize, char)],
    offset: usize,
) -> Result<(Bounds, usize), CompileError> {
    let malformed = CompileError::MalformedRepetition { offset };
    let (raw, remainder) = match raw_bounds().parse(input) {
        Ok(MatchStatus::Match {
            remainder, inner, ..
        }) => (inner, remainder),
        Ok(MatchStatus::NoMatch(_)) | Err(_) => return Err(malformed),
    };
    let consumed = input.len() - remainder.len();

    let bounds = match raw {
        RawBounds {
            min: Some(min),
            max: None,
        } => {
            let min = bound(&min, offset)?;
            Bounds {
                min,
                max: Some(min),
            }
        }
        RawBounds {
            min: Some(min),
            max: Some(None),
        } => Bounds {
            min: bound(&min, offset)?,
            max: None,
        },
        RawBounds {
            min: Some(min),
            max: Some(Some(max)),
        } => {
            let (min, max) = (bound(&min, offset)?, bound(&max, offset)?);
            if min > max {
                return Err(malformed);
            }

            Bounds {
                min,
                max: Some(max),
            }
        }
        // `{,n}`, `{,}` and `{}` all lack a lower bound.
        RawBounds { min: None, .. } => return Err(malformed),
    };

    Ok((bounds, consumed))
}

fn bound(digits: &str, offset: usize) -> Result<usize, CompileError> {
    let value = digits
        .parse::<isize>()
        .map_err(|_| CompileError::MalformedRepetition { offset })?;

    usize::try_from(value).map_err(|_| CompileError::NegativeRepetition { offset })
}

fn raw_bounds<'a>() -> impl Parser<'a, &'a [(usize, char)], RawBounds> {
    parcel::left(parcel::join(
        parcel::right(parcel::join(
            expect_character('{'),
            parcel::join(
                parcel::optional(signed_digits()),
                parcel::optional(parcel::right(parcel::join(
                    expect_character(','),
                    parcel::optional(signed_digits()),
                ))),
            ),
        )),
        expect_character('}'),
    ))
    .map(|(min, max)| RawBounds { min, max })
}

fn signed_digits<'a>() -> impl Parser<'a, &'a [(usize, char)], String> {
    parcel::join(
        expect_character('-').optional(),
        parcel::one_or_more(digit(10)),
    )
    .map(|(negative, digits)| negative.into_iter().chain(digits).collect::<String>())
}
