//! Whitespace-delimited numeric token parsers, in the idiom of
//! `cessen-psychopath::parse::basics` (`ws_f32`/`ws_u32`/`ws_i32`), lifted
//! to `f64`/`u64`/`i64` since the DFN domain needs double precision and
//! 64-bit counts.

use std::str::{self, FromStr};

use nom::{
    character::complete::{digit1, multispace0, one_of},
    combinator::{map_res, opt, recognize},
    number::complete::double,
    sequence::{delimited, tuple},
    IResult,
};

pub fn ws_f64(input: &str) -> IResult<&str, f64, ()> {
    delimited(multispace0, double, multispace0)(input)
}

pub fn ws_u64(input: &str) -> IResult<&str, u64, ()> {
    map_res(delimited(multispace0, digit1, multispace0), u64::from_str)(input)
}

pub fn ws_usize(input: &str) -> IResult<&str, usize, ()> {
    map_res(delimited(multispace0, digit1, multispace0), usize::from_str)(input)
}

pub fn ws_i64(input: &str) -> IResult<&str, i64, ()> {
    map_res(
        delimited(
            multispace0,
            recognize(tuple((opt(one_of("-")), digit1))),
            multispace0,
        ),
        i64::from_str,
    )(input)
}

pub fn ws_bool(input: &str) -> IResult<&str, bool, ()> {
    let (rest, v) = ws_u64(input)?;
    Ok((rest, v != 0))
}

/// Parses every whitespace-delimited `f64` token out of a rest-of-line
/// string; used for fixed-arity arrays like `domainSize` or `famProb`.
pub fn parse_f64_list(input: &str) -> Vec<f64> {
    let mut rest = input;
    let mut out = Vec::new();
    while let Ok((r, v)) = ws_f64(rest) {
        if r == rest {
            break;
        }
        out.push(v);
        rest = r;
    }
    out
}

pub fn parse_bool_list(input: &str) -> Vec<bool> {
    let mut rest = input;
    let mut out = Vec::new();
    while let Ok((r, v)) = ws_bool(rest) {
        if r == rest {
            break;
        }
        out.push(v);
        rest = r;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_f64_basic() {
        assert_eq!(ws_f64("  3.5  "), Ok(("", 3.5)));
        assert_eq!(ws_f64("-2.0 1.0"), Ok(("1.0", -2.0)));
    }

    #[test]
    fn ws_u64_basic() {
        assert_eq!(ws_u64("   42"), Ok(("", 42)));
    }

    #[test]
    fn ws_i64_negative() {
        assert_eq!(ws_i64("  -7  "), Ok(("", -7)));
    }

    #[test]
    fn parse_f64_list_reads_all_tokens() {
        assert_eq!(parse_f64_list(" 1.0 2.5 -3.25 "), vec![1.0, 2.5, -3.25]);
    }

    #[test]
    fn parse_bool_list_reads_flags() {
        assert_eq!(parse_bool_list("1 0 1 0 0 1"), vec![true, false, true, false, false, true]);
    }
}
