/*!
error module defines the error types used in lg-search.
*/
use std::num::ParseIntError;
use thiserror::Error;

/// Errors raised by the strict parsers: query parameters, filter tokens and community ranges.
/// A single malformed value fails the whole parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A community or community range could not be interpreted.
    ///
    /// ## Occurs during:
    ///  - Parsing of `communities`, `large_communities` or `ext_communities` query values
    ///  - Parsing of a community range line in a configuration body
    #[error("invalid community: {0}")]
    InvalidCommunity(String),
    /// A community has fewer than two colon separated segments.
    #[error("BGP community incomplete: {0}")]
    IncompleteCommunity(String),
    #[error("cannot parse integer from {value:?}")]
    InvalidInteger {
        value: String,
        source: ParseIntError,
    },
    #[error("invalid source id: {0:?}")]
    InvalidSourceId(String),
    #[error("unknown address family {0}, expected 4 or 6")]
    UnknownAddrFamily(u8),
}

/// Returned when a facet key name is not one of the six query parameter names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown facet key {0:?}")]
pub struct UnknownFacetKey(pub String);

/// Errors raised while loading a community configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("line {line}: {source}")]
    Community { line: usize, source: FilterError },
    #[error(transparent)]
    Io(#[from] oneio::OneIoError),
}

/// Parse a decimal integer, keeping the offending text in the error.
pub(crate) fn parse_integer<T>(value: &str) -> Result<T, FilterError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    value
        .parse::<T>()
        .map_err(|source| FilterError::InvalidInteger {
            value: value.to_string(),
            source,
        })
}
