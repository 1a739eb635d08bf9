use crate::error::{parse_integer, FilterError};
use crate::models::{BgpInfo, Community, ExtCommunity};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Structural kind of a community: two elements, three elements or a tagged triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CommunityKind {
    Standard,
    Large,
    Extended,
}

/// Inclusive set of allowed integers for one community element.
///
/// Written as `n` (single value), `low-high`, or `*` (any value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntRange {
    pub low: u32,
    pub high: u32,
}

impl IntRange {
    pub const ANY: IntRange = IntRange {
        low: u32::MIN,
        high: u32::MAX,
    };

    pub const fn new(low: u32, high: u32) -> IntRange {
        IntRange { low, high }
    }

    pub const fn single(value: u32) -> IntRange {
        IntRange {
            low: value,
            high: value,
        }
    }

    pub const fn contains(&self, value: u32) -> bool {
        self.low <= value && value <= self.high
    }
}

impl Display for IntRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if *self == IntRange::ANY {
            write!(f, "*")
        } else if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}-{}", self.low, self.high)
        }
    }
}

impl FromStr for IntRange {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "*" {
            return Ok(IntRange::ANY);
        }
        let range = match s.split_once('-') {
            Some((low, high)) => {
                IntRange::new(parse_integer(low.trim())?, parse_integer(high.trim())?)
            }
            None => IntRange::single(parse_integer(s)?),
        };
        if range.low > range.high {
            return Err(FilterError::InvalidCommunity(s.to_string()));
        }
        Ok(range)
    }
}

/// A community pattern where every element is an [IntRange].
///
/// Used in configuration to describe families of communities, e.g. `65535:666` for the
/// blackhole community or `64512-65534:0-65535` for all private standard communities.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommunityRange {
    Standard([IntRange; 2]),
    Large([IntRange; 3]),
    Extended {
        kind: String,
        value1: IntRange,
        value2: IntRange,
    },
}

impl CommunityRange {
    pub fn kind(&self) -> CommunityKind {
        match self {
            CommunityRange::Standard(_) => CommunityKind::Standard,
            CommunityRange::Large(_) => CommunityKind::Large,
            CommunityRange::Extended { .. } => CommunityKind::Extended,
        }
    }

    /// Checks a standard or large community against this range. The element count must agree.
    pub fn contains_community(&self, community: &Community) -> bool {
        let ranges: &[IntRange] = match self {
            CommunityRange::Standard(r) => r,
            CommunityRange::Large(r) => r,
            CommunityRange::Extended { .. } => return false,
        };
        ranges.len() == community.len()
            && ranges
                .iter()
                .zip(community.as_slice())
                .all(|(range, v)| range.contains(*v))
    }

    pub fn contains_ext_community(&self, community: &ExtCommunity) -> bool {
        match self {
            CommunityRange::Extended {
                kind,
                value1,
                value2,
            } => {
                kind == &community.kind
                    && value1.contains(community.value1)
                    && value2.contains(community.value2)
            }
            _ => false,
        }
    }
}

impl Display for CommunityRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CommunityRange::Standard([a, b]) => write!(f, "{}:{}", a, b),
            CommunityRange::Large([a, b, c]) => write!(f, "{}:{}:{}", a, b, c),
            CommunityRange::Extended {
                kind,
                value1,
                value2,
            } => write!(f, "{}:{}:{}", kind, value1, value2),
        }
    }
}

impl FromStr for CommunityRange {
    type Err = FilterError;

    /// Classification follows the looking-glass convention: if the first token (before any
    /// hyphen) is not an integer the line is an extended community and needs exactly three
    /// tokens; otherwise two tokens make a standard and three a large community.
    ///
    /// The convention also applies to a leading `*`, so `*:666` is rejected as a malformed
    /// extended community.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FilterError::InvalidCommunity(s.to_string());
        let tokens = s.split(':').map(str::trim).collect::<Vec<&str>>();
        if tokens.len() < 2 {
            return Err(invalid());
        }

        let first = tokens[0].split('-').next().unwrap_or_default();
        let is_ext = first.parse::<i64>().is_err();

        if is_ext {
            return match tokens.as_slice() {
                [kind, value1, value2] if !kind.is_empty() => Ok(CommunityRange::Extended {
                    kind: kind.to_string(),
                    value1: value1.parse().map_err(|_| invalid())?,
                    value2: value2.parse().map_err(|_| invalid())?,
                }),
                _ => Err(invalid()),
            };
        }

        let ranges = tokens
            .iter()
            .map(|t| t.parse::<IntRange>().map_err(|_| invalid()))
            .collect::<Result<Vec<IntRange>, FilterError>>()?;
        match ranges.as_slice() {
            [a, b] => Ok(CommunityRange::Standard([*a, *b])),
            [a, b, c] => Ok(CommunityRange::Large([*a, *b, *c])),
            _ => Err(invalid()),
        }
    }
}

/// Community ranges partitioned by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BgpCommunitiesSet {
    pub standard: Vec<CommunityRange>,
    pub large: Vec<CommunityRange>,
    pub extended: Vec<CommunityRange>,
}

impl BgpCommunitiesSet {
    /// Files a range under the collection matching its kind.
    pub fn push(&mut self, range: CommunityRange) {
        match range.kind() {
            CommunityKind::Standard => self.standard.push(range),
            CommunityKind::Large => self.large.push(range),
            CommunityKind::Extended => self.extended.push(range),
        }
    }

    pub fn len(&self) -> usize {
        self.standard.len() + self.large.len() + self.extended.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks a standard or large community, picking the collection by element count.
    pub fn contains_community(&self, community: &Community) -> bool {
        let ranges = match community.len() {
            2 => &self.standard,
            3 => &self.large,
            _ => return false,
        };
        ranges.iter().any(|r| r.contains_community(community))
    }

    pub fn contains_ext_community(&self, community: &ExtCommunity) -> bool {
        self.extended
            .iter()
            .any(|r| r.contains_ext_community(community))
    }

    /// True if any standard, large or extended community of `bgp` is in one of the ranges.
    pub fn matches_bgp_info(&self, bgp: &BgpInfo) -> bool {
        bgp.communities
            .iter()
            .chain(&bgp.large_communities)
            .any(|c| self.contains_community(c))
            || bgp
                .ext_communities
                .iter()
                .any(|c| self.contains_ext_community(c))
    }
}
