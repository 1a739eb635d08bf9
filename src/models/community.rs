use crate::error::{parse_integer, FilterError};
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// BGP community as an ordered tuple of integers.
///
/// A standard community ([RFC1997](https://datatracker.ietf.org/doc/html/rfc1997)) has two
/// elements, a large community ([RFC8092](https://datatracker.ietf.org/doc/html/rfc8092)) has
/// three. Both kinds share this type; the facet a community is filed under decides how it is
/// matched.
///
/// ## Display
///
/// Communities are displayed colon joined, e.g. `65000:100` or `65000:1:2`.
///
/// ```
/// use lg_search::models::Community;
///
/// let community: Community = "65000:100".parse().unwrap();
/// assert_eq!(community, Community::standard(65000, 100));
/// assert_eq!(community.to_string(), "65000:100");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Community(SmallVec<[u32; 3]>);

impl Community {
    pub fn new<I: IntoIterator<Item = u32>>(values: I) -> Community {
        Community(values.into_iter().collect())
    }

    pub fn standard(asn: u32, value: u32) -> Community {
        Community::from([asn, value])
    }

    pub fn large(global_admin: u32, local_data_1: u32, local_data_2: u32) -> Community {
        Community::from([global_admin, local_data_1, local_data_2])
    }

    pub fn as_slice(&self) -> &[u32] {
        self.0.as_slice()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_standard(&self) -> bool {
        self.0.len() == 2
    }

    pub fn is_large(&self) -> bool {
        self.0.len() == 3
    }
}

impl<const N: usize> From<[u32; N]> for Community {
    fn from(values: [u32; N]) -> Self {
        Community(SmallVec::from_slice(&values))
    }
}

impl Display for Community {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(":"))
    }
}

impl FromStr for Community {
    type Err = FilterError;

    /// Parses two (standard) or three (large) colon separated integers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = s.split(':').collect::<Vec<&str>>();
        match tokens.len() {
            0 | 1 => Err(FilterError::IncompleteCommunity(s.to_string())),
            2 | 3 => {
                let values = tokens
                    .iter()
                    .map(|t| parse_integer::<u32>(t.trim()))
                    .collect::<Result<SmallVec<[u32; 3]>, FilterError>>()?;
                Ok(Community(values))
            }
            _ => Err(FilterError::InvalidCommunity(s.to_string())),
        }
    }
}

/// Extended community in its looking-glass rendering: a type tag and two integers.
///
/// Route servers report extended communities as triples like `(rt, 65000, 100)` or
/// `(ro, 42, 23)`; the tag is kept verbatim.
///
/// ## Display
///
/// `kind:value1:value2`, e.g. `rt:65000:100`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtCommunity {
    pub kind: String,
    pub value1: u32,
    pub value2: u32,
}

impl ExtCommunity {
    pub fn new(kind: impl Into<String>, value1: u32, value2: u32) -> ExtCommunity {
        ExtCommunity {
            kind: kind.into(),
            value1,
            value2,
        }
    }
}

impl Display for ExtCommunity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.kind, self.value1, self.value2)
    }
}

impl FromStr for ExtCommunity {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = s.split(':').map(str::trim).collect::<Vec<&str>>();
        match tokens.as_slice() {
            [] | [_] => Err(FilterError::IncompleteCommunity(s.to_string())),
            [kind, value1, value2] if !kind.is_empty() => Ok(ExtCommunity {
                kind: kind.to_string(),
                value1: parse_integer(value1)?,
                value2: parse_integer(value2)?,
            }),
            _ => Err(FilterError::InvalidCommunity(s.to_string())),
        }
    }
}
