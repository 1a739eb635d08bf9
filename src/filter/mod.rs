/*!
## Faceted Filters

The filter module represents a set of active route predicates grouped by attribute, the
*facets*. There are six facets, always kept in the same order:

| Facet | Query key | Value | Matching within facet |
|---|---|---|---|
| source | `sources` | route server id | any |
| ASN | `asns` | neighbor ASN | any |
| community | `communities` | [Community] | all |
| extended community | `ext_communities` | [ExtCommunity] | all |
| large community | `large_communities` | [Community] | all |
| address family | `addr_family` | [AddrFamily] | any |

A [FilterSet] holds one [FilterGroup] per facet. Groups deduplicate filters by value and count
how often each value was added, which gives the per-value route counts of a faceted search.

Filter sets are built from query parameters ([FilterSet::from_query]), from `#`-prefixed tokens
([FilterSet::from_tokens]), or by observing routes ([FilterSet::add_from_lookup_route]). They are
evaluated against anything implementing [Filterable].

### Example

```
use lg_search::filter::{FacetKey, FilterSet};

let filters = FilterSet::from_query_str("asns=64512,64513&communities=65000:100").unwrap();
assert_eq!(filters.group(FacetKey::Asns).len(), 2);
assert!(filters.has_group(FacetKey::Communities));
assert!(!filters.has_group(FacetKey::Sources));
```
*/
mod group;
mod neighbor;
mod query;
mod set;

pub use group::FilterGroup;
pub use neighbor::NeighborFilter;
pub use query::parse_community_filter_text;
pub use set::FilterSet;

use crate::error::UnknownFacetKey;
use crate::models::*;
use log::warn;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

/// The six filterable attribute categories, in their fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FacetKey {
    Sources,
    Asns,
    Communities,
    ExtCommunities,
    LargeCommunities,
    AddrFamily,
}

impl FacetKey {
    /// All facets in set order. The position of a facet in this array is its group index.
    pub const ALL: [FacetKey; 6] = [
        FacetKey::Sources,
        FacetKey::Asns,
        FacetKey::Communities,
        FacetKey::ExtCommunities,
        FacetKey::LargeCommunities,
        FacetKey::AddrFamily,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            FacetKey::Sources => "sources",
            FacetKey::Asns => "asns",
            FacetKey::Communities => "communities",
            FacetKey::ExtCommunities => "ext_communities",
            FacetKey::LargeCommunities => "large_communities",
            FacetKey::AddrFamily => "addr_family",
        }
    }

    pub const fn position(&self) -> usize {
        *self as usize
    }
}

impl Display for FacetKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FacetKey {
    type Err = UnknownFacetKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FacetKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownFacetKey(s.to_string()))
    }
}

/// Predicate value of a [Filter].
///
/// Equality is defined per kind. Values of different kinds never compare equal; such a
/// comparison is a caller bug and gets logged.
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FilterValue {
    /// Route server id. Ids taken from a [RouteServer] share their allocation, so equality
    /// checks identity before content.
    SourceId(Arc<str>),
    Asn(u32),
    Community(Community),
    ExtCommunity(ExtCommunity),
    AddrFamily(AddrFamily),
}

impl FilterValue {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            FilterValue::SourceId(_) => "source id",
            FilterValue::Asn(_) => "asn",
            FilterValue::Community(_) => "community",
            FilterValue::ExtCommunity(_) => "ext community",
            FilterValue::AddrFamily(_) => "address family",
        }
    }
}

impl PartialEq for FilterValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FilterValue::SourceId(a), FilterValue::SourceId(b)) => Arc::ptr_eq(a, b) || a == b,
            (FilterValue::Asn(a), FilterValue::Asn(b)) => a == b,
            (FilterValue::Community(a), FilterValue::Community(b)) => a == b,
            (FilterValue::ExtCommunity(a), FilterValue::ExtCommunity(b)) => a == b,
            (FilterValue::AddrFamily(a), FilterValue::AddrFamily(b)) => a == b,
            _ => {
                warn!(
                    "comparing filter values of different kinds: {} ({}) and {} ({})",
                    self,
                    self.kind_name(),
                    other,
                    other.kind_name()
                );
                false
            }
        }
    }
}

/// Canonical text of the value, also used as the group index key.
impl Display for FilterValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::SourceId(v) => write!(f, "{}", v),
            FilterValue::Asn(v) => write!(f, "{}", v),
            FilterValue::Community(v) => write!(f, "{}", v),
            FilterValue::ExtCommunity(v) => write!(f, "{}", v),
            FilterValue::AddrFamily(v) => write!(f, "{}", u8::from(*v)),
        }
    }
}

impl From<Arc<str>> for FilterValue {
    fn from(value: Arc<str>) -> Self {
        FilterValue::SourceId(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::SourceId(Arc::from(value))
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        FilterValue::Asn(value)
    }
}

impl From<Community> for FilterValue {
    fn from(value: Community) -> Self {
        FilterValue::Community(value)
    }
}

impl From<ExtCommunity> for FilterValue {
    fn from(value: ExtCommunity) -> Self {
        FilterValue::ExtCommunity(value)
    }
}

impl From<AddrFamily> for FilterValue {
    fn from(value: AddrFamily) -> Self {
        FilterValue::AddrFamily(value)
    }
}

/// A predicate value with a display label and the number of routes it was observed on.
///
/// Two filters are equal when their values are equal; label and cardinality are ignored.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Filter {
    #[cfg_attr(feature = "serde", serde(rename = "name"))]
    pub label: String,
    pub value: FilterValue,
    pub cardinality: usize,
}

impl Filter {
    /// Creates an unlabelled filter, as parsed from a request.
    pub fn new(value: impl Into<FilterValue>) -> Filter {
        Filter {
            label: String::new(),
            value: value.into(),
            cardinality: 0,
        }
    }

    pub fn with_label(value: impl Into<FilterValue>, label: impl Into<String>) -> Filter {
        Filter {
            label: label.into(),
            value: value.into(),
            cardinality: 0,
        }
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// Filterable objects can be matched per facet value.
pub trait Filterable {
    fn match_source_id(&self, source_id: &str) -> bool;
    fn match_asn(&self, asn: u32) -> bool;
    fn match_community(&self, community: &Community) -> bool;
    fn match_ext_community(&self, community: &ExtCommunity) -> bool;
    fn match_large_community(&self, community: &Community) -> bool;
    fn match_addr_family(&self, family: AddrFamily) -> bool;
}

impl Filterable for LookupRoute {
    fn match_source_id(&self, source_id: &str) -> bool {
        self.route_server.id.as_ref() == source_id
    }

    fn match_asn(&self, asn: u32) -> bool {
        self.neighbor.match_asn(asn)
    }

    fn match_community(&self, community: &Community) -> bool {
        self.route.bgp.has_community(community)
    }

    fn match_ext_community(&self, community: &ExtCommunity) -> bool {
        self.route.bgp.has_ext_community(community)
    }

    fn match_large_community(&self, community: &Community) -> bool {
        self.route.bgp.has_large_community(community)
    }

    fn match_addr_family(&self, family: AddrFamily) -> bool {
        self.route.addr_family() == family
    }
}

/// A plain route carries no source or neighbor, so source and ASN predicates never match.
impl Filterable for Route {
    fn match_source_id(&self, _source_id: &str) -> bool {
        false
    }

    fn match_asn(&self, _asn: u32) -> bool {
        false
    }

    fn match_community(&self, community: &Community) -> bool {
        self.bgp.has_community(community)
    }

    fn match_ext_community(&self, community: &ExtCommunity) -> bool {
        self.bgp.has_ext_community(community)
    }

    fn match_large_community(&self, community: &Community) -> bool {
        self.bgp.has_large_community(community)
    }

    fn match_addr_family(&self, family: AddrFamily) -> bool {
        self.addr_family() == family
    }
}
