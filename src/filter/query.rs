//! Builders translating request input into [FilterSet]s.
use crate::error::{parse_integer, FilterError};
use crate::filter::{FacetKey, Filter, FilterSet, FilterValue};
use crate::models::{AddrFamily, Community, ExtCommunity};
use log::debug;
use std::str::FromStr;
use std::sync::Arc;
use url::form_urlencoded;

/// Marks a token as a community predicate in a token list.
const FACET_MARKER: char = '#';

impl FilterSet {
    /// Builds a filter set from query parameters.
    ///
    /// For example a query of
    ///
    /// ```text
    /// asns=2342,23123&communities=23:42&large_communities=23:42:42
    /// ```
    ///
    /// yields two filters in the ASN group, one in the community group and one in the large
    /// community group. Keys other than the six facet keys are ignored; for a repeated key only
    /// the first occurrence is used. Any malformed value fails the whole call.
    pub fn from_query<I, K, V>(params: I) -> Result<FilterSet, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filters = FilterSet::new();
        let mut seen = [false; 6];
        for (key, value) in params {
            let key = match FacetKey::from_str(key.as_ref()) {
                Ok(key) => key,
                Err(e) => {
                    debug!("ignoring query parameter: {}", e);
                    continue;
                }
            };
            if std::mem::replace(&mut seen[key.position()], true) {
                continue;
            }
            let parse: fn(&str) -> Result<FilterValue, FilterError> = match key {
                FacetKey::Sources => parse_source_value,
                FacetKey::Asns => parse_asn_value,
                FacetKey::Communities | FacetKey::LargeCommunities => parse_community_value,
                FacetKey::ExtCommunities => parse_ext_community_value,
                FacetKey::AddrFamily => parse_addr_family_value,
            };
            let values = parse_query_value_list(value.as_ref(), parse)?;
            filters.group_mut(key).add_filters(values);
        }
        Ok(filters)
    }

    /// Decodes an URL query string (without the leading `?`) and builds a filter set from it.
    pub fn from_query_str(query: &str) -> Result<FilterSet, FilterError> {
        FilterSet::from_query(form_urlencoded::parse(query.as_bytes()))
    }

    /// Builds a filter set from a token list, e.g. the words of a search box.
    ///
    /// Only tokens starting with `#` are predicates; the text after the marker is classified by
    /// [parse_community_filter_text]. All other tokens are ignored here.
    pub fn from_tokens<I, S>(tokens: I) -> Result<FilterSet, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filters = FilterSet::new();
        for token in tokens {
            if let Some(text) = token.as_ref().strip_prefix(FACET_MARKER) {
                let (key, filter) = parse_community_filter_text(text)?;
                filters.group_mut(key).add_filter(filter);
            }
        }
        Ok(filters)
    }
}

/// Parses community text into a filter and the facet it belongs to.
///
/// - fewer than two colon separated segments is an error
/// - a first segment that is not an integer makes an extended community (`RPKI:1:2`)
/// - otherwise two segments make a standard and three a large community
pub fn parse_community_filter_text(text: &str) -> Result<(FacetKey, Filter), FilterError> {
    let tokens = text.split(':').collect::<Vec<&str>>();
    if tokens.len() < 2 {
        return Err(FilterError::IncompleteCommunity(text.to_string()));
    }

    if tokens[0].trim().parse::<i64>().is_err() {
        let filter = Filter::new(ExtCommunity::from_str(text)?);
        return Ok((FacetKey::ExtCommunities, filter));
    }

    let filter = Filter::new(Community::from_str(text)?);
    match tokens.len() {
        2 => Ok((FacetKey::Communities, filter)),
        _ => Ok((FacetKey::LargeCommunities, filter)),
    }
}

/// Splits a comma separated value list and parses every non-empty item.
fn parse_query_value_list(
    value: &str,
    parse: fn(&str) -> Result<FilterValue, FilterError>,
) -> Result<Vec<Filter>, FilterError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| parse(v).map(Filter::new))
        .collect()
}

fn parse_source_value(value: &str) -> Result<FilterValue, FilterError> {
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(FilterError::InvalidSourceId(value.to_string()));
    }
    Ok(FilterValue::SourceId(Arc::from(value)))
}

fn parse_asn_value(value: &str) -> Result<FilterValue, FilterError> {
    Ok(FilterValue::Asn(parse_integer(value)?))
}

fn parse_addr_family_value(value: &str) -> Result<FilterValue, FilterError> {
    let af = parse_integer::<u8>(value)?;
    AddrFamily::try_from(af)
        .map(FilterValue::AddrFamily)
        .map_err(|_| FilterError::UnknownAddrFamily(af))
}

fn parse_community_value(value: &str) -> Result<FilterValue, FilterError> {
    Ok(FilterValue::Community(Community::from_str(value)?))
}

fn parse_ext_community_value(value: &str) -> Result<FilterValue, FilterError> {
    Ok(FilterValue::ExtCommunity(ExtCommunity::from_str(value)?))
}
