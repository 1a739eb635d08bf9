use crate::models::Neighbor;
use url::form_urlencoded;

/// Neighbor search by name (partial, case-insensitive) and ASN.
///
/// The ASN is used to find the sessions of one network on all route servers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborFilter {
    pub name: Option<String>,
    pub asn: Option<u32>,
}

impl NeighborFilter {
    /// Reads the `name` and `asn` parameters. An ASN that is not a number is ignored.
    pub fn from_query<I, K, V>(params: I) -> NeighborFilter
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = NeighborFilter::default();
        for (key, value) in params {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "name" if filter.name.is_none() && !value.is_empty() => {
                    filter.name = Some(value.to_string())
                }
                "asn" if filter.asn.is_none() => filter.asn = value.parse().ok(),
                _ => {}
            }
        }
        filter
    }

    pub fn from_query_str(query: &str) -> NeighborFilter {
        NeighborFilter::from_query(form_urlencoded::parse(query.as_bytes()))
    }

    /// True if the set name matches the description or the set ASN matches.
    ///
    /// An empty filter matches nothing, and neither does an empty name.
    pub fn matches(&self, neighbor: &Neighbor) -> bool {
        if let Some(name) = &self.name {
            if !name.is_empty() && neighbor.match_name(name) {
                return true;
            }
        }
        matches!(self.asn, Some(asn) if asn > 0 && neighbor.match_asn(asn))
    }
}
