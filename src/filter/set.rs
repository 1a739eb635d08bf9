use crate::filter::{FacetKey, Filter, FilterGroup, FilterValue, Filterable};
use crate::models::{AddrFamily, CommunityLabels, LookupRoute, Route};

/// One [FilterGroup] per facet, in [FacetKey::ALL] order.
///
/// The fixed order is what makes the positional set operations ([FilterSet::combine],
/// [FilterSet::sub], [FilterSet::merge_properties]) line up: group `i` of one set and group
/// `i` of another always belong to the same facet.
///
/// Combining and subtracting return new sets and leave their inputs untouched, so sets built
/// independently (e.g. one per route server) can be folded together without coordination.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FilterSet {
    groups: [FilterGroup; 6],
}

impl Default for FilterSet {
    fn default() -> Self {
        FilterSet::new()
    }
}

impl FilterSet {
    /// Creates a set of six empty groups.
    pub fn new() -> FilterSet {
        FilterSet {
            groups: FacetKey::ALL.map(FilterGroup::new),
        }
    }

    pub fn group(&self, key: FacetKey) -> &FilterGroup {
        &self.groups[key.position()]
    }

    pub fn group_mut(&mut self, key: FacetKey) -> &mut FilterGroup {
        &mut self.groups[key.position()]
    }

    pub fn groups(&self) -> &[FilterGroup] {
        &self.groups
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterGroup> {
        self.groups.iter()
    }

    /// True if the facet has at least one filter.
    pub fn has_group(&self, key: FacetKey) -> bool {
        !self.group(key).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(FilterGroup::is_empty)
    }

    /// Counts a route: its source, its neighbor's ASN and every community it carries.
    pub fn add_from_lookup_route(&mut self, lookup: &LookupRoute) {
        self.group_mut(FacetKey::Sources).add_filter(Filter::with_label(
            lookup.route_server.id.clone(),
            lookup.route_server.name.as_str(),
        ));
        self.group_mut(FacetKey::Asns).add_filter(Filter::with_label(
            lookup.neighbor.asn,
            lookup.neighbor.description.as_str(),
        ));
        self.add_from_route(&lookup.route);
    }

    /// Counts the communities of a route. Without route server and neighbor there is no source
    /// or ASN to count.
    pub fn add_from_route(&mut self, route: &Route) {
        let bgp = &route.bgp;
        let communities = self.group_mut(FacetKey::Communities);
        for c in &bgp.communities {
            communities.add_filter(Filter::with_label(c.clone(), c.to_string()));
        }
        let ext_communities = self.group_mut(FacetKey::ExtCommunities);
        for c in &bgp.ext_communities {
            ext_communities.add_filter(Filter::with_label(c.clone(), c.to_string()));
        }
        let large_communities = self.group_mut(FacetKey::LargeCommunities);
        for c in &bgp.large_communities {
            large_communities.add_filter(Filter::with_label(c.clone(), c.to_string()));
        }
    }

    /// Adds the enabled address families to the address family facet.
    pub fn set_addr_families(&mut self, ipv4: bool, ipv6: bool) {
        let group = self.group_mut(FacetKey::AddrFamily);
        for (enabled, af) in [(ipv4, AddrFamily::Ipv4), (ipv6, AddrFamily::Ipv6)] {
            if enabled {
                group.add_filter(Filter::with_label(af, af.label()));
            }
        }
    }

    /// Sets community labels from a label directory, leaving unknown communities as they are.
    pub fn label_communities(&mut self, labels: &CommunityLabels) {
        let label_for = |value: &FilterValue| match value {
            FilterValue::Community(c) => labels.lookup_community(c).map(str::to_string),
            FilterValue::ExtCommunity(c) => labels.lookup_ext_community(c).map(str::to_string),
            _ => None,
        };
        for key in [
            FacetKey::Communities,
            FacetKey::ExtCommunities,
            FacetKey::LargeCommunities,
        ] {
            self.group_mut(key).relabel(label_for);
        }
    }

    /// Checks a route against all facets.
    ///
    /// Source, ASN and address family accept a route matching any of their values; the
    /// community facets require all of their values. Empty facets accept every route.
    pub fn match_route<R: Filterable + ?Sized>(&self, route: &R) -> bool {
        self.group(FacetKey::Sources).match_any(route)
            && self.group(FacetKey::Asns).match_any(route)
            && self.group(FacetKey::Communities).match_all(route)
            && self.group(FacetKey::ExtCommunities).match_all(route)
            && self.group(FacetKey::LargeCommunities).match_all(route)
            && self.group(FacetKey::AddrFamily).match_any(route)
    }

    /// Per facet union by value. Where both sets hold a value, the filter of `self` is kept.
    pub fn combine(&self, other: &FilterSet) -> FilterSet {
        FilterSet {
            groups: std::array::from_fn(|i| self.groups[i].union(&other.groups[i])),
        }
    }

    /// Per facet difference by value.
    pub fn sub(&self, other: &FilterSet) -> FilterSet {
        FilterSet {
            groups: std::array::from_fn(|i| self.groups[i].difference(&other.groups[i])),
        }
    }

    /// Copies labels and cardinalities from `other` onto the value-equal filters of `self`.
    pub fn merge_properties(&mut self, other: &FilterSet) {
        for (group, other_group) in self.groups.iter_mut().zip(other.groups.iter()) {
            group.merge_properties(other_group);
        }
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a FilterGroup;
    type IntoIter = std::slice::Iter<'a, FilterGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use std::sync::Arc;

    fn lookup_route(
        rs: &RouteServer,
        asn: u32,
        network: &str,
        communities: Vec<Community>,
    ) -> LookupRoute {
        LookupRoute {
            route: Route {
                id: network.to_string(),
                network: network.parse().unwrap(),
                neighbor_id: format!("n{}", asn),
                bgp: BgpInfo {
                    communities,
                    large_communities: vec![Community::large(asn, 0, 1)],
                    ext_communities: vec![ExtCommunity::new("rt", asn, 1)],
                    ..Default::default()
                },
                primary: true,
            },
            route_server: rs.clone(),
            neighbor: Neighbor {
                id: format!("n{}", asn),
                address: "192.0.2.1".parse().unwrap(),
                asn,
                description: format!("AS{}", asn),
                route_server_id: rs.id.clone(),
            },
        }
    }

    fn route_server(id: &str) -> RouteServer {
        RouteServer {
            id: Arc::from(id),
            name: format!("Route Server {}", id),
            group: None,
        }
    }

    #[test]
    fn test_new_set_order() {
        let set = FilterSet::new();
        let keys = set.iter().map(FilterGroup::key).collect::<Vec<_>>();
        assert_eq!(keys, FacetKey::ALL.to_vec());
        assert!(set.is_empty());
    }

    #[test]
    fn test_add_from_lookup_route_counts() {
        let rs = route_server("rs1");
        let mut set = FilterSet::new();
        set.add_from_lookup_route(&lookup_route(
            &rs,
            64512,
            "10.0.0.0/8",
            vec![Community::standard(65000, 1)],
        ));
        set.add_from_lookup_route(&lookup_route(
            &rs,
            64513,
            "10.1.0.0/16",
            vec![Community::standard(65000, 1), Community::standard(65000, 2)],
        ));

        let sources = set.group(FacetKey::Sources);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources.filters()[0].cardinality, 2);
        assert_eq!(sources.filters()[0].label, "Route Server rs1");

        assert_eq!(set.group(FacetKey::Asns).len(), 2);
        assert_eq!(set.group(FacetKey::Asns).filters()[0].label, "AS64512");

        let communities = set.group(FacetKey::Communities);
        assert_eq!(communities.len(), 2);
        assert_eq!(communities.filters()[0].cardinality, 2);
        assert_eq!(communities.filters()[1].cardinality, 1);

        assert_eq!(set.group(FacetKey::LargeCommunities).len(), 2);
        assert_eq!(set.group(FacetKey::ExtCommunities).len(), 2);
        assert!(!set.has_group(FacetKey::AddrFamily));
    }

    #[test]
    fn test_match_route() {
        let rs = route_server("rs1");
        let route = lookup_route(
            &rs,
            64512,
            "2001:db8::/32",
            vec![Community::standard(65000, 1)],
        );

        let mut set = FilterSet::new();
        assert!(set.match_route(&route));

        set.group_mut(FacetKey::Asns).add_filter(Filter::new(64999u32));
        set.group_mut(FacetKey::Asns).add_filter(Filter::new(64512u32));
        assert!(set.match_route(&route));

        set.set_addr_families(true, false);
        assert!(!set.match_route(&route));
        set.set_addr_families(false, true);
        assert!(set.match_route(&route));

        set.group_mut(FacetKey::Communities)
            .add_filter(Filter::new(Community::standard(65000, 1)));
        assert!(set.match_route(&route));
        set.group_mut(FacetKey::Communities)
            .add_filter(Filter::new(Community::standard(65000, 2)));
        assert!(!set.match_route(&route));
    }

    #[test]
    fn test_match_source() {
        let rs = route_server("rs1");
        let route = lookup_route(&rs, 64512, "10.0.0.0/8", vec![]);

        let mut set = FilterSet::new();
        set.group_mut(FacetKey::Sources).add_filter(Filter::new("rs2"));
        assert!(!set.match_route(&route));
        set.group_mut(FacetKey::Sources).add_filter(Filter::new(rs.id.clone()));
        assert!(set.match_route(&route));
    }

    #[test]
    fn test_combine_sub() {
        let mut a = FilterSet::new();
        a.add_from_lookup_route(&lookup_route(
            &route_server("rs1"),
            64512,
            "10.0.0.0/8",
            vec![Community::standard(65000, 1)],
        ));
        let mut b = FilterSet::new();
        b.add_from_lookup_route(&lookup_route(
            &route_server("rs2"),
            64512,
            "10.0.0.0/8",
            vec![Community::standard(65000, 2)],
        ));

        let combined = a.combine(&b);
        assert_eq!(combined.group(FacetKey::Sources).len(), 2);
        assert_eq!(combined.group(FacetKey::Asns).len(), 1);
        assert_eq!(combined.group(FacetKey::Communities).len(), 2);

        let diff = combined.sub(&a);
        assert_eq!(diff.group(FacetKey::Sources).len(), 1);
        assert_eq!(diff.group(FacetKey::Asns).len(), 0);
        assert_eq!(
            diff.group(FacetKey::Communities).filters()[0].value,
            FilterValue::Community(Community::standard(65000, 2))
        );

        assert!(a.sub(&a).is_empty());
        // inputs are untouched
        assert_eq!(a.group(FacetKey::Sources).len(), 1);
    }

    #[test]
    fn test_label_communities() {
        let mut labels = CommunityLabels::new();
        labels.set("65000:1", "customer route");
        labels.set("rt:*:1", "route target");

        let mut set = FilterSet::new();
        set.add_from_lookup_route(&lookup_route(
            &route_server("rs1"),
            64512,
            "10.0.0.0/8",
            vec![Community::standard(65000, 1), Community::standard(65000, 2)],
        ));
        set.label_communities(&labels);

        let communities = set.group(FacetKey::Communities).filters();
        assert_eq!(communities[0].label, "customer route");
        assert_eq!(communities[1].label, "65000:2");
        assert_eq!(
            set.group(FacetKey::ExtCommunities).filters()[0].label,
            "route target"
        );
    }
}
