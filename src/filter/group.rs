use crate::filter::{FacetKey, Filter, FilterValue, Filterable};
use log::warn;
use std::collections::HashMap;

/// The filters of one facet.
///
/// A group is a deduplicated set with counts: adding a value that is already present bumps its
/// cardinality instead of appending. `index` maps the canonical text of every value to its
/// position in `filters` and is rebuilt after any change other than a counter increment.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FilterGroup {
    key: FacetKey,
    filters: Vec<Filter>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: HashMap<String, usize>,
}

impl FilterGroup {
    pub fn new(key: FacetKey) -> FilterGroup {
        FilterGroup {
            key,
            filters: vec![],
            index: HashMap::new(),
        }
    }

    pub fn key(&self) -> FacetKey {
        self.key
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Finds the filter with a value equal to the one of `filter`, comparing kind-aware.
    pub fn find_filter(&self, filter: &Filter) -> Option<&Filter> {
        self.filters.iter().find(|f| f.value == filter.value)
    }

    pub fn contains(&self, filter: &Filter) -> bool {
        self.find_filter(filter).is_some()
    }

    /// Index lookup by the canonical text of `value`.
    pub fn get_filter_by_value(&self, value: &FilterValue) -> Option<&Filter> {
        self.index
            .get(&value.to_string())
            .map(|idx| &self.filters[*idx])
    }

    /// Adds a filter, or increments the cardinality of the filter already holding its value.
    ///
    /// A newly inserted filter starts with a cardinality of 1.
    pub fn add_filter(&mut self, mut filter: Filter) {
        let key = filter.value.to_string();
        if let Some(idx) = self.index.get(&key) {
            self.filters[*idx].cardinality += 1;
            return;
        }

        filter.cardinality = 1;
        self.index.insert(key, self.filters.len());
        self.filters.push(filter);
    }

    pub fn add_filters<I: IntoIterator<Item = Filter>>(&mut self, filters: I) {
        for filter in filters {
            self.add_filter(filter);
        }
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .filters
            .iter()
            .enumerate()
            .map(|(i, f)| (f.value.to_string(), i))
            .collect();
    }

    /// Filters of `self` followed by the filters of `other` whose value is not in `self`.
    ///
    /// For values present in both, label and cardinality of `self` are kept.
    pub fn union(&self, other: &FilterGroup) -> FilterGroup {
        let mut combined = FilterGroup {
            key: self.key,
            filters: self.filters.clone(),
            index: HashMap::new(),
        };
        for filter in &other.filters {
            if combined.contains(filter) {
                continue;
            }
            combined.filters.push(filter.clone());
        }
        combined.rebuild_index();
        combined
    }

    /// Filters of `self` whose value is not in `other`.
    pub fn difference(&self, other: &FilterGroup) -> FilterGroup {
        let mut diff = FilterGroup {
            key: self.key,
            filters: self
                .filters
                .iter()
                .filter(|f| !other.contains(f))
                .cloned()
                .collect(),
            index: HashMap::new(),
        };
        diff.rebuild_index();
        diff
    }

    /// Copies label and cardinality from the value-equal filters of `other`.
    ///
    /// Filters without a counterpart in `other` are left as they are.
    pub fn merge_properties(&mut self, other: &FilterGroup) {
        for filter in self.filters.iter_mut() {
            if let Some(other_filter) = other.find_filter(filter) {
                filter.label.clone_from(&other_filter.label);
                filter.cardinality = other_filter.cardinality;
            }
        }
    }

    /// Replaces labels for which `label_for` returns a new one. Values are untouched.
    pub(crate) fn relabel<F>(&mut self, label_for: F)
    where
        F: Fn(&FilterValue) -> Option<String>,
    {
        for filter in self.filters.iter_mut() {
            if let Some(label) = label_for(&filter.value) {
                filter.label = label;
            }
        }
    }

    /// True if the group is empty or any filter accepts the route.
    pub fn match_any<R: Filterable + ?Sized>(&self, route: &R) -> bool {
        if self.filters.is_empty() {
            return true;
        }
        self.filters
            .iter()
            .any(|f| match_value(self.key, route, &f.value))
    }

    /// True if the group is empty or every filter accepts the route.
    pub fn match_all<R: Filterable + ?Sized>(&self, route: &R) -> bool {
        self.filters
            .iter()
            .all(|f| match_value(self.key, route, &f.value))
    }
}

/// Dispatches a value to the route matcher of its facet.
///
/// A value of the wrong kind for the facet never matches.
fn match_value<R: Filterable + ?Sized>(key: FacetKey, route: &R, value: &FilterValue) -> bool {
    match (key, value) {
        (FacetKey::Sources, FilterValue::SourceId(id)) => route.match_source_id(id),
        (FacetKey::Asns, FilterValue::Asn(asn)) => route.match_asn(*asn),
        (FacetKey::Communities, FilterValue::Community(c)) => route.match_community(c),
        (FacetKey::ExtCommunities, FilterValue::ExtCommunity(c)) => route.match_ext_community(c),
        (FacetKey::LargeCommunities, FilterValue::Community(c)) => route.match_large_community(c),
        (FacetKey::AddrFamily, FilterValue::AddrFamily(af)) => route.match_addr_family(*af),
        _ => {
            warn!(
                "{} value {} cannot be matched in facet {}",
                value.kind_name(),
                value,
                key
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;

    struct TestRoute {
        asn: u32,
        communities: Vec<Community>,
    }

    impl Filterable for TestRoute {
        fn match_source_id(&self, _source_id: &str) -> bool {
            false
        }
        fn match_asn(&self, asn: u32) -> bool {
            self.asn == asn
        }
        fn match_community(&self, community: &Community) -> bool {
            self.communities.contains(community)
        }
        fn match_ext_community(&self, _community: &ExtCommunity) -> bool {
            false
        }
        fn match_large_community(&self, _community: &Community) -> bool {
            false
        }
        fn match_addr_family(&self, _family: AddrFamily) -> bool {
            false
        }
    }

    fn test_route() -> TestRoute {
        TestRoute {
            asn: 64512,
            communities: vec![Community::standard(65000, 1), Community::standard(65000, 2)],
        }
    }

    fn community_group(values: &[[u32; 2]]) -> FilterGroup {
        let mut group = FilterGroup::new(FacetKey::Communities);
        group.add_filters(values.iter().map(|v| Filter::new(Community::from(*v))));
        group
    }

    fn assert_index_consistent(group: &FilterGroup) {
        assert_eq!(group.index.len(), group.filters.len());
        for (i, f) in group.filters.iter().enumerate() {
            assert_eq!(group.index[&f.value.to_string()], i);
        }
    }

    #[test]
    fn test_add_filter_dedup() {
        let mut group = FilterGroup::new(FacetKey::Communities);
        for _ in 0..5 {
            group.add_filter(Filter::new(Community::standard(65000, 100)));
        }
        assert_eq!(group.len(), 1);
        assert_eq!(group.filters()[0].cardinality, 5);

        group.add_filter(Filter::new(Community::standard(100, 65000)));
        assert_eq!(group.len(), 2);
        assert_eq!(group.filters()[1].cardinality, 1);
        assert_index_consistent(&group);
    }

    #[test]
    fn test_add_filter_forces_cardinality() {
        let mut group = FilterGroup::new(FacetKey::Asns);
        let mut filter = Filter::new(64512u32);
        filter.cardinality = 42;
        group.add_filter(filter);
        assert_eq!(group.filters()[0].cardinality, 1);
    }

    #[test]
    fn test_get_filter_by_value() {
        let group = community_group(&[[65000, 1], [65000, 2]]);
        let found = group
            .get_filter_by_value(&FilterValue::Community(Community::standard(65000, 2)))
            .unwrap();
        assert_eq!(found.value, FilterValue::Community(Community::standard(65000, 2)));
        assert!(group
            .get_filter_by_value(&FilterValue::Community(Community::standard(2, 65000)))
            .is_none());
    }

    #[test]
    fn test_contains_source_by_identity_and_content() {
        let id: std::sync::Arc<str> = std::sync::Arc::from("rs1");
        let mut group = FilterGroup::new(FacetKey::Sources);
        group.add_filter(Filter::with_label(id.clone(), "Route Server 1"));

        assert!(group.contains(&Filter::new(id)));
        assert!(group.contains(&Filter::new("rs1")));
        assert!(!group.contains(&Filter::new("rs2")));
    }

    #[test]
    fn test_empty_group_matches() {
        let route = test_route();
        let group = FilterGroup::new(FacetKey::Communities);
        assert!(group.match_any(&route));
        assert!(group.match_all(&route));
    }

    #[test]
    fn test_match_any_all() {
        let route = test_route();

        let group = community_group(&[[65000, 1], [65000, 3]]);
        assert!(group.match_any(&route));
        assert!(!group.match_all(&route));

        let group = community_group(&[[65000, 1], [65000, 2]]);
        assert!(group.match_all(&route));

        let group = community_group(&[[65000, 3]]);
        assert!(!group.match_any(&route));
    }

    #[test]
    fn test_wrong_kind_never_matches() {
        let route = test_route();
        let mut group = FilterGroup::new(FacetKey::Asns);
        group.add_filter(Filter::new(Community::standard(65000, 1)));
        assert!(!group.match_any(&route));
        assert!(!group.match_all(&route));
    }

    #[test]
    fn test_union() {
        let mut a = community_group(&[[1, 1], [2, 2]]);
        a.merge_properties(&{
            let mut labelled = FilterGroup::new(FacetKey::Communities);
            labelled.add_filter(Filter::with_label(Community::standard(2, 2), "left"));
            labelled
        });
        let mut b = FilterGroup::new(FacetKey::Communities);
        b.add_filter(Filter::with_label(Community::standard(2, 2), "right"));
        b.add_filter(Filter::new(Community::standard(3, 3)));

        let combined = a.union(&b);
        assert_eq!(combined.len(), 3);
        assert_eq!(combined.filters()[1].label, "left");
        assert_eq!(
            combined.filters()[2].value,
            FilterValue::Community(Community::standard(3, 3))
        );
        assert_index_consistent(&combined);

        // inputs are untouched
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_difference() {
        let a = community_group(&[[1, 1], [2, 2], [3, 3]]);
        let b = community_group(&[[2, 2], [4, 4]]);

        let diff = a.difference(&b);
        let values = diff.iter().map(|f| f.value.to_string()).collect::<Vec<_>>();
        assert_eq!(values, vec!["1:1", "3:3"]);
        assert_index_consistent(&diff);

        assert!(a.difference(&a).is_empty());
    }

    #[test]
    fn test_merge_properties() {
        let mut request = community_group(&[[1, 1], [9, 9]]);
        let mut aggregate = FilterGroup::new(FacetKey::Communities);
        for _ in 0..3 {
            aggregate.add_filter(Filter::with_label(Community::standard(1, 1), "one"));
        }

        request.merge_properties(&aggregate);
        assert_eq!(request.filters()[0].label, "one");
        assert_eq!(request.filters()[0].cardinality, 3);
        assert_eq!(request.filters()[1].label, "");
        assert_eq!(request.filters()[1].cardinality, 1);
    }
}
