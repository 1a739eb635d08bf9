/*!
lg-search is the search and filter engine of a BGP looking glass.

A looking glass collects routes from several route servers (the *sources*) and lets operators
narrow them down by source, neighbor ASN, BGP communities and address family. This crate
provides:

- the value model for [models::Community] and [models::ExtCommunity], and the route objects
  filters are evaluated against
- faceted filter sets ([FilterSet]) built from URL query parameters, search tokens or observed
  routes, with union, difference and property merge
- loading of community labels and community ranges from configuration ([config::CommunityConfig])

# Example

Find the routes matching a request, and the filters a user could still add:

```
use lg_search::{FacetKey, FilterSet};
use lg_search::models::*;
use std::sync::Arc;

let route_server = RouteServer {
    id: Arc::from("rs1"),
    name: "Route Server 1".to_string(),
    group: None,
};
let route = LookupRoute {
    route: Route {
        id: "r1".to_string(),
        network: "10.0.0.0/8".parse().unwrap(),
        neighbor_id: "n1".to_string(),
        bgp: BgpInfo {
            communities: vec![Community::standard(65000, 100), Community::standard(65000, 200)],
            ..Default::default()
        },
        primary: true,
    },
    neighbor: Neighbor {
        id: "n1".to_string(),
        address: "192.0.2.1".parse().unwrap(),
        asn: 64512,
        description: "Example Transit".to_string(),
        route_server_id: route_server.id.clone(),
    },
    route_server,
};

let request = FilterSet::from_query_str("communities=65000:100").unwrap();
assert!(request.match_route(&route));

let mut aggregate = FilterSet::new();
aggregate.add_from_lookup_route(&route);
let available = aggregate.sub(&request);
assert_eq!(available.group(FacetKey::Communities).len(), 1);
```
*/

pub mod config;
pub mod error;
pub mod filter;
pub mod models;

pub use error::{ConfigError, FilterError};
pub use filter::{FacetKey, Filter, FilterGroup, FilterSet, FilterValue, Filterable};
