use crate::models::{Community, ExtCommunity};
use ipnet::IpNet;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::net::IpAddr;
use std::sync::Arc;

/// Address family of a route, encoded as the IP version number.
#[derive(Debug, PartialEq, TryFromPrimitive, IntoPrimitive, Clone, Copy, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "u8", try_from = "u8"))]
#[repr(u8)]
pub enum AddrFamily {
    Ipv4 = 4,
    Ipv6 = 6,
}

impl AddrFamily {
    pub const fn label(&self) -> &'static str {
        match self {
            AddrFamily::Ipv4 => "IPv4",
            AddrFamily::Ipv6 => "IPv6",
        }
    }
}

impl From<&IpNet> for AddrFamily {
    #[inline]
    fn from(value: &IpNet) -> Self {
        match value {
            IpNet::V4(_) => AddrFamily::Ipv4,
            IpNet::V6(_) => AddrFamily::Ipv6,
        }
    }
}

/// BGP attributes of a route as reported by a route server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BgpInfo {
    pub origin: Option<String>,
    pub as_path: Vec<u32>,
    pub next_hop: Option<IpAddr>,
    pub communities: Vec<Community>,
    pub large_communities: Vec<Community>,
    pub ext_communities: Vec<ExtCommunity>,
    pub local_pref: u32,
    pub med: u32,
    pub otc: Option<u32>,
}

impl BgpInfo {
    pub fn has_community(&self, community: &Community) -> bool {
        community.is_standard() && self.communities.contains(community)
    }

    pub fn has_large_community(&self, community: &Community) -> bool {
        community.is_large() && self.large_communities.contains(community)
    }

    pub fn has_ext_community(&self, community: &ExtCommunity) -> bool {
        self.ext_communities.contains(community)
    }
}

/// A route from a route server's table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub id: String,
    pub network: IpNet,
    pub neighbor_id: String,
    pub bgp: BgpInfo,
    #[cfg_attr(feature = "serde", serde(default))]
    pub primary: bool,
}

impl Route {
    pub fn addr_family(&self) -> AddrFamily {
        AddrFamily::from(&self.network)
    }
}

/// A route server, the source of routes and neighbors.
///
/// The `id` is shared by all routes of a source; cloning a [RouteServer] clones the pointer, so
/// filters built from the same source compare by identity first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteServer {
    pub id: Arc<str>,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub group: Option<String>,
}

/// A BGP session of a route server.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neighbor {
    pub id: String,
    pub address: IpAddr,
    pub asn: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub route_server_id: Arc<str>,
}

impl Neighbor {
    /// Case-insensitive substring match on the description.
    pub fn match_name(&self, name: &str) -> bool {
        self.description
            .to_lowercase()
            .contains(&name.to_lowercase())
    }

    pub fn match_asn(&self, asn: u32) -> bool {
        self.asn == asn
    }
}

/// A route together with the route server and neighbor it was learned from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LookupRoute {
    pub route: Route,
    pub route_server: RouteServer,
    pub neighbor: Neighbor,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_addr_family_repr() {
        assert_eq!(u8::from(AddrFamily::Ipv4), 4);
        assert_eq!(AddrFamily::try_from(6u8).unwrap(), AddrFamily::Ipv6);
        assert!(AddrFamily::try_from(5u8).is_err());
        assert_eq!(
            AddrFamily::from(&IpNet::from_str("2001:db8::/32").unwrap()),
            AddrFamily::Ipv6
        );
    }

    #[test]
    fn test_bgp_info_has_community() {
        let bgp = BgpInfo {
            communities: vec![Community::standard(65000, 100)],
            large_communities: vec![Community::large(65000, 1, 2)],
            ext_communities: vec![ExtCommunity::new("rt", 65000, 100)],
            ..Default::default()
        };
        assert!(bgp.has_community(&Community::standard(65000, 100)));
        assert!(!bgp.has_community(&Community::large(65000, 1, 2)));
        assert!(bgp.has_large_community(&Community::large(65000, 1, 2)));
        assert!(!bgp.has_large_community(&Community::standard(65000, 100)));
        assert!(bgp.has_ext_community(&ExtCommunity::new("rt", 65000, 100)));
        assert!(!bgp.has_ext_community(&ExtCommunity::new("ro", 65000, 100)));
    }

    #[test]
    fn test_neighbor_match_name() {
        let neighbor = Neighbor {
            id: "n1".to_string(),
            address: "192.0.2.1".parse().unwrap(),
            asn: 64512,
            description: "Example Transit AG".to_string(),
            route_server_id: Arc::from("rs1"),
        };
        assert!(neighbor.match_name("transit"));
        assert!(!neighbor.match_name("peering"));
        assert!(neighbor.match_asn(64512));
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_addr_family_serde() {
        assert_eq!(serde_json::to_string(&AddrFamily::Ipv6).unwrap(), "6");
        let af: AddrFamily = serde_json::from_str("4").unwrap();
        assert_eq!(af, AddrFamily::Ipv4);
        assert!(serde_json::from_str::<AddrFamily>("5").is_err());
    }
}
