use crate::models::{Community, ExtCommunity};
use std::collections::BTreeMap;

/// Community to label directory.
///
/// Keys are community texts as written in configuration (`65535:666`, `rt:65000:100`). A key
/// segment may be `*`, matching any value in that position during [CommunityLabels::lookup].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CommunityLabels(BTreeMap<String, String>);

impl CommunityLabels {
    pub fn new() -> CommunityLabels {
        CommunityLabels::default()
    }

    pub fn set(&mut self, community: impl Into<String>, label: impl Into<String>) {
        self.0.insert(community.into(), label.into());
    }

    /// Exact key lookup.
    pub fn get(&self, community: &str) -> Option<&str> {
        self.0.get(community).map(String::as_str)
    }

    /// Looks up a label, trying the exact key first and then wildcard keys.
    ///
    /// Wildcard keys are tried in key order; the first whose segments all match wins.
    pub fn lookup(&self, community: &str) -> Option<&str> {
        if let Some(label) = self.get(community) {
            return Some(label);
        }
        let segments = community.split(':').collect::<Vec<&str>>();
        self.0
            .iter()
            .filter(|(key, _)| key.contains('*'))
            .find(|(key, _)| {
                let pattern = key.split(':').collect::<Vec<&str>>();
                pattern.len() == segments.len()
                    && pattern
                        .iter()
                        .zip(&segments)
                        .all(|(p, s)| *p == "*" || p == s)
            })
            .map(|(_, label)| label.as_str())
    }

    pub fn lookup_community(&self, community: &Community) -> Option<&str> {
        self.lookup(&community.to_string())
    }

    pub fn lookup_ext_community(&self, community: &ExtCommunity) -> Option<&str> {
        self.lookup(&community.to_string())
    }

    /// Adds all entries of `other`, replacing labels of keys present in both.
    pub fn merge(&mut self, other: CommunityLabels) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
