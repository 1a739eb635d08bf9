#[cfg(test)]
mod tests {
    use std::io::Write;

    use lg_search::config::{CommunityConfig, SkipReason};
    use lg_search::models::{Community, ExtCommunity};
    use lg_search::{ConfigError, FacetKey, FilterSet};
    use tempfile::NamedTempFile;

    const CONFIG: &str = "\
[bgp_communities]
65535:666 = blackhole
65000:* = customer routes
rt:65000:* = route target

[reject_reasons]
23:42:1 = invalid AS path
23:42:2 = prefix too long

[noexport_reasons]
23:46:1 = no export to peers

[rejection_candidates]
communities = 23:42:1, 23:42:2

[blackhole_communities]
65535:666
64512-65534:666:*
";

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_from_path() {
        let file = write_config(CONFIG);
        let config = CommunityConfig::from_path(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.labels.len(), 3);
        assert_eq!(config.reject_reasons.len(), 2);
        assert_eq!(config.noexport_reasons.get("23:46:1"), Some("no export to peers"));
        assert_eq!(config.reject_candidates.len(), 2);
        assert!(config.diagnostics.is_empty());

        assert!(config
            .blackholes
            .contains_community(&Community::standard(65535, 666)));
        assert!(config
            .blackholes
            .contains_community(&Community::large(64512, 666, 42)));
        assert!(!config
            .blackholes
            .contains_community(&Community::standard(65000, 666)));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CommunityConfig::from_path("/nonexistent/lg-search.conf"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_forgiving_label_sections() {
        let config = CommunityConfig::parse(
            "[bgp_communities]\n65535:666 = blackhole\nnot a label\n\n[reject_reasons]\n= empty\n",
        )
        .unwrap();
        assert_eq!(config.labels.len(), 1);
        assert_eq!(config.diagnostics.len(), 2);
        assert_eq!(config.diagnostics[0].line, 3);
        assert_eq!(config.diagnostics[0].reason, SkipReason::MissingSeparator);
        assert_eq!(config.diagnostics[1].line, 6);
        assert_eq!(config.diagnostics[1].reason, SkipReason::EmptyKey);
    }

    #[test]
    fn test_label_filters() {
        let config = CommunityConfig::parse(CONFIG).unwrap();
        let mut filters = FilterSet::new();
        for c in ["65000:1", "23:42:1", "65535:666", "64496:1"] {
            filters.group_mut(FacetKey::Communities).add_filter(
                lg_search::Filter::with_label(c.parse::<Community>().unwrap(), c),
            );
        }
        filters
            .group_mut(FacetKey::ExtCommunities)
            .add_filter(lg_search::Filter::new(ExtCommunity::new("rt", 65000, 7)));
        filters.label_communities(&config.all_labels());

        let labels = filters
            .group(FacetKey::Communities)
            .iter()
            .map(|f| f.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec!["customer routes", "invalid AS path", "blackhole", "64496:1"]
        );
        assert_eq!(
            filters.group(FacetKey::ExtCommunities).filters()[0].label,
            "route target"
        );
    }
}
