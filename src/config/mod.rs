/*!
## Community Configuration

[CommunityConfig] loads the community sections of a looking-glass configuration file. The file
is INI-like; only these sections are read:

```text
[bgp_communities]
65535:666 = blackhole
65000:* = customer routes

[reject_reasons]
23:42:1 = invalid AS path

[noexport_reasons]
23:46:1 = prefix too long

[rejection_candidates]
communities = 23:42:1, 23:42:2

[blackhole_communities]
65535:666
64512-65534:666
```

Label sections are parsed forgivingly, malformed lines end up in
[CommunityConfig::diagnostics]. A malformed blackhole range fails the whole load.

### Example

```
use lg_search::config::CommunityConfig;
use lg_search::models::Community;

let config = CommunityConfig::parse("[blackhole_communities]\n65535:666\n").unwrap();
assert!(config.blackholes.contains_community(&Community::standard(65535, 666)));
```
*/
mod communities;

pub use communities::*;

use crate::error::ConfigError;
use crate::models::{BgpCommunitiesSet, CommunityLabels};
use log::info;

/// Community labels and ranges used when presenting routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunityConfig {
    pub labels: CommunityLabels,
    pub reject_reasons: CommunityLabels,
    pub noexport_reasons: CommunityLabels,
    pub reject_candidates: CommunityLabels,
    pub blackholes: BgpCommunitiesSet,
    /// Lines skipped while loading, with absolute line numbers.
    pub diagnostics: Vec<ConfigDiagnostic>,
}

/// A `[section]` with its body and the line number of its header.
struct Section<'a> {
    name: &'a str,
    header_line: usize,
    body: String,
}

impl CommunityConfig {
    /// Reads and parses a configuration file. Compressed and remote files are supported through
    /// [oneio].
    pub fn from_path(path: &str) -> Result<CommunityConfig, ConfigError> {
        let content = oneio::read_to_string(path)?;
        let config = CommunityConfig::parse(&content)?;
        info!(
            "loaded community config from {}: {} labels, {} blackhole ranges, {} skipped lines",
            path,
            config.labels.len(),
            config.blackholes.len(),
            config.diagnostics.len()
        );
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<CommunityConfig, ConfigError> {
        let (sections, mut diagnostics) = split_sections(content);
        let mut config = CommunityConfig::default();

        for section in sections {
            let offset = section.header_line;
            let section_diagnostics = match section.name {
                "bgp_communities" => {
                    parse_and_merge_community_labels(&mut config.labels, &section.body)
                }
                "reject_reasons" => {
                    parse_and_merge_community_labels(&mut config.reject_reasons, &section.body)
                }
                "noexport_reasons" => {
                    parse_and_merge_community_labels(&mut config.noexport_reasons, &section.body)
                }
                "rejection_candidates" => {
                    parse_reject_candidates(&mut config.reject_candidates, &section.body)
                }
                "blackhole_communities" => {
                    let set = parse_range_communities_set(&section.body).map_err(|e| match e {
                        ConfigError::Community { line, source } => ConfigError::Community {
                            line: line + offset,
                            source,
                        },
                        other => other,
                    })?;
                    config.blackholes.standard.extend(set.standard);
                    config.blackholes.large.extend(set.large);
                    config.blackholes.extended.extend(set.extended);
                    vec![]
                }
                name => {
                    diagnostics.push(ConfigDiagnostic::new(
                        offset,
                        &format!("[{}]", name),
                        SkipReason::UnknownSection(name.to_string()),
                    ));
                    vec![]
                }
            };
            diagnostics.extend(section_diagnostics.into_iter().map(|mut d| {
                d.line += offset;
                d
            }));
        }

        diagnostics.sort_by_key(|d| d.line);
        config.diagnostics = diagnostics;
        Ok(config)
    }

    /// All labels, with reject and noexport reasons and rejection candidates taking precedence
    /// over plain community labels.
    pub fn all_labels(&self) -> CommunityLabels {
        let mut labels = self.labels.clone();
        labels.merge(self.reject_candidates.clone());
        labels.merge(self.noexport_reasons.clone());
        labels.merge(self.reject_reasons.clone());
        labels
    }
}

/// Section name of a `[name]` header line, which may carry a trailing `#` comment.
fn section_header(line: &str) -> Option<&str> {
    let header = match line.split_once('#') {
        Some((header, _)) => header.trim_end(),
        None => line,
    };
    header
        .strip_prefix('[')
        .and_then(|l| l.strip_suffix(']'))
        .map(str::trim)
}

/// Splits content into sections. Section bodies keep their line layout, so a body line `n`
/// sits at absolute line `header_line + n`.
fn split_sections(content: &str) -> (Vec<Section<'_>>, Vec<ConfigDiagnostic>) {
    let mut sections: Vec<Section> = vec![];
    let mut diagnostics = vec![];

    for (i, raw) in content.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if let Some(name) = section_header(line) {
            sections.push(Section {
                name,
                header_line: line_no,
                body: String::new(),
            });
            continue;
        }
        match sections.last_mut() {
            Some(section) => {
                section.body.push_str(raw);
                section.body.push('\n');
            }
            None => {
                if !line.is_empty() && !line.starts_with('#') {
                    diagnostics.push(ConfigDiagnostic::new(
                        line_no,
                        line,
                        SkipReason::OutsideSection,
                    ));
                }
            }
        }
    }
    (sections, diagnostics)
}
