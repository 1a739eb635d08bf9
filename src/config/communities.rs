/*!
Parsers for the community sections of a looking-glass configuration.

Two tiers:
- label directories and rejection candidates are hand edited and parsed forgivingly: a
  malformed line is skipped and reported as a [ConfigDiagnostic]
- community range sets are parsed strictly: one bad line fails the whole body
*/
use crate::error::ConfigError;
use crate::models::{BgpCommunitiesSet, CommunityLabels, CommunityRange};
use log::debug;
use std::fmt::{Display, Formatter};

/// Why a configuration line was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The line has no `=` separating key and value.
    MissingSeparator,
    EmptyKey,
    UnexpectedKey(String),
    UnknownSection(String),
    OutsideSection,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingSeparator => write!(f, "expected `key = value`"),
            SkipReason::EmptyKey => write!(f, "empty key"),
            SkipReason::UnexpectedKey(key) => write!(f, "unexpected key {:?}", key),
            SkipReason::UnknownSection(name) => write!(f, "unknown section [{}]", name),
            SkipReason::OutsideSection => write!(f, "line outside of any section"),
        }
    }
}

/// A skipped configuration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDiagnostic {
    /// 1-based line number.
    pub line: usize,
    pub text: String,
    pub reason: SkipReason,
}

impl ConfigDiagnostic {
    pub(crate) fn new(line: usize, text: &str, reason: SkipReason) -> ConfigDiagnostic {
        let diagnostic = ConfigDiagnostic {
            line,
            text: text.to_string(),
            reason,
        };
        debug!("skipping configuration line: {}", diagnostic);
        diagnostic
    }
}

impl Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line, self.reason, self.text)
    }
}

/// Lines that carry content: not blank and not a `#` comment. Yields 1-based line numbers.
fn content_lines(body: &str) -> impl Iterator<Item = (usize, &str)> {
    body.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn split_key_value(line: &str) -> Result<(&str, &str), SkipReason> {
    let (key, value) = line.split_once('=').ok_or(SkipReason::MissingSeparator)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(SkipReason::EmptyKey);
    }
    Ok((key, value.trim()))
}

/// Parses `community = label` lines into `labels`, replacing existing labels.
pub fn parse_and_merge_community_labels(
    labels: &mut CommunityLabels,
    body: &str,
) -> Vec<ConfigDiagnostic> {
    let mut diagnostics = vec![];
    for (n, line) in content_lines(body) {
        match split_key_value(line) {
            Ok((community, label)) => labels.set(community, label),
            Err(reason) => diagnostics.push(ConfigDiagnostic::new(n, line, reason)),
        }
    }
    diagnostics
}

/// Parses a label directory body.
pub fn parse_community_labels(body: &str) -> (CommunityLabels, Vec<ConfigDiagnostic>) {
    let mut labels = CommunityLabels::new();
    let diagnostics = parse_and_merge_community_labels(&mut labels, body);
    (labels, diagnostics)
}

/// Parses a rejection candidate body into `labels`.
///
/// The body holds a `communities` key with a comma separated list. Each listed community is
/// labelled `reject-candidate-<n>`, numbered by its position in the list starting at 1. Empty
/// items are skipped but keep their number.
pub fn parse_reject_candidates(labels: &mut CommunityLabels, body: &str) -> Vec<ConfigDiagnostic> {
    let mut diagnostics = vec![];
    let mut n = 0;
    for (line_no, line) in content_lines(body) {
        let (key, value) = match split_key_value(line) {
            Ok(kv) => kv,
            Err(reason) => {
                diagnostics.push(ConfigDiagnostic::new(line_no, line, reason));
                continue;
            }
        };
        if key != "communities" {
            diagnostics.push(ConfigDiagnostic::new(
                line_no,
                line,
                SkipReason::UnexpectedKey(key.to_string()),
            ));
            continue;
        }
        for community in value.split(',').map(str::trim) {
            n += 1;
            if !community.is_empty() {
                labels.set(community, format!("reject-candidate-{}", n));
            }
        }
    }
    diagnostics
}

/// Parses one community range per line into a set partitioned by kind.
///
/// Any malformed line fails the whole body.
pub fn parse_range_communities_set(body: &str) -> Result<BgpCommunitiesSet, ConfigError> {
    let mut set = BgpCommunitiesSet::default();
    for (line, text) in content_lines(body) {
        let range = text
            .parse::<CommunityRange>()
            .map_err(|source| ConfigError::Community { line, source })?;
        set.push(range);
    }
    Ok(set)
}
