// src/regions.rs
//! Semantic region classification.
//!
//! Configured region labels are free text ("East Asia and Pacific (EAP): Includes
//! China, ..."). Each label is mapped to one of the canonical region groups, and
//! notice text is then matched against the static term list of every configured
//! group (whole-word, case-insensitive).

use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::RegionSpec;

/// Canonical geography buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegionGroup {
    Eap,
    Lac,
    Menap,
    Sar,
    Ssa,
}

impl RegionGroup {
    pub const ALL: [RegionGroup; 5] = [
        RegionGroup::Eap,
        RegionGroup::Lac,
        RegionGroup::Menap,
        RegionGroup::Sar,
        RegionGroup::Ssa,
    ];

    pub fn code(self) -> &'static str {
        match self {
            RegionGroup::Eap => "EAP",
            RegionGroup::Lac => "LAC",
            RegionGroup::Menap => "MENAP",
            RegionGroup::Sar => "SAR",
            RegionGroup::Ssa => "SSA",
        }
    }

    /// Place names and aliases that mark a notice as belonging to this group.
    /// The code itself is always part of the list.
    pub fn terms(self) -> &'static [&'static str] {
        match self {
            RegionGroup::Eap => &[
                "EAP",
                "East Asia",
                "Pacific",
                "Pacific Island States",
                "China",
                "Indonesia",
                "Philippines",
                "Vietnam",
                "Viet Nam",
                "Thailand",
                "Cambodia",
                "Lao PDR",
                "Laos",
                "Myanmar",
                "Mongolia",
                "Malaysia",
                "Papua New Guinea",
                "Timor-Leste",
                "Fiji",
                "Samoa",
                "Tonga",
                "Vanuatu",
                "Solomon Islands",
                "Kiribati",
                "Tuvalu",
                "Micronesia",
                "Marshall Islands",
            ],
            RegionGroup::Lac => &[
                "LAC",
                "Latin America",
                "Caribbean",
                "Mexico",
                "Brazil",
                "Argentina",
                "Colombia",
                "Peru",
                "Chile",
                "Ecuador",
                "Bolivia",
                "Paraguay",
                "Uruguay",
                "Guatemala",
                "Honduras",
                "El Salvador",
                "Nicaragua",
                "Costa Rica",
                "Panama",
                "Haiti",
                "Dominican Republic",
                "Jamaica",
                "Guyana",
                "Suriname",
                "Belize",
            ],
            RegionGroup::Menap => &[
                "MENAP",
                "MENA",
                "Middle East",
                "North Africa",
                "Egypt",
                "Morocco",
                "Tunisia",
                "Algeria",
                "Libya",
                "Jordan",
                "Lebanon",
                "Iraq",
                "Iran",
                "Syria",
                "Yemen",
                "Djibouti",
                "West Bank",
                "Gaza",
                "Afghanistan",
                "Pakistan",
            ],
            RegionGroup::Sar => &[
                "SAR",
                "South Asia",
                "India",
                "Bangladesh",
                "Nepal",
                "Sri Lanka",
                "Bhutan",
                "Maldives",
                "Pakistan",
                "Afghanistan",
            ],
            RegionGroup::Ssa => &[
                "SSA",
                "Sub-Saharan",
                "Sub-Saharan Africa",
                "Kenya",
                "Nigeria",
                "Ethiopia",
                "Ghana",
                "Tanzania",
                "Uganda",
                "Rwanda",
                "Senegal",
                "Mozambique",
                "Zambia",
                "Zimbabwe",
                "Malawi",
                "Madagascar",
                "Cameroon",
                "Côte d'Ivoire",
                "Cote d'Ivoire",
                "Sierra Leone",
                "Liberia",
                "Niger",
                "Mali",
                "Burkina Faso",
                "Chad",
                "Sudan",
                "South Sudan",
                "Somalia",
                "South Africa",
                "Angola",
                "Benin",
                "Togo",
                "Democratic Republic of Congo",
                "DRC",
            ],
        }
    }

    /// Keyword fallbacks applied to an uppercased label when no code is present.
    fn label_hints(self) -> &'static [&'static str] {
        match self {
            RegionGroup::Eap => &["EAST ASIA", "PACIFIC"],
            RegionGroup::Lac => &["LATIN AMERICA", "CARIBBEAN"],
            RegionGroup::Menap => &["MIDDLE EAST", "NORTH AFRICA"],
            RegionGroup::Sar => &["SOUTH ASIA"],
            RegionGroup::Ssa => &["SUB-SAHARAN"],
        }
    }
}

impl fmt::Display for RegionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Map a free-text label to its canonical group.
///
/// The code itself wins when it appears as `(CODE)` or as a whole-word token;
/// otherwise keyword hints decide (`"east asia"`/`"pacific"` → EAP, ...).
pub fn normalize_region_group(label: &str) -> Option<RegionGroup> {
    let upper = label.to_uppercase();

    let tokens: Vec<&str> = upper
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    if let Some(g) = RegionGroup::ALL.iter().copied().find(|g| {
        upper.contains(&format!("({})", g.code())) || tokens.iter().any(|t| *t == g.code())
    }) {
        return Some(g);
    }

    RegionGroup::ALL
        .iter()
        .copied()
        .find(|g| g.label_hints().iter().any(|h| upper.contains(h)))
}

/// Flatten configured regions into plain label strings, in config order.
/// For `{label: description}` entries both key and value count as label text.
pub fn flatten_region_labels(specs: &[RegionSpec]) -> Vec<String> {
    let mut out = Vec::new();
    for spec in specs {
        match spec {
            RegionSpec::Label(label) => out.push(label.clone()),
            RegionSpec::Described(map) => {
                for (label, description) in map {
                    out.push(label.clone());
                    out.extend(description.iter().cloned());
                }
            }
        }
    }
    out.retain(|s| !s.trim().is_empty());
    out
}

/// Owns the compiled term matchers for every region group.
#[derive(Debug)]
pub struct RegionClassifier {
    matchers: Vec<(RegionGroup, Regex)>,
}

impl Default for RegionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionClassifier {
    pub fn new() -> Self {
        let matchers = RegionGroup::ALL
            .iter()
            .map(|&g| {
                let alternation = g
                    .terms()
                    .iter()
                    .map(|t| regex::escape(t))
                    .collect::<Vec<_>>()
                    .join("|");
                let re = Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
                    .expect("region term regex");
                (g, re)
            })
            .collect();
        Self { matchers }
    }

    /// Groups referenced by the configured labels.
    pub fn configured_groups(&self, labels: &[String]) -> BTreeSet<RegionGroup> {
        labels
            .iter()
            .filter_map(|l| normalize_region_group(l))
            .collect()
    }

    /// Configured groups whose terms occur in `text`.
    pub fn matched_groups(
        &self,
        text: &str,
        configured: &BTreeSet<RegionGroup>,
    ) -> BTreeSet<RegionGroup> {
        if text.is_empty() {
            return BTreeSet::new();
        }
        self.matchers
            .iter()
            .filter(|(g, re)| configured.contains(g) && re.is_match(text))
            .map(|(g, _)| *g)
            .collect()
    }

    /// Convenience: classify `text` against raw configured labels.
    pub fn get_matched_region_groups(
        &self,
        text: &str,
        configured_labels: &[String],
    ) -> BTreeSet<RegionGroup> {
        let configured = self.configured_groups(configured_labels);
        self.matched_groups(text, &configured)
    }
}

/// Case-insensitive substring check of the literal labels, used when no
/// canonical group matched.
pub fn raw_label_match(text: &str, labels: &[String]) -> bool {
    let haystack = text.to_lowercase();
    labels.iter().any(|l| {
        let needle = l.trim().to_lowercase();
        !needle.is_empty() && haystack.contains(&needle)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const EAP_LABEL: &str =
        "East Asia and Pacific (EAP): Includes China, Indonesia, Pacific Island States, and Philippines.";

    #[test]
    fn code_in_parentheses_wins() {
        assert_eq!(normalize_region_group(EAP_LABEL), Some(RegionGroup::Eap));
        assert_eq!(
            normalize_region_group("Middle East, North Africa, Afghanistan and Pakistan (MENAP)"),
            Some(RegionGroup::Menap)
        );
    }

    #[test]
    fn whole_word_code_and_hints() {
        assert_eq!(normalize_region_group("ssa"), Some(RegionGroup::Ssa));
        assert_eq!(normalize_region_group("Latin America"), Some(RegionGroup::Lac));
        assert_eq!(normalize_region_group("the caribbean"), Some(RegionGroup::Lac));
        assert_eq!(normalize_region_group("South Asia"), Some(RegionGroup::Sar));
        assert_eq!(normalize_region_group("Sub-Saharan Africa"), Some(RegionGroup::Ssa));
        assert_eq!(normalize_region_group("Asia-Pacific"), Some(RegionGroup::Eap));
        // Code embedded in a longer word does not count.
        assert_eq!(normalize_region_group("LACONIC"), None);
        assert_eq!(normalize_region_group("Europe"), None);
    }

    #[test]
    fn flatten_handles_mixed_shapes() {
        let mut described = BTreeMap::new();
        described.insert("Latin America (LAC)".to_string(), Some("Includes Brazil".to_string()));
        let mut bare = BTreeMap::new();
        bare.insert("South Asia (SAR)".to_string(), None);
        let specs = vec![
            RegionSpec::Label("South Asia".into()),
            RegionSpec::Described(described),
            RegionSpec::Described(bare),
            RegionSpec::Label("  ".into()),
        ];
        assert_eq!(
            flatten_region_labels(&specs),
            vec!["South Asia", "Latin America (LAC)", "Includes Brazil", "South Asia (SAR)"]
        );
    }

    #[test]
    fn matches_terms_of_configured_groups_only() {
        let c = RegionClassifier::new();
        let labels = vec![EAP_LABEL.to_string()];
        let got = c.get_matched_region_groups("Rollout planned in Indonesia", &labels);
        assert_eq!(got.into_iter().collect::<Vec<_>>(), vec![RegionGroup::Eap]);

        // Kenya belongs to SSA, which is not configured.
        assert!(c.get_matched_region_groups("Works in Kenya", &labels).is_empty());
        assert!(c.get_matched_region_groups("Works in Germany", &labels).is_empty());
    }

    #[test]
    fn whole_word_case_insensitive() {
        let c = RegionClassifier::new();
        let labels = vec!["SSA".to_string()];
        assert!(!c.get_matched_region_groups("NIGER delta", &labels).is_empty());
        assert!(c.get_matched_region_groups("Nigerien", &labels).is_empty());
    }

    #[test]
    fn empty_inputs_never_fail() {
        let c = RegionClassifier::new();
        assert!(c.get_matched_region_groups("", &[]).is_empty());
        assert!(c.get_matched_region_groups("Indonesia", &[]).is_empty());
    }

    #[test]
    fn raw_label_fallback_is_substring() {
        let labels = vec!["Balkans".to_string()];
        assert!(raw_label_match("Programme across the balkans region", &labels));
        assert!(!raw_label_match("Programme in Germany", &labels));
    }
}
