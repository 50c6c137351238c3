//! Query enhancement - appends retrieval anchors to short or colloquial queries

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Trigger substring and the phrase appended when it matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancementRule {
    pub trigger: String,
    pub phrase: String,
}

impl EnhancementRule {
    pub fn new(trigger: impl Into<String>, phrase: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            phrase: phrase.into(),
        }
    }
}

/// How many rules may fire for a single query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Only the first matching rule in table order is applied
    #[default]
    FirstMatch,
    /// Every matching rule is applied, in table order
    AllMatches,
}

/// Data-driven enhancement table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancerRules {
    #[serde(default)]
    pub mode: MatchMode,
    #[serde(default)]
    pub rules: Vec<EnhancementRule>,
    #[serde(default)]
    pub domain_indicators: Vec<String>,
    #[serde(default)]
    pub domain_context: String,
}

impl Default for EnhancerRules {
    fn default() -> Self {
        let rules = [
            ("find", "product research strategy method finding"),
            ("winning", "winning product criteria validation"),
            ("viral", "viral content video strategy views"),
            ("tiktok", "tiktok organic content video strategy"),
            ("supplier", "supplier sourcing fulfillment shipping"),
            ("scale", "scaling growth revenue strategy"),
            ("store", "store setup conversion optimization"),
            ("start", "beginner getting started fundamentals"),
        ]
        .into_iter()
        .map(|(trigger, phrase)| EnhancementRule::new(trigger, phrase))
        .collect();

        Self {
            mode: MatchMode::FirstMatch,
            rules,
            domain_indicators: ["dropship", "shopify", "ecommerce", "e-commerce", "organic"]
                .into_iter()
                .map(String::from)
                .collect(),
            domain_context: "organic dropshipping ecommerce".to_string(),
        }
    }
}

impl EnhancerRules {
    /// Parse a rules table from TOML
    pub fn from_toml_str(source: &str) -> Result<Self, DomainError> {
        let rules: Self = toml::from_str(source).map_err(|e| {
            DomainError::configuration(format!("Invalid enhancer rules: {}", e))
        })?;

        rules.validate()?;
        Ok(rules)
    }

    /// Load a rules table from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self, DomainError> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            DomainError::configuration(format!(
                "Failed to read enhancer rules from {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml_str(&source)
    }

    fn validate(&self) -> Result<(), DomainError> {
        if let Some(rule) = self.rules.iter().find(|r| r.trigger.trim().is_empty()) {
            return Err(DomainError::configuration(format!(
                "Enhancer rule with phrase '{}' has an empty trigger",
                rule.phrase
            )));
        }

        if self.domain_indicators.iter().any(|d| d.trim().is_empty()) {
            return Err(DomainError::configuration(
                "Enhancer domain indicators must not be empty strings",
            ));
        }

        Ok(())
    }
}

/// Rewrites raw user queries into more retrieval-friendly text
#[derive(Debug, Clone, Default)]
pub struct QueryEnhancer {
    rules: EnhancerRules,
}

impl QueryEnhancer {
    pub fn new(rules: EnhancerRules) -> Self {
        // Triggers and indicators are compared against lower-cased input
        let rules = EnhancerRules {
            rules: rules
                .rules
                .into_iter()
                .map(|r| EnhancementRule::new(r.trigger.to_lowercase(), r.phrase))
                .collect(),
            domain_indicators: rules
                .domain_indicators
                .into_iter()
                .map(|d| d.to_lowercase())
                .collect(),
            ..rules
        };

        Self { rules }
    }

    pub fn rules(&self) -> &EnhancerRules {
        &self.rules
    }

    /// Append the matching enhancement phrase(s) and, when the query carries
    /// no domain term, the domain-context phrase
    pub fn enhance(&self, query: &str) -> String {
        let lowered = query.to_lowercase();
        let mut parts: Vec<&str> = vec![query];

        let mut matching = self
            .rules
            .rules
            .iter()
            .filter(|rule| lowered.contains(rule.trigger.as_str()));

        match self.rules.mode {
            MatchMode::FirstMatch => {
                if let Some(rule) = matching.next() {
                    parts.push(&rule.phrase);
                }
            }
            MatchMode::AllMatches => parts.extend(matching.map(|rule| rule.phrase.as_str())),
        }

        let has_domain_term = self
            .rules
            .domain_indicators
            .iter()
            .any(|indicator| lowered.contains(indicator.as_str()));

        if !has_domain_term && !self.rules.domain_context.is_empty() {
            parts.push(&self.rules.domain_context);
        }

        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enhancer() -> QueryEnhancer {
        QueryEnhancer::default()
    }

    #[test]
    fn test_find_trigger_and_domain_context() {
        assert_eq!(
            enhancer().enhance("how to find winning products"),
            "how to find winning products product research strategy method finding organic dropshipping ecommerce"
        );
    }

    #[test]
    fn test_first_match_wins() {
        let enhanced = enhancer().enhance("how to find winning products");

        assert_eq!(enhanced.matches("product research strategy method finding").count(), 1);
        assert!(!enhanced.contains("winning product criteria validation"));
    }

    #[test]
    fn test_domain_context_appended_without_domain_terms() {
        let enhanced = enhancer().enhance("what is profit margin");

        assert_eq!(enhanced, "what is profit margin organic dropshipping ecommerce");
        assert!(enhanced.ends_with("organic dropshipping ecommerce"));
    }

    #[test]
    fn test_domain_context_skipped_with_domain_terms() {
        let enhanced = enhancer().enhance("best shopify dropshipping supplier");

        assert!(!enhanced.ends_with("organic dropshipping ecommerce"));
        assert_eq!(
            enhanced,
            "best shopify dropshipping supplier supplier sourcing fulfillment shipping"
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let enhanced = enhancer().enhance("FIND Products On SHOPIFY");

        assert_eq!(
            enhanced,
            "FIND Products On SHOPIFY product research strategy method finding"
        );
    }

    #[test]
    fn test_empty_query_gets_domain_context_only() {
        assert_eq!(enhancer().enhance(""), " organic dropshipping ecommerce");
    }

    #[test]
    fn test_input_is_left_intact() {
        let query = String::from("Find a supplier");
        let enhanced = enhancer().enhance(&query);

        assert_eq!(query, "Find a supplier");
        assert!(enhanced.starts_with("Find a supplier "));
    }

    #[test]
    fn test_all_matches_mode() {
        let rules = EnhancerRules {
            mode: MatchMode::AllMatches,
            ..EnhancerRules::default()
        };
        let enhanced = QueryEnhancer::new(rules).enhance("find winning products");

        assert_eq!(
            enhanced,
            "find winning products product research strategy method finding winning product criteria validation organic dropshipping ecommerce"
        );
    }

    #[test]
    fn test_rules_from_toml() {
        let rules = EnhancerRules::from_toml_str(
            r#"
            mode = "first_match"
            domain_indicators = ["Shopify"]
            domain_context = "ecommerce"

            [[rules]]
            trigger = "ADS"
            phrase = "paid advertising"
            "#,
        )
        .unwrap();

        let enhancer = QueryEnhancer::new(rules);

        assert_eq!(enhancer.enhance("running ads"), "running ads paid advertising ecommerce");
        assert_eq!(enhancer.enhance("shopify ads"), "shopify ads paid advertising");
    }

    #[test]
    fn test_rules_from_toml_rejects_empty_trigger() {
        let result = EnhancerRules::from_toml_str(
            r#"
            [[rules]]
            trigger = " "
            phrase = "anything"
            "#,
        );

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_rules_from_toml_rejects_garbage() {
        assert!(EnhancerRules::from_toml_str("rules = 3").is_err());
    }

    #[test]
    fn test_sample_rules_file_matches_builtin_table() {
        let rules =
            EnhancerRules::from_toml_str(include_str!("../../../config/enhancer-rules.toml"))
                .unwrap();

        assert_eq!(rules, EnhancerRules::default());
    }
}
