use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::RelationshipType;

/// Top-level configuration for Marginalia
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarginaliaConfig {
    #[serde(default)]
    pub linking: LinkingConfig,
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Wiki link resolution and edge creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkingConfig {
    /// Relationship type given to edges derived from `[[...]]` references
    #[serde(default)]
    pub default_relationship: RelationshipType,
    /// Suggestions returned when the caller does not ask for a count
    #[serde(default = "default_autocomplete_limit")]
    pub autocomplete_limit: usize,
    /// Hard cap on suggestions regardless of what the caller asks for
    #[serde(default = "default_autocomplete_max")]
    pub autocomplete_max: usize,
    /// Drop references that resolve to the note being saved
    #[serde(default = "default_true")]
    pub skip_self_links: bool,
    /// Remove edges of the default relationship whose target is no longer
    /// referenced by the saved content
    #[serde(default)]
    pub prune_stale_links: bool,
}

/// Due-reminder listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log a summary line for every link synchronisation at info level
    #[serde(default = "default_true")]
    pub log_link_sync: bool,
}

fn default_true() -> bool {
    true
}

fn default_autocomplete_limit() -> usize {
    10
}

fn default_autocomplete_max() -> usize {
    20
}

fn default_page_size() -> usize {
    10
}

fn default_max_page_size() -> usize {
    100
}

impl Default for LinkingConfig {
    fn default() -> Self {
        Self {
            default_relationship: RelationshipType::RelatesTo,
            autocomplete_limit: default_autocomplete_limit(),
            autocomplete_max: default_autocomplete_max(),
            skip_self_links: true,
            prune_stale_links: false,
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_link_sync: true,
        }
    }
}

impl LinkingConfig {
    /// Effective suggestion count for a request
    pub fn suggestion_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.autocomplete_limit)
            .min(self.autocomplete_max)
    }
}

impl MarginaliaConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
