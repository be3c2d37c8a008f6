//! Pipeline and view configuration.

use mailgraph_core::{Error, Result};
use mailgraph_incremental::DiffPolicy;

/// Days shown when no time range has been chosen yet.
pub const DEFAULT_INITIAL_DAYS: (i64, i64) = (0, 30);

/// Settings for a `CorrespondencePipeline`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    diff_policy: DiffPolicy,
    max_emails: Option<usize>,
    show_all_nodes: bool,
    initial_days: (i64, i64),
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            diff_policy: DiffPolicy::default(),
            max_emails: None,
            show_all_nodes: true,
            initial_days: DEFAULT_INITIAL_DAYS,
        }
    }
}

impl PipelineConfig {
    /// Starts building a configuration from the defaults.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }

    /// Returns which differ is used for person-level and branch diffs.
    #[inline]
    pub fn diff_policy(&self) -> DiffPolicy {
        self.diff_policy
    }

    /// Returns the maximum number of emails kept from a loaded dataset.
    #[inline]
    pub fn max_emails(&self) -> Option<usize> {
        self.max_emails
    }

    /// Returns whether every correspondent is shown initially, rather than
    /// only those with an email in the time window.
    #[inline]
    pub fn show_all_nodes(&self) -> bool {
        self.show_all_nodes
    }

    /// Returns the initial time window as day offsets `[begin, end)`.
    #[inline]
    pub fn initial_days(&self) -> (i64, i64) {
        self.initial_days
    }
}

/// Builder for `PipelineConfig`.
#[derive(Clone, Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn diff_policy(mut self, policy: DiffPolicy) -> Self {
        self.config.diff_policy = policy;
        self
    }

    /// Keeps only the `max` earliest emails of every loaded dataset.
    pub fn max_emails(mut self, max: usize) -> Self {
        self.config.max_emails = Some(max);
        self
    }

    pub fn show_all_nodes(mut self, show: bool) -> Self {
        self.config.show_all_nodes = show;
        self
    }

    pub fn initial_days(mut self, begin: i64, end: i64) -> Self {
        self.config.initial_days = (begin, end);
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<PipelineConfig> {
        if self.config.max_emails == Some(0) {
            return Err(Error::invalid_config("max_emails must be at least 1"));
        }
        let (begin, end) = self.config.initial_days;
        if begin > end {
            return Err(Error::invalid_config(alloc::format!(
                "initial day range is reversed: {}..{}",
                begin, end
            )));
        }
        Ok(self.config)
    }
}

/// Settings for the node-link view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeLinkOptions {
    /// Let the renderer run its physics simulation.
    pub physics: bool,
    /// Lay nodes out by title rank instead of on rings.
    pub hierarchical: bool,
    /// Nodes placed on each ring of the circular layout.
    pub max_nodes: usize,
}

impl Default for NodeLinkOptions {
    fn default() -> Self {
        Self {
            physics: true,
            hierarchical: false,
            max_nodes: 150,
        }
    }
}

impl NodeLinkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_physics(mut self, physics: bool) -> Self {
        self.physics = physics;
        self
    }

    pub fn with_hierarchical(mut self, hierarchical: bool) -> Self {
        self.hierarchical = hierarchical;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Checks that the options describe a usable layout.
    pub fn validate(&self) -> Result<()> {
        if self.max_nodes == 0 {
            return Err(Error::invalid_config("max_nodes must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::builder().build().unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.diff_policy(), DiffPolicy::Always);
        assert_eq!(config.max_emails(), None);
        assert!(config.show_all_nodes());
        assert_eq!(config.initial_days(), DEFAULT_INITIAL_DAYS);
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = PipelineConfig::builder()
            .diff_policy(DiffPolicy::OnChange)
            .max_emails(100)
            .show_all_nodes(false)
            .initial_days(5, 12)
            .build()
            .unwrap();

        assert_eq!(config.diff_policy(), DiffPolicy::OnChange);
        assert_eq!(config.max_emails(), Some(100));
        assert!(!config.show_all_nodes());
        assert_eq!(config.initial_days(), (5, 12));
    }

    #[test]
    fn test_builder_rejects_zero_emails() {
        let err = PipelineConfig::builder().max_emails(0).build().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_builder_rejects_reversed_days() {
        let err = PipelineConfig::builder().initial_days(10, 2).build().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_node_link_options() {
        let options = NodeLinkOptions::new().with_physics(false).with_max_nodes(20);
        assert!(!options.physics);
        assert!(!options.hierarchical);
        assert_eq!(options.max_nodes, 20);
        assert!(options.validate().is_ok());
        assert!(NodeLinkOptions::new().with_max_nodes(0).validate().is_err());
    }
}
