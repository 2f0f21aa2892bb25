//! YAML configuration for the harness.
//!
//! Every field is optional in the file; command-line flags override whatever
//! the file sets.
//!
//! ```yaml
//! capacity: 4096
//! fifo: /var/spool/syslog-notify
//! template:
//!   prefix: "Jan  1 00:00:00 test cram_buffer.py: number "
//!   width: 3
//!   suffix: "\n"
//! ```

use anyhow::Context;
use boundary_gen::FixedWidthTemplate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// `PIPE_BUF` on Linux: the most a consumer gets from one read of a pipe
/// written atomically.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Where syslog-notify reads its messages from.
pub const DEFAULT_FIFO: &str = "/var/spool/syslog-notify";

/// Line template as it appears in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub prefix: String,
    /// Digit width of the zero-padded index
    pub width: usize,
    pub suffix: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        let filler = FixedWidthTemplate::syslog_filler();
        Self {
            prefix: filler.prefix().to_string(),
            width: filler.width(),
            suffix: filler.suffix().to_string(),
        }
    }
}

impl From<&FixedWidthTemplate> for TemplateConfig {
    fn from(t: &FixedWidthTemplate) -> Self {
        Self {
            prefix: t.prefix().to_string(),
            width: t.width(),
            suffix: t.suffix().to_string(),
        }
    }
}

/// Complete harness configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Consumer read buffer size in bytes
    pub capacity: usize,
    /// Path the batch is written to
    pub fifo: PathBuf,
    pub template: TemplateConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            fifo: PathBuf::from(DEFAULT_FIFO),
            template: TemplateConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: HarnessConfig = serde_yaml_ng::from_str(content)?;
        Ok(config)
    }

    /// Defaults, then the file if given, then the command-line overrides.
    pub fn resolve(
        path: Option<&Path>,
        capacity: Option<usize>,
        fifo: Option<PathBuf>,
        template: Option<FixedWidthTemplate>,
    ) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        config.apply_overrides(capacity, fifo, template);
        tracing::debug!(
            capacity = config.capacity,
            fifo = %config.fifo.display(),
            "resolved harness config"
        );
        Ok(config)
    }

    pub fn apply_overrides(
        &mut self,
        capacity: Option<usize>,
        fifo: Option<PathBuf>,
        template: Option<FixedWidthTemplate>,
    ) {
        if let Some(c) = capacity {
            self.capacity = c;
        }
        if let Some(f) = fifo {
            self.fifo = f;
        }
        if let Some(t) = template {
            self.template = TemplateConfig::from(&t);
        }
    }

    pub fn template(&self) -> FixedWidthTemplate {
        FixedWidthTemplate::new(
            self.template.prefix.clone(),
            self.template.width,
            self.template.suffix.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_is_default() {
        let config = HarnessConfig::from_yaml("{}").unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.capacity, 4096);
        assert_eq!(config.template(), FixedWidthTemplate::syslog_filler());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
capacity: 512
template:
  prefix: "line "
  width: 4
"#;
        let config = HarnessConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.capacity, 512);
        assert_eq!(config.fifo, PathBuf::from(DEFAULT_FIFO));
        let t = config.template();
        assert_eq!(t.prefix(), "line ");
        assert_eq!(t.width(), 4);
        assert_eq!(t.suffix(), "\n");
    }

    #[test]
    fn test_overrides_win() {
        let mut config = HarnessConfig::from_yaml("capacity: 512\nfifo: /tmp/a").unwrap();
        config.apply_overrides(
            Some(1000),
            None,
            Some(FixedWidthTemplate::new("x", 2, ";")),
        );
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.fifo, PathBuf::from("/tmp/a"));
        assert_eq!(config.template().message_length(), 4);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = HarnessConfig::default();
        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        assert_eq!(HarnessConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_invalid_yaml_errors() {
        assert!(HarnessConfig::from_yaml("capacity: lots").is_err());
    }
}
