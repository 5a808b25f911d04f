use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Descriptive information a host shows for an installed plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginMetadata {
    pub unique_id: &'static str,
    pub name: &'static str,
    pub author: &'static str,
    pub url: &'static str,
    pub version: Version,
    pub description: &'static str,
    /// Oldest host version the plugin runs on.
    pub required_version: Version,
    pub required_capabilities: Vec<String>,
}

impl PluginMetadata {
    pub fn nexmo() -> Self {
        Self {
            unique_id: "org.graylog.NexmoAlarmCallbackPlugin",
            name: "NexmoAlarmCallback",
            author: "Christiaan van Tienhoven",
            url: "https://www.graylog.org/",
            version: Version::new(1, 0, 0),
            description: "Alarm callback for calling the Nexmo SMS API.",
            required_version: Version::new(2, 0, 0),
            required_capabilities: Vec::new(),
        }
    }

    /// Whether a host at `host_version` can load the plugin.
    pub fn supports_host(&self, host_version: Version) -> bool {
        host_version >= self.required_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_plugin() {
        let meta = PluginMetadata::nexmo();
        assert_eq!(meta.unique_id, "org.graylog.NexmoAlarmCallbackPlugin");
        assert_eq!(meta.version.to_string(), "1.0.0");
        assert!(meta.required_capabilities.is_empty());
    }

    #[test]
    fn host_version_gate() {
        let meta = PluginMetadata::nexmo();
        assert!(meta.supports_host(Version::new(2, 0, 0)));
        assert!(meta.supports_host(Version::new(2, 4, 1)));
        assert!(!meta.supports_host(Version::new(1, 3, 9)));
    }
}
