//! Records returned to the host tool.

use serde::{Deserialize, Serialize};

/// Status snapshot of a ledger instance: application, API, and platform
/// versions plus the host OS and database driver.
///
/// Produced fresh on every fetch and always fully populated; a fetch that
/// cannot fill every field fails instead of returning a partial record.
///
/// Serialized with the host's flat attribute names (`php_version`, `driver`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Application version, e.g. `"6.1.0"`.
    pub version: String,
    /// REST API version, e.g. `"2.0.0"`.
    pub api_version: String,
    /// Version of the platform runtime the service runs on.
    #[serde(rename = "php_version")]
    pub platform_version: String,
    /// Operating system of the service host.
    pub os: String,
    /// Database driver in use, e.g. `"mysql"`.
    #[serde(rename = "driver")]
    pub db_driver: String,
}

impl SystemInfo {
    /// Attribute names of the flat record, in output order.
    pub const ATTRIBUTE_NAMES: [&'static str; 5] =
        ["version", "api_version", "php_version", "os", "driver"];

    /// Returns the record as ordered `(attribute, value)` pairs.
    pub fn attributes(&self) -> [(&'static str, &str); 5] {
        let [version, api_version, php_version, os, driver] = Self::ATTRIBUTE_NAMES;
        [
            (version, self.version.as_str()),
            (api_version, self.api_version.as_str()),
            (php_version, self.platform_version.as_str()),
            (os, self.os.as_str()),
            (driver, self.db_driver.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SystemInfo {
        SystemInfo {
            version: "6.1.0".into(),
            api_version: "2.0.0".into(),
            platform_version: "8.2".into(),
            os: "Linux".into(),
            db_driver: "mysql".into(),
        }
    }

    #[test]
    fn test_serializes_with_host_attribute_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "version": "6.1.0",
                "api_version": "2.0.0",
                "php_version": "8.2",
                "os": "Linux",
                "driver": "mysql",
            })
        );
    }

    #[test]
    fn test_attributes_follow_attribute_names() {
        let info = sample();
        let attributes = info.attributes();
        let names: Vec<_> = attributes.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, SystemInfo::ATTRIBUTE_NAMES);
        assert_eq!(attributes[2], ("php_version", "8.2"));
        assert_eq!(attributes[4], ("driver", "mysql"));
    }
}
