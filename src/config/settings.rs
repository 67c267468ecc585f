//! User settings schema.

use serde::Deserialize;

use crate::platform::Os;

/// Effective defaults for command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub node: String,
    pub npm: String,
    pub with_npm: bool,
    pub jobs: u32,
    pub without_ssl: bool,
    pub debug: bool,
    pub profile: bool,
    pub make: String,
    pub prebuilt: bool,
    pub ignore_ssl_certs: bool,
    pub mirror: Option<String>,
}

impl Settings {
    /// Built-in defaults for a host running `os`.
    pub fn defaults(os: Os) -> Self {
        Self {
            node: "latest".to_string(),
            npm: "latest".to_string(),
            with_npm: false,
            jobs: 2,
            without_ssl: false,
            debug: false,
            profile: false,
            make: os.default_make().to_string(),
            prebuilt: true,
            ignore_ssl_certs: false,
            mirror: None,
        }
    }

    /// Apply every key present in `file`.
    pub fn merge(&mut self, file: SettingsFile) {
        let SettingsFile {
            node,
            npm,
            with_npm,
            jobs,
            without_ssl,
            debug,
            profile,
            make,
            prebuilt,
            ignore_ssl_certs,
            mirror,
        } = file;

        if let Some(v) = node {
            self.node = v;
        }
        if let Some(v) = npm {
            self.npm = v;
        }
        if let Some(v) = with_npm {
            self.with_npm = v;
        }
        if let Some(v) = jobs {
            self.jobs = v;
        }
        if let Some(v) = without_ssl {
            self.without_ssl = v;
        }
        if let Some(v) = debug {
            self.debug = v;
        }
        if let Some(v) = profile {
            self.profile = v;
        }
        if let Some(v) = make {
            self.make = v;
        }
        if let Some(v) = prebuilt {
            self.prebuilt = v;
        }
        if let Some(v) = ignore_ssl_certs {
            self.ignore_ssl_certs = v;
        }
        if mirror.is_some() {
            self.mirror = mirror;
        }
    }
}

/// Contents of a settings file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    /// Versions may be written as bare numbers (`node: 18`).
    #[serde(deserialize_with = "scalar_string")]
    pub node: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub npm: Option<String>,
    pub with_npm: Option<bool>,
    pub jobs: Option<u32>,
    pub without_ssl: Option<bool>,
    pub debug: Option<bool>,
    pub profile: Option<bool>,
    pub make: Option<String>,
    pub prebuilt: Option<bool>,
    pub ignore_ssl_certs: Option<bool>,
    pub mirror: Option<String>,
}

fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(u64),
        Float(f64),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| match s {
        Scalar::Text(t) => t,
        Scalar::Integer(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_host() {
        let linux = Settings::defaults(Os::Linux);
        assert_eq!(linux.node, "latest");
        assert_eq!(linux.npm, "latest");
        assert_eq!(linux.jobs, 2);
        assert_eq!(linux.make, "make");
        assert!(linux.prebuilt);
        assert!(!linux.with_npm);

        assert_eq!(Settings::defaults(Os::FreeBsd).make, "gmake");
    }

    #[test]
    fn merge_only_touches_present_keys() {
        let mut settings = Settings::defaults(Os::Linux);
        settings.merge(SettingsFile {
            jobs: Some(8),
            mirror: Some("npm.some-mirror.com".into()),
            ..Default::default()
        });

        assert_eq!(settings.jobs, 8);
        assert_eq!(settings.mirror.as_deref(), Some("npm.some-mirror.com"));
        assert_eq!(settings.node, "latest");
        assert!(settings.prebuilt);
    }

    #[test]
    fn numeric_versions_parse_as_strings() {
        let file: SettingsFile = serde_yaml::from_str("node: 18\nnpm: 9.6\n").unwrap();
        assert_eq!(file.node.as_deref(), Some("18"));
        assert_eq!(file.npm.as_deref(), Some("9.6"));
    }
}
