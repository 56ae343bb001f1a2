use crate::error::{PublishError, Result};
use std::fmt;

/// Document version as tracked through git tags.
///
/// `major.minor` is persisted as an annotated tag (`v1.3`); `commits` counts
/// the commits made on top of that tag and is derived from describe output,
/// never persisted itself. Values are immutable: [Version::apply] returns a
/// new version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub commits: u32,
}

/// How the next version is derived from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionPolicy {
    /// Keep major.minor, count one more commit on top of the tag
    Retain,
    Minor,
    Major,
}

impl VersionPolicy {
    /// True for the levels that move the tagged version boundary
    pub fn advances_tag(&self) -> bool {
        matches!(self, VersionPolicy::Minor | VersionPolicy::Major)
    }
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, commits: u32) -> Self {
        Version {
            major,
            minor,
            commits,
        }
    }

    /// Parse the canonical textual form `v<major>.<minor>-<commits>`
    pub fn parse(text: &str) -> Result<Self> {
        let rest = text.strip_prefix('v').ok_or_else(|| {
            PublishError::version(format!("'{}' - expected leading 'v'", text))
        })?;

        let (pair, commits) = rest.split_once('-').ok_or_else(|| {
            PublishError::version(format!("'{}' - expected vX.Y-N", text))
        })?;
        let (major, minor) = pair.split_once('.').ok_or_else(|| {
            PublishError::version(format!("'{}' - expected vX.Y-N", text))
        })?;

        let major = major
            .parse::<u32>()
            .map_err(|_| PublishError::version(format!("Invalid major version: {}", major)))?;
        let minor = minor
            .parse::<u32>()
            .map_err(|_| PublishError::version(format!("Invalid minor version: {}", minor)))?;
        let commits = commits
            .parse::<u32>()
            .map_err(|_| PublishError::version(format!("Invalid commit count: {}", commits)))?;

        Ok(Version {
            major,
            minor,
            commits,
        })
    }

    /// Derive the next version under a policy.
    ///
    /// The commit count resets whenever major or minor moves; major and minor
    /// never decrease.
    pub fn apply(&self, policy: VersionPolicy) -> Self {
        match policy {
            VersionPolicy::Major => Version {
                major: self.major + 1,
                minor: 0,
                commits: 0,
            },
            VersionPolicy::Minor => Version {
                major: self.major,
                minor: self.minor + 1,
                commits: 0,
            },
            VersionPolicy::Retain => Version {
                major: self.major,
                minor: self.minor,
                commits: self.commits + 1,
            },
        }
    }

    /// The annotated-tag name for this version boundary (e.g. "v1.3")
    pub fn tag_name(&self) -> String {
        format!("v{}.{}", self.major, self.minor)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}-{}", self.major, self.minor, self.commits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("v1.2-5").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.commits, 5);
    }

    #[test]
    fn test_version_parse_rejects_missing_prefix() {
        assert!(Version::parse("1.2-5").is_err());
        assert!(Version::parse("x1.2-5").is_err());
    }

    #[test]
    fn test_version_parse_rejects_wrong_shape() {
        assert!(Version::parse("v1.2").is_err());
        assert!(Version::parse("v1-2").is_err());
        assert!(Version::parse("v1.2-").is_err());
        assert!(Version::parse("v1.2-abc").is_err());
    }

    #[test]
    fn test_version_round_trip() {
        for v in [
            Version::new(0, 0, 0),
            Version::new(1, 2, 5),
            Version::new(10, 0, 123),
        ] {
            assert_eq!(Version::parse(&v.to_string()).unwrap(), v);
        }
    }

    #[test]
    fn test_apply_minor() {
        let v = Version::new(1, 2, 5);
        assert_eq!(v.apply(VersionPolicy::Minor), Version::new(1, 3, 0));
    }

    #[test]
    fn test_apply_major() {
        let v = Version::new(1, 2, 5);
        assert_eq!(v.apply(VersionPolicy::Major), Version::new(2, 0, 0));
    }

    #[test]
    fn test_apply_retain() {
        let v = Version::new(1, 2, 5);
        assert_eq!(v.apply(VersionPolicy::Retain), Version::new(1, 2, 6));
    }

    #[test]
    fn test_display() {
        assert_eq!(Version::new(1, 3, 0).to_string(), "v1.3-0");
    }

    #[test]
    fn test_tag_name_omits_commit_count() {
        assert_eq!(Version::new(1, 3, 7).tag_name(), "v1.3");
    }

    #[test]
    fn test_advancing_policies() {
        assert!(VersionPolicy::Minor.advances_tag());
        assert!(VersionPolicy::Major.advances_tag());
        assert!(!VersionPolicy::Retain.advances_tag());
    }
}
