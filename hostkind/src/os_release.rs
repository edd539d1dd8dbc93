use std::collections::HashMap;
use std::io;
use std::path::Path;

/// Parsed view of an os-release file (`/etc/os-release`).
///
/// The format is line-oriented `KEY=VALUE`, with values optionally wrapped
/// in single or double quotes. Lines that do not fit the shape are skipped.
#[derive(Debug, Clone, Default)]
pub struct OsRelease {
    defs: HashMap<String, String>,
}

impl OsRelease {
    /// Parse os-release content. Pure; never fails.
    pub fn parse(content: &str) -> Self {
        let mut defs = HashMap::new();
        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').trim_matches('\'');
            defs.insert(key.trim().to_string(), value.to_string());
        }
        Self { defs }
    }

    /// Read and parse an os-release file.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::parse(&std::fs::read_to_string(path)?))
    }

    /// Distribution id (`ID` field), lowercased.
    pub fn id(&self) -> Option<String> {
        self.defs.get("ID").map(|v| v.to_lowercase())
    }

    /// Version (`VERSION_ID` field).
    pub fn version_id(&self) -> Option<&str> {
        self.defs.get("VERSION_ID").map(String::as_str)
    }

    /// Codename (`VERSION_CODENAME` field); empty string when absent.
    pub fn version_codename(&self) -> &str {
        self.defs
            .get("VERSION_CODENAME")
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Raw field lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.defs.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_quoted_and_bare_values() {
        let release = OsRelease::parse(
            "NAME=\"Ubuntu\"\nID=ubuntu\nVERSION_ID=\"20.04\"\nVERSION_CODENAME=focal\n",
        );
        assert_eq!(release.id().as_deref(), Some("ubuntu"));
        assert_eq!(release.version_id(), Some("20.04"));
        assert_eq!(release.version_codename(), "focal");
        assert_eq!(release.get("NAME"), Some("Ubuntu"));
    }

    #[test]
    fn strips_single_quotes_and_lowercases_id() {
        let release = OsRelease::parse("ID='CentOS'\n");
        assert_eq!(release.id().as_deref(), Some("centos"));
    }

    #[test]
    fn skips_lines_without_separator() {
        let release = OsRelease::parse("garbage line\n\nID=debian\n# comment\n");
        assert_eq!(release.id().as_deref(), Some("debian"));
        assert_eq!(release.get("garbage line"), None);
    }

    #[test]
    fn missing_fields_default_sensibly() {
        let release = OsRelease::parse("PRETTY_NAME=\"Something\"\n");
        assert_eq!(release.id(), None);
        assert_eq!(release.version_id(), None);
        assert_eq!(release.version_codename(), "");
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "ID=\"amzn\"\nVERSION_ID=\"2\"\n").expect("write");

        let release = OsRelease::load(file.path()).expect("load");
        assert_eq!(release.id().as_deref(), Some("amzn"));
        assert_eq!(release.version_id(), Some("2"));
    }

    #[test]
    fn load_propagates_missing_file() {
        assert!(OsRelease::load("/nonexistent/os-release").is_err());
    }
}
