//! Navigation blocking policy.
//!
//! The policy is derived once from the blocked-domain list and never changes
//! for the lifetime of a mount. Classification is pure: the same list and the
//! same candidate always produce the same answer.

use url::Url;

/// Origin used when the page parameters do not name any blocked domains.
pub const DEFAULT_BLOCKED_DOMAIN: &str = "https://pay4link.com/";

/// Ordered list of blocked origin strings, as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockedDomains(Vec<String>);

impl BlockedDomains {
    pub fn new(domains: Vec<String>) -> Self {
        Self(domains)
    }

    /// The built-in list used when no list was supplied.
    pub fn builtin() -> Self {
        Self(vec![DEFAULT_BLOCKED_DOMAIN.to_string()])
    }

    /// Parse a JSON array of strings.
    ///
    /// Malformed input is an error, and so is well-formed JSON of any other
    /// shape (`["a", 1]`, an object, a bare string); callers must not fall back to
    /// [`BlockedDomains::builtin`] when a value was explicitly supplied.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Vec<String>>(raw).map(Self)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Default for BlockedDomains {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct BlockedEntry {
    raw: String,
    /// Hostname of `raw` if it parses as an absolute URL.
    host: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Rule {
    BlockAll,
    Listed(Vec<BlockedEntry>),
}

/// Decides whether an attempted new-window navigation is suppressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockPolicy {
    rule: Rule,
}

impl BlockPolicy {
    pub fn new(domains: &BlockedDomains) -> Self {
        if domains.is_empty() {
            return Self {
                rule: Rule::BlockAll,
            };
        }

        let entries = domains
            .as_slice()
            .iter()
            .map(|raw| BlockedEntry {
                raw: raw.clone(),
                host: Url::parse(raw)
                    .ok()
                    .map(|u| u.host_str().unwrap_or("").to_string()),
            })
            .collect();

        Self {
            rule: Rule::Listed(entries),
        }
    }

    pub fn blocks_everything(&self) -> bool {
        matches!(self.rule, Rule::BlockAll)
    }

    /// Classify a navigation target.
    ///
    /// - empty list: every target is blocked
    /// - target parses: blocked iff its hostname equals an entry's hostname
    ///   (entries that are not URLs match when the hostname contains them)
    /// - target does not parse: blocked iff it contains an entry verbatim
    pub fn should_block(&self, target: &str) -> bool {
        let entries = match &self.rule {
            Rule::BlockAll => return true,
            Rule::Listed(entries) => entries,
        };

        let Ok(candidate) = Url::parse(target) else {
            return entries.iter().any(|e| target.contains(e.raw.as_str()));
        };
        let host = candidate.host_str().unwrap_or("");

        entries.iter().any(|e| match &e.host {
            Some(blocked) => host == blocked,
            None => host.contains(e.raw.as_str()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(domains: &[&str]) -> BlockPolicy {
        BlockPolicy::new(&BlockedDomains::new(
            domains.iter().map(|s| s.to_string()).collect(),
        ))
    }

    #[test]
    fn blocks_matching_hostname() {
        let p = policy(&["https://pay4link.com/"]);
        assert!(p.should_block("https://pay4link.com/xyz?ref=1"));
        assert!(p.should_block("http://pay4link.com"));
    }

    #[test]
    fn allows_other_hostnames() {
        let p = policy(&["https://pay4link.com/"]);
        assert!(!p.should_block("https://example.com/"));
        // Exact hostname match only; subdomains are different hosts.
        assert!(!p.should_block("https://ads.pay4link.com/"));
    }

    #[test]
    fn empty_list_blocks_everything() {
        let p = policy(&[]);
        assert!(p.blocks_everything());
        assert!(p.should_block("https://example.com/"));
        assert!(p.should_block("not a url"));
        assert!(p.should_block(""));
    }

    #[test]
    fn unparseable_target_falls_back_to_substring() {
        let p = policy(&["https://pay4link.com/"]);
        assert!(p.should_block("//https://pay4link.com/x"));
        assert!(!p.should_block("/relative/path"));
        assert!(!p.should_block("pay4link.com/xyz"));
    }

    #[test]
    fn bare_entry_matches_hostname_containment() {
        let p = policy(&["pay4link"]);
        assert!(p.should_block("https://www.pay4link.com/"));
        assert!(!p.should_block("https://example.com/?pay4link"));
    }

    #[test]
    fn any_entry_may_match() {
        let p = policy(&["https://a.test/", "https://b.test/"]);
        assert!(p.should_block("https://b.test/page"));
        assert!(!p.should_block("https://c.test/page"));
    }

    #[test]
    fn classification_is_deterministic() {
        let p = policy(&["https://pay4link.com/"]);
        let target = "https://pay4link.com/xyz?ref=1";
        let first = p.should_block(target);
        for _ in 0..10 {
            assert_eq!(p.should_block(target), first);
        }
    }

    #[test]
    fn parses_json_lists() {
        let d = BlockedDomains::from_json(r#"["https://a.test/","https://b.test/"]"#).unwrap();
        assert_eq!(d.len(), 2);
        assert!(BlockedDomains::from_json("[]").unwrap().is_empty());
        assert!(BlockedDomains::from_json("not json").is_err());
        assert!(BlockedDomains::from_json(r#"{"a":1}"#).is_err());
    }

    #[test]
    fn non_string_entries_are_rejected() {
        assert!(BlockedDomains::from_json(r#"["https://a.test/", 1]"#).is_err());
        assert!(BlockedDomains::from_json(r#""https://a.test/""#).is_err());
    }
}
