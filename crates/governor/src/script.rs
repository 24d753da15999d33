//! Navigation-blocking script shipped to the embedded surface.
//!
//! The surface is cross-origin, so the only way this logic can run inside it
//! is if the other side cooperates: either a same-origin injection succeeds
//! (it normally does not) or the surface evaluates the `INSTALL_SCRIPT`
//! message. The script mirrors [`BlockPolicy`](crate::BlockPolicy).

use serde::Serialize;

use crate::policy::BlockedDomains;

pub const INSTALL_SCRIPT_TYPE: &str = "INSTALL_SCRIPT";

/// Global the script sets so that a second install is a no-op.
pub const INSTALL_GUARD_GLOBAL: &str = "__tabInterceptRunning";

const SCRIPT_TEMPLATE: &str = r#"
if (!window.__GUARD__) {
  window.__GUARD__ = true;
  const blockedDomains = __DOMAINS__;

  function shouldBlockUrl(url) {
    if (blockedDomains.length === 0) {
      return true;
    }
    try {
      let candidate;
      try {
        candidate = new URL(url);
      } catch (e) {
        return blockedDomains.some(domain => url.includes(domain));
      }
      return blockedDomains.some(domain => {
        try {
          return candidate.hostname === new URL(domain).hostname;
        } catch (e) {
          return candidate.hostname.includes(domain);
        }
      });
    } catch (e) {
      return true;
    }
  }

  const originalOpen = window.open;
  window.open = function(url, target, features) {
    if (url && shouldBlockUrl(String(url))) {
      return { closed: false, close: function() { this.closed = true; } };
    }
    return originalOpen.apply(this, arguments);
  };

  document.addEventListener('click', function(e) {
    let el = e.target;
    while (el && el.tagName !== 'A') {
      el = el.parentElement;
    }
    if (el && el.href && (el.target === '_blank' || el.getAttribute('rel') === 'noopener')) {
      if (shouldBlockUrl(el.href)) {
        e.preventDefault();
        e.stopPropagation();
        return false;
      }
    }
  }, true);
}
"#;

/// Render the script with `domains` embedded as a JSON array literal.
pub fn intercept_script(domains: &BlockedDomains) -> Result<String, serde_json::Error> {
    // A JSON array of strings is a valid JS array literal.
    let literal = serde_json::to_string(domains.as_slice())?;
    Ok(SCRIPT_TEMPLATE
        .replace("__GUARD__", INSTALL_GUARD_GLOBAL)
        .replace("__DOMAINS__", &literal))
}

/// Structured message posted to the surface. No reply is expected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SurfaceMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub script: String,
}

impl SurfaceMessage {
    pub fn install_script(domains: &BlockedDomains) -> Result<Self, serde_json::Error> {
        Ok(Self {
            kind: INSTALL_SCRIPT_TYPE,
            script: intercept_script(domains)?,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_embeds_domains_and_guard() {
        let domains = BlockedDomains::new(vec!["https://pay4link.com/".into()]);
        let script = intercept_script(&domains).unwrap();
        assert!(script.contains(r#"const blockedDomains = ["https://pay4link.com/"];"#));
        assert!(script.contains("if (!window.__tabInterceptRunning)"));
        assert!(!script.contains("__DOMAINS__"));
        assert!(!script.contains("__GUARD__"));
    }

    #[test]
    fn domains_are_escaped_as_json() {
        let domains = BlockedDomains::new(vec![r#"https://a.test/"quoted""#.into()]);
        let script = intercept_script(&domains).unwrap();
        assert!(script.contains(r#"["https://a.test/\"quoted\""]"#));
    }

    #[test]
    fn message_has_install_script_shape() {
        let msg = SurfaceMessage::install_script(&BlockedDomains::new(Vec::new())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "INSTALL_SCRIPT");
        assert!(value["script"].as_str().unwrap().contains("const blockedDomains = [];"));
        assert_eq!(value.as_object().unwrap().len(), 2);
    }
}
