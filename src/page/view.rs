//! Assembles what a caller serves for one page request.

use serde::{Deserialize, Serialize};

use crate::error::PageError;
use crate::lock::LockRule;
use crate::object::{GameObject, parse_used_objects};

use super::Page;

/// Per-request input: who is reading and what they are using.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Player name bound to `.Name`.
    pub name: String,
    /// Objects in use, in the order the player supplied them.
    pub used: Vec<GameObject>,
}

impl PageRequest {
    /// Creates a request from a name and an already parsed object list.
    pub fn new(name: impl Into<String>, used: Vec<GameObject>) -> Self {
        Self {
            name: name.into(),
            used,
        }
    }

    /// Creates a request from a name and a `key=value; key2=value2` header.
    pub fn from_header(name: impl Into<String>, use_object: &str) -> Self {
        Self::new(name, parse_used_objects(use_object))
    }
}

/// A rendered page together with the metadata a client displays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    /// Page title.
    pub title: String,
    /// Display icon.
    pub icon: String,
    /// Rendered HTML body.
    pub text: String,
    /// Whether the editor affordance is shown.
    pub editor: bool,
    /// Objects granted by viewing the page.
    pub objects: Vec<GameObject>,
}

/// Runs the page request flow: metadata, lock decision, content.
///
/// A page without requirements is never locked and skips the lock rule
/// entirely.
///
/// # Errors
///
/// Returns the first [`PageError`] raised by metadata decoding or content
/// rendering, unchanged.
pub fn build_view(page: &Page, request: &PageRequest, rule: LockRule) -> Result<PageView, PageError> {
    let meta = page.meta()?;

    let locked = if meta.required.is_empty() {
        false
    } else {
        rule.evaluate(&meta.required, &request.used)
    };

    let text = page.content(&request.name, locked)?;

    if meta.title.is_empty() {
        tracing::warn!("serving page without a title");
    }
    tracing::debug!(title = %meta.title, locked, "built page view");

    Ok(PageView {
        title: meta.title,
        icon: meta.icon,
        text,
        editor: meta.editor,
        objects: meta.discovered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAULT: &str = "```
icon: fa-key
title: Vault
required:
  - name: key
    value: gold
discovered:
  - name: coin
    value: old
```
You see a vault. {{if .Locked}}It is locked.{{else}}It creaks open, {{.Name}}.{{end}}
";

    fn vault() -> Page {
        Page::from_reader(VAULT.as_bytes()).unwrap()
    }

    #[test]
    fn test_unlocked_view() {
        let request = PageRequest::from_header("Alex", "key=gold");
        let view = build_view(&vault(), &request, LockRule::FirstUsed).unwrap();
        assert_eq!(view.title, "Vault");
        assert_eq!(view.icon, "fa-key");
        assert!(!view.editor);
        assert!(view.text.contains("It creaks open, Alex."));
        assert!(!view.text.contains("locked"));
        assert_eq!(view.objects, vec![GameObject::new("coin", "old")]);
    }

    #[test]
    fn test_locked_view() {
        let request = PageRequest::new("Alex", Vec::new());
        let view = build_view(&vault(), &request, LockRule::FirstUsed).unwrap();
        assert!(view.text.contains("It is locked."));
        assert!(!view.text.contains("creaks"));
    }

    #[test]
    fn test_rule_changes_outcome_for_later_match() {
        let request = PageRequest::from_header("Alex", "note=torn; key=gold");
        let first = build_view(&vault(), &request, LockRule::FirstUsed).unwrap();
        assert!(first.text.contains("It is locked."));
        let any = build_view(&vault(), &request, LockRule::AnyUsed).unwrap();
        assert!(any.text.contains("It creaks open, Alex."));
    }

    #[test]
    fn test_page_without_requirements_never_locked() {
        let page = Page::from_reader("```\ntitle: Hall\n```\n{{if .Locked}}shut{{else}}open{{end}}".as_bytes())
            .unwrap();
        let view = build_view(&page, &PageRequest::default(), LockRule::FirstUsed).unwrap();
        assert_eq!(view.text, "<p>open</p>\n");
    }

    #[test]
    fn test_json_shape() {
        let view = build_view(&vault(), &PageRequest::default(), LockRule::FirstUsed).unwrap();
        let json = serde_json::to_value(&view).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["editor", "icon", "objects", "text", "title"]);
        assert_eq!(json["objects"][0]["name"], "coin");
        assert_eq!(json["objects"][0]["value"], "old");
    }

    #[test]
    fn test_errors_surface_unchanged() {
        let page = Page::from_reader("```\ntitle: x\n```\n{{.Nope}}".as_bytes()).unwrap();
        let err = build_view(&page, &PageRequest::default(), LockRule::FirstUsed).unwrap_err();
        assert!(matches!(err, PageError::Template(_)));

        let err = build_view(&Page::new(), &PageRequest::default(), LockRule::FirstUsed).unwrap_err();
        assert!(matches!(err, PageError::NotParsed));
    }
}
