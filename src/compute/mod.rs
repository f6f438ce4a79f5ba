//! Compute API seam.
//!
//! Everything the tool needs from the cloud provider goes through the
//! [`FirewallApi`] trait: list a page of rules, insert a rule, delete a
//! rule by name. [`ComputeClient`] is the REST implementation; tests
//! substitute an in-memory one.

mod client;
mod credentials;

pub use client::ComputeClient;
pub use credentials::AccessToken;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::rule::RuleDescriptor;
use crate::Result;

/// Firewall rule operations of a compute project.
///
/// Every call is a single blocking round-trip. Implementations do not
/// retry.
pub trait FirewallApi {
    /// Fetch one page of rules, starting at `page_token` if given.
    fn list_rules(&self, project: &str, page_token: Option<&str>) -> Result<FirewallPage>;

    /// Create a rule.
    fn insert_rule(&self, project: &str, rule: &RuleDescriptor) -> Result<Operation>;

    /// Delete the rule called `rule_name`.
    fn delete_rule(&self, project: &str, rule_name: &str) -> Result<Operation>;
}

/// One page of a firewall list response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallPage {
    /// Rules on this page, kept as returned
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Acknowledgment of an insert or delete request.
///
/// The common fields are typed; everything else the API returns is kept
/// in `extra` so the echoed result is complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_link: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Iterator over every rule in a project, fetching pages on demand.
///
/// The next page is requested only once the current one is drained. A
/// page with no items just advances to the next token. Iteration stops
/// after the first error.
pub struct RuleLister<'a, A: FirewallApi + ?Sized> {
    api: &'a A,
    project: &'a str,
    buffer: std::vec::IntoIter<Value>,
    next_token: Option<String>,
    done: bool,
    pages: usize,
}

impl<'a, A: FirewallApi + ?Sized> RuleLister<'a, A> {
    pub fn new(api: &'a A, project: &'a str) -> Self {
        Self {
            api,
            project,
            buffer: Vec::new().into_iter(),
            next_token: None,
            done: false,
            pages: 0,
        }
    }

    /// Number of pages fetched so far.
    pub fn pages(&self) -> usize {
        self.pages
    }
}

impl<'a, A: FirewallApi + ?Sized> Iterator for RuleLister<'a, A> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.next() {
                return Some(Ok(item));
            }
            if self.done {
                return None;
            }

            match self.api.list_rules(self.project, self.next_token.as_deref()) {
                Ok(page) => {
                    self.pages += 1;
                    log::debug!(
                        "Fetched page {} with {} rules",
                        self.pages,
                        page.items.len()
                    );
                    // An empty token means the same as no token.
                    self.next_token = page.next_page_token.filter(|t| !t.is_empty());
                    self.done = self.next_token.is_none();
                    self.buffer = page.items.into_iter();
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;
    use std::cell::RefCell;

    /// Serves canned pages keyed by the token that requests them.
    struct PagedApi {
        pages: Vec<(Option<&'static str>, Result<FirewallPage>)>,
        requested: RefCell<Vec<Option<String>>>,
    }

    impl PagedApi {
        fn new(pages: Vec<(Option<&'static str>, Result<FirewallPage>)>) -> Self {
            Self {
                pages,
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl FirewallApi for PagedApi {
        fn list_rules(&self, _project: &str, page_token: Option<&str>) -> Result<FirewallPage> {
            self.requested
                .borrow_mut()
                .push(page_token.map(str::to_string));
            let idx = self
                .pages
                .iter()
                .position(|(t, _)| *t == page_token)
                .expect("unexpected page token");
            match &self.pages[idx].1 {
                Ok(page) => Ok(page.clone()),
                Err(_) => Err(Error::Remote {
                    status: 500,
                    message: "backend".to_string(),
                }),
            }
        }

        fn insert_rule(&self, _project: &str, _rule: &RuleDescriptor) -> Result<Operation> {
            unreachable!()
        }

        fn delete_rule(&self, _project: &str, _rule_name: &str) -> Result<Operation> {
            unreachable!()
        }
    }

    fn page(items: Vec<Value>, next: Option<&str>) -> FirewallPage {
        FirewallPage {
            items,
            next_page_token: next.map(str::to_string),
        }
    }

    #[test]
    fn test_lister_follows_tokens() {
        let api = PagedApi::new(vec![
            (None, Ok(page(vec![json!({"name": "a"}), json!({"name": "b"})], Some("t1")))),
            (Some("t1"), Ok(page(vec![], Some("t2")))),
            (Some("t2"), Ok(page(vec![json!({"name": "c"})], None))),
        ]);

        let mut lister = RuleLister::new(&api, "proj");
        let names: Vec<String> = lister
            .by_ref()
            .map(|r| r.unwrap()["name"].as_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(lister.pages(), 3);
        assert_eq!(
            *api.requested.borrow(),
            vec![None, Some("t1".to_string()), Some("t2".to_string())]
        );
    }

    #[test]
    fn test_lister_empty_token_ends() {
        let api = PagedApi::new(vec![(None, Ok(page(vec![json!({"name": "a"})], Some(""))))]);
        let items: Vec<_> = RuleLister::new(&api, "proj").collect();
        assert_eq!(items.len(), 1);
        assert_eq!(api.requested.borrow().len(), 1);
    }

    #[test]
    fn test_lister_stops_on_error() {
        let api = PagedApi::new(vec![
            (None, Ok(page(vec![json!({"name": "a"})], Some("t1")))),
            (
                Some("t1"),
                Err(Error::Remote {
                    status: 500,
                    message: String::new(),
                }),
            ),
        ]);

        let items: Vec<_> = RuleLister::new(&api, "proj").collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
    }

    #[test]
    fn test_page_decode_without_items() {
        let page: FirewallPage = serde_json::from_str(r#"{"kind":"compute#firewallList"}"#).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_operation_keeps_unknown_fields() {
        let raw = json!({
            "kind": "compute#operation",
            "name": "operation-123",
            "operationType": "insert",
            "status": "RUNNING",
            "targetLink": "https://example.test/firewalls/blk-001",
            "progress": 0
        });
        let op: Operation = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(op.name.as_deref(), Some("operation-123"));
        assert_eq!(op.operation_type.as_deref(), Some("insert"));
        assert_eq!(op.extra["progress"], 0);
        assert_eq!(serde_json::to_value(&op).unwrap(), raw);
    }
}
