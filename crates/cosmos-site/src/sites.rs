//! Managed site extraction from the Puppet rules tree.
//!
//! The rules tree maps host patterns to classes and their parameters. Two
//! classes register web sites:
//!
//! - `sunet::frontend::register_sites`: `sites` is a mapping keyed by hostname
//! - `sunet::frontend::register_sites_array`: `sites` is a list of
//!   single-element lists holding the hostname
//!
//! Registrations with any other shape are skipped with a warning.

use std::collections::BTreeSet;

use cosmos_renderer::escape_html;
use cosmos_tree::{Mapping, Value};

/// Class registering sites as a mapping keyed by hostname.
pub const REGISTER_SITES: &str = "sunet::frontend::register_sites";

/// Class registering sites as a list of one-element tuples.
pub const REGISTER_SITES_ARRAY: &str = "sunet::frontend::register_sites_array";

/// Heading key of the managed sites page.
pub const MANAGED_SITES_KEY: &str = "Managed sites";

const SITES_PARAM: &str = "sites";

/// Sorted, deduplicated set of hostnames served by the frontends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedSites {
    hosts: BTreeSet<String>,
}

impl ManagedSites {
    /// Collect registered sites from the Puppet rules tree.
    pub fn from_rules(rules: &Mapping) -> Self {
        let mut sites = Self::default();
        for (pattern, classes) in rules {
            let Some(classes) = classes.as_mapping() else {
                tracing::debug!(pattern, "Skipping rule without class mapping");
                continue;
            };
            for (class, params) in classes {
                match class {
                    REGISTER_SITES => sites.collect_keyed(pattern, params),
                    REGISTER_SITES_ARRAY => sites.collect_array(pattern, params),
                    _ => {}
                }
            }
        }
        sites
    }

    fn collect_keyed(&mut self, pattern: &str, params: &Value) {
        let Some(registered) = sites_param(params).and_then(Value::as_mapping) else {
            tracing::warn!(pattern, class = REGISTER_SITES, "Expected a mapping of sites");
            return;
        };
        self.hosts.extend(registered.keys().map(str::to_owned));
    }

    fn collect_array(&mut self, pattern: &str, params: &Value) {
        let Some(registered) = sites_param(params).and_then(Value::as_sequence) else {
            tracing::warn!(pattern, class = REGISTER_SITES_ARRAY, "Expected a list of sites");
            return;
        };
        for entry in registered {
            if let Some([site]) = entry.as_sequence()
                && let Some(host) = site.as_str()
            {
                self.hosts.insert(host.to_owned());
            } else {
                tracing::warn!(
                    pattern,
                    class = REGISTER_SITES_ARRAY,
                    "Skipping site entry that is not a single hostname"
                );
            }
        }
    }

    /// Registered hostnames in sorted order.
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Tree for the managed sites page: one key holding a list of links.
    pub fn to_tree(&self) -> Value {
        let links = self.hosts().map(site_link).collect::<Vec<_>>();
        Value::Mapping(Mapping::singleton(MANAGED_SITES_KEY, links))
    }
}

fn sites_param(params: &Value) -> Option<&Value> {
    params.as_mapping()?.get(SITES_PARAM)
}

fn site_link(host: &str) -> Value {
    let host = escape_html(host);
    Value::markup(format!(r#"<a href="https://{host}">{host}</a>"#))
}

#[cfg(test)]
mod tests {
    use cosmos_tree::parse_yaml;
    use pretty_assertions::assert_eq;

    use super::*;

    fn rules(yaml: &str) -> Mapping {
        match parse_yaml(yaml).unwrap() {
            Value::Mapping(mapping) => mapping,
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    fn hosts(sites: &ManagedSites) -> Vec<&str> {
        sites.hosts().collect()
    }

    #[test]
    fn test_keyed_registration() {
        let tree = rules(
            r"
class:
  sunet::frontend::register_sites:
    sites:
      b.com: {}
      a.com: {}
",
        );
        let sites = ManagedSites::from_rules(&tree);
        assert_eq!(hosts(&sites), vec!["a.com", "b.com"]);
    }

    #[test]
    fn test_array_registration() {
        let tree = rules(
            r"
'^frontend-\d+\.example\.org$':
  sunet::frontend::register_sites_array:
    sites:
      - [www.example.org]
      - [api.example.org]
",
        );
        let sites = ManagedSites::from_rules(&tree);
        assert_eq!(hosts(&sites), vec!["api.example.org", "www.example.org"]);
    }

    #[test]
    fn test_deduplicated_across_rules() {
        let tree = rules(
            r"
fe1:
  sunet::frontend::register_sites:
    sites:
      a.com: {}
fe2:
  sunet::frontend::register_sites_array:
    sites:
      - [a.com]
      - [c.com]
",
        );
        let sites = ManagedSites::from_rules(&tree);
        assert_eq!(hosts(&sites), vec!["a.com", "c.com"]);
        assert_eq!(sites.len(), 2);
    }

    #[test]
    fn test_other_classes_ignored() {
        let tree = rules(
            r"
web:
  sunet::server:
    sites:
      ignored.com: {}
",
        );
        assert!(ManagedSites::from_rules(&tree).is_empty());
    }

    #[test]
    fn test_malformed_registrations_skipped() {
        let tree = rules(
            r"
notes: just a string
fe1:
  sunet::frontend::register_sites:
    sites: [a.com]
fe2:
  sunet::frontend::register_sites_array:
    sites:
      - [one.com, two.com]
      - plain.com
      - [ok.com]
fe3:
  sunet::frontend::register_sites: ~
",
        );
        let sites = ManagedSites::from_rules(&tree);
        assert_eq!(hosts(&sites), vec!["ok.com"]);
    }

    #[test]
    fn test_to_tree_links() {
        let tree = rules(
            r"
class:
  sunet::frontend::register_sites:
    sites:
      b.com: {}
      a.com: {}
",
        );
        let page = ManagedSites::from_rules(&tree).to_tree();
        let expected = Value::Mapping(Mapping::singleton(
            MANAGED_SITES_KEY,
            vec![
                Value::markup(r#"<a href="https://a.com">a.com</a>"#),
                Value::markup(r#"<a href="https://b.com">b.com</a>"#),
            ],
        ));
        assert_eq!(page, expected);
    }

    #[test]
    fn test_empty_rules_give_empty_list() {
        let page = ManagedSites::from_rules(&Mapping::new()).to_tree();
        let expected = Value::Mapping(Mapping::singleton(MANAGED_SITES_KEY, Vec::<Value>::new()));
        assert_eq!(page, expected);
    }
}
