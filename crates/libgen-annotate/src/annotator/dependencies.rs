use std::collections::BTreeSet;

use petgraph::{algo::has_path_connecting, graphmap::DiGraphMap, visit::Dfs};

use crate::model::Api;

/// Type-usage graphs over message and enum IDs.
#[derive(Debug)]
pub(crate) struct TypeGraph<'a> {
  /// message -> type of each of its fields
  fields: DiGraphMap<&'a str, ()>,
  /// field edges plus nested type -> enclosing message
  uses: DiGraphMap<&'a str, ()>,
}

impl<'a> TypeGraph<'a> {
  pub fn build(api: &'a Api) -> Self {
    let mut fields = DiGraphMap::<&str, ()>::new();
    for message in &api.messages {
      fields.add_node(message.id.as_str());
      for type_id in message.fields.iter().filter_map(|f| f.type_id.as_deref()) {
        fields.add_edge(message.id.as_str(), type_id, ());
      }
    }

    let mut uses = fields.clone();
    let nested = api
      .messages
      .iter()
      .map(|m| (m.id.as_str(), m.parent.as_deref()))
      .chain(api.enums.iter().map(|e| (e.id.as_str(), e.parent.as_deref())));
    for (id, parent) in nested {
      uses.add_node(id);
      if let Some(parent) = parent {
        uses.add_edge(id, parent, ());
      }
    }

    Self { fields, uses }
  }

  /// Whether `target` can reach `container` through field types alone.
  ///
  /// A message field of the container's own type is recursive.
  pub fn is_recursive(&self, container: &str, target: &str) -> bool {
    self.fields.contains_node(container)
      && self.fields.contains_node(target)
      && has_path_connecting(&self.fields, target, container, None)
  }

  /// Every ID transitively used by the seeds, the seeds included.
  pub fn reachable_from<I>(&self, seeds: I) -> BTreeSet<&'a str>
  where
    I: IntoIterator<Item = &'a str>,
  {
    let mut reached = BTreeSet::new();
    for seed in seeds {
      if !self.uses.contains_node(seed) {
        reached.insert(seed);
        continue;
      }
      let mut dfs = Dfs::new(&self.uses, seed);
      while let Some(node) = dfs.next(&self.uses) {
        reached.insert(node);
      }
    }
    reached
  }
}
