//! Code for handling IDs
use anyhow::{Context, Result};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;

/// A trait alias for ID types
pub trait IDLike: Eq + Hash + Borrow<str> + Clone + Display + From<String> {}
impl<T> IDLike for T where T: Eq + Hash + Borrow<str> + Clone + Display + From<String> {}

/// The identifier of a node in the grid (either a region or a junction).
///
/// Regions and junctions share one namespace, so a route can mix both kinds of node.
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Deserialize, Debug, Serialize)]
pub struct NodeID(pub Arc<str>);

impl Borrow<str> for NodeID {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for NodeID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeID {
    fn from(s: &str) -> Self {
        NodeID(Arc::from(s))
    }
}

impl From<String> for NodeID {
    fn from(s: String) -> Self {
        NodeID(Arc::from(s))
    }
}

impl NodeID {
    /// Create a new ID from a string slice
    pub fn new(id: &str) -> Self {
        NodeID(Arc::from(id))
    }
}

/// A data structure containing a set of IDs
pub trait IDCollection<ID: IDLike> {
    /// Get the ID from the collection by its string representation.
    ///
    /// # Arguments
    ///
    /// * `id` - The string representation of the ID
    ///
    /// # Returns
    ///
    /// A copy of the ID in `self`, or an error if not found.
    fn get_id_by_str(&self, id: &str) -> Result<ID>;
}

macro_rules! define_id_methods {
    () => {
        fn get_id_by_str(&self, id: &str) -> Result<ID> {
            let found = self
                .get(id)
                .with_context(|| format!("Unknown ID {id} found"))?;
            Ok(found.clone())
        }
    };
}

impl<ID: IDLike> IDCollection<ID> for IndexSet<ID> {
    define_id_methods!();
}
