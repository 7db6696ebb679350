//! Tag naming rules and hierarchy.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use super::error::TagError;

/// Maximum tag name length.
pub const MAX_TAG_NAME_LEN: usize = 100;

/// Trims and checks a tag name.
pub fn validate_tag_name(name: &str) -> Result<String, TagError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TagError::EmptyName);
    }
    if trimmed.chars().count() > MAX_TAG_NAME_LEN {
        return Err(TagError::NameTooLong(MAX_TAG_NAME_LEN));
    }
    Ok(trimmed.to_string())
}

/// Normalizes a `#RRGGBB` color to lowercase.
pub fn normalize_color(color: &str) -> Result<String, TagError> {
    let hex = color
        .strip_prefix('#')
        .filter(|h| h.len() == 6 && h.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| TagError::InvalidColor(color.to_string()))?;
    Ok(format!("#{}", hex.to_ascii_lowercase()))
}

/// Checks that giving `tag_id` the parent `new_parent` keeps the hierarchy acyclic.
///
/// `parent_of` maps each existing tag to its current parent.
pub fn ensure_no_cycle(
    tag_id: Uuid,
    new_parent: Option<Uuid>,
    parent_of: &HashMap<Uuid, Option<Uuid>>,
) -> Result<(), TagError> {
    let Some(mut cursor) = new_parent else {
        return Ok(());
    };
    if cursor == tag_id {
        return Err(TagError::SelfParent);
    }

    let mut visited = HashSet::new();
    while visited.insert(cursor) {
        match parent_of.get(&cursor).copied().flatten() {
            Some(next) if next == tag_id => return Err(TagError::Cycle),
            Some(next) => cursor = next,
            None => return Ok(()),
        }
    }
    // Existing data already loops without passing through tag_id.
    Err(TagError::Cycle)
}

/// Flat tag row used to build the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagNode {
    /// Tag ID.
    pub id: Uuid,
    /// Parent tag, if any.
    pub parent_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// `#rrggbb` color.
    pub color: Option<String>,
    /// Number of entities carrying this tag.
    pub usage_count: i32,
}

/// A tag with its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagTreeNode {
    /// The tag itself.
    #[serde(flatten)]
    pub tag: TagNode,
    /// Child tags, sorted by name.
    pub children: Vec<TagTreeNode>,
}

/// Builds a forest from flat rows.
///
/// Tags whose parent is missing from `nodes` (e.g. deactivated) become roots.
/// Siblings are sorted by name.
#[must_use]
pub fn build_tag_tree(nodes: Vec<TagNode>) -> Vec<TagTreeNode> {
    let ids: HashSet<Uuid> = nodes.iter().map(|n| n.id).collect();
    let mut children: HashMap<Uuid, Vec<TagNode>> = HashMap::new();
    let mut roots = Vec::new();

    for node in nodes {
        match node.parent_id {
            Some(parent) if parent != node.id && ids.contains(&parent) => {
                children.entry(parent).or_default().push(node);
            }
            _ => roots.push(node),
        }
    }

    let mut tree: Vec<TagTreeNode> = roots
        .into_iter()
        .map(|root| attach(root, &mut children))
        .collect();
    tree.sort_by(|a, b| a.tag.name.cmp(&b.tag.name));
    tree
}

fn attach(tag: TagNode, children: &mut HashMap<Uuid, Vec<TagNode>>) -> TagTreeNode {
    let mut kids: Vec<TagTreeNode> = children
        .remove(&tag.id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| attach(child, children))
        .collect();
    kids.sort_by(|a, b| a.tag.name.cmp(&b.tag.name));
    TagTreeNode {
        tag,
        children: kids,
    }
}
