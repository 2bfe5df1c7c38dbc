// Chromium bookmark JSON importer
// Walks the nested `roots` tree of a Chromium-style `Bookmarks` file into leaf records.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::types::bookmark::BookMark;
use crate::types::errors::ImportError;

/// One node of the export tree, validated at the import boundary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExportNode {
    Folder {
        #[serde(default)]
        name: String,
        #[serde(default)]
        children: Vec<ExportNode>,
        #[serde(default, deserialize_with = "timestamp")]
        date_added: Option<String>,
        #[serde(default, deserialize_with = "timestamp")]
        date_modified: Option<String>,
    },
    Url {
        #[serde(default)]
        name: String,
        #[serde(default)]
        url: String,
        #[serde(default, deserialize_with = "timestamp")]
        date_added: Option<String>,
        #[serde(default, deserialize_with = "timestamp")]
        date_modified: Option<String>,
    },
}

#[derive(Deserialize)]
struct RootContainer {
    #[serde(default)]
    children: Vec<Value>,
}

/// Chromium writes timestamps as decimal strings; some tools write numbers.
fn timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Parses a Chromium-style bookmark export into a flat list of leaves.
///
/// Every entry of `roots` (bookmark bar, other bookmarks, ...) contributes
/// its children, in document order, with an empty path: the container itself
/// is not a folder. Each leaf's `parents` lists its folders nearest-first.
///
/// A document that is not an object, or has no `roots`, yields an empty list.
///
/// # Errors
/// `ImportError::InvalidJson` when `text` is not JSON, and
/// `ImportError::InvalidNode` when a node is neither a folder nor a url.
pub fn parse_bookmarks_json(text: &str) -> Result<Vec<BookMark>, ImportError> {
    let document: Value =
        serde_json::from_str(text).map_err(|e| ImportError::InvalidJson(e.to_string()))?;

    let Some(roots) = document.get("roots").and_then(Value::as_object) else {
        return Ok(Vec::new());
    };

    let mut leaves = Vec::new();
    for (root_name, root) in roots {
        if !root.is_object() {
            continue;
        }
        let container: RootContainer = serde_json::from_value(root.clone())
            .map_err(|e| ImportError::InvalidNode(format!("{}: {}", root_name, e)))?;
        for child in container.children {
            let node: ExportNode = serde_json::from_value(child)
                .map_err(|e| ImportError::InvalidNode(format!("{}: {}", root_name, e)))?;
            collect_leaves(&node, &[], &mut leaves);
        }
    }

    debug!(count = leaves.len(), "parsed bookmark json");
    Ok(leaves)
}

/// Depth-first walk. `path` holds the enclosing folders, nearest first.
pub fn collect_leaves(node: &ExportNode, path: &[BookMark], out: &mut Vec<BookMark>) {
    match node {
        ExportNode::Folder {
            name,
            children,
            date_added,
            date_modified,
        } => {
            let mut stub = BookMark::folder(name);
            stub.created = date_added.clone().unwrap_or_default();
            stub.updated = date_modified.clone().unwrap_or_default();

            let mut nested = Vec::with_capacity(path.len() + 1);
            nested.push(stub);
            nested.extend_from_slice(path);

            for child in children {
                collect_leaves(child, &nested, out);
            }
        }
        ExportNode::Url {
            name,
            url,
            date_added,
            date_modified,
        } => {
            let mut leaf = BookMark::leaf(name, url).with_parents(path.to_vec());
            leaf.created = date_added.clone().unwrap_or_default();
            leaf.updated = date_modified.clone().unwrap_or_default();
            out.push(leaf);
        }
    }
}
