//! Generic get/set over an untyped JSON tree
//!
//! Reading is total: a missing location is `None`, never an error. Writing
//! creates intermediate containers on demand and never disturbs siblings of
//! the written path.
//!
//! Container rules for `set`:
//!
//! - a missing or `null` intermediate becomes an array when the next segment
//!   is an index, otherwise an object;
//! - writing past the end of an array pads it with `null`, up to
//!   [`MAX_ARRAY_PADDING`] new slots; a farther index is stored as a string
//!   key so the array becomes a sparse object instead of a huge allocation;
//! - an index against an existing object is used as a string key (`"0"`);
//! - a key against an existing array turns the array into an object keyed by
//!   element position, keeping every element;
//! - a scalar intermediate is overwritten with the container the next
//!   segment needs.

use serde_json::{Map, Value};
use tracing::debug;

use super::path::{Path, PathSegment};

/// Most `null` slots a single write may append to an array
pub const MAX_ARRAY_PADDING: usize = 10_000;

/// Read the value at `path`, `None` when any segment is missing
pub fn get<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| match (node, segment) {
            (Value::Object(map), PathSegment::Key(key)) => map.get(key),
            (Value::Object(map), PathSegment::Index(index)) => map.get(&index.to_string()),
            (Value::Array(items), PathSegment::Index(index)) => items.get(*index),
            _ => None,
        })
}

/// Parse `path` and read it. Malformed paths read as missing.
pub fn get_str<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    Path::parse(path).ok().and_then(|path| get(root, &path))
}

/// Replace the value at `path`, creating containers along the way
pub fn set(root: &mut Value, path: &Path, value: Value) {
    let node = root.take();
    *root = assign(node, path.segments(), value);
}

fn assign(node: Value, segments: &[PathSegment], value: Value) -> Value {
    let Some((head, rest)) = segments.split_first() else {
        return value;
    };

    match (head, node) {
        (PathSegment::Index(index), Value::Object(mut map)) => {
            assign_in_map(&mut map, index.to_string(), rest, value);
            Value::Object(map)
        }
        (PathSegment::Index(index), node) => {
            let mut items = into_array(node);
            match index.checked_sub(items.len()) {
                Some(gap) if gap >= MAX_ARRAY_PADDING => {
                    debug!(index, len = items.len(), "index too far past the end, storing as key");
                    let mut map = into_object(Value::Array(items));
                    assign_in_map(&mut map, index.to_string(), rest, value);
                    Value::Object(map)
                }
                gap => {
                    if gap.is_some() {
                        items.resize(*index + 1, Value::Null);
                    }
                    let child = items[*index].take();
                    items[*index] = assign(child, rest, value);
                    Value::Array(items)
                }
            }
        }
        (PathSegment::Key(key), node) => {
            let mut map = into_object(node);
            assign_in_map(&mut map, key.clone(), rest, value);
            Value::Object(map)
        }
    }
}

fn assign_in_map(map: &mut Map<String, Value>, key: String, rest: &[PathSegment], value: Value) {
    let slot = map.entry(key).or_insert(Value::Null);
    let child = slot.take();
    *slot = assign(child, rest, value);
}

fn into_object(node: Value) -> Map<String, Value> {
    match node {
        Value::Object(map) => map,
        Value::Array(items) => {
            debug!(len = items.len(), "converting array to object for key access");
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect()
        }
        Value::Null => Map::new(),
        scalar => {
            debug!(replaced = %scalar, "overwriting scalar with object");
            Map::new()
        }
    }
}

fn into_array(node: Value) -> Vec<Value> {
    match node {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        scalar => {
            debug!(replaced = %scalar, "overwriting scalar with array");
            Vec::new()
        }
    }
}
