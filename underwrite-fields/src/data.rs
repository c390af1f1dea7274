//! Read-only access to the data document.
//!
//! The data context is whatever JSON document the caller loaded (an
//! application or audit record). Nothing here mutates it.

use serde_json::Value;

/// Split one path segment into its name and trailing indices:
/// `vehicles[2][0]` → (`vehicles`, [2, 0]).
///
/// Returns `None` for a malformed or placeholder index.
fn parse_segment(segment: &str) -> Option<(&str, Vec<usize>)> {
    let (name, mut rest) = match segment.find('[') {
        Some(pos) => (&segment[..pos], &segment[pos..]),
        None => return Some((segment, Vec::new())),
    };
    let mut indices = Vec::new();
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let close = inner.find(']')?;
        indices.push(inner[..close].parse().ok()?);
        rest = &inner[close + 1..];
    }
    Some((name, indices))
}

/// Value at a dotted/bracketed path, e.g. `client.household_members[1].state`.
///
/// Missing keys, out-of-range indices and `[*]` placeholders all read as `None`.
pub fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(data);
    }
    let mut current = data;
    for segment in path.split('.') {
        let (name, indices) = parse_segment(segment)?;
        if !name.is_empty() {
            current = current.get(name)?;
        }
        for i in indices {
            current = current.get(i)?;
        }
    }
    Some(current)
}

/// Dotted/bracketed key of every scalar in the document, in map order.
///
/// Empty arrays and objects produce no keys.
pub fn leaf_keys(data: &Value) -> Vec<String> {
    let mut keys = Vec::new();
    collect_leaves(data, String::new(), &mut keys);
    keys
}

fn collect_leaves(value: &Value, prefix: String, keys: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (name, child) in map {
                let key = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                collect_leaves(child, key, keys);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                collect_leaves(child, format!("{prefix}[{i}]"), keys);
            }
        }
        _ => {
            if !prefix.is_empty() {
                keys.push(prefix);
            }
        }
    }
}
