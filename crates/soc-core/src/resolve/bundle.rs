use std::collections::{HashMap, VecDeque};
use std::path::{Component, Path, PathBuf};

use log::debug;
use serde_json::{Map, Value};

use crate::error::ResolveError;
use crate::parse;

/// Load `path` and inline every `$ref` that points outside of it.
///
/// Internal `#/...` references of the root document are kept; references
/// into sibling files are replaced by their targets, with the target's own
/// internal references resolved against the sibling file.
pub async fn bundle(path: &Path) -> Result<Value, ResolveError> {
    let root = tokio::fs::canonicalize(path)
        .await
        .map_err(|source| ResolveError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let documents = load_documents(&root).await?;
    let Some(document) = documents.get(&root) else {
        return Err(ResolveError::RefTargetNotFound(root.display().to_string()));
    };

    let mut inliner = Inliner {
        root: &root,
        documents: &documents,
        stack: Vec::new(),
    };
    inliner.inline(&root, document)
}

/// Read the root file and every file it references, transitively, once each.
async fn load_documents(root: &Path) -> Result<HashMap<PathBuf, Value>, ResolveError> {
    let mut documents = HashMap::new();
    let mut queue = VecDeque::from([root.to_path_buf()]);

    while let Some(file) = queue.pop_front() {
        if documents.contains_key(&file) {
            continue;
        }
        let value = load(&file).await?;

        let mut refs = Vec::new();
        collect_refs(&value, &mut refs);
        for reference in refs {
            if is_remote(reference) {
                return Err(ResolveError::RemoteRef(reference.to_string()));
            }
            if let Some(target) = external_file(&file, reference) {
                if !documents.contains_key(&target) {
                    queue.push_back(target);
                }
            }
        }

        documents.insert(file, value);
    }

    Ok(documents)
}

async fn load(path: &Path) -> Result<Value, ResolveError> {
    debug!("loading {}", path.display());
    let input = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ResolveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse::to_value(path, &input).map_err(|source| ResolveError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn collect_refs<'v>(value: &'v Value, refs: &mut Vec<&'v str>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                refs.push(reference);
            }
            for child in map.values() {
                collect_refs(child, refs);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_refs(child, refs);
            }
        }
        _ => {}
    }
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// The file a reference points into, or `None` for a same-document pointer.
fn external_file(from: &Path, reference: &str) -> Option<PathBuf> {
    let file = reference.split_once('#').map_or(reference, |(file, _)| file);
    if file.is_empty() {
        return None;
    }
    let base = from.parent().unwrap_or_else(|| Path::new(""));
    Some(normalize(&base.join(file)))
}

/// Lexically collapse `.` and `..` so one file has one cache key.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

struct Inliner<'a> {
    root: &'a Path,
    documents: &'a HashMap<PathBuf, Value>,
    /// References currently being expanded, as `(file, pointer)`.
    stack: Vec<(PathBuf, String)>,
}

impl Inliner<'_> {
    fn inline(&mut self, file: &Path, value: &Value) -> Result<Value, ResolveError> {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(reference)) = map.get("$ref") {
                    return self.follow(file, reference, value);
                }
                let mut out = Map::with_capacity(map.len());
                for (key, child) in map {
                    out.insert(key.clone(), self.inline(file, child)?);
                }
                Ok(Value::Object(out))
            }
            Value::Array(items) => items
                .iter()
                .map(|child| self.inline(file, child))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }

    fn follow(&mut self, file: &Path, reference: &str, node: &Value) -> Result<Value, ResolveError> {
        if is_remote(reference) {
            return Err(ResolveError::RemoteRef(reference.to_string()));
        }

        let pointer = reference.split_once('#').map_or("", |(_, p)| p);
        let target_file = match external_file(file, reference) {
            Some(target) => target,
            // The root keeps its own pointers; the typed resolver handles them.
            None if file == self.root => return Ok(node.clone()),
            None => file.to_path_buf(),
        };

        if !pointer.is_empty() && !pointer.starts_with('/') {
            return Err(ResolveError::InvalidRefFormat(reference.to_string()));
        }

        let key = (target_file.clone(), pointer.to_string());
        if self.stack.contains(&key) {
            return Err(ResolveError::CircularRef(reference.to_string()));
        }

        let documents = self.documents;
        let target = documents
            .get(&target_file)
            .and_then(|document| document.pointer(pointer))
            .ok_or_else(|| ResolveError::RefTargetNotFound(reference.to_string()))?;

        self.stack.push(key);
        let inlined = self.inline(&target_file, target);
        self.stack.pop();
        inlined
    }
}
