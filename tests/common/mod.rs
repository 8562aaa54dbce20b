//! Shared helpers for integration tests

#![allow(dead_code)] // Not every test file uses every helper

use bucketcp::storage::{ListPage, ObjectStore, StoreError};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub mod test_args;

/// Every regular file under `root`, relative to it and sorted
pub fn written_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();
    files.sort();
    files
}

/// Store that serves a fixed sequence of listing pages and a map of objects
///
/// Records every call so tests can assert on request order.
#[derive(Default)]
pub struct ScriptedStore {
    pages: Vec<ListPage>,
    objects: HashMap<String, Vec<u8>>,
    pub list_tokens: RefCell<Vec<Option<String>>>,
    pub fetched: RefCell<Vec<String>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listing page; `next` is the token the page hands back
    pub fn page(mut self, keys: &[&str], next: Option<&str>) -> Self {
        self.pages.push(ListPage {
            keys: keys.iter().map(|k| (*k).to_string()).collect(),
            next_token: next.map(String::from),
        });
        self
    }

    pub fn object(mut self, key: &str, contents: &str) -> Self {
        self.objects.insert(key.to_string(), contents.as_bytes().to_vec());
        self
    }
}

impl ObjectStore for ScriptedStore {
    fn list_objects_page(
        &self,
        _container: &str,
        _prefix: &str,
        continuation: Option<&str>,
    ) -> Result<ListPage, StoreError> {
        let mut tokens = self.list_tokens.borrow_mut();
        let index = tokens.len();
        tokens.push(continuation.map(String::from));
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| StoreError::new("no more scripted pages"))
    }

    fn get_object(&self, _container: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.fetched.borrow_mut().push(key.to_string());
        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::new(format!("no such key: {key}")))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
