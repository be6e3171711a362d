//! Local fixture repositories for clone scenarios.

#![allow(dead_code)]

use git2::{Repository, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A git repository with one commit on `branch` containing `files`.
pub struct FixtureRepo {
    pub dir: TempDir,
}

impl FixtureRepo {
    pub fn new(branch: &str, files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().expect("fixture dir");
        let repo = Repository::init(dir.path()).expect("git init");

        for (rel, content) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            fs::write(path, content).expect("write fixture file");
        }

        let mut index = repo.index().expect("index");
        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None).expect("add");
        index.write().expect("write index");
        let tree_id = index.write_tree().expect("write tree");
        let tree = repo.find_tree(tree_id).expect("tree");
        let sig = Signature::now("Fixture", "fixture@example.com").expect("signature");
        let refname = format!("refs/heads/{branch}");
        repo.commit(Some(&refname), &sig, &sig, "initial", &tree, &[]).expect("commit");
        repo.set_head(&refname).expect("set head");

        Self { dir }
    }

    pub fn url(&self) -> String {
        format!("file://{}", self.dir.path().display())
    }
}

pub fn entry_count(dir: &Path) -> usize {
    fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
