//-
// Copyright (c) 2026, Jason Lingle
//
// This file is part of Sharetree.
//
// Sharetree is free software: you can  redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// Sharetree is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without  even the implied  warranty of MERCHANTABILITY  or FITNESS
// FOR  A PARTICULAR  PURPOSE.  See the  GNU General  Public  License for  more
// details.
//
// You should have received a copy of the GNU General Public License along with
// Sharetree. If not, see <http://www.gnu.org/licenses/>.

//! An in-memory folder tree for exercising the move analysis.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use crate::folder::model::*;
use crate::folder::permission::PermissionRecord;
use crate::folder::storage::{FolderStorage, PolicySource};
use crate::support::error::Error;

pub const TREE: &str = "1";
pub const ROOT: &str = "1";
pub const PERSONAL_ROOT: &str = "10";
pub const PUBLIC_ROOT: &str = "15";

/// The acting user in most tests.
pub const ME: i32 = 1;
/// Some other user.
pub const OTHER: i32 = 2;

/// A folder tree held entirely in memory.
///
/// `new()` sets up the system root, the personal root holding the personal
/// folders of `ME` ("100") and `OTHER` ("200"), and the public root.
pub struct MemoryTree {
    folders: HashMap<String, FolderNode>,
    // Children in insertion order
    children: HashMap<String, Vec<String>>,
    /// If set, any lookup of this folder fails with `Error::Storage`.
    pub fail_on: Option<String>,
    /// The number of lookups made so far.
    pub lookups: Cell<usize>,
}

impl MemoryTree {
    pub fn new() -> Self {
        let mut this = MemoryTree {
            folders: HashMap::new(),
            children: HashMap::new(),
            fail_on: None,
            lookups: Cell::new(0),
        };

        this.add(FolderNode {
            module: Module::System,
            capabilities: HashSet::new(),
            ..node(ROOT, "", 0, &[])
        });
        this.add(node(PERSONAL_ROOT, ROOT, 0, &[]));
        this.add(node(PUBLIC_ROOT, ROOT, 0, &[]));
        this.add(node("100", PERSONAL_ROOT, ME, &[owner(ME)]));
        this.add(node("200", PERSONAL_ROOT, OTHER, &[owner(OTHER)]));
        this
    }

    pub fn add(&mut self, folder: FolderNode) {
        if !folder.parent_id.is_empty() {
            self.children
                .entry(folder.parent_id.clone())
                .or_default()
                .push(folder.id.clone());
        }
        self.folders.insert(folder.id.clone(), folder);
    }

    /// Add a files folder with the given permissions.
    pub fn add_folder(
        &mut self,
        id: &str,
        parent_id: &str,
        created_by: i32,
        permissions: &[PermissionRecord],
    ) {
        self.add(node(id, parent_id, created_by, permissions));
    }

    fn lookup(
        &self,
        tree_id: &str,
        folder_id: &str,
    ) -> Result<&FolderNode, Error> {
        self.lookups.set(self.lookups.get() + 1);

        if self.fail_on.as_deref() == Some(folder_id) {
            return Err(Error::Storage(format!(
                "backend down for {folder_id}"
            )));
        }

        self.folders
            .get(folder_id)
            .filter(|_| TREE == tree_id)
            .ok_or_else(|| Error::NxFolder {
                tree_id: tree_id.to_owned(),
                folder_id: folder_id.to_owned(),
            })
    }
}

impl FolderStorage for MemoryTree {
    fn get_folder(
        &self,
        tree_id: &str,
        folder_id: &str,
    ) -> Result<FolderNode, Error> {
        self.lookup(tree_id, folder_id).map(FolderNode::clone)
    }

    fn get_subfolders(
        &self,
        tree_id: &str,
        folder_id: &str,
    ) -> Result<Vec<String>, Error> {
        self.lookup(tree_id, folder_id)?;
        Ok(self.children.get(folder_id).cloned().unwrap_or_default())
    }

    fn get_ancestor_path(
        &self,
        tree_id: &str,
        folder_id: &str,
    ) -> Result<Vec<FolderNode>, Error> {
        let mut path = Vec::new();
        let mut next = folder_id.to_owned();
        while !next.is_empty() {
            if path.iter().any(|f: &FolderNode| f.id == next) {
                break;
            }

            let folder = self.lookup(tree_id, &next)?.clone();
            next = folder.parent_id.clone();
            path.push(folder);
        }

        Ok(path)
    }
}

/// Build a files folder which supports permissions.
pub fn node(
    id: &str,
    parent_id: &str,
    created_by: i32,
    permissions: &[PermissionRecord],
) -> FolderNode {
    FolderNode {
        id: id.to_owned(),
        tree_id: TREE.to_owned(),
        parent_id: parent_id.to_owned(),
        created_by,
        module: Module::Files,
        permissions: permissions.iter().cloned().map(Into::into).collect(),
        capabilities: [CAPABILITY_PERMISSIONS.to_owned()]
            .iter()
            .cloned()
            .collect(),
    }
}

pub fn owner(entity: i32) -> PermissionRecord {
    PermissionRecord::user(entity, Grades::ADMIN_ALL)
}

pub fn reader(entity: i32) -> PermissionRecord {
    PermissionRecord::user(entity, Grades::READ_ONLY)
}

/// A policy source which returns the same name for everything.
pub struct FixedPolicy(pub &'static str);

impl PolicySource for FixedPolicy {
    fn configured_policy(&self, _: RootType, _: i32) -> String {
        self.0.to_owned()
    }
}
