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

//! The seams through which the core reaches the folder backends and the
//! configuration system.

use super::model::{FolderNode, RootType};
use crate::support::error::Error;

/// Read access to a folder tree.
///
/// Implementations are expected to block until the backend answers. Errors
/// are propagated to the caller of the core unchanged.
pub trait FolderStorage {
    /// Look up a single folder.
    ///
    /// Fails with `Error::NxFolder` if there is no such folder.
    fn get_folder(
        &self,
        tree_id: &str,
        folder_id: &str,
    ) -> Result<FolderNode, Error>;

    /// Return the ids of the immediate children of the given folder.
    fn get_subfolders(
        &self,
        tree_id: &str,
        folder_id: &str,
    ) -> Result<Vec<String>, Error>;

    /// Return the given folder followed by each of its ancestors, ending with
    /// the root of the tree.
    fn get_ancestor_path(
        &self,
        tree_id: &str,
        folder_id: &str,
    ) -> Result<Vec<FolderNode>, Error>;
}

/// Source of the configured move policy names.
pub trait PolicySource {
    /// Return the raw name of the policy to use when moving a folder under a
    /// root of the given type on behalf of `user`.
    ///
    /// An empty string means nothing is configured.
    fn configured_policy(&self, root_type: RootType, user: i32) -> String;
}
