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

use log::debug;

use super::model::RootType;
use super::storage::FolderStorage;
use crate::support::error::Error;
use crate::support::move_config::RootMarkers;

/// Determines which top-level hierarchy a folder belongs to, from the point
/// of view of a particular user.
pub struct RootTypeClassifier<'a, S: ?Sized> {
    storage: &'a S,
    roots: &'a RootMarkers,
}

impl<'a, S: FolderStorage + ?Sized> RootTypeClassifier<'a, S> {
    pub fn new(storage: &'a S, roots: &'a RootMarkers) -> Self {
        RootTypeClassifier { storage, roots }
    }

    /// Classify the root of `folder_id` for `user`.
    ///
    /// The ancestor path is walked upward from the folder itself. Reaching
    /// the public root makes it `Public`. Reaching the personal root makes it
    /// `Private` if the folder just below the personal root (i.e., the
    /// personal folder the path went through) was created by `user`, and
    /// `Shared` otherwise. A path which reaches neither, or an empty folder
    /// id, is `NotAvailable`.
    pub fn classify(
        &self,
        tree_id: &str,
        folder_id: &str,
        user: i32,
    ) -> Result<RootType, Error> {
        if folder_id.is_empty() {
            return Ok(RootType::NotAvailable);
        }

        let path = self.storage.get_ancestor_path(tree_id, folder_id)?;
        let mut creator_of_previous = None;
        for folder in &path {
            if folder.id == self.roots.personal {
                return Ok(if Some(user) == creator_of_previous {
                    RootType::Private
                } else {
                    RootType::Shared
                });
            }

            if folder.id == self.roots.public {
                return Ok(RootType::Public);
            }

            creator_of_previous = Some(folder.created_by);
        }

        debug!(
            "{folder_id} in tree {tree_id} is under neither the personal \
             nor the public root"
        );
        Ok(RootType::NotAvailable)
    }
}
