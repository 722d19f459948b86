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

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Folder {folder_id} not found in tree {tree_id}")]
    NxFolder { tree_id: String, folder_id: String },
    #[error("Corrupt permission bits: undefined code {code} in {field} field")]
    CorruptPermissionBits { field: &'static str, code: u32 },
    #[error("Permission is read-only")]
    ImmutablePermission,
    #[error("Unknown grade name")]
    UnknownGrade,
    #[error("Unknown move policy name")]
    UnknownMovePolicy,
    #[error("Unknown root type name")]
    UnknownRootType,
    #[error("Folder storage failure: {0}")]
    Storage(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
