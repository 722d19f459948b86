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

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::folder::model::RootType;
use crate::folder::storage::PolicySource;
use crate::support::error::Error;

/// Configuration for folder moves.
///
/// This is typically stored in a file named `folder-move.toml` alongside the
/// rest of the folder service configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MoveConfig {
    /// The reserved folders whose position in an ancestor path determines
    /// the root type.
    #[serde(default)]
    pub roots: RootMarkers,

    /// The policy to use for each type of destination root.
    #[serde(default)]
    pub policies: PolicyConfig,

    /// Per-user overrides, keyed by the decimal user id.
    #[serde(default)]
    pub users: BTreeMap<String, UserMoveConfig>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RootMarkers {
    /// The folder under which each user's personal folder lives.
    ///
    /// A destination below the acting user's own personal folder is private;
    /// one below anyone else's is shared.
    pub personal: String,
    /// The root of the public folders.
    pub public: String,
}

impl Default for RootMarkers {
    fn default() -> Self {
        RootMarkers {
            personal: "10".to_owned(),
            public: "15".to_owned(),
        }
    }
}

/// Raw policy names per root type.
///
/// Names are not validated when the configuration is loaded; an empty or
/// unrecognised name means the default policy, `inherit`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub private: String,
    pub public: String,
    pub shared: String,
    pub not_available: String,
}

impl PolicyConfig {
    pub fn get(&self, root_type: RootType) -> &str {
        match root_type {
            RootType::Private => &self.private,
            RootType::Public => &self.public,
            RootType::Shared => &self.shared,
            RootType::NotAvailable => &self.not_available,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UserMoveConfig {
    #[serde(default)]
    pub policies: PolicyConfig,
}

impl MoveConfig {
    /// Parse the configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    /// Load the configuration from the given file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        Self::from_toml(&fs::read_to_string(path)?)
    }
}

impl PolicySource for MoveConfig {
    fn configured_policy(&self, root_type: RootType, user: i32) -> String {
        self.users
            .get(&user.to_string())
            .map(|u| u.policies.get(root_type))
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| self.policies.get(root_type))
            .to_owned()
    }
}
