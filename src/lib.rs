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

//! Permission packing and move-impact analysis for a unified folder tree.
//!
//! The folder tree itself is served by external backends, reached through the
//! traits in `folder::storage`. This crate only concerns itself with the
//! packed permission representation and with deciding whether moving a folder
//! changes who can see it.

#[cfg(test)]
macro_rules! assert_matches {
    ($expected:pat, $actual:expr) => {
        match $actual {
            $expected => (),
            unexpected => panic!(
                "Expected {} matches {}, got {:?}",
                stringify!($expected),
                stringify!($actual),
                unexpected
            ),
        }
    };
}

pub mod folder;
pub mod support;

#[cfg(test)]
mod test_data;

pub use crate::folder::model::{
    FolderNode, Grade, Grades, Module, MovePolicy, MoveWarning, PermissionType,
    RootType,
};
pub use crate::folder::move_impact::{
    MoveImpact, MoveImpactAnalyzer, MoveRequest,
};
pub use crate::folder::permission::{
    EditPermission, PermissionRecord, SealedPermission,
};
pub use crate::folder::storage::{FolderStorage, PolicySource};
pub use crate::support::error::Error;
pub use crate::support::move_config::MoveConfig;

#[cfg(test)]
static INIT_TEST_LOG: std::sync::Once = std::sync::Once::new();

#[cfg(test)]
fn init_test_log() {
    INIT_TEST_LOG.call_once(|| {
        fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} [{}][{}] {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    message,
                ))
            })
            .level(log::LevelFilter::Debug)
            .chain(std::io::stderr())
            .apply()
            .unwrap();
    })
}
