// Planboard
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Business logic for the service.

use log::warn;
use planboard_core::clocks::Clock;
use planboard_core::db::{Db, DbError};
use planboard_core::driver::DriverError;
use std::fmt;
use std::sync::Arc;

mod categories;
#[cfg(test)]
pub(crate) mod testutils;
mod todos;
mod users;

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they issue a single database
/// statement, so it's incorrect for the caller to chain two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock instance to obtain the current time.
    clock: Arc<dyn Clock + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(db: Arc<dyn Db + Send + Sync>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { db, clock }
    }
}

/// Converts a database error into a driver error, replacing the generic not found condition with
/// a message that names the missing `entity` of identifier `id`.
fn map_not_found<I: fmt::Display>(e: DbError, entity: &'static str, id: I) -> DriverError {
    match e {
        DbError::NotFound => {
            warn!("{} {} not found", entity, id);
            DriverError::NotFound(format!("{} not found", entity))
        }
        e => e.into(),
    }
}
