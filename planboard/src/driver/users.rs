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

//! Operations on users.

use crate::db;
use crate::driver::{Driver, map_not_found};
use crate::model::*;
use log::info;
use planboard_core::driver::DriverResult;

impl Driver {
    /// Gets the user identified by `user_id`.
    pub(crate) async fn get_user(self, user_id: UserId) -> DriverResult<User> {
        db::get_user(&mut self.db.ex().await?, &user_id)
            .await
            .map_err(|e| map_not_found(e, "User", &user_id))
    }

    /// Deletes the user identified by `user_id` and returns its last contents.
    ///
    /// The categories and todos owned by the user are left untouched.
    pub(crate) async fn delete_user(self, user_id: UserId) -> DriverResult<User> {
        let user = db::delete_user(&mut self.db.ex().await?, &user_id)
            .await
            .map_err(|e| map_not_found(e, "User", &user_id))?;
        info!("Deleted user {}", user_id);
        Ok(user)
    }
}
