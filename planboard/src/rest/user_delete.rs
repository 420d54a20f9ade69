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

//! API to delete a user.

use crate::driver::Driver;
use crate::model::UserId;
use crate::rest::DeletedResponse;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use planboard_core::rest::{EmptyBody, PathParams, RestResult};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParams(user_id): PathParams<String>,
    _: EmptyBody,
) -> RestResult<impl IntoResponse> {
    let user_id = UserId::new(user_id)?;

    let deleted = driver.delete_user(user_id).await?;

    Ok(Json(DeletedResponse { message: "User deleted".to_owned(), deleted }))
}
