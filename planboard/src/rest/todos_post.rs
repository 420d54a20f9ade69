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

//! API to create a todo for a user.

use crate::driver::Driver;
use crate::model::{CategoryId, NewTodo, UserId};
use crate::rest::TodoResponse;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Json, http};
use planboard_core::rest::{JsonBody, PathParams, RestResult};
use serde::Deserialize;

/// Message sent to the server to create a todo.
#[derive(Deserialize)]
pub(crate) struct CreateTodoRequest {
    /// Short name of the todo.
    todo_name: Option<String>,

    /// Longer explanation of the todo.
    todo_description: Option<String>,

    /// Recurrence of the todo.  Defaults to `non-recurring`.
    todo_type: Option<String>,

    /// Progress of the todo.  Defaults to `pending`.
    todo_status: Option<String>,

    /// Category the todo belongs to, if any.
    category_id: Option<CategoryId>,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParams(user_id): PathParams<String>,
    JsonBody(request): JsonBody<CreateTodoRequest>,
) -> RestResult<impl IntoResponse> {
    let todo = NewTodo::new(
        UserId::new(user_id)?,
        request.todo_name,
        request.todo_description,
        request.todo_type,
        request.todo_status,
        request.category_id,
    )?;

    let todo = driver.create_todo(todo).await?;

    let response = TodoResponse { message: "Todo created".to_owned(), todo };
    Ok((http::StatusCode::CREATED, Json(response)))
}
