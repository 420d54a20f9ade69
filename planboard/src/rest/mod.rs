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

//! Entry point to the REST server.

use crate::driver::Driver;
use crate::model::{Category, Todo};
use axum::Router;
use planboard_core::rest::RestError;
use serde::Serialize;

mod categories_get;
mod categories_post;
mod category_delete;
mod category_get;
mod category_put;
mod category_types_get;
#[cfg(test)]
mod testutils;
mod todo_delete;
mod todos_get;
mod todos_post;
mod user_delete;
mod user_get;

/// Response for mutations that only report their outcome.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, serde::Deserialize, PartialEq))]
pub(crate) struct MessageResponse {
    /// Human-readable description of the outcome.
    pub(crate) message: String,
}

/// Response for mutations that return the affected category.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, serde::Deserialize, PartialEq))]
pub(crate) struct CategoryResponse {
    /// Human-readable description of the outcome.
    pub(crate) message: String,

    /// The category after the mutation.
    pub(crate) category: Category,
}

/// Response for deletions that return the last contents of the removed entity.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, serde::Deserialize, PartialEq))]
pub(crate) struct DeletedResponse<T> {
    /// Human-readable description of the outcome.
    pub(crate) message: String,

    /// The entity as it was right before deletion.
    pub(crate) deleted: T,
}

/// Response for the creation of a todo.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, serde::Deserialize, PartialEq))]
pub(crate) struct TodoResponse {
    /// Human-readable description of the outcome.
    pub(crate) message: String,

    /// The newly-created todo.
    pub(crate) todo: Todo,
}

/// Handler for paths that do not match any route.
async fn not_found() -> RestError {
    RestError::NotFound("Not found".to_owned())
}

/// Handler for known paths requested with an unsupported method.
async fn method_not_allowed() -> RestError {
    RestError::MethodNotAllowed
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::{delete, get};
    Router::new()
        .route("/api/categories", get(categories_get::handler).post(categories_post::handler))
        .route("/api/categories/meta/types", get(category_types_get::handler))
        .route(
            "/api/categories/:category_id",
            get(category_get::handler).put(category_put::handler).delete(category_delete::handler),
        )
        .route("/api/users/:user_id", get(user_get::handler).delete(user_delete::handler))
        .route("/api/user/:user_id/todos", get(todos_get::handler).post(todos_post::handler))
        .route("/api/user/:user_id/todos/:todo_id", delete(todo_delete::handler))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .with_state(driver)
}
