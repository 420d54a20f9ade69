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

//! API to list the todos of a user.

use crate::driver::Driver;
use crate::model::UserId;
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

    let todos = driver.get_todos(user_id).await?;

    Ok(Json(todos))
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use planboard_core::rest::testutils::*;
    use serde_json::json;

    fn route(user_id: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/api/user/{}/todos", user_id))
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        context.create_todo("u2", "other", None).await;

        let response = OneShotBuilder::new(context.app(), route("u1"))
            .send_empty()
            .await
            .expect_json::<Vec<TodoSummary>>()
            .await;
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_only_owned_in_order() {
        let context = TestContext::setup().await;

        context.create_todo("u1", "first", None).await;
        context.create_todo("u2", "other", None).await;
        context.create_todo("u1", "second", Some(CategoryId::new(7))).await;

        let response = OneShotBuilder::new(context.app(), route("u1"))
            .send_empty()
            .await
            .expect_json::<Vec<TodoSummary>>()
            .await;
        assert_eq!(
            vec![
                TodoSummary::new(
                    "first".to_owned(),
                    "Description of first".to_owned(),
                    TodoStatus::Pending,
                    None
                ),
                TodoSummary::new(
                    "second".to_owned(),
                    "Description of second".to_owned(),
                    TodoStatus::Pending,
                    Some(CategoryId::new(7))
                ),
            ],
            response
        );
    }

    #[tokio::test]
    async fn test_projection_keys() {
        let context = TestContext::setup().await;

        context.create_todo("u1", "first", None).await;

        let response = OneShotBuilder::new(context.app(), route("u1"))
            .send_empty()
            .await
            .expect_json::<serde_json::Value>()
            .await;
        assert_eq!(
            json!([{
                "todo_name": "first",
                "todo_description": "Description of first",
                "todo_status": "pending",
                "category_id": null,
            }]),
            response
        );
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route("u1"));
}
