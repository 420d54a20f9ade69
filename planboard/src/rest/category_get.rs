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

//! API to get a single category.

use crate::driver::Driver;
use crate::model::CategoryId;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use planboard_core::rest::{EmptyBody, PathParams, RestResult};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParams(category_id): PathParams<String>,
    _: EmptyBody,
) -> RestResult<impl IntoResponse> {
    let category_id = category_id.parse::<CategoryId>()?;

    let category = driver.get_category(category_id).await?;

    Ok(Json(category))
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use planboard_core::rest::testutils::*;

    fn route(category_id: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/api/categories/{}", category_id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        context.create_category("a", None, CategoryType::Default, "u1").await;
        let category =
            context.create_category("b", Some("the text"), CategoryType::UserCreated, "u1").await;

        let response =
            OneShotBuilder::new(context.app(), route(&category.category_id().to_string()))
                .send_empty()
                .await
                .expect_json::<Category>()
                .await;
        assert_eq!(category, response);
    }

    #[tokio::test]
    async fn test_missing() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route("123"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("^Category not found$")
            .await;
    }

    #[tokio::test]
    async fn test_bad_id() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route("abc"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Invalid category id")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route("1"));
}
