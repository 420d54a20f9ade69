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

//! API to list categories.

use crate::driver::Driver;
use crate::model::CategoryFilter;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use planboard_core::rest::{EmptyBody, RestResult};
use serde::Deserialize;

/// Optional filters to narrow down the list of categories.
#[derive(Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
pub(crate) struct CategoriesQuery {
    /// Only return categories owned by this user.
    user_id: Option<String>,

    /// Only return categories of this type.
    category_type: Option<String>,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    query: Result<Query<CategoriesQuery>, QueryRejection>,
    _: EmptyBody,
) -> RestResult<impl IntoResponse> {
    let Query(query) = query?;
    let filter = CategoryFilter::new(query.user_id, query.category_type)?;

    let categories = driver.get_categories(filter).await?;

    Ok(Json(categories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use planboard_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/api/categories".to_owned())
    }

    /// Syntactic sugar to build a query with the given filters.
    fn query(user_id: Option<&str>, category_type: Option<&str>) -> CategoriesQuery {
        CategoriesQuery {
            user_id: user_id.map(str::to_owned),
            category_type: category_type.map(str::to_owned),
        }
    }

    /// Populates the database with a fixed set of categories and returns them in creation order.
    async fn populate(context: &TestContext) -> Vec<Category> {
        vec![
            context.create_category("a", None, CategoryType::Default, "u1").await,
            context.create_category("b", Some("text"), CategoryType::UserCreated, "u1").await,
            context.create_category("c", None, CategoryType::UserCreated, "u2").await,
            context.create_category("d", None, CategoryType::Default, "u2").await,
        ]
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_json::<Vec<Category>>()
            .await;
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_no_filters() {
        let context = TestContext::setup().await;
        let categories = populate(&context).await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_json::<Vec<Category>>()
            .await;
        assert_eq!(categories, response);
    }

    #[tokio::test]
    async fn test_filter_by_type() {
        let context = TestContext::setup().await;
        let mut categories = populate(&context).await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_query(query(None, Some("user_created")))
            .send_empty()
            .await
            .expect_json::<Vec<Category>>()
            .await;
        let exp: Vec<Category> = categories.drain(1..3).collect();
        assert_eq!(exp, response);
        assert!(response.iter().all(|c| *c.category_type() == CategoryType::UserCreated));
    }

    #[tokio::test]
    async fn test_filter_by_user_and_type() {
        let context = TestContext::setup().await;
        let mut categories = populate(&context).await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_query(query(Some("u2"), Some("default")))
            .send_empty()
            .await
            .expect_json::<Vec<Category>>()
            .await;
        assert_eq!(vec![categories.remove(3)], response);
    }

    #[tokio::test]
    async fn test_empty_filters_are_ignored() {
        let context = TestContext::setup().await;
        let categories = populate(&context).await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_query(query(Some(""), Some("")))
            .send_empty()
            .await
            .expect_json::<Vec<Category>>()
            .await;
        assert_eq!(categories, response);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let context = TestContext::setup().await;
        populate(&context).await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_query(query(Some("u3"), None))
            .send_empty()
            .await
            .expect_json::<Vec<Category>>()
            .await;
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_category_type() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .with_query(query(None, Some("builtin")))
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Invalid category_type 'builtin'")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route());
}
