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

//! API to create a category.

use crate::driver::Driver;
use crate::model::NewCategory;
use crate::rest::CategoryResponse;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Json, http};
use planboard_core::rest::{JsonBody, RestResult};
use serde::Deserialize;

/// Message sent to the server to create a category.
#[derive(Deserialize)]
pub(crate) struct CreateCategoryRequest {
    /// Name of the category.
    name: Option<String>,

    /// Optional free-form description of the category.
    description: Option<String>,

    /// Origin of the category.
    category_type: Option<String>,

    /// Owner of the category.
    user_id: Option<String>,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    JsonBody(request): JsonBody<CreateCategoryRequest>,
) -> RestResult<impl IntoResponse> {
    let category = NewCategory::new(
        request.name,
        request.description,
        request.category_type,
        request.user_id,
    )?;

    let category = driver.create_category(category).await?;

    let response = CategoryResponse { message: "Category created".to_owned(), category };
    Ok((http::StatusCode::CREATED, Json(response)))
}
