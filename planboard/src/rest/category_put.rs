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

//! API to partially update a category.

use crate::driver::Driver;
use crate::model::{CategoryId, CategoryPatch};
use crate::rest::CategoryResponse;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use planboard_core::rest::{JsonBody, PathParams, RestResult};
use serde::Deserialize;

/// Message sent to the server to update a category.  Missing fields are left unchanged.
#[derive(Deserialize)]
pub(crate) struct UpdateCategoryRequest {
    /// New name of the category.
    name: Option<String>,

    /// New description of the category.
    description: Option<String>,

    /// New origin of the category.
    category_type: Option<String>,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParams(category_id): PathParams<String>,
    JsonBody(request): JsonBody<UpdateCategoryRequest>,
) -> RestResult<impl IntoResponse> {
    let category_id = category_id.parse::<CategoryId>()?;
    let patch = CategoryPatch::new(request.name, request.description, request.category_type)?;

    let category = driver.update_category(category_id, patch).await?;

    Ok(Json(CategoryResponse { message: "Category updated".to_owned(), category }))
}
