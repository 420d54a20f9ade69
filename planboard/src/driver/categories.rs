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

//! Operations on categories.

use crate::db;
use crate::driver::{Driver, map_not_found};
use crate::model::*;
use log::info;
use planboard_core::driver::DriverResult;

impl Driver {
    /// Creates a new `category` and returns it with its server-assigned properties.
    pub(crate) async fn create_category(self, category: NewCategory) -> DriverResult<Category> {
        let now = self.clock.now_utc();
        let category = db::create_category(&mut self.db.ex().await?, &category, now).await?;
        info!("Created category {} for user {}", category.category_id(), category.user_id());
        Ok(category)
    }

    /// Gets all categories that match `filter`.
    pub(crate) async fn get_categories(self, filter: CategoryFilter) -> DriverResult<Vec<Category>> {
        let categories = db::get_categories(&mut self.db.ex().await?, &filter).await?;
        Ok(categories)
    }

    /// Gets the category identified by `category_id`.
    pub(crate) async fn get_category(self, category_id: CategoryId) -> DriverResult<Category> {
        db::get_category(&mut self.db.ex().await?, category_id)
            .await
            .map_err(|e| map_not_found(e, "Category", category_id))
    }

    /// Applies `patch` to the category identified by `category_id` and returns its new contents.
    pub(crate) async fn update_category(
        self,
        category_id: CategoryId,
        patch: CategoryPatch,
    ) -> DriverResult<Category> {
        let now = self.clock.now_utc();
        let category = db::update_category(&mut self.db.ex().await?, category_id, &patch, now)
            .await
            .map_err(|e| map_not_found(e, "Category", category_id))?;
        info!("Updated category {}", category_id);
        Ok(category)
    }

    /// Deletes the category identified by `category_id` and returns its last contents.
    pub(crate) async fn delete_category(self, category_id: CategoryId) -> DriverResult<Category> {
        let category = db::delete_category(&mut self.db.ex().await?, category_id)
            .await
            .map_err(|e| map_not_found(e, "Category", category_id))?;
        info!("Deleted category {}", category_id);
        Ok(category)
    }

    /// Gets the list of supported category types.
    pub(crate) fn get_category_types(self) -> &'static [CategoryType] {
        CategoryType::ALL
    }
}
