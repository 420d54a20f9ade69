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

//! Persistence of categories.

use crate::model::{Category, CategoryFilter, CategoryId, CategoryPatch, NewCategory, UserId};
#[cfg(test)]
use planboard_core::db::sqlite::{self, build_timestamp, unpack_timestamp};
use planboard_core::db::{DbError, DbResult, Executor, postgres};
use sqlx::Row;
use sqlx::postgres::PgRow;
#[cfg(test)]
use sqlx::sqlite::SqliteRow;
use time::OffsetDateTime;

impl TryFrom<PgRow> for Category {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let category_id: i64 = row.try_get("category_id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let description: Option<String> =
            row.try_get("description").map_err(postgres::map_sqlx_error)?;
        let category_type: String =
            row.try_get("category_type").map_err(postgres::map_sqlx_error)?;
        let user_id: String = row.try_get("user_id").map_err(postgres::map_sqlx_error)?;
        let created_at: OffsetDateTime =
            row.try_get("created_at").map_err(postgres::map_sqlx_error)?;
        let updated_at: OffsetDateTime =
            row.try_get("updated_at").map_err(postgres::map_sqlx_error)?;

        let category = NewCategory {
            name,
            description,
            category_type: category_type.parse()?,
            user_id: UserId::new(user_id)?,
        };
        Ok(category.into_category(CategoryId::new(category_id), created_at, updated_at))
    }
}

#[cfg(test)]
impl TryFrom<SqliteRow> for Category {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let category_id: i64 = row.try_get("category_id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let description: Option<String> =
            row.try_get("description").map_err(sqlite::map_sqlx_error)?;
        let category_type: String = row.try_get("category_type").map_err(sqlite::map_sqlx_error)?;
        let user_id: String = row.try_get("user_id").map_err(sqlite::map_sqlx_error)?;
        let created_at_secs: i64 =
            row.try_get("created_at_secs").map_err(sqlite::map_sqlx_error)?;
        let created_at_nsecs: i64 =
            row.try_get("created_at_nsecs").map_err(sqlite::map_sqlx_error)?;
        let updated_at_secs: i64 =
            row.try_get("updated_at_secs").map_err(sqlite::map_sqlx_error)?;
        let updated_at_nsecs: i64 =
            row.try_get("updated_at_nsecs").map_err(sqlite::map_sqlx_error)?;

        let category = NewCategory {
            name,
            description,
            category_type: category_type.parse()?,
            user_id: UserId::new(user_id)?,
        };
        Ok(category.into_category(
            CategoryId::new(category_id),
            build_timestamp(created_at_secs, created_at_nsecs)?,
            build_timestamp(updated_at_secs, updated_at_nsecs)?,
        ))
    }
}

/// Stores a new `category` created at `now` and returns it with its assigned identifier.
pub(crate) async fn create_category(
    ex: &mut Executor,
    category: &NewCategory,
    now: OffsetDateTime,
) -> DbResult<Category> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO categories
                    (name, description, category_type, user_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $5)
                RETURNING *";
            let row = sqlx::query(query_str)
                .bind(category.name.as_str())
                .bind(category.description.as_deref())
                .bind(category.category_type.as_str())
                .bind(category.user_id.as_str())
                .bind(now)
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            Category::try_from(row)
        }

        #[cfg(test)]
        Executor::Sqlite(ex) => {
            let (now_secs, now_nsecs) = unpack_timestamp(now);

            let query_str = "
                INSERT INTO categories
                    (name, description, category_type, user_id,
                    created_at_secs, created_at_nsecs, updated_at_secs, updated_at_nsecs)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING *";
            let row = sqlx::query(query_str)
                .bind(category.name.as_str())
                .bind(category.description.as_deref())
                .bind(category.category_type.as_str())
                .bind(category.user_id.as_str())
                .bind(now_secs)
                .bind(now_nsecs)
                .bind(now_secs)
                .bind(now_nsecs)
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Category::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets all categories that match `filter`, sorted by their identifier.
pub(crate) async fn get_categories(
    ex: &mut Executor,
    filter: &CategoryFilter,
) -> DbResult<Vec<Category>> {
    let user_id = filter.user_id.as_ref().map(UserId::as_str);
    let category_type = filter.category_type.as_ref().map(|t| t.as_str());

    match ex {
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT * FROM categories
                WHERE ($1::TEXT IS NULL OR user_id = $1)
                    AND ($2::TEXT IS NULL OR category_type = $2)
                ORDER BY category_id";
            let rows = sqlx::query(query_str)
                .bind(user_id)
                .bind(category_type)
                .fetch_all(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Category::try_from).collect()
        }

        #[cfg(test)]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT * FROM categories
                WHERE (? IS NULL OR user_id = ?)
                    AND (? IS NULL OR category_type = ?)
                ORDER BY category_id";
            let rows = sqlx::query(query_str)
                .bind(user_id)
                .bind(user_id)
                .bind(category_type)
                .bind(category_type)
                .fetch_all(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Category::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the category identified by `category_id`.
pub(crate) async fn get_category(ex: &mut Executor, category_id: CategoryId) -> DbResult<Category> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM categories WHERE category_id = $1";
            let row = sqlx::query(query_str)
                .bind(category_id.as_i64())
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            Category::try_from(row)
        }

        #[cfg(test)]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM categories WHERE category_id = ?";
            let row = sqlx::query(query_str)
                .bind(category_id.as_i64())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Category::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Applies `patch` to the category identified by `category_id`, marking it as updated at `now`.
///
/// Returns the contents of the category after the update.
pub(crate) async fn update_category(
    ex: &mut Executor,
    category_id: CategoryId,
    patch: &CategoryPatch,
    now: OffsetDateTime,
) -> DbResult<Category> {
    let category_type = patch.category_type.as_ref().map(|t| t.as_str());

    let category = match ex {
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE categories
                SET name = COALESCE($1, name),
                    description = COALESCE($2, description),
                    category_type = COALESCE($3, category_type),
                    updated_at = $4
                WHERE category_id = $5
                RETURNING *";
            let maybe_row = sqlx::query(query_str)
                .bind(patch.name.as_deref())
                .bind(patch.description.as_deref())
                .bind(category_type)
                .bind(now)
                .bind(category_id.as_i64())
                .fetch_optional(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            maybe_row.map(Category::try_from)
        }

        #[cfg(test)]
        Executor::Sqlite(ex) => {
            let (now_secs, now_nsecs) = unpack_timestamp(now);

            let query_str = "
                UPDATE categories
                SET name = COALESCE(?, name),
                    description = COALESCE(?, description),
                    category_type = COALESCE(?, category_type),
                    updated_at_secs = ?,
                    updated_at_nsecs = ?
                WHERE category_id = ?
                RETURNING *";
            let maybe_row = sqlx::query(query_str)
                .bind(patch.name.as_deref())
                .bind(patch.description.as_deref())
                .bind(category_type)
                .bind(now_secs)
                .bind(now_nsecs)
                .bind(category_id.as_i64())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            maybe_row.map(Category::try_from)
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    category.unwrap_or(Err(DbError::NotFound))
}

/// Deletes the category identified by `category_id` and returns its last contents.
pub(crate) async fn delete_category(
    ex: &mut Executor,
    category_id: CategoryId,
) -> DbResult<Category> {
    let category = match ex {
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM categories WHERE category_id = $1 RETURNING *";
            let maybe_row = sqlx::query(query_str)
                .bind(category_id.as_i64())
                .fetch_optional(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            maybe_row.map(Category::try_from)
        }

        #[cfg(test)]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM categories WHERE category_id = ? RETURNING *";
            let maybe_row = sqlx::query(query_str)
                .bind(category_id.as_i64())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            maybe_row.map(Category::try_from)
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    category.unwrap_or(Err(DbError::NotFound))
}
