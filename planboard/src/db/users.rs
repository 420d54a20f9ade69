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

//! Persistence of users.

use crate::model::{User, UserId};
#[cfg(test)]
use planboard_core::db::sqlite;
use planboard_core::db::{DbError, DbResult, Executor, postgres};
use sqlx::Row;
use sqlx::postgres::PgRow;
#[cfg(test)]
use sqlx::sqlite::SqliteRow;

impl TryFrom<PgRow> for User {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let user_id: String = row.try_get("user_id").map_err(postgres::map_sqlx_error)?;
        Ok(User::new(UserId::new(user_id)?))
    }
}

#[cfg(test)]
impl TryFrom<SqliteRow> for User {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let user_id: String = row.try_get("user_id").map_err(sqlite::map_sqlx_error)?;
        Ok(User::new(UserId::new(user_id)?))
    }
}

/// Registers a new user.  Users are created by an external system in production, so this only
/// exists to set up tests.
#[cfg(test)]
pub(crate) async fn create_user(ex: &mut Executor, user_id: &UserId) -> DbResult<User> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "INSERT INTO users (user_id) VALUES ($1) RETURNING user_id";
            let row = sqlx::query(query_str)
                .bind(user_id.as_str())
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            User::try_from(row)
        }

        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO users (user_id) VALUES (?) RETURNING user_id";
            let row = sqlx::query(query_str)
                .bind(user_id.as_str())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            User::try_from(row)
        }
    }
}

/// Gets the user identified by `user_id`.
pub(crate) async fn get_user(ex: &mut Executor, user_id: &UserId) -> DbResult<User> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "SELECT user_id FROM users WHERE user_id = $1";
            let row = sqlx::query(query_str)
                .bind(user_id.as_str())
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            User::try_from(row)
        }

        #[cfg(test)]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT user_id FROM users WHERE user_id = ?";
            let row = sqlx::query(query_str)
                .bind(user_id.as_str())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            User::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Deletes the user identified by `user_id` and returns its last contents.
pub(crate) async fn delete_user(ex: &mut Executor, user_id: &UserId) -> DbResult<User> {
    let user = match ex {
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM users WHERE user_id = $1 RETURNING user_id";
            let maybe_row = sqlx::query(query_str)
                .bind(user_id.as_str())
                .fetch_optional(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            maybe_row.map(User::try_from)
        }

        #[cfg(test)]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM users WHERE user_id = ? RETURNING user_id";
            let maybe_row = sqlx::query(query_str)
                .bind(user_id.as_str())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            maybe_row.map(User::try_from)
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    user.unwrap_or(Err(DbError::NotFound))
}
