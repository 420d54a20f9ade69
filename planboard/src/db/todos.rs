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

//! Persistence of todos.

use crate::model::{CategoryId, NewTodo, Todo, TodoId, TodoSummary, UserId};
#[cfg(test)]
use planboard_core::db::sqlite::{self, build_timestamp, unpack_timestamp};
use planboard_core::db::{DbError, DbResult, Executor, postgres};
use sqlx::Row;
use sqlx::postgres::PgRow;
#[cfg(test)]
use sqlx::sqlite::SqliteRow;
use time::OffsetDateTime;

impl TryFrom<PgRow> for Todo {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let todo_id: i64 = row.try_get("todo_id").map_err(postgres::map_sqlx_error)?;
        let todo_name: String = row.try_get("todo_name").map_err(postgres::map_sqlx_error)?;
        let todo_description: String =
            row.try_get("todo_description").map_err(postgres::map_sqlx_error)?;
        let todo_type: String = row.try_get("todo_type").map_err(postgres::map_sqlx_error)?;
        let todo_status: String = row.try_get("todo_status").map_err(postgres::map_sqlx_error)?;
        let user_id: String = row.try_get("user_id").map_err(postgres::map_sqlx_error)?;
        let category_id: Option<i64> =
            row.try_get("category_id").map_err(postgres::map_sqlx_error)?;
        let created_at: OffsetDateTime =
            row.try_get("created_at").map_err(postgres::map_sqlx_error)?;

        let todo = NewTodo {
            todo_name,
            todo_description,
            todo_type: todo_type.parse()?,
            todo_status: todo_status.parse()?,
            user_id: UserId::new(user_id)?,
            category_id: category_id.map(CategoryId::new),
        };
        Ok(todo.into_todo(TodoId::new(todo_id), created_at))
    }
}

impl TryFrom<PgRow> for TodoSummary {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let todo_name: String = row.try_get("todo_name").map_err(postgres::map_sqlx_error)?;
        let todo_description: String =
            row.try_get("todo_description").map_err(postgres::map_sqlx_error)?;
        let todo_status: String = row.try_get("todo_status").map_err(postgres::map_sqlx_error)?;
        let category_id: Option<i64> =
            row.try_get("category_id").map_err(postgres::map_sqlx_error)?;

        Ok(TodoSummary::new(
            todo_name,
            todo_description,
            todo_status.parse()?,
            category_id.map(CategoryId::new),
        ))
    }
}

#[cfg(test)]
impl TryFrom<SqliteRow> for Todo {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let todo_id: i64 = row.try_get("todo_id").map_err(sqlite::map_sqlx_error)?;
        let todo_name: String = row.try_get("todo_name").map_err(sqlite::map_sqlx_error)?;
        let todo_description: String =
            row.try_get("todo_description").map_err(sqlite::map_sqlx_error)?;
        let todo_type: String = row.try_get("todo_type").map_err(sqlite::map_sqlx_error)?;
        let todo_status: String = row.try_get("todo_status").map_err(sqlite::map_sqlx_error)?;
        let user_id: String = row.try_get("user_id").map_err(sqlite::map_sqlx_error)?;
        let category_id: Option<i64> =
            row.try_get("category_id").map_err(sqlite::map_sqlx_error)?;
        let created_at_secs: i64 =
            row.try_get("created_at_secs").map_err(sqlite::map_sqlx_error)?;
        let created_at_nsecs: i64 =
            row.try_get("created_at_nsecs").map_err(sqlite::map_sqlx_error)?;

        let todo = NewTodo {
            todo_name,
            todo_description,
            todo_type: todo_type.parse()?,
            todo_status: todo_status.parse()?,
            user_id: UserId::new(user_id)?,
            category_id: category_id.map(CategoryId::new),
        };
        Ok(todo.into_todo(TodoId::new(todo_id), build_timestamp(created_at_secs, created_at_nsecs)?))
    }
}

#[cfg(test)]
impl TryFrom<SqliteRow> for TodoSummary {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let todo_name: String = row.try_get("todo_name").map_err(sqlite::map_sqlx_error)?;
        let todo_description: String =
            row.try_get("todo_description").map_err(sqlite::map_sqlx_error)?;
        let todo_status: String = row.try_get("todo_status").map_err(sqlite::map_sqlx_error)?;
        let category_id: Option<i64> =
            row.try_get("category_id").map_err(sqlite::map_sqlx_error)?;

        Ok(TodoSummary::new(
            todo_name,
            todo_description,
            todo_status.parse()?,
            category_id.map(CategoryId::new),
        ))
    }
}

/// Stores a new `todo` created at `now` and returns it with its assigned identifier.
pub(crate) async fn create_todo(
    ex: &mut Executor,
    todo: &NewTodo,
    now: OffsetDateTime,
) -> DbResult<Todo> {
    let category_id = todo.category_id.map(|id| id.as_i64());

    match ex {
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO todos
                    (todo_name, todo_description, todo_type, todo_status, user_id, category_id,
                    created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *";
            let row = sqlx::query(query_str)
                .bind(todo.todo_name.as_str())
                .bind(todo.todo_description.as_str())
                .bind(todo.todo_type.as_str())
                .bind(todo.todo_status.as_str())
                .bind(todo.user_id.as_str())
                .bind(category_id)
                .bind(now)
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            Todo::try_from(row)
        }

        #[cfg(test)]
        Executor::Sqlite(ex) => {
            let (now_secs, now_nsecs) = unpack_timestamp(now);

            let query_str = "
                INSERT INTO todos
                    (todo_name, todo_description, todo_type, todo_status, user_id, category_id,
                    created_at_secs, created_at_nsecs)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING *";
            let row = sqlx::query(query_str)
                .bind(todo.todo_name.as_str())
                .bind(todo.todo_description.as_str())
                .bind(todo.todo_type.as_str())
                .bind(todo.todo_status.as_str())
                .bind(todo.user_id.as_str())
                .bind(category_id)
                .bind(now_secs)
                .bind(now_nsecs)
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Todo::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the todo identified by `todo_id` regardless of its owner.
#[cfg(test)]
pub(crate) async fn get_todo(ex: &mut Executor, todo_id: TodoId) -> DbResult<Todo> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM todos WHERE todo_id = $1";
            let row = sqlx::query(query_str)
                .bind(todo_id.as_i64())
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            Todo::try_from(row)
        }

        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM todos WHERE todo_id = ?";
            let row = sqlx::query(query_str)
                .bind(todo_id.as_i64())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Todo::try_from(row)
        }
    }
}

/// Gets the summaries of all todos owned by `user_id`, sorted by their identifier.
pub(crate) async fn get_todos_for_user(
    ex: &mut Executor,
    user_id: &UserId,
) -> DbResult<Vec<TodoSummary>> {
    match ex {
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT todo_name, todo_description, todo_status, category_id
                FROM todos
                WHERE user_id = $1
                ORDER BY todo_id";
            let rows = sqlx::query(query_str)
                .bind(user_id.as_str())
                .fetch_all(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(TodoSummary::try_from).collect()
        }

        #[cfg(test)]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT todo_name, todo_description, todo_status, category_id
                FROM todos
                WHERE user_id = ?
                ORDER BY todo_id";
            let rows = sqlx::query(query_str)
                .bind(user_id.as_str())
                .fetch_all(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(TodoSummary::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Deletes the todo identified by `todo_id` as long as it is owned by `user_id`.
pub(crate) async fn delete_todo(
    ex: &mut Executor,
    user_id: &UserId,
    todo_id: TodoId,
) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM todos WHERE todo_id = $1 AND user_id = $2";
            let done = sqlx::query(query_str)
                .bind(todo_id.as_i64())
                .bind(user_id.as_str())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(test)]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM todos WHERE todo_id = ? AND user_id = ?";
            let done = sqlx::query(query_str)
                .bind(todo_id.as_i64())
                .bind(user_id.as_str())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Deletion affected more than one row".to_owned())),
    }
}
