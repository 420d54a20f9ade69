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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use crate::rest::app;
use axum::Router;
use planboard_core::clocks::testutils::SettableClock;
use planboard_core::db::sqlite::testutils::setup;
use planboard_core::db::{Db, DbError, DbResult, Executor};
use std::sync::Arc;
use time::OffsetDateTime;
use time::macros::datetime;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the app.
    db: Arc<dyn Db + Send + Sync>,

    /// The clock backing the app.
    clock: Arc<SettableClock>,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the app with an in-memory database and a fake clock.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> = Arc::from(setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::from(SettableClock::new(datetime!(2024-03-05 08:30:00 UTC)));
        let driver = Driver::new(db.clone(), clock.clone());
        let app = app(driver);
        Self { db, clock, app }
    }

    /// Returns a handle to the app under test.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the app under test.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Returns the fake clock used by the app.
    pub(crate) fn clock(&self) -> &SettableClock {
        &self.clock
    }

    /// Obtains a database executor for direct access to the data.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Stores a user with identifier `user_id`.
    pub(crate) async fn create_user(&self, user_id: &str) -> User {
        db::create_user(&mut self.ex().await, &UserId::new(user_id).unwrap()).await.unwrap()
    }

    /// Returns whether the user `user_id` is stored.
    pub(crate) async fn has_user(&self, user_id: &str) -> bool {
        match db::get_user(&mut self.ex().await, &UserId::new(user_id).unwrap()).await {
            Ok(_) => true,
            Err(DbError::NotFound) => false,
            Err(e) => panic!("Unexpected error: {}", e),
        }
    }

    /// Stores a category with the given properties at the current time of the fake clock.
    pub(crate) async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
        category_type: CategoryType,
        user_id: &str,
    ) -> Category {
        let category = NewCategory {
            name: name.to_owned(),
            description: description.map(str::to_owned),
            category_type,
            user_id: UserId::new(user_id).unwrap(),
        };
        db::create_category(&mut self.ex().await, &category, self.now()).await.unwrap()
    }

    /// Fetches the category `category_id` bypassing the app.
    pub(crate) async fn get_category(&self, category_id: CategoryId) -> DbResult<Category> {
        db::get_category(&mut self.ex().await, category_id).await
    }

    /// Stores a todo with default type and status at the current time of the fake clock.
    pub(crate) async fn create_todo(
        &self,
        user_id: &str,
        todo_name: &str,
        category_id: Option<CategoryId>,
    ) -> Todo {
        let todo = NewTodo {
            todo_name: todo_name.to_owned(),
            todo_description: format!("Description of {}", todo_name),
            todo_type: TodoType::default(),
            todo_status: TodoStatus::default(),
            user_id: UserId::new(user_id).unwrap(),
            category_id,
        };
        db::create_todo(&mut self.ex().await, &todo, self.now()).await.unwrap()
    }

    /// Fetches the todo `todo_id` bypassing the app.
    pub(crate) async fn get_todo(&self, todo_id: TodoId) -> DbResult<Todo> {
        db::get_todo(&mut self.ex().await, todo_id).await
    }

    /// Counts the number of rows in `table`.
    pub(crate) async fn count_rows(&self, table: &str) -> i64 {
        match self.ex().await {
            Executor::Sqlite(mut conn) => {
                sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
                    .fetch_one(&mut *conn)
                    .await
                    .unwrap()
            }

            #[allow(unused)]
            _ => unreachable!(),
        }
    }

    /// Drops `table` from the database to make subsequent operations on it fail.
    pub(crate) async fn drop_table(&self, table: &str) {
        match self.ex().await {
            Executor::Sqlite(mut conn) => {
                sqlx::raw_sql(&format!("DROP TABLE {}", table)).execute(&mut *conn).await.unwrap();
            }

            #[allow(unused)]
            _ => unreachable!(),
        }
    }

    /// Returns the current time of the fake clock.
    fn now(&self) -> OffsetDateTime {
        use planboard_core::clocks::Clock;
        self.clock.now_utc()
    }
}
