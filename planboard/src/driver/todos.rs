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

//! Operations on todos.

use crate::db;
use crate::driver::{Driver, map_not_found};
use crate::model::*;
use log::info;
use planboard_core::driver::DriverResult;

impl Driver {
    /// Creates a new `todo` and returns it with its server-assigned properties.
    ///
    /// The category the todo refers to, if any, is not required to exist.
    pub(crate) async fn create_todo(self, todo: NewTodo) -> DriverResult<Todo> {
        let now = self.clock.now_utc();
        let todo = db::create_todo(&mut self.db.ex().await?, &todo, now).await?;
        info!("Created todo {} for user {}", todo.todo_id(), todo.user_id());
        Ok(todo)
    }

    /// Gets the summaries of all todos owned by `user_id`.
    pub(crate) async fn get_todos(self, user_id: UserId) -> DriverResult<Vec<TodoSummary>> {
        let todos = db::get_todos_for_user(&mut self.db.ex().await?, &user_id).await?;
        Ok(todos)
    }

    /// Deletes the todo identified by `todo_id`, which must be owned by `user_id`.
    ///
    /// Todos owned by other users are reported as missing.
    pub(crate) async fn delete_todo(self, user_id: UserId, todo_id: TodoId) -> DriverResult<()> {
        db::delete_todo(&mut self.db.ex().await?, &user_id, todo_id)
            .await
            .map_err(|e| map_not_found(e, "Todo", todo_id))?;
        info!("Deleted todo {} of user {}", todo_id, user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;
    use planboard_core::clocks::Clock;
    use planboard_core::driver::DriverError;

    /// Syntactic sugar to build a todo with default type and status.
    fn new_todo(owner: &str, name: &str, category_id: Option<CategoryId>) -> NewTodo {
        NewTodo::new(
            UserId::new(owner).unwrap(),
            Some(name.to_owned()),
            Some(format!("Details of {}", name)),
            None,
            None,
            category_id,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_todo() {
        let context = TestContext::setup().await;

        let todo = context.driver().create_todo(new_todo("u1", "shop", None)).await.unwrap();
        assert_eq!(&TodoType::NonRecurring, todo.todo_type());
        assert_eq!(&TodoStatus::Pending, todo.todo_status());
        assert_eq!(&context.clock().now_utc(), todo.created_at());

        let stored = db::get_todo(&mut context.ex().await, *todo.todo_id()).await.unwrap();
        assert_eq!(todo, stored);
    }

    #[tokio::test]
    async fn test_create_todo_dangling_category() {
        let context = TestContext::setup().await;

        let todo = context
            .driver()
            .create_todo(new_todo("u1", "shop", Some(CategoryId::new(1234))))
            .await
            .unwrap();
        assert_eq!(&Some(CategoryId::new(1234)), todo.category_id());
    }

    #[tokio::test]
    async fn test_get_todos_only_for_owner() {
        let context = TestContext::setup().await;

        context.driver().create_todo(new_todo("u1", "a", None)).await.unwrap();
        context.driver().create_todo(new_todo("u2", "b", None)).await.unwrap();
        context.driver().create_todo(new_todo("u1", "c", Some(CategoryId::new(3)))).await.unwrap();

        let todos = context.driver().get_todos(UserId::new("u1").unwrap()).await.unwrap();
        assert_eq!(
            vec![
                TodoSummary::new(
                    "a".to_owned(),
                    "Details of a".to_owned(),
                    TodoStatus::Pending,
                    None
                ),
                TodoSummary::new(
                    "c".to_owned(),
                    "Details of c".to_owned(),
                    TodoStatus::Pending,
                    Some(CategoryId::new(3))
                ),
            ],
            todos
        );
    }

    #[tokio::test]
    async fn test_delete_todo_wrong_owner() {
        let context = TestContext::setup().await;

        let todo = context.driver().create_todo(new_todo("u1", "a", None)).await.unwrap();

        assert_eq!(
            DriverError::NotFound("Todo not found".to_owned()),
            context
                .driver()
                .delete_todo(UserId::new("u2").unwrap(), *todo.todo_id())
                .await
                .unwrap_err()
        );
        db::get_todo(&mut context.ex().await, *todo.todo_id()).await.unwrap();

        context.driver().delete_todo(UserId::new("u1").unwrap(), *todo.todo_id()).await.unwrap();
        db::get_todo(&mut context.ex().await, *todo.todo_id()).await.unwrap_err();
    }
}
