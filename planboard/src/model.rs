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

//! High-level data types.

use derive_getters::Getters;
use planboard_core::model::{ModelError, ModelResult, nonempty};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// Defines a closed enumeration that is represented as a string on the wire and in the database.
///
/// `$field` is the name of the field that holds these values, used in error messages.
macro_rules! string_enum [
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal, {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq)]
        pub(crate) enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All possible values in their canonical order.
            pub(crate) const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Returns the textual representation of the value.
            pub(crate) fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> ModelResult<Self> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    _ => {
                        let valid = Self::ALL.iter().map($name::as_str).collect::<Vec<_>>();
                        Err(ModelError(format!(
                            "Invalid {} '{}'; must be one of: {}",
                            $field,
                            s,
                            valid.join(", ")
                        )))
                    }
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    }
];

/// Parses an optional textual value into a closed enumeration, treating empty values as missing.
fn parse_optional<T: FromStr<Err = ModelError>>(value: Option<String>) -> ModelResult<Option<T>> {
    nonempty(value).map(|v| v.parse::<T>()).transpose()
}

/// Identifier of a user.
///
/// Users are managed by an external authentication system so all we know about them is an
/// opaque, non-empty string.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "String")]
pub(crate) struct UserId(String);

impl UserId {
    /// Creates a new user identifier after validating that it is not empty.
    pub(crate) fn new<S: Into<String>>(user_id: S) -> ModelResult<Self> {
        let user_id = user_id.into();
        if user_id.is_empty() {
            return Err(ModelError("user_id cannot be empty".to_owned()));
        }
        Ok(Self(user_id))
    }

    /// Returns the string representation of the identifier.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ModelError;

    fn try_from(value: String) -> ModelResult<Self> {
        UserId::new(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a category, generated by the database on insertion.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub(crate) struct CategoryId(i64);

impl CategoryId {
    /// Wraps a raw identifier as obtained from the database.
    pub(crate) fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier for storage purposes.
    pub(crate) fn as_i64(&self) -> i64 {
        self.0
    }
}

impl FromStr for CategoryId {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        s.parse::<i64>().map(CategoryId).map_err(|_| ModelError("Invalid category id".to_owned()))
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a todo, generated by the database on insertion.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub(crate) struct TodoId(i64);

impl TodoId {
    /// Wraps a raw identifier as obtained from the database.
    pub(crate) fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier for storage purposes.
    pub(crate) fn as_i64(&self) -> i64 {
        self.0
    }
}

impl FromStr for TodoId {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        s.parse::<i64>().map(TodoId).map_err(|_| ModelError("Invalid todo id".to_owned()))
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

string_enum!(
    /// Origin of a category.
    CategoryType, "category_type", {
        /// Categories provisioned for every user.
        Default => "default",

        /// Categories defined by the user.
        UserCreated => "user_created",
    }
);

string_enum!(
    /// Recurrence of a todo.
    TodoType, "todo_type", {
        /// A one-off task.
        NonRecurring => "non-recurring",

        /// A task that repeats on a schedule.
        Recurring => "recurring",

        /// A behavior to build up over time.
        Habit => "habit",
    }
);

impl Default for TodoType {
    fn default() -> Self {
        TodoType::NonRecurring
    }
}

string_enum!(
    /// Progress of a todo.
    TodoStatus, "todo_status", {
        /// Work has not started.
        Pending => "pending",

        /// Work has started.
        InProgress => "in progress",

        /// Work is done.
        Completed => "completed",
    }
);

impl Default for TodoStatus {
    fn default() -> Self {
        TodoStatus::Pending
    }
}

/// A user as known by this service.
#[derive(Getters, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct User {
    /// Identifier of the user.
    user_id: UserId,
}

impl User {
    /// Creates a new user.
    pub(crate) fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// A category to group todos.
#[derive(Getters, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct Category {
    /// Identifier of the category.
    category_id: CategoryId,

    /// Name of the category.
    name: String,

    /// Optional free-form description of the category.
    description: Option<String>,

    /// Origin of the category.
    category_type: CategoryType,

    /// Owner of the category.
    user_id: UserId,

    /// Time when the category was created.
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,

    /// Time when the category was last modified.
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

/// Contents of a category that has yet to be stored.
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct NewCategory {
    /// Name of the category.
    pub(crate) name: String,

    /// Optional free-form description of the category.
    pub(crate) description: Option<String>,

    /// Origin of the category.
    pub(crate) category_type: CategoryType,

    /// Owner of the category.
    pub(crate) user_id: UserId,
}

impl NewCategory {
    /// Builds a new category from raw user input.
    ///
    /// The `name`, `category_type` and `user_id` are required.  An empty `description` is
    /// stored as no description.
    pub(crate) fn new(
        name: Option<String>,
        description: Option<String>,
        category_type: Option<String>,
        user_id: Option<String>,
    ) -> ModelResult<Self> {
        let (Some(name), Some(category_type), Some(user_id)) =
            (nonempty(name), nonempty(category_type), nonempty(user_id))
        else {
            return Err(ModelError("name, category_type, and user_id are required".to_owned()));
        };

        Ok(Self {
            name,
            description: nonempty(description),
            category_type: category_type.parse()?,
            user_id: UserId::new(user_id)?,
        })
    }

    /// Attaches the properties assigned by the database to turn this into a `Category`.
    pub(crate) fn into_category(
        self,
        category_id: CategoryId,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> Category {
        Category {
            category_id,
            name: self.name,
            description: self.description,
            category_type: self.category_type,
            user_id: self.user_id,
            created_at,
            updated_at,
        }
    }
}

/// Partial modification to apply to an existing category.  Fields set to `None` are left as is.
#[derive(Default)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct CategoryPatch {
    /// New name of the category.
    pub(crate) name: Option<String>,

    /// New description of the category.
    pub(crate) description: Option<String>,

    /// New origin of the category.
    pub(crate) category_type: Option<CategoryType>,
}

impl CategoryPatch {
    /// Builds a patch from raw user input, ignoring empty values.
    pub(crate) fn new(
        name: Option<String>,
        description: Option<String>,
        category_type: Option<String>,
    ) -> ModelResult<Self> {
        Ok(Self {
            name: nonempty(name),
            description: nonempty(description),
            category_type: parse_optional(category_type)?,
        })
    }
}

/// Equality filters to select categories.  Filters set to `None` match everything.
#[derive(Default)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct CategoryFilter {
    /// Only return categories owned by this user.
    pub(crate) user_id: Option<UserId>,

    /// Only return categories of this type.
    pub(crate) category_type: Option<CategoryType>,
}

impl CategoryFilter {
    /// Builds a filter from raw user input, ignoring empty values.
    pub(crate) fn new(user_id: Option<String>, category_type: Option<String>) -> ModelResult<Self> {
        Ok(Self {
            user_id: nonempty(user_id).map(UserId::new).transpose()?,
            category_type: parse_optional(category_type)?,
        })
    }
}

/// A task owned by a user.
#[derive(Getters, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct Todo {
    /// Identifier of the todo.
    todo_id: TodoId,

    /// Short name of the todo.
    todo_name: String,

    /// Longer explanation of the todo.
    todo_description: String,

    /// Recurrence of the todo.
    todo_type: TodoType,

    /// Progress of the todo.
    todo_status: TodoStatus,

    /// Owner of the todo.
    user_id: UserId,

    /// Category the todo belongs to, if any.
    category_id: Option<CategoryId>,

    /// Time when the todo was created.
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

/// Contents of a todo that has yet to be stored.
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct NewTodo {
    /// Short name of the todo.
    pub(crate) todo_name: String,

    /// Longer explanation of the todo.
    pub(crate) todo_description: String,

    /// Recurrence of the todo.
    pub(crate) todo_type: TodoType,

    /// Progress of the todo.
    pub(crate) todo_status: TodoStatus,

    /// Owner of the todo.
    pub(crate) user_id: UserId,

    /// Category the todo belongs to, if any.
    pub(crate) category_id: Option<CategoryId>,
}

impl NewTodo {
    /// Builds a new todo for `user_id` from raw user input.
    ///
    /// The `todo_name` and `todo_description` are required.  The `todo_type` and `todo_status`
    /// take their default values when missing.
    pub(crate) fn new(
        user_id: UserId,
        todo_name: Option<String>,
        todo_description: Option<String>,
        todo_type: Option<String>,
        todo_status: Option<String>,
        category_id: Option<CategoryId>,
    ) -> ModelResult<Self> {
        let (Some(todo_name), Some(todo_description)) =
            (nonempty(todo_name), nonempty(todo_description))
        else {
            return Err(ModelError("todo_name and todo_description are required".to_owned()));
        };

        Ok(Self {
            todo_name,
            todo_description,
            todo_type: parse_optional(todo_type)?.unwrap_or_default(),
            todo_status: parse_optional(todo_status)?.unwrap_or_default(),
            user_id,
            category_id,
        })
    }

    /// Attaches the properties assigned by the database to turn this into a `Todo`.
    pub(crate) fn into_todo(self, todo_id: TodoId, created_at: OffsetDateTime) -> Todo {
        Todo {
            todo_id,
            todo_name: self.todo_name,
            todo_description: self.todo_description,
            todo_type: self.todo_type,
            todo_status: self.todo_status,
            user_id: self.user_id,
            category_id: self.category_id,
            created_at,
        }
    }
}

/// Public view of a todo when listing the todos of a user.
#[derive(Getters, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct TodoSummary {
    /// Short name of the todo.
    todo_name: String,

    /// Longer explanation of the todo.
    todo_description: String,

    /// Progress of the todo.
    todo_status: TodoStatus,

    /// Category the todo belongs to, if any.
    category_id: Option<CategoryId>,
}

impl TodoSummary {
    /// Creates a new summary.
    pub(crate) fn new(
        todo_name: String,
        todo_description: String,
        todo_status: TodoStatus,
        category_id: Option<CategoryId>,
    ) -> Self {
        Self { todo_name, todo_description, todo_status, category_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{Token, assert_de_tokens_error, assert_tokens};
    use time::macros::datetime;

    #[test]
    fn test_user_id_ok() {
        assert_eq!("u1", UserId::new("u1").unwrap().as_str());
    }

    #[test]
    fn test_user_id_empty() {
        assert_eq!(ModelError("user_id cannot be empty".to_owned()), UserId::new("").unwrap_err());
        assert_de_tokens_error::<UserId>(&[Token::Str("")], "user_id cannot be empty");
    }

    #[test]
    fn test_category_id_from_str() {
        assert_eq!(CategoryId::new(42), "42".parse::<CategoryId>().unwrap());
        assert_eq!(
            ModelError("Invalid category id".to_owned()),
            "abc".parse::<CategoryId>().unwrap_err()
        );
    }

    #[test]
    fn test_todo_id_from_str() {
        assert_eq!(TodoId::new(7), "7".parse::<TodoId>().unwrap());
        assert_eq!(ModelError("Invalid todo id".to_owned()), "".parse::<TodoId>().unwrap_err());
    }

    #[test]
    fn test_category_type_ser_de() {
        assert_tokens(&CategoryType::Default, &[Token::Str("default")]);
        assert_tokens(&CategoryType::UserCreated, &[Token::Str("user_created")]);
        assert_de_tokens_error::<CategoryType>(
            &[Token::Str("user-created")],
            "Invalid category_type 'user-created'; must be one of: default, user_created",
        );
    }

    #[test]
    fn test_todo_type_ser_de() {
        assert_tokens(&TodoType::NonRecurring, &[Token::Str("non-recurring")]);
        assert_tokens(&TodoType::Recurring, &[Token::Str("recurring")]);
        assert_tokens(&TodoType::Habit, &[Token::Str("habit")]);
    }

    #[test]
    fn test_todo_status_ser_de() {
        assert_tokens(&TodoStatus::Pending, &[Token::Str("pending")]);
        assert_tokens(&TodoStatus::InProgress, &[Token::Str("in progress")]);
        assert_tokens(&TodoStatus::Completed, &[Token::Str("completed")]);
        assert_de_tokens_error::<TodoStatus>(
            &[Token::Str("in_progress")],
            "Invalid todo_status 'in_progress'; must be one of: pending, in progress, completed",
        );
    }

    #[test]
    fn test_enum_defaults() {
        assert_eq!(TodoType::NonRecurring, TodoType::default());
        assert_eq!(TodoStatus::Pending, TodoStatus::default());
    }

    #[test]
    fn test_new_category_ok() {
        let category = NewCategory::new(
            Some("Work".to_owned()),
            Some("".to_owned()),
            Some("default".to_owned()),
            Some("u1".to_owned()),
        )
        .unwrap();
        assert_eq!(
            NewCategory {
                name: "Work".to_owned(),
                description: None,
                category_type: CategoryType::Default,
                user_id: UserId::new("u1").unwrap(),
            },
            category
        );
    }

    #[test]
    fn test_new_category_missing_fields() {
        let name = || Some("Work".to_owned());
        let category_type = || Some("default".to_owned());
        let user_id = || Some("u1".to_owned());
        for (name, category_type, user_id) in [
            (None, category_type(), user_id()),
            (Some("".to_owned()), category_type(), user_id()),
            (name(), None, user_id()),
            (name(), category_type(), None),
            (name(), category_type(), Some("".to_owned())),
        ] {
            assert_eq!(
                ModelError("name, category_type, and user_id are required".to_owned()),
                NewCategory::new(name, None, category_type, user_id).unwrap_err()
            );
        }
    }

    #[test]
    fn test_new_category_bad_type() {
        let err = NewCategory::new(
            Some("Work".to_owned()),
            None,
            Some("custom".to_owned()),
            Some("u1".to_owned()),
        )
        .unwrap_err();
        assert!(err.0.starts_with("Invalid category_type 'custom'"));
    }

    #[test]
    fn test_category_patch_ignores_empty() {
        let patch =
            CategoryPatch::new(Some("".to_owned()), Some("New".to_owned()), Some("".to_owned()))
                .unwrap();
        assert_eq!(
            CategoryPatch { name: None, description: Some("New".to_owned()), category_type: None },
            patch
        );
    }

    #[test]
    fn test_category_filter() {
        assert_eq!(CategoryFilter::default(), CategoryFilter::new(None, Some("".to_owned())).unwrap());
        assert_eq!(
            CategoryFilter {
                user_id: Some(UserId::new("u1").unwrap()),
                category_type: Some(CategoryType::UserCreated),
            },
            CategoryFilter::new(Some("u1".to_owned()), Some("user_created".to_owned())).unwrap()
        );
        CategoryFilter::new(None, Some("bogus".to_owned())).unwrap_err();
    }

    #[test]
    fn test_new_todo_defaults() {
        let user_id = UserId::new("u1").unwrap();
        let todo = NewTodo::new(
            user_id.clone(),
            Some("Buy milk".to_owned()),
            Some("Two liters".to_owned()),
            None,
            Some("".to_owned()),
            None,
        )
        .unwrap();
        assert_eq!(
            NewTodo {
                todo_name: "Buy milk".to_owned(),
                todo_description: "Two liters".to_owned(),
                todo_type: TodoType::NonRecurring,
                todo_status: TodoStatus::Pending,
                user_id,
                category_id: None,
            },
            todo
        );
    }

    #[test]
    fn test_new_todo_missing_fields() {
        let user_id = UserId::new("u1").unwrap();
        for (name, description) in [
            (None, Some("d".to_owned())),
            (Some("n".to_owned()), None),
            (Some("".to_owned()), Some("d".to_owned())),
        ] {
            assert_eq!(
                ModelError("todo_name and todo_description are required".to_owned()),
                NewTodo::new(user_id.clone(), name, description, None, None, None).unwrap_err()
            );
        }
    }

    #[test]
    fn test_new_todo_bad_enums() {
        let user_id = UserId::new("u1").unwrap();
        let name = || Some("n".to_owned());
        let description = || Some("d".to_owned());
        NewTodo::new(user_id.clone(), name(), description(), Some("weekly".to_owned()), None, None)
            .unwrap_err();
        NewTodo::new(user_id, name(), description(), None, Some("done".to_owned()), None)
            .unwrap_err();
    }

    #[test]
    fn test_todo_summary_json_shape() {
        let summary = TodoSummary::new(
            "n".to_owned(),
            "d".to_owned(),
            TodoStatus::InProgress,
            None,
        );
        assert_eq!(
            serde_json::json!({
                "todo_name": "n",
                "todo_description": "d",
                "todo_status": "in progress",
                "category_id": null,
            }),
            serde_json::to_value(&summary).unwrap()
        );
    }

    #[test]
    fn test_category_json_timestamps() {
        let category = NewCategory::new(
            Some("Work".to_owned()),
            None,
            Some("default".to_owned()),
            Some("u1".to_owned()),
        )
        .unwrap()
        .into_category(
            CategoryId::new(3),
            datetime!(2024-03-05 08:30:00.123456 UTC),
            datetime!(2024-03-05 08:30:00.123456 UTC),
        );
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(serde_json::json!(3), json["category_id"]);
        assert_eq!(serde_json::json!("2024-03-05T08:30:00.123456Z"), json["created_at"]);
        assert_eq!(json["created_at"], json["updated_at"]);
        assert_eq!(serde_json::Value::Null, json["description"]);
    }
}
