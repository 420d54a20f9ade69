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

//! Generic error types for the model layer.
//!
//! Services define their own domain types in their `model` module.  Constructors of those types
//! validate their input and report problems with a `ModelError`, which the upper layers turn into
//! data integrity problems (when reading from the database) or into invalid requests (when
//! parsing user input).

/// Model errors.  The contained string describes the problem in human-readable form.
#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct ModelError(pub String);

/// Result type for this module.
pub type ModelResult<T> = Result<T, ModelError>;

/// Treats an empty textual `value` as if it was not provided at all.
///
/// Clients tend to send empty strings for fields they did not fill in, and we want those to be
/// indistinguishable from missing fields.
pub fn nonempty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
