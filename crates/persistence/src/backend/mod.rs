// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-specific helpers.
//!
//! Queries and mutations are written in Diesel DSL. The few things Diesel
//! cannot express (PRAGMA statements, `last_insert_rowid()`) live in
//! `sqlite` and are reached through `PersistenceBackend`.

pub mod sqlite;

use diesel::SqliteConnection;

use crate::error::PersistenceError;

/// Operations that need raw SQL on the connection.
pub trait PersistenceBackend {
    /// Returns the rowid assigned by the most recent insert on this connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }
}
