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

//! Entry point to the Planboard service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use log::{error, info};
use planboard::db::init_schema;
use planboard::serve;
use planboard_core::clocks::SystemClock;
use planboard_core::db::Db;
use planboard_core::db::postgres::{PostgresDb, PostgresOptions};
use planboard_core::env::get_optional_var;
use std::net::Ipv4Addr;
use std::process;
use std::sync::Arc;

/// Default port to listen on when `PORT` is not set.
const DEFAULT_PORT: u16 = 3000;

/// Prints `message` as a fatal error and terminates the process.
fn abort(message: String) -> ! {
    error!("{}", message);
    eprintln!("planboard: {}", message);
    process::exit(1);
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let port = match get_optional_var::<u16>("", "PORT") {
        Ok(port) => port.unwrap_or(DEFAULT_PORT),
        Err(e) => abort(e),
    };
    let addr = (Ipv4Addr::UNSPECIFIED, port);

    let db_opts = match PostgresOptions::from_env("PGSQL_PROD") {
        Ok(opts) => opts,
        Err(e) => abort(e),
    };
    let db = match PostgresDb::connect(db_opts) {
        Ok(db) => Arc::new(db),
        Err(e) => abort(format!("Failed to set up the database: {}", e)),
    };

    match db.ex().await {
        Ok(mut ex) => {
            if let Err(e) = init_schema(&mut ex).await {
                abort(format!("Failed to initialize the database schema: {}", e));
            }
        }
        Err(e) => abort(format!("Failed to connect to the database: {}", e)),
    }

    let result = serve(addr, db.clone(), Arc::from(SystemClock::default())).await;
    db.close().await;
    info!("Database connections closed");

    if let Err(e) = result {
        abort(format!("Server failed: {}", e));
    }
}
