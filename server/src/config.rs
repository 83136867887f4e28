// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::net::SocketAddr;

use clap::Parser;

const DEFAULT_DB_URL: &str = "sqlite://database/tasks.db";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Startup settings. Each flag can also come from its environment variable.
#[derive(Parser, Debug, Clone)]
#[command(name = "tasklist-server")]
#[command(about = "Single-user task list served over HTTP")]
#[command(version)]
pub struct Config {
    /// SQLite database holding the persisted task list
    #[arg(long, env = "TASKLIST_DB_URL", default_value = DEFAULT_DB_URL)]
    pub db_url: String,

    /// Address the HTTP server listens on
    #[arg(long, env = "TASKLIST_ADDR", default_value = DEFAULT_ADDR)]
    pub addr: SocketAddr,
}
