// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
pub mod categories;
pub mod config;
pub mod database;
pub mod filter;
pub mod form;
pub mod handlers;
pub mod list_view;
pub mod routes;
pub mod store;
