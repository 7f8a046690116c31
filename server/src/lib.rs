// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! HTTP service around the deadline engine: SQLite persistence, the JSON
//! API and the background reminder sweep.
pub mod config;
pub mod database;
pub mod handlers;
pub mod reminders;
pub mod routes;
