// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes client creation and application of composed stacks.

pub mod apply;
pub mod client;

pub use apply::apply_graph;
pub use client::create_client;
