// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Input document and configuration tree types.

pub mod spec;
pub mod tree;

pub use spec::{IngressType, JenkinsKubernetes};
pub use tree::{merge, ConfigTree};
