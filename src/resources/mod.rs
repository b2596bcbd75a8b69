// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource declarations and the graph they are collected in.

pub mod certmanager;
pub mod declaration;
pub mod graph;
pub mod helm;
pub mod istio;

pub use declaration::{
    CustomTimeouts, ResourceBody, ResourceDeclaration, ResourceHandle, ResourceKind,
    SensitiveString,
};
pub use graph::{DeclarationGraph, ProvisioningEngine};
