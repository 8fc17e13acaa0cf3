// ABOUTME: Command modules for liftlog-cli
// ABOUTME: History report generation and detail cache inspection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod cache;
pub mod history;
