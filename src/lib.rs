// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! harmonia: a spelled music theory engine.

pub mod config;
pub mod music;
