// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate implements a CPU-based tile command dispatcher: a host-facing
//! renderer that feeds a narrow set of framebuffer commands to long-lived
//! worker loops. Each worker owns a disjoint, round-robin-sharded subset of
//! the framebuffer's tiles and moves pixel data through an explicit
//! block-transfer engine, so no locking is needed anywhere on the pixel path.

mod dispatch;
mod renderer;
mod worker;

pub use renderer::{RenderSettings, RendererExited, TileRenderer};
pub use tessera_common::{FrameBuffer, PremulRgba8, Tile, TileGrid};
