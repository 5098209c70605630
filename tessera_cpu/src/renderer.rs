// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host-facing renderer.

use std::sync::Arc;

use tessera_common::{FrameBuffer, PremulRgba8};
use thiserror::Error;

use crate::dispatch::Dispatcher;
#[cfg(feature = "multithreading")]
use crate::dispatch::multi_threaded::MultiThreadedDispatcher;
use crate::dispatch::single_threaded::SingleThreadedDispatcher;

/// Settings for a [`TileRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// The number of workers sharing the tile shard. Must be non-zero.
    ///
    /// Worker counts above one require the `multithreading` feature.
    pub num_workers: u16,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self { num_workers: 1 }
    }
}

/// The renderer's workers have exited; no further commands are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the renderer's workers have exited")]
pub struct RendererExited;

/// A renderer dispatching tile commands to a fixed set of workers.
///
/// The worker count is fixed for the lifetime of the renderer, so the
/// round-robin tile ownership of any bound framebuffer can never change
/// between commands.
///
/// Commands are applied to the framebuffer strictly in issue order.
/// [`finish`](Self::finish) blocks until every worker has acknowledged; after
/// it returns, all previously issued tile writes are visible to readers of
/// the framebuffer.
#[derive(Debug)]
pub struct TileRenderer {
    dispatcher: Box<dyn Dispatcher>,
}

static_assertions::assert_impl_all!(TileRenderer: Send);

impl TileRenderer {
    /// Create a renderer with the given settings.
    pub fn new(settings: RenderSettings) -> Self {
        assert!(settings.num_workers > 0, "worker count must be non-zero");

        #[cfg(feature = "multithreading")]
        if settings.num_workers > 1 {
            return Self {
                dispatcher: Box::new(MultiThreadedDispatcher::new(settings.num_workers)),
            };
        }
        #[cfg(not(feature = "multithreading"))]
        assert_eq!(
            settings.num_workers, 1,
            "worker counts above one require the `multithreading` feature"
        );

        Self {
            dispatcher: Box::new(SingleThreadedDispatcher::new()),
        }
    }

    /// Bind a framebuffer, replacing any previous one wholesale.
    ///
    /// The framebuffer's dimensions must be exact multiples of the tile size;
    /// see [`TileGrid::new`](tessera_common::TileGrid::new).
    pub fn set_framebuffer(&mut self, target: Arc<FrameBuffer>) {
        self.dispatcher.set_framebuffer(target);
    }

    /// Fill every pixel of the bound framebuffer with `value`.
    pub fn clear(&mut self, value: PremulRgba8) {
        self.dispatcher.clear_tiles(value);
    }

    /// Bitwise-complement every pixel of the bound framebuffer.
    pub fn invert(&mut self) {
        self.dispatcher.invert_tiles();
    }

    /// Block until every worker has executed all previously issued commands
    /// and drained its transfers.
    ///
    /// Fails if the workers have exited.
    pub fn finish(&mut self) -> Result<(), RendererExited> {
        self.dispatcher.finish()
    }

    /// Terminate the workers.
    ///
    /// Termination takes effect in command order: work issued before the exit
    /// still completes, while commands issued after it are dropped. No
    /// acknowledgement is sent.
    pub fn exit(&mut self) {
        self.dispatcher.exit();
    }

    /// Return the number of workers sharing the tile shard.
    pub fn num_workers(&self) -> u16 {
        self.dispatcher.num_workers()
    }
}

impl Default for TileRenderer {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}
