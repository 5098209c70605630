// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(feature = "multithreading")]
pub(crate) mod multi_threaded;
pub(crate) mod single_threaded;

use core::fmt::Debug;
use std::sync::Arc;

use tessera_common::{FrameBuffer, PremulRgba8};

use crate::renderer::RendererExited;

pub(crate) trait Dispatcher: Debug + Send {
    fn set_framebuffer(&mut self, target: Arc<FrameBuffer>);
    fn clear_tiles(&mut self, value: PremulRgba8);
    fn invert_tiles(&mut self);
    /// Block until every worker has drained its transfers and acknowledged.
    fn finish(&mut self) -> Result<(), RendererExited>;
    /// Terminate the worker loops. Commands issued afterwards are dropped.
    fn exit(&mut self);
    fn num_workers(&self) -> u16;
}
