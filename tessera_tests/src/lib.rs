// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for tessera integration tests.

use std::sync::Arc;

use tessera_cpu::{FrameBuffer, PremulRgba8, RenderSettings, TileGrid, TileRenderer};

/// The worker counts the dispatcher tests run under.
pub const WORKER_COUNTS: [u16; 3] = [1, 2, 4];

/// Create a renderer with the given worker count.
pub fn renderer(num_workers: u16) -> TileRenderer {
    TileRenderer::new(RenderSettings { num_workers })
}

/// Allocate a zeroed framebuffer of the given pixel dimensions.
pub fn framebuffer(width: u16, height: u16) -> Arc<FrameBuffer> {
    Arc::new(FrameBuffer::new(TileGrid::new(width, height)))
}

/// Shorthand for a packed clear value.
pub fn rgba(value: u32) -> PremulRgba8 {
    PremulRgba8::from_u32(value)
}

/// Assert that every pixel of the framebuffer holds `expected`.
pub fn assert_filled(fb: &FrameBuffer, expected: u32) {
    for (i, word) in fb.to_vec().iter().enumerate() {
        assert_eq!(*word, expected, "word {i} differs");
    }
}
