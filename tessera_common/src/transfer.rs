// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Block transfers between framebuffer memory and per-worker staging buffers.
//!
//! Transfers follow an issue/wait protocol: issuing a transfer returns an
//! opaque in-flight handle, and the handle must be waited on before the
//! staging buffer involved is reused. Command handlers drain the engine
//! before returning, so no transfer can outlive the command that issued it.

use core::mem;

use static_assertions::const_assert;

use crate::framebuffer::FrameBuffer;
use crate::tile::Tile;

/// The minimum alignment of transfer source/destination addresses, in bytes.
pub const TRANSFER_ALIGN: usize = 16;

/// The number of transfer tags an engine can have in flight at once.
const NUM_TAGS: u8 = 32;

/// A staging buffer holding one tile's worth of pixels.
///
/// Staging buffers are transient and exclusively owned by the worker that
/// allocated them. The type is over-aligned to satisfy [`TRANSFER_ALIGN`].
#[derive(Debug, Clone)]
#[repr(C, align(16))]
pub struct TileBuf {
    words: [u32; Tile::PIXELS],
}

const_assert!(mem::align_of::<TileBuf>() >= TRANSFER_ALIGN);
const_assert!(mem::size_of::<TileBuf>() == Tile::BYTES);

impl TileBuf {
    /// Create a zeroed staging buffer.
    pub fn new() -> Self {
        Self {
            words: [0; Tile::PIXELS],
        }
    }

    /// Create a staging buffer with every pixel set to `value`.
    pub fn filled(value: u32) -> Self {
        Self {
            words: [value; Tile::PIXELS],
        }
    }

    /// Set every pixel to `value`.
    pub fn fill(&mut self, value: u32) {
        self.words.fill(value);
    }

    /// Return the pixel words of this buffer.
    pub fn words(&self) -> &[u32; Tile::PIXELS] {
        &self.words
    }

    /// Return mutable access to the pixel words of this buffer.
    pub fn words_mut(&mut self) -> &mut [u32; Tile::PIXELS] {
        &mut self.words
    }

    /// Return the buffer contents as raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }
}

impl Default for TileBuf {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier correlating an issued transfer with its completion wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferTag(u8);

/// An in-flight block transfer.
#[derive(Debug)]
#[must_use = "a transfer must be waited on before its staging buffer is reused"]
pub struct Transfer {
    tag: TransferTag,
}

impl Transfer {
    /// Return the tag this transfer was issued under.
    pub fn tag(&self) -> TransferTag {
        self.tag
    }
}

/// A per-worker engine moving whole tiles between framebuffer memory and
/// staging buffers.
///
/// This engine has no transfer hardware to overlap with, so the copy itself
/// completes at issue time; the tag bookkeeping and the blocking
/// [`wait`](Self::wait)/[`drain`](Self::drain) calls preserve the protocol an
/// asynchronous engine requires, and the outstanding count makes a missing
/// wait observable in tests.
#[derive(Debug)]
pub struct TransferEngine {
    /// Bitmask of tags with an issued, un-waited transfer.
    outstanding: u32,
    next_tag: u8,
}

impl TransferEngine {
    /// Create an engine with no transfers in flight.
    pub fn new() -> Self {
        Self {
            outstanding: 0,
            next_tag: 0,
        }
    }

    /// Issue a read of the tile at `tile_index` into `dst`.
    pub fn get(&mut self, fb: &FrameBuffer, tile_index: usize, dst: &mut TileBuf) -> Transfer {
        debug_assert_eq!(
            dst.as_bytes().as_ptr() as usize % TRANSFER_ALIGN,
            0,
            "staging buffer is not transfer-aligned"
        );

        fb.read_tile(tile_index, dst);
        self.track()
    }

    /// Issue a write of `src` to the tile at `tile_index`.
    pub fn put(&mut self, fb: &FrameBuffer, tile_index: usize, src: &TileBuf) -> Transfer {
        debug_assert_eq!(
            src.as_bytes().as_ptr() as usize % TRANSFER_ALIGN,
            0,
            "staging buffer is not transfer-aligned"
        );

        fb.write_tile(tile_index, src);
        self.track()
    }

    /// Block until the given transfer has completed, retiring its tag.
    pub fn wait(&mut self, transfer: Transfer) {
        let bit = 1_u32 << transfer.tag.0;
        debug_assert_ne!(self.outstanding & bit, 0, "waited on a retired transfer");
        self.outstanding &= !bit;
    }

    /// Block until every outstanding transfer issued by this engine has
    /// completed.
    pub fn drain(&mut self) {
        self.outstanding = 0;
    }

    /// Return the number of transfers issued but not yet waited on.
    pub fn outstanding(&self) -> u32 {
        self.outstanding.count_ones()
    }

    fn track(&mut self) -> Transfer {
        assert_ne!(
            self.outstanding,
            u32::MAX,
            "all transfer tags are in flight"
        );

        // Allocate the next free tag slot.
        let mut tag = self.next_tag;
        while self.outstanding & (1 << tag) != 0 {
            tag = (tag + 1) % NUM_TAGS;
        }
        self.next_tag = (tag + 1) % NUM_TAGS;
        self.outstanding |= 1 << tag;

        Transfer {
            tag: TransferTag(tag),
        }
    }
}

impl Default for TransferEngine {
    fn default() -> Self {
        Self::new()
    }
}
