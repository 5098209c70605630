// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared framebuffer memory.

use core::fmt::{Debug, Formatter};
use core::sync::atomic::{AtomicU32, Ordering};

use crate::tile::{Tile, TileGrid};
use crate::transfer::TileBuf;

/// Linear framebuffer memory, shared between the host and all workers.
///
/// Pixels are packed 32-bit RGBA words laid out tile by tile: the words of the
/// tile with linear index `i` occupy `[i * Tile::PIXELS, (i + 1) * Tile::PIXELS)`,
/// and within a tile pixels are in row-major order.
///
/// The memory is a slice of atomics so that workers can write their disjoint
/// tiles concurrently without locks. All accesses are relaxed; the ownership
/// partition makes every access uncontended, and visibility of a worker's
/// writes to other threads is established by the command/reply channel edges,
/// not by the pixel words themselves.
pub struct FrameBuffer {
    grid: TileGrid,
    words: Box<[AtomicU32]>,
}

impl FrameBuffer {
    /// Allocate framebuffer memory for the given grid, initialized to zero.
    pub fn new(grid: TileGrid) -> Self {
        let len = grid.num_tiles() * Tile::PIXELS;
        let words = (0..len).map(|_| AtomicU32::new(0)).collect();

        Self { grid, words }
    }

    /// Return the grid descriptor this memory is laid out for.
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Return the width of the framebuffer in pixels.
    pub fn width(&self) -> u16 {
        self.grid.width()
    }

    /// Return the height of the framebuffer in pixels.
    pub fn height(&self) -> u16 {
        self.grid.height()
    }

    /// Read the packed pixel at `(x, y)`.
    ///
    /// Panics if the coordinates are out of range.
    pub fn pixel(&self, x: u16, y: u16) -> u32 {
        assert!(
            x < self.grid.width() && y < self.grid.height(),
            "attempted to read an out-of-bounds pixel"
        );

        let tile = self.grid.tile_index_of_pixel(x, y);
        let in_tile = usize::from(y % Tile::SIZE) * usize::from(Tile::SIZE)
            + usize::from(x % Tile::SIZE);
        self.words[self.grid.word_offset(tile) + in_tile].load(Ordering::Relaxed)
    }

    /// Snapshot the framebuffer contents in storage (tile-major) order.
    pub fn to_vec(&self) -> Vec<u32> {
        self.words
            .iter()
            .map(|w| w.load(Ordering::Relaxed))
            .collect()
    }

    /// Snapshot the framebuffer contents as raw bytes, in storage order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let words = self.to_vec();
        bytemuck::cast_slice(&words).to_vec()
    }

    /// Copy one tile out of framebuffer memory into a staging buffer.
    pub(crate) fn read_tile(&self, tile_index: usize, dst: &mut TileBuf) {
        let base = self.grid.word_offset(tile_index);
        for (i, word) in dst.words_mut().iter_mut().enumerate() {
            *word = self.words[base + i].load(Ordering::Relaxed);
        }
    }

    /// Copy one tile from a staging buffer into framebuffer memory.
    pub(crate) fn write_tile(&self, tile_index: usize, src: &TileBuf) {
        let base = self.grid.word_offset(tile_index);
        for (i, word) in src.words().iter().enumerate() {
            self.words[base + i].store(*word, Ordering::Relaxed);
        }
    }
}

impl Debug for FrameBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("grid", &self.grid)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::framebuffer::FrameBuffer;
    use crate::tile::{Tile, TileGrid};
    use crate::transfer::TileBuf;

    #[test]
    fn starts_zeroed() {
        let fb = FrameBuffer::new(TileGrid::new(64, 64));
        assert!(fb.to_vec().iter().all(|&w| w == 0));
        assert_eq!(fb.pixel(63, 63), 0);
    }

    #[test]
    fn pixel_uses_tiled_addressing() {
        let fb = FrameBuffer::new(TileGrid::new(64, 64));

        // Write tile (1, 1) and check that pixels inside it (and only those)
        // see the value.
        let buf = TileBuf::filled(0xFF00_00FF);
        fb.write_tile(fb.grid().tile_index(1, 1), &buf);

        assert_eq!(fb.pixel(40, 40), 0xFF00_00FF);
        assert_eq!(fb.pixel(32, 32), 0xFF00_00FF);
        assert_eq!(fb.pixel(31, 32), 0);
        assert_eq!(fb.pixel(32, 31), 0);
    }

    #[test]
    fn byte_snapshot_matches_words() {
        let fb = FrameBuffer::new(TileGrid::new(32, 32));
        let buf = TileBuf::filled(0x0102_0304);
        fb.write_tile(0, &buf);

        let bytes = fb.to_bytes();
        assert_eq!(bytes.len(), Tile::BYTES);
        assert_eq!(
            u32::from_ne_bytes(bytes[..4].try_into().unwrap()),
            0x0102_0304
        );
    }
}
