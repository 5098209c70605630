// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for clearing tiled framebuffers.

use tessera_tests::{WORKER_COUNTS, assert_filled, framebuffer, renderer, rgba};

#[test]
fn clear_round_trips_across_worker_counts() {
    for num_workers in WORKER_COUNTS {
        let mut renderer = renderer(num_workers);
        let fb = framebuffer(64, 64);

        renderer.set_framebuffer(fb.clone());
        renderer.clear(rgba(0xFF00_00FF));
        renderer.finish().unwrap();

        assert_filled(&fb, 0xFF00_00FF);
    }
}

#[test]
fn clear_covers_non_square_grids() {
    for num_workers in WORKER_COUNTS {
        let mut renderer = renderer(num_workers);
        let fb = framebuffer(128, 32);

        renderer.set_framebuffer(fb.clone());
        renderer.clear(rgba(0x0102_0304));
        renderer.finish().unwrap();

        assert_filled(&fb, 0x0102_0304);
    }
}

/// A 64×64 framebuffer has four 32×32 tiles in row-major order. With two
/// workers, worker 0 owns tiles {0, 2} and worker 1 owns tiles {1, 3}; the
/// pixel at (40, 40) lies in tile (1, 1), linear index 3, owned by worker 1.
#[test]
fn clear_reaches_every_worker_shard() {
    let mut renderer = renderer(2);
    let fb = framebuffer(64, 64);

    renderer.set_framebuffer(fb.clone());
    renderer.clear(rgba(0xFF00_00FF));
    renderer.finish().unwrap();

    assert_eq!(fb.pixel(40, 40), 0xFF00_00FF);
    // One probe per tile.
    for (x, y) in [(0, 0), (40, 8), (8, 40), (63, 63)] {
        assert_eq!(fb.pixel(x, y), 0xFF00_00FF, "pixel ({x}, {y})");
    }
}

#[test]
fn rebinding_a_framebuffer_replaces_it_wholesale() {
    let mut renderer = renderer(2);
    let first = framebuffer(64, 64);
    let second = framebuffer(32, 32);

    renderer.set_framebuffer(first.clone());
    renderer.clear(rgba(0xAAAA_AAAA));
    renderer.set_framebuffer(second.clone());
    renderer.clear(rgba(0xBBBB_BBBB));
    renderer.finish().unwrap();

    assert_filled(&first, 0xAAAA_AAAA);
    assert_filled(&second, 0xBBBB_BBBB);
}
