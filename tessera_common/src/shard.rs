// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static round-robin partitioning of tiles across workers.
//!
//! Tile ownership is the safety invariant of the whole dispatcher: a tile is
//! owned by exactly one worker for the duration of a command, so workers never
//! need to coordinate access to framebuffer memory. Keeping the partition rule
//! in one place lets it be tested in isolation instead of being re-derived
//! inside each command handler.

/// Returns whether the tile at `tile_index` is owned by `worker_id`.
///
/// Ownership is round-robin: worker `w` of `num_workers` owns every tile whose
/// linear index is congruent to `w` modulo `num_workers`.
///
/// Panics if `num_workers` is zero or `worker_id` is out of range.
pub fn owns_tile(tile_index: usize, worker_id: u16, num_workers: u16) -> bool {
    assert!(num_workers > 0, "worker count must be non-zero");
    assert!(worker_id < num_workers, "worker id out of range");

    tile_index % usize::from(num_workers) == usize::from(worker_id)
}

/// Returns the tile indices owned by `worker_id`, in increasing order.
///
/// The increasing visit order is relied upon by callers that want
/// deterministic per-worker traversal; it is not required for disjointness.
pub fn owned_tiles(
    num_tiles: usize,
    worker_id: u16,
    num_workers: u16,
) -> impl Iterator<Item = usize> {
    assert!(num_workers > 0, "worker count must be non-zero");
    assert!(worker_id < num_workers, "worker id out of range");

    (usize::from(worker_id)..num_tiles).step_by(usize::from(num_workers))
}

#[cfg(test)]
mod tests {
    use crate::shard::{owned_tiles, owns_tile};

    #[test]
    fn single_worker_owns_everything() {
        assert_eq!(owned_tiles(5, 0, 1).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn two_workers_interleave() {
        assert_eq!(owned_tiles(4, 0, 2).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(owned_tiles(4, 1, 2).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn partition_is_disjoint_and_complete() {
        for num_workers in [1_u16, 2, 3, 4, 7] {
            let num_tiles = 33;
            let mut owners = vec![0_u32; num_tiles];

            for worker_id in 0..num_workers {
                for tile in owned_tiles(num_tiles, worker_id, num_workers) {
                    owners[tile] += 1;
                    assert!(owns_tile(tile, worker_id, num_workers));
                }
            }

            // Every tile is owned by exactly one worker.
            assert!(owners.iter().all(|&n| n == 1));
        }
    }

    #[test]
    fn visit_order_is_increasing() {
        let tiles: Vec<_> = owned_tiles(100, 2, 3).collect();
        assert!(tiles.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    #[should_panic(expected = "worker id out of range")]
    fn worker_id_must_be_in_range() {
        let _ = owns_tile(0, 2, 2);
    }
}
