// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-worker command interpreter.

use core::ops::ControlFlow;
use std::sync::Arc;

use crossbeam_channel::Sender;
use tessera_common::{
    Command, FrameBuffer, Opcode, PremulRgba8, TileBuf, TransferEngine, shard,
};

/// One worker's state: its identity in the shard, the current render target,
/// and its transfer engine.
///
/// A worker interprets commands one at a time and runs each to completion;
/// every transfer issued by a handler is retired before the handler returns,
/// so nothing is in flight between commands.
#[derive(Debug)]
pub(crate) struct Worker {
    worker_id: u16,
    num_workers: u16,
    target: Option<Arc<FrameBuffer>>,
    engine: TransferEngine,
    reply: Sender<Opcode>,
}

impl Worker {
    pub(crate) fn new(worker_id: u16, num_workers: u16, reply: Sender<Opcode>) -> Self {
        Self {
            worker_id,
            num_workers,
            target: None,
            engine: TransferEngine::new(),
            reply,
        }
    }

    /// Interpret one command. Returns `Break` when the worker must terminate.
    pub(crate) fn handle(&mut self, cmd: Command) -> ControlFlow<()> {
        match cmd {
            Command::SetFramebuffer { target } => self.set_framebuffer(target),
            Command::ClearTiles { value } => self.clear_tiles(value),
            Command::InvertTiles => self.invert_tiles(),
            Command::Finish => self.finish(),
            Command::Exit => return ControlFlow::Break(()),
        }

        ControlFlow::Continue(())
    }

    fn set_framebuffer(&mut self, target: Arc<FrameBuffer>) {
        self.target = Some(target);
    }

    fn clear_tiles(&mut self, value: PremulRgba8) {
        let Some(fb) = self.target.clone() else {
            log::warn!("worker {}: clear with no framebuffer bound", self.worker_id);
            return;
        };

        // Build the fill pattern once; the same staging buffer backs the put
        // for every owned tile.
        let staging = TileBuf::filled(value.to_u32());
        for tile in shard::owned_tiles(fb.grid().num_tiles(), self.worker_id, self.num_workers) {
            let transfer = self.engine.put(&fb, tile, &staging);
            // At most one transfer in flight: the buffer is reused for the
            // next tile as soon as this put retires.
            self.engine.wait(transfer);
        }
        self.engine.drain();
    }

    fn invert_tiles(&mut self) {
        let Some(fb) = self.target.clone() else {
            log::warn!(
                "worker {}: invert with no framebuffer bound",
                self.worker_id
            );
            return;
        };

        let mut staging = TileBuf::new();
        for tile in shard::owned_tiles(fb.grid().num_tiles(), self.worker_id, self.num_workers) {
            let read = self.engine.get(&fb, tile, &mut staging);
            self.engine.wait(read);

            for word in staging.words_mut() {
                *word = !*word;
            }

            let write = self.engine.put(&fb, tile, &staging);
            self.engine.wait(write);
        }
        self.engine.drain();
    }

    fn finish(&mut self) {
        self.engine.drain();
        // The send fails only when the host has gone away, in which case
        // nobody is waiting for the acknowledgement.
        let _ = self.reply.send(Opcode::Finish);
    }
}
