// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt::{Debug, Formatter};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tessera_common::{Command, FrameBuffer, Opcode, PremulRgba8};

use crate::dispatch::Dispatcher;
use crate::renderer::RendererExited;
use crate::worker::Worker;

/// A dispatcher running one long-lived worker loop per pool thread.
///
/// Every worker receives every command on its own channel, in issue order;
/// the round-robin tile shard decides which part of the work each worker
/// performs. Replies (finish acknowledgements) flow back on a single shared
/// channel.
pub(crate) struct MultiThreadedDispatcher {
    // Dropping the senders disconnects the command channels, which ends any
    // worker loop that has not already seen an explicit exit command.
    senders: Vec<Sender<Command>>,
    replies: Receiver<Opcode>,
    _pool: ThreadPool,
    num_workers: u16,
    exited: bool,
}

impl MultiThreadedDispatcher {
    pub(crate) fn new(num_workers: u16) -> Self {
        assert!(num_workers > 0, "worker count must be non-zero");

        let pool = ThreadPoolBuilder::new()
            .num_threads(usize::from(num_workers))
            .build()
            .unwrap();

        let (reply_tx, reply_rx) = crossbeam_channel::unbounded();

        let mut senders = Vec::with_capacity(usize::from(num_workers));
        let mut receivers = Vec::with_capacity(usize::from(num_workers));
        for _ in 0..num_workers {
            let (tx, rx) = crossbeam_channel::unbounded();
            senders.push(tx);
            receivers.push(rx);
        }
        let receivers = Arc::new(receivers);

        pool.spawn_broadcast(move |ctx| {
            let worker_id = ctx.index() as u16;
            let receiver = receivers[ctx.index()].clone();
            let mut worker = Worker::new(worker_id, num_workers, reply_tx.clone());

            while let Ok(cmd) = receiver.recv() {
                if worker.handle(cmd).is_break() {
                    break;
                }
            }

            // Returning drops this worker's reply sender. Once the last
            // worker is gone the reply channel disconnects, which is how the
            // host observes termination: a `finish` issued after exit sees
            // the disconnect instead of blocking forever.
        });

        Self {
            senders,
            replies: reply_rx,
            _pool: pool,
            num_workers,
            exited: false,
        }
    }

    fn broadcast(&self, cmd: Command) {
        for sender in &self.senders {
            // A send fails only once the worker on the other end has exited;
            // commands issued after that point are dropped.
            let _ = sender.send(cmd.clone());
        }
    }
}

impl Dispatcher for MultiThreadedDispatcher {
    fn set_framebuffer(&mut self, target: Arc<FrameBuffer>) {
        self.broadcast(Command::SetFramebuffer { target });
    }

    fn clear_tiles(&mut self, value: PremulRgba8) {
        self.broadcast(Command::ClearTiles { value });
    }

    fn invert_tiles(&mut self) {
        self.broadcast(Command::InvertTiles);
    }

    fn finish(&mut self) -> Result<(), RendererExited> {
        if self.exited {
            return Err(RendererExited);
        }
        self.broadcast(Command::Finish);

        // Each worker acknowledges with one token once its transfers have
        // drained; all tile writes issued before the finish are visible in
        // the framebuffer once the last acknowledgement arrives.
        for _ in 0..self.num_workers {
            match self.replies.recv() {
                Ok(token) => debug_assert_eq!(token, Opcode::Finish),
                Err(_) => return Err(RendererExited),
            }
        }

        Ok(())
    }

    fn exit(&mut self) {
        if !self.exited {
            self.broadcast(Command::Exit);
            self.exited = true;
        }
    }

    fn num_workers(&self) -> u16 {
        self.num_workers
    }
}

impl Debug for MultiThreadedDispatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str("MultiThreadedDispatcher { .. }")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crossbeam_channel::RecvTimeoutError;
    use tessera_common::{FrameBuffer, PremulRgba8, TileGrid};

    use crate::dispatch::Dispatcher;
    use crate::dispatch::multi_threaded::MultiThreadedDispatcher;
    use crate::renderer::RendererExited;

    #[test]
    fn exit_discards_queued_commands() {
        let mut dispatcher = MultiThreadedDispatcher::new(2);
        let fb = Arc::new(FrameBuffer::new(TileGrid::new(64, 64)));

        dispatcher.set_framebuffer(fb.clone());
        dispatcher.clear_tiles(PremulRgba8::from_u32(0x1111_1111));
        dispatcher.finish().unwrap();

        // The clear queued behind the exit is never executed: each worker
        // sees the exit first and terminates its loop.
        dispatcher.exit();
        dispatcher.clear_tiles(PremulRgba8::from_u32(0x2222_2222));

        assert_eq!(dispatcher.finish(), Err(RendererExited));
        assert!(fb.to_vec().iter().all(|&w| w == 0x1111_1111));
    }

    #[test]
    fn exit_produces_no_reply() {
        let mut dispatcher = MultiThreadedDispatcher::new(2);
        dispatcher.exit();

        // Once both workers terminate, the reply channel disconnects without
        // ever carrying a token.
        assert_eq!(
            dispatcher.replies.recv_timeout(Duration::from_secs(10)),
            Err(RecvTimeoutError::Disconnected)
        );
    }

    #[test]
    fn dropping_the_dispatcher_ends_the_workers() {
        let dispatcher = MultiThreadedDispatcher::new(4);
        let replies = dispatcher.replies.clone();
        drop(dispatcher);

        assert_eq!(
            replies.recv_timeout(Duration::from_secs(10)),
            Err(RecvTimeoutError::Disconnected)
        );
    }
}
