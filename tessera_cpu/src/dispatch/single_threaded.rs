// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use crossbeam_channel::Receiver;
use tessera_common::{Command, FrameBuffer, Opcode, PremulRgba8};

use crate::dispatch::Dispatcher;
use crate::renderer::RendererExited;
use crate::worker::Worker;

/// A dispatcher that runs a single worker inline on the calling thread.
///
/// Commands execute immediately, so `finish` never actually blocks; it only
/// consumes the acknowledgement token the worker produced. The observable
/// behavior matches the multi-threaded dispatcher with one worker.
#[derive(Debug)]
pub(crate) struct SingleThreadedDispatcher {
    worker: Worker,
    replies: Receiver<Opcode>,
    exited: bool,
}

impl SingleThreadedDispatcher {
    pub(crate) fn new() -> Self {
        let (reply_tx, reply_rx) = crossbeam_channel::unbounded();

        Self {
            worker: Worker::new(0, 1, reply_tx),
            replies: reply_rx,
            exited: false,
        }
    }

    fn run(&mut self, cmd: Command) {
        // Commands after exit are dropped, matching the disconnected-channel
        // behavior of the multi-threaded dispatcher.
        if self.exited {
            return;
        }
        if self.worker.handle(cmd).is_break() {
            self.exited = true;
        }
    }
}

impl Dispatcher for SingleThreadedDispatcher {
    fn set_framebuffer(&mut self, target: Arc<FrameBuffer>) {
        self.run(Command::SetFramebuffer { target });
    }

    fn clear_tiles(&mut self, value: PremulRgba8) {
        self.run(Command::ClearTiles { value });
    }

    fn invert_tiles(&mut self) {
        self.run(Command::InvertTiles);
    }

    fn finish(&mut self) -> Result<(), RendererExited> {
        if self.exited {
            return Err(RendererExited);
        }
        self.run(Command::Finish);

        match self.replies.try_recv() {
            Ok(token) => {
                debug_assert_eq!(token, Opcode::Finish);
                Ok(())
            }
            Err(_) => Err(RendererExited),
        }
    }

    fn exit(&mut self) {
        self.run(Command::Exit);
    }

    fn num_workers(&self) -> u16 {
        1
    }
}
