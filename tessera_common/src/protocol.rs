// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The command protocol spoken between a host and its tile workers.

use std::sync::Arc;

use peniko::color::PremulRgba8;
use thiserror::Error;

use crate::framebuffer::FrameBuffer;

/// The wire token identifying a command.
///
/// The reply channel carries bare tokens: a worker acknowledges a finish by
/// sending [`Opcode::Finish`] back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Opcode {
    /// Terminate the worker loop.
    Exit = 0,
    /// Replace the render target wholesale.
    SetFramebuffer = 1,
    /// Fill every pixel of every owned tile with a value.
    ClearTiles = 2,
    /// Bitwise-complement every pixel of every owned tile.
    InvertTiles = 3,
    /// Drain outstanding transfers and acknowledge on the reply channel.
    Finish = 4,
}

impl Opcode {
    /// Decode a wire token.
    ///
    /// A token outside the recognized set is a hard error; decoding never
    /// falls back to a default command.
    pub fn from_u32(token: u32) -> Result<Self, UnknownCommand> {
        match token {
            0 => Ok(Self::Exit),
            1 => Ok(Self::SetFramebuffer),
            2 => Ok(Self::ClearTiles),
            3 => Ok(Self::InvertTiles),
            4 => Ok(Self::Finish),
            _ => Err(UnknownCommand { token }),
        }
    }

    /// Return the wire representation of this token.
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// A command token outside the recognized set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown command token {token}")]
pub struct UnknownCommand {
    /// The rejected token value.
    pub token: u32,
}

/// A command sent from the host to every worker.
///
/// Each variant carries exactly the payload its opcode needs. A command is
/// moved into the channel whole, so a worker never observes a partially
/// written payload.
#[derive(Debug, Clone)]
pub enum Command {
    /// Replace the render target wholesale.
    SetFramebuffer {
        /// The new target; replaces any previous one.
        target: Arc<FrameBuffer>,
    },
    /// Fill every pixel of every owned tile with `value`.
    ClearTiles {
        /// The fill color.
        value: PremulRgba8,
    },
    /// Bitwise-complement every pixel of every owned tile.
    InvertTiles,
    /// Drain outstanding transfers and acknowledge on the reply channel.
    Finish,
    /// Terminate the worker loop. No acknowledgement is sent.
    Exit,
}

impl Command {
    /// Return the wire token for this command.
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::SetFramebuffer { .. } => Opcode::SetFramebuffer,
            Self::ClearTiles { .. } => Opcode::ClearTiles,
            Self::InvertTiles => Opcode::InvertTiles,
            Self::Finish => Opcode::Finish,
            Self::Exit => Opcode::Exit,
        }
    }
}
