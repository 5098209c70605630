// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instruction metadata for the tessera shader pipeline.
//!
//! This crate is a static registry: a compile-time table mapping each opcode
//! to its structural properties (operand count, destination, shape), and the
//! pure function that computes, for an instruction and a requested destination
//! write-mask, which channels of each source operand are actually read. A
//! compiler or scheduler builds dead-channel elimination and dependency
//! tracking on top of these facts.

mod mask;
mod opcode;
mod usage;

pub use mask::ChannelMask;
pub use opcode::{InvalidOpcode, Opcode, OpcodeInfo, lookup};
pub use usage::{MAX_SRC_REGS, source_read_masks, source_read_masks_raw};
