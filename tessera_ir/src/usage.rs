// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Computing which source channels an instruction actually reads.

use crate::mask::ChannelMask;
use crate::opcode::{InvalidOpcode, Opcode};

/// The maximum number of source operands an instruction can have.
pub const MAX_SRC_REGS: usize = 3;

/// Compute the channels read from each source operand, given the write-mask
/// requested of the destination.
///
/// The returned array has one entry per possible source; entries at or above
/// the opcode's `num_src_regs` are always empty.
///
/// Most opcodes fall into one of two regular shapes: componentwise ops
/// propagate the destination mask to every source unchanged, and standard
/// scalar ops collapse every source to lane X no matter which destination
/// channels are requested. The remaining ops have fixed per-operand rules
/// independent of the destination mask. Two cases ignore the destination mask
/// entirely because they have no destination to gate them: the kill predicate
/// reads every channel, and conditional flow control reads lane X.
///
/// The function is pure; calling it twice with the same inputs yields the
/// same result.
pub fn source_read_masks(op: Opcode, dst_write_mask: ChannelMask) -> [ChannelMask; MAX_SRC_REGS] {
    let mut masks = [ChannelMask::NONE; MAX_SRC_REGS];

    // Unconditional reads: no destination exists to mask these away.
    match op {
        Opcode::Kil => {
            masks[0] = ChannelMask::ALL;
            return masks;
        }
        Opcode::If => {
            masks[0] = ChannelMask::X;
            return masks;
        }
        _ => {}
    }

    // An entirely unused result requires nothing to be read.
    if dst_write_mask.is_empty() {
        return masks;
    }

    let info = op.info();
    let num_src_regs = usize::from(info.num_src_regs);

    if info.is_componentwise {
        for mask in masks.iter_mut().take(num_src_regs) {
            *mask = dst_write_mask;
        }
    } else if info.is_standard_scalar {
        for mask in masks.iter_mut().take(num_src_regs) {
            *mask = ChannelMask::X;
        }
    } else {
        match op {
            Opcode::Dp3 | Opcode::Xpd => {
                masks[0] = ChannelMask::XYZ;
                masks[1] = ChannelMask::XYZ;
            }
            Opcode::Dp4 => {
                masks[0] = ChannelMask::ALL;
                masks[1] = ChannelMask::ALL;
            }
            Opcode::Dph => {
                masks[0] = ChannelMask::XYZ;
                masks[1] = ChannelMask::ALL;
            }
            Opcode::Dst => {
                masks[0] = ChannelMask::Y.union(ChannelMask::Z);
                masks[1] = ChannelMask::Y.union(ChannelMask::W);
            }
            Opcode::Lit => {
                masks[0] = ChannelMask::X.union(ChannelMask::Y).union(ChannelMask::W);
            }
            Opcode::Tex | Opcode::Txb | Opcode::Txp => {
                masks[0] = ChannelMask::ALL;
            }
            // Flow control other than `If` reads nothing.
            _ => {}
        }
    }

    masks
}

/// As [`source_read_masks`], keyed by a raw opcode integer.
pub fn source_read_masks_raw(
    raw: u32,
    dst_write_mask: ChannelMask,
) -> Result<[ChannelMask; MAX_SRC_REGS], InvalidOpcode> {
    Ok(source_read_masks(Opcode::from_u32(raw)?, dst_write_mask))
}
