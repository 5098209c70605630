// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the instruction metadata registry's public surface.

use tessera_ir::{ChannelMask, Opcode, lookup, source_read_masks, source_read_masks_raw};

#[test]
fn every_opcode_has_a_descriptor() {
    for raw in 0..Opcode::COUNT as u32 {
        let info = lookup(raw).unwrap();
        assert!(!info.name.is_empty());
    }
    assert!(lookup(Opcode::COUNT as u32).is_err());
}

#[test]
fn mask_computation_follows_the_descriptor_shape() {
    for opcode in Opcode::all() {
        let info = opcode.info();
        let masks = source_read_masks(opcode, ChannelMask::ALL);

        for (i, mask) in masks.iter().enumerate() {
            if i >= usize::from(info.num_src_regs) {
                assert!(mask.is_empty(), "{opcode} reads past its operands");
            } else if info.is_componentwise {
                assert_eq!(*mask, ChannelMask::ALL);
            } else if info.is_standard_scalar {
                assert_eq!(*mask, ChannelMask::X);
            } else {
                // Irregular ops read a fixed, non-empty set from each operand.
                assert!(!mask.is_empty(), "{opcode} src {i}");
            }
        }
    }
}

#[test]
fn raw_and_typed_entry_points_agree() {
    for opcode in Opcode::all() {
        for bits in 0..=0b1111 {
            let mask = ChannelMask::from_bits(bits);
            assert_eq!(
                source_read_masks_raw(opcode as u32, mask).unwrap(),
                source_read_masks(opcode, mask)
            );
        }
    }
}
