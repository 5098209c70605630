// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The opcode set and its descriptor table.

use core::fmt::{Display, Formatter};

use thiserror::Error;

/// An instruction opcode.
///
/// Opcodes form a dense range `[0, Opcode::COUNT)`; the descriptor table is
/// indexed by discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Componentwise copy.
    Mov = 0,
    /// Componentwise addition.
    Add,
    /// Componentwise subtraction.
    Sub,
    /// Componentwise multiplication.
    Mul,
    /// Componentwise multiply-add.
    Mad,
    /// Componentwise minimum.
    Min,
    /// Componentwise maximum.
    Max,
    /// Componentwise fractional part.
    Frc,
    /// Componentwise floor.
    Flr,
    /// Componentwise conditional select.
    Cmp,
    /// Scalar reciprocal, replicated.
    Rcp,
    /// Scalar reciprocal square root, replicated.
    Rsq,
    /// Scalar sine, replicated.
    Sin,
    /// Scalar cosine, replicated.
    Cos,
    /// Scalar base-2 exponential, replicated.
    Ex2,
    /// Scalar base-2 logarithm, replicated.
    Lg2,
    /// Scalar power, replicated.
    Pow,
    /// Three-component dot product.
    Dp3,
    /// Four-component dot product.
    Dp4,
    /// Homogeneous dot product.
    Dph,
    /// Distance vector.
    Dst,
    /// Cross product.
    Xpd,
    /// Lighting coefficients.
    Lit,
    /// Texture sample.
    Tex,
    /// Texture sample with LOD bias.
    Txb,
    /// Projective texture sample.
    Txp,
    /// Discard fragments on a per-channel predicate.
    Kil,
    /// Begin a conditional block.
    If,
    /// Alternative branch of a conditional block.
    Else,
    /// End a conditional block.
    Endif,
    /// End of program.
    End,
}

impl Opcode {
    /// The number of opcodes; the descriptor table covers `[0, COUNT)`.
    pub const COUNT: usize = 31;

    const ALL: [Self; Self::COUNT] = [
        Self::Mov,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Mad,
        Self::Min,
        Self::Max,
        Self::Frc,
        Self::Flr,
        Self::Cmp,
        Self::Rcp,
        Self::Rsq,
        Self::Sin,
        Self::Cos,
        Self::Ex2,
        Self::Lg2,
        Self::Pow,
        Self::Dp3,
        Self::Dp4,
        Self::Dph,
        Self::Dst,
        Self::Xpd,
        Self::Lit,
        Self::Tex,
        Self::Txb,
        Self::Txp,
        Self::Kil,
        Self::If,
        Self::Else,
        Self::Endif,
        Self::End,
    ];

    /// Decode an opcode from its dense integer representation.
    pub fn from_u32(raw: u32) -> Result<Self, InvalidOpcode> {
        usize::try_from(raw)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
            .ok_or(InvalidOpcode { value: raw })
    }

    /// Return the descriptor for this opcode.
    pub fn info(self) -> &'static OpcodeInfo {
        &INFO[self as usize]
    }

    /// Return the mnemonic of this opcode.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Iterate over every opcode in discriminant order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// An opcode integer outside the dense valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("opcode {value} is out of range")]
pub struct InvalidOpcode {
    /// The rejected value.
    pub value: u32,
}

/// Structural properties of an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    /// Mnemonic, for diagnostics only.
    pub name: &'static str,
    /// Number of source operands read, 0 to 3.
    pub num_src_regs: u8,
    /// Whether the instruction writes a result.
    pub has_dst_reg: bool,
    /// Result channel `i` depends only on channel `i` of each source.
    pub is_componentwise: bool,
    /// The instruction reads only lane X of each source and replicates a
    /// scalar result to all requested destination channels.
    pub is_standard_scalar: bool,
    /// The instruction affects control flow rather than data.
    pub is_flow_control: bool,
    /// The instruction samples a texture unit.
    pub has_texture: bool,
}

const fn componentwise(name: &'static str, num_src_regs: u8) -> OpcodeInfo {
    OpcodeInfo {
        name,
        num_src_regs,
        has_dst_reg: true,
        is_componentwise: true,
        is_standard_scalar: false,
        is_flow_control: false,
        has_texture: false,
    }
}

const fn scalar(name: &'static str, num_src_regs: u8) -> OpcodeInfo {
    OpcodeInfo {
        name,
        num_src_regs,
        has_dst_reg: true,
        is_componentwise: false,
        is_standard_scalar: true,
        is_flow_control: false,
        has_texture: false,
    }
}

const fn vector(name: &'static str, num_src_regs: u8) -> OpcodeInfo {
    OpcodeInfo {
        name,
        num_src_regs,
        has_dst_reg: true,
        is_componentwise: false,
        is_standard_scalar: false,
        is_flow_control: false,
        has_texture: false,
    }
}

const fn texture(name: &'static str) -> OpcodeInfo {
    OpcodeInfo {
        name,
        num_src_regs: 1,
        has_dst_reg: true,
        is_componentwise: false,
        is_standard_scalar: false,
        is_flow_control: false,
        has_texture: true,
    }
}

const fn predicate(name: &'static str) -> OpcodeInfo {
    OpcodeInfo {
        name,
        num_src_regs: 1,
        has_dst_reg: false,
        is_componentwise: false,
        is_standard_scalar: false,
        is_flow_control: false,
        has_texture: false,
    }
}

const fn flow(name: &'static str, num_src_regs: u8) -> OpcodeInfo {
    OpcodeInfo {
        name,
        num_src_regs,
        has_dst_reg: false,
        is_componentwise: false,
        is_standard_scalar: false,
        is_flow_control: true,
        has_texture: false,
    }
}

// Indexed by opcode discriminant; keep the order in sync with `Opcode`.
static INFO: [OpcodeInfo; Opcode::COUNT] = [
    componentwise("MOV", 1),
    componentwise("ADD", 2),
    componentwise("SUB", 2),
    componentwise("MUL", 2),
    componentwise("MAD", 3),
    componentwise("MIN", 2),
    componentwise("MAX", 2),
    componentwise("FRC", 1),
    componentwise("FLR", 1),
    componentwise("CMP", 3),
    scalar("RCP", 1),
    scalar("RSQ", 1),
    scalar("SIN", 1),
    scalar("COS", 1),
    scalar("EX2", 1),
    scalar("LG2", 1),
    scalar("POW", 2),
    vector("DP3", 2),
    vector("DP4", 2),
    vector("DPH", 2),
    vector("DST", 2),
    vector("XPD", 2),
    vector("LIT", 1),
    texture("TEX"),
    texture("TXB"),
    texture("TXP"),
    predicate("KIL"),
    flow("IF", 1),
    flow("ELSE", 0),
    flow("ENDIF", 0),
    flow("END", 0),
];

/// Look up the descriptor for a raw opcode integer.
///
/// Fails with [`InvalidOpcode`] for values at or above [`Opcode::COUNT`];
/// a zeroed or default descriptor is never returned.
pub fn lookup(raw: u32) -> Result<&'static OpcodeInfo, InvalidOpcode> {
    Ok(Opcode::from_u32(raw)?.info())
}

#[cfg(test)]
mod tests {
    use crate::opcode::{InvalidOpcode, Opcode, lookup};

    #[test]
    fn discriminants_are_dense() {
        for (i, opcode) in Opcode::all().enumerate() {
            assert_eq!(opcode as usize, i);
            assert_eq!(Opcode::from_u32(i as u32), Ok(opcode));
        }
    }

    #[test]
    fn lookup_rejects_out_of_range_values() {
        assert!(lookup(0).is_ok());
        assert!(lookup(Opcode::COUNT as u32 - 1).is_ok());
        assert_eq!(
            lookup(Opcode::COUNT as u32),
            Err(InvalidOpcode {
                value: Opcode::COUNT as u32
            })
        );
        assert_eq!(
            lookup(u32::MAX),
            Err(InvalidOpcode { value: u32::MAX })
        );
    }

    #[test]
    fn shapes_are_mutually_exclusive() {
        for opcode in Opcode::all() {
            let info = opcode.info();
            assert!(
                !(info.is_componentwise && info.is_standard_scalar),
                "{opcode} claims two shapes"
            );
            assert!(info.num_src_regs <= 3);
        }
    }

    #[test]
    fn flow_control_and_textures_are_consistent() {
        for opcode in Opcode::all() {
            let info = opcode.info();
            if info.is_flow_control {
                assert!(!info.has_dst_reg, "{opcode} is flow control with a result");
            }
            if info.has_texture {
                assert!(info.has_dst_reg, "{opcode} samples without a result");
            }
        }
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = Opcode::all().map(Opcode::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Opcode::COUNT);
    }

    #[test]
    fn display_uses_mnemonics() {
        assert_eq!(Opcode::Mad.to_string(), "MAD");
        assert_eq!(Opcode::Kil.to_string(), "KIL");
    }
}
