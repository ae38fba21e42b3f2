//! Core special function register (CSFR) lookup.
//!
//! `mfcr`/`mtcr` address system registers by a 16-bit offset.  Which
//! offsets exist depends on the ISA revision, so every entry carries
//! the features it needs.

use tricore_mc::FeatureBits;

use crate::gen::SYS_REGS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SysReg {
    pub name: &'static str,
    pub encoding: u16,
    pub features_required: FeatureBits,
}

impl SysReg {
    /// Whether every feature this register needs is in `active`.
    #[inline]
    pub fn have_features(&self, active: FeatureBits) -> bool {
        active.contains(self.features_required)
    }
}

/// Binary search `table` for `encoding`.
///
/// `table` must be sorted by encoding, as the generated `SYS_REGS` is.
pub fn lookup_in(table: &[SysReg], encoding: u16) -> Option<&SysReg> {
    table
        .binary_search_by_key(&encoding, |r| r.encoding)
        .ok()
        .map(|i| &table[i])
}

pub fn lookup_sys_reg_by_encoding(encoding: u16) -> Option<&'static SysReg> {
    lookup_in(SYS_REGS, encoding)
}

/// Case-insensitive lookup by register name.
pub fn lookup_sys_reg_by_name(name: &str) -> Option<&'static SysReg> {
    SYS_REGS.iter().find(|r| r.name.eq_ignore_ascii_case(name))
}
