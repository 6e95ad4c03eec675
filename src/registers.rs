//! The SIC/XE register file.
//!
//! Nine registers, indexed by [`RegisterId`]. All arithmetic is performed in
//! full `i32` width; truncation to the 24-bit word size only happens when a
//! value is written to memory ([`crate::memory::Memory::set_word`]). This
//! mirrors `processor/registers/intRegister.go`'s plain `int32` storage, but
//! replaces the original's dynamic `Register` interface (one implementation
//! per register, selected at construction time) with a single indexed array
//! of identical cells plus register-specific helper methods, per the
//! "polymorphic registers" design note.

use crate::error::VmError;

/// Index into the register file. `#[repr(u8)]` so it doubles as a plain
/// array index without a conversion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RegisterId {
    A = 0,
    X = 1,
    L = 2,
    B = 3,
    S = 4,
    T = 5,
    F = 6,
    Pc = 7,
    Sw = 8,
}

impl RegisterId {
    pub const ALL: [RegisterId; 9] = [
        RegisterId::A,
        RegisterId::X,
        RegisterId::L,
        RegisterId::B,
        RegisterId::S,
        RegisterId::T,
        RegisterId::F,
        RegisterId::Pc,
        RegisterId::Sw,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RegisterId::A => "A",
            RegisterId::X => "X",
            RegisterId::L => "L",
            RegisterId::B => "B",
            RegisterId::S => "S",
            RegisterId::T => "T",
            RegisterId::F => "F",
            RegisterId::Pc => "PC",
            RegisterId::Sw => "SW",
        }
    }

    /// Decode a Format 2 4-bit register index (`r1`/`r2` nibbles). Matches
    /// `processor/cpu.go`'s `executeF2`, which uses the nibble directly as
    /// an index into `cpu.registers` (ordered A,X,L,B,S,T,F,PC,SW, indices
    /// 0-8) rather than the textbook's PC=8/SW=9 numbering.
    pub fn from_nibble(nibble: u8) -> Option<RegisterId> {
        match nibble {
            0 => Some(RegisterId::A),
            1 => Some(RegisterId::X),
            2 => Some(RegisterId::L),
            3 => Some(RegisterId::B),
            4 => Some(RegisterId::S),
            5 => Some(RegisterId::T),
            6 => Some(RegisterId::F),
            7 => Some(RegisterId::Pc),
            8 => Some(RegisterId::Sw),
            _ => None,
        }
    }
}

/// Status-word condition bits, per `processor/registers/swRegister.go`.
pub const SW_LESS: i32 = 0x20;
pub const SW_EQUAL: i32 = 0x40;
pub const SW_GREATER: i32 = 0x80;

/// The register file: nine cells of full-width signed storage.
#[derive(Debug, Clone)]
pub struct RegisterFile {
    cells: [i32; 9],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    pub fn new() -> Self {
        Self { cells: [0; 9] }
    }

    pub fn get(&self, id: RegisterId) -> i32 {
        self.cells[id as usize]
    }

    pub fn set(&mut self, id: RegisterId, value: i32) {
        self.cells[id as usize] = value;
    }

    pub fn add(&mut self, id: RegisterId, value: i32) {
        self.cells[id as usize] = self.cells[id as usize].wrapping_add(value);
    }

    pub fn sub(&mut self, id: RegisterId, value: i32) {
        self.cells[id as usize] = self.cells[id as usize].wrapping_sub(value);
    }

    pub fn multiply(&mut self, id: RegisterId, value: i32) {
        self.cells[id as usize] = self.cells[id as usize].wrapping_mul(value);
    }

    pub fn divide(&mut self, id: RegisterId, value: i32) -> Result<(), VmError> {
        if value == 0 {
            return Err(VmError::ArithmeticFault);
        }
        self.cells[id as usize] = self.cells[id as usize].wrapping_div(value);
        Ok(())
    }

    pub fn and(&mut self, id: RegisterId, value: i32) {
        self.cells[id as usize] &= value;
    }

    pub fn or(&mut self, id: RegisterId, value: i32) {
        self.cells[id as usize] |= value;
    }

    /// Shifts of 24 or more bits are well-defined: bits simply fall out the
    /// end, matching Go's `<<`/`>>` on `int32` (saturating at the type's own
    /// width rather than panicking, unlike Rust's default shift operators).
    pub fn shift_left(&mut self, id: RegisterId, bit_count: u32) {
        let cell = &mut self.cells[id as usize];
        *cell = if bit_count >= 32 {
            0
        } else {
            cell.wrapping_shl(bit_count)
        };
    }

    pub fn shift_right(&mut self, id: RegisterId, bit_count: u32) {
        let cell = &mut self.cells[id as usize];
        *cell = if bit_count >= 32 {
            if *cell < 0 { -1 } else { 0 }
        } else {
            cell.wrapping_shr(bit_count)
        };
    }

    pub fn clear(&mut self, id: RegisterId) {
        self.cells[id as usize] = 0;
    }

    /// Sets SW to exactly one of less/greater/equal, per `swRegister.go`'s
    /// `Compare`.
    pub fn compare(&mut self, a: i32, b: i32) {
        self.cells[RegisterId::Sw as usize] = match a.cmp(&b) {
            std::cmp::Ordering::Less => SW_LESS,
            std::cmp::Ordering::Greater => SW_GREATER,
            std::cmp::Ordering::Equal => SW_EQUAL,
        };
    }

    pub fn is_less(&self) -> bool {
        self.cells[RegisterId::Sw as usize] & SW_LESS != 0
    }

    pub fn is_greater(&self) -> bool {
        self.cells[RegisterId::Sw as usize] & SW_GREATER != 0
    }

    pub fn is_equal(&self) -> bool {
        self.cells[RegisterId::Sw as usize] & SW_EQUAL != 0
    }

    /// Snapshot for UI rendering, one formatted line per register. Matches
    /// `processor/cpu.go`'s `GetRegisters`.
    pub fn formatted(&self) -> Vec<String> {
        RegisterId::ALL
            .iter()
            .map(|&id| format!("[{}] {:#x}", id.name(), self.get(id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_is_total() {
        let mut rf = RegisterFile::new();
        for (a, b) in [(1, 2), (2, 1), (2, 2), (-5, 5), (0, 0)] {
            rf.compare(a, b);
            let flags = [rf.is_less(), rf.is_greater(), rf.is_equal()];
            assert_eq!(flags.iter().filter(|&&f| f).count(), 1, "a={a} b={b}");
        }
    }

    #[test]
    fn divide_by_zero_faults() {
        let mut rf = RegisterFile::new();
        rf.set(RegisterId::A, 10);
        assert_eq!(rf.divide(RegisterId::A, 0), Err(VmError::ArithmeticFault));
    }

    #[test]
    fn shift_left_by_24_or_more_is_well_defined() {
        let mut rf = RegisterFile::new();
        rf.set(RegisterId::A, 0xFF);
        rf.shift_left(RegisterId::A, 24);
        assert_eq!(rf.get(RegisterId::A), 0xFF << 24);
        rf.shift_left(RegisterId::A, 40);
        assert_eq!(rf.get(RegisterId::A), 0);
    }

    #[test]
    fn from_nibble_round_trips_named_registers() {
        for id in RegisterId::ALL {
            if let Some(back) = RegisterId::from_nibble(id as u8) {
                assert_eq!(back as u8, id as u8);
            }
        }
    }
}
