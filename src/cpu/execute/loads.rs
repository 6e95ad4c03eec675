//! `LDA`/`LDX`/`LDL`/`LDB`/`LDS`/`LDT`/`LDCH` — grounded on
//! `processor/cpu.go`'s load cases.

use super::{resolve_byte_operand, resolve_word_operand};
use crate::cpu::decode::AddressingFlags;
use crate::cpu::CpuState;
use crate::error::VmError;
use crate::registers::RegisterId;

pub(crate) fn exec_load(
    state: &mut CpuState,
    reg: RegisterId,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    let value = resolve_word_operand(state, operand, flags)?;
    state.registers.set(reg, value);
    Ok(())
}

/// `LDCH` overwrites all of A with the zero-extended byte — it does not
/// preserve A's upper bits, even though the textbook semantics (and a
/// masked-merge reading of the mnemonic) would suggest otherwise. Matches
/// `cpu.registers[regA].Set(int32(cpu.resolveByteOperand(...) & 0xFF))` in
/// `processor/cpu.go`.
pub(crate) fn exec_ldch(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    let byte = resolve_byte_operand(state, operand, flags)?;
    state.registers.set(RegisterId::A, byte as i32 & 0xFF);
    Ok(())
}
