//! `STA`/`STX`/`STL`/`STB`/`STS`/`STT`/`STSW`/`STCH` — grounded on
//! `processor/cpu.go`'s store cases.

use super::resolve_target_address;
use crate::cpu::decode::AddressingFlags;
use crate::cpu::CpuState;
use crate::error::VmError;
use crate::registers::RegisterId;

pub(crate) fn exec_store(
    state: &mut CpuState,
    reg: RegisterId,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    let addr = resolve_target_address(state, operand, flags)?;
    let value = state.registers.get(reg);
    state.memory.set_word(addr, value)
}

/// `STCH` stores the low byte of register B, not A — reproduced as written
/// in `processor/cpu.go`. A bug relative to the textbook semantics, but
/// left in place; see the design notes.
pub(crate) fn exec_stch(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    let addr = resolve_target_address(state, operand, flags)?;
    let byte = (state.registers.get(RegisterId::B) & 0xFF) as u8;
    state.memory.set_byte(addr, byte)
}
