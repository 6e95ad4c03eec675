//! `J`/`JEQ`/`JLT`/`JGT`/`JSUB`/`RSUB` — grounded on
//! `processor/cpu.go`'s branch cases.

use super::resolve_target_address;
use crate::cpu::decode::AddressingFlags;
use crate::cpu::CpuState;
use crate::error::VmError;
use crate::registers::RegisterId;

pub(crate) fn exec_j(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    let target = resolve_target_address(state, operand, flags)?;
    state.registers.set(RegisterId::Pc, target as i32);
    Ok(())
}

pub(crate) fn exec_jeq(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    let target = resolve_target_address(state, operand, flags)?;
    if state.registers.is_equal() {
        state.registers.set(RegisterId::Pc, target as i32);
    }
    Ok(())
}

/// Unlike `JEQ`, `JLT` always clears SW afterward, taken or not — matching
/// `processor/cpu.go`'s `case oc.JLT` where `r.Clear()` sits outside the
/// conditional.
pub(crate) fn exec_jlt(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    if state.registers.is_less() {
        let target = resolve_target_address(state, operand, flags)?;
        state.registers.set(RegisterId::Pc, target as i32);
    }
    state.registers.clear(RegisterId::Sw);
    Ok(())
}

/// Unlike `JEQ`, `JGT` always clears SW afterward, taken or not.
pub(crate) fn exec_jgt(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    if state.registers.is_greater() {
        let target = resolve_target_address(state, operand, flags)?;
        state.registers.set(RegisterId::Pc, target as i32);
    }
    state.registers.clear(RegisterId::Sw);
    Ok(())
}

/// Saves the return address (the already-advanced PC) in L, then jumps.
pub(crate) fn exec_jsub(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    let target = resolve_target_address(state, operand, flags)?;
    let return_addr = state.registers.get(RegisterId::Pc);
    state.registers.set(RegisterId::L, return_addr);
    state.registers.set(RegisterId::Pc, target as i32);
    Ok(())
}

pub(crate) fn exec_rsub(state: &mut CpuState) -> Result<(), VmError> {
    let return_addr = state.registers.get(RegisterId::L);
    state.registers.set(RegisterId::Pc, return_addr);
    Ok(())
}
