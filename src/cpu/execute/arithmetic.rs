//! `ADD`/`SUB`/`MUL`/`DIV`/`AND`/`OR`/`COMP` — grounded on
//! `processor/cpu.go`'s arithmetic cases. All operate on register A.

use super::resolve_word_operand;
use crate::cpu::decode::AddressingFlags;
use crate::cpu::CpuState;
use crate::error::VmError;
use crate::registers::RegisterId;

pub(crate) fn exec_add(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    let value = resolve_word_operand(state, operand, flags)?;
    state.registers.add(RegisterId::A, value);
    Ok(())
}

pub(crate) fn exec_sub(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    let value = resolve_word_operand(state, operand, flags)?;
    state.registers.sub(RegisterId::A, value);
    Ok(())
}

pub(crate) fn exec_mul(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    let value = resolve_word_operand(state, operand, flags)?;
    state.registers.multiply(RegisterId::A, value);
    Ok(())
}

pub(crate) fn exec_div(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    let value = resolve_word_operand(state, operand, flags)?;
    state.registers.divide(RegisterId::A, value)
}

pub(crate) fn exec_and(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    let value = resolve_word_operand(state, operand, flags)?;
    state.registers.and(RegisterId::A, value);
    Ok(())
}

pub(crate) fn exec_or(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    let value = resolve_word_operand(state, operand, flags)?;
    state.registers.or(RegisterId::A, value);
    Ok(())
}

pub(crate) fn exec_comp(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    let value = resolve_word_operand(state, operand, flags)?;
    let a = state.registers.get(RegisterId::A);
    state.registers.compare(a, value);
    Ok(())
}
