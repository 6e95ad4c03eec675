//! Opcode semantics, split by instruction family — one module per family,
//! matching the teacher's `instruction/execution/{arithmetic,branches,
//! stack,...}.rs` split. Each submodule adds one `impl CpuState` block.

mod arithmetic;
mod format2;
mod io;
mod jumps;
mod loads;
mod stores;
mod traps;

use crate::cpu::decode::{AddressingFlags, Opcode};
use crate::cpu::CpuState;
use crate::error::VmError;
use crate::registers::RegisterId;

/// Resolves a word-sized operand per `spec.md` §4.5's "operand resolution":
/// immediate is the value itself; indirect fetches twice; simple (SIC
/// legacy, or explicit n&&i) fetches once.
pub(crate) fn resolve_word_operand(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<i32, VmError> {
    if flags.is_immediate() {
        return Ok(operand);
    }
    let value = state.memory.get_word(operand as usize)?;
    if flags.is_indirect() {
        return state.memory.get_word(value as usize);
    }
    Ok(value)
}

/// Byte-sized counterpart, used by `LDCH`/`WD`/`TD`.
pub(crate) fn resolve_byte_operand(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<u8, VmError> {
    if flags.is_immediate() {
        return Ok((operand & 0xFF) as u8);
    }
    if flags.is_indirect() {
        let addr = state.memory.get_word(operand as usize)?;
        return state.memory.get_byte(addr as usize);
    }
    state.memory.get_byte(operand as usize)
}

/// Resolves a target *address* rather than a value — used by stores and
/// jumps, where the non-indirect case is already the address (no fetch),
/// and the indirect case dereferences it once. Grounded on the source's
/// `case oc.J:` handling in `processor/cpu.go`, which applies exactly this
/// single-fetch rule rather than `resolveWordOperand`'s double fetch.
pub(crate) fn resolve_target_address(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<usize, VmError> {
    if flags.is_indirect() {
        return Ok(state.memory.get_word(operand as usize)? as usize);
    }
    Ok(operand as usize)
}

/// Dispatches a decoded Format 3/4/SIC instruction. `command` is already
/// masked to its top-6-bits opcode value.
pub(crate) fn execute(
    state: &mut CpuState,
    command: u8,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    match command {
        Opcode::LDA => loads::exec_load(state, RegisterId::A, operand, flags),
        Opcode::LDX => loads::exec_load(state, RegisterId::X, operand, flags),
        Opcode::LDL => loads::exec_load(state, RegisterId::L, operand, flags),
        Opcode::LDB => loads::exec_load(state, RegisterId::B, operand, flags),
        Opcode::LDS => loads::exec_load(state, RegisterId::S, operand, flags),
        Opcode::LDT => loads::exec_load(state, RegisterId::T, operand, flags),
        Opcode::LDCH => loads::exec_ldch(state, operand, flags),

        Opcode::STA => stores::exec_store(state, RegisterId::A, operand, flags),
        Opcode::STX => stores::exec_store(state, RegisterId::X, operand, flags),
        Opcode::STL => stores::exec_store(state, RegisterId::L, operand, flags),
        Opcode::STB => stores::exec_store(state, RegisterId::B, operand, flags),
        Opcode::STS => stores::exec_store(state, RegisterId::S, operand, flags),
        Opcode::STT => stores::exec_store(state, RegisterId::T, operand, flags),
        Opcode::STSW => stores::exec_store(state, RegisterId::Sw, operand, flags),
        Opcode::STCH => stores::exec_stch(state, operand, flags),

        Opcode::ADD => arithmetic::exec_add(state, operand, flags),
        Opcode::SUB => arithmetic::exec_sub(state, operand, flags),
        Opcode::MUL => arithmetic::exec_mul(state, operand, flags),
        Opcode::DIV => arithmetic::exec_div(state, operand, flags),
        Opcode::AND => arithmetic::exec_and(state, operand, flags),
        Opcode::OR => arithmetic::exec_or(state, operand, flags),
        Opcode::COMP => arithmetic::exec_comp(state, operand, flags),

        Opcode::J => jumps::exec_j(state, operand, flags),
        Opcode::JEQ => jumps::exec_jeq(state, operand, flags),
        Opcode::JLT => jumps::exec_jlt(state, operand, flags),
        Opcode::JGT => jumps::exec_jgt(state, operand, flags),
        Opcode::JSUB => jumps::exec_jsub(state, operand, flags),
        Opcode::RSUB => jumps::exec_rsub(state),

        Opcode::RD => io::exec_rd(state, operand),
        Opcode::WD => io::exec_wd(state, operand, flags),
        Opcode::TD => Err(VmError::Unimplemented("TD")),

        Opcode::ADDF => Err(VmError::Unimplemented("ADDF")),
        Opcode::SUBF => Err(VmError::Unimplemented("SUBF")),
        Opcode::MULF => Err(VmError::Unimplemented("MULF")),
        Opcode::DIVF => Err(VmError::Unimplemented("DIVF")),
        Opcode::COMPF => Err(VmError::Unimplemented("COMPF")),
        Opcode::LDF => Err(VmError::Unimplemented("LDF")),
        Opcode::STF => Err(VmError::Unimplemented("STF")),
        Opcode::LPS => Err(VmError::Unimplemented("LPS")),
        Opcode::STI => Err(VmError::Unimplemented("STI")),
        Opcode::SSK => Err(VmError::Unimplemented("SSK")),
        Opcode::TIX => Err(VmError::Unimplemented("TIX")),

        _ => Err(VmError::DecodeFault(command, "format3")),
    }
}

pub(crate) use format2::execute_format2;
pub(crate) use traps::execute_format1;
