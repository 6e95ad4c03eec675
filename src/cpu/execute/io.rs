//! `RD`/`WD` — grounded on `processor/cpu.go`'s `case oc.RD`/`case oc.WD`.
//! `TD` traps as `Unimplemented` in the family dispatcher. `RD` and `WD`
//! resolve their device number asymmetrically in the source — `RD` casts
//! the raw operand directly (`byte(operand)`), `WD` runs it through the
//! usual byte-operand resolution (`resolveByteOperand`) — reproduced here
//! rather than unified, since nothing in `spec.md` calls it out as a bug to
//! fix.

use super::resolve_byte_operand;
use crate::cpu::decode::AddressingFlags;
use crate::cpu::CpuState;
use crate::error::VmError;
use crate::registers::RegisterId;

/// Reads one byte from the addressed device, overwriting all of register A
/// with the zero-extended byte (not a masked merge into A's low byte). The
/// device number is the raw operand, not resolved through the usual
/// immediate/indirect/simple rules. Matches `processor/cpu.go`'s
/// `case oc.RD`, whose `cpu.registers[regA].Set(int32(m))` is a full
/// overwrite, not a read-modify-write.
pub(crate) fn exec_rd(state: &mut CpuState, operand: i32) -> Result<(), VmError> {
    let device_id = operand as u8;
    let byte = state.devices.get(device_id)?.read()?;
    state.registers.set(RegisterId::A, byte as i32);
    Ok(())
}

/// Writes register A's low byte to the addressed device.
pub(crate) fn exec_wd(
    state: &mut CpuState,
    operand: i32,
    flags: AddressingFlags,
) -> Result<(), VmError> {
    let device_id = resolve_byte_operand(state, operand, flags)?;
    let byte = (state.registers.get(RegisterId::A) & 0xFF) as u8;
    state.devices.get(device_id)?.write(byte)
}
