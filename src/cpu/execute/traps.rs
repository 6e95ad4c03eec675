//! Format 1 instructions. All six (`FIX`, `FLOAT`, `HIO`, `NORM`, `SIO`,
//! `TIO`) trap as [`VmError::Unimplemented`] — none of their floating-point
//! or channel-I/O semantics are modeled. Grounded on `processor/cpu.go`'s
//! `executeF1`, which stubs every Format 1 handler the same way.

use crate::cpu::decode::mnemonic_for;
use crate::error::VmError;

pub(crate) fn execute_format1(opcode_byte: u8) -> Result<(), VmError> {
    Err(VmError::Unimplemented(mnemonic_for(opcode_byte)))
}
