//! Format 2 instructions (one opcode byte, one register-pair byte) —
//! grounded on `processor/cpu.go`'s `executeF2`. `MULR` there calls the
//! register file's `Add` instead of `Mul`, a copy-paste bug; fixed here to
//! actually multiply. `COMPR` there writes raw `0x1`/`0x2` values into SW
//! instead of going through the SW register's own `Compare` — bits
//! `IsLess`/`IsGreater` never check, so a `COMPR` result is invisible to
//! any later `JLT`/`JGT`. `spec.md` doesn't call this out as a bug to
//! preserve (its semantics table just says `SW ← compare(r1, r2)`), so this
//! uses the real `compare` here instead of reproducing the dead write.

use crate::cpu::decode::mnemonic_for;
use crate::cpu::CpuState;
use crate::error::VmError;
use crate::registers::RegisterId;

fn register_pair(operand_byte: u8) -> Result<(RegisterId, RegisterId), VmError> {
    let r1 = RegisterId::from_nibble(operand_byte >> 4)
        .ok_or(VmError::DecodeFault(operand_byte, "format2 r1"))?;
    let r2 = RegisterId::from_nibble(operand_byte & 0xF)
        .ok_or(VmError::DecodeFault(operand_byte, "format2 r2"))?;
    Ok((r1, r2))
}

pub(crate) fn execute_format2(
    state: &mut CpuState,
    command: u8,
    operand_byte: u8,
) -> Result<(), VmError> {
    use crate::cpu::decode::Opcode;

    match command {
        Opcode::ADDR => {
            let (r1, r2) = register_pair(operand_byte)?;
            let value = state.registers.get(r1);
            state.registers.add(r2, value);
            Ok(())
        }
        Opcode::SUBR => {
            let (r1, r2) = register_pair(operand_byte)?;
            let value = state.registers.get(r1);
            state.registers.sub(r2, value);
            Ok(())
        }
        Opcode::MULR => {
            let (r1, r2) = register_pair(operand_byte)?;
            let value = state.registers.get(r1);
            state.registers.multiply(r2, value);
            Ok(())
        }
        Opcode::DIVR => {
            let (r1, r2) = register_pair(operand_byte)?;
            let value = state.registers.get(r1);
            state.registers.divide(r2, value)
        }
        Opcode::COMPR => {
            let (r1, r2) = register_pair(operand_byte)?;
            let (a, b) = (state.registers.get(r1), state.registers.get(r2));
            state.registers.compare(a, b);
            Ok(())
        }
        Opcode::RMO => {
            let (r1, r2) = register_pair(operand_byte)?;
            let value = state.registers.get(r1);
            state.registers.set(r2, value);
            Ok(())
        }
        Opcode::CLEAR => {
            // Clears r2 (the low nibble), not r1 — matches `executeF2`'s
            // `cpu.registers[v2].Clear()`.
            let (_, r2) = register_pair(operand_byte)?;
            state.registers.clear(r2);
            Ok(())
        }
        Opcode::SHIFTL => {
            let r1 = RegisterId::from_nibble(operand_byte >> 4)
                .ok_or(VmError::DecodeFault(operand_byte, "format2 r1"))?;
            let count = (operand_byte & 0xF) as u32;
            state.registers.shift_left(r1, count);
            Ok(())
        }
        Opcode::SHIFTR => {
            let r1 = RegisterId::from_nibble(operand_byte >> 4)
                .ok_or(VmError::DecodeFault(operand_byte, "format2 r1"))?;
            let count = (operand_byte & 0xF) as u32;
            state.registers.shift_right(r1, count);
            Ok(())
        }
        Opcode::TIXR | Opcode::SVC => Err(VmError::Unimplemented(mnemonic_for(command))),
        _ => Err(VmError::DecodeFault(command, "format2")),
    }
}
