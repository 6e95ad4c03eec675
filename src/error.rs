//! Error kinds surfaced by every fallible core operation.
//!
//! Every fault eventually propagates out of [`crate::cpu::Cpu::step`] (or a
//! synchronous loader/memory call) to the top-level process, which prints
//! `Exception: <detail>` and exits non-zero. Nothing here is locally
//! recovered.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error("invalid memory address {0:#x}")]
    MemoryFault(usize),

    #[error("arithmetic fault: division by zero")]
    ArithmeticFault,

    #[error("no opcode matched byte {0:#04x} in format {1}")]
    DecodeFault(u8, &'static str),

    #[error("addressing fault: {0}")]
    AddressingFault(&'static str),

    #[error("invalid object record format")]
    RecordFormat,

    #[error("invalid hex field in object record")]
    HexFormat,

    #[error("header record already loaded")]
    HeaderAlreadyLoaded,

    #[error("end record already loaded")]
    EndAlreadyLoaded,

    #[error("device I/O fault")]
    DeviceIoFault,

    #[error("opcode {0} recognized but not implemented")]
    Unimplemented(&'static str),
}
