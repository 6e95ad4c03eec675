//! An emulator for the SIC/XE pedagogical architecture.
//!
//! The crate is organized the way the teacher this was grown from organizes
//! a CPU emulator: a decode-table module, a directory of per-family
//! execution modules, a byte-addressable memory, a register file, and an
//! object-code loader, all wired together by the [`cpu`] module's
//! fetch/decode/execute pipeline.

pub mod cpu;
pub mod devices;
pub mod error;
pub mod loader;
pub mod memory;
pub mod registers;
pub mod ui;

pub use cpu::Cpu;
pub use devices::DeviceTable;
pub use error::VmError;
pub use loader::{Loader, ObjectImage};
pub use memory::Memory;
