//! The SIC/XE processor: registers, the fetch/decode/execute pipeline, and
//! the clock-driven worker thread that steps it.
//!
//! Grounded on `processor/cpu.go`'s `CPU` struct (register file + memory +
//! device table + `OnStart`/`OnStop`/`OnExec` callback lists, driven by a
//! ticker goroutine) and its `run`/`Start`/`Stop`/`Step` methods. The
//! callback lists become `Vec<Box<dyn FnMut>>` behind a `Mutex`, and the
//! ticker goroutine becomes a `thread::spawn` worker gated by two
//! `AtomicBool`s, per the "single mutex serializes execution" concurrency
//! note.

pub mod decode;
mod execute;

use crate::devices::DeviceTable;
use crate::error::VmError;
use crate::memory::Memory;
use crate::registers::{RegisterFile, RegisterId};
use decode::AddressingFlags;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Everything one instruction step touches. Kept behind a single mutex so a
/// step is always atomic with respect to both the worker thread and a UI
/// thread calling [`Cpu::step`] or reading a snapshot.
pub(crate) struct CpuState {
    pub(crate) registers: RegisterFile,
    pub(crate) memory: Memory,
    pub(crate) devices: DeviceTable,
}

/// A SIC/XE machine: register file, memory, devices, and the clock that
/// drives them.
pub struct Cpu {
    state: Mutex<CpuState>,
    running: AtomicBool,
    stop_requested: AtomicBool,
    fault: Mutex<Option<VmError>>,
    period: Duration,
    on_start: Mutex<Vec<Box<dyn FnMut() + Send>>>,
    on_stop: Mutex<Vec<Box<dyn FnMut() + Send>>>,
    on_exec: Mutex<Vec<Box<dyn FnMut(&str) + Send>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Cpu {
    /// `ops_per_sec` of `0` means "as fast as possible" — no sleep between
    /// ticks.
    pub fn new(memory: Memory, devices: DeviceTable, ops_per_sec: u64) -> Arc<Cpu> {
        let period = if ops_per_sec == 0 {
            Duration::from_millis(0)
        } else {
            Duration::from_secs_f64(1.0 / ops_per_sec as f64)
        };
        Arc::new(Cpu {
            state: Mutex::new(CpuState {
                registers: RegisterFile::new(),
                memory,
                devices,
            }),
            running: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            fault: Mutex::new(None),
            period,
            on_start: Mutex::new(Vec::new()),
            on_stop: Mutex::new(Vec::new()),
            on_exec: Mutex::new(Vec::new()),
            worker: Mutex::new(None),
        })
    }

    /// Sets the PC to the loader's start address.
    pub fn set_start(&self, addr: usize) -> Result<(), VmError> {
        let mut state = self.state.lock().unwrap();
        state.memory.validate_address(addr)?;
        state.registers.set(RegisterId::Pc, addr as i32);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// The fault that stopped the worker thread, if any. Cleared by reading
    /// it.
    pub fn take_fault(&self) -> Option<VmError> {
        self.fault.lock().unwrap().take()
    }

    /// Register snapshot for UI rendering, one formatted line per register.
    pub fn registers(&self) -> Vec<String> {
        self.state.lock().unwrap().registers.formatted()
    }

    /// Full memory snapshot for UI rendering.
    pub fn memory_snapshot(&self) -> Vec<u8> {
        self.state.lock().unwrap().memory.raw().to_vec()
    }

    pub fn subscribe_start(&self, f: impl FnMut() + Send + 'static) {
        self.on_start.lock().unwrap().push(Box::new(f));
    }

    pub fn subscribe_stop(&self, f: impl FnMut() + Send + 'static) {
        self.on_stop.lock().unwrap().push(Box::new(f));
    }

    pub fn subscribe_exec(&self, f: impl FnMut(&str) + Send + 'static) {
        self.on_exec.lock().unwrap().push(Box::new(f));
    }

    fn fire_start(&self) {
        log::info!("started");
        for f in self.on_start.lock().unwrap().iter_mut() {
            f();
        }
    }

    fn fire_stop(&self) {
        log::info!("stopped");
        for f in self.on_stop.lock().unwrap().iter_mut() {
            f();
        }
    }

    fn fire_exec(&self, mnemonic: &str) {
        log::trace!("executed {mnemonic}");
        for f in self.on_exec.lock().unwrap().iter_mut() {
            f(mnemonic);
        }
    }

    /// Executes exactly one instruction. A no-op while the clock-driven
    /// worker is running.
    pub fn step(&self) -> Result<(), VmError> {
        if self.running.load(Ordering::SeqCst) {
            return Ok(());
        }
        let mnemonic = {
            let mut state = self.state.lock().unwrap();
            run_one(&mut state)?
        };
        self.fire_exec(mnemonic);
        Ok(())
    }

    /// Starts the clock-driven worker thread. A no-op if already running.
    pub fn start(self: &Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        self.stop_requested.store(false, Ordering::SeqCst);
        self.fire_start();

        let cpu = Arc::clone(self);
        let handle = thread::spawn(move || {
            let mut halted_cooperatively = false;
            loop {
                if cpu.stop_requested.load(Ordering::SeqCst) {
                    halted_cooperatively = true;
                    break;
                }
                if !cpu.period.is_zero() {
                    thread::sleep(cpu.period);
                }
                if cpu.stop_requested.load(Ordering::SeqCst) {
                    halted_cooperatively = true;
                    break;
                }
                let result = {
                    let mut state = cpu.state.lock().unwrap();
                    run_one(&mut state)
                };
                match result {
                    Ok(mnemonic) => cpu.fire_exec(mnemonic),
                    Err(err) => {
                        log::error!("Exception: {err}");
                        *cpu.fault.lock().unwrap() = Some(err);
                        break;
                    }
                }
            }
            cpu.running.store(false, Ordering::SeqCst);
            // The in-flight instruction above has already completed by the
            // time the halt is observed, so OnStop only fires here.
            if halted_cooperatively {
                cpu.fire_stop();
            }
        });
        *self.worker.lock().unwrap() = Some(handle);
    }

    /// Signals the worker to halt at the top of its next tick. Asynchronous:
    /// does not wait for the worker thread to actually stop. A no-op if not
    /// running.
    pub fn stop(&self) {
        if !self.running.load(Ordering::SeqCst) {
            return;
        }
        self.stop_requested.store(true, Ordering::SeqCst);
    }
}

/// Fetch, decode, and execute one instruction, per `spec.md` §4.5 steps 1-9.
/// Returns the mnemonic executed.
fn run_one(state: &mut CpuState) -> Result<&'static str, VmError> {
    let pc = state.registers.get(RegisterId::Pc) as usize;
    let opcode_byte = state.memory.get_byte(pc)?;
    state.registers.set(RegisterId::Pc, (pc + 1) as i32);

    if decode::is_format1(opcode_byte) {
        execute::execute_format1(opcode_byte)?;
        return Ok(decode::mnemonic_for(opcode_byte));
    }

    let pc1 = state.registers.get(RegisterId::Pc) as usize;
    let second = state.memory.get_byte(pc1)?;
    state.registers.set(RegisterId::Pc, (pc1 + 1) as i32);

    let top6 = opcode_byte & 0xFC;
    if decode::is_format2(top6) {
        execute::execute_format2(state, top6, second)?;
        return Ok(decode::mnemonic_for(opcode_byte));
    }

    let pc2 = state.registers.get(RegisterId::Pc) as usize;
    let third = state.memory.get_byte(pc2)?;
    state.registers.set(RegisterId::Pc, (pc2 + 1) as i32);

    let op12 = ((second as i32) << 8) | third as i32;
    let flags = AddressingFlags::decode(opcode_byte, op12);

    if flags.is_sic() {
        let operand = op12 & 0x7FFF;
        execute::execute(state, top6, operand, flags)?;
        return Ok(decode::mnemonic_for(opcode_byte));
    }

    if flags.e {
        let pc3 = state.registers.get(RegisterId::Pc) as usize;
        let fourth = state.memory.get_byte(pc3)?;
        state.registers.set(RegisterId::Pc, (pc3 + 1) as i32);

        let op20 = (((op12 & 0xFFF) << 8) | fourth as i32) & 0xFFFFF;
        execute::execute(state, top6, op20, flags)?;
        return Ok(decode::mnemonic_for(opcode_byte));
    }

    if flags.p && flags.b {
        return Err(VmError::AddressingFault(
            "both base-relative and pc-relative set",
        ));
    }

    let disp12 = op12 & 0xFFF;
    let mut operand = if flags.p {
        let signed = if disp12 >= 2048 { disp12 - 4096 } else { disp12 };
        state.registers.get(RegisterId::Pc) + signed
    } else if flags.b {
        state.registers.get(RegisterId::B) + disp12
    } else {
        disp12
    };

    if flags.x {
        if !(flags.n && flags.i) {
            return Err(VmError::AddressingFault(
                "indexed addressing requires both n and i set",
            ));
        }
        operand += state.registers.get(RegisterId::X);
    }

    execute::execute(state, top6, operand, flags)?;
    Ok(decode::mnemonic_for(opcode_byte))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Loader;
    use crate::memory::MAX_ADDRESS;

    fn machine() -> Arc<Cpu> {
        Cpu::new(Memory::new(), DeviceTable::new(), 0)
    }

    /// S1: LDA #5; ADD #7; STA 0x10 — result is 12.
    #[test]
    fn lda_add_sta_computes_sum() {
        let cpu = machine();
        {
            let mut state = cpu.state.lock().unwrap();
            let program: &[u8] = &[
                0x01, 0x00, 0x05, // LDA #5 (immediate)
                0x19, 0x00, 0x07, // ADD #7 (immediate)
                0x0F, 0x00, 0x10, // STA 0x10 (simple)
            ];
            for (i, &byte) in program.iter().enumerate() {
                state.memory.set_byte(i, byte).unwrap();
            }
        }
        cpu.set_start(0).unwrap();
        cpu.step().unwrap();
        cpu.step().unwrap();
        cpu.step().unwrap();

        let state = cpu.state.lock().unwrap();
        assert_eq!(state.registers.get(RegisterId::A), 12);
        assert_eq!(state.memory.get_word(0x10).unwrap(), 12);
    }

    /// S2: COMP #5 (A already 5) sets SW equal; JEQ then jumps.
    #[test]
    fn jeq_is_taken_when_equal() {
        let cpu = machine();
        {
            let mut state = cpu.state.lock().unwrap();
            let program: &[u8] = &[
                0x01, 0x00, 0x05, // LDA #5
                0x29, 0x00, 0x05, // COMP #5
                0x33, 0x00, 0x64, // JEQ 0x64 (simple)
            ];
            for (i, &byte) in program.iter().enumerate() {
                state.memory.set_byte(i, byte).unwrap();
            }
        }
        cpu.set_start(0).unwrap();
        cpu.step().unwrap();
        cpu.step().unwrap();
        cpu.step().unwrap();

        let state = cpu.state.lock().unwrap();
        assert!(state.registers.is_equal());
        assert_eq!(state.registers.get(RegisterId::Pc), 0x64);
    }

    /// S3: RD then WD round-trips one byte through a device.
    #[test]
    fn device_echo_via_rd_wd() {
        use crate::devices::Device;

        struct Echo {
            data: Vec<u8>,
            cursor: usize,
            written: Vec<u8>,
        }
        impl Device for Echo {
            fn read(&mut self) -> Result<u8, VmError> {
                let b = self.data[self.cursor];
                self.cursor += 1;
                Ok(b)
            }
            fn write(&mut self, byte: u8) -> Result<(), VmError> {
                self.written.push(byte);
                Ok(())
            }
            fn test(&mut self) -> bool {
                true
            }
        }

        let cpu = machine();
        {
            let mut state = cpu.state.lock().unwrap();
            state.devices.set(
                0x05,
                Box::new(Echo {
                    data: vec![0x42],
                    cursor: 0,
                    written: Vec::new(),
                }),
            );
            let program: &[u8] = &[
                0xD9, 0x00, 0x05, // RD #5 (immediate device number)
                0xDD, 0x00, 0x05, // WD #5
            ];
            for (i, &byte) in program.iter().enumerate() {
                state.memory.set_byte(i, byte).unwrap();
            }
        }
        cpu.set_start(0).unwrap();
        cpu.step().unwrap();
        cpu.step().unwrap();

        let state = cpu.state.lock().unwrap();
        assert_eq!(state.registers.get(RegisterId::A) & 0xFF, 0x42);
    }

    /// S4: a loaded object program executes after `Memory::load`.
    #[test]
    fn loaded_object_program_executes() {
        let mut loader = Loader::new();
        loader.load_line("H PROG  000000 000009").unwrap();
        loader.load_line("T 000000 09 0100051900070F0010").unwrap();
        loader.load_line("E 000000").unwrap();
        let image = loader.finish();

        let cpu = machine();
        {
            let mut state = cpu.state.lock().unwrap();
            state.memory.load(&image).unwrap();
        }
        cpu.set_start(image.start_addr).unwrap();
        cpu.step().unwrap();
        cpu.step().unwrap();

        let state = cpu.state.lock().unwrap();
        assert_eq!(state.registers.get(RegisterId::A), 12);
    }

    /// S5: `step` is a no-op while the worker is marked running.
    #[test]
    fn step_is_a_no_op_while_running() {
        let cpu = machine();
        cpu.set_start(0).unwrap();
        cpu.running.store(true, Ordering::SeqCst);
        cpu.step().unwrap();
        assert_eq!(cpu.registers()[7], "[PC] 0x0");
    }

    /// S6: fetching the operand bytes of an instruction placed at
    /// `MAX_ADDRESS - 1` runs off the end of memory.
    #[test]
    fn fault_at_max_address_boundary() {
        let cpu = machine();
        {
            let mut state = cpu.state.lock().unwrap();
            state
                .memory
                .set_byte(MAX_ADDRESS - 1, 0x03) // LDA, simple (n=1,i=1)
                .unwrap();
        }
        cpu.set_start(MAX_ADDRESS - 1).unwrap();
        assert_eq!(cpu.step(), Err(VmError::MemoryFault(MAX_ADDRESS)));
    }
}
