use sicxe_vm::cpu::Cpu;
use sicxe_vm::devices::DeviceTable;
use sicxe_vm::loader::Loader;
use sicxe_vm::memory::Memory;
use sicxe_vm::{ui, VmError};
use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let object_path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: sicxe-vm <object-file> [ops-per-sec]");
            return ExitCode::FAILURE;
        }
    };
    let ops_per_sec: u64 = match args.next() {
        Some(raw) => match raw.parse() {
            Ok(rate) => rate,
            Err(_) => {
                eprintln!("invalid ops-per-sec value: {raw}");
                return ExitCode::FAILURE;
            }
        },
        None => 1000,
    };

    if let Err(err) = run(&object_path, ops_per_sec) {
        eprintln!("Exception: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

enum RunError {
    Io(std::io::Error),
    Vm(VmError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Io(err) => write!(f, "{err}"),
            RunError::Vm(err) => write!(f, "{err}"),
        }
    }
}

impl From<VmError> for RunError {
    fn from(err: VmError) -> Self {
        RunError::Vm(err)
    }
}

fn run(object_path: &str, ops_per_sec: u64) -> Result<(), RunError> {
    let text = fs::read_to_string(object_path).map_err(RunError::Io)?;

    let mut loader = Loader::new();
    for line in text.lines() {
        loader.load_line(line)?;
    }
    let image = loader.finish();

    let mut memory = Memory::new();
    memory.load(&image)?;
    let devices = DeviceTable::new();

    let cpu = Cpu::new(memory, devices, ops_per_sec);
    cpu.set_start(image.start_addr)?;

    log::info!("loaded {} ({} bytes), entry {:#x}", image.name, image.length, image.start_addr);

    match ui::run(cpu).map_err(RunError::Io)? {
        Some(fault) => Err(RunError::Vm(fault)),
        None => Ok(()),
    }
}
