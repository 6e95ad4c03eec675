//! Byte-oriented devices addressed by an 8-bit device number.
//!
//! Grounded on `devices/deviceManager.go` (pre-registered stdin/stdout/
//! stderr, lazy file-backed devices for everything else) and
//! `devices/fileDevice.go`/`stdoutDevice.go`/`stderrDevice.go`/
//! `stdinDevice.go`. The source's `StdoutDevice` wraps `os.Stdin` — a typo
//! fixed here per `spec.md` §9(d): it wraps real stdout.

use crate::error::VmError;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{Read, Write};

pub const STDIN_ID: u8 = 0;
pub const STDOUT_ID: u8 = 1;
pub const STDERR_ID: u8 = 2;

/// A byte-oriented device capability.
pub trait Device: Send {
    fn read(&mut self) -> Result<u8, VmError>;
    fn write(&mut self, byte: u8) -> Result<(), VmError>;
    fn test(&mut self) -> bool;
}

struct StdinDevice(std::io::Stdin);

impl Device for StdinDevice {
    fn read(&mut self) -> Result<u8, VmError> {
        let mut buf = [0u8; 1];
        match self.0.read(&mut buf) {
            Ok(1) => Ok(buf[0]),
            _ => Err(VmError::DeviceIoFault),
        }
    }

    fn write(&mut self, _byte: u8) -> Result<(), VmError> {
        Err(VmError::DeviceIoFault)
    }

    fn test(&mut self) -> bool {
        true
    }
}

struct StdoutDevice(std::io::Stdout);

impl Device for StdoutDevice {
    fn read(&mut self) -> Result<u8, VmError> {
        Err(VmError::DeviceIoFault)
    }

    fn write(&mut self, byte: u8) -> Result<(), VmError> {
        match self.0.write(&[byte]) {
            Ok(1) => Ok(()),
            _ => Err(VmError::DeviceIoFault),
        }
    }

    fn test(&mut self) -> bool {
        true
    }
}

struct StderrDevice(std::io::Stderr);

impl Device for StderrDevice {
    fn read(&mut self) -> Result<u8, VmError> {
        Err(VmError::DeviceIoFault)
    }

    fn write(&mut self, byte: u8) -> Result<(), VmError> {
        match self.0.write(&[byte]) {
            Ok(1) => Ok(()),
            _ => Err(VmError::DeviceIoFault),
        }
    }

    fn test(&mut self) -> bool {
        true
    }
}

/// A device backed by a file named `%02x.dev`, opened read-write-create-
/// append.
struct FileDevice {
    file: std::fs::File,
}

impl FileDevice {
    fn open(id: u8) -> Result<Self, VmError> {
        let name = format!("{:02x}.dev", id);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .append(true)
            .open(&name)
            .map_err(|_| VmError::DeviceIoFault)?;
        Ok(Self { file })
    }
}

impl Device for FileDevice {
    fn read(&mut self) -> Result<u8, VmError> {
        let mut buf = [0u8; 1];
        match self.file.read(&mut buf) {
            Ok(1) => Ok(buf[0]),
            _ => Err(VmError::DeviceIoFault),
        }
    }

    fn write(&mut self, byte: u8) -> Result<(), VmError> {
        match self.file.write(&[byte]) {
            Ok(1) => Ok(()),
            _ => Err(VmError::DeviceIoFault),
        }
    }

    fn test(&mut self) -> bool {
        false
    }
}

/// Maps device numbers to [`Device`] implementations, pre-registering the
/// three standard streams.
pub struct DeviceTable {
    devices: HashMap<u8, Box<dyn Device>>,
}

impl DeviceTable {
    pub fn new() -> Self {
        let mut devices: HashMap<u8, Box<dyn Device>> = HashMap::new();
        devices.insert(STDIN_ID, Box::new(StdinDevice(std::io::stdin())));
        devices.insert(STDOUT_ID, Box::new(StdoutDevice(std::io::stdout())));
        devices.insert(STDERR_ID, Box::new(StderrDevice(std::io::stderr())));
        Self { devices }
    }

    /// Returns the device for `id`, lazily creating a file-backed device if
    /// none is registered yet.
    pub fn get(&mut self, id: u8) -> Result<&mut (dyn Device + '_), VmError> {
        match self.devices.entry(id) {
            std::collections::hash_map::Entry::Occupied(entry) => Ok(entry.into_mut().as_mut()),
            std::collections::hash_map::Entry::Vacant(entry) => {
                let device = FileDevice::open(id)?;
                Ok(entry.insert(Box::new(device)).as_mut())
            }
        }
    }

    pub fn set(&mut self, id: u8, device: Box<dyn Device>) {
        self.devices.insert(id, device);
    }
}

impl Default for DeviceTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MemoryDevice {
        data: Vec<u8>,
        cursor: usize,
        written: Vec<u8>,
    }

    impl Device for MemoryDevice {
        fn read(&mut self) -> Result<u8, VmError> {
            if self.cursor >= self.data.len() {
                return Err(VmError::DeviceIoFault);
            }
            let byte = self.data[self.cursor];
            self.cursor += 1;
            Ok(byte)
        }

        fn write(&mut self, byte: u8) -> Result<(), VmError> {
            self.written.push(byte);
            Ok(())
        }

        fn test(&mut self) -> bool {
            true
        }
    }

    #[test]
    fn device_echo_round_trip() {
        let mut table = DeviceTable::new();
        table.set(
            0,
            Box::new(MemoryDevice {
                data: vec![0x41],
                cursor: 0,
                written: Vec::new(),
            }),
        );

        let byte = table.get(0).unwrap().read().unwrap();
        assert_eq!(byte, 0x41);

        table.set(
            1,
            Box::new(MemoryDevice {
                data: Vec::new(),
                cursor: 0,
                written: Vec::new(),
            }),
        );
        table.get(1).unwrap().write(byte).unwrap();
    }

    #[test]
    fn standard_devices_are_preregistered() {
        let mut table = DeviceTable::new();
        assert!(table.devices.contains_key(&STDIN_ID));
        assert!(table.devices.contains_key(&STDOUT_ID));
        assert!(table.devices.contains_key(&STDERR_ID));
        let _ = table.get(STDIN_ID);
    }
}
