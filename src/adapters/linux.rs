//! Linux i2c-dev backend.
//!
//! Adapters are listed from sysfs (`/sys/class/i2c-adapter/i2c-N/name`)
//! and opened through their character device (`/dev/i2c-N`).  Every
//! transaction is one `I2C_SMBUS` ioctl; the target address is set with
//! `I2C_SLAVE` only when it changes.

use std::fs::{self, File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::app::ports::{AdapterRegistry, QuickDirection, SmbusTransport, TransportError};
use crate::bus::{AdapterInfo, AdapterKind};

// <linux/i2c-dev.h>, <linux/i2c.h>
const I2C_SLAVE: u32 = 0x0703;
const I2C_SMBUS: u32 = 0x0720;

const I2C_SMBUS_WRITE: u8 = 0;
const I2C_SMBUS_READ: u8 = 1;

const I2C_SMBUS_QUICK: u32 = 0;
const I2C_SMBUS_BYTE: u32 = 1;
const I2C_SMBUS_BYTE_DATA: u32 = 2;
const I2C_SMBUS_WORD_DATA: u32 = 3;

const I2C_SMBUS_BLOCK_MAX: usize = 32;

#[repr(C)]
union I2cSmbusData {
    byte: u8,
    word: u16,
    block: [u8; I2C_SMBUS_BLOCK_MAX + 2],
}

#[repr(C)]
struct I2cSmbusIoctlData {
    read_write: u8,
    command: u8,
    size: u32,
    data: *mut I2cSmbusData,
}

fn errno_to_transport(errno: i32) -> TransportError {
    match errno {
        // Drivers report an unacknowledged address with either code.
        libc::ENXIO | libc::EREMOTEIO => TransportError::Nack,
        other => TransportError::Io(other),
    }
}

fn last_os_error() -> TransportError {
    errno_to_transport(std::io::Error::last_os_error().raw_os_error().unwrap_or(libc::EIO))
}

// ── LinuxSmbus ────────────────────────────────────────────────

/// An open `/dev/i2c-N` handle.  Closed on drop.
pub struct LinuxSmbus {
    file: File,
    current_address: Option<u8>,
}

impl LinuxSmbus {
    pub fn open(path: &Path) -> Result<Self, TransportError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| TransportError::Io(e.raw_os_error().unwrap_or(libc::EIO)))?;
        Ok(Self { file, current_address: None })
    }

    fn set_address(&mut self, address: u8) -> Result<(), TransportError> {
        if address > 0x7F {
            return Err(TransportError::InvalidAddress(address));
        }
        if self.current_address == Some(address) {
            return Ok(());
        }
        // SAFETY: the fd belongs to `self.file` and stays open for the call.
        // I2C_SLAVE takes the address by value.
        let rc = unsafe {
            libc::ioctl(self.file.as_raw_fd(), I2C_SLAVE as _, libc::c_ulong::from(address))
        };
        if rc < 0 {
            return Err(last_os_error());
        }
        self.current_address = Some(address);
        Ok(())
    }

    fn access(
        &mut self,
        address: u8,
        read_write: u8,
        command: u8,
        size: u32,
        data: Option<&mut I2cSmbusData>,
    ) -> Result<(), TransportError> {
        self.set_address(address)?;
        let mut args = I2cSmbusIoctlData {
            read_write,
            command,
            size,
            data: data.map_or(std::ptr::null_mut(), |d| d as *mut I2cSmbusData),
        };
        // SAFETY: `args` and the buffer it points at outlive the call; the
        // kernel writes at most `size_of::<I2cSmbusData>()` bytes.
        let rc = unsafe {
            libc::ioctl(self.file.as_raw_fd(), I2C_SMBUS as _, &mut args as *mut I2cSmbusIoctlData)
        };
        if rc < 0 { Err(last_os_error()) } else { Ok(()) }
    }
}

impl SmbusTransport for LinuxSmbus {
    fn write_quick(&mut self, address: u8, direction: QuickDirection) -> Result<(), TransportError> {
        let rw = match direction {
            QuickDirection::Write => I2C_SMBUS_WRITE,
            QuickDirection::Read => I2C_SMBUS_READ,
        };
        self.access(address, rw, 0, I2C_SMBUS_QUICK, None)
    }

    fn read_byte(&mut self, address: u8) -> Result<u8, TransportError> {
        let mut data = I2cSmbusData { block: [0; I2C_SMBUS_BLOCK_MAX + 2] };
        self.access(address, I2C_SMBUS_READ, 0, I2C_SMBUS_BYTE, Some(&mut data))?;
        // SAFETY: every field is plain bytes over the zeroed block.
        Ok(unsafe { data.byte })
    }

    fn read_byte_data(&mut self, address: u8, command: u8) -> Result<u8, TransportError> {
        let mut data = I2cSmbusData { block: [0; I2C_SMBUS_BLOCK_MAX + 2] };
        self.access(address, I2C_SMBUS_READ, command, I2C_SMBUS_BYTE_DATA, Some(&mut data))?;
        // SAFETY: as above.
        Ok(unsafe { data.byte })
    }

    fn write_byte_data(&mut self, address: u8, command: u8, value: u8) -> Result<(), TransportError> {
        let mut data = I2cSmbusData { byte: value };
        self.access(address, I2C_SMBUS_WRITE, command, I2C_SMBUS_BYTE_DATA, Some(&mut data))
    }

    fn write_word_data(&mut self, address: u8, command: u8, value: u16) -> Result<(), TransportError> {
        let mut data = I2cSmbusData { word: value };
        self.access(address, I2C_SMBUS_WRITE, command, I2C_SMBUS_WORD_DATA, Some(&mut data))
    }
}

// ── SysfsAdapterRegistry ──────────────────────────────────────

/// Adapter list read from sysfs, opened through `/dev`.
pub struct SysfsAdapterRegistry {
    sysfs_root: PathBuf,
    dev_root: PathBuf,
}

impl SysfsAdapterRegistry {
    pub fn new(sysfs_root: impl Into<PathBuf>, dev_root: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_root: sysfs_root.into(),
            dev_root: dev_root.into(),
        }
    }
}

fn bus_number(node: &str) -> Option<u32> {
    node.strip_prefix("i2c-")?.parse().ok()
}

impl AdapterRegistry for SysfsAdapterRegistry {
    fn list(&mut self) -> Vec<AdapterInfo> {
        let entries = match fs::read_dir(&self.sysfs_root) {
            Ok(e) => e,
            Err(e) => {
                warn!("cannot list {}: {}", self.sysfs_root.display(), e);
                return Vec::new();
            }
        };

        let mut adapters = Vec::new();
        for entry in entries.flatten() {
            let node = entry.file_name().to_string_lossy().into_owned();
            let is_dir_like = entry
                .file_type()
                .map(|t| t.is_dir() || t.is_symlink())
                .unwrap_or(false);
            let kind = if is_dir_like && node.starts_with("i2c-") {
                AdapterKind::I2c
            } else {
                AdapterKind::Other
            };

            match fs::read_to_string(entry.path().join("name")) {
                Ok(name) => adapters.push(AdapterInfo::new(&node, &name, kind)),
                Err(e) => debug!("{}: no readable name ({})", node, e),
            }
        }

        adapters.sort_by(|a, b| {
            let key = |i: &AdapterInfo| bus_number(&i.node).unwrap_or(u32::MAX);
            key(a).cmp(&key(b)).then_with(|| a.node.as_str().cmp(b.node.as_str()))
        });
        adapters
    }

    fn open(&mut self, adapter: &AdapterInfo) -> Result<Box<dyn SmbusTransport>, TransportError> {
        let path = self.dev_root.join(adapter.node.as_str());
        let bus = LinuxSmbus::open(&path)?;
        debug!("opened {}", path.display());
        Ok(Box::new(bus))
    }
}
