//! GPU enumeration through a runtime-loaded PCI library
//!
//! libpci is probed with dlopen instead of being linked, so machines
//! without it get a diagnostic line rather than a build-time
//! requirement. Loading, symbol resolution and bus enumeration are
//! separate stages; enumeration runs against the `PciSource` trait so
//! tests can substitute a fixed device table.

use std::ffi::CString;
use std::mem::transmute;

use libc::{c_char, c_int, c_uint, c_void};
use tracing::debug;

use crate::data::GpuDevice;
use crate::error::{FetchError, Result};

const DEFAULT_LIBRARY: &str = "libpci.so";

/// PCI device classes that count as a graphics adapter
const GPU_CLASSES: [&str; 3] = [
    "VGA compatible controller",
    "3D controller",
    "Display controller",
];

const PCI_LOOKUP_VENDOR: c_int = 1;
const PCI_LOOKUP_DEVICE: c_int = 2;
const PCI_LOOKUP_CLASS: c_int = 4;
const PCI_FILL_IDENT: c_int = 1;
const PCI_FILL_CLASS: c_int = 32;

/// Prefix of libpci's `struct pci_access`; only `devices` is read here
#[repr(C)]
#[allow(dead_code)]
struct PciAccess {
    method: c_uint,
    writeable: c_int,
    buscentric: c_int,
    id_file_name: *mut c_char,
    free_id_name: c_int,
    numeric_ids: c_int,
    id_lookup_mode: c_uint,
    debugging: c_int,
    error: *mut c_void,
    warning: *mut c_void,
    debug: *mut c_void,
    devices: *mut PciDev,
}

/// Prefix of libpci's `struct pci_dev`; identity and class fields only
#[repr(C)]
#[allow(dead_code)]
struct PciDev {
    next: *mut PciDev,
    domain_16: u16,
    bus: u8,
    dev: u8,
    func: u8,
    known_fields: c_uint,
    vendor_id: u16,
    device_id: u16,
    device_class: u16,
}

type AllocFn = unsafe extern "C" fn() -> *mut PciAccess;
type InitFn = unsafe extern "C" fn(*mut PciAccess);
type ScanBusFn = unsafe extern "C" fn(*mut PciAccess);
type FillInfoFn = unsafe extern "C" fn(*mut PciDev, c_int) -> c_int;
type LookupNameFn =
    unsafe extern "C" fn(*mut PciAccess, *mut c_char, c_int, c_int, ...) -> *mut c_char;
type CleanupFn = unsafe extern "C" fn(*mut PciAccess);

/// Owned dlopen handle, closed exactly once on drop
#[derive(Debug)]
struct LibraryHandle(*mut c_void);

impl Drop for LibraryHandle {
    fn drop(&mut self) {
        unsafe { libc::dlclose(self.0) };
    }
}

/// The six entry points resolved out of the PCI library
#[derive(Debug)]
pub(crate) struct PciLibrary {
    alloc: AllocFn,
    init: InitFn,
    scan_bus: ScanBusFn,
    fill_info: FillInfoFn,
    lookup_name: LookupNameFn,
    cleanup: CleanupFn,
    _handle: LibraryHandle,
}

impl PciLibrary {
    /// dlopen the configured or default library and resolve every entry point
    ///
    /// Any failure names the missing library or symbol; the handle is
    /// released on the way out of every early return.
    pub(crate) fn load(override_path: Option<&str>) -> Result<Self> {
        let name = override_path
            .filter(|path| !path.trim().is_empty())
            .unwrap_or(DEFAULT_LIBRARY);
        debug!("probing PCI library {}", name);

        let name_c = CString::new(name)
            .map_err(|_| FetchError::Config(format!("invalid library path: {}", name)))?;
        let raw = unsafe { libc::dlopen(name_c.as_ptr(), libc::RTLD_LAZY) };
        if raw.is_null() {
            return Err(FetchError::Detection(format!(
                "dlopen(\"{}\") failed",
                name
            )));
        }
        let handle = LibraryHandle(raw);

        unsafe {
            Ok(PciLibrary {
                alloc: transmute::<*mut c_void, AllocFn>(resolve(&handle, "pci_alloc")?),
                init: transmute::<*mut c_void, InitFn>(resolve(&handle, "pci_init")?),
                scan_bus: transmute::<*mut c_void, ScanBusFn>(resolve(&handle, "pci_scan_bus")?),
                fill_info: transmute::<*mut c_void, FillInfoFn>(resolve(&handle, "pci_fill_info")?),
                lookup_name: transmute::<*mut c_void, LookupNameFn>(resolve(
                    &handle,
                    "pci_lookup_name",
                )?),
                cleanup: transmute::<*mut c_void, CleanupFn>(resolve(&handle, "pci_cleanup")?),
                _handle: handle,
            })
        }
    }

    /// Allocate a context and scan the bus; cleanup runs when the scan drops
    fn scan(&self) -> Result<PciScanHandle<'_>> {
        let access = unsafe { (self.alloc)() };
        if access.is_null() {
            return Err(FetchError::Detection("pci_alloc() returned NULL".to_string()));
        }
        unsafe {
            (self.init)(access);
            (self.scan_bus)(access);
        }
        Ok(PciScanHandle { lib: self, access })
    }
}

fn resolve(handle: &LibraryHandle, symbol: &str) -> Result<*mut c_void> {
    let symbol_c = CString::new(symbol)
        .map_err(|_| FetchError::Config(format!("invalid symbol name: {}", symbol)))?;
    let ptr = unsafe { libc::dlsym(handle.0, symbol_c.as_ptr()) };
    if ptr.is_null() {
        return Err(FetchError::Detection(format!(
            "dlsym(\"{}\") failed",
            symbol
        )));
    }
    Ok(ptr)
}

/// A scanned PCI bus; `pci_cleanup` runs exactly once on drop
struct PciScanHandle<'a> {
    lib: &'a PciLibrary,
    access: *mut PciAccess,
}

impl Drop for PciScanHandle<'_> {
    fn drop(&mut self) {
        unsafe { (self.lib.cleanup)(self.access) };
    }
}

impl PciScanHandle<'_> {
    fn lookup_class(&self, class_id: u16) -> String {
        let mut buf = [0 as c_char; 512];
        let ptr = unsafe {
            (self.lib.lookup_name)(
                self.access,
                buf.as_mut_ptr(),
                buf.len() as c_int,
                PCI_LOOKUP_CLASS,
                class_id as c_int,
            )
        };
        name_from_c(ptr)
    }

    fn lookup_ident(&self, flags: c_int, vendor_id: u16, device_id: u16) -> String {
        let mut buf = [0 as c_char; 512];
        let ptr = unsafe {
            (self.lib.lookup_name)(
                self.access,
                buf.as_mut_ptr(),
                buf.len() as c_int,
                flags,
                vendor_id as c_int,
                device_id as c_int,
            )
        };
        name_from_c(ptr)
    }
}

fn name_from_c(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { std::ffi::CStr::from_ptr(ptr) }
        .to_string_lossy()
        .to_string()
}

/// Identity triple for one bus device
pub(crate) struct PciDeviceId {
    pub vendor_id: u16,
    pub device_id: u16,
    pub class_id: u16,
}

/// Enumeration source; production backs it with the loaded library,
/// tests substitute a fixed device table
pub(crate) trait PciSource {
    fn devices(&mut self) -> Vec<PciDeviceId>;
    fn class_name(&mut self, device: &PciDeviceId) -> String;
    fn vendor_name(&mut self, device: &PciDeviceId) -> String;
    fn device_name(&mut self, device: &PciDeviceId) -> String;
}

impl PciSource for PciScanHandle<'_> {
    fn devices(&mut self) -> Vec<PciDeviceId> {
        let mut out = Vec::new();
        unsafe {
            let mut dev = (*self.access).devices;
            while !dev.is_null() {
                (self.lib.fill_info)(dev, PCI_FILL_IDENT | PCI_FILL_CLASS);
                out.push(PciDeviceId {
                    vendor_id: (*dev).vendor_id,
                    device_id: (*dev).device_id,
                    class_id: (*dev).device_class,
                });
                dev = (*dev).next;
            }
        }
        out
    }

    fn class_name(&mut self, device: &PciDeviceId) -> String {
        self.lookup_class(device.class_id)
    }

    fn vendor_name(&mut self, device: &PciDeviceId) -> String {
        self.lookup_ident(PCI_LOOKUP_VENDOR, device.vendor_id, device.device_id)
    }

    fn device_name(&mut self, device: &PciDeviceId) -> String {
        self.lookup_ident(PCI_LOOKUP_DEVICE, device.vendor_id, device.device_id)
    }
}

/// Walk the device list, keeping display-class adapters in discovery order
///
/// Zero matches is a reportable condition, never an empty success.
pub(crate) fn enumerate(source: &mut dyn PciSource) -> Result<Vec<GpuDevice>> {
    let mut gpus: Vec<GpuDevice> = Vec::new();
    for device in source.devices() {
        let class = source.class_name(&device);
        if !GPU_CLASSES.iter().any(|c| c.eq_ignore_ascii_case(&class)) {
            continue;
        }
        let vendor_raw = source.vendor_name(&device);
        let name = source.device_name(&device);
        gpus.push(GpuDevice {
            index: gpus.len() as u8 + 1,
            vendor: prettify_vendor(&vendor_raw),
            vendor_raw,
            name,
        });
    }
    if gpus.is_empty() {
        return Err(FetchError::Detection("No GPU found".to_string()));
    }
    Ok(gpus)
}

/// Shorten the one verbose vendor string the ID database is known for
pub fn prettify_vendor(vendor: &str) -> String {
    if vendor.eq_ignore_ascii_case("Advanced Micro Devices, Inc. [AMD/ATI]") {
        "AMD ATI".to_string()
    } else {
        vendor.to_string()
    }
}

/// Enumerate display-class adapters, or explain why none were listed
pub fn collect(library: Option<&str>) -> Result<Vec<GpuDevice>> {
    let lib = PciLibrary::load(library)?;
    let mut scan = lib.scan()?;
    enumerate(&mut scan)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSource {
        table: Vec<(PciDeviceId, &'static str, &'static str, &'static str)>,
    }

    impl FakeSource {
        fn entry(&self, device: &PciDeviceId) -> usize {
            self.table
                .iter()
                .position(|(id, _, _, _)| {
                    id.vendor_id == device.vendor_id && id.device_id == device.device_id
                })
                .unwrap()
        }
    }

    impl PciSource for FakeSource {
        fn devices(&mut self) -> Vec<PciDeviceId> {
            self.table
                .iter()
                .map(|(id, _, _, _)| PciDeviceId {
                    vendor_id: id.vendor_id,
                    device_id: id.device_id,
                    class_id: id.class_id,
                })
                .collect()
        }

        fn class_name(&mut self, device: &PciDeviceId) -> String {
            self.table[self.entry(device)].1.to_string()
        }

        fn vendor_name(&mut self, device: &PciDeviceId) -> String {
            self.table[self.entry(device)].2.to_string()
        }

        fn device_name(&mut self, device: &PciDeviceId) -> String {
            self.table[self.entry(device)].3.to_string()
        }
    }

    fn id(vendor_id: u16, device_id: u16, class_id: u16) -> PciDeviceId {
        PciDeviceId {
            vendor_id,
            device_id,
            class_id,
        }
    }

    #[test]
    fn keeps_display_classes_and_numbers_from_one() {
        let mut source = FakeSource {
            table: vec![
                (id(0x8086, 0x1234, 0x0600), "Host bridge", "Intel", "Bridge"),
                (
                    id(0x10de, 0x2684, 0x0300),
                    "VGA compatible controller",
                    "NVIDIA Corporation",
                    "AD102 [GeForce RTX 4090]",
                ),
                (id(0x8086, 0x7a60, 0x0c03), "USB controller", "Intel", "USB"),
                (
                    id(0x1002, 0x731f, 0x0380),
                    "display CONTROLLER",
                    "Advanced Micro Devices, Inc. [AMD/ATI]",
                    "Navi 10",
                ),
            ],
        };
        let gpus = enumerate(&mut source).unwrap();
        assert_eq!(gpus.len(), 2);
        assert_eq!(gpus[0].index, 1);
        assert_eq!(gpus[0].vendor, "NVIDIA Corporation");
        assert_eq!(gpus[0].name, "AD102 [GeForce RTX 4090]");
        assert_eq!(gpus[1].index, 2);
        assert_eq!(gpus[1].vendor, "AMD ATI");
        assert_eq!(gpus[1].vendor_raw, "Advanced Micro Devices, Inc. [AMD/ATI]");
    }

    #[test]
    fn zero_matching_devices_is_an_error() {
        let mut source = FakeSource {
            table: vec![(id(0x8086, 0x1234, 0x0600), "Host bridge", "Intel", "Bridge")],
        };
        let err = enumerate(&mut source).unwrap_err();
        assert_eq!(err.to_string(), "No GPU found");
    }

    #[test]
    fn vendor_rewrite_is_cosmetic_only() {
        assert_eq!(
            prettify_vendor("Advanced Micro Devices, Inc. [AMD/ATI]"),
            "AMD ATI"
        );
        assert_eq!(prettify_vendor("NVIDIA Corporation"), "NVIDIA Corporation");
    }

    #[test]
    fn missing_library_names_the_path() {
        let err = PciLibrary::load(Some("/nonexistent/libmissing.so")).unwrap_err();
        assert!(err.to_string().contains("dlopen"));
        assert!(err.to_string().contains("/nonexistent/libmissing.so"));
    }

    #[test]
    fn collect_against_missing_library_reports_one_error() {
        let err = collect(Some("/nonexistent/libmissing.so")).unwrap_err();
        assert!(err.to_string().contains("dlopen"));
    }
}
