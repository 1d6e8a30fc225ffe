//! Per-OS resolution of the running executable's absolute path
//!
//! Every implementation satisfies the same postcondition: the resolved
//! absolute path of the current binary, or `None` when the OS will not
//! say (callers skip the dependent path entry silently).

use std::path::PathBuf;

#[cfg(target_os = "linux")]
pub fn current_exe_path() -> Option<PathBuf> {
    std::fs::read_link("/proc/self/exe").ok()
}

#[cfg(target_os = "freebsd")]
pub fn current_exe_path() -> Option<PathBuf> {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let mib = [
        libc::CTL_KERN,
        libc::KERN_PROC,
        libc::KERN_PROC_PATHNAME,
        -1,
    ];
    let mut buf = vec![0u8; libc::PATH_MAX as usize];
    let mut len = buf.len();
    let ret = unsafe {
        libc::sysctl(
            mib.as_ptr(),
            mib.len() as libc::c_uint,
            buf.as_mut_ptr() as *mut libc::c_void,
            &mut len,
            std::ptr::null(),
            0,
        )
    };
    if ret != 0 || len == 0 {
        return None;
    }
    // len includes the terminating NUL
    buf.truncate(len.saturating_sub(1));
    Some(PathBuf::from(OsString::from_vec(buf)))
}

#[cfg(not(any(target_os = "linux", target_os = "freebsd")))]
pub fn current_exe_path() -> Option<PathBuf> {
    std::env::current_exe().ok()
}
