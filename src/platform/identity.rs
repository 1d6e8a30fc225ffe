//! User, host and OS identity resolution
//!
//! Every field falls through an ordered preference chain (environment
//! variable, then OS record) and degrades to an empty string instead of
//! erroring; a fetch line with a blank value beats no line at all.

use std::env;
use std::ffi::CStr;

use libc::c_char;

use crate::utils::parsing::with_trailing_slash;

/// Fields copied out of the calling uid's passwd record
pub(crate) struct PasswdRecord {
    pub name: String,
    pub dir: String,
    pub shell: String,
}

pub(crate) fn passwd_record() -> Option<PasswdRecord> {
    // getpwuid hands back a pointer into static storage; copy the
    // fields out before anything else can call into the passwd API.
    unsafe {
        let pwd = libc::getpwuid(libc::getuid());
        if pwd.is_null() {
            return None;
        }
        Some(PasswdRecord {
            name: string_from_c((*pwd).pw_name),
            dir: string_from_c((*pwd).pw_dir),
            shell: string_from_c((*pwd).pw_shell),
        })
    }
}

/// uname(2) fields; all empty when the call fails
pub(crate) struct UnameInfo {
    pub sysname: String,
    pub nodename: String,
    pub release: String,
    pub version: String,
    pub machine: String,
}

pub(crate) fn uname_info() -> UnameInfo {
    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
    if unsafe { libc::uname(&mut uts) } != 0 {
        uts = unsafe { std::mem::zeroed() };
    }
    UnameInfo {
        sysname: string_from_array(&uts.sysname),
        nodename: string_from_array(&uts.nodename),
        release: string_from_array(&uts.release),
        version: string_from_array(&uts.version),
        machine: string_from_array(&uts.machine),
    }
}

pub(crate) fn home_dir(pwd: Option<&PasswdRecord>) -> String {
    let home = pwd
        .map(|p| p.dir.clone())
        .filter(|dir| !dir.is_empty())
        .or_else(|| dirs::home_dir().map(|p| p.display().to_string()))
        .unwrap_or_default();
    with_trailing_slash(&home)
}

pub(crate) fn user_name(pwd: Option<&PasswdRecord>) -> String {
    env_or(
        "USER",
        pwd.map(|p| p.name.clone()).unwrap_or_default(),
    )
}

pub(crate) fn user_shell(pwd: Option<&PasswdRecord>) -> String {
    env_or(
        "SHELL",
        pwd.map(|p| p.shell.clone()).unwrap_or_default(),
    )
}

pub(crate) fn host_name(uts: &UnameInfo) -> String {
    let mut buf = [0 as c_char; 256];
    if unsafe { libc::gethostname(buf.as_mut_ptr(), buf.len()) } == 0 {
        let name = unsafe { CStr::from_ptr(buf.as_ptr()) }
            .to_string_lossy()
            .to_string();
        if !name.is_empty() {
            return name;
        }
    }
    uts.nodename.clone()
}

/// First non-empty canonical name for the host, or empty
///
/// A failed or canonical-name-less lookup is a normal outcome for
/// machines without DNS records, not an error.
#[cfg(target_os = "linux")]
pub(crate) fn domain_name(host: &str) -> String {
    use std::ffi::CString;
    use std::ptr;

    if host.is_empty() {
        return String::new();
    }
    let Ok(node) = CString::new(host) else {
        return String::new();
    };
    let service = CString::new("80").unwrap();

    let mut hints: libc::addrinfo = unsafe { std::mem::zeroed() };
    hints.ai_socktype = libc::SOCK_STREAM;
    hints.ai_flags = libc::AI_CANONNAME;

    let mut info: *mut libc::addrinfo = ptr::null_mut();
    if unsafe { libc::getaddrinfo(node.as_ptr(), service.as_ptr(), &hints, &mut info) } != 0 {
        return String::new();
    }

    let mut domain = String::new();
    let mut current = info;
    while domain.is_empty() && !current.is_null() {
        unsafe {
            if !(*current).ai_canonname.is_null() {
                domain = CStr::from_ptr((*current).ai_canonname)
                    .to_string_lossy()
                    .to_string();
            }
            current = (*current).ai_next;
        }
    }
    unsafe { libc::freeaddrinfo(info) };
    domain
}

#[cfg(not(target_os = "linux"))]
pub(crate) fn domain_name(_host: &str) -> String {
    String::new()
}

fn env_or(var: &str, fallback: String) -> String {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => fallback,
    }
}

unsafe fn string_from_c(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().to_string()
}

fn string_from_array(field: &[c_char]) -> String {
    // A zero-filled struct has no NUL-terminated content to trust, so
    // stop at the first zero byte explicitly.
    let bytes: Vec<u8> = field
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_dir_is_slash_terminated() {
        let pwd = PasswdRecord {
            name: "test".to_string(),
            dir: "/home/test".to_string(),
            shell: "/bin/sh".to_string(),
        };
        assert_eq!(home_dir(Some(&pwd)), "/home/test/");

        let already = PasswdRecord {
            dir: "/home/test/".to_string(),
            ..pwd
        };
        assert_eq!(home_dir(Some(&already)), "/home/test/");
    }

    #[test]
    fn string_from_array_stops_at_first_zero() {
        let mut field = [0 as c_char; 8];
        for (i, b) in b"abc".iter().enumerate() {
            field[i] = *b as c_char;
        }
        assert_eq!(string_from_array(&field), "abc");
        assert_eq!(string_from_array(&[0 as c_char; 4]), "");
    }
}
