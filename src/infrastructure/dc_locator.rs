//! Domain controller discovery using the Windows DC locator
//!
//! Asks `DsGetDcNameW` for a directory-service capable controller in the
//! caller's site, or the next closest site when none is local.

use crate::error::{AppError, AppResult};

#[cfg(windows)]
use windows::{
    core::{HSTRING, PCWSTR},
    Win32::NetworkManagement::NetManagement::NetApiBufferFree,
    Win32::Networking::ActiveDirectory::{
        DsGetDcNameW, DOMAIN_CONTROLLER_INFOW, DS_DIRECTORY_SERVICE_REQUIRED, DS_RETURN_DNS_NAME,
        DS_TRY_NEXTCLOSEST_SITE,
    },
};

/// Find the nearest reachable domain controller for `domain`
#[cfg(windows)]
pub fn discover_nearest_controller(domain: &str) -> AppResult<String> {
    let domain_name = HSTRING::from(domain);
    let mut info: *mut DOMAIN_CONTROLLER_INFOW = std::ptr::null_mut();

    // SAFETY: `domain_name` outlives the call and the null PCWSTRs select the
    // local computer and any site. DsGetDcNameW only writes `info` on success;
    // it is dereferenced once, after the null check, and freed with
    // NetApiBufferFree before the copied name is used.
    unsafe {
        let status = DsGetDcNameW(
            PCWSTR::null(),
            &domain_name,
            None,
            PCWSTR::null(),
            DS_DIRECTORY_SERVICE_REQUIRED | DS_RETURN_DNS_NAME | DS_TRY_NEXTCLOSEST_SITE,
            &mut info,
        );

        if status != 0 || info.is_null() {
            return Err(AppError::Discovery {
                domain: domain.to_string(),
                message: std::io::Error::from_raw_os_error(status as i32).to_string(),
            });
        }

        let name = (*info).DomainControllerName.to_string();
        NetApiBufferFree(Some(info as *const std::ffi::c_void));

        let name = name.map_err(|_| {
            AppError::WindowsError("Invalid UTF-16 domain controller name".to_string())
        })?;
        Ok(strip_unc_prefix(&name))
    }
}

/// Non-Windows fallback - returns error
#[cfg(not(windows))]
pub fn discover_nearest_controller(domain: &str) -> AppResult<String> {
    Err(AppError::Discovery {
        domain: domain.to_string(),
        message: "domain controller discovery requires Windows".to_string(),
    })
}

/// DC locator names come back as `\\dc01.contoso.com`
#[cfg_attr(not(windows), allow(dead_code))]
fn strip_unc_prefix(name: &str) -> String {
    name.trim_start_matches('\\').to_string()
}
