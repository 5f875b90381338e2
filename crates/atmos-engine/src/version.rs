//! Version and ABI compatibility checks.

/// Major version.
pub const VERSION_MAJOR: u32 = 0;
/// Minor version.
pub const VERSION_MINOR: u32 = 2;
/// Patch version.
pub const VERSION_PATCH: u32 = 0;

/// Packed version: `major << 16 | minor << 8 | patch`.
pub const VERSION: u32 = (VERSION_MAJOR << 16) | (VERSION_MINOR << 8) | VERSION_PATCH;

/// Version as `major.minor.patch`.
pub fn version_string() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Whether a host built against `expected` can use this engine.
///
/// The major versions must match and the expected minor version must not
/// be newer than this one. The patch level is ignored.
pub fn check_abi_compatibility(expected: u32) -> bool {
    let major = (expected >> 16) & 0xFF;
    let minor = (expected >> 8) & 0xFF;
    major == VERSION_MAJOR && minor <= VERSION_MINOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_version_matches_string() {
        let expected = format!("{VERSION_MAJOR}.{VERSION_MINOR}.{VERSION_PATCH}");
        assert_eq!(version_string(), expected);
        assert_eq!(VERSION, 0x0000_0200);
    }

    #[test]
    fn test_abi_compatibility() {
        assert!(check_abi_compatibility(VERSION));
        assert!(check_abi_compatibility(0x0000_0100));
        assert!(check_abi_compatibility(0x0000_02FF));
        assert!(!check_abi_compatibility(0x0000_0300));
        assert!(!check_abi_compatibility(0x0001_0000));
    }
}
