//! Compiler flags for the module that lives next to the build matrix.

use regex::Regex;
use std::sync::LazyLock;

/// Language standard flag, omitted for C++ ABI builds.
pub const STD_FLAG: &str = "-std=c11";
pub const PEDANTIC_FLAG: &str = "-pedantic";
pub const WARNINGS_FLAG: &str = "-Wall";

// gcc, cc, clang, optionally versioned (gcc-12, clang15)
static C_COMPILER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:g?cc|clang)\d*\b").unwrap());

/// Whether a compiler command invokes a gcc/clang-compatible C compiler.
pub fn is_c_family_compiler(command: &str) -> bool {
    C_COMPILER_REGEX.is_match(command)
}

/// Flags appended to the self module's compiler flags.
pub fn self_module_flags(cc_command: &str, cxx_abi: bool) -> Vec<String> {
    if !is_c_family_compiler(cc_command) {
        return Vec::new();
    }

    let mut flags = Vec::with_capacity(3);
    if !cxx_abi {
        flags.push(STD_FLAG.to_string());
    }
    flags.push(PEDANTIC_FLAG.to_string());
    flags.push(WARNINGS_FLAG.to_string());
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_c_compilers() {
        for cmd in [
            "gcc",
            "cc",
            "clang",
            "clang-15",
            "clang15",
            "/usr/bin/gcc-12",
            "ccache gcc",
            "x86_64-linux-gnu-gcc",
            "clang++",
        ] {
            assert!(is_c_family_compiler(cmd), "{} should match", cmd);
        }
    }

    #[test]
    fn test_rejects_other_compilers() {
        for cmd in ["emcc", "cl.exe", "tcc", "g++", "icx"] {
            assert!(!is_c_family_compiler(cmd), "{} should not match", cmd);
        }
    }

    #[test]
    fn test_flags_for_c_build() {
        assert_eq!(
            self_module_flags("clang", false),
            vec!["-std=c11", "-pedantic", "-Wall"]
        );
    }

    #[test]
    fn test_cxx_abi_skips_std_flag() {
        assert_eq!(self_module_flags("gcc", true), vec!["-pedantic", "-Wall"]);
    }

    #[test]
    fn test_no_flags_for_other_compilers() {
        assert!(self_module_flags("cl.exe", false).is_empty());
    }
}
