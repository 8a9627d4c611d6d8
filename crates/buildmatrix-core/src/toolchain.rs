//! Toolchain selection.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::Error;

/// A named compiler toolchain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Toolchain {
    #[default]
    #[display("clang")]
    Clang,
    #[display("gcc")]
    Gcc,
    #[display("visualcpp")]
    VisualCpp,
    #[display("emscripten")]
    Emscripten,
}

impl Toolchain {
    /// The C compiler command this toolchain invokes unless overridden.
    pub fn default_cc_command(&self) -> &'static str {
        match self {
            Toolchain::Clang => "clang",
            Toolchain::Gcc => "gcc",
            Toolchain::VisualCpp => "cl.exe",
            Toolchain::Emscripten => "emcc",
        }
    }
}

impl FromStr for Toolchain {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "clang" => Ok(Toolchain::Clang),
            "gcc" => Ok(Toolchain::Gcc),
            "visualcpp" => Ok(Toolchain::VisualCpp),
            "emscripten" => Ok(Toolchain::Emscripten),
            other => Err(Error::InvalidInput(format!("unknown toolchain: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for tc in [
            Toolchain::Clang,
            Toolchain::Gcc,
            Toolchain::VisualCpp,
            Toolchain::Emscripten,
        ] {
            assert_eq!(tc.to_string().parse::<Toolchain>().unwrap(), tc);
        }
    }

    #[test]
    fn test_unknown_toolchain() {
        let err = "tcc".parse::<Toolchain>().unwrap_err();
        assert!(err.to_string().contains("tcc"));
    }

    #[test]
    fn test_default_commands() {
        assert_eq!(Toolchain::default().default_cc_command(), "clang");
        assert_eq!(Toolchain::Gcc.default_cc_command(), "gcc");
    }
}
