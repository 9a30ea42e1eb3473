//! CPU architecture identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Android ABIs a module image or native split can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Abi {
    /// 32-bit ARM (legacy).
    #[serde(rename = "armeabi")]
    Armeabi,
    /// 32-bit ARMv7.
    #[serde(rename = "armeabi-v7a")]
    ArmeabiV7a,
    /// 64-bit ARMv8.
    #[serde(rename = "arm64-v8a")]
    Arm64V8a,
    /// 32-bit x86.
    #[serde(rename = "x86")]
    X86,
    /// 64-bit x86.
    #[serde(rename = "x86_64")]
    X86_64,
    /// 64-bit RISC-V.
    #[serde(rename = "riscv64")]
    Riscv64,
}

impl Abi {
    /// Get the ABI string as reported by `ro.product.cpu.abilist`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Armeabi => "armeabi",
            Self::ArmeabiV7a => "armeabi-v7a",
            Self::Arm64V8a => "arm64-v8a",
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
            Self::Riscv64 => "riscv64",
        }
    }

    /// Parse an ABI from its string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "armeabi" => Some(Self::Armeabi),
            "armeabi-v7a" => Some(Self::ArmeabiV7a),
            "arm64-v8a" => Some(Self::Arm64V8a),
            "x86" => Some(Self::X86),
            "x86_64" => Some(Self::X86_64),
            "riscv64" => Some(Self::Riscv64),
            _ => None,
        }
    }

    /// Get all known ABIs.
    #[must_use]
    pub fn all() -> &'static [Abi] {
        &[
            Self::Armeabi,
            Self::ArmeabiV7a,
            Self::Arm64V8a,
            Self::X86,
            Self::X86_64,
            Self::Riscv64,
        ]
    }
}

impl fmt::Display for Abi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
