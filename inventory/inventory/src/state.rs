use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

/// Hardware lifecycle state, identified on the wire by a single character code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum HardwareState {
    Missing,
    Bios,
    Discovered,
    IpAssigned,
    Loading,
    KernelBoot,
    Active,
    Error,
    Service,
}

impl HardwareState {
    /// All states in state-key display order.
    pub const ALL: [HardwareState; 9] = [
        HardwareState::Missing,
        HardwareState::Bios,
        HardwareState::Discovered,
        HardwareState::IpAssigned,
        HardwareState::Loading,
        HardwareState::KernelBoot,
        HardwareState::Active,
        HardwareState::Error,
        HardwareState::Service,
    ];

    pub const fn code(&self) -> char {
        match self {
            HardwareState::Missing => 'M',
            HardwareState::Bios => 'B',
            HardwareState::Discovered => 'D',
            HardwareState::IpAssigned => 'I',
            HardwareState::Loading => 'L',
            HardwareState::KernelBoot => 'K',
            HardwareState::Active => 'A',
            HardwareState::Error => 'E',
            HardwareState::Service => 'S',
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            HardwareState::Missing => "Missing",
            HardwareState::Bios => "BIOS",
            HardwareState::Discovered => "Discovered",
            HardwareState::IpAssigned => "IP Assigned",
            HardwareState::Loading => "Loading",
            HardwareState::KernelBoot => "Kernel Boot",
            HardwareState::Active => "Active",
            HardwareState::Error => "Error",
            HardwareState::Service => "Service",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            HardwareState::Missing => "Nodes that are Missing or Powered Off",
            HardwareState::Bios => "Nodes with BIOS Starting",
            HardwareState::Discovered => "Nodes just Discovered",
            HardwareState::IpAssigned => "Nodes having IP addresses just assigned",
            HardwareState::Loading => "Nodes that are Loading image",
            HardwareState::KernelBoot => "Linux kernel starting to boot",
            HardwareState::Active => "Nodes that are Active (booted)",
            HardwareState::Error => "Nodes in Error",
            HardwareState::Service => "Nodes in Service",
        }
    }
}

impl TryFrom<char> for HardwareState {
    type Error = StateError;

    fn try_from(code: char) -> Result<Self, StateError> {
        HardwareState::ALL
            .iter()
            .find(|state| state.code() == code)
            .copied()
            .ok_or(StateError::UnknownCode(code))
    }
}

impl FromStr for HardwareState {
    type Err = StateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => HardwareState::try_from(code),
            _ => Err(StateError::InvalidCode(value.to_string())),
        }
    }
}

impl Display for HardwareState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("Unknown state code. code: '{0}'")]
    UnknownCode(char),
    #[error("Invalid state code, expected a single character. value: '{0}'")]
    InvalidCode(String),
}
