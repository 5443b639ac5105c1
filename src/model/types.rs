//! Enumerated setting values understood by the virtualization platform.
//!
//! Each enum serializes to the platform's literal identifier and exposes the
//! full list of identifiers as `VALUES`, which the field registry uses as the
//! allowed-value set.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// A string did not name any variant of a platform enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{value:?} is not a valid {kind}")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! platform_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $(#[serde(rename = $value)] $variant),+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(UnknownValue {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

platform_enum! {
    /// Hardware (non-nested) virtualization setting.
    VirtualExecUsage {
        HvAuto => "hvAuto",
        HvOn => "hvOn",
        HvOff => "hvOff",
    }
}

platform_enum! {
    /// EPT/RVI hardware memory virtualization setting.
    VirtualMmuUsage {
        Automatic => "automatic",
        On => "on",
        Off => "off",
    }
}

platform_enum! {
    /// Where the instance's swap file lives.
    SwapPlacement {
        Inherit => "inherit",
        VmDirectory => "vmDirectory",
        HostLocal => "hostLocal",
    }
}

platform_enum! {
    Firmware {
        Bios => "bios",
        Efi => "efi",
    }
}

platform_enum! {
    /// Share allocation level. Only `Custom` makes the share count meaningful.
    ShareLevel {
        Low => "low",
        Normal => "normal",
        High => "high",
        Custom => "custom",
    }
}
