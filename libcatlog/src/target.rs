/*
 * Destination selection
 *
 * A Target is a bit-field of destinations. `ALL` sets every bit so that
 * destinations added later are included without touching existing configs.
 */

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target(u32);

impl Target {
    pub const NONE: Target = Target(0);
    pub const CONSOLE: Target = Target(1);
    pub const FILE: Target = Target(2);
    pub const SINKS: Target = Target(4);
    pub const ALL: Target = Target(0xFFFF_FFFF);

    pub const fn from_bits(bits: u32) -> Self {
        Target(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True when every bit of `other` is also set in `self`.
    pub const fn contains(self, other: Target) -> bool {
        self.0 & other.0 == other.0
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "console" => Some(Target::CONSOLE),
            "file" => Some(Target::FILE),
            "sinks" | "sink" => Some(Target::SINKS),
            "all" => Some(Target::ALL),
            "none" => Some(Target::NONE),
            _ => None,
        }
    }
}

impl BitOr for Target {
    type Output = Target;

    fn bitor(self, rhs: Target) -> Target {
        Target(self.0 | rhs.0)
    }
}

impl BitOrAssign for Target {
    fn bitor_assign(&mut self, rhs: Target) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Target::ALL {
            return f.write_str("Target(ALL)");
        }
        let mut names = Vec::new();
        for (bit, name) in [
            (Target::CONSOLE, "CONSOLE"),
            (Target::FILE, "FILE"),
            (Target::SINKS, "SINKS"),
        ] {
            if self.contains(bit) {
                names.push(name);
            }
        }
        write!(f, "Target({:#x}: {})", self.0, names.join(" | "))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTarget {
    Bits(u32),
    Name(String),
    Names(Vec<String>),
}

// Accepts a raw mask (`6`), a single name (`"file"`) or a list (`["console", "file"]`)
impl<'de> Deserialize<'de> for Target {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        const NAMES: &[&str] = &["console", "file", "sinks", "all", "none"];

        let names = match RawTarget::deserialize(deserializer)? {
            RawTarget::Bits(bits) => return Ok(Target(bits)),
            RawTarget::Name(name) => vec![name],
            RawTarget::Names(names) => names,
        };

        let mut target = Target::NONE;
        for name in &names {
            match Target::from_name(name) {
                Some(bit) => target |= bit,
                None => return Err(serde::de::Error::unknown_variant(name, NAMES)),
            }
        }
        Ok(target)
    }
}
