/*
    sq80disk

    Copyright 2024 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    src/config.rs

    Run configuration for extraction. All reading and dumping routines take
    an ExtractConfig explicitly.
*/
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::{dump::DumpFormat, Sq80Error, Sq80Result, BANK_COUNT, PROGRAM_COUNT, PROGRAMS_PER_BANK};

/// The maximum number of virtual banks that 128 programs can fill.
pub const VIRTUAL_BANK_MAX: usize = PROGRAM_COUNT.div_ceil(PROGRAMS_PER_BANK);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ExtractMode {
    /// Individually saved programs.
    Prog,
    /// Program banks.
    Bank,
    /// Individually saved programs consolidated into banks of 40.
    VirtBank,
}

impl FromStr for ExtractMode {
    type Err = &'static str;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "prog" => Ok(ExtractMode::Prog),
            "bank" => Ok(ExtractMode::Bank),
            "virtbank" => Ok(ExtractMode::VirtBank),
            _ => Err("Invalid mode; expected 'prog', 'bank' or 'virtbank'"),
        }
    }
}

impl Display for ExtractMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ExtractMode::Prog => write!(f, "prog"),
            ExtractMode::Bank => write!(f, "bank"),
            ExtractMode::VirtBank => write!(f, "virtbank"),
        }
    }
}

impl ExtractMode {
    /// The highest unit number (counting from 1) that can be requested in this mode.
    pub fn max_units(&self) -> usize {
        match self {
            ExtractMode::Prog => PROGRAM_COUNT,
            ExtractMode::Bank => BANK_COUNT,
            ExtractMode::VirtBank => VIRTUAL_BANK_MAX,
        }
    }

    /// The default file name prefix for dumps in this mode.
    pub fn default_prefix(&self) -> &'static str {
        match self {
            ExtractMode::Prog => "PROG",
            ExtractMode::Bank => "BANK",
            ExtractMode::VirtBank => "VIRTBANK",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ExtractConfig {
    /// The unit to list or dump, counting from 1. `None` selects all units.
    pub number: Option<usize>,
    /// The dump format. `None` only lists.
    pub format: Option<DumpFormat>,
    /// Prefix for output file names. May include a directory.
    pub prefix: Option<String>,
    /// Produce concise listings.
    pub concise: bool,
    /// Recover programs that were deleted from the directory.
    pub include_deleted: bool,
}

impl ExtractConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_number(mut self, number: usize) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_format(mut self, format: DumpFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_concise(mut self, concise: bool) -> Self {
        self.concise = concise;
        self
    }

    pub fn with_deleted(mut self, include_deleted: bool) -> Self {
        self.include_deleted = include_deleted;
        self
    }

    /// The requested unit as a 0-based index, if any.
    pub fn index(&self) -> Option<usize> {
        self.number.map(|n| n.saturating_sub(1))
    }

    /// Return true if the unit at `index` (0-based) is selected by this configuration.
    pub fn selects(&self, index: usize) -> bool {
        self.index().map_or(true, |i| i == index)
    }

    pub fn prefix_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.prefix.as_deref().unwrap_or(default)
    }

    /// Check this configuration for the given mode. This does not touch the disk image, so it should
    /// be called before any disk I/O.
    pub fn validate(&self, mode: ExtractMode) -> Sq80Result<()> {
        if let Some(number) = self.number {
            if number == 0 {
                return Err(Sq80Error::OutOfRange(
                    "banks/programs count from 1 upwards".to_string(),
                ));
            }
            if number > mode.max_units() {
                return Err(Sq80Error::OutOfRange(format!(
                    "{} number {} (expected 1-{})",
                    mode,
                    number,
                    mode.max_units()
                )));
            }
        }

        if self.concise && self.format.is_some() {
            return Err(Sq80Error::InvalidConfig(
                "cannot produce a listing and a dump at the same time".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_zero_is_rejected() {
        let config = ExtractConfig::new().with_number(0);
        assert!(matches!(config.validate(ExtractMode::Prog), Err(Sq80Error::OutOfRange(_))));
    }

    #[test]
    fn number_limits_depend_on_mode() {
        let config = ExtractConfig::new().with_number(41);
        assert!(config.validate(ExtractMode::Prog).is_ok());
        assert!(config.validate(ExtractMode::Bank).is_err());

        assert!(ExtractConfig::new().with_number(4).validate(ExtractMode::VirtBank).is_ok());
        assert!(ExtractConfig::new().with_number(5).validate(ExtractMode::VirtBank).is_err());
        assert!(ExtractConfig::new().with_number(128).validate(ExtractMode::Prog).is_ok());
        assert!(ExtractConfig::new().with_number(129).validate(ExtractMode::Prog).is_err());
    }

    #[test]
    fn concise_and_dump_are_exclusive() {
        let config = ExtractConfig::new().with_concise(true).with_format(DumpFormat::Sysex);
        assert!(matches!(config.validate(ExtractMode::Bank), Err(Sq80Error::InvalidConfig(_))));
    }

    #[test]
    fn selects_all_without_number() {
        let config = ExtractConfig::new();
        assert!(config.selects(0));
        assert!(config.selects(127));

        let config = ExtractConfig::new().with_number(3);
        assert!(config.selects(2));
        assert!(!config.selects(3));
    }

    #[test]
    fn prefix_falls_back_to_mode_default() {
        let config = ExtractConfig::new();
        assert_eq!(config.prefix_or(ExtractMode::Bank.default_prefix()), "BANK");
        let config = config.with_prefix("out/MY");
        assert_eq!(config.prefix_or(ExtractMode::Bank.default_prefix()), "out/MY");
    }
}
