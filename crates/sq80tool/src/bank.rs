/*
    sq80tool

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

    bank.rs

    Program bank mode. Lists or dumps the banks saved on a disk.
*/
use anyhow::Error;
use std::io::{BufWriter, Write};

use crate::{
    args::{ExtractParams, GlobalOptions},
    listing::{bank_file_name, concise_entry, LISTING_COLUMNS},
    open_image,
};
use sq80disk::{
    dump::{encode, write_new},
    io::ReadSeek,
    Directory,
    ExtractConfig,
    ExtractMode,
    Sq80Error,
    Sq80Image,
    SysexDumpType,
};

pub(crate) fn run(global: &GlobalOptions, params: &ExtractParams) -> Result<(), Error> {
    let config = params.config();
    config.validate(ExtractMode::Bank)?;

    let (mut image, directory) = open_image(&params.in_file)?;
    if !global.silent {
        println!("SQ80 Disk Image File: {}", params.in_file.display());
    }

    let mut out = BufWriter::new(std::io::stdout());
    let result = extract(&mut image, &directory, &config, global.silent, &mut out);
    out.flush()?;
    result
}

pub(crate) fn extract<RS: ReadSeek, W: Write>(
    image: &mut Sq80Image<RS>,
    directory: &Directory,
    config: &ExtractConfig,
    silent: bool,
    out: &mut W,
) -> Result<(), Error> {
    if !silent {
        match config.format {
            Some(_) => writeln!(out, "Dumping bank/s...")?,
            None => writeln!(out, "Listing bank/s...")?,
        }
    }

    for (idx, entry) in directory.bank_entries().iter().enumerate() {
        if !config.selects(idx) {
            continue;
        }

        let entry = match entry {
            Some(entry) => entry,
            None => {
                if config.number.is_some() {
                    return Err(Sq80Error::EmptySlot(format!("bank {} doesn't exist", idx + 1)).into());
                }
                continue;
            }
        };

        if let Some(format) = config.format {
            let path = bank_file_name(
                config.prefix_or(ExtractMode::Bank.default_prefix()),
                idx + 1,
                entry.name(),
                format,
            );
            writeln!(out, "  BANK {:2} - {}   -> {}", idx + 1, entry.name(), path.display())?;

            let data = image.read_bank(directory, idx)?;
            write_new(&path, &encode(&data, format, SysexDumpType::AllPrograms))?;
        }
        else if config.concise {
            writeln!(out, "BANK {:2} - {}", idx + 1, entry.name())?;
            let names = image.bank_program_names(directory, idx)?;
            for (p, name) in names.iter().enumerate() {
                if p > 0 && p % LISTING_COLUMNS == 0 {
                    writeln!(out)?;
                }
                write!(out, "{}", concise_entry(p + 1, name))?;
            }
            writeln!(out)?;
        }
        else {
            writeln!(out, "  BANK {:2} - {}", idx + 1, entry.name())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sq80disk::test_support::TestImageBuilder;
    use sq80disk::{DumpFormat, BANK_SIZE};

    #[test]
    fn lists_defined_banks() {
        let (mut image, directory) = TestImageBuilder::new()
            .with_bank(0, b"STRINGS...")
            .with_bank(21, b"BRASS     ")
            .open_with_directory()
            .unwrap();
        let mut out = Vec::new();
        extract(&mut image, &directory, &ExtractConfig::new(), true, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "  BANK  1 - STRINGS...\n  BANK 22 - BRASS     \n"
        );
    }

    #[test]
    fn concise_listing_shows_bank_programs() {
        let (mut image, directory) = TestImageBuilder::new()
            .with_bank(2, b"PADS      ")
            .open_with_directory()
            .unwrap();
        let mut out = Vec::new();
        let config = ExtractConfig::new().with_concise(true);
        extract(&mut image, &directory, &config, true, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + 8);
        assert_eq!(lines[0], "BANK  3 - PADS      ");
        assert!(lines[1].starts_with(" 001:PRG001  "));
        assert!(lines[8].ends_with(" 040:PRG040  "));
    }

    #[test]
    fn missing_bank_is_an_error_when_requested() {
        let (mut image, directory) = TestImageBuilder::new()
            .with_bank(0, b"ONLY      ")
            .open_with_directory()
            .unwrap();
        let mut out = Vec::new();
        let config = ExtractConfig::new().with_number(2);
        let err = extract(&mut image, &directory, &config, true, &mut out).unwrap_err();
        assert!(matches!(err.downcast_ref::<Sq80Error>(), Some(Sq80Error::EmptySlot(_))));
    }

    #[test]
    fn dumps_all_banks() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = format!("{}/BANK", dir.path().display());
        let (mut image, directory) = TestImageBuilder::new()
            .with_bank(0, b"ONE.......")
            .with_bank(39, b"FORTY     ")
            .open_with_directory()
            .unwrap();

        let config = ExtractConfig::new().with_format(DumpFormat::Sysex).with_prefix(prefix);
        let mut out = Vec::new();
        extract(&mut image, &directory, &config, true, &mut out).unwrap();

        let first = std::fs::read(dir.path().join("BANK01_ONE.syx")).unwrap();
        assert_eq!(first.len(), 5 + BANK_SIZE * 2 + 1);
        assert_eq!(first[4], 0x02);
        assert!(dir.path().join("BANK40_FORTY.syx").exists());
    }
}
