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

    virtbank.rs

    Virtual bank mode. Lists or dumps the individually saved programs
    consolidated into banks of 40. Incomplete banks are filled with the
    init patch.
*/
use anyhow::Error;
use std::io::{BufWriter, Write};

use crate::{
    args::{ExtractParams, GlobalOptions},
    listing::{concise_entry, virtual_bank_file_name, LISTING_COLUMNS},
    open_image,
};
use sq80disk::{
    dump::{encode, write_new},
    io::ReadSeek,
    virtual_bank::assemble_virtual_banks,
    Directory,
    ExtractConfig,
    ExtractMode,
    Sq80Error,
    Sq80Image,
    SysexDumpType,
};

pub(crate) fn run(global: &GlobalOptions, params: &ExtractParams) -> Result<(), Error> {
    let config = params.config();
    config.validate(ExtractMode::VirtBank)?;

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
        writeln!(out, "Listing virtual bank contents...")?;
    }

    let banks = assemble_virtual_banks(image, directory, config)?;

    if let Some(idx) = config.index() {
        if idx >= banks.len() {
            return Err(Sq80Error::OutOfRange(format!(
                "no such virtual bank {} ({} virtual banks on disk)",
                idx + 1,
                banks.len()
            ))
            .into());
        }
    }

    // Virtual bank listings are always concise.
    for bank in banks.iter().filter(|b| config.selects(b.index())) {
        writeln!(out, "{}", bank.name())?;
        for (i, &program) in bank.programs().iter().enumerate() {
            if i > 0 && i % LISTING_COLUMNS == 0 {
                writeln!(out)?;
            }
            let name = directory
                .program(program, config.include_deleted)
                .map(|entry| entry.name())
                .unwrap_or_default();
            write!(out, "{}", concise_entry(program + 1, &name))?;
        }
        writeln!(out)?;
    }

    if let Some(format) = config.format {
        if !silent {
            writeln!(out)?;
            writeln!(out, "Dumping virtual bank/s...")?;
        }

        for bank in banks.iter().filter(|b| config.selects(b.index())) {
            let path = virtual_bank_file_name(
                config.prefix_or(ExtractMode::VirtBank.default_prefix()),
                bank.number(),
                format,
            );
            writeln!(out, "  {}   -> {}", bank.name(), path.display())?;
            write_new(&path, &encode(bank.data(), format, SysexDumpType::AllPrograms))?;
        }
    }
    Ok(())
}
