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

    prog.rs

    Single program mode. Lists or dumps the individually saved programs.
*/
use anyhow::Error;
use std::io::{BufWriter, Write};

use crate::{
    args::{ExtractParams, GlobalOptions},
    listing::{concise_entry, program_file_name, LISTING_COLUMNS},
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
    config.validate(ExtractMode::Prog)?;

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
            Some(_) => writeln!(out, "Dumping individual program/s...")?,
            None => writeln!(out, "Listing individual program/s...")?,
        }
    }

    // Concise listings of all programs print 5 slots to a line. Lines with no programs are skipped.
    let concise = config.concise && config.number.is_none() && config.format.is_none();
    let mut printed = false;

    for (idx, entry) in directory.program_entries(config.include_deleted).iter().enumerate() {
        if concise && idx % LISTING_COLUMNS == 0 && printed {
            printed = false;
            writeln!(out)?;
        }

        if !config.selects(idx) {
            continue;
        }

        let entry = match entry {
            Some(entry) => entry,
            None => {
                if config.number.is_some() {
                    return Err(Sq80Error::EmptySlot(format!("program {} appears to be blank", idx + 1)).into());
                }
                continue;
            }
        };

        let name = entry.name();

        if let Some(format) = config.format {
            let path = program_file_name(
                config.prefix_or(ExtractMode::Prog.default_prefix()),
                idx + 1,
                &name,
                format,
            );
            writeln!(out, "  PROG {:2} - {} -> {}", idx + 1, name, path.display())?;

            let data = image.read_program(directory, idx, config)?;
            write_new(&path, &encode(&data, format, SysexDumpType::SingleProgram))?;
        }
        else if concise {
            write!(out, "{}", concise_entry(idx + 1, &name))?;
            printed = true;
        }
        else {
            writeln!(out, "  PROG {:2} - {}", idx + 1, name)?;
        }
    }

    if concise && printed {
        writeln!(out)?;
    }
    Ok(())
}
