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
*/

pub mod args;
mod bank;
mod listing;
mod prog;
mod virtbank;

use anyhow::{Context, Error};
use std::{io::Cursor, path::Path};

use crate::args::Command;
use args::command_parser;
use sq80disk::{Directory, Sq80Image};

fn main() -> Result<(), Error> {
    env_logger::init();

    let app_params = command_parser().run();

    let command_result = match &app_params.command {
        Command::Version => {
            println!("sq80tool v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Prog(params) => prog::run(&app_params.global, params),
        Command::Bank(params) => bank::run(&app_params.global, params),
        Command::VirtBank(params) => virtbank::run(&app_params.global, params),
    };

    match command_result {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("Command '{}' failed: {}", app_params.command, e);
            for cause in e.chain().skip(1) {
                eprintln!("Caused by: {}", cause);
            }
            std::process::exit(1);
        }
    }
}

pub(crate) fn read_file(path: &Path) -> Result<Cursor<Vec<u8>>, Error> {
    let buffer = std::fs::read(path).with_context(|| format!("Couldn't read {}", path.display()))?;
    Ok(Cursor::new(buffer))
}

/// Open a disk image and read its directory.
pub(crate) fn open_image(path: &Path) -> Result<(Sq80Image<Cursor<Vec<u8>>>, Directory), Error> {
    let mut image = Sq80Image::open(read_file(path)?)?;
    let directory = image.read_directory()?;
    log::debug!(
        "open_image(): Read directory of {} ({} bytes)",
        path.display(),
        image.len()
    );
    Ok((image, directory))
}
