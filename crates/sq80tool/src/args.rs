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
use bpaf::*;
use std::{
    fmt::{Display, Formatter},
    path::PathBuf,
};

use sq80disk::{DumpFormat, ExtractConfig};

#[derive(Clone, Debug)]
pub(crate) enum Command {
    Version,
    Prog(ExtractParams),
    Bank(ExtractParams),
    VirtBank(ExtractParams),
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Version => write!(f, "version"),
            Command::Prog(_) => write!(f, "prog"),
            Command::Bank(_) => write!(f, "bank"),
            Command::VirtBank(_) => write!(f, "virtbank"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct AppParams {
    pub(crate) global: GlobalOptions,
    pub(crate) command: Command,
}

#[derive(Debug)]
pub(crate) struct GlobalOptions {
    pub(crate) silent: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct ExtractParams {
    pub(crate) in_file: PathBuf,
    pub(crate) number: Option<usize>,
    pub(crate) dump: Option<DumpFormat>,
    pub(crate) prefix: Option<String>,
    pub(crate) list: bool,
    pub(crate) deleted: bool,
}

impl ExtractParams {
    pub(crate) fn config(&self) -> ExtractConfig {
        ExtractConfig {
            number: self.number,
            format: self.dump,
            prefix: self.prefix.clone(),
            concise: self.list,
            include_deleted: self.deleted,
        }
    }
}

pub(crate) fn global_options_parser() -> impl Parser<GlobalOptions> {
    let silent = long("silent")
        .help("Suppress all output except listings")
        .switch(); // Switch returns a bool, true if the flag is present

    construct!(GlobalOptions { silent })
}

pub(crate) fn in_file_parser() -> impl Parser<PathBuf> {
    long("in_file")
        .short('i')
        .argument::<PathBuf>("IN_FILE")
        .help("Path to the SQ80 disk image file")
}

fn number_parser() -> impl Parser<usize> {
    long("number")
        .short('n')
        .argument::<usize>("NUMBER")
        .help("The number of the bank/prog/virtbank to list or dump. Otherwise all are processed.")
        .guard(|&n| n > 0, "Banks/programs count from 1 upwards")
}

fn dump_format_parser() -> impl Parser<DumpFormat> {
    long("dump")
        .short('d')
        .argument::<DumpFormat>("FORMAT")
        .help("Dump instead of listing. 'syx' writes SYSEX that can be sent straight to the SQ80, 'bin' writes literal binary.")
}

fn prefix_parser() -> impl Parser<String> {
    long("prefix")
        .short('p')
        .argument::<String>("PREFIX")
        .help("Prefix for output file names. May include a directory.")
}

fn list_parser() -> impl Parser<bool> {
    long("list")
        .short('l')
        .help("Produce a concise listing, 5 programs per line. In bank mode, lists the programs in each bank.")
        .switch()
}

fn deleted_parser() -> impl Parser<bool> {
    long("deleted")
        .help("Include programs that were deleted but are still present on disk")
        .switch()
}

pub(crate) fn extract_parser() -> impl Parser<ExtractParams> {
    let in_file = in_file_parser();
    let number = number_parser().optional();
    let dump = dump_format_parser().optional();
    let prefix = prefix_parser().optional();
    let list = list_parser();
    let deleted = deleted_parser();

    construct!(ExtractParams {
        in_file,
        number,
        dump,
        prefix,
        list,
        deleted
    })
    .guard(
        |p| !(p.list && p.dump.is_some()),
        "Cannot select --list and --dump at the same time",
    )
}

pub(crate) fn command_parser() -> OptionParser<AppParams> {
    let global = global_options_parser();

    let version = pure(Command::Version)
        .to_options()
        .command("version")
        .help("Display version information and exit");

    let prog = construct!(Command::Prog(extract_parser()))
        .to_options()
        .command("prog")
        .help("Single program mode. List or dump one or all of the 128 individually saved programs.");
    let bank = construct!(Command::Bank(extract_parser()))
        .to_options()
        .command("bank")
        .help("Program bank mode. List or dump one or all of the 40 program banks.");
    let virtbank = construct!(Command::VirtBank(extract_parser()))
        .to_options()
        .command("virtbank")
        .help("Virtual bank mode. List or dump the individually saved programs as banks of 40.");

    let command = construct!([version, prog, bank, virtbank]);

    construct!(AppParams { global, command })
        .to_options()
        .descr("Extract programs and banks from Ensoniq SQ80 disk images as binary or SYSEX files")
}
