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

    listing.rs

    Listing formats and output file naming shared by the extraction modes.
*/
use std::path::PathBuf;

use sq80disk::{util::trim_name, DumpFormat};

/// Concise listings show this many programs per line.
pub(crate) const LISTING_COLUMNS: usize = 5;

/// A single entry of a concise listing: number and name padded to a fixed width.
pub(crate) fn concise_entry(number: usize, name: &str) -> String {
    format!(" {:03}:{: <8}", number, name)
}

// Names may contain characters that are meaningful in paths.
fn file_safe(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

pub(crate) fn program_file_name(prefix: &str, number: usize, name: &str, format: DumpFormat) -> PathBuf {
    PathBuf::from(format!(
        "{}{:03}_{}.{}",
        prefix,
        number,
        file_safe(trim_name(name)),
        format.extension()
    ))
}

pub(crate) fn bank_file_name(prefix: &str, number: usize, name: &str, format: DumpFormat) -> PathBuf {
    PathBuf::from(format!(
        "{}{:02}_{}.{}",
        prefix,
        number,
        file_safe(trim_name(name)),
        format.extension()
    ))
}

pub(crate) fn virtual_bank_file_name(prefix: &str, number: usize, format: DumpFormat) -> PathBuf {
    PathBuf::from(format!("{}{:02}.{}", prefix, number, format.extension()))
}
