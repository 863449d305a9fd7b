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

    sq80disk is a library for reading Ensoniq SQ80 floppy disk images and
    extracting the voice programs and program banks stored on them, either as
    literal binary or as SQ80 SYSEX dumps that can be sent to the synthesizer.
*/

pub mod charset;
pub mod chs;
pub mod config;
pub mod directory;
pub mod dump;
pub mod image;
pub mod io;
#[doc(hidden)]
pub mod test_support;
pub mod util;
pub mod virtual_bank;

use std::path::PathBuf;

use thiserror::Error;

pub use crate::{
    chs::Sq80Chs,
    config::{ExtractConfig, ExtractMode},
    directory::{BankEntry, Directory, ProgramEntry, Sq80FileType},
    dump::{DumpFormat, SysexDumpType},
    image::Sq80Image,
    virtual_bank::VirtualBank,
};

/// Every SQ80 disk image file begins with this header.
pub const IMAGE_MAGIC: &[u8; 10] = b"!SQ80DISK!";
pub const IMAGE_HEADER_SIZE: usize = 10;

pub const SECTOR_SIZE: usize = 1024;
pub const DIRECTORY_SIZE: usize = 2048;
pub const DIRECTORY_CHUNK_SIZE: usize = 512;

pub const BANK_COUNT: usize = 40;
pub const PROGRAM_COUNT: usize = 128;
pub const PROGRAMS_PER_BANK: usize = 40;
pub const PROGRAM_SIZE: usize = 102;
pub const PROGRAM_NAME_LEN: usize = 6;
pub const BANK_NAME_LEN: usize = 10;
/// A bank is 40 consecutive program slots.
pub const BANK_SIZE: usize = PROGRAMS_PER_BANK * PROGRAM_SIZE;

pub type Sq80Result<T> = Result<T, Sq80Error>;

/// [Sq80Error] is the error type for all sq80disk operations. None of these errors are recoverable
/// for the current operation; they are intended to be propagated to the caller.
#[derive(Debug, Error)]
pub enum Sq80Error {
    #[error("The file does not appear to be a valid SQ80 disk image")]
    InvalidImageHeader,
    #[error("The disk directory is malformed: {0}")]
    MalformedDirectory(String),
    #[error("Program {program}: name on disk ({disk:02X?}) doesn't match directory entry ({directory:02X?})")]
    NameMismatch {
        program: usize,
        disk: [u8; PROGRAM_NAME_LEN],
        directory: [u8; PROGRAM_NAME_LEN],
    },
    #[error("Requested value is out of range: {0}")]
    OutOfRange(String),
    #[error("Requested slot is empty: {0}")]
    EmptySlot(String),
    #[error("Invalid CHS address: {0}")]
    InvalidChs(Sq80Chs),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Output file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("Short read at offset {offset:#X}: expected {expected} bytes, got {actual}")]
    TruncatedRead { offset: u64, expected: usize, actual: usize },
    #[error("An IO error occurred reading or writing the disk image: {0}")]
    IoError(String),
}

impl From<std::io::Error> for Sq80Error {
    fn from(e: std::io::Error) -> Self {
        Sq80Error::IoError(e.to_string())
    }
}

impl From<binrw::Error> for Sq80Error {
    fn from(e: binrw::Error) -> Self {
        match e {
            binrw::Error::Io(io_err) => Sq80Error::from(io_err),
            other => Sq80Error::IoError(other.to_string()),
        }
    }
}

pub mod prelude {
    pub use crate::{
        chs::Sq80Chs,
        config::{ExtractConfig, ExtractMode},
        directory::{BankEntry, Directory, ProgramEntry, Sq80FileType},
        dump::{encode, write_new, DumpFormat, SysexDumpType},
        image::Sq80Image,
        virtual_bank::{assemble_virtual_banks, VirtualBank, VirtualBankAssembler, INIT_PATCH},
        Sq80Error,
        Sq80Result,
    };
}
