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

    src/dump.rs

    Serialization of program and bank data to binary or SYSEX dumps, and
    writing of dump files.
*/
use std::{
    fs::OpenOptions,
    io::Write,
    path::Path,
    str::FromStr,
};

use crate::{Sq80Error, Sq80Result};

/// SQ80 system exclusive header: SOX, Ensoniq manufacturer ID, SQ80 family ID, MIDI channel 0.
pub const SYSEX_HEADER: [u8; 4] = [0xF0, 0x0F, 0x02, 0x00];
/// End of exclusive.
pub const SYSEX_EOX: u8 = 0xF7;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DumpFormat {
    Binary,
    Sysex,
}

impl FromStr for DumpFormat {
    type Err = &'static str;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "bin" | "binary" => Ok(DumpFormat::Binary),
            "syx" | "sysex" => Ok(DumpFormat::Sysex),
            _ => Err("Invalid format; expected 'bin' or 'syx'"),
        }
    }
}

impl DumpFormat {
    /// The file extension for dumps in this format, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            DumpFormat::Binary => "bin",
            DumpFormat::Sysex => "syx",
        }
    }
}

/// The message type byte following the SYSEX header.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SysexDumpType {
    SingleProgram = 0x01,
    AllPrograms = 0x02,
}

/// Serialize `payload` in the requested format. Binary dumps are the payload unchanged.
/// SYSEX dumps split every byte into two, low nibble first, between the SQ80 header and EOX.
pub fn encode(payload: &[u8], format: DumpFormat, dump_type: SysexDumpType) -> Vec<u8> {
    match format {
        DumpFormat::Binary => payload.to_vec(),
        DumpFormat::Sysex => encode_sysex(payload, dump_type),
    }
}

pub fn encode_sysex(payload: &[u8], dump_type: SysexDumpType) -> Vec<u8> {
    let mut out = Vec::with_capacity(SYSEX_HEADER.len() + 1 + payload.len() * 2 + 1);
    out.extend_from_slice(&SYSEX_HEADER);
    out.push(dump_type as u8);
    for &b in payload {
        out.push(b & 0x0F);
        out.push(b >> 4);
    }
    out.push(SYSEX_EOX);
    out
}

/// Write `bytes` to a new file at `path`. An existing file is never overwritten; if the path is
/// already occupied [Sq80Error::AlreadyExists] is returned and the file is left untouched.
pub fn write_new(path: impl AsRef<Path>, bytes: &[u8]) -> Sq80Result<()> {
    let path = path.as_ref();
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => Sq80Error::AlreadyExists(path.to_path_buf()),
            _ => Sq80Error::from(e),
        })?;

    file.write_all(bytes)?;
    log::debug!("write_new(): Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
