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

    src/directory.rs

    Parsing of the SQ80 disk directory.

    The directory is a 2048 byte block assembled from four 512 byte short
    sectors. It contains a table of 40 bank file entries of 13 bytes each,
    starting at entry 10, followed at offset 650 by the 6 byte names of the
    128 individually saved programs.
*/
use std::fmt::{self, Display, Formatter};

use binrw::{binrw, BinRead};
use strum::IntoEnumIterator;

use crate::{
    charset::sq_to_ascii,
    io::{Cursor, Seek, SeekFrom},
    Sq80Error,
    Sq80Result,
    BANK_COUNT,
    BANK_NAME_LEN,
    DIRECTORY_SIZE,
    PROGRAM_COUNT,
    PROGRAM_NAME_LEN,
};

pub const BANK_RECORD_SIZE: usize = 13;
/// The bank table begins at directory entry 10.
pub const BANK_TABLE_OFFSET: usize = 10 * BANK_RECORD_SIZE;
pub const PROGRAM_TABLE_OFFSET: usize = 650;

#[derive(Debug)]
#[binrw]
#[brw(big)]
struct BankRecord {
    type_code: u8,
    name: [u8; BANK_NAME_LEN],
    size: u16,
}

/// The file types an SQ80 directory entry can hold, in type code order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sq80FileType {
    Empty,
    System,
    Bank,
    Song,
    Sequence,
    Sysex,
    Program,
}

impl TryFrom<u8> for Sq80FileType {
    type Error = Sq80Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Sq80FileType::iter()
            .nth(code as usize)
            .ok_or_else(|| Sq80Error::MalformedDirectory(format!("unknown file type code {:02X}", code)))
    }
}

impl Display for Sq80FileType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Sq80FileType::Empty => write!(f, "---"),
            Sq80FileType::System => write!(f, "SYS"),
            Sq80FileType::Bank => write!(f, "BNK"),
            Sq80FileType::Song => write!(f, "SNG"),
            Sq80FileType::Sequence => write!(f, "SEQ"),
            Sq80FileType::Sysex => write!(f, "SYX"),
            Sq80FileType::Program => write!(f, "PRG"),
        }
    }
}

/// A defined bank in the directory.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BankEntry {
    raw_name: [u8; BANK_NAME_LEN],
    name: String,
    size: u16,
}

impl BankEntry {
    pub fn raw_name(&self) -> &[u8; BANK_NAME_LEN] {
        &self.raw_name
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    /// The size field stored in the directory. The SQ80 does not appear to rely on it.
    pub fn size(&self) -> u16 {
        self.size
    }
}

/// A program slot in the directory.
///
/// Deleting a program on the SQ80 only zeroes the first character of its directory name, so a
/// deleted program can still be recovered. Such entries are only produced when explicitly requested
/// and are flagged with [ProgramEntry::is_deleted].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgramEntry {
    raw_name: [u8; PROGRAM_NAME_LEN],
    deleted: bool,
}

impl ProgramEntry {
    pub fn raw_name(&self) -> &[u8; PROGRAM_NAME_LEN] {
        &self.raw_name
    }
    pub fn name(&self) -> String {
        sq_to_ascii(&self.raw_name)
    }
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Check a name read from the program data on disk against this entry. The first character of a
    /// deleted entry is lost, so only the remainder is compared.
    pub fn matches(&self, disk_name: &[u8]) -> bool {
        if disk_name.len() != PROGRAM_NAME_LEN {
            return false;
        }
        if self.deleted {
            disk_name[1..] == self.raw_name[1..]
        }
        else {
            disk_name == self.raw_name
        }
    }
}

#[derive(Clone, Debug)]
pub struct Directory {
    buf: Vec<u8>,
    banks: Vec<Option<BankEntry>>,
}

impl Directory {
    /// Parse a directory block. Every defined bank table entry must be a bank; anything else
    /// is a [Sq80Error::MalformedDirectory].
    pub fn parse(buf: &[u8]) -> Sq80Result<Self> {
        if buf.len() != DIRECTORY_SIZE {
            return Err(Sq80Error::MalformedDirectory(format!(
                "expected {} bytes, got {}",
                DIRECTORY_SIZE,
                buf.len()
            )));
        }

        let mut cursor = Cursor::new(buf);
        cursor.seek(SeekFrom::Start(BANK_TABLE_OFFSET as u64))?;

        let mut banks = Vec::with_capacity(BANK_COUNT);
        for slot in 0..BANK_COUNT {
            let record = BankRecord::read(&mut cursor)?;
            let file_type = Sq80FileType::try_from(record.type_code)?;

            match file_type {
                Sq80FileType::Empty => banks.push(None),
                Sq80FileType::Bank => {
                    let name = sq_to_ascii(&record.name);
                    log::trace!(
                        "Directory::parse(): Bank slot {} name: {} size: {}",
                        slot,
                        name,
                        record.size
                    );
                    banks.push(Some(BankEntry {
                        raw_name: record.name,
                        name,
                        size: record.size,
                    }))
                }
                other => {
                    log::error!("Directory::parse(): Unexpected file type {} in bank slot {}", other, slot);
                    return Err(Sq80Error::MalformedDirectory(format!(
                        "bank slot {} has file type {}",
                        slot, other
                    )));
                }
            }
        }

        let directory = Directory {
            buf: buf.to_vec(),
            banks,
        };

        log::debug!(
            "Directory::parse(): {} banks, {} programs defined",
            directory.banks.iter().flatten().count(),
            directory.programs().iter().flatten().count()
        );

        Ok(directory)
    }

    /// Return the names of the 40 bank slots. Empty slots are `None`.
    pub fn banks(&self) -> Vec<Option<String>> {
        self.banks.iter().map(|b| b.as_ref().map(|b| b.name.clone())).collect()
    }

    pub fn bank_entries(&self) -> &[Option<BankEntry>] {
        &self.banks
    }

    pub fn bank(&self, bank: usize) -> Option<&BankEntry> {
        self.banks.get(bank).and_then(|b| b.as_ref())
    }

    fn raw_program_name(&self, program: usize) -> [u8; PROGRAM_NAME_LEN] {
        let start = PROGRAM_TABLE_OFFSET + program * PROGRAM_NAME_LEN;
        let mut name = [0u8; PROGRAM_NAME_LEN];
        name.copy_from_slice(&self.buf[start..start + PROGRAM_NAME_LEN]);
        name
    }

    /// Return the raw names of the 128 program slots. A slot is empty when the first byte of its
    /// name is 0, regardless of the rest of the name.
    pub fn programs(&self) -> Vec<Option<[u8; PROGRAM_NAME_LEN]>> {
        (0..PROGRAM_COUNT)
            .map(|p| {
                let name = self.raw_program_name(p);
                (name[0] != 0).then_some(name)
            })
            .collect()
    }

    /// Return the program slot at `program`, or `None` if it is empty or out of range.
    /// If `include_deleted` is set, slots that were deleted but still hold the remainder of a name
    /// are returned as deleted entries.
    pub fn program(&self, program: usize, include_deleted: bool) -> Option<ProgramEntry> {
        if program >= PROGRAM_COUNT {
            return None;
        }

        let raw_name = self.raw_program_name(program);
        if raw_name[0] != 0 {
            Some(ProgramEntry {
                raw_name,
                deleted: false,
            })
        }
        else if include_deleted && raw_name[1..].iter().any(|&b| b != 0) {
            Some(ProgramEntry {
                raw_name,
                deleted: true,
            })
        }
        else {
            None
        }
    }

    pub fn program_entries(&self, include_deleted: bool) -> Vec<Option<ProgramEntry>> {
        (0..PROGRAM_COUNT).map(|p| self.program(p, include_deleted)).collect()
    }

    #[cfg(test)]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_directory() -> Vec<u8> {
        vec![0u8; DIRECTORY_SIZE]
    }

    fn set_bank(buf: &mut [u8], slot: usize, type_code: u8, name: &[u8; 10], size: u16) {
        let start = BANK_TABLE_OFFSET + slot * BANK_RECORD_SIZE;
        buf[start] = type_code;
        buf[start + 1..start + 11].copy_from_slice(name);
        buf[start + 11..start + 13].copy_from_slice(&size.to_be_bytes());
    }

    fn set_program(buf: &mut [u8], slot: usize, name: &[u8; 6]) {
        let start = PROGRAM_TABLE_OFFSET + slot * PROGRAM_NAME_LEN;
        buf[start..start + 6].copy_from_slice(name);
    }

    #[test]
    fn empty_directory_has_no_banks_or_programs() {
        let dir = Directory::parse(&empty_directory()).unwrap();
        assert_eq!(dir.banks().len(), BANK_COUNT);
        assert!(dir.banks().iter().all(|b| b.is_none()));
        assert_eq!(dir.programs().len(), PROGRAM_COUNT);
        assert!(dir.programs().iter().all(|p| p.is_none()));
    }

    #[test]
    fn bank_entries_are_parsed() {
        let mut buf = empty_directory();
        set_bank(&mut buf, 0, 2, b"STRINGS\x21..", 0x1234);
        set_bank(&mut buf, 39, 2, b"LAST      ", 0);

        let dir = Directory::parse(&buf).unwrap();
        let banks = dir.banks();
        assert_eq!(banks[0].as_deref(), Some("STRINGS0.."));
        assert_eq!(banks[39].as_deref(), Some("LAST      "));
        assert!(banks[1..39].iter().all(|b| b.is_none()));
        assert_eq!(dir.bank(0).unwrap().size(), 0x1234);
    }

    #[test]
    fn non_bank_file_type_is_rejected() {
        let mut buf = empty_directory();
        set_bank(&mut buf, 5, 3, b"MYSONG    ", 0);
        assert!(matches!(Directory::parse(&buf), Err(Sq80Error::MalformedDirectory(_))));
    }

    #[test]
    fn unknown_file_type_is_rejected() {
        let mut buf = empty_directory();
        set_bank(&mut buf, 0, 7, b"??????????", 0);
        assert!(matches!(Directory::parse(&buf), Err(Sq80Error::MalformedDirectory(_))));
    }

    #[test]
    fn wrong_size_is_rejected() {
        assert!(matches!(
            Directory::parse(&[0u8; 512]),
            Err(Sq80Error::MalformedDirectory(_))
        ));
    }

    #[test]
    fn program_slot_emptiness_depends_on_first_byte() {
        let mut buf = empty_directory();
        set_program(&mut buf, 0, b"PIANO ");
        set_program(&mut buf, 1, &[0x41, 0xFF, 0x00, 0x13, 0x7F, 0x00]);
        set_program(&mut buf, 2, &[0x00, 0x52, 0x47, 0x41, 0x4E, 0x20]);

        let dir = Directory::parse(&buf).unwrap();
        let programs = dir.programs();
        assert_eq!(programs[0], Some(*b"PIANO "));
        assert_eq!(programs[1], Some([0x41, 0xFF, 0x00, 0x13, 0x7F, 0x00]));
        assert_eq!(programs[2], None);
    }

    #[test]
    fn deleted_programs_are_recovered_on_request() {
        let mut buf = empty_directory();
        set_program(&mut buf, 7, &[0x00, 0x52, 0x47, 0x41, 0x4E, 0x20]);

        let dir = Directory::parse(&buf).unwrap();
        assert!(dir.program(7, false).is_none());

        let entry = dir.program(7, true).unwrap();
        assert!(entry.is_deleted());
        assert_eq!(entry.name(), "-RGAN ");
        assert!(entry.matches(b"ORGAN "));
        assert!(!entry.matches(b"ORGAX "));

        // A fully zeroed slot is never treated as deleted.
        assert!(dir.program(8, true).is_none());
    }

    #[test]
    fn file_type_codes_round_trip_display() {
        let names: Vec<String> = Sq80FileType::iter().map(|t| t.to_string()).collect();
        assert_eq!(names, ["---", "SYS", "BNK", "SNG", "SEQ", "SYX", "PRG"]);
        assert_eq!(Sq80FileType::try_from(2).unwrap(), Sq80FileType::Bank);
    }
}
