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

    src/chs.rs

    Cylinder/head/sector addressing for SQ80 disk images.

    The SQ80 formats 80 cylinders on two heads. Each track holds five 1024
    byte sectors followed by a single 512 byte sector, so a track occupies
    5.5K in the image file. Sector 5 is the short sector; the directory and
    the individually saved programs live there.
*/
use std::fmt::Display;

use crate::{Sq80Error, Sq80Result, BANK_COUNT, IMAGE_HEADER_SIZE, PROGRAM_COUNT, SECTOR_SIZE};

pub const CYLINDER_COUNT: u8 = 80;
pub const HEAD_COUNT: u8 = 2;
/// Five full data sectors plus the short sector.
pub const SECTOR_SLOTS: u8 = 6;
pub const DATA_SECTORS: u8 = 5;
pub const SHORT_SECTOR: u8 = 5;
pub const SHORT_SECTOR_SIZE: usize = 512;
pub const TRACK_SIZE: usize = DATA_SECTORS as usize * SECTOR_SIZE + SHORT_SECTOR_SIZE;

/// First cylinder of the bank storage area.
pub const BANK_BASE_CYLINDER: u8 = 64;
/// Banks are stored as 4 consecutive sectors, 20 banks per head.
pub const BANK_SECTORS: u8 = 4;
pub const BANKS_PER_HEAD: usize = 20;

/// The directory is assembled from the short sectors of the first two cylinders, in this order.
pub const DIRECTORY_CHS: [Sq80Chs; 4] = [
    Sq80Chs { c: 0, h: 0, s: 5 },
    Sq80Chs { c: 0, h: 1, s: 5 },
    Sq80Chs { c: 1, h: 1, s: 5 },
    Sq80Chs { c: 1, h: 0, s: 5 },
];

// Selector -> (cylinder, head) for program locations that don't follow the regular layout.
// These were determined by inspecting real disks. 0x1F is on head 0 (commonly documented as head 1);
// 0x26 and 0x4C are commonly omitted altogether.
const PROGRAM_CH_OVERRIDES: [(u8, u8, u8); 10] = [
    (0x06, 0x42, 0),
    (0x19, 0x42, 1),
    (0x1F, 0x43, 0),
    (0x26, 0x43, 1),
    (0x39, 0x44, 0),
    (0x3F, 0x44, 1),
    (0x4C, 0x45, 0),
    (0x53, 0x45, 1),
    (0x6C, 0x46, 0),
    (0x73, 0x46, 1),
];

#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sq80Chs {
    c: u8,
    h: u8,
    s: u8,
}

impl Display for Sq80Chs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[c:{} h:{} s:{}]", self.c, self.h, self.s)
    }
}

impl Sq80Chs {
    pub fn new(c: u8, h: u8, s: u8) -> Self {
        Self { c, h, s }
    }

    pub fn c(&self) -> u8 {
        self.c
    }
    pub fn h(&self) -> u8 {
        self.h
    }
    pub fn s(&self) -> u8 {
        self.s
    }

    /// Return true if this address lies within the SQ80 disk geometry.
    pub fn is_valid(&self) -> bool {
        self.c < CYLINDER_COUNT && self.h < HEAD_COUNT && self.s < SECTOR_SLOTS
    }

    /// Convert this address into a byte offset into a disk image file, accounting for the file header.
    /// Returns [Sq80Error::InvalidChs] if any of the cylinder, head or sector are out of range.
    pub fn to_offset(&self) -> Sq80Result<u64> {
        if !self.is_valid() {
            return Err(Sq80Error::InvalidChs(*self));
        }

        let track = self.c as usize * HEAD_COUNT as usize + self.h as usize;
        let offset = IMAGE_HEADER_SIZE + track * TRACK_SIZE + self.s as usize * SECTOR_SIZE;
        Ok(offset as u64)
    }

    /// Return the address of an individually saved program, counting from 0.
    /// Programs always live in the short sector.
    pub fn from_program(program: usize) -> Sq80Result<Self> {
        if program >= PROGRAM_COUNT {
            return Err(Sq80Error::OutOfRange(format!(
                "program index {} (expected 0-{})",
                program,
                PROGRAM_COUNT - 1
            )));
        }

        let program = program as u8;
        let selector = (program & 64) | ((program & 63) + 2);

        let (c, h) = PROGRAM_CH_OVERRIDES
            .iter()
            .find(|(sw, _, _)| *sw == selector)
            .map(|&(_, c, h)| (c, h))
            .unwrap_or(((program & 63) + 2, (program & 64) >> 6));

        Ok(Self { c, h, s: SHORT_SECTOR })
    }

    /// Return the address of the first sector of a bank, counting from 0.
    pub fn from_bank(bank: usize) -> Sq80Result<Self> {
        if bank >= BANK_COUNT {
            return Err(Sq80Error::OutOfRange(format!(
                "bank index {} (expected 0-{})",
                bank,
                BANK_COUNT - 1
            )));
        }

        let sector_offset = (bank % BANKS_PER_HEAD) as u8 * BANK_SECTORS;
        Ok(Self {
            c: BANK_BASE_CYLINDER + sector_offset / DATA_SECTORS,
            h: (bank / BANKS_PER_HEAD) as u8,
            s: sector_offset % DATA_SECTORS,
        })
    }

    /// Return the next full data sector. Bank data skips the short sector, so reading past sector 4
    /// continues at sector 0 of the next cylinder on the same head.
    pub fn next_data_sector(&self) -> Self {
        if self.s + 1 >= DATA_SECTORS {
            Self {
                c: self.c + 1,
                h: self.h,
                s: 0,
            }
        }
        else {
            Self {
                c: self.c,
                h: self.h,
                s: self.s + 1,
            }
        }
    }
}
