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

    src/image.rs

    Reading of SQ80 disk images: header validation, directory assembly, and
    reading of bank and program data at their computed disk locations.
*/
use binrw::{binrw, BinRead};

use crate::{
    charset::sq_to_ascii,
    chs::{Sq80Chs, BANK_SECTORS, DIRECTORY_CHS},
    config::ExtractConfig,
    directory::Directory,
    io::{ReadSeek, SeekFrom},
    util::{get_length, read_exact_at},
    Sq80Error,
    Sq80Result,
    BANK_SIZE,
    DIRECTORY_CHUNK_SIZE,
    DIRECTORY_SIZE,
    IMAGE_MAGIC,
    PROGRAM_NAME_LEN,
    PROGRAM_SIZE,
    SECTOR_SIZE,
};

#[derive(Debug)]
#[binrw]
#[brw(little)]
struct ImageHeader {
    magic: [u8; 10],
}

/// An open SQ80 disk image. The image is only ever read; every read repositions the source first.
pub struct Sq80Image<RS: ReadSeek> {
    source: RS,
    len: u64,
}

impl<RS: ReadSeek> Sq80Image<RS> {
    /// Return true if `source` begins with the SQ80 disk image header.
    pub fn detect(source: &mut RS) -> bool {
        let mut detected = false;
        _ = source.seek(SeekFrom::Start(0));

        if let Ok(header) = ImageHeader::read(source) {
            if header.magic == *IMAGE_MAGIC {
                detected = true;
            }
        }
        detected
    }

    /// Open a disk image, validating the file header.
    pub fn open(mut source: RS) -> Sq80Result<Self> {
        let len = get_length(&mut source)?;
        log::debug!("Sq80Image::open(): Image size: {} bytes", len);

        if !Self::detect(&mut source) {
            log::error!("Sq80Image::open(): SQ80 disk header not found");
            return Err(Sq80Error::InvalidImageHeader);
        }

        Ok(Self { source, len })
    }

    /// The length of the image file, in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read `len` bytes starting at the specified address.
    pub fn read_chs(&mut self, chs: Sq80Chs, len: usize) -> Sq80Result<Vec<u8>> {
        let offset = chs.to_offset()?;
        log::trace!("read_chs(): Reading {} bytes from {} at offset {:X}", len, chs, offset);
        read_exact_at(&mut self.source, offset, len)
    }

    /// Assemble and parse the disk directory.
    pub fn read_directory(&mut self) -> Sq80Result<Directory> {
        let mut buf = Vec::with_capacity(DIRECTORY_SIZE);
        for chs in DIRECTORY_CHS {
            buf.extend(self.read_chs(chs, DIRECTORY_CHUNK_SIZE)?);
        }
        Directory::parse(&buf)
    }

    /// Read the data of a bank, counting from 0. Returns [Sq80Error::EmptySlot] if the directory does not
    /// define the bank.
    ///
    /// A bank spans four data sectors. The final sector is only partially used, as 40 programs of
    /// 102 bytes do not fill 4K.
    pub fn read_bank(&mut self, directory: &Directory, bank: usize) -> Sq80Result<Vec<u8>> {
        let mut chs = Sq80Chs::from_bank(bank)?;
        if directory.bank(bank).is_none() {
            return Err(Sq80Error::EmptySlot(format!("bank {} is not defined", bank + 1)));
        }

        let mut data = Vec::with_capacity(BANK_SIZE);
        for i in 0..BANK_SECTORS as usize {
            let len = if i == BANK_SECTORS as usize - 1 {
                BANK_SIZE - SECTOR_SIZE * i
            }
            else {
                SECTOR_SIZE
            };
            data.extend(self.read_chs(chs, len)?);
            chs = chs.next_data_sector();
        }
        Ok(data)
    }

    /// Read the data of an individually saved program, counting from 0.
    ///
    /// The name stored at the start of the program data must agree with the directory. If it doesn't,
    /// the disk is corrupt (or we're reading from the wrong place) and [Sq80Error::NameMismatch] is
    /// returned.
    pub fn read_program(
        &mut self,
        directory: &Directory,
        program: usize,
        config: &ExtractConfig,
    ) -> Sq80Result<Vec<u8>> {
        let chs = Sq80Chs::from_program(program)?;
        let entry = directory
            .program(program, config.include_deleted)
            .ok_or_else(|| Sq80Error::EmptySlot(format!("program {} is blank", program + 1)))?;

        let data = self.read_chs(chs, PROGRAM_SIZE)?;

        if !entry.matches(&data[..PROGRAM_NAME_LEN]) {
            let mut disk = [0u8; PROGRAM_NAME_LEN];
            disk.copy_from_slice(&data[..PROGRAM_NAME_LEN]);
            log::error!(
                "read_program(): Program {} name on disk {:02X?} doesn't match directory {:02X?}",
                program,
                disk,
                entry.raw_name()
            );
            return Err(Sq80Error::NameMismatch {
                program: program + 1,
                disk,
                directory: *entry.raw_name(),
            });
        }

        if entry.is_deleted() {
            log::warn!(
                "read_program(): Recovered deleted program {}: {}",
                program + 1,
                sq_to_ascii(&data[..PROGRAM_NAME_LEN])
            );
        }
        Ok(data)
    }

    /// Return the names of the 40 programs stored in a bank.
    pub fn bank_program_names(&mut self, directory: &Directory, bank: usize) -> Sq80Result<Vec<String>> {
        let data = self.read_bank(directory, bank)?;
        Ok(data
            .chunks_exact(PROGRAM_SIZE)
            .map(|p| sq_to_ascii(&p[..PROGRAM_NAME_LEN]))
            .collect())
    }
}
