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

    src/test_support.rs

    Builders for synthetic SQ80 disk images, shared by the library and tool
    tests.
*/
use std::io::Cursor;

use crate::{
    chs::{Sq80Chs, CYLINDER_COUNT, DIRECTORY_CHS, HEAD_COUNT, TRACK_SIZE},
    directory::{BANK_RECORD_SIZE, BANK_TABLE_OFFSET, PROGRAM_TABLE_OFFSET},
    Directory,
    Sq80Error,
    Sq80Image,
    Sq80Result,
    BANK_SIZE,
    DIRECTORY_CHUNK_SIZE,
    IMAGE_HEADER_SIZE,
    IMAGE_MAGIC,
    PROGRAMS_PER_BANK,
    PROGRAM_NAME_LEN,
    PROGRAM_SIZE,
    SECTOR_SIZE,
};

pub const IMAGE_LEN: usize = IMAGE_HEADER_SIZE + CYLINDER_COUNT as usize * HEAD_COUNT as usize * TRACK_SIZE;

/// Generate recognizable program data: the name followed by bytes derived from `seed`.
pub fn program_data(seed: usize, name: &[u8; PROGRAM_NAME_LEN]) -> Vec<u8> {
    let mut data: Vec<u8> = (0..PROGRAM_SIZE).map(|i| (seed * 7 + i) as u8).collect();
    data[..PROGRAM_NAME_LEN].copy_from_slice(name);
    data
}

/// Generate a program name that is unique for `n`.
pub fn numbered_name(n: usize) -> [u8; PROGRAM_NAME_LEN] {
    let mut name = *b"PRG   ";
    let digits = format!("{:03}", n);
    name[3..6].copy_from_slice(digits.as_bytes());
    name
}

/// Builds an SQ80 disk image in memory. The first invalid address given to the builder is kept and
/// returned from [TestImageBuilder::build].
pub struct TestImageBuilder {
    buf: Vec<u8>,
    error: Option<Sq80Error>,
}

impl Default for TestImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestImageBuilder {
    pub fn new() -> Self {
        let mut buf = vec![0u8; IMAGE_LEN];
        buf[..IMAGE_HEADER_SIZE].copy_from_slice(IMAGE_MAGIC);
        Self { buf, error: None }
    }

    fn fail(&mut self, err: Sq80Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn put_chs(&mut self, chs: Sq80Chs, data: &[u8]) {
        match chs.to_offset() {
            Ok(offset) => {
                let offset = offset as usize;
                self.buf[offset..offset + data.len()].copy_from_slice(data);
            }
            Err(e) => self.fail(e),
        }
    }

    fn put_directory(&mut self, dir_offset: usize, data: &[u8]) {
        for (i, &b) in data.iter().enumerate() {
            let offset = dir_offset + i;
            let chunk = match DIRECTORY_CHS.get(offset / DIRECTORY_CHUNK_SIZE) {
                Some(chunk) => *chunk,
                None => {
                    self.fail(Sq80Error::OutOfRange(format!("directory offset {}", offset)));
                    return;
                }
            };
            match chunk.to_offset() {
                Ok(image_offset) => self.buf[image_offset as usize + offset % DIRECTORY_CHUNK_SIZE] = b,
                Err(e) => {
                    self.fail(e);
                    return;
                }
            }
        }
    }

    fn put_program(&mut self, program: usize, dir_name: &[u8; PROGRAM_NAME_LEN], data: &[u8]) {
        match Sq80Chs::from_program(program) {
            Ok(chs) => {
                self.put_directory(PROGRAM_TABLE_OFFSET + program * PROGRAM_NAME_LEN, dir_name);
                self.put_chs(chs, data);
            }
            Err(e) => self.fail(e),
        }
    }

    /// Define a bank in the directory with a raw type code.
    pub fn with_bank_type(mut self, bank: usize, type_code: u8, name: &[u8; 10]) -> Self {
        let mut record = vec![type_code];
        record.extend_from_slice(name);
        record.extend_from_slice(&(BANK_SIZE as u16).to_be_bytes());
        self.put_directory(BANK_TABLE_OFFSET + bank * BANK_RECORD_SIZE, &record);
        self
    }

    /// Define a bank and write its data. Program `i` of the bank gets `program_data(bank * 40 + i, ..)`.
    pub fn with_bank(self, bank: usize, name: &[u8; 10]) -> Self {
        let mut builder = self.with_bank_type(bank, 2, name);
        let data = Self::bank_data(bank);

        match Sq80Chs::from_bank(bank) {
            Ok(mut chs) => {
                for chunk in data.chunks(SECTOR_SIZE) {
                    builder.put_chs(chs, chunk);
                    chs = chs.next_data_sector();
                }
            }
            Err(e) => builder.fail(e),
        }
        builder
    }

    /// The data written for a bank by [TestImageBuilder::with_bank]. Its programs are named
    /// `PRG001` through `PRG040`.
    pub fn bank_data(bank: usize) -> Vec<u8> {
        (0..PROGRAMS_PER_BANK)
            .flat_map(|i| program_data(bank * PROGRAMS_PER_BANK + i, &numbered_name(i + 1)))
            .collect()
    }

    /// Define a program in the directory and write its data to disk.
    pub fn with_program(mut self, program: usize, name: &[u8; PROGRAM_NAME_LEN]) -> Self {
        self.put_program(program, name, &program_data(program, name));
        self
    }

    /// Write a program to disk, but zero the first character of its directory name, as the SQ80 does
    /// when deleting a program.
    pub fn with_deleted_program(mut self, program: usize, name: &[u8; PROGRAM_NAME_LEN]) -> Self {
        let mut dir_name = *name;
        dir_name[0] = 0;
        self.put_program(program, &dir_name, &program_data(program, name));
        self
    }

    /// Write a program whose on-disk name disagrees with the directory.
    pub fn with_mismatched_program(
        mut self,
        program: usize,
        dir_name: &[u8; PROGRAM_NAME_LEN],
        disk_name: &[u8; PROGRAM_NAME_LEN],
    ) -> Self {
        self.put_program(program, dir_name, &program_data(program, disk_name));
        self
    }

    pub fn build(self) -> Sq80Result<Vec<u8>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.buf),
        }
    }

    pub fn open(self) -> Sq80Result<Sq80Image<Cursor<Vec<u8>>>> {
        Sq80Image::open(Cursor::new(self.build()?))
    }

    /// Open the image and read its directory.
    pub fn open_with_directory(self) -> Sq80Result<(Sq80Image<Cursor<Vec<u8>>>, Directory)> {
        let mut image = self.open()?;
        let directory = image.read_directory()?;
        Ok((image, directory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_program_is_reported_on_build() {
        let result = TestImageBuilder::new().with_program(128, b"EXTRA ").build();
        assert!(matches!(result, Err(Sq80Error::OutOfRange(_))));
    }

    #[test]
    fn deleted_program_keeps_name_on_disk() {
        let (mut image, directory) = TestImageBuilder::new()
            .with_deleted_program(7, b"GHOST ")
            .open_with_directory()
            .unwrap();
        assert_eq!(directory.programs()[7], None);
        let data = image.read_chs(Sq80Chs::from_program(7).unwrap(), 6).unwrap();
        assert_eq!(&data, b"GHOST ");
    }
}
