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

    src/virtual_bank.rs

    Consolidation of individually saved programs into "virtual banks" of 40
    programs, so that they can be sent to the synthesizer as bank dumps.
*/
use crate::{
    config::ExtractConfig,
    directory::Directory,
    image::Sq80Image,
    io::ReadSeek,
    Sq80Result,
    BANK_SIZE,
    PROGRAMS_PER_BANK,
    PROGRAM_COUNT,
    PROGRAM_SIZE,
};

/// The SQ80's default program with a blank name. Used to fill out incomplete virtual banks.
pub const INIT_PATCH: [u8; PROGRAM_SIZE] = [
    0x20, 0x20, 0x20, 0x20, 0x20, 0x20, 0x7E, 0x7E, 0x7E, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x7E, 0x7E, 0x7E, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x7E, 0x7E, 0x7E, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00,
    0x7E, 0x7E, 0x7E, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x16, 0xFF,
    0xFF, 0x80, 0x16, 0xFF, 0xFF, 0x80, 0x16, 0xFF, 0xFF, 0x80, 0x24, 0x00,
    0xFF, 0x00, 0x00, 0x00, 0x68, 0xFF, 0x7E, 0x00, 0x24, 0x00, 0xFF, 0x00,
    0x00, 0x00, 0x68, 0xFF, 0x7E, 0x00, 0x24, 0x00, 0xFF, 0x00, 0x00, 0x00,
    0x68, 0xFF, 0x7E, 0x00, 0x7E, 0x7F, 0x00, 0xFF, 0x00, 0x00, 0x00, 0x00,
    0x3C, 0x71, 0x27, 0x27, 0x8F, 0x00,
];

#[derive(Clone, Debug)]
pub struct VirtualBank {
    index: usize,
    programs: Vec<usize>,
    data: Vec<u8>,
}

impl VirtualBank {
    /// The index of this virtual bank, counting from 0.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn name(&self) -> String {
        format!("VIRTBANK{:02}", self.number())
    }

    /// The indices of the programs in this bank, counting from 0, in bank order.
    pub fn programs(&self) -> &[usize] {
        &self.programs
    }

    /// The number of slots filled with [INIT_PATCH].
    pub fn padding(&self) -> usize {
        PROGRAMS_PER_BANK - self.programs.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Accumulates program data into virtual banks. Programs are packed in the order they are pushed;
/// every 40 programs close a bank. [VirtualBankAssembler::finish] pads the last bank with
/// [INIT_PATCH] if it is incomplete.
#[derive(Default)]
pub struct VirtualBankAssembler {
    banks: Vec<VirtualBank>,
    programs: Vec<usize>,
    data: Vec<u8>,
}

impl VirtualBankAssembler {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, program: usize, data: &[u8]) {
        debug_assert_eq!(data.len(), PROGRAM_SIZE);

        if self.data.is_empty() {
            self.data.reserve(BANK_SIZE);
        }
        self.programs.push(program);
        self.data.extend_from_slice(data);

        if self.programs.len() == PROGRAMS_PER_BANK {
            self.close();
        }
    }

    fn close(&mut self) {
        let index = self.banks.len();
        log::debug!(
            "VirtualBankAssembler: Closing VIRTBANK{:02} with {} programs",
            index + 1,
            self.programs.len()
        );
        self.banks.push(VirtualBank {
            index,
            programs: std::mem::take(&mut self.programs),
            data: std::mem::take(&mut self.data),
        });
    }

    pub fn finish(mut self) -> Vec<VirtualBank> {
        if !self.programs.is_empty() {
            for _ in self.programs.len()..PROGRAMS_PER_BANK {
                self.data.extend_from_slice(&INIT_PATCH);
            }
            self.close();
        }
        self.banks
    }
}

/// Read every defined program on the disk and assemble them into virtual banks. Empty program slots
/// are skipped, not preserved as gaps.
pub fn assemble_virtual_banks<RS: ReadSeek>(
    image: &mut Sq80Image<RS>,
    directory: &Directory,
    config: &ExtractConfig,
) -> Sq80Result<Vec<VirtualBank>> {
    let mut assembler = VirtualBankAssembler::new();

    for program in 0..PROGRAM_COUNT {
        if directory.program(program, config.include_deleted).is_none() {
            continue;
        }
        let data = image.read_program(directory, program, config)?;
        assembler.push(program, &data);
    }

    Ok(assembler.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_program(n: usize) -> Vec<u8> {
        vec![n as u8; PROGRAM_SIZE]
    }

    #[test]
    fn init_patch_has_blank_name() {
        assert_eq!(&INIT_PATCH[..6], b"      ");
    }

    #[test]
    fn forty_five_programs_make_two_banks() {
        let mut assembler = VirtualBankAssembler::new();
        for p in 0..45 {
            assembler.push(p * 2, &fake_program(p));
        }
        let banks = assembler.finish();
        assert_eq!(banks.len(), 2);

        assert_eq!(banks[0].programs().len(), 40);
        assert_eq!(banks[0].padding(), 0);
        assert_eq!(banks[0].data().len(), BANK_SIZE);
        assert_eq!(banks[0].data()[39 * PROGRAM_SIZE], 39);

        assert_eq!(banks[1].programs(), &[80, 82, 84, 86, 88]);
        assert_eq!(banks[1].padding(), 35);
        assert_eq!(banks[1].data().len(), BANK_SIZE);
        assert_eq!(banks[1].data()[4 * PROGRAM_SIZE], 44);
        for slot in 5..PROGRAMS_PER_BANK {
            let start = slot * PROGRAM_SIZE;
            assert_eq!(&banks[1].data()[start..start + PROGRAM_SIZE], &INIT_PATCH[..]);
        }
        assert_eq!(banks[1].name(), "VIRTBANK02");
    }

    #[test]
    fn exact_multiple_is_not_padded() {
        let mut assembler = VirtualBankAssembler::new();
        for p in 0..80 {
            assembler.push(p, &fake_program(p));
        }
        let banks = assembler.finish();
        assert_eq!(banks.len(), 2);
        assert!(banks.iter().all(|b| b.padding() == 0));
    }

    #[test]
    fn no_programs_make_no_banks() {
        assert!(VirtualBankAssembler::new().finish().is_empty());
    }

    #[test]
    fn all_programs_make_four_banks() {
        let mut assembler = VirtualBankAssembler::new();
        for p in 0..PROGRAM_COUNT {
            assembler.push(p, &fake_program(p));
        }
        let banks = assembler.finish();
        assert_eq!(banks.len(), 4);
        assert_eq!(banks[3].programs().len(), 8);
        assert_eq!(banks[3].padding(), 32);
    }
}
