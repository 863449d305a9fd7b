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

    tests/extract.rs

    Reading banks and programs from synthetic disk images and dumping them.
*/
use std::io::Cursor;

use sq80disk::prelude::*;
use sq80disk::test_support::*;
use sq80disk::{BANK_SIZE, PROGRAMS_PER_BANK, PROGRAM_SIZE};

#[test]
fn test_bad_header() {
    let mut buf = TestImageBuilder::new().build().unwrap();
    buf[1..10].copy_from_slice(b"SQ80DUMP!");
    assert!(matches!(
        Sq80Image::open(Cursor::new(buf)),
        Err(Sq80Error::InvalidImageHeader)
    ));
}

#[test]
fn test_directory_listing() {
    let mut image = TestImageBuilder::new()
        .with_bank(0, b"STRINGS...")
        .with_bank(29, b"BRASS     ")
        .with_program(0, b"PIANO ")
        .with_program(127, b"ORGAN ")
        .open()
        .unwrap();

    let directory = image.read_directory().unwrap();
    let banks = directory.banks();
    assert_eq!(banks.len(), 40);
    assert_eq!(banks[0].as_deref(), Some("STRINGS..."));
    // Entry 29 straddles the boundary between the first two directory sectors.
    assert_eq!(banks[29].as_deref(), Some("BRASS     "));
    assert_eq!(banks.iter().flatten().count(), 2);

    let programs = directory.programs();
    assert_eq!(programs[0], Some(*b"PIANO "));
    assert_eq!(programs[127], Some(*b"ORGAN "));
    assert_eq!(programs.iter().flatten().count(), 2);
}

#[test]
fn test_malformed_directory() {
    let mut image = TestImageBuilder::new().with_bank_type(3, 4, b"SEQUENCE  ").open().unwrap();
    assert!(matches!(image.read_directory(), Err(Sq80Error::MalformedDirectory(_))));
}

#[test]
fn test_read_banks() {
    let mut image = TestImageBuilder::new()
        .with_bank(0, b"FIRST     ")
        .with_bank(18, b"WRAPS     ")
        .with_bank(19, b"LASTHEAD0 ")
        .with_bank(20, b"HEAD1     ")
        .with_bank(39, b"LAST      ")
        .open()
        .unwrap();
    let directory = image.read_directory().unwrap();

    for bank in [0, 18, 19, 20, 39] {
        let data = image.read_bank(&directory, bank).unwrap();
        assert_eq!(data.len(), BANK_SIZE);
        assert_eq!(data, TestImageBuilder::bank_data(bank), "bank {}", bank);
    }

    assert!(matches!(image.read_bank(&directory, 1), Err(Sq80Error::EmptySlot(_))));
    assert!(matches!(image.read_bank(&directory, 40), Err(Sq80Error::OutOfRange(_))));
}

#[test]
fn test_bank_program_names() {
    let mut image = TestImageBuilder::new().with_bank(5, b"NAMES     ").open().unwrap();
    let directory = image.read_directory().unwrap();

    let names = image.bank_program_names(&directory, 5).unwrap();
    assert_eq!(names.len(), PROGRAMS_PER_BANK);
    assert_eq!(names[0], "PRG001");
    assert_eq!(names[39], "PRG040");
}

#[test]
fn test_read_every_program() {
    let mut builder = TestImageBuilder::new();
    for p in 0..128 {
        builder = builder.with_program(p, &numbered_name(p));
    }
    let mut image = builder.open().unwrap();
    let directory = image.read_directory().unwrap();
    let config = ExtractConfig::new();

    // Every program must be found at its own location, including the irregular ones.
    for p in 0..128 {
        let data = image.read_program(&directory, p, &config).unwrap();
        assert_eq!(data, program_data(p, &numbered_name(p)), "program {}", p);
    }
}

#[test]
fn test_name_mismatch() {
    let mut image = TestImageBuilder::new()
        .with_mismatched_program(10, b"PIANO ", b"GUITAR")
        .open()
        .unwrap();
    let directory = image.read_directory().unwrap();

    match image.read_program(&directory, 10, &ExtractConfig::new()) {
        Err(Sq80Error::NameMismatch { program, disk, directory }) => {
            assert_eq!(program, 11);
            assert_eq!(&disk, b"GUITAR");
            assert_eq!(&directory, b"PIANO ");
        }
        other => panic!("expected NameMismatch, got {:?}", other.map(|d| d.len())),
    }
}

#[test]
fn test_deleted_program_recovery() {
    let mut image = TestImageBuilder::new()
        .with_program(0, b"KEEP  ")
        .with_deleted_program(1, b"GONE  ")
        .open()
        .unwrap();
    let directory = image.read_directory().unwrap();

    assert!(directory.programs()[1].is_none());
    assert!(matches!(
        image.read_program(&directory, 1, &ExtractConfig::new()),
        Err(Sq80Error::EmptySlot(_))
    ));

    let config = ExtractConfig::new().with_deleted(true);
    let data = image.read_program(&directory, 1, &config).unwrap();
    assert_eq!(&data[..6], b"GONE  ");
    assert_eq!(directory.program(1, true).unwrap().name(), "-ONE  ");
}

#[test]
fn test_virtual_banks_compact_gaps() {
    // 45 programs spread over the 128 slots with gaps.
    let slots: Vec<usize> = (0..128).filter(|p| p % 3 != 1).take(45).collect();
    let mut builder = TestImageBuilder::new();
    for &p in &slots {
        builder = builder.with_program(p, &numbered_name(p));
    }
    let mut image = builder.open().unwrap();
    let directory = image.read_directory().unwrap();

    let banks = assemble_virtual_banks(&mut image, &directory, &ExtractConfig::new()).unwrap();
    assert_eq!(banks.len(), 2);

    assert_eq!(banks[0].programs(), &slots[..40]);
    assert_eq!(banks[1].programs(), &slots[40..]);
    assert_eq!(banks[1].padding(), 35);

    let data = banks[0].data();
    assert_eq!(data.len(), BANK_SIZE);
    for (i, &p) in slots[..40].iter().enumerate() {
        let start = i * PROGRAM_SIZE;
        assert_eq!(&data[start..start + PROGRAM_SIZE], &program_data(p, &numbered_name(p))[..]);
    }

    let data = banks[1].data();
    assert_eq!(&data[5 * PROGRAM_SIZE..6 * PROGRAM_SIZE], &INIT_PATCH[..]);
    assert_eq!(&data[39 * PROGRAM_SIZE..], &INIT_PATCH[..]);
}

#[test]
fn test_virtual_banks_empty_disk() {
    let mut image = TestImageBuilder::new().open().unwrap();
    let directory = image.read_directory().unwrap();
    let banks = assemble_virtual_banks(&mut image, &directory, &ExtractConfig::new()).unwrap();
    assert!(banks.is_empty());
}

#[test]
fn test_dump_program_sysex() {
    let mut image = TestImageBuilder::new().with_program(3, b"BELLS ").open().unwrap();
    let directory = image.read_directory().unwrap();
    let data = image.read_program(&directory, 3, &ExtractConfig::new()).unwrap();

    let out_dir = tempfile::tempdir().unwrap();
    let path = out_dir.path().join("PROG004_BELLS.syx");
    let bytes = encode(&data, DumpFormat::Sysex, SysexDumpType::SingleProgram);
    write_new(&path, &bytes).unwrap();

    let written = std::fs::read(&path).unwrap();
    assert_eq!(written.len(), 5 + PROGRAM_SIZE * 2 + 1);
    assert_eq!(&written[..5], &[0xF0, 0x0F, 0x02, 0x00, 0x01]);
    // 'B' = 0x42
    assert_eq!(&written[5..7], &[0x02, 0x04]);
    assert_eq!(*written.last().unwrap(), 0xF7);

    // A second dump to the same file must fail and leave it alone.
    let other = encode(&data, DumpFormat::Binary, SysexDumpType::SingleProgram);
    assert!(matches!(write_new(&path, &other), Err(Sq80Error::AlreadyExists(_))));
    assert_eq!(std::fs::read(&path).unwrap(), written);
}

#[test]
fn test_config_rejected_before_io() {
    // Validation needs no image at all.
    let config = ExtractConfig::new().with_number(0);
    assert!(matches!(config.validate(ExtractMode::Prog), Err(Sq80Error::OutOfRange(_))));
    assert!(matches!(config.validate(ExtractMode::Bank), Err(Sq80Error::OutOfRange(_))));
}
