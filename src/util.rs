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
*/
use crate::{
    io::{Read, Seek, SeekFrom},
    Sq80Error,
    Sq80Result,
};

pub(crate) fn get_length<T: Seek>(source: &mut T) -> Result<u64, crate::io::Error> {
    // Seek to the end of the source
    let length = source.seek(SeekFrom::End(0))?;
    // Seek back to the beginning of the source
    source.seek(SeekFrom::Start(0))?;
    Ok(length)
}

/// Read exactly `len` bytes from `source` starting at `offset`.
/// The source is always repositioned first; no assumption is made about the current position.
/// A read that returns fewer than `len` bytes is a [Sq80Error::TruncatedRead].
pub fn read_exact_at<T: Read + Seek>(source: &mut T, offset: u64, len: usize) -> Sq80Result<Vec<u8>> {
    source.seek(SeekFrom::Start(offset))?;

    let mut buf = Vec::with_capacity(len);
    let actual = source.by_ref().take(len as u64).read_to_end(&mut buf)?;

    if actual != len {
        log::error!(
            "read_exact_at(): Short read at offset {:X}: expected {} got {}",
            offset,
            len,
            actual
        );
        return Err(Sq80Error::TruncatedRead {
            offset,
            expected: len,
            actual,
        });
    }
    Ok(buf)
}

/// Trim trailing blanks and dots from a name, for use in output file names.
pub fn trim_name(name: &str) -> &str {
    name.trim_end_matches([' ', '.'])
}
