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

    src/charset.rs

    Conversion of the Ensoniq character set to ASCII.

    The SQ80 stores names in a 7-bit encoding that is mostly ASCII, except
    that the digits and the blank character are relocated.
*/

/// Map a single SQ80 character code to its ASCII equivalent.
/// Codes without a special mapping are passed through unchanged.
pub fn sq_char_to_ascii(byte: u8) -> char {
    let mapped = match byte {
        0x00 => b'-',
        0x21 => b'0',
        0x23 => b'1',
        0x25 => b'2',
        0x28 => b'3',
        0x29 => b'4',
        0x3A => b'5',
        0x3B => b'6',
        0x5B => b'7',
        0x5C => b'8',
        0x5D => b'9',
        other => other,
    };
    mapped as char
}

/// Convert a name in the SQ80 character set to a printable string. The output has one character
/// per input byte; no trimming is performed.
pub fn sq_to_ascii(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| sq_char_to_ascii(b)).collect()
}
