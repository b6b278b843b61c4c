use anyhow::{bail, Result};

use crate::reader::Reader;

pub fn skip_whitespace(src: &mut Reader<'_>) {
    while let Some(c) = src.next() {
        if !c.is_ascii_whitespace() {
            src.unget();
            return;
        }
    }
}

// An identifier starts with a letter and continues alphanumeric. Underscores
// are not identifier characters in this language.
pub fn identifier(src: &mut Reader<'_>) -> String {
    skip_whitespace(src);
    let mut name = String::new();
    while let Some(c) = src.next() {
        let ok = if name.is_empty() {
            c.is_ascii_alphabetic()
        } else {
            c.is_ascii_alphanumeric()
        };
        if !ok {
            src.unget();
            break;
        }
        name.push(c as char);
    }
    name
}

// Returns None only when no digits were read and the stream is at end of
// file; a non-digit with no preceding digits yields Some(0) and is pushed
// back. Overflow wraps silently.
pub fn number(src: &mut Reader<'_>) -> Option<i64> {
    skip_whitespace(src);
    let mut read = false;
    let mut num: i64 = 0;
    while let Some(c) = src.next() {
        if !c.is_ascii_digit() {
            src.unget();
            return Some(num);
        }
        read = true;
        num = num.wrapping_mul(10).wrapping_add((c - b'0') as i64);
    }
    if read {
        Some(num)
    } else {
        None
    }
}

// Reads the body of a character literal, the opening `'` already consumed.
// Byte i lands in bits [i*8, i*8+7]; at most `word_size` bytes fit, after
// which the closing quote is mandatory.
pub fn character(src: &mut Reader<'_>, word_size: u64) -> Result<i64> {
    let mut value: u64 = 0;
    for i in 0..word_size {
        let Some(mut c) = src.next() else {
            bail!("unclosed char literal");
        };
        if c == b'\'' {
            return Ok(value as i64);
        }
        if c == b'*' {
            let Some(escape) = src.next() else {
                bail!("unclosed char literal");
            };
            c = match escape {
                b'0' | b'e' => 0,
                b'(' | b')' | b'*' | b'\'' | b'"' => escape,
                b't' => b'\t',
                b'n' => b'\n',
                _ => bail!("undefined escape character ‘*{}’", escape as char),
            };
        }
        value |= (c as u64) << (i * 8);
    }
    match src.next() {
        Some(b'\'') => Ok(value as i64),
        _ => bail!("unclosed char literal"),
    }
}
