//! Contains general-purpose I/O utility functions.

use std::io;
use std::io::ErrorKind;
use std::io::Read;

/// Retry function for as long as we are interrupted
pub fn retry_if_interrupted<F, O>(mut f: F) -> io::Result<O>
where
    F: FnMut() -> io::Result<O>,
{
    loop {
        match f() {
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            result => break result,
        }
    }
}

/// Fill `buf` completely from `reader`, retrying on [`ErrorKind::Interrupted`].
///
/// Returns `Ok(false)` if the reader was already at end-of-file before any byte of `buf` was
/// read (the normal, non-error way for a fixed-record-size handler to detect the end of its
/// stream). Returns `Err` with [`ErrorKind::UnexpectedEof`] if the stream ends partway through a
/// record.
pub fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        let read = retry_if_interrupted(|| reader.read(&mut buf[filled..]))?;
        if read == 0 {
            return if filled == 0 {
                Ok(false)
            } else {
                Err(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "stream ended partway through a fixed-size record",
                ))
            };
        }
        filled += read;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn test_retry_if_interrupted() {
        let mut call_count = 0;
        retry_if_interrupted(|| {
            call_count += 1;
            if call_count < 3 {
                Err(io::Error::new(ErrorKind::Interrupted, "interrupted"))
            } else {
                Ok(())
            }
        })
        .unwrap();

        expect_that!(call_count, eq(3));
    }

    #[googletest::test]
    fn test_read_exact_or_eof_full_buffer() {
        let mut data: &[u8] = &[1, 2, 3, 4];
        let mut buf = [0u8; 4];
        expect_that!(read_exact_or_eof(&mut data, &mut buf), ok(eq(true)));
        expect_that!(buf, eq([1, 2, 3, 4]));
    }

    #[googletest::test]
    fn test_read_exact_or_eof_clean_eof() {
        let mut data: &[u8] = &[];
        let mut buf = [0u8; 4];
        expect_that!(read_exact_or_eof(&mut data, &mut buf), ok(eq(false)));
    }

    #[googletest::test]
    fn test_read_exact_or_eof_partial_record() {
        let mut data: &[u8] = &[1, 2];
        let mut buf = [0u8; 4];
        let result = read_exact_or_eof(&mut data, &mut buf);
        expect_that!(result.is_err(), eq(true));
        expect_that!(result.unwrap_err().kind(), eq(ErrorKind::UnexpectedEof));
    }
}
