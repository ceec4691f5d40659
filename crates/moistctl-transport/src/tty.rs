use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, TransportError};
use crate::pipe::BytePipe;

/// Byte pipe over a tty character device.
///
/// The device is expected to be configured (baud rate, parity, stop bits)
/// before it is handed to us, e.g. via `stty` or by the init system. This
/// type only moves bytes and answers `bytes_available` through the
/// `FIONREAD` ioctl.
pub struct TtyPipe {
    file: File,
    path: PathBuf,
}

impl TtyPipe {
    /// Open the tty device at `path` for reading and writing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| TransportError::Open {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "opened serial device");
        Ok(Self { file, path })
    }

    /// Path of the underlying device.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for TtyPipe {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for TtyPipe {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl BytePipe for TtyPipe {
    fn bytes_available(&mut self) -> std::io::Result<usize> {
        use std::os::fd::AsRawFd;

        let fd = self.file.as_raw_fd();
        let mut count: libc::c_int = 0;

        // SAFETY: `fd` is an open descriptor owned by `self.file` and
        // `count` is a valid writable int for the FIONREAD result.
        let rc = unsafe { libc::ioctl(fd, libc::FIONREAD, &mut count) };
        if rc != 0 {
            return Err(std::io::Error::last_os_error());
        }
        Ok(count.max(0) as usize)
    }
}

impl std::fmt::Debug for TtyPipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtyPipe")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_device_fails() {
        let err = TtyPipe::open("/nonexistent/ttyUSB99").unwrap_err();
        assert!(matches!(err, TransportError::Open { .. }));
    }

    #[test]
    fn bytes_available_on_a_pipe_fd() {
        // FIONREAD works on pipes as well, which is all we need to
        // exercise the ioctl path without real hardware.
        use std::os::fd::FromRawFd;

        let mut fds = [0 as libc::c_int; 2];
        // SAFETY: fds is a valid writable array of two ints.
        let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
        assert_eq!(rc, 0);

        // SAFETY: fds hold freshly created descriptors we own.
        let read_file = unsafe { File::from_raw_fd(fds[0]) };
        let mut write_file = unsafe { File::from_raw_fd(fds[1]) };

        write_file.write_all(b"abc").unwrap();
        write_file.flush().unwrap();

        let mut pipe = TtyPipe {
            file: read_file,
            path: PathBuf::from("<pipe>"),
        };
        assert_eq!(pipe.bytes_available().unwrap(), 3);

        let mut buf = [0u8; 3];
        pipe.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"abc");
        assert_eq!(pipe.bytes_available().unwrap(), 0);
    }
}
