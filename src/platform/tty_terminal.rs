//! Controlling-terminal implementation of [`DialogTerminal`].
//!
//! Talks to `/dev/tty` directly so the dialog works while the calling script
//! redirects or captures its standard streams. Input runs in cbreak mode: no
//! line buffering and no echo, but Ctrl-C still raises SIGINT.

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[cfg(unix)]
use libc::{self, c_int};
use tracing::warn;

use crate::config::EnvConfig;
use crate::core::key::{needs_more_input, split_keys, Key};
use crate::core::terminal::{DialogTerminal, KeyRead};
use crate::platform::error::TerminalError;
#[cfg(unix)]
use crate::platform::restore::RestoreGuard;

pub const TTY_PATH: &str = "/dev/tty";

/// How long to wait for the rest of an escape sequence or UTF-8 character.
const ESCAPE_TIMEOUT_MS: i32 = 10;
const READ_CHUNK: usize = 64;
const MAX_KEY_BYTES: usize = 256;

#[cfg(unix)]
fn std_streams_are_terminals() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 && libc::isatty(libc::STDOUT_FILENO) == 1 }
}

#[cfg(unix)]
fn get_termios(fd: c_int) -> io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

#[cfg(unix)]
fn set_termios(fd: c_int, termios: &libc::termios) -> io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Wait until `fd` is readable. `Ok(false)` on timeout or interruption; a hung-up
/// terminal is an error.
#[cfg(unix)]
fn poll_readable(fd: c_int, timeout_ms: i32) -> io::Result<bool> {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let result = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
    if result < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err);
    }
    if result == 0 {
        return Ok(false);
    }
    if (fds.revents & libc::POLLIN) != 0 {
        return Ok(true);
    }
    Err(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("terminal poll returned revents=0x{:x}", fds.revents),
    ))
}

#[cfg(unix)]
fn read_winsize_columns(fd: c_int) -> Option<u16> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };
    (result == 0 && size.ws_col > 0).then_some(size.ws_col)
}

/// Milliseconds until `deadline`, rounded up so a poll never wakes early.
fn millis_until(deadline: Instant) -> i32 {
    let remaining = deadline.saturating_duration_since(Instant::now());
    let millis = remaining.as_nanos().div_ceil(1_000_000);
    millis.min(i32::MAX as u128) as i32
}

/// Whether the bytes read so far end mid-character or mid-sequence.
fn is_incomplete(bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(text) => needs_more_input(text),
        Err(err) => err.error_len().is_none(),
    }
}

#[cfg(unix)]
pub struct TtyTerminal {
    fd: c_int,
    owns_fd: bool,
    original_termios: Option<libc::termios>,
    pending: VecDeque<Key>,
    write_log_path: Option<PathBuf>,
    write_log_failed: bool,
    restore_guard: Option<RestoreGuard>,
}

#[cfg(unix)]
impl TtyTerminal {
    /// Open the controlling terminal. Fails with [`TerminalError::NotInteractive`]
    /// unless both standard input and standard output are terminals.
    pub fn open(config: &EnvConfig) -> Result<Self, TerminalError> {
        if !std_streams_are_terminals() {
            return Err(TerminalError::NotInteractive);
        }
        let flags = libc::O_RDWR | libc::O_NOCTTY | libc::O_CLOEXEC;
        let fd = unsafe { libc::open(c"/dev/tty".as_ptr(), flags) };
        if fd < 0 {
            return Err(TerminalError::Open {
                path: TTY_PATH,
                source: io::Error::last_os_error(),
            });
        }
        let terminal = Self::from_fd(fd, true)?;
        Ok(terminal.with_write_log(config.write_log.clone()))
    }

    /// Wrap an already-open terminal descriptor. The descriptor is closed on drop
    /// only when `owns_fd` is set.
    pub fn from_fd(fd: c_int, owns_fd: bool) -> Result<Self, TerminalError> {
        let mut terminal = Self {
            fd,
            owns_fd,
            original_termios: None,
            pending: VecDeque::new(),
            write_log_path: None,
            write_log_failed: false,
            restore_guard: None,
        };
        if unsafe { libc::isatty(fd) } != 1 {
            return Err(TerminalError::NotInteractive);
        }
        terminal.enter_cbreak()?;
        Ok(terminal)
    }

    /// Mirror every byte written to the terminal into `path`.
    pub fn with_write_log(mut self, path: Option<PathBuf>) -> Self {
        self.write_log_path = path;
        self
    }

    fn enter_cbreak(&mut self) -> Result<(), TerminalError> {
        let original =
            get_termios(self.fd).map_err(|err| TerminalError::termios("read", err))?;
        let mut cbreak = original;
        cbreak.c_lflag &= !(libc::ICANON | libc::ECHO);
        cbreak.c_cc[libc::VMIN] = 1;
        cbreak.c_cc[libc::VTIME] = 0;
        set_termios(self.fd, &cbreak).map_err(|err| TerminalError::termios("set", err))?;
        self.original_termios = Some(original);
        self.restore_guard = Some(RestoreGuard::register(self.fd, original));
        Ok(())
    }

    fn read_available(&mut self, out: &mut Vec<u8>) -> io::Result<()> {
        let mut buffer = [0u8; READ_CHUNK];
        loop {
            let read_len =
                unsafe { libc::read(self.fd, buffer.as_mut_ptr() as *mut _, buffer.len()) };
            if read_len < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
            if read_len == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "terminal closed",
                ));
            }
            out.extend_from_slice(&buffer[..read_len as usize]);
            return Ok(());
        }
    }

    /// Read one burst of input, waiting briefly for the tail of a split escape
    /// sequence or multi-byte character.
    fn read_chunk(&mut self) -> io::Result<String> {
        let mut bytes = Vec::new();
        self.read_available(&mut bytes)?;
        while bytes.len() < MAX_KEY_BYTES
            && is_incomplete(&bytes)
            && poll_readable(self.fd, ESCAPE_TIMEOUT_MS)?
        {
            self.read_available(&mut bytes)?;
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn write_fd(&self, data: &[u8]) -> io::Result<()> {
        let mut written = 0;
        while written < data.len() {
            let remaining = &data[written..];
            let result = unsafe {
                libc::write(
                    self.fd,
                    remaining.as_ptr() as *const libc::c_void,
                    remaining.len(),
                )
            };
            if result < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
            if result == 0 {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "write returned 0"));
            }
            written += result as usize;
        }
        Ok(())
    }

    fn mirror_to_log(&mut self, data: &str) {
        if self.write_log_failed {
            return;
        }
        let Some(path) = self.write_log_path.as_ref() else {
            return;
        };
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(data.as_bytes()));
        if let Err(err) = result {
            warn!(path = %path.display(), error = %err, "disabling terminal write log");
            self.write_log_failed = true;
        }
    }
}

#[cfg(unix)]
impl DialogTerminal for TtyTerminal {
    fn is_interactive(&self) -> bool {
        self.original_termios.is_some()
    }

    fn read_key(&mut self, timeout: Option<Duration>) -> io::Result<KeyRead> {
        if let Some(key) = self.pending.pop_front() {
            return Ok(KeyRead::Key(key));
        }

        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        loop {
            let wait_ms = deadline.map_or(-1, millis_until);
            if !poll_readable(self.fd, wait_ms)? {
                if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                    return Ok(KeyRead::TimedOut);
                }
                continue;
            }

            let chunk = self.read_chunk()?;
            self.pending.extend(split_keys(&chunk));
            if let Some(key) = self.pending.pop_front() {
                return Ok(KeyRead::Key(key));
            }
        }
    }

    fn write(&mut self, data: &str) {
        if data.is_empty() {
            return;
        }
        if let Err(err) = self.write_fd(data.as_bytes()) {
            warn!(error = %err, "terminal write failed");
        }
        self.mirror_to_log(data);
    }

    fn columns(&self) -> u16 {
        read_winsize_columns(self.fd).unwrap_or(80)
    }
}

#[cfg(unix)]
impl Drop for TtyTerminal {
    fn drop(&mut self) {
        if let Some(original) = self.original_termios.take() {
            // Discard unread keystrokes so they do not leak into the shell.
            unsafe {
                libc::tcflush(self.fd, libc::TCIFLUSH);
            }
            if let Err(err) = set_termios(self.fd, &original) {
                warn!(error = %err, "failed to restore terminal attributes");
            }
            let _ = self.write_fd(b"\x1b[?25h");
        }
        self.restore_guard.take();
        if self.owns_fd {
            unsafe {
                libc::close(self.fd);
            }
        }
    }
}

#[cfg(not(unix))]
pub struct TtyTerminal;

#[cfg(not(unix))]
impl TtyTerminal {
    pub fn open(_config: &EnvConfig) -> Result<Self, TerminalError> {
        Err(TerminalError::Unsupported)
    }
}

#[cfg(not(unix))]
impl DialogTerminal for TtyTerminal {
    fn is_interactive(&self) -> bool {
        false
    }

    fn read_key(&mut self, _timeout: Option<Duration>) -> io::Result<KeyRead> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "no terminal"))
    }

    fn write(&mut self, _data: &str) {}

    fn columns(&self) -> u16 {
        80
    }
}
