//! Terminal restoration on signals and panics.
//!
//! Every open tty registers its original termios here. A fatal signal or a panic
//! restores all registered terminals and shows the cursor before the process
//! goes away, so the calling shell never inherits a terminal without echo.
//!
//! The signal listener is installed on first use and lives for the rest of the
//! process. signal-hook keeps its low-level handler installed once a signal has
//! been registered, so the listener must keep re-raising with the default
//! disposition even when no terminal is open.

use std::panic;
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::thread;

use libc::c_int;
use signal_hook::iterator::Signals;
use tracing::warn;

const RESTORE_SIGNALS: [c_int; 3] = [libc::SIGINT, libc::SIGTERM, libc::SIGHUP];

const SHOW_CURSOR: &[u8] = b"\x1b[?25h";

#[derive(Clone, Copy)]
struct RestoreTarget {
    id: u64,
    fd: c_int,
    termios: libc::termios,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    targets: Vec<RestoreTarget>,
}

static REGISTRY: Mutex<Registry> = Mutex::new(Registry {
    next_id: 0,
    targets: Vec::new(),
});

static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();
static SIGNAL_LISTENER: OnceLock<()> = OnceLock::new();

fn registry() -> MutexGuard<'static, Registry> {
    match REGISTRY.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Restore every registered terminal. Safe to call more than once.
pub(crate) fn restore_all() {
    let targets = std::mem::take(&mut registry().targets);
    for target in targets {
        unsafe {
            libc::tcsetattr(target.fd, libc::TCSANOW, &target.termios);
            // Best effort: a failed write here has nowhere to be reported.
            libc::write(
                target.fd,
                SHOW_CURSOR.as_ptr() as *const libc::c_void,
                SHOW_CURSOR.len(),
            );
        }
    }
}

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_all();
            previous(info);
        }));
    });
}

fn spawn_signal_listener() {
    let mut signals = match Signals::new(RESTORE_SIGNALS) {
        Ok(signals) => signals,
        Err(err) => {
            warn!(error = %err, "failed to register terminal restore signals");
            return;
        }
    };
    let handle = signals.handle();
    let spawned = thread::Builder::new()
        .name("timed-dialog-signals".to_string())
        .spawn(move || {
            for signal in signals.forever() {
                restore_all();
                if let Err(err) = signal_hook::low_level::emulate_default_handler(signal) {
                    warn!(signal, error = %err, "failed to re-raise signal");
                }
            }
        });
    if let Err(err) = spawned {
        // Unregisters the actions so the signals keep their previous behaviour.
        handle.close();
        warn!(error = %err, "failed to spawn terminal restore signal thread");
    }
}

fn install_signal_listener() {
    SIGNAL_LISTENER.get_or_init(spawn_signal_listener);
}

/// Keeps a terminal registered for restoration until dropped.
pub(crate) struct RestoreGuard {
    id: u64,
}

impl RestoreGuard {
    pub(crate) fn register(fd: c_int, termios: libc::termios) -> Self {
        install_panic_hook();
        install_signal_listener();
        let mut registry = registry();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.targets.push(RestoreTarget { id, fd, termios });
        Self { id }
    }
}

impl Drop for RestoreGuard {
    fn drop(&mut self) {
        registry().targets.retain(|target| target.id != self.id);
    }
}

#[cfg(test)]
pub(crate) fn is_registered(fd: c_int) -> bool {
    registry().targets.iter().any(|target| target.fd == fd)
}
