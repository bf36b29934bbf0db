//! Hotkey/user-interrupt collaborator (§5, §9 design note: "coroutine-free
//! hotkey polling"). The driver polls a narrow capability once per outer
//! iteration instead of depending on raw-terminal handling directly.

use std::sync::mpsc::{Receiver, TryRecvError};

/// The sentinel byte that halts a run, matching the original's single
/// "~"-key cancellation gesture.
pub const HALT_KEY: u8 = b'~';

/// Non-blocking poll for a user-requested halt. `poll` returning `true`
/// means the driver should finish the current candidate and stop.
pub trait HaltSignal {
    fn poll(&mut self) -> bool;
}

/// Used in tests and non-interactive runs; never signals a halt.
pub struct NeverHalt;

impl HaltSignal for NeverHalt {
    fn poll(&mut self) -> bool {
        false
    }
}

/// Reads single bytes from stdin on a background thread and exposes them
/// over a channel the driver drains with `try_recv`, so the main loop
/// never blocks waiting on terminal input (§5: "no suspension points
/// internal to the core").
pub struct StdinHaltSignal {
    rx: Receiver<u8>,
}

impl StdinHaltSignal {
    pub fn spawn() -> StdinHaltSignal {
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            use std::io::Read;
            let mut byte = [0u8; 1];
            let mut stdin = std::io::stdin();
            while stdin.read_exact(&mut byte).is_ok() {
                if tx.send(byte[0]).is_err() {
                    break;
                }
            }
        });
        StdinHaltSignal { rx }
    }
}

impl HaltSignal for StdinHaltSignal {
    fn poll(&mut self) -> bool {
        loop {
            match self.rx.try_recv() {
                Ok(b) if b == HALT_KEY => return true,
                Ok(_) => continue,
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_halt_always_false() {
        let mut h = NeverHalt;
        assert!(!h.poll());
        assert!(!h.poll());
    }

    #[test]
    fn channel_halt_signal_reacts_to_sentinel() {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut h = StdinHaltSignal { rx };
        assert!(!h.poll());
        tx.send(b'x').unwrap();
        tx.send(HALT_KEY).unwrap();
        assert!(h.poll());
    }
}
