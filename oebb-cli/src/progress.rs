//! Terminal spinner shown while requests are in flight.

use std::io::{self, IsTerminal, Stderr, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;

const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
const TICK: Duration = Duration::from_millis(50);

const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Line drawn for a given tick.
pub fn frame(prefix: &str, tick: usize) -> String {
    format!("\r{prefix}{}", FRAMES[tick % FRAMES.len()])
}

struct State<W> {
    out: W,
    stopped: bool,
}

/// A spinner animating on its own task until dropped.
///
/// Dropping it clears the line and restores the cursor, so a cancelled
/// search leaves the terminal clean.
pub struct Spinner<W: Write + Send + 'static> {
    state: Arc<Mutex<State<W>>>,
    task: JoinHandle<()>,
}

impl Spinner<Stderr> {
    /// Start a spinner on stderr, or nothing when stderr is not a terminal.
    pub fn stderr(prefix: &str) -> Option<Self> {
        let err = io::stderr();
        err.is_terminal().then(|| Self::start(prefix, err))
    }
}

impl<W: Write + Send + 'static> Spinner<W> {
    /// Start animating on `out`.
    pub fn start(prefix: &str, mut out: W) -> Self {
        let _ = write!(out, "{HIDE_CURSOR}");
        let state = Arc::new(Mutex::new(State {
            out,
            stopped: false,
        }));

        let prefix = prefix.to_string();
        let shared = Arc::clone(&state);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            for tick in 0.. {
                interval.tick().await;
                let mut state = lock(&shared);
                if state.stopped {
                    break;
                }
                let _ = write!(state.out, "{}", frame(&prefix, tick));
                let _ = state.out.flush();
            }
        });

        Self { state, task }
    }
}

impl<W: Write + Send + 'static> Drop for Spinner<W> {
    fn drop(&mut self) {
        self.task.abort();
        let mut state = lock(&self.state);
        state.stopped = true;
        let _ = write!(state.out, "{CLEAR_LINE}{SHOW_CURSOR}");
        let _ = state.out.flush();
    }
}

fn lock<W>(state: &Mutex<State<W>>) -> MutexGuard<'_, State<W>> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn frames_cycle() {
        assert_eq!(frame("Searching ", 0), "\rSearching |");
        assert_eq!(frame("Searching ", 1), "\rSearching /");
        assert_eq!(frame("Searching ", 3), "\rSearching \\");
        assert_eq!(frame("Searching ", 4), "\rSearching |");
    }

    #[tokio::test]
    async fn animates_then_cleans_up() {
        let buf = SharedBuf::default();
        let spinner = Spinner::start("Searching for connections ", buf.clone());

        tokio::time::sleep(Duration::from_millis(180)).await;
        drop(spinner);

        let out = buf.contents();
        assert!(out.starts_with(HIDE_CURSOR));
        assert!(out.contains("\rSearching for connections |"));
        assert!(out.contains("\rSearching for connections /"));
        assert!(out.ends_with(&format!("{CLEAR_LINE}{SHOW_CURSOR}")));
    }

    #[tokio::test]
    async fn silent_after_drop() {
        let buf = SharedBuf::default();
        drop(Spinner::start("x ", buf.clone()));
        let len = buf.contents().len();

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(buf.contents().len(), len);
    }
}
