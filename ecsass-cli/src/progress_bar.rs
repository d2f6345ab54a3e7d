use std::sync::{Arc, Mutex};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

#[derive(Debug)]
struct RowProgressState {
    length: u64,
    initialized: bool,
}

/// Spinner shown while a command starts up, turned into a bar counting the
/// processed table rows once their number is known.
#[derive(Debug, Clone)]
pub(crate) struct RowProgressBar {
    bar: ProgressBar,
    state: Arc<Mutex<RowProgressState>>,
}

impl RowProgressBar {
    pub fn new() -> RowProgressBar {
        let init_bar = ProgressBar::hidden();
        init_bar.set_style(ProgressStyle::default_spinner());
        init_bar.enable_steady_tick(Duration::from_millis(50));
        init_bar.set_message("Initializing...");

        Self {
            bar: init_bar,
            state: Arc::new(Mutex::new(RowProgressState {
                length: 0,
                initialized: false,
            })),
        }
    }

    pub fn show(&self) {
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear()
    }

    #[inline]
    fn init(&self) {
        let mut state = self.state.lock().unwrap();
        if state.initialized {
            return;
        }

        self.bar.set_position(0);
        if state.length == 0 {
            self.bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner} {pos}/? rows ({per_sec}) {msg}")
                    .expect("Invalid progress bar template"),
            );
        } else {
            self.bar.set_length(state.length);
            self.bar.set_style(
                ProgressStyle::default_bar()
                    .template("{wide_bar} {pos}/{len} rows [ETA {eta}]")
                    .expect("Invalid progress bar template"),
            );
        }
        state.initialized = true;
    }

    pub fn set_length(&self, length: u64) {
        let mut state = self.state.lock().unwrap();

        state.initialized = false;
        state.length = length;
    }

    pub fn inc(&self, value: u64) {
        self.init();
        self.bar.inc(value);
    }

    pub fn println<I: AsRef<str>>(&self, msg: I) {
        self.bar.println(msg);
    }
}
