#![forbid(unsafe_code)]

//! `tracing` output for browser hosts.
//!
//! A plain `fmt` subscriber without timestamps (there is no system clock on
//! `wasm32-unknown-unknown`) and without ANSI colors. Each formatted event is
//! buffered and handed to `console.log` as one line.

use tracing::level_filters::LevelFilter;

/// Parse a configured level name; unknown names fall back to `INFO`.
#[must_use]
pub fn level_filter(name: &str) -> LevelFilter {
    match name.to_ascii_lowercase().as_str() {
        "error" => LevelFilter::ERROR,
        "warn" => LevelFilter::WARN,
        "debug" => LevelFilter::DEBUG,
        "trace" => LevelFilter::TRACE,
        _ => LevelFilter::INFO,
    }
}

#[cfg(target_arch = "wasm32")]
pub use console::init;

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;

    use tracing_subscriber::fmt::MakeWriter;
    use wasm_bindgen::JsValue;

    /// Buffers one formatted event and forwards it on drop.
    pub struct ConsoleWriter {
        buf: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let line = String::from_utf8_lossy(&self.buf);
            let line = line.trim_end();
            if !line.is_empty() {
                web_sys::console::log_1(&JsValue::from_str(line));
            }
        }
    }

    #[derive(Clone, Copy, Default)]
    pub struct MakeConsoleWriter;

    impl<'a> MakeWriter<'a> for MakeConsoleWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter { buf: Vec::new() }
        }
    }

    /// Install the console subscriber. A second call (or another global
    /// subscriber already set by the embedding page) is left alone.
    pub fn init(level: &str) {
        let installed = tracing_subscriber::fmt()
            .with_writer(MakeConsoleWriter)
            .with_max_level(super::level_filter(level))
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .try_init();
        if installed.is_err() {
            tracing::debug!("tracing subscriber already installed");
        }
    }
}
