//! Puffin scopes for the dock's hot paths.
//!
//! Scopes are compiled in unconditionally and cost one atomic load while
//! disabled; [`apply_mode`] turns them on from a [`Config`](crate::config::Config).

pub use puffin::{profile_function, profile_scope};

use crate::config::ProfilingMode;

/// Where collected scopes are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingBackend {
    /// Serve frames to `puffin_viewer` over HTTP on [`PUFFIN_ADDR`].
    PuffinHttp,
}

#[cfg(feature = "profiling")]
pub const PUFFIN_ADDR: &str = "127.0.0.1:8585";

#[cfg(feature = "profiling")]
static SERVER: std::sync::OnceLock<puffin_http::Server> = std::sync::OnceLock::new();

/// Enable scopes and start the backend. Later calls keep the first server.
///
/// ```no_run
/// use mosaic_core::profiling::{init_profiling, ProfilingBackend};
///
/// init_profiling(ProfilingBackend::PuffinHttp);
/// ```
#[cfg(feature = "profiling")]
pub fn init_profiling(backend: ProfilingBackend) {
    puffin::set_scopes_on(true);
    match backend {
        ProfilingBackend::PuffinHttp => {
            if SERVER.get().is_some() {
                return;
            }
            match puffin_http::Server::new(PUFFIN_ADDR) {
                Ok(server) => {
                    tracing::info!(addr = PUFFIN_ADDR, "puffin server listening");
                    let _ = SERVER.set(server);
                }
                Err(err) => {
                    tracing::error!(addr = PUFFIN_ADDR, %err, "puffin server failed to start")
                }
            }
        }
    }
}

/// Apply a [`ProfilingMode`] from configuration.
pub fn apply_mode(mode: ProfilingMode) {
    match mode {
        ProfilingMode::Off => puffin::set_scopes_on(false),
        ProfilingMode::On => puffin::set_scopes_on(true),
        #[cfg(feature = "profiling")]
        ProfilingMode::WithWebserver => init_profiling(ProfilingBackend::PuffinHttp),
        #[cfg(not(feature = "profiling"))]
        ProfilingMode::WithWebserver => {
            tracing::warn!("puffin webserver requested without the `profiling` feature");
            puffin::set_scopes_on(true);
        }
    }
}

pub fn is_enabled() -> bool {
    puffin::are_scopes_on()
}

/// Close the current profiler frame. Called once per dock frame.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}
