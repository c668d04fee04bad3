//! Client-side entity store and orchestration layer of the contest
//! administration portal.
//!
//! The presentation layer consumes four things from here: the
//! per-entity [`store`] controllers, the [`modal`] orchestrator, the
//! [`breadcrumb`] resolver, and the [`session`] credential. During
//! development the [`repo`] module stands in for the REST backend
//! behind the same [`api::Backend`] seam.

pub mod api;
pub mod breadcrumb;
pub mod config;
pub mod error;
pub mod modal;
pub mod model;
pub mod repo;
pub mod session;
pub mod store;

use cfg_if::cfg_if;

/// Install the tracing subscriber: browser console on wasm, fmt
/// elsewhere. Safe to call more than once.
pub fn init_tracing() {
    cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        use tracing_subscriber::{fmt::format::Pretty, prelude::*};
        use tracing_web::{performance_layer, MakeWebConsoleWriter};

        console_error_panic_hook::set_once();

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false) // Only partially supported across browsers
            .without_time() // std::time is not available in browsers
            .with_writer(MakeWebConsoleWriter::new());
        let perf_layer =
            performance_layer().with_details_from_fields(Pretty::default());
        let _ = tracing_subscriber::registry()
            .with(fmt_layer)
            .with(perf_layer)
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt().with_target(false).try_init();
    }
    }
}
