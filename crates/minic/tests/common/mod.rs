#![allow(dead_code)]

use std::sync::Once;

static INIT: Once = Once::new();

/// Route `tracing` events to the test harness; visible with `--nocapture`.
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

pub const FIB: &str = include_str!("../fixtures/fib.c");
pub const FDIV: &str = include_str!("../fixtures/fdiv.c");
