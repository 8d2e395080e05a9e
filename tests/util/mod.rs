#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Returns a socket path unique to this process and call site.
pub fn temp_sock(name: &str) -> PathBuf {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "edge-net-{}-{}-{}.sock",
        std::process::id(),
        name,
        id
    ))
}

/// Retries a non-blocking operation until it stops reporting
/// would-block, panicking after a bounded number of attempts.
pub fn retry<T>(mut f: impl FnMut() -> edge_net::Result<T>) -> T {
    for _ in 0..500 {
        match f() {
            Ok(val) => return val,
            Err(ref e) if e.is_would_block() => thread::sleep(Duration::from_millis(10)),
            Err(e) => panic!("operation failed: {}", e),
        }
    }
    panic!("operation never became ready");
}
