//! Lightweight debug logging gated by SINGULARIS_DEBUG=1.
use std::sync::OnceLock;

static ENABLED: OnceLock<bool> = OnceLock::new();

pub fn is_enabled() -> bool {
    *ENABLED.get_or_init(|| {
        matches!(
            std::env::var("SINGULARIS_DEBUG").ok().as_deref(),
            Some("1") | Some("true")
        )
    })
}

#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        if $crate::core::debug::is_enabled() {
            eprintln!("[singularis] {}", format_args!($($arg)*));
        }
    }};
}
