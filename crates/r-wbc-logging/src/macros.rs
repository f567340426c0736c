//! ---
//! wbc_section: "03-logging"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Structured logging adapters and sinks."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
/// Emit an informational log enriched with R-WBC command context.
#[macro_export]
macro_rules! wbc_info {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::INFO,
            limb = ctx.limb.unwrap_or(""),
            side = ctx.side.unwrap_or(""),
            message_id = ctx.message_id.unwrap_or_default(),
            command = ctx.command.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        let ctx = &$crate::LogContext::default();
        tracing::event!(
            tracing::Level::INFO,
            limb = ctx.limb.unwrap_or(""),
            side = ctx.side.unwrap_or(""),
            message_id = ctx.message_id.unwrap_or_default(),
            command = ctx.command.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit a debug log enriched with R-WBC command context.
#[macro_export]
macro_rules! wbc_debug {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::DEBUG,
            limb = ctx.limb.unwrap_or(""),
            side = ctx.side.unwrap_or(""),
            message_id = ctx.message_id.unwrap_or_default(),
            command = ctx.command.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        let ctx = &$crate::LogContext::default();
        tracing::event!(
            tracing::Level::DEBUG,
            limb = ctx.limb.unwrap_or(""),
            side = ctx.side.unwrap_or(""),
            message_id = ctx.message_id.unwrap_or_default(),
            command = ctx.command.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit a warning log enriched with R-WBC command context.
#[macro_export]
macro_rules! wbc_warn {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::WARN,
            limb = ctx.limb.unwrap_or(""),
            side = ctx.side.unwrap_or(""),
            message_id = ctx.message_id.unwrap_or_default(),
            command = ctx.command.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        let ctx = &$crate::LogContext::default();
        tracing::event!(
            tracing::Level::WARN,
            limb = ctx.limb.unwrap_or(""),
            side = ctx.side.unwrap_or(""),
            message_id = ctx.message_id.unwrap_or_default(),
            command = ctx.command.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit an error log enriched with R-WBC command context.
#[macro_export]
macro_rules! wbc_error {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::ERROR,
            limb = ctx.limb.unwrap_or(""),
            side = ctx.side.unwrap_or(""),
            message_id = ctx.message_id.unwrap_or_default(),
            command = ctx.command.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        let ctx = &$crate::LogContext::default();
        tracing::event!(
            tracing::Level::ERROR,
            limb = ctx.limb.unwrap_or(""),
            side = ctx.side.unwrap_or(""),
            message_id = ctx.message_id.unwrap_or_default(),
            command = ctx.command.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}
