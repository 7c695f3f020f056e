// Macros file - tracing macros are imported within the macro definitions

/// Standardized logging macros for consistent field names and message patterns
///
/// These macros ensure:
/// - Consistent field naming conventions
/// - Appropriate logging levels for different scenarios
/// - Structured logging with context

// ============================================================================
// Service Layer Logging Macros
// ============================================================================

/// Log service operation start with context
#[macro_export]
macro_rules! log_service_start {
    ($service:expr, $operation:expr, resource = $resource:expr) => {
        tracing::info!(
            service = $service,
            operation = $operation,
            resource = %$resource,
            "Service operation started"
        );
    };
}

/// Log service operation success
#[macro_export]
macro_rules! log_service_success {
    ($service:expr, $operation:expr, card_count = $count:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            service = $service,
            operation = $operation,
            card_count = $count,
            duration_ms = $duration,
            "Service operation completed successfully"
        );
    };
    ($service:expr, $operation:expr, $msg:expr) => {
        tracing::info!(
            service = $service,
            operation = $operation,
            "Service operation completed: {}", $msg
        );
    };
}

/// Log service operation errors
#[macro_export]
macro_rules! log_service_error {
    ($service:expr, $operation:expr, kind = $kind:expr, error = $error:expr) => {
        tracing::error!(
            service = $service,
            operation = $operation,
            kind = ?$kind,
            error = %$error,
            "Service operation failed"
        );
    };
}

/// Log service warnings
#[macro_export]
macro_rules! log_service_warn {
    ($service:expr, $operation:expr, $msg:expr) => {
        tracing::warn!(
            service = $service,
            operation = $operation,
            "Service warning: {}",
            $msg
        );
    };
}

// ============================================================================
// Session Logging Macros
// ============================================================================

/// Log session state changes driven by user commands
#[macro_export]
macro_rules! log_session_event {
    (navigate, direction = $direction:expr, cursor = $cursor:expr, visible = $visible:expr) => {
        tracing::debug!(
            component = "session",
            event_type = "navigate",
            direction = $direction,
            cursor = $cursor,
            visible_count = $visible,
            "Session event: cursor moved"
        );
    };
    (category, category = $category:expr, visible = $visible:expr) => {
        tracing::info!(
            component = "session",
            event_type = "category",
            category = %$category,
            visible_count = $visible,
            "Session event: category selected"
        );
    };
    (speech, language = $language:expr, rate = $rate:expr) => {
        tracing::debug!(
            component = "session",
            event_type = "speech",
            language = $language,
            rate = $rate,
            "Session event: speech requested"
        );
    };
    (skipped, $operation:expr, $msg:expr) => {
        tracing::debug!(
            component = "session",
            event_type = "skipped",
            operation = $operation,
            "Session event skipped: {}", $msg
        );
    };
}

// ============================================================================
// System Event Logging Macros
// ============================================================================

/// Log system startup and shutdown events
#[macro_export]
macro_rules! log_system_event {
    (startup, component = $component:expr, $msg:expr) => {
        tracing::info!(
            event_type = "startup",
            component = $component,
            "System event: {}",
            $msg
        );
    };
    (shutdown, component = $component:expr, $msg:expr) => {
        tracing::info!(
            event_type = "shutdown",
            component = $component,
            "System event: {}",
            $msg
        );
    };
    (config, $msg:expr) => {
        tracing::info!(event_type = "configuration", "System event: {}", $msg);
    };
}

// ============================================================================
// Validation Logging Macros
// ============================================================================

/// Log validation results consistently
#[macro_export]
macro_rules! log_validation {
    (success, $component:expr, $msg:expr) => {
        tracing::debug!(
            event_type = "validation",
            component = $component,
            result = "success",
            "Validation completed: {}", $msg
        );
    };
    (failure, $component:expr, error = $error:expr) => {
        tracing::warn!(
            event_type = "validation",
            component = $component,
            result = "failure",
            error = %$error,
            "Validation failed"
        );
    };
}
