/// Log through `tracing` only when the scope is enabled in the active `LogConfig`
#[macro_export]
macro_rules! scoped_log {
    ($level:ident, $scope:expr, $($arg:tt)*) => {{
        let log_config = $crate::logging::get_log_config();
        if log_config.should_log($scope, $crate::logging::Level::$level) {
            $crate::logging::tracing::event!(
                $crate::logging::Level::$level,
                scope = $scope,
                $($arg)*
            );
        }
    }};
}

// Convenience macros for common scopes
#[macro_export]
macro_rules! grapple_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "grapple", $($arg)*)
    };
}

#[macro_export]
macro_rules! motion_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "motion", $($arg)*)
    };
}

#[macro_export]
macro_rules! physics_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "physics", $($arg)*)
    };
}

#[macro_export]
macro_rules! input_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "input", $($arg)*)
    };
}

#[macro_export]
macro_rules! render_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "render", $($arg)*)
    };
}
