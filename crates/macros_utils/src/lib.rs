//! Small declarative helpers shared by the pinger apps.

/// Collect actix handlers into a `pub fn routes(&mut ServiceConfig)`
///
/// ```ignore
/// macros_utils::routes! {
///     route start_route,
///     route stop_route,
/// }
/// ```
#[cfg(feature = "actix")]
#[macro_export]
macro_rules! routes {
    ($(route $handler:path),* $(,)?) => {
        pub fn routes(cfg: &mut $crate::__private::ServiceConfig) {
            $( cfg.service($handler); )*
        }
    };
}

#[cfg(feature = "actix")]
#[doc(hidden)]
pub mod __private {
    pub use actix_web::web::ServiceConfig;
}
