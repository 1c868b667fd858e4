//! Helper macros for ABI function generation.
//!
//! Provides the `abi_fn!` macro that generates `pub unsafe extern "C" fn`
//! wrappers, unmangled when the `export-symbols` feature is on.

/// Generate an ABI-compatible extern "C" function.
///
/// # Usage
///
/// ```ignore
/// abi_fn! {
///     /// Doc comment for the function.
///     fn my_func(arg1: Type1, arg2: Type2) -> ReturnType {
///         // implementation body
///     }
/// }
/// ```
///
/// This expands to a `pub unsafe extern "C" fn` with the given signature and
/// body, carrying `#[unsafe(no_mangle)]` under `export-symbols`. The body runs
/// inside an `unsafe` block; raw-pointer preconditions are the C caller's.
macro_rules! abi_fn {
    (
        $(#[$meta:meta])*
        fn $name:ident( $($arg:ident : $argty:ty),* $(,)? ) -> $ret:ty
        $body:block
    ) => {
        $(#[$meta])*
        #[cfg_attr(feature = "export-symbols", unsafe(no_mangle))]
        pub unsafe extern "C" fn $name( $($arg : $argty),* ) -> $ret {
            #[allow(unused_unsafe)]
            unsafe { $body }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use abi_fn;
