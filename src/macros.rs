/// Declares the entry unit of the final binary.
///
/// The declaration is recorded at link time, so library code can later find
/// it through [`HostRuntime`](crate::HostRuntime) without the binary passing
/// anything around. Declare at most one entry unit per binary.
///
/// # Usage
///
/// ```ignore
/// usersecrets::declare_entry_unit! {
///     user_secrets_id: "webapp-0c1b7ed3",
/// }
///
/// usersecrets::declare_entry_unit! {
///     marker_file_name: "secrets-id.json",
/// }
/// ```
#[macro_export]
macro_rules! declare_entry_unit {
    (@opt) => {
        None
    };
    (@opt $value:expr) => {
        Some($value)
    };
    (@emit [$($id:expr)?] [$($file:expr)?]) => {
        const _: () = {
            #[$crate::__private::linkme::distributed_slice($crate::unit::ENTRY_UNITS)]
            #[linkme(crate = $crate::__private::linkme)]
            #[doc(hidden)]
            static ENTRY_UNIT: $crate::unit::UnitRegistration = $crate::unit::UnitRegistration {
                name: env!("CARGO_PKG_NAME"),
                user_secrets_id: $crate::declare_entry_unit!(@opt $($id)?),
                marker_file_name: $crate::declare_entry_unit!(@opt $($file)?),
            };
        };
    };
    (
        $(user_secrets_id: $id:expr)? $(,)?
    ) => {
        $crate::declare_entry_unit!(@emit [$($id)?] []);
    };
    (
        $(user_secrets_id: $id:expr,)?
        marker_file_name: $file:expr $(,)?
    ) => {
        $crate::declare_entry_unit!(@emit [$($id)?] [$file]);
    };
}
