//! Utility re-exports and helper macros for the Connector X controller.
//!
//! - `protocol`: bus frames, the command model and replies
//! - `queue`: the command queue between the bus and the render loop
//! - `patterns`: the pattern library
//! - `zones`: zone layout and per-zone scheduling
//! - `controllers`: the render loop, LED output and digital I/O
//! - `connection`: the bus target and its collaborators
//!
//! The `mk_static!` macro simplifies static initialization in no-std contexts.

pub mod connection;
pub mod controllers;
pub mod patterns;
pub mod protocol;
pub mod queue;
pub mod zones;

pub use connection::BusTarget;
pub use controllers::SystemController;
pub use embassy_time::*;
pub use queue::CommandQueue;

#[doc(hidden)]
pub use static_cell;

#[macro_export]
/// Initialize a no-std static cell and write the given value into it.
///
/// This macro creates a `static_cell::StaticCell` for type `$t` and initializes
/// it with `$val`, returning a mutable reference to the stored value.
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: $crate::utils::static_cell::StaticCell<$t> =
            $crate::utils::static_cell::StaticCell::new();
        STATIC_CELL.uninit().write($val)
    }};
}
