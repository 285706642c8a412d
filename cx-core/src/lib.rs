//! Core of the Connector X addressable-LED controller on no-std embedded platforms.
//!
//! Bytes from the central controller are decoded into [`utils::protocol::Command`]s by the
//! bus-facing ingress context, handed over through [`utils::queue::CommandQueue`], and applied by
//! the execution context that owns the zoned pattern engine and the pixel outputs.
//!
//! For a runnable host simulation, see the `cx-app/mock-mcu` crate.
#![no_std]

extern crate alloc;

pub mod config;
pub mod utils;
