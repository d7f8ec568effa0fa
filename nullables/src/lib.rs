//! Nullable infrastructure for deterministic testing.
//!
//! The wallet provider is the one external dependency of this workspace, so
//! tests swap in [`NullProvider`]: a provider that answers from a programmed
//! script, records every call it receives, and emits change events only when
//! told to. It never prompts, signs, or touches the network.

pub mod provider;

pub use provider::NullProvider;
