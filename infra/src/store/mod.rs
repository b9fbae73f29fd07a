//! Per-phone state storage.

mod memory;

#[cfg(test)]
mod tests;

pub use memory::MemoryOtpStore;
