//! Gas accounting for system operations.

use crate::BurnError;
use derive_more::Display;

/// The phase of block processing a system operation runs in. Carried for tracing only.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TracingScenario {
    /// Before any transaction of the block is executed.
    #[display("before_evm")]
    BeforeEvm,
    /// Inside a transaction.
    #[display("during_evm")]
    DuringEvm,
    /// After all transactions of the block are executed.
    #[display("after_evm")]
    AfterEvm,
}

/// Meters gas consumed by system operations.
#[auto_impl::auto_impl(&mut, Box)]
pub trait Burner {
    /// Total gas burnt so far.
    fn burned(&self) -> u64;

    /// Burns `amount` gas.
    fn burn(&mut self, amount: u64) -> Result<(), BurnError>;
}

/// A [`Burner`] with an optional gas limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemBurner {
    gas_burnt: u64,
    gas_limit: Option<u64>,
}

impl SystemBurner {
    /// Creates a burner that refuses to burn more than `gas_limit` in total.
    pub const fn new(gas_limit: u64) -> Self {
        Self { gas_burnt: 0, gas_limit: Some(gas_limit) }
    }

    /// Creates a burner without a limit.
    pub const fn unlimited() -> Self {
        Self { gas_burnt: 0, gas_limit: None }
    }

    /// Gas left before the limit, or `None` for an unlimited burner.
    pub const fn gas_left(&self) -> Option<u64> {
        match self.gas_limit {
            Some(limit) => Some(limit.saturating_sub(self.gas_burnt)),
            None => None,
        }
    }
}

impl Burner for SystemBurner {
    fn burned(&self) -> u64 {
        self.gas_burnt
    }

    fn burn(&mut self, amount: u64) -> Result<(), BurnError> {
        let remaining = self.gas_left().unwrap_or(u64::MAX.saturating_sub(self.gas_burnt));
        if amount > remaining {
            return Err(BurnError::OutOfGas { requested: amount, remaining });
        }
        self.gas_burnt += amount;
        Ok(())
    }
}
