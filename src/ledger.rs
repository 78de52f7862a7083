//! Credit accounting. Pure functions over balances; the caller owns the state.

use crate::{
    error::{ImaginaError, Result},
    models::ImageSize,
};

pub fn cost_of(size: ImageSize) -> u32 {
    match size {
        ImageSize::Hd => 1,
        ImageSize::TwoK => 3,
        ImageSize::FourK => 5,
    }
}

pub fn can_afford(balance: u32, size: ImageSize) -> bool {
    balance >= cost_of(size)
}

/// Removes the cost of `size` from `balance`. Refuses instead of going negative.
pub fn debit(balance: u32, size: ImageSize) -> Result<u32> {
    let required = cost_of(size);
    balance
        .checked_sub(required)
        .ok_or(ImaginaError::InsufficientCredits {
            required,
            available: balance,
        })
}

pub fn credit(balance: u32, amount: u32) -> u32 {
    balance.saturating_add(amount)
}
