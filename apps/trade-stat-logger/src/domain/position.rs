//! Average-cost position ledger for a single security.
//!
//! A position is two numbers: signed `shares` and signed `cost_basis`. While
//! shares are non-zero, `cost_basis / shares` is the volume-weighted entry
//! price of the open direction. Trades that add to the open direction only
//! grow both numbers. Trades against it realize profit on the reduced shares
//! at the current average price, leaving the average of any remainder
//! untouched. A trade that crosses zero closes the old leg completely and
//! opens the new leg at the trade price alone.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Shares and average entry price of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    /// Signed share count (positive = long, negative = short).
    pub shares: Decimal,
    /// Average entry price, zero when flat.
    pub average_price: Decimal,
}

impl PositionSnapshot {
    /// Returns true if no shares are held.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.shares.is_zero()
    }
}

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionDirection {
    /// Positive shares.
    Long,
    /// Negative shares.
    Short,
    /// No shares.
    Flat,
}

/// Position ledger for one security.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    shares: Decimal,
    cost_basis: Decimal,
}

impl Position {
    /// Open a position with `shares` (signed) at `price`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `price` is not strictly positive or the
    /// cost basis does not fit in a `Decimal`.
    pub fn open(shares: Decimal, price: Decimal) -> Result<Self, LedgerError> {
        validate_price(price)?;
        Ok(Self {
            shares,
            cost_basis: checked(shares.checked_mul(price), "cost_basis")?,
        })
    }

    /// Rebuild a position from persisted parts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the cost basis sign disagrees with the share
    /// sign, or a flat position carries a basis.
    pub fn from_parts(shares: Decimal, cost_basis: Decimal) -> Result<Self, LedgerError> {
        let consistent = if shares.is_zero() {
            cost_basis.is_zero()
        } else {
            cost_basis.is_sign_positive() == shares.is_sign_positive() && !cost_basis.is_zero()
        };
        if !consistent {
            return Err(LedgerError::invalid_input(
                "cost_basis",
                format!("cost basis {cost_basis} is inconsistent with {shares} shares"),
            ));
        }
        Ok(Self { shares, cost_basis })
    }

    /// Signed share count.
    #[must_use]
    pub const fn shares(&self) -> Decimal {
        self.shares
    }

    /// Signed cost basis.
    #[must_use]
    pub const fn cost_basis(&self) -> Decimal {
        self.cost_basis
    }

    /// Average entry price, zero when flat.
    #[must_use]
    pub fn average_price(&self) -> Decimal {
        if self.shares.is_zero() {
            Decimal::ZERO
        } else {
            self.cost_basis / self.shares
        }
    }

    /// Current direction.
    #[must_use]
    pub fn direction(&self) -> PositionDirection {
        if self.shares > Decimal::ZERO {
            PositionDirection::Long
        } else if self.shares < Decimal::ZERO {
            PositionDirection::Short
        } else {
            PositionDirection::Flat
        }
    }

    /// Returns true while shares are held in either direction.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.shares.is_zero()
    }

    /// Shares and average price.
    #[must_use]
    pub fn snapshot(&self) -> PositionSnapshot {
        PositionSnapshot {
            shares: self.shares,
            average_price: self.average_price(),
        }
    }

    /// Buy `quantity` shares at `price`.
    ///
    /// Returns the realized profit when the buy covers a short, `None` when
    /// it opens or extends a long.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a negative quantity, a non-positive price,
    /// or amounts that overflow a `Decimal`. The position is unchanged on
    /// error.
    pub fn buy(&mut self, quantity: Decimal, price: Decimal) -> Result<Option<Decimal>, LedgerError> {
        validate_trade(quantity, price)?;
        if quantity.is_zero() {
            return Ok(None);
        }
        if self.shares >= Decimal::ZERO {
            self.extend(quantity, price)?;
            return Ok(None);
        }
        self.reduce(quantity, price).map(Some)
    }

    /// Sell `quantity` shares at `price`.
    ///
    /// Returns the realized profit when the sell reduces a long, `None` when
    /// it opens or extends a short.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a negative quantity, a non-positive price,
    /// or amounts that overflow a `Decimal`. The position is unchanged on
    /// error.
    pub fn sell(&mut self, quantity: Decimal, price: Decimal) -> Result<Option<Decimal>, LedgerError> {
        validate_trade(quantity, price)?;
        if quantity.is_zero() {
            return Ok(None);
        }
        if self.shares <= Decimal::ZERO {
            self.extend(-quantity, price)?;
            return Ok(None);
        }
        self.reduce(-quantity, price).map(Some)
    }

    /// Apply a signed trade: negative `shares` sell, otherwise buy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a non-positive price or an overflowing
    /// amount.
    pub fn trade(&mut self, shares: Decimal, price: Decimal) -> Result<Option<Decimal>, LedgerError> {
        if shares < Decimal::ZERO {
            self.sell(shares.abs(), price)
        } else {
            self.buy(shares, price)
        }
    }

    /// Close the whole position at `price`.
    ///
    /// A flat position is left alone and yields `None`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a non-positive price.
    pub fn close(&mut self, price: Decimal) -> Result<Option<Decimal>, LedgerError> {
        validate_price(price)?;
        let quantity = self.shares.abs();
        match self.direction() {
            PositionDirection::Long => self.sell(quantity, price),
            PositionDirection::Short => self.buy(quantity, price),
            PositionDirection::Flat => Ok(None),
        }
    }

    /// Add signed `delta` shares in the direction already held.
    fn extend(&mut self, delta: Decimal, price: Decimal) -> Result<(), LedgerError> {
        let shares = checked(self.shares.checked_add(delta), "quantity")?;
        let cost_basis = checked(
            delta
                .checked_mul(price)
                .and_then(|cost| self.cost_basis.checked_add(cost)),
            "cost_basis",
        )?;
        self.shares = shares;
        self.cost_basis = cost_basis;
        Ok(())
    }

    /// Apply signed `delta` against the open direction and return the
    /// realized profit on the closed shares.
    fn reduce(&mut self, delta: Decimal, price: Decimal) -> Result<Decimal, LedgerError> {
        let held = self.shares.abs();
        let average = checked(self.cost_basis.checked_div(self.shares), "cost_basis")?;
        let closed = delta.abs().min(held);

        // long: (exit - entry) * closed, short: (entry - exit) * closed
        let edge = if self.shares > Decimal::ZERO {
            price.checked_sub(average)
        } else {
            average.checked_sub(price)
        };
        let profit = checked(edge.and_then(|e| e.checked_mul(closed)), "price")?;

        let remaining = checked(self.shares.checked_add(delta), "quantity")?;
        let cost_basis = if remaining.is_zero() {
            Decimal::ZERO
        } else if remaining.is_sign_positive() == self.shares.is_sign_positive() {
            checked(average.checked_mul(remaining), "cost_basis")?
        } else {
            // flipped: new leg carries only the trade price
            checked(remaining.checked_mul(price), "cost_basis")?
        };

        self.shares = remaining;
        self.cost_basis = cost_basis;
        Ok(profit)
    }
}

/// Overflowed arithmetic is rejected as invalid input.
fn checked(value: Option<Decimal>, field: &'static str) -> Result<Decimal, LedgerError> {
    value.ok_or_else(|| LedgerError::invalid_input(field, "amount overflows decimal range"))
}

fn validate_price(price: Decimal) -> Result<(), LedgerError> {
    if price <= Decimal::ZERO {
        return Err(LedgerError::invalid_input(
            "price",
            format!("must be positive, got {price}"),
        ));
    }
    Ok(())
}

fn validate_trade(quantity: Decimal, price: Decimal) -> Result<(), LedgerError> {
    if quantity < Decimal::ZERO {
        return Err(LedgerError::invalid_input(
            "quantity",
            format!("must be non-negative, got {quantity}"),
        ));
    }
    validate_price(price)
}
