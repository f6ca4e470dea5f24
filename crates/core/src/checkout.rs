//! Cart arithmetic for ticket checkout.
//!
//! All money is held in integer cents. Rates are percentages and every
//! derived amount (per-line tax, fee, percentage reduction) is rounded
//! half away from zero on its own before being summed.

use serde::{Deserialize, Serialize};

use crate::types::{Cents, DbId, Timestamp};

/// Fixed part of the service fee, in cents.
pub const DEFAULT_FEE_FIXED_CENTS: Cents = 100;

/// Percentage part of the service fee.
pub const DEFAULT_FEE_PERCENT: f64 = 2.5;

/// Tickets a single order may hold, across all lines.
pub const MAX_TICKETS_PER_ORDER: i64 = 1_000;

/// Ceiling on an order subtotal, in cents. Keeps tax, fee and total well
/// inside `i64`.
pub const MAX_ORDER_CENTS: Cents = 100_000_000_000;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Why a cart mutation or promo application was refused. The cart is left
/// unchanged whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CartError {
    #[error("Ticket type {0} is not available for this event")]
    UnknownTicketType(DbId),

    #[error("Quantity cannot be negative")]
    NegativeQuantity,

    #[error("'{ticket}' is not on sale")]
    NotOnSale { ticket: String },

    #[error("'{ticket}' must be bought by at least {minimum}")]
    BelowMinimum { ticket: String, minimum: i64 },

    #[error("'{ticket}' is limited to {maximum} per order")]
    AboveMaximum { ticket: String, maximum: i64 },

    #[error("Only {remaining} '{ticket}' left")]
    QuotaExceeded { ticket: String, remaining: i64 },

    #[error("An order holds at most {maximum} tickets")]
    TooManyTickets { maximum: i64 },

    #[error("The order amount is too large")]
    AmountTooLarge,

    #[error("The cart is empty")]
    EmptyCart,

    #[error("Promo code '{0}' is not active")]
    PromoInactive(String),

    #[error("Promo code '{0}' is not valid yet")]
    PromoNotYetValid(String),

    #[error("Promo code '{0}' has expired")]
    PromoExpired(String),

    #[error("Promo code '{0}' has been fully used")]
    PromoExhausted(String),
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// `amount * percent / 100`, rounded half away from zero.
pub fn percent_of(amount: Cents, percent: f64) -> Cents {
    (amount as f64 * percent / 100.0).round() as Cents
}

// ---------------------------------------------------------------------------
// Ticket types
// ---------------------------------------------------------------------------

/// The pricing and availability fields of a ticket type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketTypeInfo {
    pub id: DbId,
    pub name: String,
    pub price_cents: Cents,
    pub tva_applicable: bool,
    /// VAT rate in percent, e.g. `20.0`.
    pub tva_rate: f64,
    /// Total seats for sale; `None` means unlimited.
    pub quota: Option<i64>,
    pub sold: i64,
    pub minimum_achat: i64,
    pub maximum_achat: Option<i64>,
    pub sale_start: Option<Timestamp>,
    pub sale_end: Option<Timestamp>,
    pub active: bool,
}

impl TicketTypeInfo {
    /// Seats left, or `None` when the ticket type has no quota.
    pub fn remaining(&self) -> Option<i64> {
        self.quota.map(|q| (q - self.sold).max(0))
    }

    pub fn on_sale(&self, now: Timestamp) -> bool {
        self.active
            && self.sale_start.map_or(true, |start| now >= start)
            && self.sale_end.map_or(true, |end| now <= end)
    }

    /// Check `quantity` against the sale window and purchase bounds.
    /// Zero is always accepted (it removes the line).
    pub fn check_quantity(&self, quantity: i64, now: Timestamp) -> Result<(), CartError> {
        if quantity < 0 {
            return Err(CartError::NegativeQuantity);
        }
        if quantity == 0 {
            return Ok(());
        }
        if !self.on_sale(now) {
            return Err(CartError::NotOnSale {
                ticket: self.name.clone(),
            });
        }
        if quantity < self.minimum_achat {
            return Err(CartError::BelowMinimum {
                ticket: self.name.clone(),
                minimum: self.minimum_achat,
            });
        }
        if let Some(maximum) = self.maximum_achat {
            if quantity > maximum {
                return Err(CartError::AboveMaximum {
                    ticket: self.name.clone(),
                    maximum,
                });
            }
        }
        if let Some(remaining) = self.remaining() {
            if quantity > remaining {
                return Err(CartError::QuotaExceeded {
                    ticket: self.name.clone(),
                    remaining,
                });
            }
        }
        if quantity > MAX_TICKETS_PER_ORDER {
            return Err(CartError::TooManyTickets {
                maximum: MAX_TICKETS_PER_ORDER,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fees
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub fixed_cents: Cents,
    pub percent: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            fixed_cents: DEFAULT_FEE_FIXED_CENTS,
            percent: DEFAULT_FEE_PERCENT,
        }
    }
}

impl FeeSchedule {
    /// Service fee for a subtotal. Free carts pay no fee.
    pub fn fee(&self, subtotal: Cents) -> Cents {
        if subtotal <= 0 {
            return 0;
        }
        self.fixed_cents + percent_of(subtotal, self.percent)
    }
}

// ---------------------------------------------------------------------------
// Promo codes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromoKind {
    Percentage,
    Fixed,
}

impl PromoKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "percentage" => Some(Self::Percentage),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

/// A discount code. `value` is a percentage for [`PromoKind::Percentage`]
/// and an amount in cents for [`PromoKind::Fixed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    pub kind: PromoKind,
    pub value: f64,
    pub active: bool,
    pub valid_from: Option<Timestamp>,
    pub valid_until: Option<Timestamp>,
    pub max_uses: Option<i64>,
    pub uses: i64,
}

/// Codes are matched case-insensitively and stored upper-case.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

impl PromoCode {
    pub fn check(&self, now: Timestamp) -> Result<(), CartError> {
        if !self.active {
            return Err(CartError::PromoInactive(self.code.clone()));
        }
        if self.valid_from.is_some_and(|from| now < from) {
            return Err(CartError::PromoNotYetValid(self.code.clone()));
        }
        if self.valid_until.is_some_and(|until| now > until) {
            return Err(CartError::PromoExpired(self.code.clone()));
        }
        if self.max_uses.is_some_and(|max| self.uses >= max) {
            return Err(CartError::PromoExhausted(self.code.clone()));
        }
        Ok(())
    }

    /// Amount taken off `subtotal`, never more than the subtotal itself.
    pub fn reduction(&self, subtotal: Cents) -> Cents {
        let raw = match self.kind {
            PromoKind::Percentage => percent_of(subtotal, self.value),
            PromoKind::Fixed => self.value.round() as Cents,
        };
        raw.clamp(0, subtotal.max(0))
    }
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub ticket: TicketTypeInfo,
    pub quantity: i64,
}

impl CartLine {
    /// `None` when price times quantity does not fit in cents.
    fn checked_subtotal(&self) -> Option<Cents> {
        self.ticket.price_cents.checked_mul(self.quantity)
    }

    pub fn subtotal(&self) -> Cents {
        self.ticket.price_cents * self.quantity
    }

    pub fn tax(&self) -> Cents {
        if self.ticket.tva_applicable {
            percent_of(self.subtotal(), self.ticket.tva_rate)
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Cents,
    pub tax: Cents,
    pub fee: Cents,
    pub reduction: Cents,
    pub total: Cents,
}

/// Ticket lines in the order they were first added.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from requested `(ticket_type_id, quantity)` pairs.
    /// Repeated ids are summed before the bounds are checked.
    pub fn from_items(
        tickets: &[TicketTypeInfo],
        items: &[(DbId, i64)],
        now: Timestamp,
    ) -> Result<Self, CartError> {
        let mut wanted: Vec<(DbId, i64)> = Vec::new();
        for &(id, quantity) in items {
            if quantity < 0 {
                return Err(CartError::NegativeQuantity);
            }
            match wanted.iter_mut().find(|(seen, _)| *seen == id) {
                Some((_, total)) => *total = total.saturating_add(quantity),
                None => wanted.push((id, quantity)),
            }
        }

        let mut cart = Self::new();
        for (id, quantity) in wanted {
            let ticket = tickets
                .iter()
                .find(|t| t.id == id)
                .ok_or(CartError::UnknownTicketType(id))?;
            cart.set_quantity(ticket, quantity, now)?;
        }
        Ok(cart)
    }

    /// Set the quantity of a ticket type. Zero removes the line.
    pub fn set_quantity(
        &mut self,
        ticket: &TicketTypeInfo,
        quantity: i64,
        now: Timestamp,
    ) -> Result<(), CartError> {
        ticket.check_quantity(quantity, now)?;

        let position = self.lines.iter().position(|l| l.ticket.id == ticket.id);
        let line = CartLine {
            ticket: ticket.clone(),
            quantity,
        };
        self.check_limits(position, &line)?;

        match (position, quantity) {
            (Some(i), 0) => {
                self.lines.remove(i);
            }
            (Some(i), _) => self.lines[i] = line,
            (None, 0) => {}
            (None, _) => self.lines.push(line),
        }
        Ok(())
    }

    /// Ticket count and subtotal the cart would have with `line` in place
    /// of the line at `replacing`.
    fn check_limits(&self, replacing: Option<usize>, line: &CartLine) -> Result<(), CartError> {
        let others = self
            .lines
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != replacing)
            .map(|(_, l)| l);

        let mut count = line.quantity;
        let mut subtotal = line.checked_subtotal().ok_or(CartError::AmountTooLarge)?;
        for other in others {
            count += other.quantity;
            subtotal = other
                .checked_subtotal()
                .and_then(|amount| subtotal.checked_add(amount))
                .ok_or(CartError::AmountTooLarge)?;
        }

        if count > MAX_TICKETS_PER_ORDER {
            return Err(CartError::TooManyTickets {
                maximum: MAX_TICKETS_PER_ORDER,
            });
        }
        if subtotal > MAX_ORDER_CENTS {
            return Err(CartError::AmountTooLarge);
        }
        Ok(())
    }

    pub fn quantity(&self, ticket_id: DbId) -> i64 {
        self.lines
            .iter()
            .find(|l| l.ticket.id == ticket_id)
            .map_or(0, |l| l.quantity)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn ticket_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn subtotal(&self) -> Cents {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn tax(&self) -> Cents {
        self.lines.iter().map(CartLine::tax).sum()
    }

    pub fn totals(&self, fees: &FeeSchedule, promo: Option<&PromoCode>) -> CartTotals {
        let subtotal = self.subtotal();
        let tax = self.tax();
        let fee = fees.fee(subtotal);
        let reduction = promo.map_or(0, |p| p.reduction(subtotal));
        CartTotals {
            subtotal,
            tax,
            fee,
            reduction,
            total: (subtotal + tax + fee - reduction).max(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
