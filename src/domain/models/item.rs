use chrono::{DateTime, Utc};

use crate::domain::{
    errors::InvariantViolation,
    value_objects::{ItemId, Price},
};

/// Maximum title length, counted in characters
pub const MAX_TITLE_LENGTH: usize = 50;

/// The item aggregate.
///
/// Fields are private so that every instance in existence has passed
/// [`Item::check`]: construction, rehydration and `update` are the only ways
/// to produce or change one.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: ItemId,
    title: String,
    description: Option<String>,
    duration_minutes: i32,
    price: Price,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Item {
    /// Create a new item stamped with the current time
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        duration_minutes: i32,
        price: Price,
    ) -> Result<Self, InvariantViolation> {
        Self::new_at(title, description, duration_minutes, price, Utc::now())
    }

    /// Create a new item with a caller-supplied creation time.
    /// Both timestamps are set to `created_at`.
    pub fn new_at(
        title: impl Into<String>,
        description: Option<String>,
        duration_minutes: i32,
        price: Price,
        created_at: DateTime<Utc>,
    ) -> Result<Self, InvariantViolation> {
        let title = title.into();
        Self::check(&title, duration_minutes, price)?;

        Ok(Self {
            id: ItemId::generate(),
            title,
            description,
            duration_minutes,
            price,
            created_at,
            updated_at: created_at,
        })
    }

    /// Rebuild an item that was previously persisted. The invariants are
    /// re-checked so a tampered row cannot yield an invalid instance.
    pub fn restore(
        id: ItemId,
        title: String,
        description: Option<String>,
        duration_minutes: i32,
        price: Price,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, InvariantViolation> {
        Self::check(&title, duration_minutes, price)?;

        Ok(Self {
            id,
            title,
            description,
            duration_minutes,
            price,
            created_at,
            updated_at,
        })
    }

    /// Replace all mutable fields at once and stamp `updated_at`.
    ///
    /// On error the item is left untouched.
    pub fn update(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
        duration_minutes: i32,
        price: Price,
        updated_at: DateTime<Utc>,
    ) -> Result<(), InvariantViolation> {
        let title = title.into();
        Self::check(&title, duration_minutes, price)?;

        self.title = title;
        self.description = description;
        self.duration_minutes = duration_minutes;
        self.price = price;
        self.updated_at = updated_at;

        Ok(())
    }

    fn check(title: &str, duration_minutes: i32, price: Price) -> Result<(), InvariantViolation> {
        if title.trim().is_empty() {
            return Err(InvariantViolation::EmptyTitle);
        }

        let length = title.chars().count();
        if length > MAX_TITLE_LENGTH {
            return Err(InvariantViolation::TitleTooLong {
                actual: length,
                max: MAX_TITLE_LENGTH,
            });
        }

        if duration_minutes <= 0 {
            return Err(InvariantViolation::NonPositiveDuration(duration_minutes));
        }

        // Zero is allowed here; the operation validators are stricter
        if price.is_negative() {
            return Err(InvariantViolation::NegativePrice(price));
        }

        Ok(())
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn duration_minutes(&self) -> i32 {
        self.duration_minutes
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
