//! Pricing
//!
//! Line totals are derived from the selected vehicle class and the rented
//! duration. Durations are bounded: hours to `0..=11`, days to `0..=10`.

use std::fmt;

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{orders::OrderLine, vehicles::VehicleClass};

/// Maximum number of hours a single line can rent for.
pub const MAX_HOURS: u32 = 11;

/// Maximum number of days a single line can rent for.
pub const MAX_DAYS: u32 = 10;

/// Errors that can occur while converting totals to money.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// The amount no longer fits the money representation.
    #[error("amount of {0} overflows the money representation")]
    Overflow(u64),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Computes the total price for a vehicle class and duration.
///
/// Hours and days outside their bounds are clamped before the rates apply.
pub fn price(vehicle: VehicleClass, hours: u32, days: u32) -> u64 {
    let rates = vehicle.rates();

    u64::from(hours.min(MAX_HOURS)) * rates.hourly + u64::from(days.min(MAX_DAYS)) * rates.daily
}

/// Converts a whole-unit amount to money in the given currency.
///
/// # Errors
///
/// - [`TotalPriceError::Overflow`]: the amount does not fit in an `i64`.
pub fn to_money(amount: u64, currency: &'static Currency) -> Result<Money<'static, Currency>, TotalPriceError> {
    let major = i64::try_from(amount).map_err(|_err| TotalPriceError::Overflow(amount))?;

    Ok(Money::from_major(major, currency))
}

/// Calculates the summed price of a list of order lines.
///
/// An empty list totals zero.
///
/// # Errors
///
/// - [`TotalPriceError::Overflow`]: a line price does not fit the money representation.
/// - [`TotalPriceError::Money`]: wrapped money arithmetic error.
pub fn total_price<'a>(
    lines: impl IntoIterator<Item = &'a OrderLine>,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, TotalPriceError> {
    lines
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, line| {
            Ok(acc.add(to_money(line.total_price, currency)?)?)
        })
}

/// A user-visible notice raised when a duration step would leave its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundNotice {
    /// Hours are already at [`MAX_HOURS`].
    HoursAtMaximum,

    /// Hours are already zero.
    HoursAtMinimum,

    /// Days are already at [`MAX_DAYS`].
    DaysAtMaximum,

    /// Days are already zero.
    DaysAtMinimum,
}

impl fmt::Display for BoundNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundNotice::HoursAtMaximum => write!(f, "Can't be more than {MAX_HOURS} hours"),
            BoundNotice::DaysAtMaximum => write!(f, "Can't be more than {MAX_DAYS} days"),
            BoundNotice::HoursAtMinimum | BoundNotice::DaysAtMinimum => {
                write!(f, "Can't be less than 0")
            }
        }
    }
}

/// Result of stepping a duration: the new configuration and any notice to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjusted {
    /// Configuration after the step; unchanged when a notice is present.
    pub config: RentalConfig,

    /// Notice raised when the step hit a bound.
    pub notice: Option<BoundNotice>,
}

impl Adjusted {
    fn changed(config: RentalConfig) -> Self {
        Self {
            config,
            notice: None,
        }
    }

    fn blocked(config: RentalConfig, notice: BoundNotice) -> Self {
        Self {
            config,
            notice: Some(notice),
        }
    }
}

/// The selection on the configuration screen.
///
/// Values are immutable: every step returns a new configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RentalConfig {
    hours: u32,
    days: u32,
    vehicle: Option<VehicleClass>,
}

impl RentalConfig {
    /// Create a configuration, clamping hours and days to their bounds.
    pub fn new(vehicle: Option<VehicleClass>, hours: u32, days: u32) -> Self {
        Self {
            hours: hours.min(MAX_HOURS),
            days: days.min(MAX_DAYS),
            vehicle,
        }
    }

    /// Rented hours.
    pub fn hours(&self) -> u32 {
        self.hours
    }

    /// Rented days.
    pub fn days(&self) -> u32 {
        self.days
    }

    /// Selected vehicle class, if any.
    pub fn vehicle(&self) -> Option<VehicleClass> {
        self.vehicle
    }

    /// Select a vehicle class, keeping the current duration.
    #[must_use]
    pub fn with_vehicle(self, vehicle: VehicleClass) -> Self {
        Self {
            vehicle: Some(vehicle),
            ..self
        }
    }

    /// Add one hour.
    pub fn increment_hours(self) -> Adjusted {
        if self.hours >= MAX_HOURS {
            return Adjusted::blocked(self, BoundNotice::HoursAtMaximum);
        }

        Adjusted::changed(Self {
            hours: self.hours + 1,
            ..self
        })
    }

    /// Remove one hour.
    pub fn decrement_hours(self) -> Adjusted {
        match self.hours.checked_sub(1) {
            Some(hours) => Adjusted::changed(Self { hours, ..self }),
            None => Adjusted::blocked(self, BoundNotice::HoursAtMinimum),
        }
    }

    /// Add one day.
    pub fn increment_days(self) -> Adjusted {
        if self.days >= MAX_DAYS {
            return Adjusted::blocked(self, BoundNotice::DaysAtMaximum);
        }

        Adjusted::changed(Self {
            days: self.days + 1,
            ..self
        })
    }

    /// Remove one day.
    pub fn decrement_days(self) -> Adjusted {
        match self.days.checked_sub(1) {
            Some(days) => Adjusted::changed(Self { days, ..self }),
            None => Adjusted::blocked(self, BoundNotice::DaysAtMinimum),
        }
    }

    /// Charge for the hours part of the rental.
    pub fn hourly_charge(&self) -> u64 {
        self.vehicle
            .map_or(0, |vehicle| u64::from(self.hours) * vehicle.rates().hourly)
    }

    /// Charge for the days part of the rental.
    pub fn daily_charge(&self) -> u64 {
        self.vehicle
            .map_or(0, |vehicle| u64::from(self.days) * vehicle.rates().daily)
    }

    /// Total price of the configuration; zero until a vehicle is selected.
    pub fn total(&self) -> u64 {
        self.vehicle
            .map_or(0, |vehicle| price(vehicle, self.hours, self.days))
    }

    /// Whether both hours and days are zero.
    pub fn is_zero_duration(&self) -> bool {
        self.hours == 0 && self.days == 0
    }

    /// Total price as money in the given currency.
    ///
    /// # Errors
    ///
    /// - [`TotalPriceError::Overflow`]: the total does not fit the money representation.
    pub fn to_money(&self, currency: &'static Currency) -> Result<Money<'static, Currency>, TotalPriceError> {
        to_money(self.total(), currency)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::orders::OrderId;

    use super::*;

    fn order_line(id: i64, total_price: u64) -> OrderLine {
        OrderLine {
            id: OrderId::new(id),
            hours: 1,
            days: 0,
            vehicle: Some(VehicleClass::A),
            total_price,
            date: date(2026, 10, 16),
            time: time(9, 0, 0, 0),
            owner_email: None,
        }
    }

    #[test]
    fn price_matches_closed_form_for_every_valid_input() {
        for vehicle in VehicleClass::ALL {
            let rates = vehicle.rates();

            for hours in 0..=MAX_HOURS {
                for days in 0..=MAX_DAYS {
                    assert_eq!(
                        price(vehicle, hours, days),
                        u64::from(hours) * rates.hourly + u64::from(days) * rates.daily,
                        "price({vehicle:?}, {hours}, {days})"
                    );
                }
            }
        }
    }

    #[test]
    fn price_of_class_b_three_hours_two_days() {
        assert_eq!(price(VehicleClass::B, 3, 2), 5450);
    }

    #[test]
    fn price_clamps_out_of_range_durations() {
        assert_eq!(price(VehicleClass::A, 40, 99), price(VehicleClass::A, 11, 10));
    }

    #[test]
    fn new_clamps_durations() {
        let config = RentalConfig::new(None, 12, 11);

        assert_eq!(config.hours(), MAX_HOURS);
        assert_eq!(config.days(), MAX_DAYS);
    }

    #[test]
    fn increment_hours_at_maximum_is_unchanged() {
        let config = RentalConfig::new(Some(VehicleClass::C), MAX_HOURS, 1);

        let adjusted = config.increment_hours();

        assert_eq!(adjusted.config, config);
        assert_eq!(adjusted.config.hours(), MAX_HOURS);
        assert_eq!(adjusted.config.total(), config.total());
        assert_eq!(adjusted.notice, Some(BoundNotice::HoursAtMaximum));
    }

    #[test]
    fn decrement_days_at_zero_is_unchanged() {
        let config = RentalConfig::new(Some(VehicleClass::A), 2, 0);

        let adjusted = config.decrement_days();

        assert_eq!(adjusted.config.days(), 0);
        assert_eq!(adjusted.notice, Some(BoundNotice::DaysAtMinimum));
    }

    #[test]
    fn steps_within_bounds_have_no_notice() {
        let adjusted = RentalConfig::default()
            .increment_hours()
            .config
            .increment_days()
            .config
            .increment_days();

        assert_eq!(adjusted.config.hours(), 1);
        assert_eq!(adjusted.config.days(), 2);
        assert_eq!(adjusted.notice, None);

        let back = adjusted.config.decrement_hours();

        assert_eq!(back.config.hours(), 0);
        assert_eq!(back.notice, None);
    }

    #[test]
    fn increment_days_at_maximum_notice() {
        let adjusted = RentalConfig::new(None, 0, MAX_DAYS).increment_days();

        assert_eq!(adjusted.notice, Some(BoundNotice::DaysAtMaximum));
        assert_eq!(adjusted.notice.map(|n| n.to_string()).as_deref(), Some("Can't be more than 10 days"));
    }

    #[test]
    fn selecting_vehicle_recomputes_total() {
        let config = RentalConfig::new(None, 3, 2);

        assert_eq!(config.total(), 0);
        assert_eq!(config.with_vehicle(VehicleClass::B).total(), 5450);
        assert_eq!(config.with_vehicle(VehicleClass::A).total(), 4300);
    }

    #[test]
    fn charges_split_total() {
        let config = RentalConfig::new(Some(VehicleClass::C), 4, 1);

        assert_eq!(config.hourly_charge(), 800);
        assert_eq!(config.daily_charge(), 3000);
        assert_eq!(config.hourly_charge() + config.daily_charge(), config.total());
    }

    #[test]
    fn to_money_uses_major_units() -> TestResult {
        let config = RentalConfig::new(Some(VehicleClass::B), 3, 2);

        assert_eq!(config.to_money(iso::KES)?, Money::from_major(5450, iso::KES));

        Ok(())
    }

    #[test]
    fn to_money_overflow_errors() {
        assert_eq!(
            to_money(u64::MAX, iso::KES),
            Err(TotalPriceError::Overflow(u64::MAX))
        );
    }

    #[test]
    fn total_price_sums_lines_as_money() -> TestResult {
        let lines = [order_line(1, 5450), order_line(2, 3000)];

        assert_eq!(total_price(&lines, iso::KES)?, Money::from_major(8450, iso::KES));

        Ok(())
    }

    #[test]
    fn total_price_of_no_lines_is_zero() -> TestResult {
        let lines: [OrderLine; 0] = [];

        assert_eq!(total_price(&lines, iso::KES)?, Money::from_major(0, iso::KES));

        Ok(())
    }

    #[test]
    fn total_price_rejects_unrepresentable_line() {
        let lines = [order_line(1, u64::MAX)];

        assert_eq!(
            total_price(&lines, iso::KES),
            Err(TotalPriceError::Overflow(u64::MAX))
        );
    }
}
