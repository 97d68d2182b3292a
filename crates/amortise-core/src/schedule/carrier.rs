use super::builder::SegmentSchedule;
use super::segmenter::Segment;
use crate::types::Money;

/// Threads the closing balance of one segment into the next.
///
/// Segments must be seeded and carried strictly in chronological order.
#[derive(Debug, Clone)]
pub struct BalanceCarrier {
    balance: Money,
    carried: usize,
}

impl BalanceCarrier {
    pub fn new(principal: Money) -> Self {
        Self {
            balance: principal,
            carried: 0,
        }
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Number of segments whose closing balance has been carried forward.
    pub fn carried(&self) -> usize {
        self.carried
    }

    /// Write the carried balance into the segment's opening balance.
    pub fn seed(&self, segment: Segment) -> Segment {
        Segment {
            opening_balance: self.balance,
            ..segment
        }
    }

    pub fn carry(&mut self, schedule: &SegmentSchedule) {
        self.balance = schedule.closing_balance;
        self.carried += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RateRegime;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_seed_then_carry() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 31).unwrap();
        let segment = Segment {
            index: 1,
            regime: RateRegime::new(dec!(0.08), date, date),
            start_date: date,
            end_date: date,
            period_count: 6,
            opening_balance: Decimal::ZERO,
        };

        let mut carrier = BalanceCarrier::new(dec!(100000));
        assert_eq!(carrier.seed(segment.clone()).opening_balance, dec!(100000));

        carrier.carry(&SegmentSchedule {
            segment_index: 0,
            payment: dec!(-8606.64),
            rows: Vec::new(),
            closing_balance: dec!(50731.66),
            computed_periods: 12,
        });
        assert_eq!(carrier.carried(), 1);
        assert_eq!(carrier.seed(segment).opening_balance, dec!(50731.66));
    }
}
