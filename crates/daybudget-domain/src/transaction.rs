//! Entries of the append-only transaction log.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub value: Decimal,
    pub date: NaiveDateTime,
    #[serde(default)]
    pub comment: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl Transaction {
    pub fn new(kind: TransactionType, value: Decimal, date: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            value,
            date,
            comment: String::new(),
            kind,
        }
    }

    pub fn spent(value: Decimal, date: NaiveDateTime, comment: impl Into<String>) -> Self {
        Self::new(TransactionType::Spent, value, date).with_comment(comment)
    }

    pub fn income(value: Decimal, date: NaiveDateTime) -> Self {
        Self::new(TransactionType::Income, value, date)
    }

    pub fn set_daily_budget(value: Decimal, date: NaiveDateTime) -> Self {
        Self::new(TransactionType::SetDailyBudget, value, date)
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    pub fn is_spent(&self) -> bool {
        self.kind == TransactionType::Spent
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> Decimal {
        self.value
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        if self.comment.is_empty() {
            format!("{} {} [{}]", self.date.format("%Y-%m-%d %H:%M"), self.value, self.kind)
        } else {
            format!(
                "{} {} [{}] {}",
                self.date.format("%Y-%m-%d %H:%M"),
                self.value,
                self.kind,
                self.comment
            )
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Spent,
    Income,
    SetDailyBudget,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionType::Spent => "Spent",
            TransactionType::Income => "Income",
            TransactionType::SetDailyBudget => "Daily budget",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn spent_transaction_keeps_comment_and_day() {
        let txn = Transaction::spent(dec!(12.50), at(4, 18), "coffee");
        assert!(txn.is_spent());
        assert_eq!(txn.day(), NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert_eq!(txn.amount(), dec!(12.50));
        assert!(txn.display_label().ends_with("coffee"));
    }

    #[test]
    fn serializes_kind_under_type_key() {
        let txn = Transaction::set_daily_budget(dec!(30), at(1, 9));
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "SET_DAILY_BUDGET");
        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind, TransactionType::SetDailyBudget);
    }
}
