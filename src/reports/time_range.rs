use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::i18n::{Label, Localized};

/// Reporting window ending on a reference date.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TimeRange {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
    All,
}

impl TimeRange {
    /// First day inside the window, or `None` for [`TimeRange::All`].
    pub fn start(self, today: NaiveDate) -> Option<NaiveDate> {
        let start = match self {
            TimeRange::Week => today.checked_sub_days(Days::new(7)),
            TimeRange::Month => today.checked_sub_months(Months::new(1)),
            TimeRange::Quarter => today.checked_sub_months(Months::new(3)),
            TimeRange::Year => today.checked_sub_months(Months::new(12)),
            TimeRange::All => return None,
        };
        Some(start.unwrap_or(NaiveDate::MIN))
    }

    /// Whether `date` lies in `[start, today]`. Future dates are outside
    /// every window except `All`.
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self.start(today) {
            Some(start) => date >= start && date <= today,
            None => true,
        }
    }
}

impl Localized for TimeRange {
    fn label(&self) -> Label {
        match self {
            TimeRange::Week => Label::new("Last Week", "الأسبوع الماضي"),
            TimeRange::Month => Label::new("Last Month", "الشهر الماضي"),
            TimeRange::Quarter => Label::new("Last Quarter", "الربع الماضي"),
            TimeRange::Year => Label::new("Last Year", "السنة الماضية"),
            TimeRange::All => Label::new("All Time", "كل الوقت"),
        }
    }
}
