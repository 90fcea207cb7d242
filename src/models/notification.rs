use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::i18n::{Label, Localized};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NotificationKind {
    Vaccination,
    Feeding,
    Alert,
    Info,
}

impl Localized for NotificationKind {
    fn label(&self) -> Label {
        match self {
            NotificationKind::Vaccination => Label::new("Vaccination", "تطعيم"),
            NotificationKind::Feeding => Label::new("Feeding", "تغذية"),
            NotificationKind::Alert => Label::new("Alert", "تنبيه"),
            NotificationKind::Info => Label::new("Info", "معلومات"),
        }
    }
}

/// What a notification points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "related_type", content = "related_id", rename_all = "lowercase")]
pub enum RelatedRef {
    Batch(String),
    Report(String),
}

impl RelatedRef {
    /// Dashboard path a client should open for this reference.
    pub fn route(&self) -> String {
        match self {
            RelatedRef::Batch(batch_id) => format!("/inventory/{batch_id}"),
            RelatedRef::Report(_) => "/reports".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub date: DateTime<Utc>,
    pub read: bool,
    pub related: Option<RelatedRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub date: DateTime<Utc>,
    pub related: Option<RelatedRef>,
}

impl Notification {
    pub fn from_new(id: i64, new: NewNotification) -> Self {
        Self {
            id,
            title: new.title,
            message: new.message,
            kind: new.kind,
            date: new.date,
            read: false,
            related: new.related,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_follow_reference_type() {
        assert_eq!(
            RelatedRef::Batch("B2025001".into()).route(),
            "/inventory/B2025001"
        );
        assert_eq!(RelatedRef::Report("march-2025".into()).route(), "/reports");
    }

    #[test]
    fn reference_serializes_as_type_and_id() {
        let json = serde_json::to_value(RelatedRef::Batch("B2025002".into())).unwrap();
        assert_eq!(json["related_type"], "batch");
        assert_eq!(json["related_id"], "B2025002");
    }
}
