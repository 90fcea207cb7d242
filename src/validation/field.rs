use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::i18n::{Gender, Label, Localized};

/// Every form input the validators know about, named by its wire key.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    // inventory
    BatchId,
    EntryDate,
    InitialCount,
    CurrentCount,
    Breed,
    Source,
    Status,
    AverageWeight,
    Notes,
    // feeding
    FeedDate,
    FeedType,
    Quantity,
    CostPerKg,
    FeedTime,
    // medication
    ApplicationDate,
    MedicationType,
    MedicationName,
    Dosage,
    ApplicationMethod,
    Cost,
    WithdrawalPeriodDays,
    NextDueDate,
    // sales
    SaleDate,
    WeightTotal,
    PricePerKg,
    CustomerName,
    PaymentMethod,
    PaymentStatus,
    // expenses
    ExpenseDate,
    ExpenseType,
    Amount,
    Description,
    Vendor,
    ReceiptNumber,
    // cost/profit calculator
    InitialBirdCount,
    BirdCost,
    FeedCost,
    MedicationCost,
    UtilitiesCost,
    LaborCost,
    OtherCosts,
    ExpectedMortality,
    ExpectedWeight,
    ExpectedPricePerKg,
}

impl Field {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    /// Gender of the Arabic label, used for message agreement.
    pub fn gender(&self) -> Gender {
        use Field::*;
        match self {
            Breed | Status | Notes | Quantity | CostPerKg | Dosage | ApplicationMethod | Cost
            | WithdrawalPeriodDays | PaymentMethod | PaymentStatus | BirdCost | FeedCost
            | MedicationCost | UtilitiesCost | LaborCost | OtherCosts | ExpectedMortality => {
                Gender::Feminine
            }
            _ => Gender::Masculine,
        }
    }
}

impl Localized for Field {
    fn label(&self) -> Label {
        use Field::*;
        match self {
            BatchId => Label::new("Batch ID", "معرف الدفعة"),
            EntryDate => Label::new("Entry date", "تاريخ الإدخال"),
            InitialCount => Label::new("Initial count", "العدد الأولي"),
            CurrentCount => Label::new("Current count", "العدد الحالي"),
            Breed => Label::new("Breed", "السلالة"),
            Source => Label::new("Source", "المصدر"),
            Status => Label::new("Status", "الحالة"),
            AverageWeight => Label::new("Average weight", "متوسط الوزن"),
            Notes => Label::new("Notes", "الملاحظات"),
            FeedDate => Label::new("Feed date", "تاريخ التغذية"),
            FeedType => Label::new("Feed type", "نوع العلف"),
            Quantity => Label::new("Quantity", "الكمية"),
            CostPerKg => Label::new("Cost per kg", "التكلفة لكل كجم"),
            FeedTime => Label::new("Feed time", "وقت التغذية"),
            ApplicationDate => Label::new("Application date", "تاريخ التطبيق"),
            MedicationType => Label::new("Medication type", "نوع الدواء/اللقاح"),
            MedicationName => Label::new("Medication name", "اسم الدواء/اللقاح"),
            Dosage => Label::new("Dosage", "الجرعة"),
            ApplicationMethod => Label::new("Application method", "طريقة التطبيق"),
            Cost => Label::new("Cost", "التكلفة"),
            WithdrawalPeriodDays => Label::new("Withdrawal period (days)", "فترة السحب (بالأيام)"),
            NextDueDate => Label::new("Next due date", "تاريخ الاستحقاق التالي"),
            SaleDate => Label::new("Sale date", "تاريخ البيع"),
            WeightTotal => Label::new("Total weight", "الوزن الإجمالي"),
            PricePerKg => Label::new("Price per kg", "السعر لكل كجم"),
            CustomerName => Label::new("Customer name", "اسم العميل"),
            PaymentMethod => Label::new("Payment method", "طريقة الدفع"),
            PaymentStatus => Label::new("Payment status", "حالة الدفع"),
            ExpenseDate => Label::new("Expense date", "تاريخ المصروف"),
            ExpenseType => Label::new("Expense type", "نوع المصروف"),
            Amount => Label::new("Amount", "المبلغ"),
            Description => Label::new("Description", "الوصف"),
            Vendor => Label::new("Vendor", "المورد"),
            ReceiptNumber => Label::new("Receipt number", "رقم الإيصال"),
            InitialBirdCount => Label::new("Initial bird count", "عدد الطيور الأولي"),
            BirdCost => Label::new("Cost per chick", "تكلفة الكتكوت الواحد"),
            FeedCost => Label::new("Feed cost", "تكلفة العلف"),
            MedicationCost => Label::new("Medication cost", "تكلفة الأدوية"),
            UtilitiesCost => Label::new("Utilities cost", "تكلفة المرافق"),
            LaborCost => Label::new("Labor cost", "تكلفة العمالة"),
            OtherCosts => Label::new("Other costs", "التكاليف الأخرى"),
            ExpectedMortality => Label::new("Expected mortality (%)", "نسبة النفوق المتوقعة (%)"),
            ExpectedWeight => Label::new("Expected weight per bird (kg)", "الوزن المتوقع للطائر (كجم)"),
            ExpectedPricePerKg => Label::new("Expected price per kg", "السعر المتوقع لكل كجم"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn wire_names_round_trip() {
        for field in Field::iter() {
            assert_eq!(Field::from_str(field.as_str()).unwrap(), field);
        }
        assert_eq!(Field::WithdrawalPeriodDays.as_str(), "withdrawal_period_days");
        assert_eq!(Field::CostPerKg.as_str(), "cost_per_kg");
    }

    #[test]
    fn every_field_has_both_labels() {
        for field in Field::iter() {
            let label = field.label();
            assert!(!label.en.is_empty(), "{field} has no English label");
            assert!(!label.ar.is_empty(), "{field} has no Arabic label");
        }
    }
}
