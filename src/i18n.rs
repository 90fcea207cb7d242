//! Display-language support.
//!
//! The calculation and validation core never produces display strings on its
//! own. It returns structured values ([`crate::validation::FieldError`],
//! [`crate::services::calculator::Metric`], option enums) and this module turns
//! them into English or Arabic text at the boundary.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Languages the farm dashboard can be displayed in.
///
/// Arabic is the default, matching the dashboard's out-of-the-box setting.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
    #[default]
    Ar,
    En,
}

impl Locale {
    pub fn is_rtl(self) -> bool {
        matches!(self, Locale::Ar)
    }
}

/// A pair of parallel English/Arabic strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    pub en: &'static str,
    pub ar: &'static str,
}

impl Label {
    pub const fn new(en: &'static str, ar: &'static str) -> Self {
        Self { en, ar }
    }

    pub fn get(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.en,
            Locale::Ar => self.ar,
        }
    }
}

/// Anything with a bilingual display label (option values, field names,
/// report headings).
pub trait Localized {
    fn label(&self) -> Label;

    fn localize(&self, locale: Locale) -> &'static str {
        self.label().get(locale)
    }
}

/// Grammatical gender of an Arabic noun phrase. Validation messages agree
/// with it (مطلوب / مطلوبة, يكون / تكون).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Masculine,
    Feminine,
}

impl Gender {
    pub(crate) fn required(self) -> &'static str {
        match self {
            Gender::Masculine => "مطلوب",
            Gender::Feminine => "مطلوبة",
        }
    }

    pub(crate) fn to_be(self) -> &'static str {
        match self {
            Gender::Masculine => "يكون",
            Gender::Feminine => "تكون",
        }
    }

    pub(crate) fn equals(self) -> &'static str {
        match self {
            Gender::Masculine => "يساوي",
            Gender::Feminine => "تساوي",
        }
    }
}
