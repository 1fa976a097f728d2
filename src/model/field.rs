use super::condition::Operator;
use serde::{Deserialize, Serialize};
use std::fmt;

const NUMERIC_OPERATORS: &[Operator] = &[
    Operator::HigherThan,
    Operator::LowerThan,
    Operator::EqualTo,
    Operator::NotEqualTo,
    Operator::Between,
];
const CHOICE_OPERATORS: &[Operator] = &[Operator::Is, Operator::IsNot];
const CHECKLIST_OPERATORS: &[Operator] = &[Operator::Contains, Operator::DoesNotContain];
const CHECKBOX_OPERATORS: &[Operator] = &[Operator::IsChecked, Operator::IsNotChecked];
const NO_OPERATORS: &[Operator] = &[];

/// Master macro defining the field type vocabulary: the display label shown in
/// the builder, the backend wire name, and the condition operators it supports.
/// A type with an empty operator set is not logic-enabled.
macro_rules! define_field_types {
    ( $( ($variant:ident, $label:literal, $wire:literal, $operators:expr) ),* $(,)? ) => {
        /// The fixed vocabulary of field types, plus a passthrough for names the
        /// builder does not know.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum FieldType {
            $( $variant, )*
            Other(String),
        }

        impl FieldType {
            /// Every known field type, in palette order.
            pub const KNOWN: &'static [FieldType] = &[ $( FieldType::$variant, )* ];

            /// The display label, e.g. `"Amount ($)"`.
            pub fn label(&self) -> &str {
                match self {
                    $( FieldType::$variant => $label, )*
                    FieldType::Other(name) => name,
                }
            }

            /// The backend name. Unknown types degrade to their lower-cased label.
            pub fn wire_name(&self) -> String {
                match self {
                    $( FieldType::$variant => $wire.to_string(), )*
                    FieldType::Other(name) => name.to_lowercase(),
                }
            }

            pub fn from_label(label: &str) -> Self {
                match label {
                    $( $label => FieldType::$variant, )*
                    other => FieldType::Other(other.to_string()),
                }
            }

            pub fn from_wire(name: &str) -> Self {
                match name {
                    $( $wire => FieldType::$variant, )*
                    other => FieldType::Other(other.to_string()),
                }
            }

            /// The condition operators this type exposes.
            pub fn operators(&self) -> &'static [Operator] {
                match self {
                    $( FieldType::$variant => $operators, )*
                    FieldType::Other(_) => NO_OPERATORS,
                }
            }
        }
    };
}

define_field_types! {
    (Checkbox, "Checkbox", "checkbox", CHECKBOX_OPERATORS),
    (TextField, "Text Field", "text_field", NO_OPERATORS),
    (Number, "Number", "number_field", NUMERIC_OPERATORS),
    (Amount, "Amount ($)", "amount_field", NUMERIC_OPERATORS),
    (MultipleChoice, "Multiple Choice", "multiple_choice", CHOICE_OPERATORS),
    (Checklist, "Checklist", "checklist", CHECKLIST_OPERATORS),
    (InspectionCheck, "Inspection Check", "inspection_check", CHOICE_OPERATORS),
    (YesNoNa, "Yes, No, N/A", "yes_no_na", CHOICE_OPERATORS),
    (MeterReading, "Meter Reading", "meter_reading", NUMERIC_OPERATORS),
    (Date, "Date", "date_field", NO_OPERATORS),
    (File, "Picture/File", "file_field", NO_OPERATORS),
    (Signature, "Signature", "signature_block", NO_OPERATORS),
}

impl FieldType {
    /// Whether answers to this type can drive conditional visibility.
    pub fn is_logic_enabled(&self) -> bool {
        !self.operators().is_empty()
    }

    pub fn supports(&self, operator: Operator) -> bool {
        self.operators().contains(&operator)
    }

    /// Whether the type is configured with a list of options.
    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::MultipleChoice | FieldType::Checklist)
    }
}

impl Default for FieldType {
    fn default() -> Self {
        FieldType::TextField
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
