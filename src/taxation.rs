//! Canonical taxation class vocabulary.
//!
//! Source files label the same class inconsistently (`New_Private_Cars`,
//! `New Goods Vehicles`, `Second-hand Tractors`, ...). Every label is folded to
//! a lowercase underscore key by [`normalize_label`] and then looked up in
//! [`LABEL_TABLE`]:
//!
//! | Normalized key                         | Class                               |
//! |----------------------------------------|-------------------------------------|
//! | `new_private_cars`                     | `New_Private_Cars`                  |
//! | `secondhand_private_cars`              | `Secondhand_Private_Cars`           |
//! | `new_goods_vehicles`                   | `New_Goods_Vehicles`                |
//! | `secondhand_goods_vehicles`            | `Secondhand_Goods_Vehicles`         |
//! | `new_tractors`                         | `New_Tractors`                      |
//! | `secondhand_tractors`                  | `Secondhand_Tractors`               |
//! | `new_motor_cycles`, `new_motorcycles`  | `New_Motor_Cycles`                  |
//! | `secondhand_motor_cycles`, `..._motorcycles` | `Secondhand_Motor_Cycles`     |
//! | `new_public_service_vehicles`          | `New_Public_Service_Vehicles`       |
//! | `secondhand_public_service_vehicles`   | `Secondhand_Public_Service_Vehicles`|
//! | `new_vehicles`                         | `New_Vehicles`                      |
//! | `secondhand_vehicles`                  | `Secondhand_Vehicles`               |
//! | `exempt_vehicles`                      | `Exempt_Vehicles`                   |
//! | `other_classes`                        | `Other_Classes`                     |
//! | `all_vehicles`, `all_taxation_classes` | `All_Vehicles`                      |

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaxationClass {
    #[serde(rename = "New_Private_Cars")]
    NewPrivateCars,
    #[serde(rename = "Secondhand_Private_Cars")]
    SecondhandPrivateCars,
    #[serde(rename = "New_Goods_Vehicles")]
    NewGoodsVehicles,
    #[serde(rename = "Secondhand_Goods_Vehicles")]
    SecondhandGoodsVehicles,
    #[serde(rename = "New_Tractors")]
    NewTractors,
    #[serde(rename = "Secondhand_Tractors")]
    SecondhandTractors,
    #[serde(rename = "New_Motor_Cycles")]
    NewMotorCycles,
    #[serde(rename = "Secondhand_Motor_Cycles")]
    SecondhandMotorCycles,
    #[serde(rename = "New_Public_Service_Vehicles")]
    NewPublicServiceVehicles,
    #[serde(rename = "Secondhand_Public_Service_Vehicles")]
    SecondhandPublicServiceVehicles,
    #[serde(rename = "New_Vehicles")]
    NewVehicles,
    #[serde(rename = "Secondhand_Vehicles")]
    SecondhandVehicles,
    #[serde(rename = "Exempt_Vehicles")]
    ExemptVehicles,
    #[serde(rename = "Other_Classes")]
    OtherClasses,
    #[serde(rename = "All_Vehicles")]
    AllVehicles,
}

/// Normalized label key to class. See the module docs for the full table.
static LABEL_TABLE: &[(&str, TaxationClass)] = &[
    ("new_private_cars", TaxationClass::NewPrivateCars),
    ("secondhand_private_cars", TaxationClass::SecondhandPrivateCars),
    ("new_goods_vehicles", TaxationClass::NewGoodsVehicles),
    ("secondhand_goods_vehicles", TaxationClass::SecondhandGoodsVehicles),
    ("new_tractors", TaxationClass::NewTractors),
    ("secondhand_tractors", TaxationClass::SecondhandTractors),
    ("new_motor_cycles", TaxationClass::NewMotorCycles),
    ("new_motorcycles", TaxationClass::NewMotorCycles),
    ("secondhand_motor_cycles", TaxationClass::SecondhandMotorCycles),
    ("secondhand_motorcycles", TaxationClass::SecondhandMotorCycles),
    ("new_public_service_vehicles", TaxationClass::NewPublicServiceVehicles),
    (
        "secondhand_public_service_vehicles",
        TaxationClass::SecondhandPublicServiceVehicles,
    ),
    ("new_vehicles", TaxationClass::NewVehicles),
    ("secondhand_vehicles", TaxationClass::SecondhandVehicles),
    ("exempt_vehicles", TaxationClass::ExemptVehicles),
    ("other_classes", TaxationClass::OtherClasses),
    ("all_vehicles", TaxationClass::AllVehicles),
    ("all_taxation_classes", TaxationClass::AllVehicles),
];

/// Folds a raw label into the lowercase underscore form used as a table key.
pub fn normalize_label(label: &str) -> String {
    let mut key = String::with_capacity(label.len());
    for ch in label.trim().chars() {
        let ch = match ch {
            ' ' | '-' | '\t' => '_',
            c => c.to_ascii_lowercase(),
        };
        if ch == '_' && (key.is_empty() || key.ends_with('_')) {
            continue;
        }
        key.push(ch);
    }
    while key.ends_with('_') {
        key.pop();
    }
    key.replace("second_hand", "secondhand")
}

impl TaxationClass {
    pub const ALL: [TaxationClass; 15] = [
        TaxationClass::NewPrivateCars,
        TaxationClass::SecondhandPrivateCars,
        TaxationClass::NewGoodsVehicles,
        TaxationClass::SecondhandGoodsVehicles,
        TaxationClass::NewTractors,
        TaxationClass::SecondhandTractors,
        TaxationClass::NewMotorCycles,
        TaxationClass::SecondhandMotorCycles,
        TaxationClass::NewPublicServiceVehicles,
        TaxationClass::SecondhandPublicServiceVehicles,
        TaxationClass::NewVehicles,
        TaxationClass::SecondhandVehicles,
        TaxationClass::ExemptVehicles,
        TaxationClass::OtherClasses,
        TaxationClass::AllVehicles,
    ];

    /// Resolves a source label of any casing or spacing to its canonical class.
    pub fn from_label(label: &str) -> Option<TaxationClass> {
        let key = normalize_label(label);
        LABEL_TABLE
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, class)| *class)
    }

    /// Underscore form used in the dataset and in serialized output.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            TaxationClass::NewPrivateCars => "New_Private_Cars",
            TaxationClass::SecondhandPrivateCars => "Secondhand_Private_Cars",
            TaxationClass::NewGoodsVehicles => "New_Goods_Vehicles",
            TaxationClass::SecondhandGoodsVehicles => "Secondhand_Goods_Vehicles",
            TaxationClass::NewTractors => "New_Tractors",
            TaxationClass::SecondhandTractors => "Secondhand_Tractors",
            TaxationClass::NewMotorCycles => "New_Motor_Cycles",
            TaxationClass::SecondhandMotorCycles => "Secondhand_Motor_Cycles",
            TaxationClass::NewPublicServiceVehicles => "New_Public_Service_Vehicles",
            TaxationClass::SecondhandPublicServiceVehicles => {
                "Secondhand_Public_Service_Vehicles"
            }
            TaxationClass::NewVehicles => "New_Vehicles",
            TaxationClass::SecondhandVehicles => "Secondhand_Vehicles",
            TaxationClass::ExemptVehicles => "Exempt_Vehicles",
            TaxationClass::OtherClasses => "Other_Classes",
            TaxationClass::AllVehicles => "All_Vehicles",
        }
    }

    /// Human readable label for legends and tooltips.
    pub fn display_name(&self) -> String {
        self.canonical_name().replace('_', " ")
    }
}

impl fmt::Display for TaxationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}
