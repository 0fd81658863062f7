//! Fixtures shared by the unit tests.

use crate::reference_data::ReferenceData;
use crate::Database;
use chrono::NaiveDate;
use serde_json::{json, Value};

pub(crate) const REFERENCE_YAML: &str = r#"
fields:
  - { id: 1, name: Körperpflege, short: KP, area: general }
  - { id: 2, name: Medikation, short: ME, area: special }
categories:
  - { id: 1, name: Grundleistung }
options:
  - { id: 1, field_id: 1, category_id: 1, name: Teilwäsche, severity: 2, description: Hilfe beim Waschen }
  - { id: 2, field_id: 1, category_id: 1, name: Ganzkörperwäsche, severity: 3 }
  - { id: 3, field_id: 2, category_id: 1, name: Infusion, severity: 2 }
stations:
  - { id: 1, name: Station 1, patients_per_caregiver_ratio: 1.6 }
  - { id: 2, name: Kinderstation, is_child_care_unit: true, patients_per_caregiver_ratio: 1.2 }
patients:
  - { id: 1, first_name: Alice, last_name: Smith, station_id: 1 }
  - { id: 2, first_name: Bob, last_name: Johnson, station_id: 1 }
  - { id: 3, first_name: Charlie, last_name: Williams, station_id: 2 }
transfers:
  - { id: 50, patient_id: 1, admission_date: 2026-10-15 }
"#;

pub(crate) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

pub(crate) fn seeded_db() -> Database {
    let db = Database::open_in_memory().expect("in-memory database");
    ReferenceData::from_yaml_str(REFERENCE_YAML)
        .expect("fixture parses")
        .import(&db)
        .expect("fixture imports");
    db
}

/// A complete submission for station 1 selecting `options`.
pub(crate) fn valid_body(options: &[i64]) -> Value {
    json!({
        "is_in_isolation": false,
        "data_accepted": true,
        "station": 1,
        "room_name": "2.14",
        "bed_number": "A",
        "barthel_index": 45,
        "expanded_barthel_index": 30,
        "mini_mental_status": 24,
        "selected_care_services": options.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>(),
        "visit_type": "regular",
    })
}
