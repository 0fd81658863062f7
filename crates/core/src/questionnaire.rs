//! Questionnaire assembly for a patient.

use crate::clock::Clock;
use crate::db::Database;
use crate::repositories::{catalog, classification, directory};
use crate::ClassificationResult;
use api_shared::QuestionsRes;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::HashSet;
use std::sync::Arc;

/// Read-only service behind `GET /questions/{patient_id}`.
#[derive(Clone)]
pub struct QuestionnaireService {
    db: Database,
    clock: Arc<dyn Clock>,
}

impl QuestionnaireService {
    pub fn new(db: Database, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Builds the questionnaire for `patient_id`.
    ///
    /// Every catalog option is returned. An option is marked `selected` when it was part of the
    /// patient's classification yesterday, so clinicians start from the previous answers.
    /// Admission and discharge dates come from the patient's latest stay and the visit type from
    /// today's classification; each is `None` when there is nothing to report. Unknown patients
    /// get the plain catalog.
    pub fn questions(&self, patient_id: i64) -> ClassificationResult<QuestionsRes> {
        let today = self.clock.today();

        self.db.with_conn(|conn| {
            let previous = previously_selected(conn, patient_id, today)?;
            let questions = catalog::list_options(conn)?
                .iter()
                .map(|option| option.to_question(previous.contains(&option.id)))
                .collect();

            let transfer = directory::latest_transfer_for_patient(conn, patient_id)?;
            let visit_type = classification::find_for_patient_on(conn, patient_id, today)?
                .map(|c| c.visit_type);

            Ok(QuestionsRes {
                questions,
                admission_date: transfer.as_ref().map(|t| t.admission_date),
                discharge_date: transfer.and_then(|t| t.discharge_date),
                visit_type,
            })
        })
    }
}

fn previously_selected(
    conn: &Connection,
    patient_id: i64,
    today: NaiveDate,
) -> ClassificationResult<HashSet<i64>> {
    if directory::find_patient(conn, patient_id)?.is_none() {
        return Ok(HashSet::new());
    }
    let Some(yesterday) = today.pred_opt() else {
        return Ok(HashSet::new());
    };

    match classification::find_for_patient_on(conn, patient_id, yesterday)? {
        Some(previous) => classification::selected_option_ids(conn, previous.id),
        None => Ok(HashSet::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::submission::SubmissionService;
    use crate::test_support::{seeded_db, today, valid_body};
    use ppr_types::VisitType;
    use serde_json::json;

    fn questionnaire(db: &Database, date: NaiveDate) -> QuestionnaireService {
        QuestionnaireService::new(db.clone(), Arc::new(FixedClock(date)))
    }

    fn submit_on(db: &Database, date: NaiveDate, patient_id: i64, body: &serde_json::Value) {
        SubmissionService::new(db.clone(), Arc::new(FixedClock(date)))
            .submit_json(patient_id, body)
            .expect("submission should succeed");
    }

    fn selected_ids(res: &QuestionsRes) -> Vec<i64> {
        res.questions
            .iter()
            .filter(|q| q.selected)
            .map(|q| q.id)
            .collect()
    }

    #[test]
    fn no_previous_classification_selects_nothing() {
        let db = seeded_db();
        let res = questionnaire(&db, today()).questions(1).unwrap();

        assert_eq!(res.questions.len(), 3);
        assert!(res.questions.iter().all(|q| !q.selected));
    }

    #[test]
    fn yesterdays_selection_is_carried_over() {
        let db = seeded_db();
        let yesterday = today().pred_opt().unwrap();
        submit_on(&db, yesterday, 1, &valid_body(&[1, 3]));

        let res = questionnaire(&db, today()).questions(1).unwrap();
        assert_eq!(selected_ids(&res), vec![1, 3]);
    }

    #[test]
    fn older_classifications_are_ignored() {
        let db = seeded_db();
        let two_days_ago = today().pred_opt().unwrap().pred_opt().unwrap();
        submit_on(&db, two_days_ago, 1, &valid_body(&[1, 3]));

        let res = questionnaire(&db, today()).questions(1).unwrap();
        assert!(selected_ids(&res).is_empty());
    }

    #[test]
    fn other_patients_do_not_leak() {
        let db = seeded_db();
        let yesterday = today().pred_opt().unwrap();
        submit_on(&db, yesterday, 2, &valid_body(&[2]));

        let res = questionnaire(&db, today()).questions(1).unwrap();
        assert!(selected_ids(&res).is_empty());
    }

    #[test]
    fn unknown_patient_gets_plain_catalog() {
        let db = seeded_db();
        let res = questionnaire(&db, today()).questions(404).unwrap();

        assert_eq!(res.questions.len(), 3);
        assert!(res.questions.iter().all(|q| !q.selected));
        assert_eq!(res.admission_date, None);
        assert_eq!(res.discharge_date, None);
        assert_eq!(res.visit_type, None);
    }

    #[test]
    fn transfer_dates_are_reported() {
        let db = seeded_db();
        let res = questionnaire(&db, today()).questions(1).unwrap();
        assert_eq!(res.admission_date, NaiveDate::from_ymd_opt(2026, 10, 15));
        assert_eq!(res.discharge_date, None);

        let res = questionnaire(&db, today()).questions(2).unwrap();
        assert_eq!(res.admission_date, None);
    }

    #[test]
    fn todays_visit_type_is_reported() {
        let db = seeded_db();
        let mut body = valid_body(&[]);
        body["visit_type"] = json!("admission");
        submit_on(&db, today(), 1, &body);

        let res = questionnaire(&db, today()).questions(1).unwrap();
        assert_eq!(res.visit_type, Some(VisitType::Admission));

        let tomorrow = today().succ_opt().unwrap();
        let res = questionnaire(&db, tomorrow).questions(1).unwrap();
        assert_eq!(res.visit_type, None);
    }

    #[test]
    fn question_carries_catalog_details() {
        let db = seeded_db();
        let res = questionnaire(&db, today()).questions(1).unwrap();
        let first = &res.questions[0];

        assert_eq!(first.id, 1);
        assert_eq!(first.field_name, "Körperpflege");
        assert_eq!(first.field_short, "KP");
        assert_eq!(first.category_name, "Grundleistung");
        assert_eq!(first.severity, 2);
    }
}
