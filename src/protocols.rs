//! Protocol effectiveness: pain reduction and weekly pain curves per
//! treatment protocol.
//!
//! Every care plan contributes the pain scores its patient recorded from the
//! plan start onward. The first score is the baseline; the reduction is taken
//! at the week-8 checkpoint, or at the last available score when follow-up
//! stopped earlier. Weekly means are averaged only over plans that actually
//! have a score at that week.

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::config::{PROTOCOL_CHECKPOINT_WEEK, PROTOCOL_WEEKS, TOP_CARE_STEP_PROCEDURES};
use crate::db::{get_care_plans_by_protocol, get_pain_scores_since, DatabaseError};
use crate::models::enums::Protocol;
use crate::stats::{mean, round_to};

// ═══════════════════════════════════════════
// View types
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub week: usize,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolEffect {
    pub protocol: Protocol,
    pub label: String,
    /// Mean (baseline − checkpoint) across plans with ≥ 2 scores, 2 decimals.
    pub delta: f64,
    pub curve: Vec<CurvePoint>,
    /// Care plans enrolled in the protocol.
    pub plans: usize,
    /// Plans that produced a reduction sample.
    pub reduction_samples: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureUsage {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolReport {
    pub reductions: Vec<ProtocolEffect>,
    pub top_procedures: Vec<ProcedureUsage>,
}

// ═══════════════════════════════════════════
// Pure computation
// ═══════════════════════════════════════════

/// Baseline minus the checkpoint score, falling back to the last score.
/// `None` with fewer than two scores.
pub fn plan_reduction(scores: &[u8]) -> Option<i32> {
    let baseline = i32::from(*scores.first()?);
    let end = if scores.len() > PROTOCOL_CHECKPOINT_WEEK {
        scores.get(PROTOCOL_CHECKPOINT_WEEK)
    } else if scores.len() > 1 {
        scores.last()
    } else {
        None
    }?;
    Some(baseline - i32::from(*end))
}

/// Folds the score series of every plan in a protocol into one effect.
/// Empty series are skipped.
pub fn summarize_protocol(protocol: Protocol, series: &[Vec<u8>]) -> ProtocolEffect {
    let mut buckets: Vec<Vec<u8>> = vec![Vec::new(); PROTOCOL_WEEKS];
    let mut reductions: Vec<i32> = Vec::new();

    for scores in series.iter().filter(|s| !s.is_empty()) {
        for (bucket, &score) in buckets.iter_mut().zip(scores.iter()) {
            bucket.push(score);
        }
        if let Some(r) = plan_reduction(scores) {
            reductions.push(r);
        }
    }

    let curve = buckets
        .iter()
        .enumerate()
        .filter_map(|(week, bucket)| {
            mean(bucket.iter().map(|&s| f64::from(s))).map(|m| CurvePoint {
                week,
                score: round_to(m, 2),
            })
        })
        .collect();

    let delta = mean(reductions.iter().map(|&r| f64::from(r)))
        .map(|m| round_to(m, 2))
        .unwrap_or(0.0);

    ProtocolEffect {
        protocol,
        label: protocol.label().to_string(),
        delta,
        curve,
        plans: series.len(),
        reduction_samples: reductions.len(),
    }
}

// ═══════════════════════════════════════════
// Queries
// ═══════════════════════════════════════════

/// One entry per protocol that has at least one care plan, in protocol order.
pub fn get_protocol_effects(conn: &Connection) -> Result<Vec<ProtocolEffect>, DatabaseError> {
    let mut effects = Vec::new();

    for protocol in Protocol::ALL {
        let plans = get_care_plans_by_protocol(conn, protocol)?;
        if plans.is_empty() {
            continue;
        }

        let series = plans
            .iter()
            .map(|plan| get_pain_scores_since(conn, &plan.patient_id, &plan.start_date))
            .collect::<Result<Vec<_>, _>>()?;

        let effect = summarize_protocol(protocol, &series);
        tracing::debug!(
            protocol = protocol.as_str(),
            plans = effect.plans,
            samples = effect.reduction_samples,
            delta = effect.delta,
            "Protocol summarized"
        );
        effects.push(effect);
    }

    Ok(effects)
}

/// Procedures most often scheduled as care steps, across all plans.
pub fn top_care_step_procedures(
    conn: &Connection,
    limit: usize,
) -> Result<Vec<ProcedureUsage>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT pr.name, COUNT(*) AS cnt
         FROM care_steps cs
         JOIN procedures pr ON pr.id = cs.procedure_id
         GROUP BY pr.name
         ORDER BY cnt DESC, pr.name ASC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit as i64], |row| {
        Ok(ProcedureUsage {
            name: row.get("name")?,
            count: row.get("cnt")?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Top-level assembly for the protocols report.
pub fn get_protocol_report(conn: &Connection) -> Result<ProtocolReport, DatabaseError> {
    Ok(ProtocolReport {
        reductions: get_protocol_effects(conn)?,
        top_procedures: top_care_step_procedures(conn, TOP_CARE_STEP_PROCEDURES)?,
    })
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::*;
    use crate::models::enums::Sex;
    use crate::models::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use uuid::Uuid;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn setup_db() -> Connection {
        open_memory_database().expect("Failed to open test DB")
    }

    fn add_patient(conn: &Connection) -> Uuid {
        let id = Uuid::new_v4();
        insert_patient(conn, &Patient {
            id,
            full_name: "Patient".into(),
            sex: Sex::Male,
            birth_date: None,
            created_at: NaiveDateTime::parse_from_str("2023-01-01 00:00:00", DATETIME_FORMAT)
                .unwrap(),
        })
        .unwrap();
        id
    }

    fn add_plan(conn: &Connection, patient: Uuid, protocol: Protocol, start: &str) -> Uuid {
        let id = Uuid::new_v4();
        insert_care_plan(conn, &CarePlan {
            id,
            patient_id: patient,
            diagnosis: "Chronic low back pain".into(),
            protocol,
            start_date: day(start),
            goal_pain_score: 3,
        })
        .unwrap();
        id
    }

    /// One assessment per week starting at `start`.
    fn add_weekly_scores(conn: &Connection, patient: Uuid, start: &str, scores: &[u8]) {
        for (w, &score) in scores.iter().enumerate() {
            insert_pain_assessment(conn, &PainAssessment {
                id: Uuid::new_v4(),
                patient_id: patient,
                encounter_id: None,
                recorded_at: day(start) + Duration::weeks(w as i64),
                score,
                notes: format!("Week {}", w + 1),
            })
            .unwrap();
        }
    }

    // ── Pure computation ───────────────────────────────────────────────

    #[test]
    fn reduction_at_checkpoint() {
        assert_eq!(plan_reduction(&[9, 8, 7, 6, 5, 5, 4, 4, 3]), Some(6));
        // Later scores do not move the checkpoint
        assert_eq!(plan_reduction(&[9, 8, 7, 6, 5, 5, 4, 4, 3, 1, 0, 0]), Some(6));
    }

    #[test]
    fn reduction_falls_back_to_last_score() {
        assert_eq!(plan_reduction(&[8, 7, 5]), Some(3));
        assert_eq!(plan_reduction(&[6, 7]), Some(-1));
    }

    #[test]
    fn reduction_needs_two_scores() {
        assert_eq!(plan_reduction(&[7]), None);
        assert_eq!(plan_reduction(&[]), None);
    }

    #[test]
    fn curve_skips_weeks_without_samples() {
        let effect = summarize_protocol(Protocol::Laser, &[vec![8, 6], vec![10, 8, 6]]);
        assert_eq!(
            effect.curve,
            vec![
                CurvePoint { week: 0, score: 9.0 },
                CurvePoint { week: 1, score: 7.0 },
                CurvePoint { week: 2, score: 6.0 },
            ]
        );
        // (8-6 + 10-6) / 2
        assert_eq!(effect.delta, 3.0);
        assert_eq!(effect.reduction_samples, 2);
    }

    #[test]
    fn curve_limited_to_twelve_weeks() {
        let long: Vec<u8> = (0..15).map(|i| 10 - (i % 10) as u8).collect();
        let effect = summarize_protocol(Protocol::Block, &[long]);
        assert_eq!(effect.curve.len(), 12);
        assert_eq!(effect.curve.last().unwrap().week, 11);
    }

    #[test]
    fn single_score_plans_feed_curve_but_not_delta() {
        let effect = summarize_protocol(Protocol::Infiltration, &[vec![7], vec![]]);
        assert_eq!(effect.delta, 0.0);
        assert_eq!(effect.reduction_samples, 0);
        assert_eq!(effect.curve, vec![CurvePoint { week: 0, score: 7.0 }]);
        assert_eq!(effect.plans, 2);
    }

    #[test]
    fn curve_mean_rounded_to_two_decimals() {
        let effect = summarize_protocol(Protocol::Laser, &[vec![7], vec![8], vec![8]]);
        assert_eq!(effect.curve[0].score, 7.67);
    }

    // ── Against the store ──────────────────────────────────────────────

    #[test]
    fn scenario_b_radiofrequency_reduction() {
        let conn = setup_db();
        let patient = add_patient(&conn);
        add_plan(&conn, patient, Protocol::Radiofrequency, "2024-01-01");
        add_weekly_scores(&conn, patient, "2024-01-01", &[9, 8, 7, 6, 5, 5, 4, 4, 3]);

        let effects = get_protocol_effects(&conn).unwrap();
        assert_eq!(effects.len(), 1);
        let rf = &effects[0];
        assert_eq!(rf.protocol, Protocol::Radiofrequency);
        assert_eq!(rf.label, "Conventional/pulsed radiofrequency");
        assert_eq!(rf.delta, 6.0);
        assert_eq!(rf.curve.len(), 9);
        assert_eq!(rf.curve[0], CurvePoint { week: 0, score: 9.0 });
        assert_eq!(rf.curve[8], CurvePoint { week: 8, score: 3.0 });
    }

    #[test]
    fn scenario_c_protocol_without_plans_absent() {
        let conn = setup_db();
        let patient = add_patient(&conn);
        add_plan(&conn, patient, Protocol::Laser, "2024-01-01");
        add_weekly_scores(&conn, patient, "2024-01-01", &[8, 7]);

        let effects = get_protocol_effects(&conn).unwrap();
        assert!(effects.iter().all(|e| e.protocol != Protocol::ShockWave));
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn empty_store_yields_empty_report() {
        let conn = setup_db();
        let report = get_protocol_report(&conn).unwrap();
        assert!(report.reductions.is_empty());
        assert!(report.top_procedures.is_empty());
    }

    #[test]
    fn plan_without_assessments_keeps_protocol_with_zero_delta() {
        let conn = setup_db();
        let patient = add_patient(&conn);
        add_plan(&conn, patient, Protocol::ShockWave, "2024-01-01");

        let effects = get_protocol_effects(&conn).unwrap();
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].delta, 0.0);
        assert!(effects[0].curve.is_empty());
    }

    #[test]
    fn assessments_before_plan_start_ignored() {
        let conn = setup_db();
        let patient = add_patient(&conn);
        // Old, unrelated high scores before the plan
        add_weekly_scores(&conn, patient, "2023-10-01", &[10, 10]);
        add_plan(&conn, patient, Protocol::Block, "2024-01-01");
        add_weekly_scores(&conn, patient, "2024-01-01", &[7, 5, 4]);

        let effects = get_protocol_effects(&conn).unwrap();
        assert_eq!(effects[0].delta, 3.0);
        assert_eq!(effects[0].curve[0].score, 7.0);
    }

    #[test]
    fn protocols_reported_in_fixed_order_with_mixed_attrition() {
        let conn = setup_db();

        let p1 = add_patient(&conn);
        add_plan(&conn, p1, Protocol::ShockWave, "2024-01-01");
        add_weekly_scores(&conn, p1, "2024-01-01", &[8, 8, 7, 7, 6, 6, 6, 5, 5, 4]);

        let p2 = add_patient(&conn);
        add_plan(&conn, p2, Protocol::Laser, "2024-02-01");
        add_weekly_scores(&conn, p2, "2024-02-01", &[9, 8, 8, 7]);

        let p3 = add_patient(&conn);
        add_plan(&conn, p3, Protocol::Laser, "2024-02-01");
        add_weekly_scores(&conn, p3, "2024-02-01", &[6, 6, 5, 5, 4, 4, 3, 3, 2, 2, 2]);

        let effects = get_protocol_effects(&conn).unwrap();
        let order: Vec<Protocol> = effects.iter().map(|e| e.protocol).collect();
        assert_eq!(order, vec![Protocol::Laser, Protocol::ShockWave]);

        let laser = &effects[0];
        // p2 has 4 scores → 9-7 = 2; p3 checkpoint → 6-2 = 4
        assert_eq!(laser.delta, 3.0);
        // Weeks 4..10 only have p3 samples
        assert_eq!(laser.curve[3], CurvePoint { week: 3, score: 6.0 });
        assert_eq!(laser.curve[4], CurvePoint { week: 4, score: 4.0 });
        assert_eq!(laser.curve.len(), 11);

        let eswt = &effects[1];
        assert_eq!(eswt.delta, 3.0);
    }

    #[test]
    fn top_care_step_procedures_counts_and_limits() {
        let conn = setup_db();
        let patient = add_patient(&conn);
        let plan = add_plan(&conn, patient, Protocol::Laser, "2024-01-01");

        let mut proc_ids = Vec::new();
        for i in 0..10 {
            let cat = Uuid::new_v4();
            insert_procedure_category(&conn, &ProcedureCategory {
                id: cat,
                name: format!("Cat {i}"),
            })
            .unwrap();
            let id = Uuid::new_v4();
            insert_procedure(&conn, &Procedure {
                id,
                code: format!("PROC-{i}"),
                name: format!("Procedure {i:02}"),
                category_id: cat,
                duration_estimate_min: 20,
                requires_image_guidance: false,
                price: 100.0,
            })
            .unwrap();
            proc_ids.push(id);
        }

        // Procedure i is scheduled i + 1 times
        for (i, proc_id) in proc_ids.iter().enumerate() {
            for k in 0..=i {
                insert_care_step(&conn, &CareStep {
                    id: Uuid::new_v4(),
                    care_plan_id: plan,
                    procedure_id: *proc_id,
                    scheduled_at: day("2024-01-01") + Duration::days(k as i64),
                    done_at: None,
                    notes: String::new(),
                })
                .unwrap();
            }
        }

        let top = top_care_step_procedures(&conn, TOP_CARE_STEP_PROCEDURES).unwrap();
        assert_eq!(top.len(), 8);
        assert_eq!(top[0], ProcedureUsage { name: "Procedure 09".into(), count: 10 });
        assert_eq!(top[7], ProcedureUsage { name: "Procedure 02".into(), count: 3 });
    }
}
