//! Demo dataset loaded at startup when `SEED_DEMO_DATA=true`.
//!
//! Stands in for the external system that supplies project records in
//! production. Two off-plan purchases with realistic XOF schedules: an
//! apartment part-way through construction with two tranches settled, and
//! a villa whose schedule drifts slightly from the contracted price.

use chrono::{NaiveDate, TimeZone, Utc};
use vefa_core::catalog::ProjectCatalog;
use vefa_core::error::CoreError;
use vefa_core::ledger::MilestoneLedger;
use vefa_core::milestone::{ConstructionStatus, MilestoneUpdate, NewMilestone};
use vefa_core::payment::PaymentMethod;
use vefa_core::project::{NewProject, PropertyType};
use vefa_core::proof::{ProofKind, ProofUpload};
use vefa_core::types::{Amount, MilestoneId, Timestamp};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("seed date is valid")
}

fn timestamp(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Timestamp {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .expect("seed timestamp is valid")
}

fn milestone(
    title: &str,
    description: &str,
    amount: Amount,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> NewMilestone {
    NewMilestone {
        title: title.to_string(),
        description: description.to_string(),
        amount,
        start_date: start,
        end_date: end,
    }
}

fn set_completion(
    ledger: &mut MilestoneLedger,
    id: MilestoneId,
    pct: u8,
) -> Result<(), CoreError> {
    ledger.update_milestone(
        id,
        MilestoneUpdate {
            completion_pct: Some(pct),
            ..Default::default()
        },
    )?;
    Ok(())
}

/// Populate the catalog with the demo projects.
pub fn load_demo_data(catalog: &mut ProjectCatalog) -> Result<(), CoreError> {
    let almadies = catalog
        .insert(NewProject {
            name: "Résidence Les Almadies".to_string(),
            location: "Dakar, Sénégal".to_string(),
            property_type: PropertyType::Apartment,
            total_price: 85_000_000,
            declared_progress: 65,
            start_date: date(2025, 1, 15),
            expected_completion: date(2026, 12, 31),
            milestones: vec![
                milestone(
                    "Réservation et fondations",
                    "Signature du contrat de réservation et coulage des fondations",
                    21_250_000,
                    Some(date(2025, 1, 15)),
                    Some(date(2025, 4, 30)),
                ),
                milestone(
                    "Gros œuvre",
                    "Structure porteuse, planchers et toiture",
                    21_250_000,
                    Some(date(2025, 5, 1)),
                    Some(date(2025, 10, 31)),
                ),
                milestone(
                    "Second œuvre",
                    "Cloisons, menuiseries, plomberie et électricité",
                    21_250_000,
                    Some(date(2025, 11, 1)),
                    Some(date(2026, 5, 31)),
                ),
                milestone(
                    "Finitions",
                    "Revêtements, peinture et équipements",
                    21_250_000,
                    Some(date(2026, 6, 1)),
                    Some(date(2026, 11, 30)),
                ),
                milestone("Livraison des clés", "", 0, None, Some(date(2026, 12, 31))),
            ],
        })?
        .id;

    {
        let project = catalog.get_mut(almadies)?;
        let ids: Vec<_> = project.ledger.milestones().iter().map(|m| m.id).collect();

        // First two tranches built and settled; the third under way.
        project
            .ledger
            .advance_status(ids[0], ConstructionStatus::Completed)?;
        set_completion(&mut project.ledger, ids[0], 100)?;
        project.ledger.apply_payment(
            ids[0],
            PaymentMethod::BankTransfer,
            Some(ProofUpload {
                file_name: "ordre-virement-tranche-1.pdf".to_string(),
                content_type: "application/pdf".to_string(),
            }),
            timestamp(2025, 2, 10, 9, 30),
        )?;

        project
            .ledger
            .advance_status(ids[1], ConstructionStatus::Completed)?;
        set_completion(&mut project.ledger, ids[1], 100)?;
        project.ledger.apply_payment(
            ids[1],
            PaymentMethod::MobileMoney,
            None,
            timestamp(2025, 5, 22, 14, 5),
        )?;

        project
            .ledger
            .advance_status(ids[2], ConstructionStatus::InProgress)?;
        set_completion(&mut project.ledger, ids[2], 60)?;
        project.ledger.add_proof(
            ids[2],
            ProofKind::Image,
            "avancement-second-oeuvre.jpg".to_string(),
            timestamp(2025, 8, 1, 11, 0),
        )?;
    }

    let saly = catalog
        .insert(NewProject {
            name: "Villa Horizon Saly".to_string(),
            location: "Saly Portudal, Sénégal".to_string(),
            property_type: PropertyType::Villa,
            total_price: 120_000_000,
            declared_progress: 35,
            start_date: date(2025, 3, 1),
            expected_completion: date(2027, 6, 30),
            milestones: vec![
                milestone(
                    "Terrassement et fondations",
                    "Préparation du terrain et fondations",
                    30_000_000,
                    Some(date(2025, 3, 1)),
                    Some(date(2025, 8, 31)),
                ),
                milestone(
                    "Élévation et charpente",
                    "Murs porteurs, charpente et couverture",
                    45_000_000,
                    Some(date(2025, 9, 1)),
                    Some(date(2026, 6, 30)),
                ),
                milestone(
                    "Finitions et livraison",
                    "",
                    44_999_000,
                    Some(date(2026, 7, 1)),
                    Some(date(2027, 6, 30)),
                ),
            ],
        })?
        .id;

    {
        let project = catalog.get_mut(saly)?;
        let ids: Vec<_> = project.ledger.milestones().iter().map(|m| m.id).collect();

        project
            .ledger
            .advance_status(ids[0], ConstructionStatus::Completed)?;
        set_completion(&mut project.ledger, ids[0], 100)?;
        project.ledger.apply_payment(
            ids[0],
            PaymentMethod::Card,
            None,
            timestamp(2025, 4, 18, 16, 45),
        )?;

        project
            .ledger
            .advance_status(ids[1], ConstructionStatus::InProgress)?;
        set_completion(&mut project.ledger, ids[1], 40)?;
    }

    for project in catalog.projects() {
        let drift = project.schedule_drift();
        if drift != 0 {
            tracing::warn!(
                project_id = %project.id,
                name = %project.name,
                drift,
                "Milestone schedule does not cover the contracted price"
            );
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
