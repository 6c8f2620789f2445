//! PostgreSQL database service for family-health-service.
//!
//! Uses sqlx runtime queries; list filters are optional binds so one
//! statement serves both the per-person and the whole-family views.

use crate::models::{
    Allergy, Appointment, AppointmentStatus, Clinic, CreateVaccine, Doctor, Document,
    FamilyRecord, HealthCounts, LabComponent, LabResult, LabResultWithComponents, Medication,
    Person, Reminder, ReminderStatus, UpdateVaccine, Vaccine, Vital,
};
use crate::services::metrics::QueryTimer;
use chrono::{Days, NaiveDate};
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// Window for the "vaccines due soon" dashboard counter.
const VACCINE_DUE_WINDOW_DAYS: u64 = 30;

/// Outcome of completing a reminder.
#[derive(Debug)]
pub enum CompleteReminder {
    Completed {
        completed: Reminder,
        next: Option<Reminder>,
    },
    NotFound,
    NotPending(ReminderStatus),
}

/// Outcome of a partial vaccine update.
#[derive(Debug)]
pub enum UpdateVaccineOutcome {
    Updated(Vaccine),
    NotFound,
    /// The merged row would have `next_due_on` before `administered_on`.
    DueBeforeAdministered,
}

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "family-health-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        let _timer = QueryTimer::start("health_check");
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run migrations over a dedicated single connection to `migration_url`,
    /// which may bypass the pooler the request pool goes through.
    #[instrument(skip(self, migration_url))]
    pub async fn run_migrations(&self, migration_url: &str) -> Result<(), AppError> {
        info!("Running database migrations");

        let conn = PgPoolOptions::new()
            .max_connections(1)
            .connect(migration_url)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!(
                    "Failed to open migration connection: {}",
                    e
                ))
            })?;
        let result = sqlx::migrate!("./migrations").run(&conn).await;
        conn.close().await;

        result.map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // People
    // -------------------------------------------------------------------------

    /// List people sorted by name, optionally restricted to one species.
    #[instrument(skip(self))]
    pub async fn list_people(&self, species: Option<&str>) -> Result<Vec<Person>, AppError> {
        let _timer = QueryTimer::start("list_people");
        let people = sqlx::query_as::<_, Person>(
            r#"
            SELECT * FROM people
            WHERE ($1::text IS NULL OR species = $1)
            ORDER BY LOWER(name), name
            "#,
        )
        .bind(species)
        .fetch_all(&self.pool)
        .await?;
        Ok(people)
    }

    #[instrument(skip(self))]
    pub async fn get_person(&self, person_id: Uuid) -> Result<Option<Person>, AppError> {
        let _timer = QueryTimer::start("get_person");
        let person = sqlx::query_as::<_, Person>("SELECT * FROM people WHERE person_id = $1")
            .bind(person_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(person)
    }

    /// Load people with all their records. `None` loads the whole family.
    #[instrument(skip(self))]
    pub async fn load_family_records(
        &self,
        person_id: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<Vec<FamilyRecord>, AppError> {
        let people = match person_id {
            Some(id) => self.get_person(id).await?.into_iter().collect(),
            None => self.list_people(None).await?,
        };
        if people.is_empty() {
            return Ok(Vec::new());
        }

        let order: Vec<Uuid> = people.iter().map(|p| p.id).collect();
        let mut records: HashMap<Uuid, FamilyRecord> = people
            .into_iter()
            .map(|p| (p.id, FamilyRecord::new(p)))
            .collect();

        for allergy in self.list_allergies(person_id).await? {
            if let Some(r) = records.get_mut(&allergy.person_id) {
                r.allergies.push(allergy);
            }
        }
        for medication in self.list_medications(person_id, None).await? {
            if let Some(r) = records.get_mut(&medication.person_id) {
                r.medications.push(medication);
            }
        }
        for vaccine in self.list_vaccines(person_id).await? {
            if let Some(r) = records.get_mut(&vaccine.person_id) {
                r.vaccines.push(vaccine);
            }
        }
        for vital in self.list_vitals(person_id, None).await? {
            if let Some(r) = records.get_mut(&vital.person_id) {
                r.vitals.push(vital);
            }
        }
        for lab in self.list_lab_results(person_id).await? {
            if let Some(r) = records.get_mut(&lab.result.person_id) {
                r.lab_results.push(lab);
            }
        }
        for reminder in self.list_reminders(person_id, None, today).await? {
            if let Some(r) = records.get_mut(&reminder.person_id) {
                r.reminders.push(reminder);
            }
        }
        for document in self.list_documents(person_id).await? {
            if let Some(r) = records.get_mut(&document.person_id) {
                r.documents.push(document);
            }
        }
        for appointment in self.list_appointments(person_id, false, None).await? {
            if let Some(r) = records.get_mut(&appointment.person_id) {
                r.appointments.push(appointment);
            }
        }

        Ok(order
            .into_iter()
            .filter_map(|id| records.remove(&id))
            .collect())
    }

    // -------------------------------------------------------------------------
    // Per-person record lists
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_allergies(&self, person_id: Option<Uuid>) -> Result<Vec<Allergy>, AppError> {
        let _timer = QueryTimer::start("list_allergies");
        let rows = sqlx::query_as::<_, Allergy>(
            r#"
            SELECT * FROM allergies
            WHERE ($1::uuid IS NULL OR person_id = $1)
            ORDER BY created_utc DESC
            "#,
        )
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn list_medications(
        &self,
        person_id: Option<Uuid>,
        active: Option<bool>,
    ) -> Result<Vec<Medication>, AppError> {
        let _timer = QueryTimer::start("list_medications");
        let rows = sqlx::query_as::<_, Medication>(
            r#"
            SELECT * FROM medications
            WHERE ($1::uuid IS NULL OR person_id = $1)
              AND ($2::boolean IS NULL OR active = $2)
            ORDER BY LOWER(name), name
            "#,
        )
        .bind(person_id)
        .bind(active)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn list_vitals(
        &self,
        person_id: Option<Uuid>,
        kind: Option<&str>,
    ) -> Result<Vec<Vital>, AppError> {
        let _timer = QueryTimer::start("list_vitals");
        let rows = sqlx::query_as::<_, Vital>(
            r#"
            SELECT * FROM vitals
            WHERE ($1::uuid IS NULL OR person_id = $1)
              AND ($2::text IS NULL OR kind = $2)
            ORDER BY measured_utc DESC
            "#,
        )
        .bind(person_id)
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Lab results newest first, each with its components and derived flags.
    #[instrument(skip(self))]
    pub async fn list_lab_results(
        &self,
        person_id: Option<Uuid>,
    ) -> Result<Vec<LabResultWithComponents>, AppError> {
        let _timer = QueryTimer::start("list_lab_results");
        let results = sqlx::query_as::<_, LabResult>(
            r#"
            SELECT * FROM lab_results
            WHERE ($1::uuid IS NULL OR person_id = $1)
            ORDER BY collected_on DESC, test_name
            "#,
        )
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;

        if results.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = results.iter().map(|r| r.id).collect();
        let components = sqlx::query_as::<_, LabComponent>(
            r#"
            SELECT * FROM lab_components
            WHERE lab_result_id = ANY($1)
            ORDER BY name
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_result: HashMap<Uuid, Vec<LabComponent>> = HashMap::new();
        for component in components {
            by_result
                .entry(component.lab_result_id)
                .or_default()
                .push(component.with_flag());
        }

        Ok(results
            .into_iter()
            .map(|result| {
                let components = by_result.remove(&result.id).unwrap_or_default();
                LabResultWithComponents { result, components }
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn list_documents(
        &self,
        person_id: Option<Uuid>,
    ) -> Result<Vec<Document>, AppError> {
        let _timer = QueryTimer::start("list_documents");
        let rows = sqlx::query_as::<_, Document>(
            r#"
            SELECT * FROM documents
            WHERE ($1::uuid IS NULL OR person_id = $1)
            ORDER BY uploaded_utc DESC
            "#,
        )
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // -------------------------------------------------------------------------
    // Vaccines
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_vaccines(&self, person_id: Option<Uuid>) -> Result<Vec<Vaccine>, AppError> {
        let _timer = QueryTimer::start("list_vaccines");
        let rows = sqlx::query_as::<_, Vaccine>(
            r#"
            SELECT * FROM vaccines
            WHERE ($1::uuid IS NULL OR person_id = $1)
            ORDER BY administered_on DESC, name
            "#,
        )
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a vaccine record. A missing person surfaces as `NotFound`.
    #[instrument(skip(self, input), fields(person_id = %input.person_id))]
    pub async fn create_vaccine(&self, input: &CreateVaccine) -> Result<Vaccine, AppError> {
        let _timer = QueryTimer::start("create_vaccine");
        let vaccine = sqlx::query_as::<_, Vaccine>(
            r#"
            INSERT INTO vaccines (vaccine_id, person_id, name, administered_on, next_due_on,
                                  lot_number, administered_by, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.person_id)
        .bind(&input.name)
        .bind(input.administered_on)
        .bind(input.next_due_on)
        .bind(&input.lot_number)
        .bind(&input.administered_by)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound(anyhow::anyhow!("Family member not found"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create vaccine: {}", e)),
        })?;

        info!(vaccine_id = %vaccine.id, name = %vaccine.name, "Vaccine created");
        Ok(vaccine)
    }

    /// Apply a partial update. The due-date rule is checked against the merged
    /// row, so a lone `next_due_on` cannot precede the stored administration date.
    #[instrument(skip(self, input))]
    pub async fn update_vaccine(
        &self,
        vaccine_id: Uuid,
        input: &UpdateVaccine,
    ) -> Result<UpdateVaccineOutcome, AppError> {
        let _timer = QueryTimer::start("update_vaccine");
        let vaccine = sqlx::query_as::<_, Vaccine>(
            r#"
            UPDATE vaccines SET
                name            = COALESCE($2, name),
                administered_on = COALESCE($3, administered_on),
                next_due_on     = COALESCE($4, next_due_on),
                lot_number      = COALESCE($5, lot_number),
                administered_by = COALESCE($6, administered_by),
                notes           = COALESCE($7, notes),
                updated_utc     = NOW()
            WHERE vaccine_id = $1
              AND (COALESCE($4, next_due_on) IS NULL
                   OR COALESCE($4, next_due_on) >= COALESCE($3, administered_on))
            RETURNING *
            "#,
        )
        .bind(vaccine_id)
        .bind(&input.name)
        .bind(input.administered_on)
        .bind(input.next_due_on)
        .bind(&input.lot_number)
        .bind(&input.administered_by)
        .bind(&input.notes)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(v) = vaccine {
            info!(vaccine_id = %v.id, "Vaccine updated");
            return Ok(UpdateVaccineOutcome::Updated(v));
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM vaccines WHERE vaccine_id = $1)")
                .bind(vaccine_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(if exists {
            UpdateVaccineOutcome::DueBeforeAdministered
        } else {
            UpdateVaccineOutcome::NotFound
        })
    }

    /// Delete a vaccine. Returns `false` when nothing was deleted.
    #[instrument(skip(self))]
    pub async fn delete_vaccine(&self, vaccine_id: Uuid) -> Result<bool, AppError> {
        let _timer = QueryTimer::start("delete_vaccine");
        let result = sqlx::query("DELETE FROM vaccines WHERE vaccine_id = $1")
            .bind(vaccine_id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(vaccine_id = %vaccine_id, "Vaccine deleted");
        }
        Ok(deleted)
    }

    // -------------------------------------------------------------------------
    // Reminders
    // -------------------------------------------------------------------------

    /// Reminders by due date, with the `overdue` flag derived against `today`.
    #[instrument(skip(self))]
    pub async fn list_reminders(
        &self,
        person_id: Option<Uuid>,
        status: Option<ReminderStatus>,
        today: NaiveDate,
    ) -> Result<Vec<Reminder>, AppError> {
        let _timer = QueryTimer::start("list_reminders");
        let rows = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT * FROM reminders
            WHERE ($1::uuid IS NULL OR person_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY due_on ASC, title
            "#,
        )
        .bind(person_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.with_overdue(today)).collect())
    }

    /// Next pending reminders across the family.
    #[instrument(skip(self))]
    pub async fn upcoming_reminders(
        &self,
        limit: i64,
        today: NaiveDate,
    ) -> Result<Vec<Reminder>, AppError> {
        let _timer = QueryTimer::start("upcoming_reminders");
        let rows = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT * FROM reminders
            WHERE status = $1
            ORDER BY due_on ASC, title
            LIMIT $2
            "#,
        )
        .bind(ReminderStatus::Pending.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.with_overdue(today)).collect())
    }

    /// Mark a pending reminder completed and, when it recurs, schedule the
    /// next occurrence in the same transaction.
    #[instrument(skip(self))]
    pub async fn complete_reminder(
        &self,
        reminder_id: Uuid,
        today: NaiveDate,
    ) -> Result<CompleteReminder, AppError> {
        let _timer = QueryTimer::start("complete_reminder");
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Reminder>(
            "SELECT * FROM reminders WHERE reminder_id = $1 FOR UPDATE",
        )
        .bind(reminder_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            return Ok(CompleteReminder::NotFound);
        };
        if current.status() != ReminderStatus::Pending {
            return Ok(CompleteReminder::NotPending(current.status()));
        }

        let completed = sqlx::query_as::<_, Reminder>(
            r#"
            UPDATE reminders SET status = $2, completed_utc = NOW()
            WHERE reminder_id = $1
            RETURNING *
            "#,
        )
        .bind(reminder_id)
        .bind(ReminderStatus::Completed.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let next = match current.recurrence().next_due(current.due_on) {
            Some(next_due) => Some(
                sqlx::query_as::<_, Reminder>(
                    r#"
                    INSERT INTO reminders (reminder_id, person_id, title, description, due_on,
                                           recurrence, status)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    RETURNING *
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(current.person_id)
                .bind(&current.title)
                .bind(&current.description)
                .bind(next_due)
                .bind(&current.recurrence)
                .bind(ReminderStatus::Pending.as_str())
                .fetch_one(&mut *tx)
                .await?
                .with_overdue(today),
            ),
            None => None,
        };

        tx.commit().await?;

        info!(
            reminder_id = %reminder_id,
            next_reminder_id = ?next.as_ref().map(|r| r.id),
            "Reminder completed"
        );

        Ok(CompleteReminder::Completed {
            completed: completed.with_overdue(today),
            next,
        })
    }

    // -------------------------------------------------------------------------
    // Appointments and directory
    // -------------------------------------------------------------------------

    /// Appointments by time. `upcoming` keeps only future scheduled visits;
    /// `limit = None` returns every row.
    #[instrument(skip(self))]
    pub async fn list_appointments(
        &self,
        person_id: Option<Uuid>,
        upcoming: bool,
        limit: Option<i64>,
    ) -> Result<Vec<Appointment>, AppError> {
        let _timer = QueryTimer::start("list_appointments");
        let rows = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT a.appointment_id, a.person_id,
                   a.doctor_id, d.name AS doctor_name,
                   a.clinic_id, c.name AS clinic_name,
                   a.scheduled_utc, a.reason, a.status, a.notes, a.created_utc
            FROM appointments a
            LEFT JOIN doctors d ON d.doctor_id = a.doctor_id
            LEFT JOIN clinics c ON c.clinic_id = a.clinic_id
            WHERE ($1::uuid IS NULL OR a.person_id = $1)
              AND (NOT $2 OR (a.scheduled_utc >= NOW() AND a.status = $3))
            ORDER BY a.scheduled_utc ASC
            LIMIT $4
            "#,
        )
        .bind(person_id)
        .bind(upcoming)
        .bind(AppointmentStatus::Scheduled.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, AppError> {
        let _timer = QueryTimer::start("list_doctors");
        let rows = sqlx::query_as::<_, Doctor>("SELECT * FROM doctors ORDER BY LOWER(name), name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn list_clinics(&self) -> Result<Vec<Clinic>, AppError> {
        let _timer = QueryTimer::start("list_clinics");
        let rows = sqlx::query_as::<_, Clinic>("SELECT * FROM clinics ORDER BY LOWER(name), name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    // -------------------------------------------------------------------------
    // Dashboard
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn health_counts(&self, today: NaiveDate) -> Result<HealthCounts, AppError> {
        let _timer = QueryTimer::start("health_counts");
        let due_window_end = today
            .checked_add_days(Days::new(VACCINE_DUE_WINDOW_DAYS))
            .unwrap_or(today);

        let counts = sqlx::query_as::<_, HealthCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM people) AS family_members,
                (SELECT COUNT(*) FROM people WHERE species = 'human') AS humans,
                (SELECT COUNT(*) FROM people WHERE species <> 'human') AS pets,
                (SELECT COUNT(*) FROM allergies) AS allergies,
                (SELECT COUNT(*) FROM medications WHERE active) AS active_medications,
                (SELECT COUNT(*) FROM vaccines) AS vaccines,
                (SELECT COUNT(*) FROM vaccines
                    WHERE next_due_on BETWEEN $1 AND $2) AS vaccines_due_soon,
                (SELECT COUNT(*) FROM vitals) AS vitals,
                (SELECT COUNT(*) FROM lab_results) AS lab_results,
                (SELECT COUNT(*) FROM reminders WHERE status = 'pending') AS pending_reminders,
                (SELECT COUNT(*) FROM reminders
                    WHERE status = 'pending' AND due_on < $1) AS overdue_reminders,
                (SELECT COUNT(*) FROM documents) AS documents,
                (SELECT COUNT(*) FROM appointments
                    WHERE status = 'scheduled' AND scheduled_utc >= NOW()) AS upcoming_appointments
            "#,
        )
        .bind(today)
        .bind(due_window_end)
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }
}
