//! Claims repository implementation
//!
//! Row-level access to the claim intake tables. Queries are checked at run
//! time (`query_as::<_, Row>`) so the crate builds without a live database.
//! Multi-table writes run in a single transaction.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::DatabaseError;

const CLAIM_COLUMNS: &str = r#"
    claim_id, claim_number, policy_number, policyholder_name,
    policyholder_email, policyholder_phone, accident_date,
    license_plate, vehicle_vin, vehicle_make, vehicle_model, vehicle_year,
    status, currency, estimated_repair_cost, final_approved_amount,
    incident_description, assigned_to, reviewed_by, reviewed_at,
    created_at, updated_at
"#;

/// Repository for the claim intake tables
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts a claim row as given
    pub async fn insert_claim(&self, claim: &ClaimRow) -> Result<ClaimRow, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO claims ({CLAIM_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                    $13, $14, $15, $16, $17, $18, $19, $20, $21, $22)
            RETURNING {CLAIM_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim.claim_id)
            .bind(&claim.claim_number)
            .bind(&claim.policy_number)
            .bind(&claim.policyholder_name)
            .bind(&claim.policyholder_email)
            .bind(&claim.policyholder_phone)
            .bind(claim.accident_date)
            .bind(&claim.license_plate)
            .bind(&claim.vehicle_vin)
            .bind(&claim.vehicle_make)
            .bind(&claim.vehicle_model)
            .bind(claim.vehicle_year)
            .bind(claim.status)
            .bind(&claim.currency)
            .bind(claim.estimated_repair_cost)
            .bind(claim.final_approved_amount)
            .bind(&claim.incident_description)
            .bind(&claim.assigned_to)
            .bind(&claim.reviewed_by)
            .bind(claim.reviewed_at)
            .bind(claim.created_at)
            .bind(claim.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn get_by_id(&self, claim_id: Uuid) -> Result<ClaimRow, DatabaseError> {
        fetch_claim(&self.pool, claim_id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Claim", claim_id))
    }

    /// Lists claims with optional search, status filter and ordering
    ///
    /// Rows with a NULL sort value come last in either direction.
    pub async fn list(&self, filter: &ClaimFilter) -> Result<Vec<ClaimRow>, DatabaseError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE TRUE"));

        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", escape_like(search));
            builder.push(" AND (");
            let mut columns = builder.separated(" OR ");
            for column in SEARCH_COLUMNS {
                columns
                    .push(format!("{} ILIKE ", column))
                    .push_bind_unseparated(pattern.clone());
            }
            builder.push(")");
        }

        builder.push(format!(
            " ORDER BY {} {} NULLS LAST, created_at DESC",
            filter.order_by.as_sql(),
            if filter.descending { "DESC" } else { "ASC" }
        ));

        let rows = builder
            .build_query_as::<ClaimRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Updates a claim's status only if it is still `expected`
    ///
    /// The history row is written in the same transaction. A missing claim
    /// is `NotFound`; a claim in another status is `StaleState`.
    pub async fn update_status(
        &self,
        claim_id: Uuid,
        expected: ClaimStatus,
        update: &StatusUpdate,
        history: &HistoryRow,
    ) -> Result<ClaimRow, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            UPDATE claims
            SET status = $3,
                updated_at = $4,
                reviewed_by = COALESCE($5, reviewed_by),
                reviewed_at = COALESCE($6, reviewed_at)
            WHERE claim_id = $1 AND status = $2
            RETURNING {CLAIM_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim_id)
            .bind(expected)
            .bind(update.status)
            .bind(update.updated_at)
            .bind(&update.reviewed_by)
            .bind(update.reviewed_at)
            .fetch_optional(&mut *tx)
            .await?;

        let row = match updated {
            Some(row) => row,
            None => return Err(missing_or_stale(&mut tx, claim_id, expected).await),
        };

        insert_history(&mut *tx, history).await?;
        tx.commit().await?;
        Ok(row)
    }

    /// Stores a submitted assessment: total, status, blob and history
    pub async fn submit_assessment(
        &self,
        claim_id: Uuid,
        expected: ClaimStatus,
        estimated_repair_cost: Decimal,
        assessment_data: &JsonValue,
        submitted_at: DateTime<Utc>,
        history: &HistoryRow,
    ) -> Result<ClaimRow, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            UPDATE claims
            SET estimated_repair_cost = $3,
                status = 'under_review',
                updated_at = $4
            WHERE claim_id = $1 AND status = $2
            RETURNING {CLAIM_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim_id)
            .bind(expected)
            .bind(estimated_repair_cost)
            .bind(submitted_at)
            .fetch_optional(&mut *tx)
            .await?;

        let row = match updated {
            Some(row) => row,
            None => return Err(missing_or_stale(&mut tx, claim_id, expected).await),
        };

        upsert_assessment(&mut *tx, claim_id, assessment_data, submitted_at).await?;
        insert_history(&mut *tx, history).await?;
        tx.commit().await?;
        Ok(row)
    }

    /// Replaces the assessment blob for a claim
    pub async fn upsert_assessment(
        &self,
        claim_id: Uuid,
        assessment_data: &JsonValue,
    ) -> Result<AssessmentDetailsRow, DatabaseError> {
        upsert_assessment(&self.pool, claim_id, assessment_data, Utc::now()).await
    }

    pub async fn get_assessment(
        &self,
        claim_id: Uuid,
    ) -> Result<Option<AssessmentDetailsRow>, DatabaseError> {
        let row = sqlx::query_as::<_, AssessmentDetailsRow>(
            r#"
            SELECT claim_id, assessment_data, created_at, updated_at
            FROM claim_assessment_details
            WHERE claim_id = $1
            "#,
        )
        .bind(claim_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn insert_note(&self, note: &NoteRow) -> Result<NoteRow, DatabaseError> {
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            INSERT INTO claim_notes (note_id, claim_id, note_text, created_by, created_at, note_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING note_id, claim_id, note_text, created_by, created_at, note_type
            "#,
        )
        .bind(note.note_id)
        .bind(note.claim_id)
        .bind(&note.note_text)
        .bind(&note.created_by)
        .bind(note.created_at)
        .bind(note.note_type)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list_notes(&self, claim_id: Uuid) -> Result<Vec<NoteRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT note_id, claim_id, note_text, created_by, created_at, note_type
            FROM claim_notes
            WHERE claim_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(claim_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn insert_history(&self, history: &HistoryRow) -> Result<HistoryRow, DatabaseError> {
        insert_history(&self.pool, history).await
    }

    pub async fn list_history(&self, claim_id: Uuid) -> Result<Vec<HistoryRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT history_id, claim_id, changed_by, action, field_changed,
                   old_value, new_value, created_at
            FROM claim_history
            WHERE claim_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(claim_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_ai_assessments(
        &self,
        claim_id: Uuid,
    ) -> Result<Vec<AiAssessmentRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, AiAssessmentRow>(
            r#"
            SELECT ai_assessment_id, claim_id, assessment_timestamp, damage_type,
                   damage_severity, affected_parts, estimated_cost, confidence_score,
                   ai_model_version, raw_ai_response
            FROM ai_assessments
            WHERE claim_id = $1
            ORDER BY assessment_timestamp DESC
            "#,
        )
        .bind(claim_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

async fn fetch_claim<'e, E: PgExecutor<'e>>(
    executor: E,
    claim_id: Uuid,
) -> Result<Option<ClaimRow>, DatabaseError> {
    let sql = format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_id = $1");
    let row = sqlx::query_as::<_, ClaimRow>(&sql)
        .bind(claim_id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

/// Explains why a guarded update matched no row
async fn missing_or_stale(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    claim_id: Uuid,
    expected: ClaimStatus,
) -> DatabaseError {
    match fetch_claim(&mut **tx, claim_id).await {
        Ok(Some(current)) => DatabaseError::StaleState(format!(
            "claim {} is {:?}, expected {:?}",
            claim_id, current.status, expected
        )),
        Ok(None) => DatabaseError::not_found("Claim", claim_id),
        Err(e) => e,
    }
}

async fn insert_history<'e, E: PgExecutor<'e>>(
    executor: E,
    history: &HistoryRow,
) -> Result<HistoryRow, DatabaseError> {
    let row = sqlx::query_as::<_, HistoryRow>(
        r#"
        INSERT INTO claim_history (
            history_id, claim_id, changed_by, action, field_changed,
            old_value, new_value, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING history_id, claim_id, changed_by, action, field_changed,
                  old_value, new_value, created_at
        "#,
    )
    .bind(history.history_id)
    .bind(history.claim_id)
    .bind(&history.changed_by)
    .bind(&history.action)
    .bind(&history.field_changed)
    .bind(&history.old_value)
    .bind(&history.new_value)
    .bind(history.created_at)
    .fetch_one(executor)
    .await?;
    Ok(row)
}

async fn upsert_assessment<'e, E: PgExecutor<'e>>(
    executor: E,
    claim_id: Uuid,
    assessment_data: &JsonValue,
    at: DateTime<Utc>,
) -> Result<AssessmentDetailsRow, DatabaseError> {
    let row = sqlx::query_as::<_, AssessmentDetailsRow>(
        r#"
        INSERT INTO claim_assessment_details (claim_id, assessment_data, created_at, updated_at)
        VALUES ($1, $2, $3, $3)
        ON CONFLICT (claim_id) DO UPDATE
        SET assessment_data = EXCLUDED.assessment_data,
            updated_at = EXCLUDED.updated_at
        RETURNING claim_id, assessment_data, created_at, updated_at
        "#,
    )
    .bind(claim_id)
    .bind(assessment_data)
    .bind(at)
    .fetch_one(executor)
    .await?;
    Ok(row)
}

const SEARCH_COLUMNS: [&str; 5] = [
    "claim_number",
    "policyholder_name",
    "policy_number",
    "vehicle_make",
    "vehicle_model",
];

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Claim status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "claim_status", rename_all = "snake_case")]
pub enum ClaimStatus {
    InProgress,
    UnderReview,
    RequiresManualReview,
    Approved,
    Rejected,
}

/// Note type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "note_type", rename_all = "snake_case")]
pub enum NoteType {
    General,
    FollowUp,
    Decision,
    Internal,
}

/// Orderable claim columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClaimColumn {
    #[default]
    CreatedAt,
    ClaimNumber,
    PolicyholderName,
    AccidentDate,
    Status,
    EstimatedRepairCost,
    VehicleMake,
}

impl ClaimColumn {
    fn as_sql(&self) -> &'static str {
        match self {
            ClaimColumn::CreatedAt => "created_at",
            ClaimColumn::ClaimNumber => "claim_number",
            ClaimColumn::PolicyholderName => "lower(policyholder_name)",
            ClaimColumn::AccidentDate => "accident_date",
            ClaimColumn::Status => "status::text",
            ClaimColumn::EstimatedRepairCost => "estimated_repair_cost",
            ClaimColumn::VehicleMake => "lower(vehicle_make)",
        }
    }
}

/// Listing filter
#[derive(Debug, Clone, Default)]
pub struct ClaimFilter {
    pub search: Option<String>,
    pub status: Option<ClaimStatus>,
    pub order_by: ClaimColumn,
    pub descending: bool,
}

/// Column values written by a status change
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: ClaimStatus,
    pub updated_at: DateTime<Utc>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Database row for claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimRow {
    pub claim_id: Uuid,
    pub claim_number: String,
    pub policy_number: String,
    pub policyholder_name: String,
    pub policyholder_email: Option<String>,
    pub policyholder_phone: Option<String>,
    pub accident_date: NaiveDate,
    pub license_plate: Option<String>,
    pub vehicle_vin: Option<String>,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_year: i32,
    pub status: ClaimStatus,
    pub currency: String,
    pub estimated_repair_cost: Option<Decimal>,
    pub final_approved_amount: Option<Decimal>,
    pub incident_description: Option<String>,
    pub assigned_to: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for claim note
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NoteRow {
    pub note_id: Uuid,
    pub claim_id: Uuid,
    pub note_text: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub note_type: NoteType,
}

/// Database row for claim history
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HistoryRow {
    pub history_id: Uuid,
    pub claim_id: Uuid,
    pub changed_by: String,
    pub action: String,
    pub field_changed: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Database row for the assessment blob
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AssessmentDetailsRow {
    pub claim_id: Uuid,
    pub assessment_data: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for AI assessment
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AiAssessmentRow {
    pub ai_assessment_id: Uuid,
    pub claim_id: Uuid,
    pub assessment_timestamp: DateTime<Utc>,
    pub damage_type: String,
    pub damage_severity: String,
    pub affected_parts: Vec<String>,
    pub estimated_cost: Decimal,
    pub confidence_score: Decimal,
    pub ai_model_version: String,
    pub raw_ai_response: JsonValue,
}
