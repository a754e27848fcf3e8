//! Instruments repository

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        instrument::{CreateInstrument, Instrument, InstrumentQuery, UpdateInstrument},
        InstrumentStatus,
    },
};

#[derive(Clone)]
pub struct InstrumentsRepository {
    pool: Pool<Postgres>,
}

impl InstrumentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List instruments with optional filters and pagination
    pub async fn list(&self, query: &InstrumentQuery) -> AppResult<(Vec<Instrument>, i64)> {
        let per_page = query.page_size();
        let offset = query.offset()?;

        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let mut conditions = Vec::new();
        let mut idx = 1;

        if search.is_some() {
            conditions.push(format!(
                "(name ILIKE ${0} OR model ILIKE ${0} OR serial_number ILIKE ${0} OR location ILIKE ${0})",
                idx
            ));
            idx += 1;
        }
        if query.status.is_some() {
            conditions.push(format!("status = ${}", idx));
        } else if !query.include_archived.unwrap_or(false) {
            conditions.push("status <> 'archived'".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // Count total
        let count_q = format!("SELECT COUNT(*) FROM instruments {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(ref s) = search { count_builder = count_builder.bind(s); }
        if let Some(st) = query.status { count_builder = count_builder.bind(st); }
        let total = count_builder.fetch_one(&self.pool).await?;

        // Fetch rows
        let select_q = format!(
            "SELECT * FROM instruments {} ORDER BY name, id LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, Instrument>(&select_q);
        if let Some(ref s) = search { builder = builder.bind(s); }
        if let Some(st) = query.status { builder = builder.bind(st); }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    /// All instruments, archived included (dashboard aggregation input)
    pub async fn list_all(&self) -> AppResult<Vec<Instrument>> {
        let rows = sqlx::query_as::<_, Instrument>("SELECT * FROM instruments ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get instrument by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Instrument> {
        sqlx::query_as::<_, Instrument>("SELECT * FROM instruments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::InstrumentNotFound(id))
    }

    /// Check if a serial number is already registered (case-insensitive)
    pub async fn serial_number_exists(
        &self,
        serial_number: &str,
        exclude_id: Option<Uuid>,
    ) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM instruments WHERE LOWER(serial_number) = LOWER($1) AND id != $2)",
            )
            .bind(serial_number.trim())
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM instruments WHERE LOWER(serial_number) = LOWER($1))",
            )
            .bind(serial_number.trim())
            .fetch_one(&self.pool)
            .await?
        };
        Ok(exists)
    }

    /// Insert a new instrument with its initial schedule
    pub async fn create(
        &self,
        data: &CreateInstrument,
        status: InstrumentStatus,
        last_maintenance_date: DateTime<Utc>,
        next_maintenance_date: DateTime<Utc>,
    ) -> AppResult<Instrument> {
        let row = sqlx::query_as::<_, Instrument>(
            r#"
            INSERT INTO instruments (
                name, model, serial_number, location, status,
                installation_date, last_maintenance_date, next_maintenance_date,
                maintenance_type, maintenance_interval_months, image_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(data.name.trim())
        .bind(data.model.trim())
        .bind(data.serial_number.trim())
        .bind(data.location.trim())
        .bind(status)
        .bind(data.installation_date)
        .bind(last_maintenance_date)
        .bind(next_maintenance_date)
        .bind(data.maintenance_type)
        .bind(data.maintenance_interval_months)
        .bind(&data.image_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update an instrument (only provided fields)
    pub async fn update(&self, id: Uuid, data: &UpdateInstrument) -> AppResult<Instrument> {
        let now = Utc::now();
        let mut sets = vec!["modif_date = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.model, "model");
        add_field!(data.serial_number, "serial_number");
        add_field!(data.location, "location");
        add_field!(data.status, "status");
        add_field!(data.last_maintenance_date, "last_maintenance_date");
        add_field!(data.next_maintenance_date, "next_maintenance_date");
        add_field!(data.maintenance_type, "maintenance_type");
        add_field!(data.maintenance_interval_months, "maintenance_interval_months");
        add_field!(data.image_id, "image_id");

        let query = format!(
            "UPDATE instruments SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Instrument>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.model);
        bind_field!(data.serial_number);
        bind_field!(data.location);
        bind_field!(data.status);
        bind_field!(data.last_maintenance_date);
        bind_field!(data.next_maintenance_date);
        bind_field!(data.maintenance_type);
        bind_field!(data.maintenance_interval_months);
        bind_field!(data.image_id);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::InstrumentNotFound(id))
    }

    /// Set the status of an instrument
    pub async fn set_status(&self, id: Uuid, status: InstrumentStatus) -> AppResult<Instrument> {
        sqlx::query_as::<_, Instrument>(
            "UPDATE instruments SET status = $1, modif_date = $2 WHERE id = $3 RETURNING *",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::InstrumentNotFound(id))
    }
}
