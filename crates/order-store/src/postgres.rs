use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::order::now;
use crate::{
    CategoryId, NewOrder, Operation, Order, OrderChanges, OrderFilter, OrderId, OrderStatus,
    Result, StoreError, UserId, store::OrderStore,
};

const ORDER_COLUMNS: &str = "id, title, description, price, address, longitude, latitude, \
     category_id, client_id, master_id, status, created_at, updated_at";

/// PostgreSQL-backed order store implementation.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    /// Explains why a guarded update matched no row.
    async fn rejected_update(&self, id: OrderId) -> StoreError {
        let status: Option<String> =
            match sqlx::query_scalar("SELECT status FROM orders WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
            {
                Ok(status) => status,
                Err(e) => return StoreError::failed(Operation::Update, e),
            };

        match status.map(|s| s.parse::<OrderStatus>()) {
            None => StoreError::NotFound(id),
            Some(Ok(current)) => StoreError::UnexpectedStatus { id, current },
            Some(Err(e)) => StoreError::failed(Operation::Update, e),
        }
    }

    fn row_to_order(row: PgRow) -> std::result::Result<Order, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            address: row.try_get("address")?,
            longitude: row.try_get("longitude")?,
            latitude: row.try_get("latitude")?,
            category_id: CategoryId::from_uuid(row.try_get::<Uuid, _>("category_id")?),
            client_id: UserId::from_uuid(row.try_get::<Uuid, _>("client_id")?),
            master_id: row
                .try_get::<Option<Uuid>, _>("master_id")?
                .map(UserId::from_uuid),
            status,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn get(&self, id: OrderId) -> Result<Order> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");

        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::failed(Operation::Get, e))?
            .ok_or(StoreError::NotFound(id))?;

        Self::row_to_order(row).map_err(|e| StoreError::failed(Operation::Get, e))
    }

    async fn list(&self, filter: OrderFilter) -> Result<Vec<Order>> {
        let mut sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE 1=1");
        let mut param_count = 0;

        // Only supplied predicates become clauses
        if !filter.category_ids().is_empty() {
            param_count += 1;
            sql.push_str(&format!(" AND category_id = ANY(${param_count})"));
        }
        if filter.status_predicate().is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND status = ${param_count}"));
        }
        if filter.client_id().is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND client_id = ${param_count}"));
        }
        if filter.master_id().is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND master_id = ${param_count}"));
        }

        sql.push_str(" ORDER BY created_at ASC, id ASC");

        let mut query = sqlx::query(&sql);

        if !filter.category_ids().is_empty() {
            let ids: Vec<Uuid> = filter.category_ids().iter().map(|c| c.as_uuid()).collect();
            query = query.bind(ids);
        }
        if let Some(status) = filter.status_predicate() {
            query = query.bind(status.as_str());
        }
        if let Some(client_id) = filter.client_id() {
            query = query.bind(client_id.as_uuid());
        }
        if let Some(master_id) = filter.master_id() {
            query = query.bind(master_id.as_uuid());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::failed(Operation::List, e))?;

        rows.into_iter()
            .map(Self::row_to_order)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| StoreError::failed(Operation::List, e))
    }

    async fn create(&self, order: NewOrder) -> Result<Order> {
        let order = order.into_order(now());
        let sql = format!(
            r#"
            INSERT INTO orders ({ORDER_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(order.id.as_uuid())
            .bind(&order.title)
            .bind(&order.description)
            .bind(order.price)
            .bind(&order.address)
            .bind(&order.longitude)
            .bind(&order.latitude)
            .bind(order.category_id.as_uuid())
            .bind(order.client_id.as_uuid())
            .bind(order.master_id.map(|m| m.as_uuid()))
            .bind(order.status.as_str())
            .bind(order.created_at)
            .bind(order.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return StoreError::AlreadyExists(order.id);
                }
                StoreError::failed(Operation::Create, e)
            })?;

        Self::row_to_order(row).map_err(|e| StoreError::failed(Operation::Create, e))
    }

    async fn update(&self, id: OrderId, changes: OrderChanges) -> Result<Order> {
        // $1 is the order id; SET clauses follow in field order
        let mut assignments = Vec::new();
        let mut param_count = 1;

        let text_fields = [
            ("title", changes.title.as_deref()),
            ("description", changes.description.as_deref()),
            ("address", changes.address.as_deref()),
            ("longitude", changes.longitude.as_deref()),
            ("latitude", changes.latitude.as_deref()),
            ("status", changes.status.as_ref().map(OrderStatus::as_str)),
        ];
        for (column, value) in &text_fields {
            if value.is_some() {
                param_count += 1;
                assignments.push(format!("{column} = ${param_count}"));
            }
        }

        if changes.price.is_some() {
            param_count += 1;
            assignments.push(format!("price = ${param_count}"));
        }

        let uuid_fields = [
            ("category_id", changes.category_id.map(|c| c.as_uuid())),
            ("client_id", changes.client_id.map(|c| c.as_uuid())),
            ("master_id", changes.master_id.map(|m| m.as_uuid())),
        ];
        for (column, value) in &uuid_fields {
            if value.is_some() {
                param_count += 1;
                assignments.push(format!("{column} = ${param_count}"));
            }
        }

        // updated_at strictly increases even if the clock has not moved
        param_count += 1;
        assignments.push(format!(
            "updated_at = GREATEST(${param_count}, updated_at + INTERVAL '1 microsecond')"
        ));

        let mut sql = format!("UPDATE orders SET {} WHERE id = $1", assignments.join(", "));
        let allowed_from: Option<Vec<&str>> = changes
            .allowed_from()
            .map(|statuses| statuses.iter().map(OrderStatus::as_str).collect());
        if allowed_from.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND status = ANY(${param_count})"));
        }
        sql.push_str(&format!(" RETURNING {ORDER_COLUMNS}"));

        let mut query = sqlx::query(&sql).bind(id.as_uuid());
        for value in text_fields.iter().filter_map(|(_, value)| *value) {
            query = query.bind(value);
        }
        if let Some(price) = changes.price {
            query = query.bind(price);
        }
        for value in uuid_fields.iter().filter_map(|(_, value)| *value) {
            query = query.bind(value);
        }
        query = query.bind(now());
        if let Some(statuses) = &allowed_from {
            query = query.bind(statuses.clone());
        }

        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::failed(Operation::Update, e))?;

        match row {
            Some(row) => {
                Self::row_to_order(row).map_err(|e| StoreError::failed(Operation::Update, e))
            }
            None if allowed_from.is_some() => Err(self.rejected_update(id).await),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn delete(&self, id: OrderId) -> Result<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::failed(Operation::Delete, e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
