use crate::error::{DatabaseError, Result};
use crate::scope::ScopeFilter;
use crate::store::EntityStore;
use async_trait::async_trait;
use saas_models::{Searchable, TenantOwned};
use sqlx::postgres::{PgHasArrayType, PgRow};
use sqlx::query_builder::Separated;
use sqlx::{Encode, FromRow, PgPool, Postgres, QueryBuilder, Type};
use std::marker::PhantomData;

/// Row mapping for entities persisted through [`PgStore`].
pub trait PgEntity: TenantOwned + for<'r> FromRow<'r, PgRow> + Unpin {
    /// Insertable columns, in the order [`PgEntity::push_values`] binds them.
    const COLUMNS: &'static [&'static str];

    fn push_values<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>);
}

/// Postgres-backed store. Every statement carries the scope predicate.
pub struct PgStore<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> PgStore<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl<E> Clone for PgStore<E> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

/// Append `<tenant_col> = $n [AND <id_col> = ANY($m)]`, or `1 = 0` for deny-all.
fn push_scope<'args, E>(qb: &mut QueryBuilder<'args, Postgres>, filter: &ScopeFilter<E>)
where
    E: TenantOwned,
    E::Id: for<'q> Encode<'q, Postgres> + Type<Postgres> + PgHasArrayType,
{
    let Some(tenant_id) = filter.tenant_id() else {
        qb.push("1 = 0");
        return;
    };

    qb.push(E::TENANT_COLUMN).push(" = ").push_bind(tenant_id);

    if let Some(ids) = filter.ids() {
        if ids.is_empty() {
            qb.push(" AND 1 = 0");
        } else {
            qb.push(" AND ")
                .push(E::ID_COLUMN)
                .push(" = ANY(")
                .push_bind(ids.to_vec())
                .push(")");
        }
    }
}

fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn select_query<E>(filter: &ScopeFilter<E>) -> QueryBuilder<'static, Postgres>
where
    E: TenantOwned,
    E::Id: for<'q> Encode<'q, Postgres> + Type<Postgres> + PgHasArrayType,
{
    let mut qb = QueryBuilder::new(format!("SELECT * FROM {} WHERE ", E::TABLE));
    push_scope(&mut qb, filter);
    qb
}

fn count_query<E>(filter: &ScopeFilter<E>) -> QueryBuilder<'static, Postgres>
where
    E: TenantOwned,
    E::Id: for<'q> Encode<'q, Postgres> + Type<Postgres> + PgHasArrayType,
{
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {} WHERE ", E::TABLE));
    push_scope(&mut qb, filter);
    qb
}

fn search_query<E>(filter: &ScopeFilter<E>, keyword: &str) -> QueryBuilder<'static, Postgres>
where
    E: Searchable,
    E::Id: for<'q> Encode<'q, Postgres> + Type<Postgres> + PgHasArrayType,
{
    let mut qb = select_query(filter);

    if E::SEARCH_COLUMNS.is_empty() {
        qb.push(" AND 1 = 0");
        return qb;
    }

    let pattern = like_pattern(keyword);
    qb.push(" AND (");
    for (i, column) in E::SEARCH_COLUMNS.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(*column).push(" ILIKE ").push_bind(pattern.clone());
    }
    qb.push(")");
    qb
}

/// Scoped lookup on the entity's unique column, compared case-insensitively.
/// `None` when the entity declares no unique column.
fn unique_key_query<E>(filter: &ScopeFilter<E>, key: &str) -> Option<QueryBuilder<'static, Postgres>>
where
    E: TenantOwned,
    E::Id: for<'q> Encode<'q, Postgres> + Type<Postgres> + PgHasArrayType,
{
    let column = E::UNIQUE_COLUMN?;
    let mut qb = select_query(filter);
    qb.push(" AND LOWER(")
        .push(column)
        .push(") = ")
        .push_bind(key.to_lowercase())
        .push(" LIMIT 1");
    Some(qb)
}

/// Insert, or update in place when the stored row has the same owner.
///
/// A conflicting row held by another tenant makes the statement return no
/// row; the owner and id columns are never part of the update.
fn upsert_query<E: PgEntity>(entity: &E) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "INSERT INTO {} ({}) ",
        E::TABLE,
        E::COLUMNS.join(", ")
    ));
    qb.push_values(std::iter::once(entity), |mut row, e| e.push_values(&mut row));

    let assignments: Vec<String> = E::COLUMNS
        .iter()
        .filter(|column| **column != E::ID_COLUMN && **column != E::TENANT_COLUMN)
        .map(|column| format!("{column} = EXCLUDED.{column}"))
        .collect();

    qb.push(format!(
        " ON CONFLICT ({id}) DO UPDATE SET {sets} WHERE {table}.{tenant} = EXCLUDED.{tenant} RETURNING *",
        id = E::ID_COLUMN,
        sets = assignments.join(", "),
        table = E::TABLE,
        tenant = E::TENANT_COLUMN,
    ));
    qb
}

fn delete_query<E>(filter: &ScopeFilter<E>) -> QueryBuilder<'static, Postgres>
where
    E: TenantOwned,
    E::Id: for<'q> Encode<'q, Postgres> + Type<Postgres> + PgHasArrayType,
{
    let mut qb = QueryBuilder::new(format!("DELETE FROM {} WHERE ", E::TABLE));
    push_scope(&mut qb, filter);
    qb
}

#[async_trait]
impl<E> EntityStore<E> for PgStore<E>
where
    E: PgEntity,
    E::Id: for<'q> Encode<'q, Postgres> + Type<Postgres> + PgHasArrayType,
{
    async fn find_where(&self, filter: &ScopeFilter<E>) -> Result<Vec<E>> {
        let rows = select_query(filter)
            .build_query_as::<E>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn count_where(&self, filter: &ScopeFilter<E>) -> Result<i64> {
        let count = count_query(filter)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn search_where(&self, filter: &ScopeFilter<E>, keyword: &str) -> Result<Vec<E>>
    where
        E: Searchable,
    {
        let rows = search_query(filter, keyword)
            .build_query_as::<E>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_unique_key(&self, filter: &ScopeFilter<E>, key: &str) -> Result<Option<E>> {
        let Some(mut qb) = unique_key_query(filter, key) else {
            return Ok(None);
        };
        let row = qb.build_query_as::<E>().fetch_optional(&self.pool).await?;
        Ok(row)
    }

    async fn save(&self, entity: E) -> Result<E> {
        let saved = upsert_query(&entity)
            .build_query_as::<E>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e {
                    if db.is_unique_violation() {
                        return DatabaseError::duplicate(
                            E::ENTITY,
                            db.constraint().unwrap_or("unique key"),
                        );
                    }
                }
                DatabaseError::from(e)
            })?;

        saved.ok_or_else(|| DatabaseError::ownership(E::ENTITY, &entity.id().to_string()))
    }

    async fn delete_where(&self, filter: &ScopeFilter<E>) -> Result<u64> {
        let result = delete_query(filter).build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
