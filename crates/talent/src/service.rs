use crate::error::{Result, ServiceError};
use saas_database::{EntityStore, TalentRepository, TenantScopedRepository};
use saas_models::{NewTalent, Talent, TenantId, TenantOwned, UpdateTalent};
use saas_tenant::TenantContext;
use uuid::Uuid;
use validator::Validate;

/// Talent use cases for one customer.
///
/// Every call takes the caller's customer id explicitly in addition to the
/// request's [`TenantContext`]. Both must agree, and every row handed back is
/// checked against the explicit id, so a context that was never propagated
/// (or was propagated wrongly) still cannot expose another customer's data.
pub struct TalentService<S> {
    repo: TalentRepository<S>,
}

impl<S> TalentService<S>
where
    S: EntityStore<Talent>,
{
    pub fn new(store: S) -> Self {
        Self {
            repo: TenantScopedRepository::new(store),
        }
    }

    pub fn repository(&self) -> &TalentRepository<S> {
        &self.repo
    }

    fn check_customer(&self, ctx: &TenantContext, customer_id: TenantId) -> Result<()> {
        match ctx.get() {
            None => Err(ServiceError::UnresolvedTenant),
            Some(tenant_id) if tenant_id == customer_id => Ok(()),
            Some(tenant_id) => {
                tracing::warn!(
                    tenant_id = %tenant_id,
                    customer_id = %customer_id,
                    "Customer id does not match tenant context"
                );
                Err(ServiceError::NotFound(Talent::ENTITY))
            }
        }
    }

    fn db_err(err: saas_database::DatabaseError) -> ServiceError {
        ServiceError::from_database(Talent::ENTITY, err)
    }

    async fn ensure_unique_email(
        &self,
        ctx: &TenantContext,
        email: &str,
        except: Option<Uuid>,
    ) -> Result<()> {
        let existing = self
            .repo
            .find_by_unique_key(ctx, email)
            .await
            .map_err(Self::db_err)?;

        if matches!(existing, Some(t) if Some(t.id) != except) {
            return Err(ServiceError::Duplicate(format!(
                "Talent with email {} already exists",
                email
            )));
        }
        Ok(())
    }

    pub async fn list(&self, ctx: &TenantContext, customer_id: TenantId) -> Result<Vec<Talent>> {
        self.check_customer(ctx, customer_id)?;

        let mut talents = self.repo.find_all(ctx).await.map_err(Self::db_err)?;
        talents.retain(|t| t.is_owned_by(customer_id));
        Ok(talents)
    }

    pub async fn get(&self, ctx: &TenantContext, id: Uuid, customer_id: TenantId) -> Result<Talent> {
        self.check_customer(ctx, customer_id)?;

        self.repo
            .find_by_id(ctx, id)
            .await
            .map_err(Self::db_err)?
            .filter(|t| t.is_owned_by(customer_id))
            .ok_or(ServiceError::NotFound(Talent::ENTITY))
    }

    pub async fn create(
        &self,
        ctx: &TenantContext,
        customer_id: TenantId,
        input: NewTalent,
    ) -> Result<Talent> {
        self.check_customer(ctx, customer_id)?;
        input.validate()?;
        self.ensure_unique_email(ctx, &input.email, None).await?;

        // Tenancy is stamped here, before the first save
        let talent = Talent::new(customer_id, input);
        let saved = self.repo.save(ctx, talent).await.map_err(Self::db_err)?;

        tracing::info!(talent_id = %saved.id, customer_id = %customer_id, "Talent created");
        Ok(saved)
    }

    pub async fn update(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        customer_id: TenantId,
        update: UpdateTalent,
    ) -> Result<Talent> {
        update.validate()?;
        let mut talent = self.get(ctx, id, customer_id).await?;

        if let Some(email) = update.email.as_deref() {
            if !email.eq_ignore_ascii_case(&talent.email) {
                self.ensure_unique_email(ctx, email, Some(id)).await?;
            }
        }

        talent.apply(update);
        let saved = self.repo.save(ctx, talent).await.map_err(Self::db_err)?;

        tracing::info!(talent_id = %id, customer_id = %customer_id, "Talent updated");
        Ok(saved)
    }

    pub async fn delete(&self, ctx: &TenantContext, id: Uuid, customer_id: TenantId) -> Result<()> {
        let talent = self.get(ctx, id, customer_id).await?;
        self.repo.delete(ctx, talent.id).await.map_err(Self::db_err)?;

        tracing::info!(talent_id = %id, customer_id = %customer_id, "Talent deleted");
        Ok(())
    }

    pub async fn search(
        &self,
        ctx: &TenantContext,
        customer_id: TenantId,
        keyword: &str,
    ) -> Result<Vec<Talent>> {
        self.check_customer(ctx, customer_id)?;

        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ServiceError::Validation("keyword is required".to_string()));
        }

        let mut talents = self.repo.search(ctx, keyword).await.map_err(Self::db_err)?;
        talents.retain(|t| t.is_owned_by(customer_id));
        Ok(talents)
    }

    pub async fn count(&self, ctx: &TenantContext, customer_id: TenantId) -> Result<i64> {
        self.check_customer(ctx, customer_id)?;
        self.repo.count(ctx).await.map_err(Self::db_err)
    }
}
