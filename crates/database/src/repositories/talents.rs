use crate::scope::TenantScopedRepository;
use crate::store::PgEntity;
use saas_models::Talent;
use sqlx::query_builder::Separated;
use sqlx::Postgres;

pub type TalentRepository<S> = TenantScopedRepository<Talent, S>;

impl PgEntity for Talent {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "customer_id",
        "first_name",
        "last_name",
        "email",
        "phone",
        "skills",
        "experience",
        "education",
        "date_of_birth",
        "location",
        "linkedin_url",
        "github_url",
        "portfolio_url",
        "resume_url",
        "current_position",
        "desired_position",
        "salary_expectation",
        "availability",
        "notes",
        "created_at",
        "updated_at",
    ];

    fn push_values<'args>(&self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.customer_id)
            .push_bind(self.first_name.clone())
            .push_bind(self.last_name.clone())
            .push_bind(self.email.clone())
            .push_bind(self.phone.clone())
            .push_bind(self.skills.clone())
            .push_bind(self.experience.clone())
            .push_bind(self.education.clone())
            .push_bind(self.date_of_birth)
            .push_bind(self.location.clone())
            .push_bind(self.linkedin_url.clone())
            .push_bind(self.github_url.clone())
            .push_bind(self.portfolio_url.clone())
            .push_bind(self.resume_url.clone())
            .push_bind(self.current_position.clone())
            .push_bind(self.desired_position.clone())
            .push_bind(self.salary_expectation)
            .push_bind(self.availability.clone())
            .push_bind(self.notes.clone())
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}
