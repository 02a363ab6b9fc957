//! Company repository.

use tracing::info;
use warehouse_core::company::{Company, CompanyUpdate, NewCompany};
use warehouse_shared::types::{CompanyId, PageRequest};

use super::{delete_by_id, fetch_all, find_by_id, insert_one, paged, update_by_id};
use crate::backend::schema::COMPANIES;
use crate::backend::{Select, SharedBackend};
use crate::error::DataError;

/// Repository for customer companies.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    backend: SharedBackend,
}

impl CompanyRepository {
    /// Creates a new company repository.
    #[must_use]
    pub const fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    /// Lists companies by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn list(&self, page: Option<&PageRequest>) -> Result<Vec<Company>, DataError> {
        let query = paged(Select::table(COMPANIES).order_by("name", true), page);
        fetch_all(self.backend.as_ref(), &query).await
    }

    /// Finds a company by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn find_by_id(&self, id: CompanyId) -> Result<Option<Company>, DataError> {
        find_by_id(self.backend.as_ref(), Select::table(COMPANIES), id).await
    }

    /// Creates a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub async fn create(&self, input: NewCompany) -> Result<Company, DataError> {
        input.validate()?;
        let company: Company = insert_one(self.backend.as_ref(), COMPANIES, &input).await?;
        info!(company_id = %company.id, name = %company.name, "company created");
        Ok(company)
    }

    /// Patches a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch is empty or invalid, the company does
    /// not exist, or the update fails.
    pub async fn update(&self, id: CompanyId, input: CompanyUpdate) -> Result<Company, DataError> {
        input.validate()?;
        update_by_id(self.backend.as_ref(), COMPANIES, "company", id, &input).await
    }

    /// Deletes a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the company does not exist or is still referenced
    /// by returns.
    pub async fn delete(&self, id: CompanyId) -> Result<(), DataError> {
        delete_by_id(self.backend.as_ref(), COMPANIES, "company", id).await?;
        info!(company_id = %id, "company deleted");
        Ok(())
    }
}
