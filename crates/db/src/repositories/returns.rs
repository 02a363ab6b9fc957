//! Return repository.

use serde::Deserialize;
use tracing::info;
use warehouse_core::WorkStatus;
use warehouse_core::returns::{NewReturn, Return, ReturnUpdate, ReturnWithCompany};
use warehouse_shared::types::{PageRequest, ReturnId};

use super::{delete_by_id, fetch_all, find_by_id, insert_one, paged, update_by_id};
use crate::backend::schema::{COMPANIES, RETURNS};
use crate::backend::{Embed, Select, SharedBackend};
use crate::error::DataError;

/// Filter for listing returns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReturnFilter {
    /// Only returns in this status.
    #[serde(default)]
    pub status: Option<WorkStatus>,
}

/// Repository for product returns.
#[derive(Debug, Clone)]
pub struct ReturnRepository {
    backend: SharedBackend,
}

fn with_company() -> Select {
    Select::table(RETURNS).embed(Embed::new(COMPANIES, &["name", "contact_person"]))
}

impl ReturnRepository {
    /// Creates a new return repository.
    #[must_use]
    pub const fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    /// Lists returns with their company, newest return date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn list(
        &self,
        filter: &ReturnFilter,
        page: Option<&PageRequest>,
    ) -> Result<Vec<ReturnWithCompany>, DataError> {
        let query = with_company()
            .filter_opt("status", filter.status.map(WorkStatus::as_str))
            .order_by("return_date", false);
        fetch_all(self.backend.as_ref(), &paged(query, page)).await
    }

    /// Finds a return by ID, with its company.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn find_by_id(&self, id: ReturnId) -> Result<Option<ReturnWithCompany>, DataError> {
        find_by_id(self.backend.as_ref(), with_company(), id).await
    }

    /// Creates a return.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid, the return code is taken,
    /// the company does not exist, or the insert fails.
    pub async fn create(&self, input: NewReturn) -> Result<Return, DataError> {
        input.validate()?;
        let created: Return = insert_one(self.backend.as_ref(), RETURNS, &input).await?;
        info!(return_id = %created.return_id, "return created");
        Ok(created)
    }

    /// Patches a return.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch is empty or invalid, the return does not
    /// exist, or the update fails.
    pub async fn update(&self, id: ReturnId, input: ReturnUpdate) -> Result<Return, DataError> {
        input.validate()?;
        update_by_id(self.backend.as_ref(), RETURNS, "return", id, &input).await
    }

    /// Sets only the status of a return.
    ///
    /// # Errors
    ///
    /// Returns an error if the return does not exist or the update fails.
    pub async fn update_status(&self, id: ReturnId, status: WorkStatus) -> Result<Return, DataError> {
        let updated: Return =
            update_by_id(self.backend.as_ref(), RETURNS, "return", id, &ReturnUpdate::status(status)).await?;
        info!(return_id = %updated.return_id, %status, "return status changed");
        Ok(updated)
    }

    /// Deletes a return.
    ///
    /// # Errors
    ///
    /// Returns an error if the return does not exist or the delete fails.
    pub async fn delete(&self, id: ReturnId) -> Result<(), DataError> {
        delete_by_id(self.backend.as_ref(), RETURNS, "return", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::CompanyRepository;
    use crate::repositories::test_support::backend;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use warehouse_core::company::NewCompany;

    fn new_return(code: &str, day: u32) -> NewReturn {
        NewReturn {
            return_id: code.to_string(),
            company_id: None,
            return_date: NaiveDate::from_ymd_opt(2025, 8, day).unwrap(),
            reason: Some("Defective units".to_string()),
            total_items: 25,
            total_value: dec!(12500.00),
            status: WorkStatus::Pending,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_list_joins_company_newest_first() {
        let backend = backend();
        let company = CompanyRepository::new(backend.clone())
            .create(NewCompany {
                name: "TechCorp Inc.".into(),
                contact_person: Some("John Smith".into()),
                ..NewCompany::default()
            })
            .await
            .unwrap();
        let repo = ReturnRepository::new(backend);
        repo.create(NewReturn {
            company_id: Some(company.id),
            ..new_return("RET-2025-001", 5)
        })
        .await
        .unwrap();
        repo.create(new_return("RET-2025-002", 6)).await.unwrap();

        let rows = repo.list(&ReturnFilter::default(), None).await.unwrap();
        assert_eq!(rows[0].record.return_id, "RET-2025-002");
        assert!(rows[0].companies.is_none());
        let joined = rows[1].companies.as_ref().unwrap();
        assert_eq!(joined.name, "TechCorp Inc.");
        assert_eq!(joined.contact_person.as_deref(), Some("John Smith"));
    }

    #[tokio::test]
    async fn test_status_update_affects_only_that_row() {
        let repo = ReturnRepository::new(backend());
        let first = repo.create(new_return("RET-2025-001", 5)).await.unwrap();
        let second = repo.create(new_return("RET-2025-002", 6)).await.unwrap();

        repo.update_status(first.id, WorkStatus::Completed).await.unwrap();

        let rows = repo.list(&ReturnFilter::default(), None).await.unwrap();
        let status_of = |id| {
            rows.iter()
                .find(|r| r.record.id == id)
                .map(|r| r.record.status)
                .unwrap()
        };
        assert_eq!(status_of(first.id), WorkStatus::Completed);
        assert_eq!(status_of(second.id), WorkStatus::Pending);
    }

    #[tokio::test]
    async fn test_filter_by_status() {
        let repo = ReturnRepository::new(backend());
        let first = repo.create(new_return("RET-2025-001", 5)).await.unwrap();
        repo.create(new_return("RET-2025-002", 6)).await.unwrap();
        repo.update_status(first.id, WorkStatus::InProgress).await.unwrap();

        let filter = ReturnFilter {
            status: Some(WorkStatus::InProgress),
        };
        let rows = repo.list(&filter, None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.id, first.id);
    }

    #[tokio::test]
    async fn test_duplicate_return_code_conflicts() {
        let repo = ReturnRepository::new(backend());
        repo.create(new_return("RET-2025-001", 5)).await.unwrap();
        let err = repo.create(new_return("RET-2025-001", 6)).await.unwrap_err();
        assert!(matches!(err, DataError::Backend { status: Some(409), .. }));
    }

    #[tokio::test]
    async fn test_pagination_window() {
        let repo = ReturnRepository::new(backend());
        for day in 1..=5 {
            repo.create(new_return(&format!("RET-2025-00{day}"), day)).await.unwrap();
        }
        let page = PageRequest::new(2, 2);
        let rows = repo.list(&ReturnFilter::default(), Some(&page)).await.unwrap();
        let codes: Vec<_> = rows.iter().map(|r| r.record.return_id.as_str()).collect();
        assert_eq!(codes, ["RET-2025-003", "RET-2025-002"]);
    }
}
