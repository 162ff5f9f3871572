//! # Investment Ledger
//!
//! Records investments from investors into vendors and renders the signed
//! agreement artifact. The insert and the agreement render are deliberately
//! two phases: the row is durable first, then the PDF is written against the
//! row's id and the `agreement_pdf` reference is back-filled with a single
//! field-scoped update. A row with `agreement_pdf = NULL` is therefore an
//! accepted investment whose artifact render failed, never a phantom.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::artifacts::{self, ArtifactStore};
use crate::models::investment::{
    ActiveModel as InvestmentActiveModel, Column, Entity as Investment, Model as InvestmentModel,
};
use crate::models::user::{Entity as User, Model as UserModel};
use crate::pdf::{self, AgreementData};
use crate::repositories::RepositoryError;

/// Smallest amount an investor may commit, in account currency units.
pub const MINIMUM_INVESTMENT: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// Guaranteed return applied to every investment.
pub const DEFAULT_RETURN_PERCENT: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Standard terms recorded on every investment row.
pub const DEFAULT_TERMS: &str = "Minimum investment \u{20b9}5000, guaranteed return 5% for 1 year";

/// An investment row joined with the usernames on both sides.
#[derive(Debug, Clone)]
pub struct InvestmentRecord {
    pub investment: InvestmentModel,
    pub investor_username: String,
    pub vendor_username: String,
}

/// Repository for investment database operations
pub struct InvestmentRepository<'a> {
    db: &'a DatabaseConnection,
    artifacts: &'a ArtifactStore,
}

impl<'a> InvestmentRepository<'a> {
    pub fn new(db: &'a DatabaseConnection, artifacts: &'a ArtifactStore) -> Self {
        Self { db, artifacts }
    }

    /// Record an investment and render its agreement PDF.
    ///
    /// Amount validation is the caller's concern; this method persists
    /// whatever it is handed. The returned model carries the artifact
    /// reference when the render succeeded.
    pub async fn record_investment(
        &self,
        investor: &UserModel,
        vendor: &UserModel,
        amount: Decimal,
    ) -> Result<InvestmentModel, RepositoryError> {
        let id = Uuid::new_v4();
        let date_invested = Utc::now().fixed_offset();

        let investment = InvestmentActiveModel {
            id: Set(id),
            investor_id: Set(investor.id),
            vendor_id: Set(vendor.id),
            amount: Set(amount),
            return_percent: Set(DEFAULT_RETURN_PERCENT),
            terms: Set(DEFAULT_TERMS.to_string()),
            date_invested: Set(date_invested),
            agreement_pdf: Set(None),
        };
        let inserted = investment.insert(self.db).await?;

        let pdf_bytes = pdf::render_agreement_pdf(&AgreementData {
            investor_name: &investor.username,
            vendor_name: &vendor.username,
            amount,
            return_percent: DEFAULT_RETURN_PERCENT,
            terms: DEFAULT_TERMS,
            date_invested,
        })
        .map_err(RepositoryError::artifact)?;

        let reference = self
            .artifacts
            .write(
                artifacts::INVESTMENT_AGREEMENTS,
                &format!("investment_{}.pdf", id),
                &pdf_bytes,
            )
            .map_err(RepositoryError::artifact)?;

        let mut update = inserted.into_active_model();
        update.agreement_pdf = Set(Some(reference));
        Ok(update.update(self.db).await?)
    }

    /// Investments made by an investor, newest first
    pub async fn list_for_investor(
        &self,
        investor_id: Uuid,
    ) -> Result<Vec<InvestmentRecord>, RepositoryError> {
        let rows = Investment::find()
            .filter(Column::InvestorId.eq(investor_id))
            .order_by_desc(Column::DateInvested)
            .all(self.db)
            .await?;
        self.join_usernames(rows).await
    }

    /// Investments received by a vendor, newest first
    pub async fn list_for_vendor(
        &self,
        vendor_id: Uuid,
    ) -> Result<Vec<InvestmentRecord>, RepositoryError> {
        let rows = Investment::find()
            .filter(Column::VendorId.eq(vendor_id))
            .order_by_desc(Column::DateInvested)
            .all(self.db)
            .await?;
        self.join_usernames(rows).await
    }

    async fn join_usernames(
        &self,
        rows: Vec<InvestmentModel>,
    ) -> Result<Vec<InvestmentRecord>, RepositoryError> {
        let mut user_ids: Vec<Uuid> = rows
            .iter()
            .flat_map(|r| [r.investor_id, r.vendor_id])
            .collect();
        user_ids.sort();
        user_ids.dedup();

        let usernames: HashMap<Uuid, String> = User::find()
            .filter(crate::models::user::Column::Id.is_in(user_ids))
            .all(self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        let lookup = |id: Uuid| usernames.get(&id).cloned().unwrap_or_default();

        Ok(rows
            .into_iter()
            .map(|investment| InvestmentRecord {
                investor_username: lookup(investment.investor_id),
                vendor_username: lookup(investment.vendor_id),
                investment,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use crate::repositories::{CreateAccountRequest, UserRepository};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    async fn setup_test_db() -> DatabaseConnection {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1);
        let db = Database::connect(opt).await.expect("Failed to init test DB");
        Migrator::up(&db, None).await.expect("Failed to migrate");
        db
    }

    async fn create_user(db: &DatabaseConnection, username: &str, role: Role) -> UserModel {
        UserRepository::new(db)
            .create_account(CreateAccountRequest {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                phone: "5550001".to_string(),
                national_id: format!("NID-{}", username),
                password: "s3cret-pass".to_string(),
                role,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_record_investment_writes_row_and_agreement() {
        let db = setup_test_db().await;
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let repo = InvestmentRepository::new(&db, &store);

        let investor = create_user(&db, "ivy", Role::Investor).await;
        let vendor = create_user(&db, "vera", Role::Vendor).await;

        let amount = Decimal::new(10_000, 0);
        let investment = repo
            .record_investment(&investor, &vendor, amount)
            .await
            .unwrap();

        assert_eq!(investment.amount, amount);
        assert_eq!(investment.return_percent, DEFAULT_RETURN_PERCENT);
        assert_eq!(investment.terms, DEFAULT_TERMS);
        // The stored terms keep the rupee marker; only the rendered PDF
        // transliterates it.
        assert!(investment.terms.contains('\u{20b9}'));

        let reference = investment.agreement_pdf.expect("agreement reference");
        assert_eq!(
            reference,
            format!("investment_agreements/investment_{}.pdf", investment.id)
        );
        let bytes = store.read(&reference).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_listings_are_scoped_and_newest_first() {
        let db = setup_test_db().await;
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let repo = InvestmentRepository::new(&db, &store);

        let investor = create_user(&db, "ivy", Role::Investor).await;
        let other_investor = create_user(&db, "iris", Role::Investor).await;
        let vendor = create_user(&db, "vera", Role::Vendor).await;

        let first = repo
            .record_investment(&investor, &vendor, Decimal::new(5_000, 0))
            .await
            .unwrap();
        let second = repo
            .record_investment(&investor, &vendor, Decimal::new(7_500, 0))
            .await
            .unwrap();
        repo.record_investment(&other_investor, &vendor, Decimal::new(6_000, 0))
            .await
            .unwrap();

        let mine = repo.list_for_investor(investor.id).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine[0].investment.date_invested >= mine[1].investment.date_invested);
        let ids: Vec<Uuid> = mine.iter().map(|r| r.investment.id).collect();
        assert!(ids.contains(&first.id) && ids.contains(&second.id));
        assert_eq!(mine[0].investor_username, "ivy");
        assert_eq!(mine[0].vendor_username, "vera");

        let received = repo.list_for_vendor(vendor.id).await.unwrap();
        assert_eq!(received.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let db = setup_test_db().await;
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let repo = InvestmentRepository::new(&db, &store);

        let investor = create_user(&db, "ivy", Role::Investor).await;
        assert!(repo.list_for_investor(investor.id).await.unwrap().is_empty());
    }
}
