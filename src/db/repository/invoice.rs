//! Invoice Repository

use chrono::Utc;

use super::{BaseRepository, RepoError, RepoResult, decode_rows};
use crate::db::DbService;
use crate::db::models::{Invoice, InvoiceCreate, InvoiceUpdate, PaymentStatus, new_public_id};

const TABLE: &str = "invoice";

#[derive(Clone)]
pub struct InvoiceRepository {
    base: BaseRepository,
}

impl InvoiceRepository {
    pub fn new(db: DbService) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Invoice>> {
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM invoice ORDER BY created_at")
                    .await?;
                Ok(decode_rows(result.take(0), TABLE))
            })
            .await
    }

    pub async fn find_by_invoice_id(&self, invoice_id: &str) -> RepoResult<Option<Invoice>> {
        let invoice_id = invoice_id.to_string();
        self.base
            .read(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM invoice WHERE invoice_id = $invoice_id LIMIT 1")
                    .bind(("invoice_id", invoice_id))
                    .await?;
                let invoices: Vec<Invoice> = result.take(0)?;
                Ok(invoices.into_iter().next())
            })
            .await
    }

    pub async fn create(&self, data: InvoiceCreate) -> RepoResult<Invoice> {
        let now = Utc::now();
        let invoice = Invoice {
            id: None,
            invoice_id: new_public_id(),
            order_id: data.order_id,
            payment_method: data.payment_method,
            payment_status: data.payment_status.unwrap_or(PaymentStatus::Pending),
            payment_due_date: now,
            created_at: now,
            updated_at: now,
        };

        self.base
            .write(async {
                let created: Option<Invoice> =
                    self.base.db().create(TABLE).content(invoice).await?;
                created.ok_or_else(|| RepoError::Database("Failed to create invoice".to_string()))
            })
            .await
    }

    pub async fn update(&self, invoice_id: &str, data: InvoiceUpdate) -> RepoResult<Invoice> {
        let existing = self
            .find_by_invoice_id(invoice_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Invoice {} not found", invoice_id)))?;

        let thing = existing.id.clone().ok_or_else(|| {
            RepoError::Database("Invoice record missing internal id".to_string())
        })?;

        let payment_method = match data.payment_method {
            Some(method) => Some(method),
            None => existing.payment_method,
        };
        let payment_status = data.payment_status.unwrap_or(existing.payment_status);
        let updated_at = Utc::now();

        self.base
            .write(async {
                let mut result = self
                    .base
                    .db()
                    .query(
                        "UPDATE $thing SET payment_method = $payment_method, \
                         payment_status = $payment_status, updated_at = $updated_at \
                         RETURN AFTER",
                    )
                    .bind(("thing", thing))
                    .bind(("payment_method", payment_method))
                    .bind(("payment_status", payment_status))
                    .bind(("updated_at", updated_at))
                    .await?;
                let updated: Vec<Invoice> = result.take(0)?;
                updated
                    .into_iter()
                    .next()
                    .ok_or_else(|| RepoError::NotFound(format!("Invoice {} not found", invoice_id)))
            })
            .await
    }
}
