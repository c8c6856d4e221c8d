//! Trial balance service over a ledger storage collaborator.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use ledgertree_shared::ReportConfig;
use ledgertree_shared::types::{BookId, CurrencyCode};

use super::engine::{ReportInput, TrialBalanceEngine};
use super::error::ReportError;
use super::types::{TrialBalanceOutcome, TrialBalanceRequest};
use crate::ledger::{Account, LedgerLineItem};
use crate::period::PeriodResolver;

/// Storage the report reads from.
///
/// Implemented by whatever owns the ledger (database, cache, fixtures).
pub trait LedgerSource: Send + Sync {
    /// Every line item of the book with `posted_at <= upper_bound`.
    fn fetch_line_items(
        &self,
        book_id: BookId,
        upper_bound: i64,
    ) -> impl std::future::Future<Output = Result<Vec<LedgerLineItem>, ReportError>> + Send;

    /// The book's chart of accounts.
    fn fetch_accounts(
        &self,
        book_id: BookId,
    ) -> impl std::future::Future<Output = Result<Vec<Account>, ReportError>> + Send;

    /// The book's currency.
    fn resolve_currency(
        &self,
        book_id: BookId,
    ) -> impl std::future::Future<Output = Result<CurrencyCode, ReportError>> + Send;
}

/// Generates trial balance reports for books held by a [`LedgerSource`].
pub struct TrialBalanceService<S: LedgerSource> {
    source: Arc<S>,
    resolver: PeriodResolver,
    engine: TrialBalanceEngine,
}

impl<S: LedgerSource> TrialBalanceService<S> {
    /// Create a new trial balance service.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidConfig` for an unknown time zone or a
    /// filing window that does not divide the year.
    pub fn new(source: Arc<S>, config: ReportConfig) -> Result<Self, ReportError> {
        Ok(Self {
            source,
            resolver: PeriodResolver::from_config(&config)?,
            engine: TrialBalanceEngine::new(config),
        })
    }

    /// Generates one page of a book's trial balance.
    ///
    /// # Errors
    ///
    /// Returns a range error before any fetch for bad bounds or pagination,
    /// the collaborator's error if a fetch fails, and
    /// `ReportError::ReconciliationMismatch` under the strict policy.
    pub async fn generate(
        &self,
        book_id: BookId,
        request: &TrialBalanceRequest,
    ) -> Result<TrialBalanceOutcome, ReportError> {
        self.generate_at(book_id, request, Utc::now()).await
    }

    /// Same as [`Self::generate`] with an explicit clock for the default period.
    ///
    /// # Errors
    ///
    /// See [`Self::generate`].
    #[tracing::instrument(skip(self, request, now), fields(book_id = %book_id))]
    pub async fn generate_at(
        &self,
        book_id: BookId,
        request: &TrialBalanceRequest,
        now: DateTime<Utc>,
    ) -> Result<TrialBalanceOutcome, ReportError> {
        let period = self.resolver.resolve(&request.period, now)?;
        self.engine.validate_request(request)?;

        let (line_items, accounts, currency) = tokio::try_join!(
            self.source.fetch_line_items(book_id, period.end),
            self.source.fetch_accounts(book_id),
            self.source.resolve_currency(book_id),
        )
        .inspect_err(|e| tracing::error!(error = %e, "failed to load ledger data"))?;

        tracing::debug!(
            accounts = accounts.len(),
            line_items = line_items.len(),
            "ledger data loaded"
        );

        self.engine.compute(
            ReportInput {
                accounts: &accounts,
                line_items: &line_items,
                currency,
            },
            period,
            request,
        )
    }
}
