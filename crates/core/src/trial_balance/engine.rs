//! The synchronous trial balance pipeline.
//!
//! Line items are partitioned into stages, merged per account, placed on the
//! account hierarchy, given virtual sub-accounts, rolled up, combined across
//! stages, sorted and paginated. Everything here is pure; fetching is done by
//! [`super::service::TrialBalanceService`].

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rust_decimal::Decimal;

use ledgertree_shared::ReportConfig;
use ledgertree_shared::types::{AccountId, CurrencyCode, PageResponse};

use super::combine::StageCombiner;
use super::error::ReportError;
use super::hierarchy::AccountHierarchy;
use super::inject;
use super::merge::merge_stage;
use super::partition::{Stage, StagePartition};
use super::sort::{layout_rows, sort_sections};
use super::types::{
    ReportNote, ReportTotals, TrialBalanceOutcome, TrialBalancePage, TrialBalanceRequest,
    TrialBalanceSection,
};
use super::warning::{Diagnostics, ReportWarning};
use crate::ledger::{Account, LedgerLineItem};
use crate::period::ReportPeriod;

/// Data fetched for one report.
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    /// Chart of accounts of the book.
    pub accounts: &'a [Account],
    /// Line items posted up to the period end.
    pub line_items: &'a [LedgerLineItem],
    /// Book currency.
    pub currency: CurrencyCode,
}

/// Computes trial balances from already-fetched data.
#[derive(Debug, Clone, Default)]
pub struct TrialBalanceEngine {
    config: ReportConfig,
}

impl TrialBalanceEngine {
    /// Creates an engine.
    #[must_use]
    pub const fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Report configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Checks the pagination parameters of a request.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidPage`] for a zero page, a zero page size
    /// or a page size above the configured maximum.
    pub fn validate_request(&self, request: &TrialBalanceRequest) -> Result<(), ReportError> {
        request.page.validate(self.config.max_page_size)?;
        Ok(())
    }

    /// Builds the unsorted report forest.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::AmountOverflow`] when the amounts cannot be
    /// totalled and [`ReportError::ReconciliationMismatch`] under the strict
    /// policy.
    pub fn build_sections(
        &self,
        accounts: &[Account],
        line_items: &[LedgerLineItem],
        period: ReportPeriod,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<TrialBalanceSection>, ReportError> {
        let partition = StagePartition::split(line_items, period);
        check_magnitude(&partition)?;
        let unknown_ids = scan_line_items(accounts, &partition, diagnostics);
        let hierarchy = AccountHierarchy::build(accounts, &unknown_ids, diagnostics);

        let [beginning, midterm, ending] = Stage::ALL.map(|stage| {
            let mut forest = hierarchy.stage_forest(&merge_stage(partition.stage(stage)));
            inject::apply(&mut forest);
            forest
        });

        StageCombiner::new(
            &hierarchy,
            &self.config.virtual_account_label,
            self.config.reconciliation,
        )
        .combine(&beginning, &midterm, &ending, diagnostics)
    }

    /// Computes one page of the report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidPage`] for bad pagination,
    /// [`ReportError::AmountOverflow`] for amounts that cannot be totalled and
    /// [`ReportError::ReconciliationMismatch`] under the strict policy.
    #[tracing::instrument(
        skip_all,
        fields(
            start = period.start,
            end = period.end,
            accounts = input.accounts.len(),
            line_items = input.line_items.len(),
        )
    )]
    pub fn compute(
        &self,
        input: ReportInput<'_>,
        period: ReportPeriod,
        request: &TrialBalanceRequest,
    ) -> Result<TrialBalanceOutcome, ReportError> {
        self.validate_request(request)?;

        let mut diagnostics = Diagnostics::new();
        let mut sections =
            self.build_sections(input.accounts, input.line_items, period, &mut diagnostics)?;
        sort_sections(&mut sections, &request.sort);

        let total = ReportTotals::from_sections(&sections);
        let page = PageResponse::paginate(
            layout_rows(&sections, &request.sort, request.layout),
            request.page,
        );

        tracing::info!(
            rows = page.meta.total_count,
            page = page.meta.page,
            total_pages = page.meta.total_pages,
            balanced = total.is_balanced,
            warnings = diagnostics.warnings().len(),
            "trial balance computed"
        );

        Ok(TrialBalanceOutcome {
            report: TrialBalancePage {
                page,
                note: ReportNote {
                    currency: input.currency,
                    total,
                },
                period,
            },
            warnings: diagnostics.into_warnings(),
        })
    }
}

/// Fails if the absolute amounts of the reported items do not sum within
/// `Decimal` range. Every subtotal, rollup and net is bounded by that sum.
fn check_magnitude(partition: &StagePartition<'_>) -> Result<(), ReportError> {
    partition
        .ending()
        .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.amount.abs()))
        .map(|_| ())
        .ok_or_else(|| {
            tracing::warn!("line item amounts overflow the decimal range");
            ReportError::AmountOverflow
        })
}

/// Records per-account warnings for suspicious line items and returns the
/// ids that have no account.
fn scan_line_items(
    accounts: &[Account],
    partition: &StagePartition<'_>,
    diagnostics: &mut Diagnostics,
) -> BTreeSet<AccountId> {
    let known: HashSet<AccountId> = accounts.iter().map(|account| account.id).collect();
    let mut unknown: BTreeMap<AccountId, usize> = BTreeMap::new();
    let mut negative: BTreeMap<AccountId, usize> = BTreeMap::new();
    let mut after_period: BTreeMap<AccountId, usize> = BTreeMap::new();

    for item in partition.ending() {
        if !known.contains(&item.account_id) {
            *unknown.entry(item.account_id).or_default() += 1;
        }
        if item.amount < Decimal::ZERO {
            *negative.entry(item.account_id).or_default() += 1;
        }
    }
    for item in partition.after_period() {
        *after_period.entry(item.account_id).or_default() += 1;
    }

    for (&account_id, &line_items) in &unknown {
        diagnostics.record(ReportWarning::UnknownAccount {
            account_id,
            line_items,
        });
    }
    for (account_id, line_items) in negative {
        diagnostics.record(ReportWarning::NegativeAmount {
            account_id,
            line_items,
        });
    }
    for (account_id, line_items) in after_period {
        diagnostics.record(ReportWarning::PostedAfterPeriod {
            account_id,
            line_items,
        });
    }

    unknown.into_keys().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{AccountBucket, DebitCredit};
    use ledgertree_shared::ReconciliationPolicy;
    use ledgertree_shared::types::{PageRequest, PaginationError};
    use rust_decimal_macros::dec;

    fn usd() -> CurrencyCode {
        "USD".parse().unwrap()
    }

    fn compute(
        engine: &TrialBalanceEngine,
        accounts: &[Account],
        line_items: &[LedgerLineItem],
        period: ReportPeriod,
    ) -> TrialBalanceOutcome {
        engine
            .compute(
                ReportInput {
                    accounts,
                    line_items,
                    currency: usd(),
                },
                period,
                &TrialBalanceRequest::default(),
            )
            .unwrap()
    }

    #[test]
    fn test_unknown_account_gets_placeholder_row() {
        let cash = Account::new(AccountId::new(), "1101", "Cash", "asset");
        let ghost = AccountId::new();
        let items = vec![
            LedgerLineItem::debit(cash.id, dec!(10), 5),
            LedgerLineItem::credit(ghost, dec!(10), 5),
        ];

        let outcome = compute(
            &TrialBalanceEngine::default(),
            std::slice::from_ref(&cash),
            &items,
            ReportPeriod::new(0, 10),
        );

        let rows = &outcome.report.page.data;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].account_id, ghost);
        assert_eq!(rows[1].account_type, AccountBucket::Uncategorized.as_str());
        assert_eq!(rows[1].midterm_credit, dec!(10));
        assert!(outcome.report.note.total.is_balanced);
        assert_eq!(
            outcome.warnings,
            vec![ReportWarning::UnknownAccount {
                account_id: ghost,
                line_items: 1,
            }]
        );
    }

    #[test]
    fn test_items_after_period_are_excluded_and_reported() {
        let cash = Account::new(AccountId::new(), "1101", "Cash", "asset");
        let items = vec![
            LedgerLineItem::debit(cash.id, dec!(1), 5),
            LedgerLineItem::debit(cash.id, dec!(100), 11),
            LedgerLineItem::debit(cash.id, dec!(100), 12),
        ];

        let outcome = compute(
            &TrialBalanceEngine::default(),
            std::slice::from_ref(&cash),
            &items,
            ReportPeriod::new(0, 10),
        );

        assert_eq!(outcome.report.page.data[0].ending_debit, dec!(1));
        assert_eq!(
            outcome.warnings,
            vec![ReportWarning::PostedAfterPeriod {
                account_id: cash.id,
                line_items: 2,
            }]
        );
    }

    #[test]
    fn test_negative_amounts_are_summed_as_is() {
        let cash = Account::new(AccountId::new(), "1101", "Cash", "asset");
        let items = vec![
            LedgerLineItem::debit(cash.id, dec!(10), 1),
            LedgerLineItem::debit(cash.id, dec!(-4), 1),
        ];

        let outcome = compute(
            &TrialBalanceEngine::default(),
            std::slice::from_ref(&cash),
            &items,
            ReportPeriod::new(0, 10),
        );

        assert_eq!(outcome.report.page.data[0].midterm_debit, dec!(6));
        assert!(matches!(
            outcome.warnings.as_slice(),
            [ReportWarning::NegativeAmount { line_items: 1, .. }]
        ));
    }

    #[test]
    fn test_overflowing_amounts_are_rejected() {
        let cash = Account::new(AccountId::new(), "1101", "Cash", "asset");
        let items = vec![
            LedgerLineItem::debit(cash.id, Decimal::MAX, 1),
            LedgerLineItem::debit(cash.id, Decimal::MAX, 2),
            LedgerLineItem::debit(cash.id, Decimal::MAX, 50),
        ];

        let result = TrialBalanceEngine::default().compute(
            ReportInput {
                accounts: std::slice::from_ref(&cash),
                line_items: &items,
                currency: usd(),
            },
            ReportPeriod::new(0, 10),
            &TrialBalanceRequest::default(),
        );

        assert!(matches!(result, Err(ReportError::AmountOverflow)));
    }

    #[test]
    fn test_largest_single_amount_is_reported() {
        let cash = Account::new(AccountId::new(), "1101", "Cash", "asset");
        let items = vec![
            LedgerLineItem::debit(cash.id, Decimal::MAX, 1),
            LedgerLineItem::debit(cash.id, Decimal::MAX, 50),
        ];

        let outcome = compute(
            &TrialBalanceEngine::default(),
            std::slice::from_ref(&cash),
            &items,
            ReportPeriod::new(0, 10),
        );

        assert_eq!(outcome.report.page.data[0].ending_debit, Decimal::MAX);
    }

    #[test]
    fn test_oversized_page_is_rejected() {
        let engine = TrialBalanceEngine::new(ReportConfig {
            max_page_size: 10,
            ..ReportConfig::default()
        });
        let request = TrialBalanceRequest {
            page: PageRequest::new(1, 11),
            ..TrialBalanceRequest::default()
        };

        let result = engine.compute(
            ReportInput {
                accounts: &[],
                line_items: &[],
                currency: usd(),
            },
            ReportPeriod::new(0, 10),
            &request,
        );
        assert!(matches!(
            result,
            Err(ReportError::InvalidPage(PaginationError::PageSizeTooLarge { size: 11, max: 10 }))
        ));
    }

    #[test]
    fn test_empty_book() {
        let outcome = compute(
            &TrialBalanceEngine::default(),
            &[],
            &[],
            ReportPeriod::new(0, 10),
        );

        let meta = outcome.report.page.meta;
        assert!(outcome.report.page.data.is_empty());
        assert_eq!(meta.total_count, 0);
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_next_page);
        assert_eq!(outcome.report.note.total.ending, DebitCredit::ZERO);
        assert!(outcome.report.note.total.is_balanced);
    }

    #[test]
    fn test_virtual_label_comes_from_config() {
        let engine = TrialBalanceEngine::new(ReportConfig {
            virtual_account_label: "Direct".to_string(),
            reconciliation: ReconciliationPolicy::Strict,
            ..ReportConfig::default()
        });
        let cash = Account::new(AccountId::new(), "1101", "Cash", "asset");
        let admin = Account::new(AccountId::new(), "1101-1", "Cash/Admin", "asset");
        let items = vec![
            LedgerLineItem::debit(cash.id, dec!(3), 1),
            LedgerLineItem::credit(admin.id, dec!(3), 1),
        ];

        let outcome = compute(&engine, &[cash, admin], &items, ReportPeriod::new(0, 10));

        let children = &outcome.report.page.data[0].sub_accounts;
        let codes: Vec<_> = children.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["1101-0", "1101-1"]);
        assert_eq!(children[0].name, "Cash - Direct");
        assert!(children[0].is_virtual);
        assert_eq!(children[0].midterm_debit, dec!(3));
    }
}
