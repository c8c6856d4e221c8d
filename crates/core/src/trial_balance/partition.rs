//! Splitting line items into reporting stages.

use crate::ledger::LedgerLineItem;
use crate::period::ReportPeriod;

/// One of the three time partitions of a trial balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Everything posted before the period start.
    Beginning,
    /// Everything posted inside the period.
    Midterm,
    /// Beginning plus midterm.
    Ending,
}

impl Stage {
    /// All stages in report column order.
    pub const ALL: [Self; 3] = [Self::Beginning, Self::Midterm, Self::Ending];
}

/// Line items of one report, split by posting time.
///
/// Ending is never filtered on its own; it is always the chain of the other
/// two, so `ending = beginning + midterm` holds by construction.
#[derive(Debug, Clone)]
pub struct StagePartition<'a> {
    beginning: Vec<&'a LedgerLineItem>,
    midterm: Vec<&'a LedgerLineItem>,
    after_period: Vec<&'a LedgerLineItem>,
}

impl<'a> StagePartition<'a> {
    /// Splits `items` around `period`.
    ///
    /// A reversed period (start after end) yields an empty midterm; nothing
    /// is raised here.
    #[must_use]
    pub fn split(items: &'a [LedgerLineItem], period: ReportPeriod) -> Self {
        let mut partition = Self {
            beginning: Vec::new(),
            midterm: Vec::new(),
            after_period: Vec::new(),
        };

        for item in items {
            if item.posted_at < period.start {
                partition.beginning.push(item);
            } else if item.posted_at <= period.end {
                partition.midterm.push(item);
            } else {
                partition.after_period.push(item);
            }
        }

        partition
    }

    /// Items posted before the period.
    pub fn beginning(&self) -> impl Iterator<Item = &'a LedgerLineItem> + '_ {
        self.beginning.iter().copied()
    }

    /// Items posted inside the period.
    pub fn midterm(&self) -> impl Iterator<Item = &'a LedgerLineItem> + '_ {
        self.midterm.iter().copied()
    }

    /// Beginning followed by midterm.
    pub fn ending(&self) -> impl Iterator<Item = &'a LedgerLineItem> + '_ {
        self.beginning().chain(self.midterm())
    }

    /// Items of one stage.
    pub fn stage(&self, stage: Stage) -> Box<dyn Iterator<Item = &'a LedgerLineItem> + '_> {
        match stage {
            Stage::Beginning => Box::new(self.beginning()),
            Stage::Midterm => Box::new(self.midterm()),
            Stage::Ending => Box::new(self.ending()),
        }
    }

    /// Items the storage collaborator returned despite being posted after the period end.
    #[must_use]
    pub fn after_period(&self) -> &[&'a LedgerLineItem] {
        &self.after_period
    }
}
