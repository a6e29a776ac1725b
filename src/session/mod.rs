//! In-memory owner of the running budget: the period, the allowance state,
//! the transaction log, and the leftover distribution preference.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use daybudget_core::{
    Clock, PendingRollover, PeriodStatistics, RolloverOutcome, RolloverPreview, RolloverReport,
    RolloverService, SpendingService, StatisticsService, SystemClock,
};
use daybudget_domain::{
    CurrencyCode, DailyAllowanceState, Distribution, Identifiable, Period,
    RestedBudgetDistributionMethod, Transaction, TransactionType,
};

use crate::errors::{DayBudgetError, Result};

/// Figures shown on the main screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowanceSummary {
    pub today: NaiveDate,
    pub currency: CurrencyCode,
    pub daily_budget: Decimal,
    pub spent_today: Decimal,
    pub rest_today: Decimal,
    pub rest_budget: Decimal,
    pub saved: Decimal,
    pub nominal_per_day: Decimal,
    /// What is still available, spread evenly over the days left.
    pub remaining_nominal: Decimal,
    pub days_left: i64,
    pub overspent_today: bool,
    pub period_over: bool,
    /// The allowance was last recalculated on an earlier day.
    pub needs_rollover: bool,
    pub pending_leftover: Option<Decimal>,
}

pub struct BudgetSession {
    clock: Box<dyn Clock>,
    period: Option<Period>,
    state: Option<DailyAllowanceState>,
    transactions: Vec<Transaction>,
    method: RestedBudgetDistributionMethod,
    pending: Option<PendingRollover>,
}

impl BudgetSession {
    pub fn new(clock: Box<dyn Clock>, method: RestedBudgetDistributionMethod) -> Self {
        Self {
            clock,
            period: None,
            state: None,
            transactions: Vec::new(),
            method,
            pending: None,
        }
    }

    pub fn with_system_clock(method: RestedBudgetDistributionMethod) -> Self {
        Self::new(Box::new(SystemClock), method)
    }

    pub fn set_clock(&mut self, clock: Box<dyn Clock>) {
        self.clock = clock;
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn period(&self) -> Option<&Period> {
        self.period.as_ref()
    }

    pub fn state(&self) -> Option<&DailyAllowanceState> {
        self.state.as_ref()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn pending(&self) -> Option<&PendingRollover> {
        self.pending.as_ref()
    }

    pub fn distribution_method(&self) -> RestedBudgetDistributionMethod {
        self.method
    }

    pub fn set_distribution_method(&mut self, method: RestedBudgetDistributionMethod) {
        info!(%method, "distribution method changed");
        self.method = method;
    }

    /// Starts a new period on today's date, discarding the previous one and its log.
    pub fn start_period(
        &mut self,
        budget: Decimal,
        finish_date: NaiveDate,
        currency: CurrencyCode,
    ) -> Result<&DailyAllowanceState> {
        let today = self.today();
        let period = Period::new(budget, today, finish_date, currency)?;
        let state = RolloverService::initial_state(&period, today);
        let now = self.clock.now_naive();

        info!(
            %budget,
            start = %period.start_date,
            finish = %period.finish_date,
            daily_budget = %state.daily_budget,
            "budget period started"
        );

        self.transactions = vec![
            Transaction::income(budget, now),
            Transaction::set_daily_budget(state.daily_budget, now),
        ];
        self.pending = None;
        self.period = Some(period);
        Ok(self.state.insert(state))
    }

    /// Recalculates the allowance for today if it has not been done yet.
    pub fn open_day(&mut self) -> Result<RolloverOutcome> {
        let today = self.today();
        let (period, state) = self.active()?;
        let outcome = RolloverService::rollover(period, state, today, self.method);
        match &outcome {
            RolloverOutcome::SameDay => {}
            RolloverOutcome::Applied(report) => {
                self.commit(report);
            }
            RolloverOutcome::AwaitingChoice(pending) => {
                info!(leftover = %pending.leftover, "leftover waiting for a distribution choice");
                self.pending = Some(pending.clone());
            }
        }
        Ok(outcome)
    }

    /// Allowances today would get under each distribution.
    pub fn preview(&self) -> Result<RolloverPreview> {
        let (period, state) = self.active()?;
        Ok(RolloverService::preview(period, state, self.today()))
    }

    /// Resolves a leftover parked by [`BudgetSession::open_day`].
    pub fn choose_distribution(&mut self, distribution: Distribution) -> Result<RolloverReport> {
        let pending = self.pending.clone().ok_or_else(|| {
            DayBudgetError::InvalidInput("no leftover is waiting for a choice".into())
        })?;
        let (period, state) = self.active()?;
        let report = RolloverService::apply(period, state, pending.date, distribution);
        self.commit(&report);
        Ok(report)
    }

    /// Records a spend for today, rolling the allowance over first when a new day started.
    pub fn spend(&mut self, value: Decimal, comment: impl Into<String>) -> Result<Uuid> {
        let today = self.today();
        let period = self.period.as_ref().ok_or(DayBudgetError::PeriodNotStarted)?;
        if !period.contains(today) {
            return Err(DayBudgetError::InvalidInput(format!(
                "{today} is outside the period {} to {}",
                period.start_date,
                period.last_day()
            )));
        }
        if let RolloverOutcome::AwaitingChoice(pending) = self.open_day()? {
            return Err(DayBudgetError::RolloverPending(pending.leftover.to_string()));
        }
        let now = self.clock.now_naive();
        let state = self.state.as_mut().ok_or(DayBudgetError::PeriodNotStarted)?;
        SpendingService::record_spent(state, value, today)?;

        let transaction = Transaction::spent(value, now, comment);
        let id = transaction.id;
        debug!(%id, %value, "spend added");
        self.transactions.push(transaction);
        Ok(id)
    }

    /// Changes the amount (and optionally the comment) of a recorded spend.
    pub fn edit_transaction(
        &mut self,
        id: Uuid,
        value: Decimal,
        comment: Option<String>,
    ) -> Result<()> {
        let index = self.spend_index(id)?;
        let state = self.state.as_mut().ok_or(DayBudgetError::PeriodNotStarted)?;
        let transaction = &mut self.transactions[index];
        SpendingService::edit_spent(state, transaction.value, value, transaction.day())?;
        transaction.value = value;
        if let Some(comment) = comment {
            transaction.comment = comment;
        }
        debug!(%id, %value, "spend edited");
        self.refresh_pending();
        Ok(())
    }

    /// Deletes a recorded spend and gives its amount back to the allowance.
    pub fn remove_transaction(&mut self, id: Uuid) -> Result<Transaction> {
        let index = self.spend_index(id)?;
        let state = self.state.as_mut().ok_or(DayBudgetError::PeriodNotStarted)?;
        let transaction = &self.transactions[index];
        SpendingService::remove_spent(state, transaction.value, transaction.day())?;
        debug!(%id, "spend removed");
        let removed = self.transactions.remove(index);
        self.refresh_pending();
        Ok(removed)
    }

    /// Replaces the budget and finish date, keeping the start date and history.
    pub fn edit_period(
        &mut self,
        budget: Decimal,
        finish_date: NaiveDate,
    ) -> Result<&DailyAllowanceState> {
        let today = self.today();
        let (period, state) = self.active()?;
        if finish_date <= today {
            return Err(DayBudgetError::InvalidInput(format!(
                "finish date {finish_date} must be after today ({today})"
            )));
        }
        let period = period.with_budget(budget, finish_date)?;
        let state = RolloverService::recalculate(&period, state, today);
        info!(
            %budget,
            finish = %finish_date,
            daily_budget = %state.daily_budget,
            "budget period edited"
        );
        self.transactions
            .push(Transaction::set_daily_budget(state.daily_budget, self.clock.now_naive()));
        self.pending = None;
        self.period = Some(period);
        Ok(self.state.insert(state))
    }

    /// Ends the period after today and returns its statistics.
    pub fn finish_early(&mut self) -> Result<PeriodStatistics> {
        let today = self.today();
        let period = self.period.as_ref().ok_or(DayBudgetError::PeriodNotStarted)?;
        let finished = period.finished_early(today);
        info!(finish = %finished.finish_date, "budget period finished early");
        self.period = Some(finished);
        self.statistics()
    }

    pub fn statistics(&self) -> Result<PeriodStatistics> {
        let (period, state) = self.active()?;
        Ok(StatisticsService::summarize(
            period,
            &self.transactions,
            state.saved,
            self.today(),
        ))
    }

    pub fn summary(&self) -> Result<AllowanceSummary> {
        let today = self.today();
        let (period, state) = self.active()?;
        Ok(AllowanceSummary {
            today,
            currency: period.currency.clone(),
            daily_budget: state.daily_budget,
            spent_today: state.spent_from_daily_budget,
            rest_today: state.rest_of_daily_budget(),
            rest_budget: state.rest_budget(period),
            saved: state.saved,
            nominal_per_day: RolloverService::period_nominal(period),
            remaining_nominal: RolloverService::remaining_nominal(period, state, today),
            days_left: period.days_left(today).max(0),
            overspent_today: state.is_overspent_today(),
            period_over: period.is_over(today),
            needs_rollover: today > state.last_recalc_date,
            pending_leftover: self.pending.as_ref().map(|pending| pending.leftover),
        })
    }

    /// Looks a transaction up by full id or by a unique prefix of its simple form.
    pub fn find_transaction(&self, needle: &str) -> Option<&Transaction> {
        if let Ok(id) = Uuid::parse_str(needle) {
            return self.transactions.iter().find(|txn| txn.id() == id);
        }
        let needle = needle.to_ascii_lowercase();
        let mut matches = self
            .transactions
            .iter()
            .filter(|txn| txn.id.simple().to_string().starts_with(&needle));
        let first = matches.next()?;
        matches.next().is_none().then_some(first)
    }

    fn active(&self) -> Result<(&Period, &DailyAllowanceState)> {
        match (&self.period, &self.state) {
            (Some(period), Some(state)) => Ok((period, state)),
            _ => Err(DayBudgetError::PeriodNotStarted),
        }
    }

    fn spend_index(&self, id: Uuid) -> Result<usize> {
        let index = self
            .transactions
            .iter()
            .position(|txn| txn.id == id)
            .ok_or(DayBudgetError::TransactionNotFound(id))?;
        if self.transactions[index].kind != TransactionType::Spent {
            return Err(DayBudgetError::InvalidInput(format!(
                "only spends can be changed; {id} is a {} entry",
                self.transactions[index].kind
            )));
        }
        Ok(index)
    }

    /// Keeps a parked leftover in step with spends changed after it was computed.
    fn refresh_pending(&mut self) {
        let (Some(pending), Some(period), Some(state)) =
            (self.pending.as_mut(), self.period.as_ref(), self.state.as_ref())
        else {
            return;
        };
        pending.leftover = RolloverService::leftover(period, state, pending.date);
    }

    fn commit(&mut self, report: &RolloverReport) {
        info!(
            date = %report.state.last_recalc_date,
            leftover = %report.leftover,
            skipped_days = report.skipped_days,
            distribution = %report.distribution,
            daily_budget = %report.state.daily_budget,
            "daily budget recalculated"
        );
        self.transactions.push(Transaction::set_daily_budget(
            report.state.daily_budget,
            self.clock.now_naive(),
        ));
        self.pending = None;
        self.state = Some(report.state.clone());
    }
}
