//! Core CLI loop state, dispatch, and shell context helpers.

use std::{env, io, path::PathBuf, str::FromStr};

use chrono::{Duration, NaiveDate};
use dialoguer::theme::ColorfulTheme;
use rust_decimal::Decimal;
use strsim::levenshtein;
use uuid::Uuid;

use daybudget_config::{Config, ConfigError, ConfigManager};
use daybudget_core::{FixedClock, PendingRollover, RolloverOutcome, RolloverReport, SystemClock};
use daybudget_domain::{CurrencyCode, Distribution, MAX_AMOUNT};

use crate::cli::commands::{self, CommandDefinition, CommandRegistry};
use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::currency::{
    format_currency_value, format_date, CurrencyDisplay, FormatOptions, LocaleConfig,
    NegativeStyle,
};
use crate::errors::{CliError, DayBudgetError};
use crate::session::BudgetSession;

/// Overrides the directory holding `config/config.json`.
pub const HOME_ENV: &str = "DAYBUDGET_HOME";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] DayBudgetError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::Core(DayBudgetError::from(err))
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            CommandError::InvalidArguments(message) => CliError::Input(message),
            other => CliError::Command(other.to_string()),
        }
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub session: BudgetSession,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub theme: ColorfulTheme,
    /// Date the shell pretends it is, set by the `day` command.
    pub pinned_date: Option<NaiveDate>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let manager = ConfigManager::with_base_dir(data_dir())?;
        Self::with_config_manager(mode, manager)
    }

    pub fn with_config_manager(mode: CliMode, config_manager: ConfigManager) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        apply_output_preferences(&config, mode);
        let session = BudgetSession::with_system_clock(config.distribution_method);

        Ok(ShellContext {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            session,
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            pinned_date: None,
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn prompt(&self) -> String {
        match self.pinned_date {
            Some(date) => format!("daybudget [{}]> ", date),
            None => "daybudget> ".to_string(),
        }
    }

    pub(crate) fn greet(&self) {
        output::section(format!("daybudget {}", env!("CARGO_PKG_VERSION")));
        cli_io::print_info("Type `help` to list commands, `exit` to quit.");
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|entry| entry.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        crate::cli::shell::handle_line(self, line)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let lowered = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &lowered), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if !self.can_prompt() {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if !self.can_prompt() {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(DayBudgetError::PeriodNotStarted) => {
                cli_io::print_error("No budget period is active.");
                cli_io::print_hint("Try `period 300 +10` to budget 300 over the next ten days.");
            }
            CommandError::Core(DayBudgetError::RolloverPending(leftover)) => {
                cli_io::print_error(format!(
                    "Yesterday left {} to distribute before anything else can happen today.",
                    leftover
                ));
                cli_io::print_hint("Choose with `distribute rest|add-today|add-savings`.");
            }
            other => cli_io::print_error(other.to_string()),
        }
    }

    /// Currency of the active period, or the configured default.
    pub(crate) fn currency(&self) -> CurrencyCode {
        self.session
            .period()
            .map(|period| period.currency.clone())
            .unwrap_or_else(|| self.config.currency.clone())
    }

    pub(crate) fn money(&self, amount: Decimal) -> String {
        let options = FormatOptions {
            currency_display: if self.config.show_currency_code {
                CurrencyDisplay::Code
            } else {
                CurrencyDisplay::Symbol
            },
            negative_style: if self.config.negative_parentheses {
                NegativeStyle::Parentheses
            } else {
                NegativeStyle::Sign
            },
            screen_reader_mode: self.config.screen_reader_mode,
        };
        format_currency_value(
            amount,
            &self.currency(),
            &LocaleConfig::from_tag(&self.config.locale),
            &options,
        )
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.session.today()
    }

    /// Pins the shell to `date`, or back to the system clock for `None`.
    pub(crate) fn set_date(&mut self, date: Option<NaiveDate>) {
        match date {
            Some(date) => self.session.set_clock(Box::new(FixedClock::at_date(date))),
            None => self.session.set_clock(Box::new(SystemClock)),
        }
        self.pinned_date = date;
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        apply_output_preferences(&self.config, self.mode);
        Ok(())
    }

    /// Rolls the allowance over to today. Returns `false` while a leftover
    /// still waits for a distribution choice.
    pub(crate) fn ensure_day_open(&mut self) -> Result<bool, CommandError> {
        match self.session.open_day()? {
            RolloverOutcome::SameDay => Ok(true),
            RolloverOutcome::Applied(report) => {
                self.report_rollover(&report);
                Ok(true)
            }
            RolloverOutcome::AwaitingChoice(pending) => self.resolve_pending(&pending),
        }
    }

    fn resolve_pending(&mut self, pending: &PendingRollover) -> Result<bool, CommandError> {
        let preview = self.session.preview()?;
        cli_io::print_info(format!(
            "{} is left over from earlier days ({} day(s) left in the period).",
            self.money(pending.leftover),
            pending.days_left
        ));

        if !self.can_prompt() {
            cli_io::print_hint("Choose with `distribute rest|add-today|add-savings`.");
            return Ok(false);
        }

        let choices = [
            Distribution::Rest,
            Distribution::AddToday,
            Distribution::AddSavings,
        ];
        let labels = vec![
            format!("Spread over the remaining days ({} per day)", self.money(preview.rest)),
            format!("Add to today ({} today)", self.money(preview.add_today)),
            format!("Put into savings ({} per day)", self.money(preview.add_savings)),
        ];
        let Some(index) = cli_io::select_option(&self.theme, "What should happen to it?", &labels)?
        else {
            cli_io::print_info("Choice postponed.");
            return Ok(false);
        };
        let report = self.session.choose_distribution(choices[index])?;
        self.report_rollover(&report);
        Ok(true)
    }

    pub(crate) fn report_rollover(&self, report: &RolloverReport) {
        if report.leftover < Decimal::ZERO {
            cli_io::print_warning(format!(
                "Overspent by {}; the rest of the period absorbs it.",
                self.money(-report.leftover)
            ));
        } else if !report.leftover.is_zero() {
            cli_io::print_info(format!(
                "Leftover of {} handled with `{}`.",
                self.money(report.leftover),
                report.distribution
            ));
        }
        cli_io::print_success(format!(
            "Daily budget for {}: {}",
            format_date(report.state.last_recalc_date),
            self.money(report.state.daily_budget)
        ));
    }

    pub(crate) fn resolve_transaction(&self, needle: &str) -> Result<Uuid, CommandError> {
        self.session
            .find_transaction(needle)
            .map(|txn| txn.id)
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "no single transaction matches `{}` (see `history`)",
                    needle
                ))
            })
    }
}

fn data_dir() -> PathBuf {
    env::var_os(HOME_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_base_dir)
}

fn apply_output_preferences(config: &Config, mode: CliMode) {
    output::set_preferences(OutputPreferences {
        color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        screen_reader_mode: config.screen_reader_mode,
    });
}

pub(crate) fn parse_amount(input: &str) -> Result<Decimal, CommandError> {
    let amount = Decimal::from_str(input.trim()).map_err(|_| {
        CommandError::InvalidArguments(format!("invalid amount `{}` (use e.g. 12.50)", input))
    })?;
    if amount.abs() > MAX_AMOUNT {
        return Err(CommandError::InvalidArguments(format!(
            "amount `{}` is too large (at most {})",
            input, MAX_AMOUNT
        )));
    }
    Ok(amount)
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

/// Accepts `YYYY-MM-DD` or `+N` days from `today`.
pub(crate) fn parse_date_or_offset(input: &str, today: NaiveDate) -> Result<NaiveDate, CommandError> {
    let Some(offset) = input.strip_prefix('+') else {
        return parse_date(input);
    };
    let days: i64 = offset.parse().map_err(|_| {
        CommandError::InvalidArguments(format!("invalid day offset `{}` (use e.g. +10)", input))
    })?;
    Duration::try_days(days)
        .and_then(|delta| today.checked_add_signed(delta))
        .ok_or_else(|| CommandError::InvalidArguments(format!("offset `{}` is out of range", input)))
}

pub(crate) fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

#[cfg(test)]
pub(crate) fn process_script(
    base: &std::path::Path,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let manager = ConfigManager::with_base_dir(base.to_path_buf())?;
    let mut app = ShellContext::with_config_manager(CliMode::Script, manager)?;
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err),
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use daybudget_domain::RestedBudgetDistributionMethod;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[test]
    fn script_starts_a_period_and_spends() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            &[
                "day 2025-03-01",
                "period 300 2025-03-11",
                "spend 10 \"morning coffee\"",
                "exit",
            ],
        )
        .unwrap();

        let summary = context.session.summary().unwrap();
        assert_eq!(summary.daily_budget, dec!(30));
        assert_eq!(summary.rest_today, dec!(20));
        assert!(!context.running);
        assert_eq!(context.session.transactions().last().unwrap().comment, "morning coffee");
    }

    #[test]
    fn pending_leftover_waits_for_distribute() {
        let dir = tempdir().unwrap();
        let mut context = process_script(
            dir.path(),
            &[
                "method ask",
                "day 2025-03-01",
                "period 300 +10",
                "spend 10",
                "day +1",
                "spend 5",
            ],
        )
        .unwrap();
        assert!(context.session.pending().is_some());
        assert_eq!(context.session.state().unwrap().spent, dec!(0));

        context.process_line("distribute add-today").unwrap();
        context.process_line("spend 5").unwrap();
        let summary = context.session.summary().unwrap();
        assert_eq!(summary.daily_budget, dec!(50));
        assert_eq!(summary.spent_today, dec!(5));
    }

    #[test]
    fn returning_to_the_system_clock_cannot_rewind_the_allowance() {
        let dir = tempdir().unwrap();
        let pinned = NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();
        let context = process_script(
            dir.path(),
            &["method rest", "day 2099-01-01", "period 300 +10", "day now", "spend 10"],
        )
        .unwrap();

        assert_eq!(context.pinned_date, Some(pinned));
        assert_eq!(context.today(), pinned);
        let summary = context.session.summary().unwrap();
        let stats = context.session.statistics().unwrap();
        assert_eq!(summary.rest_budget, dec!(290));
        assert_eq!(stats.total_spent, dec!(10));
        assert_eq!(stats.rest, summary.rest_budget);
    }

    #[test]
    fn method_changes_are_persisted() {
        let dir = tempdir().unwrap();
        process_script(dir.path(), &["method add-savings"]).unwrap();

        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.distribution_method, RestedBudgetDistributionMethod::AddSavings);
    }

    #[test]
    fn unknown_commands_do_not_stop_the_script() {
        let dir = tempdir().unwrap();
        let context = process_script(dir.path(), &["spnd 5", "help", "version"]).unwrap();
        assert!(context.running);
        assert_eq!(context.last_command.as_deref(), Some("version"));
    }

    #[test]
    fn parses_relative_dates() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 30).unwrap();
        assert_eq!(
            parse_date_or_offset("+3", today).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 2).unwrap()
        );
        assert_eq!(
            parse_date_or_offset("2025-02-10", today).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()
        );
        assert!(parse_date_or_offset("+x", today).is_err());
        assert!(parse_amount("12,5").is_err());
    }

    #[test]
    fn huge_day_offsets_are_rejected() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 30).unwrap();
        for raw in ["+200000000000000", "+9223372036854775807", "+100000000"] {
            assert!(matches!(
                parse_date_or_offset(raw, today),
                Err(CommandError::InvalidArguments(_))
            ));
        }
    }

    #[test]
    fn huge_amounts_are_rejected() {
        assert_eq!(parse_amount("1000000000000").unwrap(), MAX_AMOUNT);
        assert!(matches!(
            parse_amount("79228162514264337593543950335"),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn out_of_range_input_leaves_the_shell_running() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            &[
                "day 2025-06-01",
                "day +200000000000000",
                "period 300 +200000000000000",
                "period 300 +10",
                "spend 79228162514264337593543950335",
                "spend 1",
            ],
        )
        .unwrap();
        assert!(context.running);
        assert_eq!(context.today(), NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        let summary = context.session.summary().unwrap();
        assert_eq!(summary.spent_today, dec!(1));
        assert_eq!(summary.rest_budget, dec!(299));
    }
}
