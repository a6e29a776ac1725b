use chrono::NaiveDate;
use daybudget_core::{Clock, SystemClock};
use daybudget_domain::{Distribution, RestedBudgetDistributionMethod};

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{parse_date_or_offset, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::currency::format_date;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "today",
            "Open today and show its allowance",
            "today",
            cmd_today,
        ),
        CommandDefinition::new(
            "day",
            "Show or pin the date the shell works with",
            "day [YYYY-MM-DD|+days|now]",
            cmd_day,
        ),
        CommandDefinition::new(
            "distribute",
            "Preview or choose what happens to a leftover",
            "distribute [rest|add-today|add-savings]",
            cmd_distribute,
        ),
    ]
}

fn cmd_today(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ready = context.ensure_day_open()?;
    let summary = context.session.summary()?;

    output_section(format!("Today, {}", format_date(summary.today)));
    if !ready {
        return Ok(());
    }
    io::print_detail("Daily budget", context.money(summary.daily_budget));
    io::print_detail("Spent today", context.money(summary.spent_today));
    io::print_detail("Left today", context.money(summary.rest_today));
    io::print_detail("Rest of budget", context.money(summary.rest_budget));
    io::print_detail("Days left", summary.days_left);
    if summary.overspent_today {
        io::print_warning("Today's allowance is overspent.");
    }
    if summary.period_over {
        io::print_warning("The period is over. Start a new one with `period`.");
    }
    Ok(())
}

fn cmd_day(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let suffix = if context.pinned_date.is_some() {
                " (pinned)"
            } else {
                ""
            };
            io::print_info(format!("Working date: {}{}", context.today(), suffix));
            Ok(())
        }
        [raw] if raw.eq_ignore_ascii_case("now") => {
            ensure_not_before_last_recalc(context, SystemClock.today())?;
            context.set_date(None);
            io::print_success(format!("Following the system clock again ({}).", context.today()));
            Ok(())
        }
        [raw] => {
            let date = parse_date_or_offset(raw, context.today())?;
            ensure_not_before_last_recalc(context, date)?;
            context.set_date(Some(date));
            io::print_success(format!("Working date set to {}.", date));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: day [YYYY-MM-DD|+days|now]".into(),
        )),
    }
}

fn ensure_not_before_last_recalc(context: &ShellContext, date: NaiveDate) -> CommandResult {
    match context.session.state().map(|state| state.last_recalc_date) {
        Some(last) if date < last => Err(CommandError::InvalidArguments(format!(
            "cannot go back to {}, the allowance was already computed for {}",
            format_date(date),
            format_date(last)
        ))),
        _ => Ok(()),
    }
}

fn cmd_distribute(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        if context.session.pending().is_none() {
            io::print_info("No leftover is waiting for a choice.");
            return Ok(());
        }
        let preview = context.session.preview()?;
        output_section("Leftover");
        io::print_detail("Leftover", context.money(preview.leftover));
        io::print_detail("Days left", preview.days_left);
        io::print_detail("rest", context.money(preview.rest));
        io::print_detail("add-today", context.money(preview.add_today));
        io::print_detail("add-savings", context.money(preview.add_savings));
        return Ok(());
    };

    let distribution = RestedBudgetDistributionMethod::parse(raw)
        .and_then(RestedBudgetDistributionMethod::resolved)
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "unknown distribution `{}` (use rest, add-today or add-savings)",
                raw
            ))
        })?;
    choose(context, distribution)
}

fn choose(context: &mut ShellContext, distribution: Distribution) -> CommandResult {
    let report = context.session.choose_distribution(distribution)?;
    context.report_rollover(&report);
    Ok(())
}
