use daybudget_core::PeriodStatistics;

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{parse_amount, parse_date_or_offset, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::currency::format_date;
use crate::errors::DayBudgetError;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "period",
            "Start a budget period today",
            "period <budget> <finish-date|+days>",
            cmd_period,
        ),
        CommandDefinition::new(
            "edit-period",
            "Change the budget or finish date of the current period",
            "edit-period <budget> [finish-date|+days]",
            cmd_edit_period,
        ),
        CommandDefinition::new(
            "status",
            "Show the current period",
            "status",
            cmd_status,
        ),
        CommandDefinition::new(
            "stats",
            "Show spending statistics for the current period",
            "stats",
            cmd_stats,
        ),
        CommandDefinition::new(
            "finish",
            "End the current period after today and show its statistics",
            "finish",
            cmd_finish,
        ),
    ]
}

fn cmd_period(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let &[budget, finish] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: period <budget> <finish-date|+days>".into(),
        ));
    };
    let budget = parse_amount(budget)?;
    let finish = parse_date_or_offset(finish, context.today())?;

    if context.session.period().is_some() && !context.confirm("Replace the current period?")? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }

    let currency = context.config.currency.clone();
    let daily_budget = context
        .session
        .start_period(budget, finish, currency)?
        .daily_budget;

    io::print_success(format!(
        "Period started: {} until {}.",
        context.money(budget),
        format_date(finish)
    ));
    io::print_detail("Daily budget", context.money(daily_budget));
    Ok(())
}

fn cmd_edit_period(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (budget, finish) = match args {
        [budget] => (*budget, None),
        [budget, finish] => (*budget, Some(*finish)),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: edit-period <budget> [finish-date|+days]".into(),
            ))
        }
    };
    let current_finish = context
        .session
        .period()
        .map(|period| period.finish_date)
        .ok_or(DayBudgetError::PeriodNotStarted)?;
    let budget = parse_amount(budget)?;
    let finish = match finish {
        Some(raw) => parse_date_or_offset(raw, context.today())?,
        None => current_finish,
    };

    let daily_budget = context.session.edit_period(budget, finish)?.daily_budget;
    io::print_success(format!(
        "Period updated: {} until {}.",
        context.money(budget),
        format_date(finish)
    ));
    io::print_detail("Daily budget", context.money(daily_budget));
    Ok(())
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = context.session.summary()?;
    let period = context
        .session
        .period()
        .ok_or(DayBudgetError::PeriodNotStarted)?;

    output_section("Period");
    io::print_detail("Budget", context.money(period.budget));
    io::print_detail(
        "Dates",
        format!(
            "{} - {}",
            format_date(period.start_date),
            format_date(period.last_day())
        ),
    );
    io::print_detail("Days left", summary.days_left);
    io::print_detail("Rest of budget", context.money(summary.rest_budget));
    io::print_detail("Saved", context.money(summary.saved));
    io::print_detail("Nominal per day", context.money(summary.nominal_per_day));
    io::print_detail("Even share now", context.money(summary.remaining_nominal));
    io::print_detail("Leftover method", context.session.distribution_method());
    if summary.period_over {
        io::print_warning("The period is over. Start a new one with `period`.");
    }
    Ok(())
}

fn cmd_stats(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let stats = context.session.statistics()?;
    print_statistics(context, &stats);
    Ok(())
}

fn cmd_finish(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.session.period().is_none() {
        return Err(DayBudgetError::PeriodNotStarted.into());
    }
    if !context.confirm("Finish the period after today?")? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    let stats = context.session.finish_early()?;
    io::print_success("Period finished.");
    print_statistics(context, &stats);
    Ok(())
}

fn print_statistics(context: &ShellContext, stats: &PeriodStatistics) {
    output_section("Statistics");
    io::print_detail("Whole budget", context.money(stats.whole_budget));
    io::print_detail("Spent", context.money(stats.total_spent));
    io::print_detail("Rest", context.money(stats.rest));
    io::print_detail("Saved", context.money(stats.saved));
    io::print_detail(
        "Days",
        format!("{} of {}", stats.elapsed_days, stats.total_days),
    );
    io::print_detail("Nominal per day", context.money(stats.nominal_per_day));
    io::print_detail("Average per day", context.money(stats.average_per_day));

    if !stats.spent_anything() {
        io::print_info("Nothing was spent yet.");
        return;
    }
    if let Some(min) = &stats.min_spent {
        io::print_detail(
            "Smallest spend",
            format!("{} on {}", context.money(min.value), format_date(min.day())),
        );
    }
    if let Some(max) = &stats.max_spent {
        io::print_detail(
            "Largest spend",
            format!("{} on {}", context.money(max.value), format_date(max.day())),
        );
    }
    io::print_detail("Overspent days", stats.overspending_day_count());
    for day in &stats.overspending_days {
        io::print_info(format!(
            "    {}  {} in {} spend(s)",
            format_date(day.date),
            context.money(day.total),
            day.transactions
        ));
    }
}
