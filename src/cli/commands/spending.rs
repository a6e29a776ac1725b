use daybudget_domain::{Displayable, TransactionType};

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{parse_amount, short_id, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::currency::format_date;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "spend",
            "Record money spent today",
            "spend <amount> [comment]",
            cmd_spend,
        ),
        CommandDefinition::new(
            "edit",
            "Change the amount of a recorded spend",
            "edit <id> <amount> [comment]",
            cmd_edit,
        ),
        CommandDefinition::new(
            "remove",
            "Delete a recorded spend",
            "remove <id>",
            cmd_remove,
        ),
        CommandDefinition::new(
            "history",
            "List the transactions of the current period",
            "history [all]",
            cmd_history,
        ),
    ]
}

fn optional_comment(args: &[&str]) -> Option<String> {
    (!args.is_empty()).then(|| args.join(" "))
}

fn cmd_spend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((amount, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: spend <amount> [comment]".into(),
        ));
    };
    let amount = parse_amount(amount)?;
    if !context.ensure_day_open()? {
        io::print_warning("Spend not recorded.");
        return Ok(());
    }

    let comment = optional_comment(rest).unwrap_or_default();
    let id = context.session.spend(amount, comment)?;
    let summary = context.session.summary()?;
    io::print_success(format!(
        "Spent {} ({}). Left today: {}",
        context.money(amount),
        short_id(id),
        context.money(summary.rest_today)
    ));
    if summary.overspent_today {
        io::print_warning("Today's allowance is overspent.");
    }
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [needle, amount, rest @ ..] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: edit <id> <amount> [comment]".into(),
        ));
    };
    let id = context.resolve_transaction(needle)?;
    let amount = parse_amount(amount)?;
    context
        .session
        .edit_transaction(id, amount, optional_comment(rest))?;
    io::print_success(format!("Spend {} now {}.", short_id(id), context.money(amount)));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let &[needle] = args else {
        return Err(CommandError::InvalidArguments("usage: remove <id>".into()));
    };
    let id = context.resolve_transaction(needle)?;
    let label = context
        .session
        .find_transaction(needle)
        .map(|txn| txn.display_label())
        .unwrap_or_default();
    if !context.confirm(&format!("Remove {}?", label))? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    let removed = context.session.remove_transaction(id)?;
    io::print_success(format!(
        "Removed {} spent on {}.",
        context.money(removed.value),
        format_date(removed.day())
    ));
    Ok(())
}

fn cmd_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let show_all = args
        .first()
        .is_some_and(|flag| flag.eq_ignore_ascii_case("all"));
    let lines: Vec<String> = context
        .session
        .transactions()
        .iter()
        .filter(|txn| show_all || txn.kind == TransactionType::Spent)
        .map(|txn| {
            let comment = if txn.comment.is_empty() {
                String::new()
            } else {
                format!("  {}", txn.comment)
            };
            format!(
                "  {}  {}  {:<16} {:>12}{}",
                short_id(txn.id),
                format_date(txn.day()),
                txn.kind.to_string(),
                context.money(txn.value),
                comment
            )
        })
        .collect();

    output_section("History");
    if lines.is_empty() {
        io::print_info("No transactions yet.");
    }
    for line in lines {
        io::print_info(line);
    }
    Ok(())
}
