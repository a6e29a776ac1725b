use daybudget_domain::{CurrencyCode, RestedBudgetDistributionMethod};

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "method",
            "Show or set what happens to leftover allowance",
            "method [ask|rest|add-today|add-savings]",
            cmd_method,
        ),
        CommandDefinition::new(
            "currency",
            "Show or set the currency for new periods",
            "currency [code]",
            cmd_currency,
        ),
        CommandDefinition::new(
            "config",
            "View and manage preferences",
            "config [show|set <key> <value>|backup [note]|backups|restore <name|number>]",
            cmd_config,
        ),
    ]
}

fn cmd_method(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        io::print_info(format!(
            "Leftover method: {}",
            context.session.distribution_method()
        ));
        return Ok(());
    };
    let method = RestedBudgetDistributionMethod::parse(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown method `{}` (use ask, rest, add-today or add-savings)",
            raw
        ))
    })?;

    context.config.distribution_method = method;
    context.persist_config()?;
    context.session.set_distribution_method(method);
    io::print_success(format!("Leftover method set to `{}`.", method));
    Ok(())
}

fn cmd_currency(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        io::print_info(format!("Currency: {}", context.config.currency));
        return Ok(());
    };
    let code = CurrencyCode::new(*raw);
    if code.as_str().len() != 3 || !code.as_str().chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(CommandError::InvalidArguments(format!(
            "currency `{}` is not a three-letter code",
            raw
        )));
    }

    context.config.currency = code.clone();
    context.persist_config()?;
    io::print_success(format!("Currency set to {}.", code));
    if context.session.period().is_some() {
        io::print_hint("The running period keeps its currency; new periods use this one.");
    }
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(action) = args.first().map(|arg| arg.to_lowercase()) else {
        return show_config(context);
    };

    match action.as_str() {
        "show" => show_config(context),
        "set" => match &args[1..] {
            [key, value @ ..] if !value.is_empty() => {
                set_config_value(context, key, &value.join(" "))
            }
            _ => Err(CommandError::InvalidArguments(
                "usage: config set <locale|color|screen-reader|currency-code|parentheses> <value>"
                    .into(),
            )),
        },
        "backup" => {
            let note = (args.len() > 1).then(|| args[1..].join(" "));
            let name = context
                .config_manager
                .backup(&context.config, note.as_deref())?;
            io::print_success(format!("Configuration backed up as `{}`.", name));
            Ok(())
        }
        "backups" => {
            let backups = context.config_manager.list_backups()?;
            output_section("Configuration backups");
            if backups.is_empty() {
                io::print_info("No backups yet.");
            }
            for (index, backup) in backups.iter().enumerate() {
                let stamp = backup.created_at.format("%Y-%m-%d %H:%M:%S");
                match &backup.note {
                    Some(note) => io::print_info(format!(
                        "  {:>2}. {}  {}  ({})",
                        index + 1,
                        stamp,
                        note,
                        backup.name
                    )),
                    None => io::print_info(format!("  {:>2}. {}  ({})", index + 1, stamp, backup.name)),
                }
            }
            Ok(())
        }
        "restore" => {
            let Some(reference) = args.get(1) else {
                return Err(CommandError::InvalidArguments(
                    "usage: config restore <name|number>".into(),
                ));
            };
            restore_config(context, reference)
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}`",
            other
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    let config = &context.config;
    output_section("Configuration");
    io::print_detail("Locale", &config.locale);
    io::print_detail("Currency", &config.currency);
    io::print_detail("Leftover method", config.distribution_method);
    io::print_detail("Color", on_off(config.ui_color_enabled));
    io::print_detail("Screen reader", on_off(config.screen_reader_mode));
    io::print_detail("Currency code", on_off(config.show_currency_code));
    io::print_detail("Parentheses", on_off(config.negative_parentheses));
    io::print_detail("File", context.config_manager.config_path().display());
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    match key.to_lowercase().as_str() {
        "locale" => context.config.locale = value.to_string(),
        "color" => context.config.ui_color_enabled = parse_switch(value)?,
        "screen-reader" => context.config.screen_reader_mode = parse_switch(value)?,
        "currency-code" => context.config.show_currency_code = parse_switch(value)?,
        "parentheses" => context.config.negative_parentheses = parse_switch(value)?,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{}`",
                other
            )))
        }
    }
    context.persist_config()?;
    io::print_success("Configuration updated.");
    Ok(())
}

/// Restores by file name or by the position shown in `config backups`.
fn restore_config(context: &mut ShellContext, reference: &str) -> CommandResult {
    let name = match reference.parse::<usize>() {
        Ok(position) => {
            let backups = context.config_manager.list_backups()?;
            position
                .checked_sub(1)
                .and_then(|index| backups.into_iter().nth(index))
                .map(|backup| backup.name)
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!("no backup at position {}", position))
                })?
        }
        Err(_) => reference.to_string(),
    };
    let restored = context.config_manager.restore(&name)?;
    context.session.set_distribution_method(restored.distribution_method);
    context.config = restored;
    context.persist_config()?;
    io::print_success(format!("Configuration restored from `{}`.", name));
    Ok(())
}

fn parse_switch(value: &str) -> Result<bool, CommandError> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "expected on or off, got `{}`",
            other
        ))),
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
