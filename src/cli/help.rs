//! Help text rendering.
//!
//! `render` is a pure function of its inputs. Sections appear in a fixed order and are left out
//! entirely when empty: Usage, Aliases, Examples, Available Commands, Flags, the infrastructure
//! flag group, Global Flags, Additional help topics, and the trailing hint.

use super::command::{CommandGroups, CommandNode};
use super::flags::{FlagGroupRegistry, FlagSet};
use super::terminal::TerminalWidth;
use super::usage::flag_usages;

/// Everything besides the command itself that help output depends on
#[derive(Debug, Clone, Copy)]
pub struct HelpContext<'a> {
    pub registry: &'a FlagGroupRegistry,
    /// Groups for the "Available Commands" listing; `None` lists commands flat
    pub command_groups: Option<&'a CommandGroups>,
    pub width: TerminalWidth,
    pub daemon_running: bool,
    pub docs_url: Option<&'a str>,
}

/// Render help for `command`.
pub fn render(command: &CommandNode, ctx: &HelpContext<'_>) -> String {
    let mut out = String::new();
    let has_subcommands = command.has_available_subcommands();

    out.push_str("Usage:");
    if command.runnable && !has_subcommands {
        out.push_str(&format!("\n  {}", command.use_line()));
    }
    if has_subcommands {
        out.push_str(&format!("\n  {} [command]", command.path));
    }

    if !command.aliases.is_empty() {
        out.push_str(&format!("\n\nAliases:\n  {}", command.name_and_aliases()));
    }

    if !command.example.is_empty() {
        out.push_str(&format!("\n\nExamples:\n{}", command.example));
    }

    if has_subcommands {
        render_available_commands(&mut out, command, ctx);
    }

    let partition = ctx.registry.partition(&command.flags);
    if partition.local.has_visible() {
        out.push_str("\n\nFlags:\n");
        out.push_str(&usages(&partition.local, ctx.width));
    }

    if let Some(infra) = ctx.registry.infrastructure() {
        if ctx.registry.has_infrastructure_flags(&command.flags) && infra.flags.has_visible() {
            out.push_str(&format!("\n\n{}:\n", infra.label));
            out.push_str(&usages(&infra.flags, ctx.width));
        }
    }

    let global: Vec<_> = ctx
        .registry
        .groups()
        .iter()
        .filter(|g| command.flags.contains_all(&g.flags) && g.flags.has_visible())
        .collect();
    if !global.is_empty() {
        out.push_str("\n\nGlobal Flags:");
        for group in global {
            out.push_str(&format!("\n\n  {}:\n", group.label));
            out.push_str(&usages(&group.flags, ctx.width));
        }
    }

    if command.has_help_subcommands() {
        out.push_str("\n\nAdditional help topics:");
        let padding = command.path_padding();
        for topic in command
            .subcommands
            .iter()
            .filter(|c| c.is_additional_help_topic())
        {
            out.push_str(&format!("\n  {} {}", rpad(&topic.path, padding), topic.short));
        }
    }

    if has_subcommands {
        out.push_str(&format!(
            "\n\nUse \"{} [command] --help\" for more information about a command.",
            command.path
        ));
        if let Some(url) = ctx.docs_url {
            out.push_str(&format!(
                "\n\nFor complete documentation and quick-start guides, check out our website at {}",
                url
            ));
        }
    }

    out.push('\n');
    out
}

/// Render the long description followed by the usage document, as `--help` prints it.
pub fn render_full(command: &CommandNode, ctx: &HelpContext<'_>) -> String {
    let description = if command.long.is_empty() {
        &command.short
    } else {
        &command.long
    };
    let usage = render(command, ctx);
    if description.is_empty() {
        usage
    } else {
        format!("{}\n\n{}", description.trim_end(), usage)
    }
}

fn render_available_commands(out: &mut String, command: &CommandNode, ctx: &HelpContext<'_>) {
    out.push_str("\n\nAvailable Commands");
    if !ctx.daemon_running {
        out.push_str(" (list may be incomplete because the User Daemon isn't running)");
    }
    out.push(':');

    let padding = command.name_padding();
    match ctx.command_groups.filter(|g| !g.is_empty()) {
        Some(groups) => {
            for (label, names) in groups.iter() {
                out.push_str(&format!("\n  {}:", label));
                for name in names {
                    let Some(sub) = command.subcommands.iter().find(|c| &c.name == name) else {
                        continue;
                    };
                    if !(sub.is_available() || sub.is_help()) {
                        continue;
                    }
                    out.push_str(&format!("\n    {} {}", rpad(&sub.name, padding), sub.short));
                }
            }
        }
        None => {
            for sub in command
                .subcommands
                .iter()
                .filter(|c| c.is_available() || c.is_help())
            {
                out.push_str(&format!("\n  {} {}", rpad(&sub.name, padding), sub.short));
            }
        }
    }
}

fn usages(flags: &FlagSet, width: TerminalWidth) -> String {
    flag_usages(flags, width).trim_end().to_string()
}

fn rpad(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}
