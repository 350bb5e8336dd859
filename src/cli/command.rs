//! Command tree used for help rendering, and command groups for the root listing.

use super::flags::{Flag, FlagSet};
use std::collections::BTreeMap;

/// Smallest column width for command names in listings.
const MIN_NAME_PADDING: usize = 11;

/// A command as help output sees it
#[derive(Debug, Clone, Default)]
pub struct CommandNode {
    pub name: String,
    /// Full path from the root, e.g. `trafficctl helm install`
    pub path: String,
    pub aliases: Vec<String>,
    pub short: String,
    pub long: String,
    pub example: String,
    /// Every flag the command accepts, inherited global flags included
    pub flags: FlagSet,
    pub subcommands: Vec<CommandNode>,
    pub runnable: bool,
    pub hidden: bool,
}

impl CommandNode {
    /// Build the tree from a clap command, after global arguments have been propagated.
    pub fn from_clap(mut root: clap::Command) -> Self {
        root.build();
        Self::convert(&root, None)
    }

    fn convert(cmd: &clap::Command, parent_path: Option<&str>) -> Self {
        let path = match parent_path {
            Some(parent) => format!("{} {}", parent, cmd.get_name()),
            None => cmd.get_name().to_string(),
        };
        let flags = cmd.get_arguments().filter_map(Flag::from_arg).collect();
        let subcommands: Vec<CommandNode> = cmd
            .get_subcommands()
            .map(|sub| Self::convert(sub, Some(&path)))
            .collect();

        Self {
            name: cmd.get_name().to_string(),
            aliases: cmd.get_visible_aliases().map(str::to_string).collect(),
            short: cmd.get_about().map(|s| s.to_string()).unwrap_or_default(),
            long: cmd.get_long_about().map(|s| s.to_string()).unwrap_or_default(),
            example: cmd.get_after_help().map(|s| s.to_string()).unwrap_or_default(),
            flags,
            // Every clap leaf dispatches, so topics only come from hand-built nodes.
            runnable: subcommands.is_empty(),
            subcommands,
            hidden: cmd.is_hide_set(),
            path,
        }
    }

    /// Find a descendant by name or alias path. An empty path is this command.
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<&CommandNode> {
        let Some((first, rest)) = path.split_first() else {
            return Some(self);
        };
        let first = first.as_ref();
        self.subcommands
            .iter()
            .find(|c| c.name == first || c.aliases.iter().any(|a| a == first))
            .and_then(|c| c.find(rest))
    }

    pub fn is_help(&self) -> bool {
        self.name == "help"
    }

    /// Listed under "Available Commands". The help command is listed separately.
    pub fn is_available(&self) -> bool {
        if self.hidden || self.is_help() {
            return false;
        }
        self.runnable || self.has_available_subcommands()
    }

    pub fn has_available_subcommands(&self) -> bool {
        self.subcommands.iter().any(CommandNode::is_available)
    }

    /// A non-runnable command that only exists to carry help text.
    pub fn is_additional_help_topic(&self) -> bool {
        if self.runnable || self.hidden {
            return false;
        }
        self.subcommands
            .iter()
            .all(CommandNode::is_additional_help_topic)
    }

    pub fn has_help_subcommands(&self) -> bool {
        self.subcommands
            .iter()
            .any(CommandNode::is_additional_help_topic)
    }

    /// `path [flags]` when the command has visible flags.
    pub fn use_line(&self) -> String {
        if self.flags.has_visible() {
            format!("{} [flags]", self.path)
        } else {
            self.path.clone()
        }
    }

    pub fn name_and_aliases(&self) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Column width for the names of this command's subcommands.
    pub fn name_padding(&self) -> usize {
        self.subcommands
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0)
            .max(MIN_NAME_PADDING)
    }

    /// Column width for the paths of this command's subcommands.
    pub fn path_padding(&self) -> usize {
        self.subcommands
            .iter()
            .map(|c| c.path.chars().count())
            .max()
            .unwrap_or(0)
            .max(MIN_NAME_PADDING)
    }
}

/// Commands of the root listing, by group label.
///
/// Labels list in lexical order; commands keep their registration order.
#[derive(Debug, Clone, Default)]
pub struct CommandGroups {
    groups: BTreeMap<String, Vec<String>>,
}

impl CommandGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group<I, S>(mut self, label: impl Into<String>, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups
            .entry(label.into())
            .or_default()
            .extend(commands.into_iter().map(Into::into));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups.iter().map(|(l, c)| (l.as_str(), c.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
