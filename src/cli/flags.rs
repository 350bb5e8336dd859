//! Flags, flag groups, and the partition of a command's flags into groups and local flags.
//!
//! A flag belongs to a group when the group holds a flag of the same name whose usage text and
//! hidden status also match. Matching by name alone is not enough: two commands may define
//! unrelated flags that share a name.

use clap::{ArgAction, Args};
use std::sync::Arc;

/// A command-line flag as shown in help output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub name: String,
    pub shorthand: Option<char>,
    /// Value placeholder, `None` for switches
    pub value_type: Option<String>,
    pub usage: String,
    pub default: Option<String>,
    pub hidden: bool,
}

impl Flag {
    pub fn new(name: impl Into<String>, usage: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shorthand: None,
            value_type: None,
            usage: usage.into(),
            default: None,
            hidden: false,
        }
    }

    pub fn with_shorthand(mut self, shorthand: char) -> Self {
        self.shorthand = Some(shorthand);
        self
    }

    pub fn with_value_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = Some(value_type.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Convert a clap argument. Positional arguments have no flag form and yield `None`.
    pub fn from_arg(arg: &clap::Arg) -> Option<Self> {
        let name = arg.get_long()?;
        let usage = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
        let takes_value = arg.get_action().takes_values();

        let value_type = takes_value.then(|| {
            arg.get_value_names()
                .and_then(|names| names.first())
                .map(|n| n.as_str().to_lowercase())
                .unwrap_or_else(|| "string".to_string())
        });
        let default = takes_value
            .then(|| {
                let defaults: Vec<String> = arg
                    .get_default_values()
                    .iter()
                    .map(|v| v.to_string_lossy().into_owned())
                    .collect();
                (!defaults.is_empty()).then(|| defaults.join(","))
            })
            .flatten();

        Some(Self {
            name: name.to_string(),
            shorthand: arg.get_short(),
            value_type,
            usage,
            default,
            hidden: arg.is_hide_set() || matches!(arg.get_action(), ArgAction::Help),
        })
    }

    /// Same flag for grouping purposes: name, usage, and hidden status all match.
    pub fn same_as(&self, other: &Flag) -> bool {
        self.name == other.name && self.usage == other.usage && self.hidden == other.hidden
    }
}

/// Identity first, then [`Flag::same_as`].
pub fn same_flag(a: &Arc<Flag>, b: &Arc<Flag>) -> bool {
    Arc::ptr_eq(a, b) || a.same_as(b)
}

/// Flags in insertion order, unique by name
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    flags: Vec<Arc<Flag>>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flag. A flag whose name is already present is ignored.
    pub fn add(&mut self, flag: Flag) {
        self.add_shared(Arc::new(flag));
    }

    pub fn add_shared(&mut self, flag: Arc<Flag>) {
        if self.lookup(&flag.name).is_none() {
            self.flags.push(flag);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Arc<Flag>> {
        self.flags.iter().find(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Flag>> {
        self.flags.iter()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// True when at least one flag would appear in help output.
    pub fn has_visible(&self) -> bool {
        self.flags.iter().any(|f| !f.hidden)
    }

    /// True when every flag of `other` has a matching flag here.
    pub fn contains_all(&self, other: &FlagSet) -> bool {
        other.iter().all(|flag| {
            self.lookup(&flag.name)
                .map(|mine| same_flag(mine, flag))
                .unwrap_or(false)
        })
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut set = FlagSet::new();
        for flag in iter {
            set.add(flag);
        }
        set
    }
}

/// Named, reusable set of flags rendered as its own help section
#[derive(Debug, Clone)]
pub struct FlagGroup {
    pub label: String,
    pub flags: FlagSet,
}

impl FlagGroup {
    pub fn new(label: impl Into<String>, flags: FlagSet) -> Self {
        Self {
            label: label.into(),
            flags,
        }
    }

    /// Group made of the flags a clap `Args` struct defines.
    pub fn from_args<A: Args>(label: impl Into<String>) -> Self {
        let cmd = A::augment_args(clap::Command::new("flag-group").disable_help_flag(true));
        let flags = cmd.get_arguments().filter_map(Flag::from_arg).collect();
        Self {
            label: label.into(),
            flags,
        }
    }
}

/// Registered flag groups, immutable once built.
///
/// Global groups are matched in registration order, then the infrastructure group.
#[derive(Debug, Clone, Default)]
pub struct FlagGroupRegistry {
    groups: Vec<FlagGroup>,
    infrastructure: Option<FlagGroup>,
}

/// A command's flags split by group
#[derive(Debug, Clone, Default)]
pub struct FlagPartition {
    pub local: FlagSet,
    /// One entry per registered global group, in registration order
    pub grouped: Vec<FlagSet>,
    pub infrastructure: FlagSet,
}

impl FlagGroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, group: FlagGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_infrastructure(mut self, group: FlagGroup) -> Self {
        self.infrastructure = Some(group);
        self
    }

    pub fn groups(&self) -> &[FlagGroup] {
        &self.groups
    }

    pub fn infrastructure(&self) -> Option<&FlagGroup> {
        self.infrastructure.as_ref()
    }

    /// Assign each flag to the first group holding the same flag; the rest are local.
    pub fn partition(&self, flags: &FlagSet) -> FlagPartition {
        let mut partition = FlagPartition {
            grouped: vec![FlagSet::new(); self.groups.len()],
            ..FlagPartition::default()
        };

        'flags: for flag in flags.iter() {
            for (i, group) in self.groups.iter().enumerate() {
                if matches_group(group, flag) {
                    partition.grouped[i].add_shared(Arc::clone(flag));
                    continue 'flags;
                }
            }
            if let Some(infra) = &self.infrastructure {
                if matches_group(infra, flag) {
                    partition.infrastructure.add_shared(Arc::clone(flag));
                    continue;
                }
            }
            partition.local.add_shared(Arc::clone(flag));
        }
        partition
    }

    /// Whether `flags` holds every flag of the infrastructure group.
    pub fn has_infrastructure_flags(&self, flags: &FlagSet) -> bool {
        self.infrastructure
            .as_ref()
            .map(|infra| flags.contains_all(&infra.flags))
            .unwrap_or(false)
    }
}

fn matches_group(group: &FlagGroup, flag: &Arc<Flag>) -> bool {
    group
        .flags
        .lookup(&flag.name)
        .map(|candidate| same_flag(candidate, flag))
        .unwrap_or(false)
}
