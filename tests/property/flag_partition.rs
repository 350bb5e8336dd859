//! Partitioning a command's flags into groups.

use proptest::prelude::*;
use trafficctl::cli::flags::{Flag, FlagGroup, FlagGroupRegistry, FlagSet};

const POOL: &[(&str, &str)] = &[
    ("verbose", "Enable verbose logging"),
    ("quiet", "Disable all logging"),
    ("config", "Configuration file"),
    ("context", "The name of the kubeconfig context to use"),
    ("namespace", "The namespace scope"),
    ("upgrade", "Replace the traffic manager"),
    ("values", "Values files"),
];

fn pool_flag(i: usize) -> Flag {
    let (name, usage) = POOL[i];
    Flag::new(name, usage)
}

fn registry() -> FlagGroupRegistry {
    FlagGroupRegistry::new()
        .register(FlagGroup::new("Logging", [pool_flag(0), pool_flag(1)].into_iter().collect()))
        .register(FlagGroup::new("Configuration", [pool_flag(2)].into_iter().collect()))
        .with_infrastructure(FlagGroup::new(
            "Kubernetes flags",
            [pool_flag(3), pool_flag(4)].into_iter().collect(),
        ))
}

fn names(set: &FlagSet) -> Vec<String> {
    set.iter().map(|f| f.name.clone()).collect()
}

/// Every flag lands in exactly one bucket, and group flags never stay local.
#[test]
fn test_partition_is_exact() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let registry = registry();

    runner
        .run(
            &(proptest::collection::vec(0..POOL.len(), 0..12), any::<bool>()),
            |(indices, change_usage)| {
                let flags: FlagSet = indices
                    .iter()
                    .map(|&i| {
                        let flag = pool_flag(i);
                        // A same-named flag with different usage is a different flag.
                        if change_usage && i == 0 {
                            Flag::new(flag.name, "something else")
                        } else {
                            flag
                        }
                    })
                    .collect();
                let partition = registry.partition(&flags);

                let mut bucketed = names(&partition.local);
                for group in &partition.grouped {
                    bucketed.extend(names(group));
                }
                bucketed.extend(names(&partition.infrastructure));
                bucketed.sort();
                let mut expected = names(&flags);
                expected.sort();
                prop_assert_eq!(bucketed, expected);

                for group in registry.groups() {
                    for flag in partition.local.iter() {
                        if let Some(member) = group.flags.lookup(&flag.name) {
                            prop_assert!(!member.same_as(flag));
                        }
                    }
                }
                prop_assert_eq!(
                    partition.local.lookup("verbose").is_some(),
                    change_usage && indices.contains(&0)
                );
                Ok(())
            },
        )
        .unwrap();
}
